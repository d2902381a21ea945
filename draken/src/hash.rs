//! The FNV-1a byte hash shared by every vector kernel's `hash` operation.

/// FNV-1a offset basis.
const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
/// FNV-1a prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Hashes an arbitrary byte slice with FNV-1a.
///
/// Used both directly by [`crate::vector::StringVector::hash`] and, via
/// [`crate::ptype::Numeric::to_ne_bytes`]-style native byte views, by the
/// fixed-width numeric, date, and timestamp vectors — one hash
/// algorithm for every archetype rather than a bespoke integer mixer.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_hashes_to_offset_basis() {
        assert_eq!(fnv1a(&[]), FNV_OFFSET_BASIS);
    }

    #[test]
    fn distinct_inputs_hash_differently() {
        assert_ne!(fnv1a(b"a"), fnv1a(b"b"));
    }
}
