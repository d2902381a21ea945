//! Spec-shaped buffer shapes, built on `arrow-buffer`'s zero-copy types.
//!
//! `arrow_buffer::Buffer` already models exactly the ownership split the
//! core needs (an owned, allocator-backed region, or a region whose
//! release is deferred to a foreign owner kept alive through the
//! buffer's own reference count) — the same insight `vortex-buffer`
//! builds on when it wraps `arrow_buffer::Buffer` in a `bytes::Bytes`
//! instead of re-deriving an "owns_data" flag. `FixedBuffer`/`VarBuffer`
//! below give that representation the accessor surface the
//! specification describes (`length`, `itemsize_bytes`, null bitmap
//! presence) without re-implementing its lifetime management.

use std::sync::Arc;

use arrow_buffer::{ArrowNativeType, BooleanBuffer, Buffer as ArrowBuffer, NullBuffer, OffsetBuffer, ScalarBuffer};
use bytes::Bytes;
use draken_error::{draken_err, DrakenResult};

use crate::alloc::{Allocator, SystemAllocator};

/// A fixed-width, contiguously packed buffer of native values plus an
/// optional validity bitmap.
///
/// Corresponds to `FixedBuffer` in the core specification: `data`
/// addresses `length * itemsize_bytes` bytes in native endianness, and
/// the null bitmap (when present) follows the Arrow little-endian bit
/// convention (bit `i` at `byte[i >> 3] & (1 << (i & 7))`).
#[derive(Clone, Debug)]
pub struct FixedBuffer<T: ArrowNativeType> {
    values: ScalarBuffer<T>,
    nulls: Option<NullBuffer>,
}

impl<T: ArrowNativeType> FixedBuffer<T> {
    /// Wraps already-materialized values and an optional validity bitmap.
    ///
    /// `nulls`, if present, must have the same length as `values`.
    pub fn new(values: ScalarBuffer<T>, nulls: Option<NullBuffer>) -> Self {
        debug_assert!(nulls.as_ref().is_none_or(|n| n.len() == values.len()));
        Self { values, nulls }
    }

    /// Allocates `len` zero-valued elements through `allocator`, with no
    /// null bitmap (all-valid).
    pub fn zeroed(len: usize, allocator: &dyn Allocator) -> DrakenResult<Self> {
        let nbytes = len
            .checked_mul(size_of::<T>())
            .ok_or_else(|| draken_err!(OutOfMemory: usize::MAX))?;
        let region = allocator.alloc(nbytes)?;
        // Routes the allocated region through `bytes::Bytes` before handing it to
        // `arrow_buffer::Buffer`, the same conversion `vortex-buffer` uses to give an owned
        // buffer a refcounted, zero-copy-shareable backing store instead of a plain `Vec`.
        let owned = Bytes::from(Vec::from(region));
        let arrow_buf = ArrowBuffer::from_bytes(owned.into());
        Ok(Self {
            values: ScalarBuffer::new(arrow_buf, 0, len),
            nulls: None,
        })
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer has zero elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The element values, ignoring validity.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The validity bitmap, if one was ever materialized. Absence means
    /// "every position is valid" per the core's bitmap policy.
    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }

    /// The number of null positions.
    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, NullBuffer::null_count)
    }

    /// Whether position `i` is null.
    pub fn is_null(&self, i: usize) -> bool {
        self.nulls.as_ref().is_some_and(|n| n.is_null(i))
    }

    /// `itemsize_bytes` from the specification.
    pub fn item_size(&self) -> usize {
        size_of::<T>()
    }

    /// Exposes the underlying Arrow scalar buffer, for the Arrow bridge.
    pub fn as_scalar_buffer(&self) -> &ScalarBuffer<T> {
        &self.values
    }
}

impl<T: ArrowNativeType> FromIterator<T> for FixedBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: ScalarBuffer::from_iter(iter),
            nulls: None,
        }
    }
}

/// A variable-width, offset-indexed byte buffer plus an optional
/// validity bitmap.
///
/// Corresponds to `VarBuffer`: `offsets` has `length + 1` `i32` entries
/// with `offsets[0] == 0` and `offsets[i + 1] >= offsets[i]`; value `i`
/// occupies `data[offsets[i]..offsets[i + 1])`.
#[derive(Clone, Debug)]
pub struct VarBuffer {
    offsets: OffsetBuffer<i32>,
    data: ArrowBuffer,
    nulls: Option<NullBuffer>,
}

impl VarBuffer {
    /// Wraps already-materialized offsets, data, and an optional
    /// validity bitmap.
    ///
    /// `nulls`, if present, must have `offsets.len() - 1` entries.
    pub fn new(offsets: OffsetBuffer<i32>, data: ArrowBuffer, nulls: Option<NullBuffer>) -> Self {
        debug_assert!(nulls.as_ref().is_none_or(|n| n.len() + 1 == offsets.inner().len()));
        Self {
            offsets,
            data,
            nulls,
        }
    }

    /// Validates import-time offsets per the core's `InvalidOffset` check:
    /// `offsets[0] == 0`, monotonically non-decreasing, and the final
    /// offset does not exceed the data buffer's length.
    pub fn try_new(
        raw_offsets: ScalarBuffer<i32>,
        data: ArrowBuffer,
        nulls: Option<NullBuffer>,
    ) -> DrakenResult<Self> {
        if raw_offsets.first().copied() != Some(0) {
            return Err(draken_err!(InvalidOffset: 0, "offsets[0] must be 0"));
        }
        for i in 0..raw_offsets.len().saturating_sub(1) {
            if raw_offsets[i + 1] < raw_offsets[i] {
                return Err(draken_err!(
                    InvalidOffset: i + 1,
                    "offsets[{}]={} is less than offsets[{}]={}",
                    i + 1,
                    raw_offsets[i + 1],
                    i,
                    raw_offsets[i]
                ));
            }
        }
        if let Some(&last) = raw_offsets.last() {
            if last as usize > data.len() {
                return Err(draken_err!(
                    InvalidOffset: raw_offsets.len() - 1,
                    "offsets[{}]={} exceeds data buffer length {}",
                    raw_offsets.len() - 1,
                    last,
                    data.len()
                ));
            }
        }
        let offsets = OffsetBuffer::new(raw_offsets);
        Ok(Self::new(offsets, data, nulls))
    }

    /// The number of values (one less than the offsets count).
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the buffer has zero values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte range backing value `i`, irrespective of its validity.
    pub fn value(&self, i: usize) -> &[u8] {
        let start = self.offsets[i] as usize;
        let stop = self.offsets[i + 1] as usize;
        &self.data[start..stop]
    }

    /// The raw offsets, `length + 1` entries.
    pub fn offsets(&self) -> &OffsetBuffer<i32> {
        &self.offsets
    }

    /// The packed value bytes.
    pub fn data(&self) -> &ArrowBuffer {
        &self.data
    }

    /// The validity bitmap, if present.
    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }

    /// The number of null positions.
    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, NullBuffer::null_count)
    }

    /// Whether position `i` is null.
    pub fn is_null(&self, i: usize) -> bool {
        self.nulls.as_ref().is_some_and(|n| n.is_null(i))
    }
}

/// A bit-packed boolean buffer plus an optional validity bitmap, sharing
/// the same bit layout as the null bitmap itself (bit `i` at
/// `byte[i >> 3] & (1 << (i & 7))`).
#[derive(Clone, Debug)]
pub struct BitBuffer {
    values: BooleanBuffer,
    nulls: Option<NullBuffer>,
}

impl BitBuffer {
    /// Wraps already-materialized bits and an optional validity bitmap.
    pub fn new(values: BooleanBuffer, nulls: Option<NullBuffer>) -> Self {
        debug_assert!(nulls.as_ref().is_none_or(|n| n.len() == values.len()));
        Self { values, nulls }
    }

    /// The number of bits.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer has zero bits.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The bit at position `i`, irrespective of validity.
    pub fn value(&self, i: usize) -> bool {
        self.values.value(i)
    }

    /// The packed boolean values.
    pub fn values(&self) -> &BooleanBuffer {
        &self.values
    }

    /// The validity bitmap, if present.
    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }

    /// The number of null positions.
    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, NullBuffer::null_count)
    }

    /// Whether position `i` is null.
    pub fn is_null(&self, i: usize) -> bool {
        self.nulls.as_ref().is_some_and(|n| n.is_null(i))
    }
}

/// Computes the `is_null_mask` kernel result (1 = null, 0 = valid) for
/// any buffer shape, from its optional null bitmap and its length.
pub fn is_null_mask(nulls: Option<&NullBuffer>, len: usize) -> Vec<u8> {
    match nulls {
        None => vec![0; len],
        Some(n) => (0..len).map(|i| u8::from(n.is_null(i))).collect(),
    }
}

/// A keep-alive handle for memory a [`crate::vector::Vector`] borrowed
/// from an external Arrow array.
///
/// Holding one of these alongside borrowed buffer data is what prevents
/// the foreign memory from being freed while the vector is still
/// reading it; it is the Rust-typed equivalent of "store the Arrow
/// buffer object as a field" called out as a re-architecture target in
/// the core's design notes.
pub type KeepAlive = Arc<dyn std::any::Any + Send + Sync>;

/// Builds a [`NullBuffer`] from a slice of per-position validity bools,
/// or `None` if every position is valid (matching the core's bitmap
/// omission policy).
pub fn null_buffer_from_validity(valid: &[bool]) -> Option<NullBuffer> {
    if valid.iter().all(|&v| v) {
        return None;
    }
    Some(NullBuffer::from_iter(valid.iter().copied()))
}

/// Allocates a [`FixedBuffer`] of `len` zeroed elements using the default
/// [`SystemAllocator`]. A convenience for call sites that don't need to
/// inject a custom allocator.
pub fn zeroed_fixed<T: ArrowNativeType>(len: usize) -> DrakenResult<FixedBuffer<T>> {
    FixedBuffer::zeroed(len, &SystemAllocator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_fixed_buffer_has_no_data_pointer_dereference() {
        let buf: FixedBuffer<i64> = zeroed_fixed(0).expect("alloc succeeds");
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.null_count(), 0);
    }

    #[test]
    fn is_null_mask_matches_bitmap() {
        let nulls = null_buffer_from_validity(&[true, false, true]);
        let mask = is_null_mask(nulls.as_ref(), 3);
        assert_eq!(mask, vec![0, 1, 0]);
    }

    #[test]
    fn is_null_mask_absent_bitmap_is_all_valid() {
        let mask = is_null_mask(None, 4);
        assert_eq!(mask, vec![0, 0, 0, 0]);
    }

    #[test]
    fn var_buffer_rejects_non_monotonic_offsets() {
        let offsets = ScalarBuffer::from(vec![0i32, 2, 1]);
        let data = ArrowBuffer::from(vec![0u8; 4]);
        let err = VarBuffer::try_new(offsets, data, None).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::InvalidOffset { .. }));
    }

    #[test]
    fn var_buffer_rejects_offset_past_data_len() {
        let offsets = ScalarBuffer::from(vec![0i32, 10]);
        let data = ArrowBuffer::from(vec![0u8; 4]);
        let err = VarBuffer::try_new(offsets, data, None).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::InvalidOffset { .. }));
    }
}
