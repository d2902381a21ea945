//! The allocator abstraction owned buffers are built from.
//!
//! Per the core's re-architecture guidance (treat allocation the same
//! way the bridge treats Arrow: as an injected dependency, not a direct
//! call into the global allocator), every owned buffer is grown through
//! an [`Allocator`] rather than reaching for `Vec::with_capacity`
//! directly. This keeps `OutOfMemory` a `Result`, not a process abort,
//! and leaves room for a future arena or pooled allocator without
//! touching kernel code.

use draken_error::{draken_err, DrakenResult};

/// Fallible byte-region allocation, used to back every owned buffer.
///
/// Implementations must return a region of exactly `nbytes`, zero-filled,
/// or fail with [`draken_error::DrakenError::OutOfMemory`]. A
/// zero-length request must succeed and return an empty region without
/// performing an allocation.
pub trait Allocator: Send + Sync {
    /// Allocates `nbytes` of zero-filled memory.
    fn alloc(&self, nbytes: usize) -> DrakenResult<Box<[u8]>>;

    /// Grows (or shrinks) `region` to `new_len` bytes, preserving its
    /// existing contents and zero-filling any newly added bytes.
    fn realloc(&self, region: Box<[u8]>, new_len: usize) -> DrakenResult<Box<[u8]>> {
        let mut bytes = Vec::from(region);
        bytes
            .try_reserve_exact(new_len.saturating_sub(bytes.len()))
            .map_err(|_| draken_err!(OutOfMemory: new_len))?;
        bytes.resize(new_len, 0);
        Ok(bytes.into_boxed_slice())
    }
}

/// An [`Allocator`] backed directly by Rust's global (system) allocator.
///
/// This is the only allocator the crate ships; it reports allocation
/// failure as [`draken_error::DrakenError::OutOfMemory`] instead of
/// aborting, using the fallible-reservation APIs on `Vec`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn alloc(&self, nbytes: usize) -> DrakenResult<Box<[u8]>> {
        if nbytes == 0 {
            return Ok(Box::new([]));
        }
        let mut bytes: Vec<u8> = Vec::new();
        bytes
            .try_reserve_exact(nbytes)
            .map_err(|_| draken_err!(OutOfMemory: nbytes))?;
        bytes.resize(nbytes, 0);
        Ok(bytes.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_alloc_is_empty_and_succeeds() {
        let region = SystemAllocator.alloc(0).expect("zero alloc succeeds");
        assert!(region.is_empty());
    }

    #[test]
    fn alloc_is_zero_filled() {
        let region = SystemAllocator.alloc(16).expect("alloc succeeds");
        assert_eq!(region.len(), 16);
        assert!(region.iter().all(|&b| b == 0));
    }

    #[test]
    fn realloc_preserves_prefix_and_zero_fills_suffix() {
        let mut region = SystemAllocator.alloc(4).expect("alloc succeeds");
        region.copy_from_slice(&[1, 2, 3, 4]);
        let grown = SystemAllocator.realloc(region, 8).expect("realloc succeeds");
        assert_eq!(&grown[..4], &[1, 2, 3, 4]);
        assert_eq!(&grown[4..], &[0, 0, 0, 0]);
    }
}
