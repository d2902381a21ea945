//! `StringVector` and its builder.
//!
//! Grounded on `vortex-array`'s `VarBinArray`/`VarBinBuilder`: a
//! variable-width vector is an offsets buffer plus a single packed data
//! buffer, and a builder accumulates into growable scratch vectors
//! before freezing them into the immutable buffer shapes the rest of
//! the crate works with.
//!
//! Values are treated as opaque bytes by every kernel; UTF-8-ness is a
//! convention callers rely on (e.g. before calling [`StringVector::uppercase`]
//! on text), not something the vector itself validates.

use draken_error::{draken_err, DrakenResult};

use crate::buffer::{null_buffer_from_validity, BitBuffer, VarBuffer};
use crate::hash::fnv1a;
use crate::ptype::TypeTag;
use crate::NULL_HASH;

/// A variable-width byte-sequence vector, UTF-8 by convention.
///
/// Exported to Arrow as a binary array (not a UTF-8 string array): the
/// core makes no validation guarantee over the bytes it stores, so
/// claiming the stricter Arrow `Utf8` layout at the bridge would be
/// asserting something this type never checked.
#[derive(Clone, Debug)]
pub struct StringVector {
    data: VarBuffer,
}

impl StringVector {
    /// Wraps an already-built variable-width buffer.
    pub fn new(data: VarBuffer) -> Self {
        Self { data }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has zero elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Always [`TypeTag::String`].
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::String
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &VarBuffer {
        &self.data
    }

    /// The number of null elements.
    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    /// The per-position null mask (1 = null, 0 = valid).
    pub fn is_null_mask(&self) -> Vec<u8> {
        crate::buffer::is_null_mask(self.data.nulls(), self.data.len())
    }

    /// The raw bytes at position `i`, irrespective of validity.
    pub fn value(&self, i: usize) -> &[u8] {
        self.data.value(i)
    }

    /// Element-wise equality against a scalar byte string. A null
    /// element always compares `false`.
    pub fn equals(&self, rhs: &[u8]) -> BitBuffer {
        let bits: Vec<bool> = (0..self.len())
            .map(|i| !self.data.is_null(i) && self.data.value(i) == rhs)
            .collect();
        BitBuffer::new(bits.into(), None)
    }

    /// Gathers rows by index, preserving each source row's byte range
    /// and validity rather than collapsing a taken null row to a
    /// zero-length value.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        for &idx in indices {
            if idx < 0 || idx as usize >= self.len() {
                return Err(draken_err!(IndexOutOfRange: idx, self.len()));
            }
        }
        let total_bytes: usize = indices.iter().map(|&idx| self.data.value(idx as usize).len()).sum();
        let mut builder = StringVectorBuilder::with_counts(indices.len(), total_bytes);
        for &idx in indices {
            let i = idx as usize;
            if self.data.is_null(i) {
                builder.append_null_preserving(self.data.value(i))?;
            } else {
                builder.append(self.data.value(i))?;
            }
        }
        builder.finish()
    }

    /// Hashes every element with FNV-1a over its raw bytes; null
    /// positions hash to [`NULL_HASH`].
    pub fn hash(&self) -> Vec<u64> {
        (0..self.len())
            .map(|i| {
                if self.data.is_null(i) {
                    NULL_HASH
                } else {
                    fnv1a(self.data.value(i))
                }
            })
            .collect()
    }

    /// Returns a new vector with every non-null value ASCII-uppercased.
    /// Null rows stay null. Byte length is unchanged, so non-ASCII UTF-8
    /// bytes pass through untouched rather than being corrupted.
    pub fn uppercase(&self) -> DrakenResult<Self> {
        let mut builder = StringVectorBuilder::with_estimate(self.len(), self.data.data().len());
        for i in 0..self.len() {
            if self.data.is_null(i) {
                builder.append_null()?;
            } else {
                let upper: Vec<u8> = self.data.value(i).iter().map(u8::to_ascii_uppercase).collect();
                builder.append(&upper)?;
            }
        }
        builder.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Fresh,
    Building,
    Finished,
}

/// The row/byte counts a builder was told to expect at construction,
/// checked by [`StringVectorBuilder::finish`] when present.
#[derive(Debug, Clone, Copy)]
struct Expectation {
    rows: usize,
    bytes: Option<usize>,
}

/// Accumulates a [`StringVector`] value by value.
///
/// Follows a `Fresh -> Building -> Finished` lifecycle. Every mutating
/// method fails with [`draken_error::DrakenError::BuilderClosed`] once
/// [`StringVectorBuilder::finish`] has been called — the builder stays
/// around afterward (rather than being consumed) precisely so that a
/// caller holding onto it after `finish` observes that error instead of
/// a compile-time move failure, matching the core's runtime invalidation
/// contract for builders.
pub struct StringVectorBuilder {
    state: BuilderState,
    offsets: Vec<i32>,
    data: Vec<u8>,
    valid: Vec<bool>,
    expect: Option<Expectation>,
}

impl StringVectorBuilder {
    /// Starts empty, with no capacity pre-reserved and no row/byte count
    /// enforced at `finish`.
    pub fn new() -> Self {
        Self {
            state: BuilderState::Fresh,
            offsets: vec![0],
            data: Vec::new(),
            valid: Vec::new(),
            expect: None,
        }
    }

    /// Pre-reserves capacity for exactly `row_count` rows totalling
    /// exactly `total_bytes` of payload. [`Self::finish`] fails with
    /// `Incomplete` if fewer than `row_count` rows were appended, or
    /// `CapacityMismatch` if the bytes written don't match
    /// `total_bytes`.
    pub fn with_counts(row_count: usize, total_bytes: usize) -> Self {
        let mut offsets = Vec::with_capacity(row_count + 1);
        offsets.push(0);
        Self {
            state: BuilderState::Fresh,
            offsets,
            data: Vec::with_capacity(total_bytes),
            valid: Vec::with_capacity(row_count),
            expect: Some(Expectation {
                rows: row_count,
                bytes: Some(total_bytes),
            }),
        }
    }

    /// Pre-reserves capacity for `row_count` rows and `byte_estimate`
    /// bytes of payload, when the exact total isn't known. Unlike
    /// [`Self::with_counts`], `finish` does not enforce the byte count,
    /// only the row count.
    pub fn with_estimate(row_count: usize, byte_estimate: usize) -> Self {
        let mut b = Self::with_counts(row_count, byte_estimate);
        if let Some(expect) = b.expect.as_mut() {
            expect.bytes = None;
        }
        b
    }

    fn check_open(&mut self) -> DrakenResult<()> {
        if self.state == BuilderState::Finished {
            return Err(draken_err!(BuilderClosed));
        }
        self.state = BuilderState::Building;
        Ok(())
    }

    /// Appends a valid value.
    pub fn append(&mut self, value: &[u8]) -> DrakenResult<()> {
        self.check_open()?;
        self.data.extend_from_slice(value);
        self.offsets.push(self.data.len() as i32);
        self.valid.push(true);
        Ok(())
    }

    /// Appends a null with no backing bytes.
    pub fn append_null(&mut self) -> DrakenResult<()> {
        self.check_open()?;
        self.offsets.push(self.data.len() as i32);
        self.valid.push(false);
        Ok(())
    }

    /// Appends a null that still carries `value`'s bytes in the data
    /// buffer, matching the core's [`StringVector::take`] contract of
    /// preserving source byte ranges for taken null rows.
    fn append_null_preserving(&mut self, value: &[u8]) -> DrakenResult<()> {
        self.check_open()?;
        self.data.extend_from_slice(value);
        self.offsets.push(self.data.len() as i32);
        self.valid.push(false);
        Ok(())
    }

    /// Appends a value read from a raw pointer and length.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes and the memory it
    /// addresses must not be mutated for the duration of this call.
    pub unsafe fn append_raw(&mut self, ptr: *const u8, len: usize) -> DrakenResult<()> {
        let slice = unsafe { std::slice::from_raw_parts(ptr, len) };
        self.append(slice)
    }

    /// Overwrites row `i`'s validity bit without altering its bytes.
    pub fn set_null(&mut self, i: usize) -> DrakenResult<()> {
        self.check_open()?;
        if i >= self.valid.len() {
            return Err(draken_err!(IndexOutOfRange: i, self.valid.len()));
        }
        self.valid[i] = false;
        Ok(())
    }

    /// Overwrites every row's validity bit from `mask`.
    pub fn set_validity_mask(&mut self, mask: &[bool]) -> DrakenResult<()> {
        self.check_open()?;
        if mask.len() != self.valid.len() {
            return Err(draken_err!(LengthMismatch: mask.len(), self.valid.len(), "set_validity_mask"));
        }
        self.valid.copy_from_slice(mask);
        Ok(())
    }

    /// Freezes the builder into an immutable [`StringVector`], checking
    /// any row/byte count declared at construction.
    ///
    /// After this call succeeds, every further mutating call on this
    /// builder fails with `BuilderClosed`; calling `finish` itself again
    /// also fails with `BuilderClosed`.
    pub fn finish(&mut self) -> DrakenResult<StringVector> {
        if self.state == BuilderState::Finished {
            return Err(draken_err!(BuilderClosed));
        }
        if let Some(expect) = self.expect {
            if self.valid.len() != expect.rows {
                return Err(draken_err!(Incomplete: self.valid.len(), expect.rows));
            }
            if let Some(expected_bytes) = expect.bytes {
                if self.data.len() != expected_bytes {
                    return Err(draken_err!(CapacityMismatch: expected_bytes, self.data.len()));
                }
            }
        }
        self.state = BuilderState::Finished;
        let offsets = arrow_buffer::ScalarBuffer::from(std::mem::take(&mut self.offsets));
        let data = arrow_buffer::Buffer::from(std::mem::take(&mut self.data));
        let nulls = null_buffer_from_validity(&std::mem::take(&mut self.valid));
        Ok(StringVector::new(VarBuffer::new(arrow_buffer::OffsetBuffer::new(offsets), data, nulls)))
    }
}

impl Default for StringVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_finish_round_trips_values_and_nulls() {
        let mut b = StringVectorBuilder::with_counts(3, 6);
        b.append(b"foo").expect("open");
        b.append_null().expect("open");
        b.append(b"bar").expect("open");
        let v = b.finish().expect("counts match");
        assert_eq!(v.len(), 3);
        assert_eq!(v.value(0), b"foo");
        assert!(v.is_null_mask()[1] == 1);
        assert_eq!(v.value(2), b"bar");
    }

    #[test]
    fn append_after_finish_fails_with_builder_closed() {
        let mut b = StringVectorBuilder::new();
        b.append(b"x").expect("open");
        b.finish().expect("finishes");
        let err = b.append(b"y").unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::BuilderClosed));
        let err = b.finish().unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::BuilderClosed));
    }

    #[test]
    fn finish_before_declared_row_count_is_incomplete() {
        let mut b = StringVectorBuilder::with_counts(2, 10);
        b.append(b"only-one").expect("open");
        let err = b.finish().unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::Incomplete { .. }));
    }

    #[test]
    fn finish_with_wrong_byte_total_is_capacity_mismatch() {
        let mut b = StringVectorBuilder::with_counts(1, 99);
        b.append(b"abc").expect("open");
        let err = b.finish().unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::CapacityMismatch { .. }));
    }

    #[test]
    fn take_preserves_null_row_byte_ranges() {
        let mut b = StringVectorBuilder::new();
        b.append(b"hello").expect("open");
        b.append_null().expect("open");
        let v = b.finish().expect("no declared counts to violate");
        let taken = v.take(&[1, 0]).expect("in range");
        assert!(taken.is_null_mask()[0] == 1);
        assert_eq!(taken.value(1), b"hello");
    }

    #[test]
    fn uppercase_preserves_nulls_and_length() {
        let mut b = StringVectorBuilder::new();
        b.append(b"abc").expect("open");
        b.append_null().expect("open");
        let v = b.finish().expect("no declared counts to violate").uppercase().expect("uppercase succeeds");
        assert_eq!(v.value(0), b"ABC");
        assert!(v.is_null_mask()[1] == 1);
    }

    #[test]
    fn equals_treats_null_as_false() {
        let mut b = StringVectorBuilder::new();
        b.append(b"x").expect("open");
        b.append_null().expect("open");
        let v = b.finish().expect("no declared counts to violate");
        let result = v.equals(b"x");
        assert!(result.value(0));
        assert!(!result.value(1));
    }
}
