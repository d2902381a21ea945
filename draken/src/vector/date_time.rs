//! `Date32Vector` and `Timestamp64Vector`.
//!
//! Both reuse the generic numeric kernels in [`super::numeric`] over
//! `i32`/`i64` directly rather than going through [`super::numeric::NumericVector`],
//! since their logical [`TypeTag`] (`Date32`, `Timestamp64`) differs from
//! the tag `i32`/`i64` report as bare [`crate::ptype::Numeric`] impls
//! (`Int32`, `Int64`). Neither type exposes `sum`: the core's reduction
//! contract reserves that kernel for integer archetypes, and a sum of
//! epoch days or epoch ticks is not a meaningful quantity.

use draken_error::DrakenResult;

use crate::buffer::{BitBuffer, FixedBuffer};
use crate::ptype::{TimeUnit, TypeTag};
use crate::vector::numeric::{self, CmpOp};

/// Days since the Unix epoch (1970-01-01), with no time-of-day
/// component.
#[derive(Clone, Debug)]
pub struct Date32Vector {
    data: FixedBuffer<i32>,
}

impl Date32Vector {
    /// Wraps an already-built buffer of epoch-day values.
    pub fn new(data: FixedBuffer<i32>) -> Self {
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

    /// Always [`TypeTag::Date32`].
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::Date32
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &FixedBuffer<i32> {
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

    /// Element-wise comparison against a scalar epoch-day value.
    pub fn compare_scalar(&self, rhs: i32, op: CmpOp) -> BitBuffer {
        numeric::compare_scalar(&self.data, rhs, op)
    }

    /// Element-wise comparison against another `Date32Vector`.
    pub fn compare_vector(&self, rhs: &Self, op: CmpOp) -> DrakenResult<BitBuffer> {
        numeric::compare_vector(&self.data, &rhs.data, op)
    }

    /// Gathers rows by index.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        Ok(Self::new(numeric::take(&self.data, indices)?))
    }

    /// Hashes every element.
    pub fn hash(&self) -> Vec<u64> {
        numeric::hash(&self.data)
    }

    /// The non-null minimum and maximum epoch-day values.
    pub fn min_max(&self) -> (Option<i32>, Option<i32>) {
        numeric::min_max(&self.data)
    }
}

/// A point in time since the Unix epoch, at a [`TimeUnit`] resolution.
///
/// Every instance reports the single stable [`TypeTag::Timestamp64`]
/// tag; the unit Arrow carried at import time (or `TimeUnit::Microsecond`
/// for natively constructed vectors) lives in the `unit` field instead
/// of fanning the tag out into one variant per resolution.
#[derive(Clone, Debug)]
pub struct Timestamp64Vector {
    data: FixedBuffer<i64>,
    unit: TimeUnit,
}

impl Timestamp64Vector {
    /// Wraps an already-built buffer of epoch-tick values at `unit`
    /// resolution.
    pub fn new(data: FixedBuffer<i64>, unit: TimeUnit) -> Self {
        Self { data, unit }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has zero elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Always [`TypeTag::Timestamp64`].
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::Timestamp64
    }

    /// The resolution of this vector's epoch-tick values.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &FixedBuffer<i64> {
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

    /// Element-wise comparison against a scalar epoch-tick value.
    ///
    /// Callers are responsible for converting `rhs` to this vector's
    /// [`TimeUnit`] before calling; the kernel does not rescale.
    pub fn compare_scalar(&self, rhs: i64, op: CmpOp) -> BitBuffer {
        numeric::compare_scalar(&self.data, rhs, op)
    }

    /// Element-wise comparison against another `Timestamp64Vector` at
    /// the same unit.
    pub fn compare_vector(&self, rhs: &Self, op: CmpOp) -> DrakenResult<BitBuffer> {
        numeric::compare_vector(&self.data, &rhs.data, op)
    }

    /// Gathers rows by index. The resulting vector keeps this vector's
    /// unit.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        Ok(Self::new(numeric::take(&self.data, indices)?, self.unit))
    }

    /// Hashes every element. Two timestamps at different units that
    /// denote the same instant hash differently, since the hash is taken
    /// over the stored tick count, not a normalized instant.
    pub fn hash(&self) -> Vec<u64> {
        numeric::hash(&self.data)
    }

    /// The non-null minimum and maximum epoch-tick values.
    pub fn min_max(&self) -> (Option<i64>, Option<i64>) {
        numeric::min_max(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::null_buffer_from_validity;

    use super::*;

    #[test]
    fn date32_reports_its_own_tag_not_int32() {
        let v = Date32Vector::new(FixedBuffer::new(vec![0i32].into(), None));
        assert_eq!(v.type_tag(), TypeTag::Date32);
    }

    #[test]
    fn timestamp_take_preserves_unit() {
        let data = FixedBuffer::new(vec![1i64, 2, 3].into(), null_buffer_from_validity(&[true, true, true]));
        let v = Timestamp64Vector::new(data, TimeUnit::Nanosecond);
        let taken = v.take(&[2, 0]).expect("in range");
        assert_eq!(taken.unit(), TimeUnit::Nanosecond);
        assert_eq!(taken.buffer().values(), &[3, 1]);
    }
}
