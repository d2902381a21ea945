//! `BoolVector`: a bit-packed boolean column with short-circuiting
//! `any`/`all` reductions.

use arrow_buffer::BooleanBuffer;
use draken_error::{draken_err, DrakenResult};

use crate::buffer::{null_buffer_from_validity, BitBuffer};
use crate::hash::fnv1a;
use crate::ptype::TypeTag;
use crate::NULL_HASH;

/// The three binary boolean operators the dispatch contract (§4.5)
/// names: `and`, `or`, `xor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Xor,
}

impl BoolOp {
    fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BoolOp::And => lhs && rhs,
            BoolOp::Or => lhs || rhs,
            BoolOp::Xor => lhs ^ rhs,
        }
    }
}

/// A bit-packed boolean vector.
#[derive(Clone, Debug)]
pub struct BoolVector {
    data: BitBuffer,
}

impl BoolVector {
    /// Wraps an already-built bit buffer.
    pub fn new(data: BitBuffer) -> Self {
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

    /// Always [`TypeTag::Bool`].
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::Bool
    }

    /// The underlying bit buffer.
    pub fn buffer(&self) -> &BitBuffer {
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

    /// Element-wise equality against a scalar boolean. A null element
    /// always compares `false`, matching every other vector type's
    /// comparison contract.
    pub fn equals(&self, rhs: bool) -> BitBuffer {
        let bits: Vec<bool> = (0..self.len())
            .map(|i| !self.data.is_null(i) && self.data.value(i) == rhs)
            .collect();
        BitBuffer::new(BooleanBuffer::from(bits), None)
    }

    /// Gathers rows by index.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        let mut values = Vec::with_capacity(indices.len());
        let mut valid = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx < 0 || idx as usize >= self.len() {
                return Err(draken_err!(IndexOutOfRange: idx, self.len()));
            }
            let i = idx as usize;
            values.push(self.data.value(i));
            valid.push(!self.data.is_null(i));
        }
        Ok(Self::new(BitBuffer::new(
            BooleanBuffer::from(values),
            null_buffer_from_validity(&valid),
        )))
    }

    /// Hashes every element; null positions hash to [`NULL_HASH`],
    /// `true`/`false` hash to distinct single-byte FNV-1a digests.
    pub fn hash(&self) -> Vec<u64> {
        (0..self.len())
            .map(|i| {
                if self.data.is_null(i) {
                    NULL_HASH
                } else {
                    fnv1a(&[u8::from(self.data.value(i))])
                }
            })
            .collect()
    }

    /// Whether any non-null element is `true`. `false` for an
    /// all-null or empty vector. Short-circuits on the first `true`.
    pub fn any(&self) -> bool {
        (0..self.len()).any(|i| !self.data.is_null(i) && self.data.value(i))
    }

    /// Whether every non-null element is `true`. `true` for an all-null
    /// or empty vector (vacuous truth). Short-circuits on the first
    /// non-null `false`.
    pub fn all(&self) -> bool {
        (0..self.len()).all(|i| self.data.is_null(i) || self.data.value(i))
    }

    /// Applies `op` between every element and the scalar `rhs`. Unlike
    /// [`Self::equals`], a null source element stays null — `and`/`or`/
    /// `xor` are arithmetic-like operators, not the core's uniform
    /// null-compares-false comparison contract.
    pub fn combine_scalar(&self, rhs: bool, op: BoolOp) -> Self {
        let bits: Vec<bool> = (0..self.len()).map(|i| op.apply(self.data.value(i), rhs)).collect();
        let valid: Vec<bool> = (0..self.len()).map(|i| !self.data.is_null(i)).collect();
        Self::new(BitBuffer::new(BooleanBuffer::from(bits), null_buffer_from_validity(&valid)))
    }

    /// Applies `op` element-wise between `self` and `rhs`.
    ///
    /// Fails with [`draken_error::DrakenError::LengthMismatch`] when the
    /// two vectors don't have the same length. A null on either side
    /// produces a null result.
    pub fn combine_vector(&self, rhs: &Self, op: BoolOp) -> DrakenResult<Self> {
        if self.len() != rhs.len() {
            return Err(draken_err!(LengthMismatch: self.len(), rhs.len(), "vector boolean op"));
        }
        let bits: Vec<bool> = (0..self.len())
            .map(|i| op.apply(self.data.value(i), rhs.data.value(i)))
            .collect();
        let valid: Vec<bool> = (0..self.len())
            .map(|i| !self.data.is_null(i) && !rhs.data.is_null(i))
            .collect();
        Ok(Self::new(BitBuffer::new(
            BooleanBuffer::from(bits),
            null_buffer_from_validity(&valid),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[bool], valid: &[bool]) -> BoolVector {
        BoolVector::new(BitBuffer::new(
            BooleanBuffer::from(values.to_vec()),
            null_buffer_from_validity(valid),
        ))
    }

    #[test]
    fn any_short_circuits_true_ignoring_trailing_nulls() {
        let v = vector(&[false, true, false], &[true, true, false]);
        assert!(v.any());
    }

    #[test]
    fn all_true_vacuously_when_every_element_null() {
        let v = vector(&[false, false], &[false, false]);
        assert!(v.all());
        assert!(!v.any());
    }

    #[test]
    fn equals_treats_null_as_false() {
        let v = vector(&[true, true], &[true, false]);
        let result = v.equals(true);
        assert!(result.value(0));
        assert!(!result.value(1));
        assert_eq!(result.null_count(), 0);
    }

    #[test]
    fn take_rejects_out_of_range_index() {
        let v = vector(&[true, false], &[true, true]);
        let err = v.take(&[5]).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::IndexOutOfRange { .. }));
    }

    #[test]
    fn combine_vector_applies_and_or_xor() {
        let a = vector(&[true, true, false, false], &[true, true, true, true]);
        let b = vector(&[true, false, true, false], &[true, true, true, true]);

        let and = a.combine_vector(&b, BoolOp::And).expect("equal length");
        let or = a.combine_vector(&b, BoolOp::Or).expect("equal length");
        let xor = a.combine_vector(&b, BoolOp::Xor).expect("equal length");

        assert_eq!((0..4).map(|i| and.data.value(i)).collect::<Vec<_>>(), vec![true, false, false, false]);
        assert_eq!((0..4).map(|i| or.data.value(i)).collect::<Vec<_>>(), vec![true, true, true, false]);
        assert_eq!((0..4).map(|i| xor.data.value(i)).collect::<Vec<_>>(), vec![false, true, true, false]);
    }

    #[test]
    fn combine_vector_nulls_if_either_side_null() {
        let a = vector(&[true, true], &[true, false]);
        let b = vector(&[true, true], &[false, true]);
        let result = a.combine_vector(&b, BoolOp::And).expect("equal length");
        assert!(result.data.is_null(0));
        assert!(result.data.is_null(1));
    }

    #[test]
    fn combine_vector_rejects_length_mismatch() {
        let a = vector(&[true], &[true]);
        let b = vector(&[true, false], &[true, true]);
        let err = a.combine_vector(&b, BoolOp::Or).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::LengthMismatch { .. }));
    }

    #[test]
    fn combine_scalar_preserves_null_rows() {
        let a = vector(&[true, true], &[true, false]);
        let result = a.combine_scalar(true, BoolOp::And);
        assert!(!result.data.is_null(0));
        assert!(result.data.is_null(1));
    }
}
