//! `ForeignArrowVector`: the opaque fallback for an Arrow array whose
//! logical type the core does not model natively.
//!
//! Per the bridge's import contract, an Arrow array that isn't one of
//! the recognized primitive/binary/boolean/list shapes is kept as-is
//! behind this wrapper (tagged [`TypeTag::NonNative`]) rather than
//! rejected outright, so a morsel can still carry the column through a
//! pipeline that never inspects its values. This is the escape hatch:
//! every kernel delegates to generic `arrow-select`/`arrow-cast`
//! compute over the wrapped array instead of the type-specialized code
//! paths the native vectors use, so performance here is whatever the
//! generic Arrow kernels give you, not a guarantee.

use arrow_array::{ArrayRef, Int64Array};
use draken_error::{draken_err, DrakenResult};

use crate::hash::fnv1a;
use crate::ptype::TypeTag;
use crate::NULL_HASH;

/// A column Draken could not map to a native vector type, delegating
/// every kernel back to the wrapped Arrow array via generic Arrow
/// compute (`arrow_select::take`, `arrow_cast`'s value formatter).
#[derive(Clone, Debug)]
pub struct ForeignArrowVector {
    array: ArrayRef,
}

impl ForeignArrowVector {
    /// Wraps an Arrow array Draken has no native vector type for.
    pub fn new(array: ArrayRef) -> Self {
        Self { array }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the vector has zero elements.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Always [`TypeTag::NonNative`].
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::NonNative
    }

    /// The wrapped Arrow array.
    pub fn array(&self) -> &ArrayRef {
        &self.array
    }

    /// The number of null elements.
    pub fn null_count(&self) -> usize {
        self.array.null_count()
    }

    /// The per-position null mask (1 = null, 0 = valid).
    pub fn is_null_mask(&self) -> Vec<u8> {
        (0..self.array.len())
            .map(|i| u8::from(self.array.is_null(i)))
            .collect()
    }

    /// Gathers rows by index via `arrow_select::take`, the same generic
    /// gather kernel Arrow's own compute layer uses for any array type.
    ///
    /// Out-of-range indices are validated up front so the error matches
    /// every native vector's `IndexOutOfRange`, rather than surfacing
    /// whatever `arrow_select::take` itself would raise.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        for &idx in indices {
            if idx < 0 || idx as usize >= self.len() {
                return Err(draken_err!(IndexOutOfRange: idx, self.len()));
            }
        }
        let index_array = Int64Array::from(indices.to_vec());
        let taken = arrow_select::take::take(self.array.as_ref(), &index_array, None)?;
        Ok(Self::new(taken))
    }

    /// Hashes every element by formatting its Arrow display value and
    /// running FNV-1a over the resulting bytes; null positions hash to
    /// [`NULL_HASH`] without being formatted. Hash equality here only
    /// implies display equality, not bit-for-bit value equality — the
    /// best a type-opaque kernel can promise.
    pub fn hash(&self) -> DrakenResult<Vec<u64>> {
        (0..self.array.len())
            .map(|i| {
                if self.array.is_null(i) {
                    return Ok(NULL_HASH);
                }
                let rendered = arrow_cast::display::array_value_to_string(&self.array, i)?;
                Ok(fnv1a(rendered.as_bytes()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_array::Int32Array;

    use super::*;

    #[test]
    fn reports_foreign_array_length_and_nulls() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None, Some(3)]));
        let v = ForeignArrowVector::new(array);
        assert_eq!(v.len(), 3);
        assert_eq!(v.null_count(), 1);
        assert_eq!(v.is_null_mask(), vec![0, 1, 0]);
    }

    #[test]
    fn take_gathers_rows_through_generic_arrow_compute() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![10, 20, 30]));
        let v = ForeignArrowVector::new(array);
        let taken = v.take(&[2, 0]).expect("in range");
        let taken = taken.array().as_any().downcast_ref::<Int32Array>().expect("still Int32");
        assert_eq!(taken.values(), &[30, 10]);
    }

    #[test]
    fn take_rejects_out_of_range_index() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        let v = ForeignArrowVector::new(array);
        let err = v.take(&[5]).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::IndexOutOfRange { .. }));
    }

    #[test]
    fn hash_treats_null_rows_as_null_hash_and_distinguishes_values() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None, Some(2)]));
        let v = ForeignArrowVector::new(array);
        let hashes = v.hash().expect("display-formats cleanly");
        assert_eq!(hashes[1], NULL_HASH);
        assert_ne!(hashes[0], hashes[2]);
    }
}
