//! In-process conversion between [`Vector`] and `arrow_array::ArrayRef`.
//!
//! No FFI, no serialization — both sides already share the same
//! `arrow-buffer` buffer representation, so a conversion is a matter of
//! picking the right concrete Arrow array type and moving the
//! already-built buffers into (or out of) it. Grounded on
//! `vortex-array`'s `arrow/convert.rs`, which does the same
//! buffer-preserving round trip between `vortex-buffer` and
//! `arrow-buffer`.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Int16Array, Int32Array, Int64Array,
    Int8Array, LargeBinaryArray, LargeListArray, LargeStringArray, ListArray,
};
use arrow_buffer::{OffsetBuffer, ScalarBuffer};
use arrow_schema::{DataType, Field, TimeUnit as ArrowTimeUnit};
use draken_error::{draken_err, DrakenResult};

use crate::buffer::{FixedBuffer, VarBuffer};
use crate::ptype::TimeUnit;
use crate::vector::{
    ArrayVector, BoolVector, Date32Vector, Float32Vector, Float64Vector, ForeignArrowVector,
    Int16Vector, Int32Vector, Int64Vector, Int8Vector, StringVector, Timestamp64Vector, Vector,
};

type Float32Array = arrow_array::PrimitiveArray<arrow_array::types::Float32Type>;
type Float64Array = arrow_array::PrimitiveArray<arrow_array::types::Float64Type>;
type TimestampSecondArray = arrow_array::PrimitiveArray<arrow_array::types::TimestampSecondType>;
type TimestampMillisecondArray = arrow_array::PrimitiveArray<arrow_array::types::TimestampMillisecondType>;
type TimestampMicrosecondArray = arrow_array::PrimitiveArray<arrow_array::types::TimestampMicrosecondType>;
type TimestampNanosecondArray = arrow_array::PrimitiveArray<arrow_array::types::TimestampNanosecondType>;

fn arrow_unit(unit: TimeUnit) -> ArrowTimeUnit {
    match unit {
        TimeUnit::Second => ArrowTimeUnit::Second,
        TimeUnit::Millisecond => ArrowTimeUnit::Millisecond,
        TimeUnit::Microsecond => ArrowTimeUnit::Microsecond,
        TimeUnit::Nanosecond => ArrowTimeUnit::Nanosecond,
    }
}

fn draken_unit(unit: &ArrowTimeUnit) -> TimeUnit {
    match unit {
        ArrowTimeUnit::Second => TimeUnit::Second,
        ArrowTimeUnit::Millisecond => TimeUnit::Millisecond,
        ArrowTimeUnit::Microsecond => TimeUnit::Microsecond,
        ArrowTimeUnit::Nanosecond => TimeUnit::Nanosecond,
    }
}

/// Converts `vector` into an Arrow array, per the bridge's type mapping
/// table. Every native variant maps onto a concrete Arrow array type
/// sharing the same underlying buffers; [`Vector::NonNative`] returns
/// the wrapped array unchanged.
pub fn vector_to_arrow(vector: &Vector) -> DrakenResult<ArrayRef> {
    let array: ArrayRef = match vector {
        Vector::Int8(v) => Arc::new(Int8Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Int16(v) => Arc::new(Int16Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Int32(v) => Arc::new(Int32Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Int64(v) => Arc::new(Int64Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Float32(v) => Arc::new(Float32Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Float64(v) => Arc::new(Float64Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Date32(v) => Arc::new(Date32Array::new(v.buffer().as_scalar_buffer().clone(), v.buffer().nulls().cloned())),
        Vector::Timestamp64(v) => {
            let values = v.buffer().as_scalar_buffer().clone();
            let nulls = v.buffer().nulls().cloned();
            match v.unit() {
                TimeUnit::Second => Arc::new(TimestampSecondArray::new(values, nulls)) as ArrayRef,
                TimeUnit::Millisecond => Arc::new(TimestampMillisecondArray::new(values, nulls)) as ArrayRef,
                TimeUnit::Microsecond => Arc::new(TimestampMicrosecondArray::new(values, nulls)) as ArrayRef,
                TimeUnit::Nanosecond => Arc::new(TimestampNanosecondArray::new(values, nulls)) as ArrayRef,
            }
        }
        Vector::Bool(v) => Arc::new(BooleanArray::new(v.buffer().values().clone(), v.buffer().nulls().cloned())),
        Vector::String(v) => Arc::new(BinaryArray::new(
            v.buffer().offsets().clone(),
            v.buffer().data().clone(),
            v.buffer().nulls().cloned(),
        )),
        Vector::Array(v) => {
            let child_array = vector_to_arrow(v.child())?;
            let field = Arc::new(Field::new("item", child_array.data_type().clone(), true));
            let nulls = (0..v.len()).any(|i| v.is_null(i)).then(|| {
                arrow_buffer::NullBuffer::from_iter((0..v.len()).map(|i| !v.is_null(i)))
            });
            Arc::new(ListArray::new(field, v.offsets().clone(), child_array, nulls))
        }
        Vector::NonNative(v) => v.array().clone(),
    };
    log::trace!(
        "converted {} vector ({} rows) to arrow array of type {}",
        vector.type_tag(),
        vector.len(),
        array.data_type()
    );
    Ok(array)
}

/// Downcasts `array` to the concrete Arrow array type `A`, failing with
/// a [`draken_error::DrakenError`] instead of panicking when the data
/// type the caller already matched on turns out not to downcast (an
/// internal invariant violation, never expected in practice, but not a
/// panic-worthy one either).
fn downcast<'a, A: 'static>(array: &'a ArrayRef, what: &str) -> DrakenResult<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| draken_err!("arrow array reported a data type matching {what} but did not downcast to it"))
}

/// Narrows 64-bit offsets down to the core's 32-bit `VarBuffer`/
/// `ArrayVector` offset width, or `None` if any offset exceeds
/// `i32::MAX` (a column genuinely too large for this representation).
fn narrow_offsets(offsets: &OffsetBuffer<i64>) -> Option<ScalarBuffer<i32>> {
    offsets
        .iter()
        .map(|&o| i32::try_from(o).ok())
        .collect::<Option<Vec<i32>>>()
        .map(ScalarBuffer::from)
}

/// Imports `array` as a [`Vector`], per the bridge's type mapping table.
/// An array of a type the core doesn't model natively comes back as
/// [`Vector::NonNative`] rather than failing the import.
pub fn arrow_to_vector(array: &ArrayRef) -> DrakenResult<Vector> {
    let vector = match array.data_type() {
        DataType::Int8 => Vector::Int8(Int8Vector::new(primitive_buffer::<arrow_array::types::Int8Type>(array)?)),
        DataType::Int16 => Vector::Int16(Int16Vector::new(primitive_buffer::<arrow_array::types::Int16Type>(array)?)),
        DataType::Int32 => Vector::Int32(Int32Vector::new(primitive_buffer::<arrow_array::types::Int32Type>(array)?)),
        DataType::Int64 => Vector::Int64(Int64Vector::new(primitive_buffer::<arrow_array::types::Int64Type>(array)?)),
        DataType::Float32 => {
            Vector::Float32(Float32Vector::new(primitive_buffer::<arrow_array::types::Float32Type>(array)?))
        }
        DataType::Float64 => {
            Vector::Float64(Float64Vector::new(primitive_buffer::<arrow_array::types::Float64Type>(array)?))
        }
        DataType::Date32 => Vector::Date32(Date32Vector::new(primitive_buffer::<arrow_array::types::Date32Type>(array)?)),
        DataType::Timestamp(unit, _tz) => {
            let draken_unit = draken_unit(unit);
            let data = match unit {
                ArrowTimeUnit::Second => primitive_buffer::<arrow_array::types::TimestampSecondType>(array)?,
                ArrowTimeUnit::Millisecond => primitive_buffer::<arrow_array::types::TimestampMillisecondType>(array)?,
                ArrowTimeUnit::Microsecond => primitive_buffer::<arrow_array::types::TimestampMicrosecondType>(array)?,
                ArrowTimeUnit::Nanosecond => primitive_buffer::<arrow_array::types::TimestampNanosecondType>(array)?,
            };
            Vector::Timestamp64(Timestamp64Vector::new(data, draken_unit))
        }
        DataType::Boolean => {
            let a: &BooleanArray = downcast(array, "Boolean")?;
            Vector::Bool(BoolVector::new(crate::buffer::BitBuffer::new(a.values().clone(), a.nulls().cloned())))
        }
        DataType::Binary | DataType::Utf8 => {
            let var_buffer = binary_like_buffer(array)?;
            Vector::String(StringVector::new(var_buffer))
        }
        DataType::LargeBinary | DataType::LargeUtf8 => match large_binary_like_buffer(array)? {
            Some(var_buffer) => Vector::String(StringVector::new(var_buffer)),
            None => {
                log::warn!("large binary/string array exceeds the core's 32-bit offset range, importing as NonNative");
                Vector::NonNative(ForeignArrowVector::new(array.clone()))
            }
        },
        DataType::List(_) => {
            let a: &ListArray = downcast(array, "List")?;
            let child = arrow_to_vector(a.values())?;
            Vector::Array(ArrayVector::new(a.offsets().clone(), child, a.nulls().cloned()))
        }
        DataType::LargeList(_) => {
            let a: &LargeListArray = downcast(array, "LargeList")?;
            match narrow_offsets(a.offsets()) {
                Some(offsets) => {
                    let child = arrow_to_vector(a.values())?;
                    Vector::Array(ArrayVector::new(OffsetBuffer::new(offsets), child, a.nulls().cloned()))
                }
                None => {
                    log::warn!("large list array exceeds the core's 32-bit offset range, importing as NonNative");
                    Vector::NonNative(ForeignArrowVector::new(array.clone()))
                }
            }
        }
        other => {
            log::warn!("arrow type {other} has no native vector mapping, importing as NonNative");
            Vector::NonNative(ForeignArrowVector::new(array.clone()))
        }
    };
    Ok(vector)
}

fn primitive_buffer<T: arrow_array::ArrowPrimitiveType>(array: &ArrayRef) -> DrakenResult<FixedBuffer<T::Native>> {
    let a: &arrow_array::PrimitiveArray<T> = downcast(array, "the requested primitive type")?;
    Ok(FixedBuffer::new(a.values().clone(), a.nulls().cloned()))
}

fn binary_like_buffer(array: &ArrayRef) -> DrakenResult<VarBuffer> {
    if let Some(a) = array.as_any().downcast_ref::<BinaryArray>() {
        return Ok(VarBuffer::new(a.offsets().clone(), a.values().clone(), a.nulls().cloned()));
    }
    let a: &arrow_array::StringArray = downcast(array, "Utf8")?;
    Ok(VarBuffer::new(a.offsets().clone(), a.values().clone(), a.nulls().cloned()))
}

/// As [`binary_like_buffer`], but for the 64-bit-offset `LargeBinary`/
/// `LargeUtf8` arrays; `None` if any offset exceeds the core's 32-bit
/// `VarBuffer` representation.
fn large_binary_like_buffer(array: &ArrayRef) -> DrakenResult<Option<VarBuffer>> {
    if let Some(a) = array.as_any().downcast_ref::<LargeBinaryArray>() {
        return Ok(narrow_offsets(a.offsets())
            .map(|offsets| VarBuffer::new(OffsetBuffer::new(offsets), a.values().clone(), a.nulls().cloned())));
    }
    let a: &LargeStringArray = downcast(array, "LargeUtf8")?;
    Ok(narrow_offsets(a.offsets())
        .map(|offsets| VarBuffer::new(OffsetBuffer::new(offsets), a.values().clone(), a.nulls().cloned())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::null_buffer_from_validity;

    #[test]
    fn int32_round_trips_through_arrow() {
        let data = FixedBuffer::new(vec![1, 2, 3].into(), null_buffer_from_validity(&[true, false, true]));
        let vector = Vector::Int32(Int32Vector::new(data));
        let array = vector_to_arrow(&vector).expect("converts");
        let back = arrow_to_vector(&array).expect("converts back");
        assert_eq!(back.len(), 3);
        assert_eq!(back.null_count(), 1);
    }

    #[test]
    fn unrecognized_type_imports_as_non_native() {
        let array: ArrayRef = std::sync::Arc::new(arrow_array::UInt32Array::from(vec![1, 2, 3]));
        let v = arrow_to_vector(&array).expect("converts");
        assert!(matches!(v, Vector::NonNative(_)));
    }

    #[test]
    fn large_utf8_imports_as_string() {
        let array: ArrayRef = Arc::new(LargeStringArray::from(vec![Some("a"), None, Some("bb")]));
        let v = arrow_to_vector(&array).expect("converts");
        assert!(matches!(v, Vector::String(_)));
        assert_eq!(v.len(), 3);
        assert_eq!(v.null_count(), 1);
    }

    #[test]
    fn large_list_imports_as_array() {
        use arrow_array::builder::{Int32Builder, LargeListBuilder};

        let mut builder = LargeListBuilder::new(Int32Builder::new());
        builder.values().append_value(1);
        builder.values().append_value(2);
        builder.append(true);
        builder.values().append_value(3);
        builder.append(true);
        let array: ArrayRef = Arc::new(builder.finish());

        let v = arrow_to_vector(&array).expect("converts");
        assert!(matches!(v, Vector::Array(_)));
        assert_eq!(v.len(), 2);
    }
}
