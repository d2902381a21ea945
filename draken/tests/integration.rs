//! End-to-end scenarios spanning buffer -> vector -> morsel -> Arrow,
//! following the core specification's own worked examples.

use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, StringArray};
use draken::buffer::{null_buffer_from_validity, FixedBuffer};
use draken::vector::numeric::CmpOp;
use draken::vector::{BoolVector, Int64Vector, StringVectorBuilder, Vector};
use draken::{Morsel, RenameSpec, NULL_HASH};

fn sample_morsel() -> Morsel {
    let x: ArrayRef = Arc::new(Int64Array::from(vec![Some(1), Some(2), Some(3), None, Some(5)]));
    let y: ArrayRef = Arc::new(StringArray::from(vec![Some("a"), Some("bb"), Some(""), Some("ccc"), None]));
    let schema = Arc::new(arrow_schema::Schema::new(vec![
        arrow_schema::Field::new("x", arrow_schema::DataType::Int64, true),
        arrow_schema::Field::new("y", arrow_schema::DataType::Utf8, true),
    ]));
    let batch = arrow_array::RecordBatch::try_new(schema, vec![x, y]).expect("schema matches columns");
    Morsel::from_table(&batch, true).expect("non-empty table imports cleanly")
}

#[test]
fn scenario_1_build_from_arrow_table() {
    let m = sample_morsel();
    assert_eq!(m.shape(), (5, 2));
    assert_eq!(m.column("x").unwrap().null_count(), 1);
    let y_hashes = m.column("y").unwrap().hash().expect("string supports hash");
    assert_eq!(y_hashes[4], NULL_HASH);
}

#[test]
fn scenario_2_take_reindexes_every_column() {
    let m = sample_morsel();
    let taken = m.take(&[4, 0, 3]).expect("in range");
    assert_eq!(taken.shape(), (3, 2));

    let x_arrow = taken.column("x").unwrap().to_arrow().expect("converts");
    let x_arrow = x_arrow.as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(x_arrow.value(0), 5);
    assert_eq!(x_arrow.value(1), 1);
    assert!(x_arrow.is_null(2));

    let y_arrow = taken.column("y").unwrap().to_arrow().expect("converts");
    let y_arrow = y_arrow.as_any().downcast_ref::<arrow_array::BinaryArray>().unwrap();
    assert!(y_arrow.is_null(0));
    assert_eq!(y_arrow.value(1), b"a");
    assert_eq!(y_arrow.value(2), b"ccc");
}

#[test]
fn scenario_3_select_then_rename() {
    let m = sample_morsel();
    let projected = m.select(&["y"]).expect("y exists");
    assert_eq!(projected.num_columns(), 1);
    let renamed = projected.rename(&RenameSpec::List(vec!["s".to_string()])).expect("one name for one column");
    assert_eq!(renamed.column_names(), &["s".to_string()]);
    assert_eq!(renamed.column("s").unwrap().len(), 5);
}

#[test]
fn scenario_4_integer_comparisons() {
    let data = FixedBuffer::new(vec![1i64, 2, 3, 4, 5].into(), None);
    let v = Int64Vector::new(data);

    let gt3 = v.compare_scalar(3, CmpOp::Gt);
    let bits: Vec<u8> = (0..5).map(|i| u8::from(gt3.value(i))).collect();
    assert_eq!(bits, vec![0, 0, 0, 1, 1]);

    let rhs = Int64Vector::new(FixedBuffer::new(vec![0i64, 2, 4, 4, 4].into(), None));
    let gt_vec = v.compare_vector(&rhs, CmpOp::Gt).expect("equal length");
    let bits: Vec<u8> = (0..5).map(|i| u8::from(gt_vec.value(i))).collect();
    assert_eq!(bits, vec![1, 0, 0, 0, 1]);
}

#[test]
fn scenario_5_bool_take_produces_packed_bits() {
    use arrow_buffer::BooleanBuffer;

    let values = BooleanBuffer::from(vec![true, false, true, true, false, false, true, false, true]);
    let v = BoolVector::new(draken::buffer::BitBuffer::new(values, None));
    let taken = v.take(&[8, 0, 1]).expect("in range");
    assert_eq!(taken.len(), 3);
    let bits: Vec<bool> = (0..3).map(|i| taken.buffer().value(i)).collect();
    assert_eq!(bits, vec![true, true, false]);
}

#[test]
fn scenario_6_string_builder_lifecycle() {
    let mut builder = StringVectorBuilder::with_counts(3, 6);
    builder.append(b"ab").expect("builder open");
    builder.append(b"").expect("builder open");
    builder.append(b"cdef").expect("builder open");
    let v = builder.finish().expect("counts matched");

    let arrow = Vector::String(v).to_arrow().expect("converts");
    let arrow = arrow.as_any().downcast_ref::<arrow_array::BinaryArray>().unwrap();
    assert_eq!(arrow.value(0), b"ab");
    assert_eq!(arrow.value(1), b"");
    assert_eq!(arrow.value(2), b"cdef");

    let err = builder.append(b"x").unwrap_err();
    assert!(matches!(err, draken::DrakenError::BuilderClosed));
}

#[test]
fn morsel_take_round_trips_through_arrow_under_a_permutation() {
    let m = sample_morsel();
    let permuted = m.take(&[3, 1, 4, 0, 2]).expect("in range");
    let batch = permuted.to_arrow().expect("converts");
    assert_eq!(batch.num_rows(), 5);
    assert_eq!(batch.num_columns(), 2);
}

#[test]
fn zero_length_vector_kernels_all_succeed() {
    let data: FixedBuffer<i64> = FixedBuffer::new(Vec::<i64>::new().into(), None);
    let v = Int64Vector::new(data);
    assert_eq!(v.len(), 0);
    assert!(v.take(&[]).expect("empty take succeeds").is_empty());
    assert!(v.hash().is_empty());
    assert_eq!(v.min_max(), (None, None));
}

#[test]
fn ffi_round_trip_preserves_nulls() {
    let data = FixedBuffer::new(vec![1, 2, 3].into(), null_buffer_from_validity(&[true, false, true]));
    let vector = Vector::Int32(draken::vector::numeric::Int32Vector::new(data));
    let handle = draken::arrow_bridge::export_to_raw(&vector).expect("export succeeds");
    let (mut array, schema) = handle.into_raw();
    let imported = unsafe { draken::arrow_bridge::import_from_raw(&mut array, &schema) }.expect("import succeeds");
    assert_eq!(imported.len(), 3);
    assert_eq!(imported.null_count(), 1);
}
