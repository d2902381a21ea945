//! `Morsel`: a named, typed, equal-row-count group of [`Vector`] columns
//! — the batch unit operator code passes between pipeline stages.
//!
//! Grounded on `vortex-array`'s `StructArray`: a morsel is exactly that
//! shape (named fields sharing one row count) with the construction-time
//! validation `StructArray::try_new` performs (reject mismatched field
//! lengths, reject duplicate names) carried over unchanged.

use std::collections::HashMap;

use draken_error::{draken_err, DrakenResult};

use crate::ptype::TypeTag;
use crate::vector::Vector;

/// A single extracted cell value, for [`Morsel::row`]. Carries no
/// reference back into the source vector, so it's safe to hold after
/// the morsel it came from is mutated or dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Date32(i32),
    Timestamp64(i64),
    Bool(bool),
    String(Vec<u8>),
    Array(Vec<RowValue>),
    /// A cell from a [`Vector::NonNative`] column, rendered through
    /// Arrow's generic value formatter.
    Foreign(String),
}

/// The two ways [`Morsel::rename`] accepts a set of new column names.
#[derive(Debug, Clone)]
pub enum RenameSpec {
    /// An ordered replacement name for every column, positionally.
    List(Vec<String>),
    /// A sparse old-name-to-new-name mapping; names absent from the map
    /// are left unchanged.
    Mapping(HashMap<String, String>),
}

/// A named, typed, equal-row-count group of columns.
#[derive(Clone, Debug)]
pub struct Morsel {
    names: Vec<String>,
    columns: Vec<Vector>,
    num_rows: usize,
}

impl Morsel {
    /// Builds a morsel from named, already-constructed columns,
    /// validating that every column has the same row count and that no
    /// name repeats.
    ///
    /// An empty `columns` list produces a zero-column, zero-row morsel.
    /// Internal building block for [`Self::take`], [`Self::select`], and
    /// [`Self::rename`]; the public, spec-facing constructor from an
    /// Arrow table is [`Self::from_table`].
    fn from_columns(columns: Vec<(String, Vector)>) -> DrakenResult<Self> {
        let num_rows = columns.first().map_or(0, |(_, v)| v.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        for (name, vector) in columns {
            if vector.len() != num_rows {
                return Err(draken_err!(LengthMismatch: num_rows, vector.len(), "morsel column"));
            }
            if names.contains(&name) {
                return Err(draken_err!("duplicate column name {name:?}"));
            }
            names.push(name);
            cols.push(vector);
        }
        Ok(Self {
            names,
            columns: cols,
            num_rows,
        })
    }

    /// Builds a morsel from an Arrow table, importing each column
    /// through the Arrow bridge and snapshotting `num_rows` and column
    /// names from the table's schema.
    ///
    /// Fails with [`draken_error::DrakenError::EmptySchema`] when
    /// `strict` is set and `table` has zero columns; a non-strict call
    /// against a zero-column table produces a legal zero-column,
    /// zero-row morsel.
    pub fn from_table(table: &arrow_array::RecordBatch, strict: bool) -> DrakenResult<Self> {
        let schema = table.schema();
        if strict && schema.fields().is_empty() {
            return Err(draken_err!(EmptySchema));
        }
        let columns = schema
            .fields()
            .iter()
            .zip(table.columns())
            .map(|(field, array)| Ok((field.name().clone(), Vector::from_arrow(array)?)))
            .collect::<DrakenResult<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// The column named `name`.
    pub fn column(&self, name: &str) -> DrakenResult<&Vector> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| draken_err!(ColumnNotFound: name.as_bytes()))
    }

    /// `(num_rows, num_columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_columns())
    }

    /// The number of rows every column shares.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// The number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The column names, in definition order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// The column types, in definition order.
    pub fn column_types(&self) -> Vec<TypeTag> {
        self.columns.iter().map(Vector::type_tag).collect()
    }

    /// Extracts row `i` as one [`RowValue`] per column, in column order.
    ///
    /// # Errors
    ///
    /// Returns [`draken_error::DrakenError::IndexOutOfRange`] if `i` is
    /// past the last row.
    pub fn row(&self, i: usize) -> DrakenResult<Vec<RowValue>> {
        if i >= self.num_rows {
            return Err(draken_err!(IndexOutOfRange: i as i64, self.num_rows));
        }
        self.columns.iter().map(|v| row_value(v, i)).collect()
    }

    /// Gathers rows by index across every column, producing a new morsel
    /// with `indices.len()` rows and the same columns.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        let columns = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, v)| Ok((name.clone(), v.take(indices)?)))
            .collect::<DrakenResult<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Projects this morsel down to the named columns, in the order
    /// requested, discarding the rest.
    pub fn select(&self, names: &[&str]) -> DrakenResult<Self> {
        let columns = names
            .iter()
            .map(|&name| Ok((name.to_string(), self.column(name)?.clone())))
            .collect::<DrakenResult<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Renames this morsel's columns, producing a new morsel with the
    /// same vector handles and column order but new names.
    ///
    /// [`RenameSpec::List`] supplies an ordered replacement name for
    /// every column and must have exactly [`Self::num_columns`] entries
    /// (otherwise [`draken_error::DrakenError::LengthMismatch`]).
    /// [`RenameSpec::Mapping`] renames only the columns it names,
    /// leaving every other column's name unchanged.
    pub fn rename(&self, spec: &RenameSpec) -> DrakenResult<Self> {
        let names = match spec {
            RenameSpec::List(list) => {
                if list.len() != self.num_columns() {
                    return Err(draken_err!(LengthMismatch: list.len(), self.num_columns(), "rename"));
                }
                list.clone()
            }
            RenameSpec::Mapping(mapping) => self
                .names
                .iter()
                .map(|name| mapping.get(name).cloned().unwrap_or_else(|| name.clone()))
                .collect(),
        };
        Ok(Self {
            names,
            columns: self.columns.clone(),
            num_rows: self.num_rows,
        })
    }

    /// Converts every column to an Arrow array and assembles them into
    /// an Arrow `RecordBatch`.
    pub fn to_arrow(&self) -> DrakenResult<arrow_array::RecordBatch> {
        let arrays = self
            .columns
            .iter()
            .map(Vector::to_arrow)
            .collect::<DrakenResult<Vec<_>>>()?;
        let fields: Vec<arrow_schema::FieldRef> = self
            .names
            .iter()
            .zip(&arrays)
            .map(|(name, array)| std::sync::Arc::new(arrow_schema::Field::new(name, array.data_type().clone(), true)))
            .collect();
        let schema = std::sync::Arc::new(arrow_schema::Schema::new(fields));
        Ok(arrow_array::RecordBatch::try_new(schema, arrays)?)
    }
}

fn row_value(vector: &Vector, i: usize) -> DrakenResult<RowValue> {
    if vector.is_null_mask().get(i).copied() == Some(1) {
        return Ok(RowValue::Null);
    }
    Ok(match vector {
        Vector::Int8(v) => RowValue::Int8(v.buffer().values()[i]),
        Vector::Int16(v) => RowValue::Int16(v.buffer().values()[i]),
        Vector::Int32(v) => RowValue::Int32(v.buffer().values()[i]),
        Vector::Int64(v) => RowValue::Int64(v.buffer().values()[i]),
        Vector::Float32(v) => RowValue::Float32(v.buffer().values()[i]),
        Vector::Float64(v) => RowValue::Float64(v.buffer().values()[i]),
        Vector::Date32(v) => RowValue::Date32(v.buffer().values()[i]),
        Vector::Timestamp64(v) => RowValue::Timestamp64(v.buffer().values()[i]),
        Vector::Bool(v) => RowValue::Bool(v.buffer().value(i)),
        Vector::String(v) => RowValue::String(v.value(i).to_vec()),
        Vector::Array(v) => {
            let range = v.value_range(i);
            (range.start..range.end)
                .map(|j| row_value(v.child(), j))
                .collect::<DrakenResult<Vec<_>>>()
                .map(RowValue::Array)?
        }
        Vector::NonNative(v) => match arrow_cast::display::array_value_to_string(v.array(), i) {
            Ok(rendered) => RowValue::Foreign(rendered),
            Err(_) => RowValue::Null,
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::buffer::{null_buffer_from_validity, FixedBuffer};
    use crate::vector::Int32Vector;

    use super::*;

    fn sample() -> Morsel {
        let a = Vector::Int32(Int32Vector::new(FixedBuffer::new(vec![1, 2, 3].into(), None)));
        let b = Vector::Int32(Int32Vector::new(FixedBuffer::new(
            vec![10, 20, 30].into(),
            null_buffer_from_validity(&[true, false, true]),
        )));
        Morsel::from_columns(vec![("a".to_string(), a), ("b".to_string(), b)]).expect("valid morsel")
    }

    #[test]
    fn rejects_mismatched_column_lengths() {
        let a = Vector::Int32(Int32Vector::new(FixedBuffer::new(vec![1, 2].into(), None)));
        let b = Vector::Int32(Int32Vector::new(FixedBuffer::new(vec![1].into(), None)));
        let err = Morsel::from_columns(vec![("a".to_string(), a), ("b".to_string(), b)]).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let a = Vector::Int32(Int32Vector::new(FixedBuffer::new(vec![1].into(), None)));
        let b = Vector::Int32(Int32Vector::new(FixedBuffer::new(vec![2].into(), None)));
        let err = Morsel::from_columns(vec![("a".to_string(), a), ("a".to_string(), b)]).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::InvalidArgument(_)));
    }

    #[test]
    fn from_table_builds_columns_through_the_arrow_bridge() {
        let x: arrow_array::ArrayRef = std::sync::Arc::new(arrow_array::Int32Array::from(vec![1, 2, 3]));
        let schema = std::sync::Arc::new(arrow_schema::Schema::new(vec![arrow_schema::Field::new(
            "x",
            arrow_schema::DataType::Int32,
            true,
        )]));
        let batch = arrow_array::RecordBatch::try_new(schema, vec![x]).expect("schema matches columns");
        let m = Morsel::from_table(&batch, false).expect("imports cleanly");
        assert_eq!(m.shape(), (3, 1));
        assert_eq!(m.column_names(), &["x".to_string()]);
    }

    #[test]
    fn from_table_strict_rejects_zero_columns() {
        let schema = std::sync::Arc::new(arrow_schema::Schema::empty());
        let batch = arrow_array::RecordBatch::new_empty(schema);
        let err = Morsel::from_table(&batch, true).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::EmptySchema));
    }

    #[test]
    fn from_table_lenient_allows_zero_columns() {
        let schema = std::sync::Arc::new(arrow_schema::Schema::empty());
        let batch = arrow_array::RecordBatch::new_empty(schema);
        let m = Morsel::from_table(&batch, false).expect("lenient mode allows it");
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn row_extracts_null_and_values() {
        let m = sample();
        let row0 = m.row(0).expect("in range");
        assert_eq!(row0, vec![RowValue::Int32(1), RowValue::Int32(10)]);
        let row1 = m.row(1).expect("in range");
        assert_eq!(row1[1], RowValue::Null);
    }

    #[test]
    fn select_projects_and_reorders_columns() {
        let m = sample();
        let projected = m.select(&["b", "a"]).expect("both columns exist");
        assert_eq!(projected.column_names(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn rename_with_list_requires_matching_column_count() {
        let m = sample();
        let err = m.rename(&RenameSpec::List(vec!["only-one".to_string()])).unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::LengthMismatch { .. }));
    }

    #[test]
    fn rename_with_list_replaces_every_name_positionally() {
        let m = sample();
        let renamed = m.rename(&RenameSpec::List(vec!["p".to_string(), "q".to_string()])).expect("matching count");
        assert_eq!(renamed.column_names(), &["p".to_string(), "q".to_string()]);
        assert_eq!(renamed.column("p").unwrap().len(), 3);
    }

    #[test]
    fn rename_with_mapping_leaves_unlisted_names_unchanged() {
        let m = sample();
        let mut mapping = HashMap::new();
        mapping.insert("a".to_string(), "renamed".to_string());
        let renamed = m.rename(&RenameSpec::Mapping(mapping)).expect("mapping applies");
        assert_eq!(renamed.column_names(), &["renamed".to_string(), "b".to_string()]);
    }

    #[test]
    fn take_reindexes_every_column() {
        let m = sample();
        let taken = m.take(&[2, 0]).expect("in range");
        assert_eq!(taken.num_rows(), 2);
        assert_eq!(taken.row(0).unwrap()[0], RowValue::Int32(3));
    }
}
