//! One concrete vector type per logical type, plus the [`Vector`] tagged
//! union and the kernel contract every variant supports.
//!
//! Rather than a trait object behind a downcast (`dyn VectorTrait` plus
//! `as_any`/`downcast_ref`, the shape `vortex-array`'s own `Array` trait
//! takes), the core's closed, stable set of twelve logical types is
//! modeled as a plain Rust enum. Matching on a tag the compiler already
//! knows is exhaustive is both cheaper and safer than a fallible
//! downcast, and it is the natural fit for a type set the specification
//! declares closed.

pub mod array_vector;
pub mod bool_vector;
pub mod date_time;
pub mod foreign;
pub mod numeric;
pub mod string_vector;

use draken_error::{draken_err, DrakenResult};

pub use array_vector::ArrayVector;
pub use bool_vector::BoolVector;
pub use date_time::{Date32Vector, Timestamp64Vector};
pub use foreign::ForeignArrowVector;
pub use numeric::{Float32Vector, Float64Vector, Int16Vector, Int32Vector, Int64Vector, Int8Vector};
pub use string_vector::{StringVector, StringVectorBuilder};

use crate::ptype::TypeTag;

/// The closed set of columnar value containers a [`crate::Morsel`] can
/// hold.
///
/// Every variant implements the shared kernel contract (`length`,
/// `type_tag`, `null_count`, `is_null_mask`, `take`, `hash`, `to_arrow`)
/// through the inherent methods below, which dispatch by matching on
/// the tag. Per-type kernels (typed comparisons, reductions, string
/// transforms) live on the concrete struct each variant wraps; match on
/// the variant to reach them.
#[derive(Clone, Debug)]
pub enum Vector {
    Int8(Int8Vector),
    Int16(Int16Vector),
    Int32(Int32Vector),
    Int64(Int64Vector),
    Float32(Float32Vector),
    Float64(Float64Vector),
    Date32(Date32Vector),
    Timestamp64(Timestamp64Vector),
    Bool(BoolVector),
    String(StringVector),
    Array(ArrayVector),
    NonNative(ForeignArrowVector),
}

impl Vector {
    /// The number of elements (or list rows, for [`Vector::Array`]).
    pub fn len(&self) -> usize {
        match self {
            Vector::Int8(v) => v.len(),
            Vector::Int16(v) => v.len(),
            Vector::Int32(v) => v.len(),
            Vector::Int64(v) => v.len(),
            Vector::Float32(v) => v.len(),
            Vector::Float64(v) => v.len(),
            Vector::Date32(v) => v.len(),
            Vector::Timestamp64(v) => v.len(),
            Vector::Bool(v) => v.len(),
            Vector::String(v) => v.len(),
            Vector::Array(v) => v.len(),
            Vector::NonNative(v) => v.len(),
        }
    }

    /// Whether the vector has zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The logical type this vector carries.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Vector::Int8(v) => v.type_tag(),
            Vector::Int16(v) => v.type_tag(),
            Vector::Int32(v) => v.type_tag(),
            Vector::Int64(v) => v.type_tag(),
            Vector::Float32(v) => v.type_tag(),
            Vector::Float64(v) => v.type_tag(),
            Vector::Date32(v) => v.type_tag(),
            Vector::Timestamp64(v) => v.type_tag(),
            Vector::Bool(v) => v.type_tag(),
            Vector::String(v) => v.type_tag(),
            Vector::Array(v) => v.type_tag(),
            Vector::NonNative(v) => v.type_tag(),
        }
    }

    /// The number of null elements.
    pub fn null_count(&self) -> usize {
        match self {
            Vector::Int8(v) => v.null_count(),
            Vector::Int16(v) => v.null_count(),
            Vector::Int32(v) => v.null_count(),
            Vector::Int64(v) => v.null_count(),
            Vector::Float32(v) => v.null_count(),
            Vector::Float64(v) => v.null_count(),
            Vector::Date32(v) => v.null_count(),
            Vector::Timestamp64(v) => v.null_count(),
            Vector::Bool(v) => v.null_count(),
            Vector::String(v) => v.null_count(),
            Vector::Array(v) => v.null_count(),
            Vector::NonNative(v) => v.null_count(),
        }
    }

    /// The per-position null mask (1 = null, 0 = valid).
    pub fn is_null_mask(&self) -> Vec<u8> {
        match self {
            Vector::Int8(v) => v.is_null_mask(),
            Vector::Int16(v) => v.is_null_mask(),
            Vector::Int32(v) => v.is_null_mask(),
            Vector::Int64(v) => v.is_null_mask(),
            Vector::Float32(v) => v.is_null_mask(),
            Vector::Float64(v) => v.is_null_mask(),
            Vector::Date32(v) => v.is_null_mask(),
            Vector::Timestamp64(v) => v.is_null_mask(),
            Vector::Bool(v) => v.is_null_mask(),
            Vector::String(v) => v.is_null_mask(),
            Vector::Array(v) => v.is_null_mask(),
            Vector::NonNative(v) => v.is_null_mask(),
        }
    }

    /// Gathers rows by index, producing a new vector of the same
    /// variant and `indices.len()` elements.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Vector> {
        Ok(match self {
            Vector::Int8(v) => Vector::Int8(v.take(indices)?),
            Vector::Int16(v) => Vector::Int16(v.take(indices)?),
            Vector::Int32(v) => Vector::Int32(v.take(indices)?),
            Vector::Int64(v) => Vector::Int64(v.take(indices)?),
            Vector::Float32(v) => Vector::Float32(v.take(indices)?),
            Vector::Float64(v) => Vector::Float64(v.take(indices)?),
            Vector::Date32(v) => Vector::Date32(v.take(indices)?),
            Vector::Timestamp64(v) => Vector::Timestamp64(v.take(indices)?),
            Vector::Bool(v) => Vector::Bool(v.take(indices)?),
            Vector::String(v) => Vector::String(v.take(indices)?),
            Vector::Array(v) => Vector::Array(v.take(indices)?),
            Vector::NonNative(v) => Vector::NonNative(v.take(indices)?),
        })
    }

    /// Hashes every element with the type-appropriate kernel; nulls
    /// hash to [`crate::NULL_HASH`] for every type except
    /// [`Vector::NonNative`], which has no native hash kernel.
    pub fn hash(&self) -> DrakenResult<Vec<u64>> {
        Ok(match self {
            Vector::Int8(v) => v.hash(),
            Vector::Int16(v) => v.hash(),
            Vector::Int32(v) => v.hash(),
            Vector::Int64(v) => v.hash(),
            Vector::Float32(v) => v.hash(),
            Vector::Float64(v) => v.hash(),
            Vector::Date32(v) => v.hash(),
            Vector::Timestamp64(v) => v.hash(),
            Vector::Bool(v) => v.hash(),
            Vector::String(v) => v.hash(),
            Vector::Array(v) => v.hash()?,
            Vector::NonNative(v) => v.hash()?,
        })
    }

    /// Converts this vector to an Arrow array, per the bridge's type
    /// mapping table.
    pub fn to_arrow(&self) -> DrakenResult<arrow_array::ArrayRef> {
        crate::arrow_bridge::convert::vector_to_arrow(self)
    }

    /// Imports an Arrow array as a vector, per the bridge's type mapping
    /// table. Arrays of a type the core doesn't model natively come back
    /// as [`Vector::NonNative`] rather than failing.
    pub fn from_arrow(array: &arrow_array::ArrayRef) -> DrakenResult<Vector> {
        crate::arrow_bridge::convert::arrow_to_vector(array)
    }

    /// Returns [`draken_error::DrakenError::UnsupportedType`] if this
    /// vector is a [`Vector::NonNative`], otherwise `Ok(())`.
    ///
    /// A convenience for operator code that wants to reject opaque
    /// columns up front instead of discovering it mid-kernel.
    pub fn require_native(&self) -> DrakenResult<()> {
        if matches!(self, Vector::NonNative(_)) {
            return Err(draken_err!(UnsupportedType: "operation requires a native vector type"));
        }
        Ok(())
    }
}
