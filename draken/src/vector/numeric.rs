//! The single generic kernel implementation shared by every fixed-width
//! numeric, date, and timestamp vector.
//!
//! Modeled on `vortex-array`'s primitive `take`/compute kernels, which
//! are written once against `T: NativePType` and instantiated per
//! archetype rather than hand-duplicated. `Date32Vector` and
//! `Timestamp64Vector` reuse these free functions directly (over
//! `FixedBuffer<i32>`/`FixedBuffer<i64>`) instead of going through
//! [`NumericVector`], since their [`crate::ptype::TypeTag`] differs from
//! the one `i32`/`i64` report as a bare [`Numeric`] impl.

use draken_error::{draken_err, DrakenResult};

use crate::buffer::{null_buffer_from_validity, BitBuffer, FixedBuffer};
use crate::hash::fnv1a;
use crate::ptype::{Arithmetic, Numeric, SumAccumulate, TypeTag};
use crate::NULL_HASH;

/// The six relational operators every comparable vector type supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    fn apply<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
        }
    }
}

/// Compares every element of `buf` against the scalar `rhs`.
///
/// A null element always compares `false`, for every operator — the
/// core's comparison contract has no three-valued logic. The result
/// carries no null bitmap of its own: nullity has already been resolved
/// into `false`.
pub fn compare_scalar<T: Numeric>(buf: &FixedBuffer<T>, rhs: T, op: CmpOp) -> BitBuffer {
    let bits: Vec<bool> = (0..buf.len())
        .map(|i| !buf.is_null(i) && op.apply(&buf.values()[i], &rhs))
        .collect();
    BitBuffer::new(bits.into(), None)
}

/// Compares `lhs` against `rhs` element-wise.
///
/// Fails with [`draken_error::DrakenError::LengthMismatch`] when the two
/// vectors don't have the same length; a null on either side compares
/// `false`.
pub fn compare_vector<T: Numeric>(
    lhs: &FixedBuffer<T>,
    rhs: &FixedBuffer<T>,
    op: CmpOp,
) -> DrakenResult<BitBuffer> {
    if lhs.len() != rhs.len() {
        return Err(draken_err!(LengthMismatch: lhs.len(), rhs.len(), "vector comparison"));
    }
    let bits: Vec<bool> = (0..lhs.len())
        .map(|i| {
            !lhs.is_null(i) && !rhs.is_null(i) && op.apply(&lhs.values()[i], &rhs.values()[i])
        })
        .collect();
    Ok(BitBuffer::new(bits.into(), None))
}

/// The four binary arithmetic operators the dispatch contract (§4.5)
/// names: `add`, `sub`, `mul`, `div`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn apply<T: Arithmetic>(self, lhs: T, rhs: T) -> Option<T> {
        match self {
            ArithOp::Add => Some(lhs.checked_add(rhs)),
            ArithOp::Sub => Some(lhs.checked_sub(rhs)),
            ArithOp::Mul => Some(lhs.checked_mul(rhs)),
            ArithOp::Div => lhs.checked_div(rhs),
        }
    }
}

/// Applies `op` between every element of `buf` and the scalar `rhs`.
///
/// A null source element stays null. Integer division by zero produces
/// a null result rather than panicking; every other operation always
/// succeeds (integer add/sub/mul wrap, float division by zero follows
/// IEEE-754 and yields `inf`/`NaN`, not a null).
pub fn arithmetic_scalar<T: Arithmetic>(buf: &FixedBuffer<T>, rhs: T, op: ArithOp) -> FixedBuffer<T> {
    let mut values = Vec::with_capacity(buf.len());
    let mut valid = Vec::with_capacity(buf.len());
    for i in 0..buf.len() {
        if buf.is_null(i) {
            values.push(T::default());
            valid.push(false);
            continue;
        }
        match op.apply(buf.values()[i], rhs) {
            Some(v) => {
                values.push(v);
                valid.push(true);
            }
            None => {
                values.push(T::default());
                valid.push(false);
            }
        }
    }
    FixedBuffer::new(values.into(), null_buffer_from_validity(&valid))
}

/// Applies `op` element-wise between `lhs` and `rhs`.
///
/// Fails with [`draken_error::DrakenError::LengthMismatch`] when the two
/// vectors don't have the same length. A null on either side produces a
/// null result; see [`arithmetic_scalar`] for the division-by-zero rule.
pub fn arithmetic_vector<T: Arithmetic>(
    lhs: &FixedBuffer<T>,
    rhs: &FixedBuffer<T>,
    op: ArithOp,
) -> DrakenResult<FixedBuffer<T>> {
    if lhs.len() != rhs.len() {
        return Err(draken_err!(LengthMismatch: lhs.len(), rhs.len(), "vector arithmetic"));
    }
    let mut values = Vec::with_capacity(lhs.len());
    let mut valid = Vec::with_capacity(lhs.len());
    for i in 0..lhs.len() {
        if lhs.is_null(i) || rhs.is_null(i) {
            values.push(T::default());
            valid.push(false);
            continue;
        }
        match op.apply(lhs.values()[i], rhs.values()[i]) {
            Some(v) => {
                values.push(v);
                valid.push(true);
            }
            None => {
                values.push(T::default());
                valid.push(false);
            }
        }
    }
    Ok(FixedBuffer::new(values.into(), null_buffer_from_validity(&valid)))
}

/// Gathers `buf[indices[i]]` into a new buffer of `indices.len()`
/// elements, preserving nullity for rows pulled from a null source
/// position.
///
/// Fails with [`draken_error::DrakenError::IndexOutOfRange`] if any
/// index addresses a row past the end of `buf`.
pub fn take<T: Numeric>(buf: &FixedBuffer<T>, indices: &[i64]) -> DrakenResult<FixedBuffer<T>> {
    let mut values = Vec::with_capacity(indices.len());
    let mut valid = Vec::with_capacity(indices.len());
    for &idx in indices {
        if idx < 0 || idx as usize >= buf.len() {
            return Err(draken_err!(IndexOutOfRange: idx, buf.len()));
        }
        let i = idx as usize;
        values.push(buf.values()[i]);
        valid.push(!buf.is_null(i));
    }
    Ok(FixedBuffer::new(values.into(), null_buffer_from_validity(&valid)))
}

/// Hashes every element of `buf` with FNV-1a over its little-endian byte
/// representation; null positions hash to [`NULL_HASH`].
pub fn hash<T: Numeric>(buf: &FixedBuffer<T>) -> Vec<u64> {
    (0..buf.len())
        .map(|i| {
            if buf.is_null(i) {
                NULL_HASH
            } else {
                fnv1a(&buf.values()[i].to_le_byte_vec())
            }
        })
        .collect()
}

/// The non-null minimum and maximum of `buf`, ordered by
/// [`Numeric::total_compare`] so that float NaNs don't short-circuit the
/// reduction. `(None, None)` when every element is null.
pub fn min_max<T: Numeric>(buf: &FixedBuffer<T>) -> (Option<T>, Option<T>) {
    let mut min = None;
    let mut max = None;
    for i in 0..buf.len() {
        if buf.is_null(i) {
            continue;
        }
        let v = buf.values()[i];
        min = Some(match min {
            None => v,
            Some(m) if v.total_compare(m) == std::cmp::Ordering::Less => v,
            Some(m) => m,
        });
        max = Some(match max {
            None => v,
            Some(m) if v.total_compare(m) == std::cmp::Ordering::Greater => v,
            Some(m) => m,
        });
    }
    (min, max)
}

/// Sums every non-null element of `buf`, widened to `i64` and
/// accumulated with wrapping arithmetic.
///
/// Overflow wraps rather than panicking or erroring, matching the core's
/// resolved reduction semantics: a `sum` kernel must always return a
/// value for any input length, including adversarial ones the load path
/// doesn't otherwise reject.
pub fn sum<T: SumAccumulate>(buf: &FixedBuffer<T>) -> i64 {
    (0..buf.len())
        .filter(|&i| !buf.is_null(i))
        .fold(0i64, |acc, i| acc.wrapping_add(buf.values()[i].to_i64()))
}

/// A fixed-width numeric vector over one native [`Numeric`] archetype.
///
/// Type aliases below (`Int8Vector`, `Float64Vector`, ...) name the
/// concrete instantiations the rest of the crate works with.
#[derive(Clone, Debug)]
pub struct NumericVector<T: Numeric> {
    data: FixedBuffer<T>,
}

impl<T: Numeric> NumericVector<T> {
    /// Wraps an already-built buffer.
    pub fn new(data: FixedBuffer<T>) -> Self {
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

    /// The logical type tag this vector reports.
    pub fn type_tag(&self) -> TypeTag {
        T::TAG
    }

    /// The underlying buffer, for the Arrow bridge and for kernels that
    /// need direct value access.
    pub fn buffer(&self) -> &FixedBuffer<T> {
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

    /// Element-wise comparison against a scalar. See [`compare_scalar`].
    pub fn compare_scalar(&self, rhs: T, op: CmpOp) -> BitBuffer {
        compare_scalar(&self.data, rhs, op)
    }

    /// Element-wise comparison against another vector of the same
    /// length. See [`compare_vector`].
    pub fn compare_vector(&self, rhs: &Self, op: CmpOp) -> DrakenResult<BitBuffer> {
        compare_vector(&self.data, &rhs.data, op)
    }

    /// Gathers rows by index. See [`take`].
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        Ok(Self::new(take(&self.data, indices)?))
    }

    /// Hashes every element. See [`hash`].
    pub fn hash(&self) -> Vec<u64> {
        hash(&self.data)
    }

    /// The non-null minimum and maximum. See [`min_max`].
    pub fn min_max(&self) -> (Option<T>, Option<T>) {
        min_max(&self.data)
    }
}

impl<T: SumAccumulate> NumericVector<T> {
    /// The wrapping sum of every non-null element, widened to `i64`.
    /// Only exposed for integer archetypes — see [`SumAccumulate`].
    pub fn sum(&self) -> i64 {
        sum(&self.data)
    }
}

impl<T: Arithmetic> NumericVector<T> {
    /// Applies `op` between every element and the scalar `rhs`. See
    /// [`arithmetic_scalar`].
    pub fn arithmetic_scalar(&self, rhs: T, op: ArithOp) -> Self {
        Self::new(arithmetic_scalar(&self.data, rhs, op))
    }

    /// Applies `op` element-wise between `self` and `rhs`. See
    /// [`arithmetic_vector`].
    pub fn arithmetic_vector(&self, rhs: &Self, op: ArithOp) -> DrakenResult<Self> {
        Ok(Self::new(arithmetic_vector(&self.data, &rhs.data, op)?))
    }
}

/// An 8-bit signed integer vector.
pub type Int8Vector = NumericVector<i8>;
/// A 16-bit signed integer vector.
pub type Int16Vector = NumericVector<i16>;
/// A 32-bit signed integer vector.
pub type Int32Vector = NumericVector<i32>;
/// A 64-bit signed integer vector.
pub type Int64Vector = NumericVector<i64>;
/// A 32-bit IEEE-754 float vector.
pub type Float32Vector = NumericVector<f32>;
/// A 64-bit IEEE-754 float vector.
pub type Float64Vector = NumericVector<f64>;
