//! The logical type tag and the per-native-type behavior it dispatches to.
//!
//! `TypeTag`'s discriminants are part of the wire contract (used for
//! debugging/printing and carried across the Arrow bridge's format
//! strings) and must stay stable.

use std::cmp::Ordering;
use std::fmt;

/// The closed set of logical types a [`crate::Vector`] can carry.
///
/// Discriminants are stable; do not renumber existing variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TypeTag {
    /// 8-bit signed integer.
    Int8 = 1,
    /// 16-bit signed integer.
    Int16 = 2,
    /// 32-bit signed integer.
    Int32 = 3,
    /// 64-bit signed integer.
    Int64 = 4,
    /// 32-bit IEEE-754 float.
    Float32 = 20,
    /// 64-bit IEEE-754 float.
    Float64 = 21,
    /// Days since the Unix epoch.
    Date32 = 30,
    /// Timestamp at a [`TimeUnit`] resolution since the Unix epoch.
    Timestamp64 = 40,
    /// Bit-packed boolean.
    Bool = 50,
    /// A variable-width byte sequence, UTF-8 by convention.
    String = 60,
    /// A nested list of a child type.
    Array = 80,
    /// An opaque value delegated to the Arrow array it wraps.
    NonNative = 100,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", *self as i32)
    }
}

/// The resolution of a [`crate::vector::Timestamp64Vector`]'s values.
///
/// Draken treats every Arrow timestamp as the single stable
/// `TypeTag::Timestamp64` tag (per the core's type mapping table) but
/// does not discard the unit Arrow carried alongside it; it is stored as
/// a field on the vector instead of fanning the tag out into one
/// variant per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeUnit {
    /// Whole seconds.
    Second,
    /// Milliseconds.
    Millisecond,
    /// Microseconds — the default for natively constructed vectors.
    #[default]
    Microsecond,
    /// Nanoseconds.
    Nanosecond,
}

/// A native Rust type that backs exactly one numeric [`TypeTag`].
///
/// Mirrors `vortex_dtype::NativePType`: a small trait that lets generic
/// kernel code (comparisons, `take`, reductions) be written once and
/// instantiated per archetype, instead of duplicating a kernel body six
/// times by hand.
pub trait Numeric:
    arrow_buffer::ArrowNativeType + PartialEq + PartialOrd + Copy + fmt::Debug + Default + Send + Sync + 'static
{
    /// The logical type tag this native type backs.
    const TAG: TypeTag;

    /// Whether `self` is NaN. Always `false` for integer types.
    fn is_nan(self) -> bool {
        false
    }

    /// A total order over values of this type, used by `min`/`max` so
    /// that floating point NaNs don't make the reduction ill-defined.
    fn total_compare(self, other: Self) -> Ordering;

    /// The value's little-endian byte representation, hashed by the
    /// fixed-width vector kernels' `hash` operation.
    fn to_le_byte_vec(self) -> Vec<u8>;
}

macro_rules! impl_numeric_int {
    ($t:ty, $tag:ident) => {
        impl Numeric for $t {
            const TAG: TypeTag = TypeTag::$tag;

            fn total_compare(self, other: Self) -> Ordering {
                self.cmp(&other)
            }

            fn to_le_byte_vec(self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }
        }
    };
}

macro_rules! impl_numeric_float {
    ($t:ty, $tag:ident) => {
        impl Numeric for $t {
            const TAG: TypeTag = TypeTag::$tag;

            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            fn total_compare(self, other: Self) -> Ordering {
                self.total_cmp(&other)
            }

            fn to_le_byte_vec(self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }
        }
    };
}

impl_numeric_int!(i8, Int8);
impl_numeric_int!(i16, Int16);
impl_numeric_int!(i32, Int32);
impl_numeric_int!(i64, Int64);
impl_numeric_float!(f32, Float32);
impl_numeric_float!(f64, Float64);

/// A native integer type whose vector supports `sum`.
///
/// Separate from [`Numeric`] because the core's reduction contract only
/// offers `sum` for integer archetypes — summing a `Float32`/`Float64`
/// vector or a `Date32`/`Timestamp64` vector is out of scope.
pub trait SumAccumulate: Numeric {
    /// Widens `self` to `i64` for accumulation.
    fn to_i64(self) -> i64;
}

macro_rules! impl_sum_accumulate {
    ($t:ty) => {
        impl SumAccumulate for $t {
            fn to_i64(self) -> i64 {
                self as i64
            }
        }
    };
}

impl_sum_accumulate!(i8);
impl_sum_accumulate!(i16);
impl_sum_accumulate!(i32);
impl_sum_accumulate!(i64);

/// A native type whose vector supports the core's four arithmetic
/// kernels (`add`/`sub`/`mul`/`div`).
///
/// Implemented for every [`Numeric`] archetype the dispatch contract
/// calls "numeric" (§4.5): the four signed integer widths and both
/// float widths, but not `Date32`/`Timestamp64`, whose native types
/// (`i32`/`i64`) back a [`Numeric`] impl but not this one directly —
/// `Date32Vector`/`Timestamp64Vector` don't expose arithmetic kernels.
pub trait Arithmetic: Numeric {
    /// Wrapping add for integers, IEEE-754 add for floats.
    fn checked_add(self, rhs: Self) -> Self;
    /// Wrapping subtract for integers, IEEE-754 subtract for floats.
    fn checked_sub(self, rhs: Self) -> Self;
    /// Wrapping multiply for integers, IEEE-754 multiply for floats.
    fn checked_mul(self, rhs: Self) -> Self;
    /// Integer division returns `None` on division by zero; float
    /// division always returns `Some` (IEEE-754 produces `inf`/`NaN`).
    fn checked_div(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_arithmetic_int {
    ($t:ty) => {
        impl Arithmetic for $t {
            fn checked_add(self, rhs: Self) -> Self {
                num_traits::WrappingAdd::wrapping_add(&self, &rhs)
            }

            fn checked_sub(self, rhs: Self) -> Self {
                num_traits::WrappingSub::wrapping_sub(&self, &rhs)
            }

            fn checked_mul(self, rhs: Self) -> Self {
                num_traits::WrappingMul::wrapping_mul(&self, &rhs)
            }

            fn checked_div(self, rhs: Self) -> Option<Self> {
                num_traits::CheckedDiv::checked_div(&self, &rhs)
            }
        }
    };
}

macro_rules! impl_arithmetic_float {
    ($t:ty) => {
        impl Arithmetic for $t {
            fn checked_add(self, rhs: Self) -> Self {
                self + rhs
            }

            fn checked_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            fn checked_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            fn checked_div(self, rhs: Self) -> Option<Self> {
                Some(self / rhs)
            }
        }
    };
}

impl_arithmetic_int!(i8);
impl_arithmetic_int!(i16);
impl_arithmetic_int!(i32);
impl_arithmetic_int!(i64);
impl_arithmetic_float!(f32);
impl_arithmetic_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_wraps_on_overflow() {
        assert_eq!(i32::MAX.checked_add(1), i32::MIN);
        assert_eq!(0i32.checked_sub(1), -1);
        assert_eq!(3i32.checked_mul(4), 12);
    }

    #[test]
    fn integer_division_by_zero_is_none() {
        assert_eq!(1i32.checked_div(0), None);
        assert_eq!(10i32.checked_div(2), Some(5));
    }

    #[test]
    fn float_division_by_zero_is_infinite_not_none() {
        assert_eq!(1.0f64.checked_div(0.0), Some(f64::INFINITY));
    }
}
