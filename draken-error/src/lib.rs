//! Error kinds and result type shared by every Draken crate.
//!
//! Mirrors the error-handling shape used throughout the vortex pack this
//! crate was modeled on: a single enum with one meaning per variant, a
//! `draken_err!`/`draken_bail!` macro pair for constructing and returning
//! errors tersely, and a `DrakenResult<T>` alias used as the return type
//! of every fallible operation in the core.

use std::borrow::Cow;
use std::fmt;

/// A cheaply-cloned error message, matching `vortex_error::ErrString`.
#[derive(Debug, Clone)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for ErrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The single error type returned by every fallible Draken operation.
///
/// Each variant corresponds to exactly one of the error kinds named in
/// the core specification: there is no general-purpose "other" bucket
/// besides `InvalidArgument`, which exists for invariant violations that
/// don't fit any of the named kinds (e.g. a malformed builder call).
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DrakenError {
    /// An allocator failed to satisfy a request for `requested_bytes`.
    #[error("out of memory: failed to allocate {requested_bytes} bytes")]
    OutOfMemory {
        /// Number of bytes the failed allocation asked for.
        requested_bytes: usize,
    },

    /// `take`/`row`/`get` addressed an index outside `[0, length)`.
    #[error("index {index} out of range for vector of length {length}")]
    IndexOutOfRange {
        /// The offending index (kept signed so negative indices are reported as-is).
        index: i64,
        /// The length the index was checked against.
        length: usize,
    },

    /// Two vectors (or a rename list and the morsel's column count) disagreed in length.
    #[error("length mismatch in {context}: {left} vs {right}")]
    LengthMismatch {
        /// Length of the left-hand (or first) operand.
        left: usize,
        /// Length of the right-hand (or second) operand.
        right: usize,
        /// Which operation raised the mismatch, for diagnostics.
        context: ErrString,
    },

    /// A morsel lookup or projection named a column that doesn't exist.
    #[error("no column named {name:?}")]
    ColumnNotFound {
        /// The requested, not-found, column name.
        name: Vec<u8>,
    },

    /// A dispatch request or type conversion had no compatible handling.
    #[error("unsupported type: {message}")]
    UnsupportedType {
        /// Human-readable description of the incompatibility.
        message: ErrString,
    },

    /// `StringVectorBuilder::finish` was called before every row was written.
    #[error("builder finished with {written} of {expected} rows written")]
    Incomplete {
        /// Number of rows actually written before `finish`.
        written: usize,
        /// The `n_rows` the builder was constructed with.
        expected: usize,
    },

    /// A strict (`with_counts`) builder's total byte count didn't match at `finish`.
    #[error("builder byte count mismatch: expected {expected}, wrote {actual}")]
    CapacityMismatch {
        /// The declared total byte count.
        expected: usize,
        /// The number of bytes actually written.
        actual: usize,
    },

    /// An operation was attempted on a builder that already called `finish`.
    #[error("builder is already finished")]
    BuilderClosed,

    /// Import-time offsets validation failed (non-monotonic, or out of bounds of the data buffer).
    #[error("invalid offset at position {index}: {message}")]
    InvalidOffset {
        /// Index into the offsets array where the check failed.
        index: usize,
        /// What went wrong.
        message: ErrString,
    },

    /// Catch-all for invariant violations that don't fit a named kind above.
    #[error("{0}")]
    InvalidArgument(ErrString),

    /// `Morsel::from_table` was called in strict mode against a
    /// zero-column Arrow table.
    #[error("morsel table has no columns")]
    EmptySchema,

    /// A wrapper for errors surfaced by the `arrow-schema` crate at the Arrow bridge.
    #[error(transparent)]
    Arrow(#[from] arrow_schema::ArrowError),
}

/// The result type returned by every fallible Draken operation.
pub type DrakenResult<T> = Result<T, DrakenError>;

/// Constructs a [`DrakenError`] without returning it.
#[macro_export]
macro_rules! draken_err {
    (OutOfMemory: $bytes:expr) => {
        $crate::DrakenError::OutOfMemory {
            requested_bytes: $bytes,
        }
    };
    (IndexOutOfRange: $index:expr, $length:expr) => {
        $crate::DrakenError::IndexOutOfRange {
            index: $index as i64,
            length: $length,
        }
    };
    (LengthMismatch: $left:expr, $right:expr, $context:expr) => {
        $crate::DrakenError::LengthMismatch {
            left: $left,
            right: $right,
            context: $context.into(),
        }
    };
    (ColumnNotFound: $name:expr) => {
        $crate::DrakenError::ColumnNotFound {
            name: $name.to_vec(),
        }
    };
    (UnsupportedType: $($arg:tt)*) => {
        $crate::DrakenError::UnsupportedType {
            message: format!($($arg)*).into(),
        }
    };
    (Incomplete: $written:expr, $expected:expr) => {
        $crate::DrakenError::Incomplete {
            written: $written,
            expected: $expected,
        }
    };
    (CapacityMismatch: $expected:expr, $actual:expr) => {
        $crate::DrakenError::CapacityMismatch {
            expected: $expected,
            actual: $actual,
        }
    };
    (BuilderClosed) => {
        $crate::DrakenError::BuilderClosed
    };
    (EmptySchema) => {
        $crate::DrakenError::EmptySchema
    };
    (InvalidOffset: $index:expr, $($arg:tt)*) => {
        $crate::DrakenError::InvalidOffset {
            index: $index,
            message: format!($($arg)*).into(),
        }
    };
    ($($arg:tt)*) => {
        $crate::DrakenError::InvalidArgument(format!($($arg)*).into())
    };
}

/// Builds a [`DrakenError`] with [`draken_err!`] and returns it from the current function.
#[macro_export]
macro_rules! draken_bail {
    ($($arg:tt)*) => {
        return Err($crate::draken_err!($($arg)*))
    };
}
