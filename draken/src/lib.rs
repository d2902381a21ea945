//! Draken — a columnar in-memory data container and vector kernel library.
//!
//! Draken holds one or more batches ("morsels") of columnar data with
//! Arrow-compatible memory layouts, exposes per-type vector kernels
//! (comparisons, take, hashing, boolean reductions, string transforms),
//! and allows zero-copy exchange with Arrow through the C Data Interface.
//!
//! The crate is organized leaves-first, matching the layering of the
//! system it implements:
//!
//! - [`alloc`] — the allocator abstraction owned buffers are built from.
//! - [`buffer`] — `FixedBuffer`/`VarBuffer`, thin spec-shaped wrappers
//!   around `arrow-buffer`'s own zero-copy, refcounted buffer types.
//! - [`vector`] — one concrete vector type per logical type, plus the
//!   `Vector` tagged union and its kernel contract.
//! - [`arrow_bridge`] — import from and export to Arrow, including the
//!   raw C Data Interface structs for crossing a process/language
//!   boundary.
//! - [`morsel`] — the named, typed batch of vectors operator code passes
//!   around.
//! - [`dispatch`] — the pure `get_op` lookup consumed by external
//!   expression evaluators.

pub mod alloc;
pub mod arrow_bridge;
pub mod buffer;
pub mod dispatch;
mod hash;
pub mod morsel;
pub mod ptype;
pub mod vector;

pub use draken_error::{DrakenError, DrakenResult};
pub use morsel::{Morsel, RenameSpec, RowValue};
pub use ptype::TypeTag;
pub use vector::Vector;

/// The hash every null value produces, for every vector type.
///
/// Chosen so that a null never collides with a legitimate hash of a
/// "natural" value under FNV-1a or a numeric type's own bit pattern.
pub const NULL_HASH: u64 = 0x9E_3779_B97F_4A7C_15;
