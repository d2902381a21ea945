//! Exchange with Arrow: in-process conversion and the C Data Interface.
//!
//! [`convert`] moves buffers between [`crate::vector::Vector`] and
//! `arrow_array::ArrayRef` within one process, at zero copy cost.
//! [`ffi`] crosses a process or language boundary using the Arrow C Data
//! Interface, via `arrow-data`'s `FFI_ArrowArray`/`FFI_ArrowSchema`
//! encoding.

pub mod convert;
pub mod ffi;

pub use convert::{arrow_to_vector, vector_to_arrow};
pub use ffi::{export_to_raw, import_from_raw, ArrowArrayHandle};
