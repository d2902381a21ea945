//! The Arrow C Data Interface: exporting a [`crate::vector::Vector`] to
//! a pair of raw, ABI-stable structs a foreign process or language can
//! read, and importing one back.
//!
//! Modeled on the `FFI_ArrowArray`/`FFI_ArrowSchema` release-callback
//! discipline found in arrow-rs's own FFI layer: the exported structs
//! own a release callback that is invoked at most once and that frees
//! exactly the private data this module allocated, never the caller's
//! memory. [`ArrowArrayHandle`] exists so that discipline isn't repeated
//! at every call site — dropping it runs the release callback for you.

use std::sync::Arc;

use arrow_data::ffi::{from_ffi, to_ffi, FFI_ArrowArray, FFI_ArrowSchema};
use draken_error::{draken_err, DrakenResult};

use crate::vector::Vector;

/// An exported Arrow array/schema pair, owning the memory the C Data
/// Interface structs describe until dropped.
///
/// The release callbacks embedded in the underlying `FFI_ArrowArray`
/// run when this handle is dropped; a foreign consumer that takes
/// ownership across the boundary (per the C Data Interface contract)
/// should call [`ArrowArrayHandle::into_raw`] instead of letting the
/// handle drop, so release becomes the consumer's responsibility.
pub struct ArrowArrayHandle {
    array: FFI_ArrowArray,
    schema: FFI_ArrowSchema,
}

impl ArrowArrayHandle {
    /// A pointer to the exported array struct, valid for as long as this
    /// handle is alive (or until [`Self::into_raw`] hands off ownership).
    pub fn array_ptr(&self) -> *const FFI_ArrowArray {
        &self.array
    }

    /// A pointer to the exported schema struct, valid for as long as
    /// this handle is alive.
    pub fn schema_ptr(&self) -> *const FFI_ArrowSchema {
        &self.schema
    }

    /// Consumes the handle and returns the two structs by value, for a
    /// caller that is about to copy them into caller-allocated memory at
    /// the C Data Interface boundary (the standard hand-off: the
    /// consumer now owns the release callback).
    pub fn into_raw(self) -> (FFI_ArrowArray, FFI_ArrowSchema) {
        (self.array, self.schema)
    }
}

/// Exports `vector` as a C Data Interface array/schema pair.
///
/// The exported structs borrow `vector`'s underlying Arrow buffers by
/// reference count, not by copy: as long as the handle lives, the
/// buffers stay alive, matching the core's zero-copy borrowed-ownership
/// mode rather than its owned/allocator-backed one.
pub fn export_to_raw(vector: &Vector) -> DrakenResult<ArrowArrayHandle> {
    let array = vector.to_arrow()?;
    let data = array.to_data();
    let (ffi_array, ffi_schema) = to_ffi(&data)?;
    log::trace!("exported {} vector ({} rows) via the C Data Interface", vector.type_tag(), vector.len());
    Ok(ArrowArrayHandle {
        array: ffi_array,
        schema: ffi_schema,
    })
}

/// Imports a vector from a C Data Interface array/schema pair.
///
/// # Safety
///
/// `array` must point to a valid, fully-initialized `FFI_ArrowArray`
/// that this call takes ownership of (its release callback, if any,
/// will be invoked once the returned data is dropped), and `schema` must
/// point to a valid `FFI_ArrowSchema` that outlives this call. Both must
/// describe the same array, per the C Data Interface contract.
pub unsafe fn import_from_raw(array: *mut FFI_ArrowArray, schema: *const FFI_ArrowSchema) -> DrakenResult<Vector> {
    if array.is_null() || schema.is_null() {
        return Err(draken_err!("import_from_raw received a null array or schema pointer"));
    }
    let owned_array = unsafe { std::ptr::read(array) };
    let schema_ref = unsafe { &*schema };
    let data = unsafe { from_ffi(owned_array, schema_ref) }?;
    let imported: Arc<dyn arrow_array::Array> = arrow_array::make_array(data);
    log::trace!("imported an arrow array of type {} via the C Data Interface", imported.data_type());
    crate::arrow_bridge::convert::arrow_to_vector(&imported)
}

#[cfg(test)]
mod tests {
    use crate::buffer::{null_buffer_from_validity, FixedBuffer};
    use crate::vector::Int32Vector;

    use super::*;

    #[test]
    fn export_then_import_round_trips_a_vector() {
        let data = FixedBuffer::new(vec![1, 2, 3].into(), null_buffer_from_validity(&[true, false, true]));
        let vector = Vector::Int32(Int32Vector::new(data));
        let handle = export_to_raw(&vector).expect("export succeeds");
        let (mut ffi_array, ffi_schema) = handle.into_raw();
        let imported = unsafe { import_from_raw(&mut ffi_array, &ffi_schema) }.expect("import succeeds");
        assert_eq!(imported.len(), 3);
        assert_eq!(imported.null_count(), 1);
    }

    #[test]
    fn import_rejects_null_pointers() {
        let err = unsafe { import_from_raw(std::ptr::null_mut(), std::ptr::null()) }.unwrap_err();
        assert!(matches!(err, draken_error::DrakenError::InvalidArgument(_)));
    }
}
