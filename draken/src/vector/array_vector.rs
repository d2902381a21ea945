//! `ArrayVector`: a nested list of a single child [`crate::vector::Vector`].
//!
//! Modeled on Arrow's own `ListArray` layout (an offsets buffer plus one
//! child array) rather than `vortex-array`'s `ListArray` encoding, which
//! layers run-end elements on top — the core only asks for the plain
//! offset-indexed shape, so the simpler Arrow layout is the closer fit.

use draken_error::{draken_err, DrakenResult};

use crate::hash::fnv1a;
use crate::ptype::TypeTag;
use crate::vector::Vector;
use crate::NULL_HASH;

/// A vector whose elements are themselves variable-length lists of a
/// single child type.
#[derive(Clone, Debug)]
pub struct ArrayVector {
    offsets: arrow_buffer::OffsetBuffer<i32>,
    child: Box<Vector>,
    nulls: Option<arrow_buffer::NullBuffer>,
}

impl ArrayVector {
    /// Builds a list vector from row offsets into `child` plus an
    /// optional validity bitmap.
    ///
    /// `nulls`, if present, must have `offsets.len() - 1` entries. A
    /// null row's offset span is otherwise ordinary (usually
    /// zero-length, but not required to be).
    pub fn new(
        offsets: arrow_buffer::OffsetBuffer<i32>,
        child: Vector,
        nulls: Option<arrow_buffer::NullBuffer>,
    ) -> Self {
        Self {
            offsets,
            child: Box::new(child),
            nulls,
        }
    }

    /// The number of list rows (one less than the offsets count).
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the vector has zero list rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Always [`TypeTag::Array`].
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::Array
    }

    /// The logical type every list row's elements share.
    pub fn child_type(&self) -> TypeTag {
        self.child.type_tag()
    }

    /// The child vector backing every list row's elements.
    pub fn child(&self) -> &Vector {
        &self.child
    }

    /// The row offsets, `length + 1` entries.
    pub fn offsets(&self) -> &arrow_buffer::OffsetBuffer<i32> {
        &self.offsets
    }

    /// The number of null rows.
    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, arrow_buffer::NullBuffer::null_count)
    }

    /// Whether row `i` is null.
    pub fn is_null(&self, i: usize) -> bool {
        self.nulls.as_ref().is_some_and(|n| n.is_null(i))
    }

    /// The per-row null mask (1 = null, 0 = valid).
    pub fn is_null_mask(&self) -> Vec<u8> {
        crate::buffer::is_null_mask(self.nulls.as_ref(), self.len())
    }

    /// The child-vector row range backing list row `i`, irrespective of
    /// its validity.
    pub fn value_range(&self, i: usize) -> std::ops::Range<usize> {
        self.offsets[i] as usize..self.offsets[i + 1] as usize
    }

    /// Gathers list rows by index, taking each selected row's full child
    /// range in one pass over `child`.
    pub fn take(&self, indices: &[i64]) -> DrakenResult<Self> {
        let mut child_indices = Vec::new();
        let mut new_offsets = Vec::with_capacity(indices.len() + 1);
        let mut valid = Vec::with_capacity(indices.len());
        new_offsets.push(0i32);
        for &idx in indices {
            if idx < 0 || idx as usize >= self.len() {
                return Err(draken_err!(IndexOutOfRange: idx, self.len()));
            }
            let i = idx as usize;
            let range = self.value_range(i);
            for child_i in range {
                child_indices.push(child_i as i64);
            }
            new_offsets.push(child_indices.len() as i32);
            valid.push(!self.is_null(i));
        }
        let taken_child = self.child.take(&child_indices)?;
        Ok(Self::new(
            arrow_buffer::OffsetBuffer::new(new_offsets.into()),
            taken_child,
            crate::buffer::null_buffer_from_validity(&valid),
        ))
    }

    /// Hashes each list row by combining its child-element hashes with
    /// FNV-1a over their little-endian byte representation; null rows
    /// hash to [`NULL_HASH`].
    pub fn hash(&self) -> DrakenResult<Vec<u64>> {
        let child_hashes = self.child.hash()?;
        Ok((0..self.len())
            .map(|i| {
                if self.is_null(i) {
                    return NULL_HASH;
                }
                let range = self.value_range(i);
                let mut bytes = Vec::with_capacity(range.len() * 8);
                for h in &child_hashes[range] {
                    bytes.extend_from_slice(&h.to_le_bytes());
                }
                fnv1a(&bytes)
            })
            .collect())
    }
}
