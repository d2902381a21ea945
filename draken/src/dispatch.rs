//! `get_op`: a pure lookup from a binary operation and its two operand
//! descriptors to the kernel that implements it, for external expression
//! evaluators that resolve operators by shape rather than linking
//! against the concrete vector types directly.
//!
//! Kept as a standalone, side-effect-free table rather than a method on
//! [`crate::vector::Vector`] itself, since its job is compatibility
//! checking (can this operator run against these two operands at all?)
//! ahead of ever touching actual data. The returned [`KernelHandle`] is
//! opaque; resolving it to a concrete kernel call (`NumericVector::add`,
//! `BoolVector::combine_vector`, ...) is the vector layer's job.

use crate::ptype::TypeTag;
use crate::vector::bool_vector::BoolOp;
use crate::vector::numeric::{ArithOp, CmpOp};

/// The three families of binary operator `get_op` resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Arithmetic(ArithOp),
    Comparison(CmpOp),
    Boolean(BoolOp),
}

/// An opaque, resolved operator — present only when `get_op`'s
/// compatibility rules accept the operand shape and types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelHandle {
    /// The operator this handle resolves to.
    pub operation: OperationKind,
    /// The operand type the kernel runs over (left and right always
    /// agree by the time a handle exists).
    pub type_tag: TypeTag,
}

const NUMERIC: &[TypeTag] = &[
    TypeTag::Int8,
    TypeTag::Int16,
    TypeTag::Int32,
    TypeTag::Int64,
    TypeTag::Float32,
    TypeTag::Float64,
];

const COMPARABLE: &[TypeTag] = &[
    TypeTag::Int8,
    TypeTag::Int16,
    TypeTag::Int32,
    TypeTag::Int64,
    TypeTag::Float32,
    TypeTag::Float64,
    TypeTag::Date32,
    TypeTag::Timestamp64,
    TypeTag::Bool,
    TypeTag::String,
];

/// Resolves a binary operator against its two operand descriptors,
/// returning the [`KernelHandle`] that runs it, or `None` when no kernel
/// applies.
///
/// Compatibility rules (per the core's operator dispatch contract):
/// - Comparison and arithmetic require `left_type == right_type`.
/// - Arithmetic further requires a numeric type (§3 archetypes only —
///   not `Bool`/`String`/`Array`/`Date32`/`Timestamp64`).
/// - Boolean operators require both sides `Bool`.
/// - A scalar left operand with a vector right operand is never a
///   supported shape; vector-vector, vector-scalar, and scalar-scalar
///   all are.
pub fn get_op(
    left_type: TypeTag,
    left_is_scalar: bool,
    right_type: TypeTag,
    right_is_scalar: bool,
    operation: OperationKind,
) -> Option<KernelHandle> {
    if left_is_scalar && !right_is_scalar {
        return None;
    }
    if left_type != right_type {
        return None;
    }
    let compatible = match operation {
        OperationKind::Arithmetic(_) => NUMERIC.contains(&left_type),
        OperationKind::Comparison(_) => COMPARABLE.contains(&left_type),
        OperationKind::Boolean(_) => left_type == TypeTag::Bool,
    };
    if !compatible {
        return None;
    }
    Some(KernelHandle {
        operation,
        type_tag: left_type,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(TypeTag::Int32, false, TypeTag::Int32, false, OperationKind::Arithmetic(ArithOp::Add), true)]
    #[case(TypeTag::Int32, false, TypeTag::Int64, false, OperationKind::Arithmetic(ArithOp::Add), false)]
    #[case(TypeTag::Bool, false, TypeTag::Bool, false, OperationKind::Arithmetic(ArithOp::Add), false)]
    #[case(TypeTag::String, false, TypeTag::String, false, OperationKind::Comparison(CmpOp::Eq), true)]
    #[case(TypeTag::Bool, false, TypeTag::Bool, false, OperationKind::Boolean(BoolOp::And), true)]
    #[case(TypeTag::Int32, false, TypeTag::Int32, false, OperationKind::Boolean(BoolOp::And), false)]
    fn get_op_enforces_type_compatibility(
        #[case] left_type: TypeTag,
        #[case] left_is_scalar: bool,
        #[case] right_type: TypeTag,
        #[case] right_is_scalar: bool,
        #[case] operation: OperationKind,
        #[case] should_resolve: bool,
    ) {
        let resolved = get_op(left_type, left_is_scalar, right_type, right_is_scalar, operation);
        assert_eq!(resolved.is_some(), should_resolve);
    }

    #[test]
    fn scalar_on_left_with_vector_on_right_is_unsupported() {
        let resolved = get_op(
            TypeTag::Int32,
            true,
            TypeTag::Int32,
            false,
            OperationKind::Arithmetic(ArithOp::Add),
        );
        assert!(resolved.is_none());
    }

    #[test]
    fn vector_scalar_and_scalar_scalar_shapes_are_supported() {
        let op = OperationKind::Comparison(CmpOp::Eq);
        assert!(get_op(TypeTag::Int32, false, TypeTag::Int32, true, op).is_some());
        assert!(get_op(TypeTag::Int32, true, TypeTag::Int32, true, op).is_some());
    }

    #[test]
    fn handle_carries_the_resolved_type_tag() {
        let handle = get_op(
            TypeTag::Float64,
            false,
            TypeTag::Float64,
            false,
            OperationKind::Arithmetic(ArithOp::Mul),
        )
        .expect("float64 arithmetic is supported");
        assert_eq!(handle.type_tag, TypeTag::Float64);
    }
}
