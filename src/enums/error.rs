//! # Error Module - Custom *legacy-ops* Error Type
//!
//! Defines the unified error type for the dispatcher.
//!
//! ## Features
//! - Covers unknown opcodes, shape and axis violations, auxiliary parameter
//! arity, absent handles and mixed element types.
//! - Every variant is raised before a kernel runs, so the output operand
//! is never partially written when one of these is returned.

use thiserror::Error;

use crate::enums::dtype::DType;
use crate::enums::family::OpFamily;

/// Catch all error type for the dispatcher
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// No kernel is registered under this opcode for the family and element type.
    #[error("Invalid opcode: no {family} kernel registered as {opcode} for '{dtype}'.")]
    InvalidOpcode {
        family: OpFamily,
        opcode: i32,
        dtype: DType,
    },

    /// Operand shapes violate the family's compatibility rule, or an axis
    /// is outside the operand's rank.
    #[error("Shape mismatch in {family} op: {reason}")]
    ShapeMismatch { family: OpFamily, reason: String },

    /// The extras slice does not match the resolved kernel's parameter list.
    #[error(
        "Invalid auxiliary arity for {family} kernel '{kernel}': expected {expected} extras, found {found}."
    )]
    InvalidAuxiliaryArity {
        family: OpFamily,
        kernel: &'static str,
        expected: usize,
        found: usize,
    },

    /// A required operand handle is absent.
    #[error("Null operand: {family} op requires operand '{operand}'.")]
    NullOperand {
        family: OpFamily,
        operand: &'static str,
    },

    /// The execution context handle is absent.
    #[error("Null context: {family} op requires an execution context.")]
    NullContext { family: OpFamily },

    /// Operands or auxiliary scalars of one call disagree on element type.
    #[error("Type mismatch in {family} op: expected '{expected}', found '{found}'.")]
    TypeMismatch {
        family: OpFamily,
        expected: DType,
        found: DType,
    },
}

impl DispatchError {
    /// Contract violations the caller must not continue past.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DispatchError::NullOperand { .. } | DispatchError::NullContext { .. }
        )
    }

    /// Family of the rejected call.
    pub fn family(&self) -> OpFamily {
        match self {
            DispatchError::InvalidOpcode { family, .. }
            | DispatchError::ShapeMismatch { family, .. }
            | DispatchError::InvalidAuxiliaryArity { family, .. }
            | DispatchError::NullOperand { family, .. }
            | DispatchError::NullContext { family }
            | DispatchError::TypeMismatch { family, .. } => *family,
        }
    }

    pub(crate) fn shape(family: OpFamily, reason: impl Into<String>) -> Self {
        DispatchError::ShapeMismatch {
            family,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_opcode() {
        let err = DispatchError::InvalidOpcode {
            family: OpFamily::Reduce,
            opcode: 42,
            dtype: DType::Float32,
        };
        assert_eq!(
            err.to_string(),
            "Invalid opcode: no reduce kernel registered as 42 for 'f32'."
        );
    }

    #[test]
    fn test_null_handles_are_fatal() {
        assert!(DispatchError::NullContext { family: OpFamily::Scalar }.is_fatal());
        assert!(
            DispatchError::NullOperand {
                family: OpFamily::Pairwise,
                operand: "y"
            }
            .is_fatal()
        );
        assert!(!DispatchError::shape(OpFamily::Pairwise, "x").is_fatal());
    }

    #[test]
    fn test_family_accessor() {
        let err = DispatchError::InvalidAuxiliaryArity {
            family: OpFamily::Transform,
            kernel: "pow",
            expected: 1,
            found: 0,
        };
        assert_eq!(err.family(), OpFamily::Transform);
    }
}
