//! Error types for constant evaluation.

use crate::expression::term::NodeValue;
use thiserror::Error;

/// Failure of the constant evaluation service.
///
/// `NotComparable` becomes the type-error sentinel during partial evaluation.
/// `Other` leaves the expression in its partially evaluated form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FoldError {
    #[error("Values not comparable: {left} and {right}")]
    NotComparable { left: NodeValue, right: NodeValue },

    #[error("{message}")]
    Other { message: String },
}

impl FoldError {
    pub fn not_comparable(left: &NodeValue, right: &NodeValue) -> Self {
        FoldError::NotComparable {
            left: left.clone(),
            right: right.clone(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        FoldError::Other {
            message: message.into(),
        }
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::other(format!("Unknown function: {}", name))
    }

    pub fn argument_count(function: &str, expected: usize, actual: usize) -> Self {
        Self::other(format!(
            "Function {} expects {} arguments, got {}",
            function, expected, actual
        ))
    }

    pub fn invalid_operands(operator: &str, operands: &[NodeValue]) -> Self {
        let operands = operands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::other(format!(
            "Invalid operand types for operator {}: {}",
            operator, operands
        ))
    }

    pub fn is_not_comparable(&self) -> bool {
        matches!(self, FoldError::NotComparable { .. })
    }
}

/// Result type for constant evaluation
pub type FoldResult<T> = Result<T, FoldError>;
