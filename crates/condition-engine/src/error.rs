//! Error types for the condition engine.

use crate::ast::{LiteralKind, NodeKind};
use crate::value::ValueKind;
use thiserror::Error;

/// Result type for condition operations.
pub type Result<T> = std::result::Result<T, ConditionError>;

/// Errors that can occur while parsing or evaluating a condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    /// Expression text could not be parsed.
    #[error("Failed to parse expression: {0}")]
    ParseError(String),

    /// The whole expression is not a condition.
    #[error("Only conditional expressions are supported, got {0}")]
    UnsupportedTopLevel(NodeKind),

    /// A node cannot produce a boolean.
    #[error("Unexpected {0} in condition")]
    UnsupportedExpression(NodeKind),

    /// Operator is not defined in this position.
    #[error("Operator {0} not supported")]
    UnsupportedOperator(String),

    /// Literal of a kind the resolver does not handle.
    #[error("Literal type {0} not supported")]
    UnsupportedLiteralKind(LiteralKind),

    /// The blank identifier was used as a value.
    #[error("Cannot use _ as value")]
    BlankIdentifierUsed,

    /// Identifier not present in the context.
    #[error("Undefined: {0}")]
    UndefinedVariable(String),

    /// Literal text does not denote a valid value.
    #[error("Malformed literal {text}: {message}")]
    MalformedLiteral { text: String, message: String },

    /// A non-boolean value was used where a condition is required.
    #[error("Non-bool {expression} (type {kind}) used as condition")]
    NonBooleanCondition { expression: String, kind: ValueKind },

    /// Operands belong to different comparability families.
    #[error("Mismatched types {0} and {1}")]
    MismatchedTypes(ValueKind, ValueKind),

    /// Ordering operator applied to a kind without an ordering.
    #[error("Operator not defined on {0}: values are unordered")]
    UnorderedType(ValueKind),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ConditionError {
    pub(crate) fn malformed(text: impl Into<String>, message: impl Into<String>) -> Self {
        ConditionError::MalformedLiteral {
            text: text.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConditionError {
    fn from(err: serde_json::Error) -> Self {
        ConditionError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConditionError {
    fn from(err: serde_yaml::Error) -> Self {
        ConditionError::SerializationError(err.to_string())
    }
}
