//! Error types for expression compilation.

use thiserror::Error;

/// Errors raised while compiling expressions into SQL.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No builder is registered for the expression type or any of its ancestors.
    #[error("unsupported expression kind: {type_name}")]
    UnsupportedExpression {
        /// Concrete type name of the rejected expression.
        type_name: &'static str,
    },

    /// A builder received an expression of a type it cannot handle.
    #[error("builder for {expected} received {found}")]
    UnexpectedExpression {
        /// Type the builder was written for.
        expected: &'static str,
        /// Type actually handed to the builder.
        found: &'static str,
    },

    /// A JSON expression wraps a value that cannot be serialized.
    #[error("invalid structured value: {0}")]
    InvalidStructuredValue(String),

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for compilation.
pub type Result<T> = std::result::Result<T, QueryError>;
