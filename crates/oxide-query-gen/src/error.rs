//! Error types for query generation.

use thiserror::Error;

use crate::operation::Operation;

/// Errors raised while generating SQL.
///
/// Generation is a pure function of its input, so none of these are
/// retryable: the caller has to change the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryGenError {
    /// The caller passed option keys the dialect does not implement for
    /// this operation.
    #[error(
        "{operation} does not support the following options in dialect {dialect}: {}",
        .keys.join(", ")
    )]
    Configuration {
        /// The operation being generated.
        operation: Operation,
        /// The dialect name.
        dialect: &'static str,
        /// The offending option keys, in the order they were found.
        keys: Vec<String>,
    },

    /// The input is well-formed but the dialect forbids the combination.
    #[error("{operation} is not supported by dialect {dialect}: {reason}")]
    UnsupportedOperation {
        /// The operation being generated.
        operation: Operation,
        /// The dialect name.
        dialect: &'static str,
        /// Which rule was violated.
        reason: String,
    },

    /// The input is structurally invalid regardless of dialect.
    #[error("invalid input for {operation}: {message}")]
    InvalidInput {
        /// The operation being generated.
        operation: Operation,
        /// Description of the problem.
        message: String,
    },
}

impl QueryGenError {
    /// Creates an [`QueryGenError::UnsupportedOperation`].
    #[must_use]
    pub fn unsupported(
        operation: Operation,
        dialect: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedOperation {
            operation,
            dialect,
            reason: reason.into(),
        }
    }

    /// Creates an [`QueryGenError::InvalidInput`].
    #[must_use]
    pub fn invalid(operation: Operation, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            operation,
            message: message.into(),
        }
    }

    /// Returns the operation the error was raised for.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Configuration { operation, .. }
            | Self::UnsupportedOperation { operation, .. }
            | Self::InvalidInput { operation, .. } => *operation,
        }
    }
}

/// Result type for query generation.
pub type Result<T> = std::result::Result<T, QueryGenError>;
