//! Error types for building and evaluating filter expressions.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while building or evaluating a filter expression.
///
/// Evaluation through [`FilterEvaluator::matches`](super::FilterEvaluator::matches)
/// never surfaces these; malformed shapes below the root simply fail to match.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The expression text is not valid JSON.
    #[error("invalid expression JSON: {message}")]
    InvalidJson {
        /// The underlying parser message.
        message: String,
    },

    /// The expression root is not a JSON object.
    #[error("expression must be a JSON object, found {found}")]
    NotAnObject {
        /// Kind of JSON value that was found instead.
        found: String,
    },

    /// Evaluation recursed deeper than the configured limit.
    #[error("expression depth exceeds maximum of {max_depth}")]
    DepthExceeded {
        /// The limit that was exceeded.
        max_depth: usize,
    },
}

impl FilterError {
    /// Creates an invalid JSON error.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        FilterError::InvalidJson {
            message: message.into(),
        }
    }

    /// Creates a not-an-object error.
    pub fn not_an_object(found: impl Into<String>) -> Self {
        FilterError::NotAnObject {
            found: found.into(),
        }
    }
}
