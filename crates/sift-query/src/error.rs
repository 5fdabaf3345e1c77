//! Error types for query construction.

use thiserror::Error;

/// Errors raised while building a query.
///
/// Both variants are build-time failures: the query never reaches the index.
/// Callers fix the offending input (`InvalidPredicate`) or restructure the
/// query so every predicate can be pushed down (`UnsupportedPredicate`).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The predicate is malformed: unknown field, bad regex, or an
    /// out-of-range parameter.
    #[error("invalid predicate on field `{field}`: {message}")]
    InvalidPredicate {
        /// Field the predicate targets.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The predicate is well-formed but cannot be translated into the index
    /// backend's native query representation.
    #[error("predicate on field `{field}` cannot be pushed to the index: {message}")]
    UnsupportedPredicate {
        /// Field the predicate targets.
        field: String,
        /// Why the backend cannot evaluate it.
        message: String,
    },
}

impl QueryError {
    /// Creates an `InvalidPredicate` error.
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPredicate {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an `UnsupportedPredicate` error.
    pub(crate) fn unsupported(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedPredicate {
            field: field.into(),
            message: message.into(),
        }
    }
}
