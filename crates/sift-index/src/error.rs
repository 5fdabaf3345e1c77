//! Error types for the sift-index crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when working with the search index.
///
/// Every variant is scoped to a single operation; none is fatal to the
/// process. `Unavailable` is the transient-infrastructure case a caller may
/// retry with backoff; `Timeout` means this execution exceeded its deadline
/// and concurrent executions are unaffected.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The backing index cannot be reached or opened.
    #[error("index unavailable at {path}: {message}")]
    Unavailable {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Query execution exceeded its configured deadline.
    #[error("query execution exceeded the {budget_ms} ms deadline")]
    Timeout {
        /// The configured deadline in milliseconds.
        budget_ms: u64,
    },

    /// The query failed validation.
    #[error(transparent)]
    Query(#[from] sift_query::QueryError),

    /// Query execution failed inside the index provider.
    #[error("failed to execute query: {0}")]
    Execute(String),

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),
}

impl IndexError {
    /// Creates an `Unavailable` error from a path and Tantivy error.
    pub(crate) fn unavailable(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::Unavailable {
            path,
            message: source.to_string(),
        }
    }

    /// Creates an `Execute` error from a Tantivy error.
    pub(crate) fn execute(source: &tantivy::TantivyError) -> Self {
        Self::Execute(source.to_string())
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }
}
