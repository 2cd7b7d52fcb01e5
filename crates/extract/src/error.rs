//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The snippet file or stack configuration could not be opened.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The file was opened but reading or writing it failed part way.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A required field is missing from snippet metadata or a stack config.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// The stack configuration is not valid JSON of the expected shape.
    #[display("malformed stack configuration: {}", _0.display())]
    Malformed(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Only I/O can change between attempts; content is either valid or not.
        matches!(self, Self::Io(_))
    }
}
