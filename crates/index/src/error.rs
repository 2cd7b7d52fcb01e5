//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The index file could not be read, written, or its directory created.
    #[display("index I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The index file exists but does not contain a valid index document.
    #[display("malformed index file: {}", _0.display())]
    Malformed(#[error(not(source))] PathBuf),
    /// A resource name cannot be used to build an index key.
    #[display("invalid resource name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// A version string is not a positive integer.
    #[display("invalid version: {_0:?} (must be a positive integer)")]
    InvalidVersion(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
