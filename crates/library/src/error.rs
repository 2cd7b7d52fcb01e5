//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the lower crates are
//! raised into one of these kinds, keeping the original frame as a child.

use boiler_extract::error::{Error as ExtractError, ErrorKind as ExtractErrorKind};
use boiler_index::error::{Error as IndexError, ErrorKind as IndexErrorKind};
use boiler_materialize::error::{Error as MaterializeError, ErrorKind as MaterializeErrorKind};
use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A resource name, snippet file or stack directory is absent.
    #[display("{what} '{key}' not found")]
    NotFound { what: &'static str, key: String },
    /// The destination is already present and overwriting was not authorized.
    #[display("file '{}' already exists. Use --force to overwrite", _0.display())]
    AlreadyExists(#[error(not(source))] PathBuf),
    /// Missing metadata, a bad version string or a bad name.
    #[display("{_0}")]
    Validation(#[error(not(source))] String),
    /// Reading, writing, copying or removing failed.
    #[display("I/O error: {_0}")]
    Io(#[error(not(source))] String),
    /// The user chose cancel, made an invalid choice or closed the input.
    #[display("cancelled")]
    UserCancelled,
    /// Configuration could not be loaded.
    #[display("configuration error")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    pub(crate) fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound { what, key: key.into() }
    }

    /// Convert an index error, preserving its `Exn` frame as a child.
    #[track_caller]
    pub fn index(err: IndexError) -> Error {
        let kind = match &*err {
            IndexErrorKind::Io(_) | IndexErrorKind::Malformed(_) => Self::Io((*err).to_string()),
            IndexErrorKind::InvalidName(_) | IndexErrorKind::InvalidVersion(_) => Self::Validation((*err).to_string()),
        };
        err.raise(kind)
    }

    /// Convert an extraction error, preserving its `Exn` frame as a child.
    #[track_caller]
    pub fn extract(err: ExtractError) -> Error {
        let kind = match &*err {
            ExtractErrorKind::NotFound(path) => Self::not_found("file", path.display().to_string()),
            ExtractErrorKind::Io(_) => Self::Io((*err).to_string()),
            ExtractErrorKind::MissingField(_) | ExtractErrorKind::Malformed(_) => Self::Validation((*err).to_string()),
        };
        err.raise(kind)
    }

    /// Convert a materialization error, preserving its `Exn` frame as a child.
    #[track_caller]
    pub fn materialize(err: MaterializeError) -> Error {
        let kind = match &*err {
            MaterializeErrorKind::NotFound(path) => Self::not_found("file", path.display().to_string()),
            MaterializeErrorKind::AlreadyExists(path) => Self::AlreadyExists(path.clone()),
            MaterializeErrorKind::PermissionDenied(_) | MaterializeErrorKind::Io(_) => Self::Io((*err).to_string()),
        };
        err.raise(kind)
    }
}
