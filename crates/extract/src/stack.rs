//! The `boiler.stack.json` file describing a stack's source directory.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::instrument;

/// Name of the stack configuration file inside a stack directory.
pub const FILENAME: &str = "boiler.stack.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    #[serde(default)]
    pub id: String,
    /// A positive integer, kept as text as it appears in the file.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Exact entry names to skip when copying the stack.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl StackConfig {
    /// A fresh version 1 configuration stamped with the current time.
    pub fn new(id: impl Into<String>, author: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: "1".to_string(),
            author: author.into(),
            description: description.into(),
            created_at: Some(OffsetDateTime::now_utc()),
            ignore: Vec::new(),
        }
    }

    pub fn path_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(FILENAME)
    }

    /// Read the configuration from a stack directory.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = Self::path_in(dir);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Err(e).or_raise(|| ErrorKind::NotFound(path)),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io(path)),
        };
        serde_json::from_str(&data).or_raise(|| ErrorKind::Malformed(path))
    }

    /// Checks the required fields are present.
    ///
    /// Whether `version` is a valid integer is decided by the caller, at the
    /// point a version is actually allocated.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            exn::bail!(ErrorKind::MissingField("id"));
        }
        if self.version.trim().is_empty() {
            exn::bail!(ErrorKind::MissingField("version"));
        }
        Ok(())
    }

    /// The configured ignore names plus the configuration file itself.
    pub fn ignore_patterns(&self) -> Vec<String> {
        let mut patterns = self.ignore.clone();
        if !patterns.iter().any(|p| p == FILENAME) {
            patterns.push(FILENAME.to_string());
        }
        patterns
    }

    /// Write the configuration into `dir`, replacing any existing file.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = Self::path_in(dir);
        let mut data = serde_json::to_string_pretty(self).or_raise(|| ErrorKind::Io(path.clone()))?;
        data.push('\n');
        fs::write(&path, data).or_raise(|| ErrorKind::Io(path.clone()))?;
        Ok(path)
    }
}
