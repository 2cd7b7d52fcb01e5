//! Versioned snippet and stack management.
//!
//! A [`Library`] couples the loaded [`Config`] with the resource [`Index`] and
//! runs every user-facing operation: store, add, clean, list, search and
//! info. Anything that needs an answer from the user asks a [`Prompter`].

pub mod error;
mod add;
mod clean;
mod init;
mod prompt;
mod query;
mod resolve;
mod store;
mod version;

pub use crate::add::{AddRequest, Added};
pub use crate::clean::Cleaned;
pub use crate::init::{Scaffold, git_author, init_snippet, init_stack};
#[cfg(any(test, feature = "mock"))]
pub use crate::prompt::ScriptedPrompter;
pub use crate::prompt::{Prompter, is_yes, prompt_error};
pub use crate::query::{Details, Info, Scope};
pub use crate::resolve::Entry;
pub use crate::store::{StoreAs, StoreRequest, Stored};
pub use crate::version::Decision;

use crate::error::{ErrorKind, Result};
use boiler_config::Config;
use boiler_index::Index;
use tracing::instrument;

pub struct Library {
    pub(crate) config: Config,
    pub(crate) index: Index,
}

impl Library {
    /// Load (or create) the index that `config` points at.
    #[instrument(skip_all, fields(index = %config.index_path().display()))]
    pub fn open(config: Config) -> Result<Self> {
        let index = Index::load(config.index_path()).map_err(ErrorKind::index)?;
        Ok(Self { config, index })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &Index {
        &self.index
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A library whose store lives inside a fresh temporary directory.
    pub(crate) fn library() -> (TempDir, Library) {
        let temp_dir = tempfile::tempdir().unwrap();
        let library = Library::open(Config::with_root(temp_dir.path().join("home"))).unwrap();
        (temp_dir, library)
    }

    pub(crate) fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_open_creates_index() {
        let (_temp_dir, library) = library();
        assert!(library.index().path().is_file());
        assert!(library.index().is_empty());
        assert!(library.index().path().starts_with(&library.config().paths.store));
    }
}
