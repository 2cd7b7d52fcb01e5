use crate::Library;
use crate::error::{ErrorKind, Result};
use crate::prompt::{Prompter, prompt_error};
use crate::query::Scope;
use crate::resolve::{Entry, select};
use boiler_index::Kind;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// How many entries a bulk clean removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cleaned {
    pub snippets: usize,
    pub stacks: usize,
}

impl Library {
    /// Remove one resource after confirmation.
    ///
    /// The name resolves exactly as for `add`. The backing file or directory
    /// is removed first (a missing one is not an error), then the entry.
    #[instrument(skip(self, prompter))]
    pub fn clean(&mut self, resource: &str, prompter: &mut dyn Prompter) -> Result<Entry> {
        let entry = select(&self.index, resource, prompter)?;
        let message = format!("Are you sure you want to remove {} '{}'?", entry.kind, entry.key);
        if !prompter.confirm(&message).map_err(prompt_error)? {
            exn::bail!(ErrorKind::UserCancelled);
        }
        self.remove_entry(entry.kind, &entry.key)?;
        tracing::info!(key = %entry.key, "Removed resource");
        Ok(entry)
    }

    /// Remove every entry in `scope` after a single confirmation. Nothing is
    /// asked when the scope is already empty.
    #[instrument(skip(self, prompter))]
    pub fn clean_all(&mut self, scope: Scope, prompter: &mut dyn Prompter) -> Result<Cleaned> {
        let count = |kind: Kind| match scope.kinds().contains(&kind) {
            true => self.index.len(kind),
            false => 0,
        };
        let (snippets, stacks) = (count(Kind::Snippet), count(Kind::Stack));
        if snippets + stacks == 0 {
            return Ok(Cleaned::default());
        }
        let message = format!("This will remove {snippets} snippet(s) and {stacks} stack(s). Are you sure?");
        if !prompter.confirm(&message).map_err(prompt_error)? {
            exn::bail!(ErrorKind::UserCancelled);
        }
        for kind in scope.kinds() {
            let keys: Vec<String> = self.index.list(*kind).into_iter().map(String::from).collect();
            for key in keys {
                self.remove_entry(*kind, &key)?;
            }
        }
        Ok(Cleaned { snippets, stacks })
    }

    /// Delete the backing path of `key` (if any) and then its entry.
    ///
    /// Not rolled back: if the entry cannot be saved after the path is gone,
    /// storing again recreates the path.
    pub(crate) fn remove_entry(&mut self, kind: Kind, key: &str) -> Result<Option<PathBuf>> {
        let Some(path) = self.index.get(kind, key).map(Path::to_path_buf) else {
            return Ok(None);
        };
        remove_path(&path)?;
        self.index.remove(kind, key).map_err(ErrorKind::index)?;
        tracing::debug!(%kind, %key, path = %path.display(), "Removed entry");
        Ok(Some(path))
    }
}

pub(crate) fn remove_path(path: &Path) -> Result<()> {
    let io = || ErrorKind::Io(format!("failed to remove {}", path.display()));
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path).or_raise(io),
        Ok(_) => fs::remove_file(path).or_raise(io),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Backing path already gone");
            Ok(())
        },
        Err(e) => Err(e).or_raise(io),
    }
}
