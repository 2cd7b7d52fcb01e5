use crate::Library;
use crate::error::{ErrorKind, Result};
use crate::prompt::Prompter;
use crate::resolve::{Entry, select};
use boiler_extract::{SnippetMetadata, StackConfig};
use boiler_index::Kind;
use exn::ResultExt;
use std::fs;
use std::path::Path;
use time::OffsetDateTime;

/// Which maps of the index an operation covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    All,
    Snippets,
    Stacks,
}
impl Scope {
    pub fn kinds(self) -> &'static [Kind] {
        match self {
            Self::All => &[Kind::Snippet, Kind::Stack],
            Self::Snippets => &[Kind::Snippet],
            Self::Stacks => &[Kind::Stack],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    Snippet(SnippetMetadata),
    Stack { files: usize, directories: usize, config: Option<StackConfig> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub entry: Entry,
    /// File size, or the total size of every file in a stack.
    pub size: u64,
    pub modified: Option<OffsetDateTime>,
    pub details: Details,
}

impl Library {
    /// Entries of the scope, snippets before stacks, each in key order.
    pub fn list(&self, scope: Scope) -> Vec<Entry> {
        self.filtered(scope, |_| true)
    }

    /// Entries whose key contains `query`, ignoring case.
    pub fn search(&self, query: &str, scope: Scope) -> Vec<Entry> {
        let query = query.trim().to_lowercase();
        self.filtered(scope, |key| key.to_lowercase().contains(&query))
    }

    fn filtered(&self, scope: Scope, keep: impl Fn(&str) -> bool) -> Vec<Entry> {
        let keep = &keep;
        scope
            .kinds()
            .iter()
            .flat_map(move |&kind| {
                self.index
                    .entries(kind)
                    .filter(move |(key, _)| keep(key))
                    .map(move |(key, path)| Entry { kind, key: key.to_string(), path: path.to_path_buf() })
            })
            .collect()
    }

    /// Describe one resource, resolving the name the same way `add` does.
    pub fn info(&self, resource: &str, prompter: &mut dyn Prompter) -> Result<Info> {
        let entry = select(&self.index, resource, prompter)?;
        let io = || ErrorKind::Io(format!("cannot inspect {}", entry.path.display()));
        let metadata = match fs::metadata(&entry.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                exn::bail!(ErrorKind::not_found(entry.kind.as_str(), entry.path.display().to_string()))
            },
            Err(e) => return Err(e).or_raise(io),
        };
        let modified = metadata.modified().ok().map(OffsetDateTime::from);
        let (size, details) = match entry.kind {
            Kind::Snippet => {
                let snippet = boiler_extract::extract(&entry.path).map_err(ErrorKind::extract)?;
                (metadata.len(), Details::Snippet(snippet))
            },
            Kind::Stack => {
                let (files, directories, bytes) = tree_stats(&entry.path).or_raise(io)?;
                let config = StackConfig::load(&entry.path).ok();
                (bytes, Details::Stack { files, directories, config })
            },
        };
        Ok(Info { entry, size, modified, details })
    }
}

/// Files, subdirectories and total bytes beneath `root`.
fn tree_stats(root: &Path) -> std::io::Result<(usize, usize, u64)> {
    let (mut files, mut directories, mut bytes) = (0, 0, 0);
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                directories += 1;
                pending.push(entry.path());
            } else if file_type.is_file() {
                files += 1;
                bytes += entry.metadata()?.len();
            }
        }
    }
    Ok((files, directories, bytes))
}
