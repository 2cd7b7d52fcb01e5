//! Copy plans.
//!
//! Every copy is planned in full before anything is written: the source is
//! walked once, ignored entries are dropped, and the resulting steps are
//! checked against the destination. A conflict found while checking aborts
//! with nothing written; a failure part way through executing does not roll
//! back what was already copied.

use crate::error::{ErrorKind, Result};
use crate::ignore::Ignore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What to do when a planned destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnConflict {
    #[default]
    Fail,
    Overwrite,
}
impl From<bool> for OnConflict {
    /// `true` authorizes overwriting (a `--force` flag).
    fn from(force: bool) -> Self {
        match force {
            true => Self::Overwrite,
            false => Self::Fail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateDir { source: PathBuf, destination: PathBuf },
    CopyFile { source: PathBuf, destination: PathBuf },
}
impl Step {
    pub fn destination(&self) -> &Path {
        match self {
            Self::CreateDir { destination, .. } | Self::CopyFile { destination, .. } => destination,
        }
    }
}

/// Totals reported after a plan has executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    steps: Vec<Step>,
}

impl CopyPlan {
    /// A plan copying one file. The source is not touched until execution.
    pub fn file(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self { steps: vec![Step::CopyFile { source: source.into(), destination: destination.into() }] }
    }

    /// Walk `source` depth-first (entries sorted by name) and plan a copy of
    /// the tree into `destination`.
    ///
    /// Entries whose name is in `ignore` are skipped along with everything
    /// beneath them. Symlinks are followed; dangling ones are skipped.
    #[instrument(skip_all, fields(source = %source.as_ref().display()))]
    pub fn dir(source: impl AsRef<Path>, destination: impl AsRef<Path>, ignore: &Ignore) -> Result<Self> {
        let source = source.as_ref();
        let metadata = fs::metadata(source).map_err(|e| ErrorKind::from_io(e, source))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::NotFound(source.to_path_buf()));
        }
        let mut plan = Self::default();
        plan.walk(source, destination.as_ref(), ignore)?;
        tracing::debug!(steps = plan.steps.len(), "Planned directory copy");
        Ok(plan)
    }

    fn walk(&mut self, source: &Path, destination: &Path, ignore: &Ignore) -> Result<()> {
        self.steps.push(Step::CreateDir { source: source.to_path_buf(), destination: destination.to_path_buf() });
        let mut entries = fs::read_dir(source)
            .map_err(|e| ErrorKind::from_io(e, source))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ErrorKind::from_io(e, source))?;
        entries.sort_by_key(|entry| entry.file_name());
        for entry in entries {
            let name = entry.file_name();
            let path = entry.path();
            if ignore.matches(&name) {
                tracing::debug!(path = %path.display(), "Skipping ignored entry");
                continue;
            }
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "Skipping dangling symlink");
                    continue;
                },
                Err(e) => exn::bail!(ErrorKind::from_io(e, &path)),
            };
            let target = destination.join(&name);
            if metadata.is_dir() {
                self.walk(&path, &target, ignore)?;
            } else if metadata.is_file() {
                self.steps.push(Step::CopyFile { source: path, destination: target });
            } else {
                tracing::warn!(path = %path.display(), "Skipping special file");
            }
        }
        Ok(())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Destinations of planned files, in plan order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.steps.iter().filter_map(|step| match step {
            Step::CopyFile { destination, .. } => Some(destination.as_path()),
            Step::CreateDir { .. } => None,
        })
    }

    /// Fails with [`AlreadyExists`](ErrorKind::AlreadyExists) on the first
    /// destination that blocks the plan.
    ///
    /// An existing file blocks a file step unless overwriting is authorized.
    /// A file where a directory is planned (or the reverse) always blocks.
    pub fn check(&self, on_conflict: OnConflict) -> Result<()> {
        for step in &self.steps {
            let destination = step.destination();
            let Ok(existing) = fs::symlink_metadata(destination) else {
                continue;
            };
            let blocked = match step {
                Step::CreateDir { .. } => !existing.is_dir() && !destination.is_dir(),
                Step::CopyFile { .. } => destination.is_dir() || on_conflict == OnConflict::Fail,
            };
            if blocked {
                exn::bail!(ErrorKind::AlreadyExists(destination.to_path_buf()));
            }
        }
        Ok(())
    }

    /// Check, then copy every file byte for byte (mode bits included).
    pub fn execute(&self, on_conflict: OnConflict) -> Result<CopySummary> {
        self.execute_with(on_conflict, |source, destination| {
            fs::copy(source, destination).map_err(|e| ErrorKind::from_io(e, source).into())
        })
    }

    /// Check, then run the plan using `copy` for each file step.
    ///
    /// Directories created by the plan take their source's permissions once
    /// everything beneath them has been written.
    pub fn execute_with<F>(&self, on_conflict: OnConflict, mut copy: F) -> Result<CopySummary>
    where
        F: FnMut(&Path, &Path) -> Result<u64>,
    {
        self.check(on_conflict)?;
        let mut summary = CopySummary::default();
        let mut created = Vec::new();
        for step in &self.steps {
            match step {
                Step::CreateDir { source, destination } => {
                    if !destination.is_dir() {
                        fs::create_dir_all(destination).map_err(|e| ErrorKind::from_io(e, destination))?;
                        created.push((source, destination));
                    }
                    summary.directories += 1;
                },
                Step::CopyFile { source, destination } => {
                    if let Some(parent) = destination.parent()
                        && !parent.as_os_str().is_empty()
                    {
                        fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
                    }
                    summary.bytes += copy(source, destination)?;
                    summary.files += 1;
                    tracing::debug!(destination = %destination.display(), "Copied file");
                },
            }
        }
        for (source, destination) in created.into_iter().rev() {
            let permissions = fs::metadata(source).map_err(|e| ErrorKind::from_io(e, source))?.permissions();
            fs::set_permissions(destination, permissions).map_err(|e| ErrorKind::from_io(e, destination))?;
        }
        Ok(summary)
    }
}
