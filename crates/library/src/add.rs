use crate::Library;
use crate::error::{ErrorKind, Result};
use crate::prompt::{Prompter, prompt_error};
use crate::resolve::{Entry, select};
use boiler_extract::StackConfig;
use boiler_extract::error::ErrorKind as ExtractErrorKind;
use boiler_extract::stack::FILENAME;
use boiler_index::Kind;
use boiler_materialize::{Ignore, OnConflict, Substitutions, copy_dir, copy_file, copy_with_substitution};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRequest {
    /// Resource name as typed, e.g. `logger`, `logger@2.js`, `express-api`.
    pub resource: String,
    /// Directory to materialize into.
    pub destination: PathBuf,
    /// Authorizes overwriting existing files.
    pub force: bool,
}
impl AddRequest {
    pub fn new(resource: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self { resource: resource.into(), destination: destination.into(), force: false }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub entry: Entry,
    /// The written file for snippets, the target directory for stacks.
    pub destination: PathBuf,
    pub files: usize,
    /// Values used for each declared variable.
    pub variables: BTreeMap<String, String>,
}

impl Library {
    /// Materialize a stored snippet or stack into `request.destination`.
    #[instrument(skip_all, fields(resource = %request.resource))]
    pub fn add(&self, request: &AddRequest, prompter: &mut dyn Prompter) -> Result<Added> {
        let entry = select(&self.index, &request.resource, prompter)?;
        let on_conflict = OnConflict::from(request.force);
        tracing::debug!(key = %entry.key, kind = %entry.kind, "Resolved resource");
        match entry.kind {
            Kind::Snippet => self.add_snippet(entry, &request.destination, on_conflict, prompter),
            Kind::Stack => self.add_stack(entry, &request.destination, on_conflict),
        }
    }

    /// The destination file drops the version: `logger@2.js` becomes
    /// `logger.js`. Variables are asked for in name order, an empty answer
    /// keeping the declared default.
    fn add_snippet(
        &self,
        entry: Entry,
        directory: &Path,
        on_conflict: OnConflict,
        prompter: &mut dyn Prompter,
    ) -> Result<Added> {
        if !entry.path.is_file() {
            exn::bail!(ErrorKind::not_found("snippet file", entry.path.display().to_string()));
        }
        let destination = directory.join(entry.name().file_name());
        // Refuse before asking for values that would go unused.
        if on_conflict == OnConflict::Fail && destination.exists() {
            exn::bail!(ErrorKind::AlreadyExists(destination));
        }
        let metadata = boiler_extract::extract(&entry.path).map_err(ErrorKind::extract)?;
        let mut variables = BTreeMap::new();
        if metadata.has_variables() {
            for (name, default) in &metadata.variables {
                let message = format!("Enter value for {name}");
                let value = prompter.input(&message, Some(default.as_str())).map_err(prompt_error)?;
                variables.insert(name.clone(), value);
            }
            let substitutions: Substitutions = variables.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            copy_with_substitution(&entry.path, &destination, &substitutions, on_conflict)
                .map_err(ErrorKind::materialize)?;
        } else {
            copy_file(&entry.path, &destination, on_conflict).map_err(ErrorKind::materialize)?;
        }
        tracing::info!(key = %entry.key, destination = %destination.display(), "Added snippet");
        Ok(Added { entry, destination, files: 1, variables })
    }

    /// Stack contents are copied into `directory` itself, skipping the
    /// stack's own ignore names and the configured `add_ignore` names.
    fn add_stack(&self, entry: Entry, directory: &Path, on_conflict: OnConflict) -> Result<Added> {
        if !entry.path.is_dir() {
            exn::bail!(ErrorKind::not_found("stack directory", entry.path.display().to_string()));
        }
        let mut ignore = match StackConfig::load(&entry.path) {
            Ok(config) => Ignore::new(config.ignore_patterns()),
            Err(e) if matches!(&*e, ExtractErrorKind::NotFound(_)) => {
                tracing::warn!(key = %entry.key, "Stored stack has no configuration file");
                Ignore::new([FILENAME])
            },
            Err(e) => return Err(ErrorKind::extract(e)),
        };
        ignore.extend(self.config.add_ignore.iter().cloned());
        let summary = copy_dir(&entry.path, directory, &ignore, on_conflict).map_err(ErrorKind::materialize)?;
        tracing::info!(key = %entry.key, files = summary.files, "Added stack");
        Ok(Added { entry, destination: directory.to_path_buf(), files: summary.files, variables: BTreeMap::new() })
    }
}
