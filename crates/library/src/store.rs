use crate::Library;
use crate::error::{ErrorKind, Result};
use crate::prompt::Prompter;
use crate::resolve::Entry;
use crate::version::{Decision, resolve};
use boiler_extract::StackConfig;
use boiler_index::{Kind, Version, base_name, extension_of, snippet_key, stack_key, validate_name, validate_stack};
use boiler_materialize::{Ignore, OnConflict, copy_dir, copy_file};
use exn::{OptionExt, ResultExt};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// How to treat the source of a store operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreAs {
    /// Directories become stacks, files become snippets.
    #[default]
    Auto,
    Snippet,
    Stack,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRequest {
    pub source: PathBuf,
    /// Overrides the base name taken from the file name, `__name` or the
    /// stack config `id`.
    pub name: Option<String>,
    pub kind: StoreAs,
}
impl StoreRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into(), ..Self::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: StoreAs) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    pub entry: Entry,
    pub decision: Decision,
}

impl Library {
    /// Store a file as a snippet or a directory as a stack under a new or
    /// reused version.
    ///
    /// Metadata is extracted and validated before the user is asked anything,
    /// and the store copy is always a plain copy: substitution only happens
    /// when adding.
    #[instrument(skip_all, fields(source = %request.source.display()))]
    pub fn store(&mut self, request: &StoreRequest, prompter: &mut dyn Prompter) -> Result<Stored> {
        let source = fs::canonicalize(&request.source)
            .or_raise(|| ErrorKind::not_found("path", request.source.display().to_string()))?;
        let name = request.name.as_deref().map(str::trim).filter(|name| !name.is_empty());
        match (request.kind, source.is_dir()) {
            (StoreAs::Auto | StoreAs::Snippet, false) => self.store_snippet(&source, name, prompter),
            (StoreAs::Auto | StoreAs::Stack, true) => self.store_stack(&source, name, prompter),
            (StoreAs::Snippet, true) => exn::bail!(ErrorKind::Validation(format!(
                "'{}' is a directory and cannot be stored as a snippet",
                source.display()
            ))),
            (StoreAs::Stack, false) => exn::bail!(ErrorKind::Validation(format!(
                "'{}' is not a directory and cannot be stored as a stack",
                source.display()
            ))),
        }
    }

    fn store_snippet(&mut self, source: &Path, name: Option<&str>, prompter: &mut dyn Prompter) -> Result<Stored> {
        let file_name = source
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_raise(|| ErrorKind::Validation(format!("'{}' has no usable file name", source.display())))?;
        // Dotfiles such as `.gitignore` are their own extension.
        let Some(extension) = extension_of(file_name) else {
            exn::bail!(ErrorKind::Validation(format!("snippet '{file_name}' has no file extension")));
        };
        let metadata = boiler_extract::extract(source).map_err(ErrorKind::extract)?;
        metadata.validate().map_err(ErrorKind::extract)?;

        let stem = &file_name[..file_name.len() - extension.len()];
        let base = match (name, metadata.name.as_deref()) {
            (Some(name), _) => base_name(name.strip_suffix(extension).unwrap_or(name), extension),
            (None, Some(declared)) => declared,
            (None, None) => base_name(stem, extension),
        };
        let base = validate_name(base).map_err(ErrorKind::index)?.to_string();
        let declared = metadata.version.as_deref().map(str::parse::<Version>).transpose().map_err(ErrorKind::index)?;

        let existing = self.index.all_versions(&base, extension);
        let decision = resolve(&format!("{base}{extension}"), &existing, declared, prompter)?;
        let key = snippet_key(&base, decision.version(), extension);
        if decision.is_overwrite() {
            self.remove_entry(Kind::Snippet, &key)?;
        }

        let directory = self.config.paths.snippets.join(extension.trim_start_matches('.'));
        let destination = absolute(&directory.join(&key))?;
        copy_file(source, &destination, OnConflict::Overwrite).map_err(ErrorKind::materialize)?;
        self.index.add(Kind::Snippet, key.clone(), destination.clone()).map_err(ErrorKind::index)?;
        tracing::info!(%key, %decision, "Stored snippet");
        Ok(Stored { entry: Entry { kind: Kind::Snippet, key, path: destination }, decision })
    }

    fn store_stack(&mut self, source: &Path, name: Option<&str>, prompter: &mut dyn Prompter) -> Result<Stored> {
        let config = StackConfig::load(source).map_err(ErrorKind::extract)?;
        config.validate().map_err(ErrorKind::extract)?;
        let base = validate_stack(name.unwrap_or(&config.id)).map_err(ErrorKind::index)?.to_string();
        let declared: Version = config.version.parse().map_err(ErrorKind::index)?;

        let existing = self.index.all_versions(&base, "");
        let decision = resolve(&base, &existing, Some(declared), prompter)?;
        let key = stack_key(&base, decision.version());
        if decision.is_overwrite() {
            self.remove_entry(Kind::Stack, &key)?;
        }

        let destination = absolute(&self.config.paths.stacks.join(&key))?;
        if destination.exists() {
            tracing::warn!(path = %destination.display(), "Replacing unindexed stack directory");
            crate::clean::remove_path(&destination)?;
        }
        let ignore = Ignore::new(config.ignore_patterns());
        let summary = copy_dir(source, &destination, &ignore, OnConflict::Fail).map_err(ErrorKind::materialize)?;
        // The stored copy records the version it is actually stored under.
        let stored_config = StackConfig { version: decision.version().to_string(), ..config };
        stored_config.write(&destination).map_err(ErrorKind::extract)?;
        self.index.add(Kind::Stack, key.clone(), destination.clone()).map_err(ErrorKind::index)?;
        tracing::info!(%key, %decision, files = summary.files, "Stored stack");
        Ok(Stored { entry: Entry { kind: Kind::Stack, key, path: destination }, decision })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).or_raise(|| ErrorKind::Io(format!("cannot resolve {}", path.display())))
}
