//! Scaffolding for new snippets and stacks.

use crate::error::{ErrorKind, Result};
use crate::prompt::{Prompter, prompt_error};
use boiler_config::Config;
use boiler_extract::StackConfig;
use boiler_index::extension_of;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;
use upon::Engine;

const SNIPPET_TEMPLATE: &str = "\
{{ prefix }}__author {{ author }}{{ suffix }}
{% if has_description %}{{ prefix }}__desc {{ description }}{{ suffix }}
{% endif %}{{ prefix }}__var bl__EXAMPLE_VAR = DefaultValue{{ suffix }}

{{ prefix }}Your code here{{ suffix }}
";

const DEFAULT_ARTIFACT: &str = "default";

/// The answers a scaffold is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scaffold {
    pub name: String,
    pub author: String,
    pub description: String,
}

impl Scaffold {
    /// Answers without asking anything: the default name and the git author.
    pub fn defaults(name: impl Into<String>) -> Self {
        Self { name: name.into(), author: git_author(), description: String::new() }
    }

    pub fn prompt(default_name: &str, prompter: &mut dyn Prompter) -> Result<Self> {
        let name = prompter.input("Name", Some(default_name)).map_err(prompt_error)?;
        let description = prompter.input("Description (optional)", None).map_err(prompt_error)?;
        let author = git_author();
        let author = prompter.input("Author", Some(author.as_str())).map_err(prompt_error)?;
        Ok(Self { name, author, description })
    }
}

/// `git config user.name`, or an empty string when git is unavailable.
pub fn git_author() -> String {
    match Command::new("git").args(["config", "user.name"]).output() {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).trim().to_string(),
        _ => String::new(),
    }
}

/// Write a fresh `boiler.stack.json` into `dir`.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn init_stack(dir: impl AsRef<Path>, scaffold: &Scaffold) -> Result<PathBuf> {
    let path = StackConfig::path_in(&dir);
    if path.exists() {
        exn::bail!(ErrorKind::AlreadyExists(path));
    }
    let config = StackConfig::new(&scaffold.name, &scaffold.author, &scaffold.description);
    config.write(dir).map_err(ErrorKind::extract)
}

/// Write a snippet scaffold to `file`.
///
/// The comment style comes from the file's extension; extension-less files
/// (`Dockerfile`, `Makefile`) use `artifact`, or the `default` artifact.
#[instrument(skip(config, scaffold), fields(file = %file.as_ref().display()))]
pub fn init_snippet(
    config: &Config,
    file: impl AsRef<Path>,
    artifact: Option<&str>,
    scaffold: &Scaffold,
) -> Result<PathBuf> {
    let file = file.as_ref();
    if file.exists() {
        exn::bail!(ErrorKind::AlreadyExists(file.to_path_buf()));
    }
    let file_name = file.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    let artifact = match extension_of(file_name) {
        Some(extension) => extension.trim_start_matches('.'),
        None => artifact.unwrap_or(DEFAULT_ARTIFACT),
    };
    let content = render_snippet(config.comment_prefix(artifact), scaffold)?;
    fs::write(file, content).or_raise(|| ErrorKind::Io(format!("failed to write {}", file.display())))?;
    tracing::info!(artifact, "Created snippet scaffold");
    Ok(file.to_path_buf())
}

fn render_snippet(prefix: &str, scaffold: &Scaffold) -> Result<String> {
    let suffix = match prefix.trim() {
        "<!--" => " -->",
        "/*" => " */",
        _ => "",
    };
    let engine = Engine::new();
    let invalid = || ErrorKind::Validation("invalid snippet template".to_string());
    let template = engine.compile(SNIPPET_TEMPLATE).or_raise(invalid)?;
    let description = scaffold.description.trim();
    let has_description = !description.is_empty();
    let context = upon::value! {
        prefix: prefix,
        suffix: suffix,
        author: scaffold.author.as_str(),
        has_description: has_description,
        description: description,
    };
    template.render(&engine, context).to_string().or_raise(invalid)
}
