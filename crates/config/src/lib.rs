//! Configuration for boiler.
//!
//! Values are layered with `figment`: built-in defaults, then the JSON file
//! (`~/.boiler/boiler.conf.json` unless another is named), then `BOILER_*`
//! environment variables where `__` separates nested keys, e.g.
//! `BOILER_PATHS__STORE=/srv/boiler`.

pub mod error;
mod expand;

use crate::error::{ErrorKind, Result};
use crate::expand::{expand_with, needs_home};
use boiler_index::INDEX_FILE_NAME;
use directories::BaseDirs;
use exn::OptionExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Name of the configuration file inside the boiler root.
pub const CONFIG_FILE_NAME: &str = "boiler.conf.json";
/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BOILER_";
/// Comment prefix used when no artifact entry matches.
pub const FALLBACK_COMMENT_PREFIX: &str = "//  ";

const DEFAULT_ARTIFACT: &str = "default";
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub root: PathBuf,
    /// Holds the index file.
    pub store: PathBuf,
    /// Snippet files, one subdirectory per extension.
    pub snippets: PathBuf,
    /// Stack directories.
    pub stacks: PathBuf,
}
impl Paths {
    /// Standard layout below `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let store = root.join("store");
        Self { snippets: store.join("snippets"), stacks: store.join("stacks"), store, root }
    }

    fn iter_mut(&mut self) -> [&mut PathBuf; 4] {
        [&mut self.root, &mut self.store, &mut self.snippets, &mut self.stacks]
    }
}
impl Default for Paths {
    fn default() -> Self {
        Self::under("~/.boiler")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    /// Comment prefix by artifact, which is usually an extension without its
    /// dot (`js`, `py`), used when scaffolding snippets.
    pub artifacts: BTreeMap<String, String>,
    /// Entry names never copied when a stack is added to a project.
    pub add_ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let slashes = ["default", "bl", "js", "jsx", "ts", "tsx", "go", "rs", "c", "cpp", "java", "kt", "swift"];
        let hashes = ["py", "rb", "sh", "bash", "ps1", "yml", "yaml", "dockerfile", "gitignore", "env", "toml"];
        let artifacts = slashes
            .into_iter()
            .map(|a| (a, "//  "))
            .chain(hashes.into_iter().map(|a| (a, "#  ")))
            .chain(["html", "htm", "xml", "md"].into_iter().map(|a| (a, "<!--  ")))
            .chain([("css", "/*  "), ("sql", "--  "), ("ahk", ";  "), ("ini", ";  ")])
            .map(|(a, p)| (a.to_string(), p.to_string()))
            .collect();
        Self {
            paths: Paths::default(),
            artifacts,
            add_ignore: ["node_modules", ".git", ".DS_Store", "Thumbs.db"].map(String::from).to_vec(),
        }
    }
}

impl Config {
    /// Default configuration file location, `~/.boiler/boiler.conf.json`.
    pub fn default_file() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".boiler").join(CONFIG_FILE_NAME))
    }

    /// Load the layered configuration.
    ///
    /// With `file = None` the default file is used when it exists; a missing
    /// default file is not an error. A file named explicitly must exist.
    #[instrument]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(file) if !file.is_file() => exn::bail!(ErrorKind::FileNotFound(file.to_path_buf())),
            Some(file) => Some(file.to_path_buf()),
            None => Self::default_file(),
        };
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = &file {
            tracing::debug!(file = %file.display(), "Merging configuration file");
            figment = figment.merge(Json::file(file));
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract from an already layered figment and expand the paths.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: Self = figment.extract().map_err(|e| ErrorKind::Invalid(e.to_string()))?;
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        config.expand_paths(home.as_deref())?;
        Ok(config)
    }

    /// Configuration rooted at `root` with paths already absolute; nothing
    /// is read from disk or the environment.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { paths: Paths::under(root), ..Self::default() }
    }

    fn expand_paths(&mut self, home: Option<&Path>) -> Result<()> {
        for path in self.paths.iter_mut() {
            if needs_home(path) && home.is_none() {
                exn::bail!(ErrorKind::NoHomeDirectory);
            }
            *path = expand_with(path, home, |name| std::env::var(name).ok());
        }
        Ok(())
    }

    /// Comment prefix for `artifact` (case-insensitive), falling back to the
    /// `default` artifact and then to `//  `.
    pub fn comment_prefix(&self, artifact: &str) -> &str {
        let artifact = artifact.trim_start_matches('.').to_ascii_lowercase();
        self.artifacts
            .get(&artifact)
            .or_else(|| self.artifacts.get(DEFAULT_ARTIFACT))
            .map_or(FALLBACK_COMMENT_PREFIX, String::as_str)
    }

    /// The index file, named as `boiler-index` names it, inside `paths.store`.
    pub fn index_path(&self) -> PathBuf {
        self.paths.store.join(INDEX_FILE_NAME)
    }

    /// The boiler root directory, which must exist before anything is stored.
    pub fn root(&self) -> Result<&Path> {
        Some(self.paths.root.as_path())
            .filter(|root| !root.as_os_str().is_empty())
            .ok_or_raise(|| ErrorKind::Invalid("paths.root is empty".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = Config::with_root("/tmp/bl");
        assert_eq!(config.paths.snippets, PathBuf::from("/tmp/bl/store/snippets"));
        assert_eq!(config.paths.stacks, PathBuf::from("/tmp/bl/store/stacks"));
        assert_eq!(config.index_path(), PathBuf::from("/tmp/bl/store/boiler.meta.json"));
        assert!(config.index_path().ends_with(INDEX_FILE_NAME));
        assert!(config.add_ignore.iter().any(|n| n == "node_modules"));
    }

    #[rstest]
    #[case("js", "//  ")]
    #[case(".py", "#  ")]
    #[case("HTML", "<!--  ")]
    #[case("css", "/*  ")]
    #[case("sql", "--  ")]
    #[case("ini", ";  ")]
    #[case("unknown", "//  ")]
    fn test_comment_prefix(#[case] artifact: &str, #[case] expected: &str) {
        assert_eq!(Config::default().comment_prefix(artifact), expected);
    }

    #[test]
    fn test_comment_prefix_without_default_entry() {
        let config = Config { artifacts: BTreeMap::new(), ..Config::default() };
        assert_eq!(config.comment_prefix("py"), FALLBACK_COMMENT_PREFIX);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join(CONFIG_FILE_NAME);
        let root = temp_dir.path().join("root");
        fs::write(
            &file,
            format!(
                r#"{{ "paths": {{ "store": "{}" }}, "artifacts": {{ "lua": "--  " }}, "add_ignore": ["target"] }}"#,
                root.join("store").display()
            ),
        )
        .unwrap();
        let figment = Figment::from(Serialized::defaults(Config::with_root(&root))).merge(Json::file(&file));
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.paths.store, root.join("store"));
        assert_eq!(config.paths.stacks, root.join("store/stacks"));
        assert_eq!(config.comment_prefix("lua"), "--  ");
        // Maps merge with the defaults; lists are replaced.
        assert_eq!(config.comment_prefix("py"), "#  ");
        assert_eq!(config.add_ignore, vec!["target"]);
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&file, r#"{ "add_ignore": 42 }"#).unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Json::file(&file));
        let err = Config::from_figment(figment).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.json");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert_eq!(*err, ErrorKind::FileNotFound(missing));
    }
}
