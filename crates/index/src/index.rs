//! The on-disk resource index.
//!
//! A single JSON document maps full keys to absolute paths, separately for
//! snippets and stacks. It's the sole source of truth for "does X exist"; the
//! store directories are never scanned. Every mutation rewrites the whole
//! document.

use crate::ResourceName;
use crate::error::{ErrorKind, Result};
use crate::version::Version;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// File name of the index inside the store root.
pub const INDEX_FILE_NAME: &str = "boiler.meta.json";

/// Which map of the index a resource lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// A single versioned file, keyed `name@version.ext`.
    Snippet,
    /// A versioned directory tree, keyed `name@version`.
    Stack,
}
impl Kind {
    /// An empty extension always denotes a stack.
    pub fn from_extension(extension: &str) -> Self {
        match extension.is_empty() {
            true => Self::Stack,
            false => Self::Snippet,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snippet => "snippet",
            Self::Stack => "stack",
        }
    }
}
impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    stacks: BTreeMap<String, PathBuf>,
    #[serde(default)]
    snippets: BTreeMap<String, PathBuf>,
}
impl Document {
    fn map(&self, kind: Kind) -> &BTreeMap<String, PathBuf> {
        match kind {
            Kind::Snippet => &self.snippets,
            Kind::Stack => &self.stacks,
        }
    }

    fn map_mut(&mut self, kind: Kind) -> &mut BTreeMap<String, PathBuf> {
        match kind {
            Kind::Snippet => &mut self.snippets,
            Kind::Stack => &mut self.stacks,
        }
    }
}

/// The resource index, loaded into memory and persisted on every mutation.
///
/// Keys are kept in a [`BTreeMap`], so "index order" is lexicographic key
/// order and stable across runs.
///
/// # Examples
///
/// ```no_run
/// use boiler_index::{Index, Kind};
///
/// # fn example() -> boiler_index::error::Result<()> {
/// let mut index = Index::load("/home/me/.boiler/store/boiler.meta.json")?;
/// index.add(Kind::Snippet, "logger@1.js", "/home/me/.boiler/store/snippets/js/logger@1.js")?;
/// assert!(index.exists(Kind::Snippet, "logger@1.js"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Index {
    path: PathBuf,
    document: Document,
}

impl Index {
    /// Load the index from `path`.
    ///
    /// If the file does not exist an empty index is created and persisted
    /// immediately. Missing maps inside an existing document are treated as
    /// empty.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                tracing::info!("Index file not found; initializing an empty index");
                let index = Self { path, document: Document::default() };
                index.save()?;
                return Ok(index);
            },
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io(path)),
        };
        let document = serde_json::from_str(&data).or_raise(|| ErrorKind::Malformed(path.clone()))?;
        Ok(Self { path, document })
    }

    /// Serialize the whole document and replace the index file.
    ///
    /// The document is written to a temporary sibling file first and then
    /// renamed over the index, so readers never observe a half-written file.
    /// There is no locking: the last writer wins.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<()> {
        let io = || ErrorKind::Io(self.path.clone());
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).or_raise(io)?;
        let data = serde_json::to_string_pretty(&self.document).or_raise(io)?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent).or_raise(io)?;
        tmp.write_all(data.as_bytes()).or_raise(io)?;
        tmp.as_file().sync_all().or_raise(io)?;
        tmp.persist(&self.path).or_raise(io)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `key → path` and persist. An existing entry under the same key
    /// is replaced, which keeps keys unique.
    pub fn add(&mut self, kind: Kind, key: impl Into<String>, path: impl Into<PathBuf>) -> Result<()> {
        let key = key.into();
        let path = path.into();
        tracing::debug!(%kind, %key, path = %path.display(), "Adding index entry");
        self.document.map_mut(kind).insert(key, path);
        self.save()
    }

    /// Remove `key` and persist, returning the path it pointed at.
    ///
    /// Removing a key that isn't present is not an error (and doesn't touch
    /// the file).
    pub fn remove(&mut self, kind: Kind, key: &str) -> Result<Option<PathBuf>> {
        let removed = self.document.map_mut(kind).remove(key);
        if removed.is_some() {
            tracing::debug!(%kind, %key, "Removed index entry");
            self.save()?;
        }
        Ok(removed)
    }

    pub fn exists(&self, kind: Kind, key: &str) -> bool {
        self.document.map(kind).contains_key(key)
    }

    pub fn get(&self, kind: Kind, key: &str) -> Option<&Path> {
        self.document.map(kind).get(key).map(PathBuf::as_path)
    }

    /// All keys of one map, in index order.
    pub fn list(&self, kind: Kind) -> Vec<&str> {
        self.document.map(kind).keys().map(String::as_str).collect()
    }

    /// All `(key, path)` entries of one map, in index order.
    pub fn entries(&self, kind: Kind) -> impl Iterator<Item = (&str, &Path)> {
        self.document.map(kind).iter().map(|(k, p)| (k.as_str(), p.as_path()))
    }

    pub fn len(&self, kind: Kind) -> usize {
        self.document.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.snippets.is_empty() && self.document.stacks.is_empty()
    }

    /// Every version recorded for `(name, extension)`, ascending.
    ///
    /// The map is chosen by the extension (empty means stacks). Keys whose
    /// version is missing or not a positive integer are skipped silently.
    pub fn all_versions(&self, name: &str, extension: &str) -> Vec<Version> {
        let kind = Kind::from_extension(extension);
        let mut versions: Vec<Version> = self
            .document
            .map(kind)
            .keys()
            .map(ResourceName::parse)
            .filter(|parsed| parsed.name == name && parsed.extension == extension)
            .filter_map(|parsed| parsed.version_number())
            .collect();
        versions.sort_unstable();
        versions.dedup();
        versions
    }

    /// The highest recorded version, if any. Insertion order is irrelevant.
    pub fn latest_version(&self, name: &str, extension: &str) -> Option<Version> {
        self.all_versions(name, extension).last().copied()
    }

    /// `max + 1` of the recorded versions, or 1 when there are none. Gaps are
    /// never reused. `None` once the latest version is [`u32::MAX`].
    pub fn next_version(&self, name: &str, extension: &str) -> Option<Version> {
        match self.latest_version(name, extension) {
            Some(latest) => latest.next(),
            None => Some(Version::FIRST),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn temp_index() -> (tempfile::TempDir, Index) {
        let temp_dir = tempfile::tempdir().unwrap();
        let index = Index::load(temp_dir.path().join("store").join(INDEX_FILE_NAME)).unwrap();
        (temp_dir, index)
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/store").join(INDEX_FILE_NAME);
        let index = Index::load(&path).unwrap();
        assert!(index.is_empty());
        assert!(path.exists());
        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({ "stacks": {}, "snippets": {} }));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(INDEX_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let err = Index::load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(p) if p == &path));
    }

    #[test]
    fn test_load_missing_maps() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(INDEX_FILE_NAME);
        fs::write(&path, r#"{ "snippets": { "logger@1.js": "/store/logger@1.js" } }"#).unwrap();
        let index = Index::load(&path).unwrap();
        assert_eq!(index.list(Kind::Snippet), vec!["logger@1.js"]);
        assert!(index.list(Kind::Stack).is_empty());
    }

    #[test]
    fn test_mutations_persist() {
        let (_temp_dir, mut index) = temp_index();
        index.add(Kind::Snippet, "logger@1.js", "/store/snippets/js/logger@1.js").unwrap();
        index.add(Kind::Stack, "express@1", "/store/stacks/express@1").unwrap();

        let reloaded = Index::load(index.path()).unwrap();
        assert_eq!(reloaded.get(Kind::Snippet, "logger@1.js"), Some(Path::new("/store/snippets/js/logger@1.js")));
        assert!(reloaded.exists(Kind::Stack, "express@1"));
        // Maps are separate.
        assert!(!reloaded.exists(Kind::Stack, "logger@1.js"));

        index.remove(Kind::Snippet, "logger@1.js").unwrap();
        let reloaded = Index::load(index.path()).unwrap();
        assert!(!reloaded.exists(Kind::Snippet, "logger@1.js"));
        assert_eq!(reloaded.len(Kind::Stack), 1);
    }

    #[test]
    fn test_add_same_key_keeps_one_entry() {
        let (_temp_dir, mut index) = temp_index();
        index.add(Kind::Snippet, "logger@1.js", "/old").unwrap();
        index.add(Kind::Snippet, "logger@1.js", "/new").unwrap();
        assert_eq!(index.len(Kind::Snippet), 1);
        assert_eq!(index.get(Kind::Snippet, "logger@1.js"), Some(Path::new("/new")));
    }

    #[test]
    fn test_remove_missing_key() {
        let (_temp_dir, mut index) = temp_index();
        assert_eq!(index.remove(Kind::Stack, "nothing@1").unwrap(), None);
    }

    #[test]
    fn test_list_is_sorted() {
        let (_temp_dir, mut index) = temp_index();
        for key in ["zeta@1.js", "alpha@2.js", "alpha@1.js"] {
            index.add(Kind::Snippet, key, format!("/store/{key}")).unwrap();
        }
        assert_eq!(index.list(Kind::Snippet), vec!["alpha@1.js", "alpha@2.js", "zeta@1.js"]);
    }

    #[rstest]
    #[case(&["logger@1.js", "logger@3.js"], "logger", ".js", &[1, 3], 4)]
    #[case(&["logger@3.js", "logger@1.js", "logger@10.js"], "logger", ".js", &[1, 3, 10], 11)]
    #[case(&["logger@1.ts", "logger@2.js"], "logger", ".ts", &[1], 2)]
    #[case(&["logger@x.js", "logger.js", "logger@2.js"], "logger", ".js", &[2], 3)]
    #[case(&["loggerx@5.js"], "logger", ".js", &[], 1)]
    #[case(&[], "logger", ".js", &[], 1)]
    fn test_snippet_versions(
        #[case] keys: &[&str],
        #[case] name: &str,
        #[case] extension: &str,
        #[case] expected: &[u32],
        #[case] next: u32,
    ) {
        let (_temp_dir, mut index) = temp_index();
        for key in keys {
            index.add(Kind::Snippet, *key, format!("/store/{key}")).unwrap();
        }
        let versions: Vec<u32> = index.all_versions(name, extension).into_iter().map(Version::get).collect();
        assert_eq!(versions, expected);
        assert_eq!(index.next_version(name, extension).map(Version::get), Some(next));
    }

    #[test]
    fn test_stack_versions_use_stack_map() {
        let (_temp_dir, mut index) = temp_index();
        index.add(Kind::Stack, "express@2", "/store/stacks/express@2").unwrap();
        index.add(Kind::Stack, "express@7", "/store/stacks/express@7").unwrap();
        // Same base name in the snippet map must not leak into stack versions.
        index.add(Kind::Snippet, "express@9.js", "/store/express@9.js").unwrap();
        let versions: Vec<u32> = index.all_versions("express", "").into_iter().map(Version::get).collect();
        assert_eq!(versions, vec![2, 7]);
        assert_eq!(index.latest_version("express", "").map(Version::get), Some(7));
        assert_eq!(index.next_version("express", "").map(Version::get), Some(8));

        index.add(Kind::Stack, format!("express@{}", u32::MAX), "/store/stacks/express@max").unwrap();
        assert_eq!(index.next_version("express", ""), None);
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(Kind::from_extension(""), Kind::Stack);
        assert_eq!(Kind::from_extension(".js"), Kind::Snippet);
        assert_eq!(Kind::Snippet.to_string(), "snippet");
    }
}
