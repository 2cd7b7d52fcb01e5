use crate::consts::{AUTHOR_REGEX, DESC_REGEX, NAME_REGEX, VAR_REGEX, VERSION_REGEX};
use crate::directive::clean_value;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

/// Metadata declared by directive comments inside a snippet.
///
/// Derived from the file on demand, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetMetadata {
    /// `__name`: overrides the base name derived from the file name.
    pub name: Option<String>,
    /// `__author`: required, see [`validate`](Self::validate).
    pub author: Option<String>,
    /// `__desc`
    pub description: Option<String>,
    /// `__version`: raw text, validated only when a version is needed.
    pub version: Option<String>,
    /// `__var IDENT = default`, keyed by identifier.
    pub variables: BTreeMap<String, String>,
}

impl SnippetMetadata {
    /// Scan text line by line. Unmatched lines are ignored and later
    /// occurrences of a directive overwrite earlier ones.
    pub fn parse(text: &str) -> Self {
        let mut metadata = Self::default();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            metadata.scan_line(line);
        }
        metadata
    }

    fn scan_line(&mut self, line: &str) {
        let capture = |regex: &Regex| {
            regex
                .captures(line)
                .map(|c| clean_value(&c[1]).to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(author) = capture(&AUTHOR_REGEX) {
            self.author = Some(author);
        }
        if let Some(description) = capture(&DESC_REGEX) {
            self.description = Some(description);
        }
        if let Some(version) = capture(&VERSION_REGEX) {
            self.version = Some(version);
        }
        if let Some(name) = capture(&NAME_REGEX) {
            self.name = Some(name);
        }
        if let Some(captures) = VAR_REGEX.captures(line) {
            let default = clean_value(&captures[2]).to_string();
            self.variables.insert(captures[1].to_string(), default);
        }
    }

    /// Checks the required fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.author.is_none() {
            exn::bail!(ErrorKind::MissingField("__author"));
        }
        Ok(())
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }
}

/// Extract directives from the snippet file at `path`.
///
/// Fails with [`NotFound`](ErrorKind::NotFound) if the file cannot be opened.
/// Content that is not valid UTF-8 is decoded lossily rather than rejected.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn extract(path: impl AsRef<Path>) -> Result<SnippetMetadata> {
    let path = path.as_ref();
    let mut file = File::open(path).or_raise(|| ErrorKind::NotFound(path.to_path_buf()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    let metadata = SnippetMetadata::parse(&String::from_utf8_lossy(&bytes));
    tracing::debug!(
        author = metadata.author.as_deref(),
        variables = metadata.variables.len(),
        "Extracted snippet metadata"
    );
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LOGGER: &str = r#"// __author Jane Doe
// __desc   Tiny logger
// __version 2
// __var bl__LEVEL = info
export const level = "bl__LEVEL";
"#;

    #[test]
    fn test_parse_all_directives() {
        let metadata = SnippetMetadata::parse(LOGGER);
        assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
        assert_eq!(metadata.description.as_deref(), Some("Tiny logger"));
        assert_eq!(metadata.version.as_deref(), Some("2"));
        assert_eq!(metadata.name, None);
        assert_eq!(metadata.variables, BTreeMap::from([("bl__LEVEL".to_string(), "info".to_string())]));
        assert!(metadata.has_variables());
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn test_comment_syntax_agnostic() {
        let text = "<!-- __author Ana -->\n# __desc Hash style\n/* __var bl__TITLE = Home Page */\n-- __name pageHeader";
        let metadata = SnippetMetadata::parse(text);
        assert_eq!(metadata.author.as_deref(), Some("Ana"));
        assert_eq!(metadata.description.as_deref(), Some("Hash style"));
        assert_eq!(metadata.name.as_deref(), Some("pageHeader"));
        assert_eq!(metadata.variables["bl__TITLE"], "Home Page");
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "// __author First\n// __var bl__X = 1\n// __author Second\n// __var bl__X = 2\n";
        let metadata = SnippetMetadata::parse(text);
        assert_eq!(metadata.author.as_deref(), Some("Second"));
        assert_eq!(metadata.variables.len(), 1);
        assert_eq!(metadata.variables["bl__X"], "2");
    }

    #[test]
    fn test_default_keeps_equals_signs() {
        let metadata = SnippetMetadata::parse("# __var bl__DSN = postgres://u:p@h/db?sslmode=a=b");
        assert_eq!(metadata.variables["bl__DSN"], "postgres://u:p@h/db?sslmode=a=b");
    }

    #[test]
    fn test_missing_author() {
        let metadata = SnippetMetadata::parse("// __desc no author here\nfn main() {}\n");
        let err = metadata.validate().unwrap_err();
        assert_eq!(*err, ErrorKind::MissingField("__author"));
    }

    #[test]
    fn test_extract_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("logger.js");
        fs::write(&path, LOGGER).unwrap();
        let metadata = extract(&path).unwrap();
        assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_extract_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.js");
        let err = extract(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(p) if p == &path));
    }

    #[test]
    fn test_extract_non_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("latin1.txt");
        fs::write(&path, b"# __author Jos\xe9\n").unwrap();
        let metadata = extract(&path).unwrap();
        assert_eq!(metadata.author.as_deref(), Some("Jos\u{FFFD}"));
    }
}
