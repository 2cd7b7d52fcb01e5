//! Resource name parsing.
//!
//! A resource is referred to by a string such as `logger@2.js` (a snippet),
//! `express-api@1` (a stack), or just `config`. Parsing never fails: malformed
//! input degrades to empty fields so that lookups report "not found" uniformly.

use crate::Kind;
use crate::version::Version;
use std::fmt::{Display, Formatter, Result as FmtResult};

const VERSION_SEPARATOR: char = '@';

/// A user-supplied or stored resource string split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceName {
    /// Logical name with version and extension stripped.
    pub name: String,
    /// Raw version text; empty when no version was given.
    pub version: String,
    /// Extension including its leading dot; empty for stacks.
    pub extension: String,
}

impl ResourceName {
    /// Split `resource` into base name, version and extension.
    ///
    /// ```
    /// use boiler_index::ResourceName;
    ///
    /// let parsed = ResourceName::parse("logger@2.js");
    /// assert_eq!(parsed.name, "logger");
    /// assert_eq!(parsed.version, "2");
    /// assert_eq!(parsed.extension, ".js");
    /// assert!(ResourceName::parse("express-api@1").is_stack());
    /// ```
    pub fn parse(resource: impl AsRef<str>) -> Self {
        let resource = resource.as_ref();
        let (left, right) = match resource.split_once(VERSION_SEPARATOR) {
            Some((left, right)) => (left, Some(right)),
            None => (resource, None),
        };
        // An extension on the version part wins over one on the name part.
        if let Some(right) = right
            && let Some(extension) = extension_of(right)
        {
            return Self {
                name: left.to_string(),
                version: right[..right.len() - extension.len()].to_string(),
                extension: extension.to_string(),
            };
        }
        let extension = extension_of(left).unwrap_or_default();
        Self {
            name: base_name(&left[..left.len() - extension.len()], extension).to_string(),
            version: right.unwrap_or_default().to_string(),
            extension: extension.to_string(),
        }
    }

    pub fn kind(&self) -> Kind {
        Kind::from_extension(&self.extension)
    }

    /// No extension means the resource denotes a stack.
    pub fn is_stack(&self) -> bool {
        self.kind() == Kind::Stack
    }

    pub fn is_snippet(&self) -> bool {
        self.kind() == Kind::Snippet
    }

    /// The version as a validated integer, if present and well-formed.
    pub fn version_number(&self) -> Option<Version> {
        self.version.parse().ok()
    }

    /// Whether a stored entry satisfies this (possibly partial) request.
    ///
    /// An empty version on the request matches every version. Versions are
    /// compared numerically when both sides parse, so `logger@01.js` still
    /// finds `logger@1.js`.
    pub fn matches_version(&self, stored: &ResourceName) -> bool {
        if self.version.is_empty() {
            return true;
        }
        match (self.version_number(), stored.version_number()) {
            (Some(wanted), Some(found)) => wanted == found,
            _ => self.version == stored.version,
        }
    }

    /// Whether this names a dotfile such as `.gitignore`, whose base name is
    /// its extension without the dot.
    pub fn is_dotfile(&self) -> bool {
        !self.name.is_empty() && self.extension.strip_prefix('.') == Some(self.name.as_str())
    }

    /// File name used when materializing this resource: the version segment
    /// is dropped, so `logger@2.js` becomes `logger.js` and
    /// `gitignore@1.gitignore` becomes `.gitignore`.
    pub fn file_name(&self) -> String {
        match self.is_dotfile() {
            true => self.extension.clone(),
            false => format!("{}{}", self.name, self.extension),
        }
    }
}
impl Display for ResourceName {
    /// Reassembles the parts: `name[@version][extension]`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.version.is_empty() && self.is_dotfile() {
            return write!(f, "{}", self.extension);
        }
        write!(f, "{}", self.name)?;
        if !self.version.is_empty() {
            write!(f, "{VERSION_SEPARATOR}{}", self.version)?;
        }
        write!(f, "{}", self.extension)
    }
}
impl From<&str> for ResourceName {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Full index key for a snippet: `name@version.ext`.
pub fn snippet_key(name: &str, version: Version, extension: &str) -> String {
    format!("{name}{VERSION_SEPARATOR}{version}{extension}")
}

/// Full index key for a stack: `name@version`.
pub fn stack_key(name: &str, version: Version) -> String {
    format!("{name}{VERSION_SEPARATOR}{version}")
}

/// Full index key for either kind of resource.
pub fn full_key(name: &str, version: Version, extension: &str) -> String {
    match Kind::from_extension(extension) {
        Kind::Snippet => snippet_key(name, version, extension),
        Kind::Stack => stack_key(name, version),
    }
}

/// The base name for a file stem, where an empty stem (a dotfile) takes the
/// extension without its dot: `.gitignore` is named `gitignore`.
pub fn base_name<'a>(stem: &'a str, extension: &'a str) -> &'a str {
    match stem.is_empty() {
        true => extension.trim_start_matches('.'),
        false => stem,
    }
}

/// Returns the trailing `.xxx` of the final path segment, if any.
///
/// A lone trailing dot is not an extension.
pub fn extension_of(s: &str) -> Option<&str> {
    let file_name = s.rsplit(['/', '\\']).next().unwrap_or(s);
    let dot = file_name.rfind('.')?;
    let extension = &file_name[dot..];
    (extension.len() > 1).then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("logger@2.js", "logger", "2", ".js")]
    #[case("express-api@1", "express-api", "1", "")]
    #[case("config", "config", "", "")]
    #[case("logger.js", "logger", "", ".js")]
    #[case("my.config@3", "my", "3", ".config")]
    #[case("archive@1.tar.gz", "archive", "1.tar", ".gz")]
    #[case("a@b@c.rs", "a", "b@c", ".rs")]
    #[case(".gitignore", "gitignore", "", ".gitignore")]
    #[case(".env@2", "env", "2", ".env")]
    #[case("gitignore@1.gitignore", "gitignore", "1", ".gitignore")]
    #[case("logger.", "logger.", "", "")]
    #[case("logger@", "logger", "", "")]
    #[case("@1.js", "", "1", ".js")]
    #[case("", "", "", "")]
    fn test_parse(#[case] input: &str, #[case] name: &str, #[case] version: &str, #[case] extension: &str) {
        let parsed = ResourceName::parse(input);
        assert_eq!(parsed.name, name);
        assert_eq!(parsed.version, version);
        assert_eq!(parsed.extension, extension);
    }

    #[rstest]
    #[case("express-api@1", Kind::Stack)]
    #[case("config", Kind::Stack)]
    #[case("logger@2.js", Kind::Snippet)]
    #[case("Dockerfile.bl", Kind::Snippet)]
    fn test_kind(#[case] input: &str, #[case] kind: Kind) {
        assert_eq!(ResourceName::parse(input).kind(), kind);
    }

    #[test]
    fn test_extension_never_bare_dot() {
        for input in ["a.", "a@1.", "dir.d/", "x@."] {
            let parsed = ResourceName::parse(input);
            assert_ne!(parsed.extension, ".", "input {input:?}");
        }
    }

    #[test]
    fn test_display_reassembles() {
        assert_eq!(ResourceName::parse("logger@2.js").to_string(), "logger@2.js");
        assert_eq!(ResourceName::parse("logger.js").to_string(), "logger.js");
        assert_eq!(ResourceName::parse("stack@4").to_string(), "stack@4");
        assert_eq!(ResourceName::parse(".gitignore").to_string(), ".gitignore");
    }

    #[test]
    fn test_matches_version() {
        let stored = ResourceName::parse("logger@1.js");
        assert!(ResourceName::parse("logger.js").matches_version(&stored));
        assert!(ResourceName::parse("logger@1.js").matches_version(&stored));
        assert!(ResourceName::parse("logger@01.js").matches_version(&stored));
        assert!(!ResourceName::parse("logger@2.js").matches_version(&stored));
    }

    #[rstest]
    #[case("logger@2.js", "logger.js")]
    #[case("gitignore@1.gitignore", ".gitignore")]
    #[case(".env", ".env")]
    #[case("config@1.json", "config.json")]
    fn test_file_name_drops_version(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ResourceName::parse(input).file_name(), expected);
    }

    #[test]
    fn test_keys() {
        let v2 = Version::new(2).unwrap();
        assert_eq!(snippet_key("logger", v2, ".js"), "logger@2.js");
        assert_eq!(stack_key("express-api", v2), "express-api@2");
        assert_eq!(full_key("express-api", v2, ""), "express-api@2");
        assert_eq!(full_key("logger", v2, ".js"), "logger@2.js");
    }
}
