use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap());

/// Whether `path` begins with a `~` component that needs a home directory.
pub(crate) fn needs_home(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s == "~" || s.starts_with("~/"))
}

/// Expand a leading `~/` to `home` then `$VAR`/`${VAR}` references using
/// `lookup`. Unset variables expand to nothing. Paths that aren't valid UTF-8
/// are returned untouched.
pub(crate) fn expand_with(path: &Path, home: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    let expanded = VAR_REGEX.replace_all(raw, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        lookup(name).unwrap_or_default()
    });
    match (home, expanded.strip_prefix('~')) {
        (Some(home), Some("")) => home.to_path_buf(),
        (Some(home), Some(rest)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(expanded.as_ref()),
    }
}
