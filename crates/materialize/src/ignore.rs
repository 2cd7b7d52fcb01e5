use std::collections::BTreeSet;
use std::ffi::OsStr;

/// A set of directory entry names to skip while copying.
///
/// Matching is on the entry *name* only and is exact: `node_modules` skips
/// every directory called `node_modules` at any depth, and `*.log` only skips
/// an entry literally named `*.log`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ignore {
    names: BTreeSet<String>,
}
impl Ignore {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().collect()
    }

    pub fn matches(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|name| self.names.contains(name))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into).filter(|n: &String| !n.is_empty()));
    }
}
impl<S: Into<String>> FromIterator<S> for Ignore {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self { names: iter.into_iter().map(Into::into).filter(|n: &String| !n.is_empty()).collect() }
    }
}
