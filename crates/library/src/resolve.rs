//! What did the user mean by this name?
//!
//! A request like `logger`, `logger.js` or `express-api@2` can match zero,
//! one or many index entries. Zero is [`NotFound`](ErrorKind::NotFound), one
//! is selected automatically and many are offered to the user by ordinal, in
//! index order.

use crate::error::{ErrorKind, Result};
use crate::prompt::{Prompter, ordinal, prompt_error};
use boiler_index::{Index, Kind, ResourceName};
use std::path::PathBuf;

/// A concrete index entry a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: Kind,
    /// Full key such as `logger@2.js`.
    pub key: String,
    pub path: PathBuf,
}
impl Entry {
    pub fn name(&self) -> ResourceName {
        ResourceName::parse(&self.key)
    }
}

/// Every entry matching `resource`, in index order.
///
/// - With an extension: snippets with the same base name and extension.
/// - Without one: an exact stack key, else stacks with the same base name,
///   else snippets with the same base name in any extension.
///
/// A version on the request narrows each of these to that version.
pub(crate) fn candidates(index: &Index, resource: &str) -> Vec<Entry> {
    let requested = ResourceName::parse(resource);
    let collect = |kind: Kind, same_extension: bool| -> Vec<Entry> {
        index
            .entries(kind)
            .filter(|(key, _)| {
                let stored = ResourceName::parse(key);
                stored.name == requested.name
                    && (!same_extension || stored.extension == requested.extension)
                    && requested.matches_version(&stored)
            })
            .map(|(key, path)| Entry { kind, key: key.to_string(), path: path.to_path_buf() })
            .collect()
    };
    if requested.is_snippet() {
        return collect(Kind::Snippet, true);
    }
    if let Some(path) = index.get(Kind::Stack, resource) {
        return vec![Entry { kind: Kind::Stack, key: resource.to_string(), path: path.to_path_buf() }];
    }
    let stacks = collect(Kind::Stack, true);
    match stacks.is_empty() {
        true => collect(Kind::Snippet, false),
        false => stacks,
    }
}

/// Resolve `resource` to exactly one entry, asking the user when several
/// match.
pub(crate) fn select(index: &Index, resource: &str, prompter: &mut dyn Prompter) -> Result<Entry> {
    let mut matches = candidates(index, resource);
    match matches.len() {
        0 => {
            let what = match ResourceName::parse(resource).is_snippet() {
                true => "snippet",
                false => "resource",
            };
            exn::bail!(ErrorKind::not_found(what, resource))
        },
        1 => Ok(matches.remove(0)),
        n => {
            let options: Vec<String> = matches.iter().map(|entry| entry.key.clone()).collect();
            let message = format!("Multiple matches for '{resource}'. Select one (1-{n})");
            let answer = prompter.choose(&message, &options).map_err(prompt_error)?;
            match ordinal(&answer, n) {
                Some(i) => Ok(matches.swap_remove(i)),
                None => {
                    tracing::warn!(%answer, "Invalid selection");
                    exn::bail!(ErrorKind::UserCancelled)
                },
            }
        },
    }
}
