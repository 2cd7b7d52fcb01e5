//! Version decisions for the store path.
//!
//! ```text
//! NoVersions  ──────────────────────────────▶ Fresh(1)
//! HasVersions ──▶ prompt ──▶ Overwrite(latest) | NewVersion(latest + 1) | cancelled
//! ```
//!
//! A declared version (`__version`, or `version` in a stack config) that is
//! free is used as is; one that is taken gets the same prompt, with the
//! declared version as the overwrite target.

use crate::error::{ErrorKind, Result};
use crate::prompt::{Prompter, ordinal, prompt_error};
use boiler_index::Version;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Outcome of resolving the version for a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No conflicting version existed; nothing is replaced.
    Fresh(Version),
    /// Reuse this number, replacing the entry and its file or directory.
    Overwrite(Version),
    /// Allocate `latest + 1`.
    NewVersion(Version),
}
impl Decision {
    pub fn version(self) -> Version {
        match self {
            Self::Fresh(v) | Self::Overwrite(v) | Self::NewVersion(v) => v,
        }
    }

    pub fn is_overwrite(self) -> bool {
        matches!(self, Self::Overwrite(_))
    }
}
impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Fresh(v) => write!(f, "version {v}"),
            Self::Overwrite(v) => write!(f, "overwrite of version {v}"),
            Self::NewVersion(v) => write!(f, "new version {v}"),
        }
    }
}

/// Decide which version `label` is stored under.
///
/// `existing` is the version set for the resource (any order). Insertion
/// order is irrelevant: "latest" is the highest number. Cancelling, giving an
/// invalid answer or closing the input all fail with
/// [`UserCancelled`](ErrorKind::UserCancelled) before anything is touched.
pub(crate) fn resolve(
    label: &str,
    existing: &[Version],
    declared: Option<Version>,
    prompter: &mut dyn Prompter,
) -> Result<Decision> {
    let Some(latest) = existing.iter().max().copied() else {
        return Ok(Decision::Fresh(declared.unwrap_or(Version::FIRST)));
    };
    let target = match declared {
        Some(declared) if !existing.contains(&declared) => return Ok(Decision::Fresh(declared)),
        Some(declared) => declared,
        None => latest,
    };
    // Without a next number only overwrite and cancel are offered.
    let next = latest.next();
    let mut options = vec![format!("Overwrite version {target}")];
    if let Some(next) = next {
        options.push(format!("Create new version {next}"));
    }
    options.push("Cancel".to_string());
    let message = format!("'{label}' already exists with version {target} (latest is {latest}). What would you like to do?");
    let answer = prompter.choose(&message, &options).map_err(prompt_error)?;
    let choice = match ordinal(&answer, options.len()) {
        Some(0) => Choice::Overwrite,
        Some(i) if i + 1 == options.len() => Choice::Cancel,
        Some(_) => Choice::NewVersion,
        None => match answer.to_ascii_lowercase().as_str() {
            "o" | "overwrite" => Choice::Overwrite,
            "n" | "v" | "new" => Choice::NewVersion,
            "c" | "cancel" => Choice::Cancel,
            _ => {
                tracing::warn!(%answer, "Invalid choice");
                exn::bail!(ErrorKind::UserCancelled)
            },
        },
    };
    match (choice, next) {
        (Choice::Overwrite, _) => Ok(Decision::Overwrite(target)),
        (Choice::NewVersion, Some(next)) => Ok(Decision::NewVersion(next)),
        (Choice::NewVersion, None) => {
            exn::bail!(ErrorKind::Validation(format!("'{label}' has no version left after {latest}")))
        },
        (Choice::Cancel, _) => exn::bail!(ErrorKind::UserCancelled),
    }
}

#[derive(Clone, Copy)]
enum Choice {
    Overwrite,
    NewVersion,
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use rstest::rstest;

    fn versions(numbers: &[u32]) -> Vec<Version> {
        numbers.iter().filter_map(|n| Version::new(*n)).collect()
    }

    #[test]
    fn test_no_versions_is_first_without_prompt() {
        let mut prompter = ScriptedPrompter::default();
        let decision = resolve("logger.js", &[], None, &mut prompter).unwrap();
        assert_eq!(decision, Decision::Fresh(Version::FIRST));
        assert!(prompter.asked().is_empty());
    }

    #[rstest]
    #[case("1", Decision::Overwrite(Version::new(3).unwrap()))]
    #[case("o", Decision::Overwrite(Version::new(3).unwrap()))]
    #[case("2", Decision::NewVersion(Version::new(4).unwrap()))]
    #[case("N", Decision::NewVersion(Version::new(4).unwrap()))]
    fn test_choices(#[case] answer: &str, #[case] expected: Decision) {
        // Latest is the maximum, not the last inserted.
        let mut prompter = ScriptedPrompter::new([answer]);
        let decision = resolve("logger.js", &versions(&[3, 1]), None, &mut prompter).unwrap();
        assert_eq!(decision, expected);
        assert_eq!(prompter.asked().len(), 1);
    }

    #[test]
    fn test_no_new_version_after_max() {
        let max = Version::new(u32::MAX).unwrap();
        let err = resolve("big.js", &[max], None, &mut ScriptedPrompter::new(["n"])).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));

        // Only overwrite and cancel are offered.
        let err = resolve("big.js", &[max], None, &mut ScriptedPrompter::new(["2"])).unwrap_err();
        assert_eq!(*err, ErrorKind::UserCancelled);
        let decision = resolve("big.js", &[max], None, &mut ScriptedPrompter::new(["1"])).unwrap();
        assert_eq!(decision, Decision::Overwrite(max));
    }

    #[rstest]
    #[case("3")]
    #[case("c")]
    #[case("7")]
    #[case("maybe")]
    fn test_cancel_and_invalid(#[case] answer: &str) {
        let mut prompter = ScriptedPrompter::new([answer]);
        let err = resolve("logger.js", &versions(&[1]), None, &mut prompter).unwrap_err();
        assert_eq!(*err, ErrorKind::UserCancelled);
    }

    #[test]
    fn test_declared_free_version_skips_prompt() {
        let mut prompter = ScriptedPrompter::default();
        let declared = Version::new(5);
        assert_eq!(resolve("x", &versions(&[1, 2]), declared, &mut prompter).unwrap(), Decision::Fresh(declared.unwrap()));
        assert_eq!(resolve("x", &[], declared, &mut prompter).unwrap(), Decision::Fresh(declared.unwrap()));
    }

    #[test]
    fn test_declared_taken_version_targets_declared() {
        let mut prompter = ScriptedPrompter::new(["1", "2"]);
        let declared = Version::new(1);
        let existing = versions(&[1, 2]);
        assert_eq!(resolve("x", &existing, declared, &mut prompter).unwrap(), Decision::Overwrite(Version::FIRST));
        assert_eq!(
            resolve("x", &existing, declared, &mut prompter).unwrap(),
            Decision::NewVersion(Version::new(3).unwrap())
        );
    }
}
