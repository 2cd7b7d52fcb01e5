use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU32;
use std::str::FromStr;

/// A validated resource version: always a positive integer.
///
/// Versions are stored as strings inside index keys and configuration files,
/// but compared as integers. Parse once at the boundary with [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(NonZeroU32);

impl Version {
    /// The first version of any resource.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    pub fn new(version: u32) -> Option<Self> {
        NonZeroU32::new(version).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The version that follows this one, or `None` past [`u32::MAX`].
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}
impl Default for Version {
    fn default() -> Self {
        Self::FIRST
    }
}
impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Reject signs explicitly: `u32::from_str` accepts a leading `+`.
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            exn::bail!(ErrorKind::InvalidVersion(s.to_string()));
        }
        match trimmed.parse::<u32>().ok().and_then(Self::new) {
            Some(version) => Ok(version),
            None => exn::bail!(ErrorKind::InvalidVersion(s.to_string())),
        }
    }
}
impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
impl From<Version> for u32 {
    fn from(version: Version) -> Self {
        version.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("42", 42)]
    #[case(" 3 ", 3)]
    #[case("007", 7)]
    fn test_parse_valid(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(input.parse::<Version>().unwrap().get(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("-1")]
    #[case("+1")]
    #[case("1.2")]
    #[case("two")]
    #[case("99999999999")]
    fn test_parse_invalid(#[case] input: &str) {
        let err = input.parse::<Version>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidVersion(s) if s == input));
    }

    #[test]
    fn test_next_and_ordering() {
        let first = Version::FIRST;
        assert_eq!(first.next().map(Version::get), Some(2));
        assert!(Some(first) < first.next());
        assert_eq!(Version::new(u32::MAX).unwrap().next(), None);
        assert_eq!(Version::new(0), None);
    }
}
