//! Interaction with the user.
//!
//! Every question the library asks goes through a [`Prompter`], so the whole
//! store/add flow can be driven from a script in tests. The library decides
//! what an answer means; a prompter only moves text.

use crate::error::{Error, ErrorKind};
use std::io;

pub trait Prompter {
    /// Ask for a line of text. Returns the trimmed answer, or `default` (or
    /// an empty string) when the answer is empty.
    fn input(&mut self, message: &str, default: Option<&str>) -> io::Result<String>;

    /// Ask a yes/no question where anything but an explicit yes means no.
    fn confirm(&mut self, message: &str) -> io::Result<bool>;

    /// Show numbered `options` and return the raw trimmed answer.
    fn choose(&mut self, message: &str, options: &[String]) -> io::Result<String>;
}

/// Closed input means the user walked away: treat it as a cancel.
#[track_caller]
pub fn prompt_error(err: io::Error) -> Error {
    let kind = match err.kind() {
        io::ErrorKind::UnexpectedEof => ErrorKind::UserCancelled,
        _ => ErrorKind::Io("failed to read user input".to_string()),
    };
    exn::Exn::from(err).raise(kind)
}

/// Parse a 1-based ordinal answer into an index below `len`.
pub(crate) fn ordinal(answer: &str, len: usize) -> Option<usize> {
    answer.trim().parse::<usize>().ok().filter(|n| (1..=len).contains(n)).map(|n| n - 1)
}

/// Whether an answer reads as "yes".
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(any(test, feature = "mock"))]
pub use self::scripted::ScriptedPrompter;

#[cfg(any(test, feature = "mock"))]
mod scripted {
    use super::{Prompter, is_yes};
    use std::collections::VecDeque;
    use std::io;

    /// Replays queued answers in order and records every message asked.
    ///
    /// Running out of answers fails with [`io::ErrorKind::UnexpectedEof`],
    /// exactly like a closed terminal. Empty `input` answers take the default.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        asked: Vec<String>,
    }
    impl ScriptedPrompter {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self { answers: answers.into_iter().map(Into::into).collect(), asked: Vec::new() }
        }

        pub fn asked(&self) -> &[String] {
            &self.asked
        }

        /// Answers not consumed yet.
        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        fn next(&mut self, message: &str) -> io::Result<String> {
            self.asked.push(message.to_string());
            self.answers
                .pop_front()
                .map(|answer| answer.trim().to_string())
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
        }
    }
    impl Prompter for ScriptedPrompter {
        fn input(&mut self, message: &str, default: Option<&str>) -> io::Result<String> {
            let answer = self.next(message)?;
            Ok(match answer.is_empty() {
                true => default.unwrap_or_default().to_string(),
                false => answer,
            })
        }

        fn confirm(&mut self, message: &str) -> io::Result<bool> {
            self.next(message).map(|answer| is_yes(&answer))
        }

        fn choose(&mut self, message: &str, _options: &[String]) -> io::Result<String> {
            self.next(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 3, Some(0))]
    #[case(" 3 ", 3, Some(2))]
    #[case("0", 3, None)]
    #[case("4", 3, None)]
    #[case("two", 3, None)]
    #[case("", 3, None)]
    fn test_ordinal(#[case] answer: &str, #[case] len: usize, #[case] expected: Option<usize>) {
        assert_eq!(ordinal(answer, len), expected);
    }

    #[test]
    fn test_closed_input_cancels() {
        let err = prompt_error(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(*err, ErrorKind::UserCancelled);
        let err = prompt_error(io::Error::other("tty gone"));
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }
}
