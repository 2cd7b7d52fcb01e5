//! Template variable substitution.

use crate::error::{ErrorKind, Result};
use boiler_extract::is_directive_line;
use memchr::memmem;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Variable name to value replacements applied to each copied line.
///
/// Names are tried longest first (ties in lexicographic order) at every
/// position of a line, so with both `bl__URL` and `bl__URL_V2` declared the
/// longer one always wins. Replaced text is never scanned again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Replace every occurrence of every variable name in `line`.
    ///
    /// Works on raw bytes: anything that is not a variable name is copied
    /// through untouched, valid UTF-8 or not.
    ///
    /// ```
    /// use boiler_materialize::Substitutions;
    ///
    /// let subs: Substitutions = [("bl__HOST", "localhost"), ("bl__PORT", "3000")].into_iter().collect();
    /// assert_eq!(&*subs.apply(b"http://bl__HOST:bl__PORT/"), b"http://localhost:3000/");
    /// ```
    pub fn apply<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        if !self.pairs.iter().any(|(name, _)| memmem::find(line, name.as_bytes()).is_some()) {
            return Cow::Borrowed(line);
        }
        let mut output = Vec::with_capacity(line.len());
        let mut rest = line;
        while let Some((&byte, tail)) = rest.split_first() {
            match self.pairs.iter().find(|(name, _)| rest.starts_with(name.as_bytes())) {
                Some((name, value)) => {
                    output.extend_from_slice(value.as_bytes());
                    rest = &rest[name.len()..];
                },
                None => {
                    output.push(byte);
                    rest = tail;
                },
            }
        }
        Cow::Owned(output)
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut pairs: Vec<(String, String)> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        pairs.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        pairs.dedup_by(|(a, _), (b, _)| a == b);
        Self { pairs }
    }
}

/// Copy `source` to `destination` line by line, dropping directive lines and
/// applying `substitutions` to every other line.
///
/// Each written line ends with `\n` (a `\r\n` source is normalized). Returns
/// the number of bytes written. The caller has already checked conflicts.
pub(crate) fn copy_lines(source: &Path, destination: &Path, substitutions: &Substitutions) -> Result<u64> {
    let reader = BufReader::new(File::open(source).map_err(|e| ErrorKind::from_io(e, source))?);
    let mut writer = BufWriter::new(File::create(destination).map_err(|e| ErrorKind::from_io(e, destination))?);
    let mut written = 0u64;
    for line in reader.split(b'\n') {
        let line = line.map_err(|e| ErrorKind::from_io(e, source))?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);
        // Lossy decoding only decides whether to drop the line; kept bytes are written as read.
        if is_directive_line(&String::from_utf8_lossy(line)) {
            continue;
        }
        let line = substitutions.apply(line);
        writer.write_all(&line).map_err(|e| ErrorKind::from_io(e, destination))?;
        writer.write_all(b"\n").map_err(|e| ErrorKind::from_io(e, destination))?;
        written += line.len() as u64 + 1;
    }
    writer.flush().map_err(|e| ErrorKind::from_io(e, destination))?;
    let permissions = fs::metadata(source).map_err(|e| ErrorKind::from_io(e, source))?.permissions();
    fs::set_permissions(destination, permissions).map_err(|e| ErrorKind::from_io(e, destination))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("no variables here", "no variables here")]
    #[case("url = bl__API_URL", "url = http://localhost:3000")]
    #[case("bl__API_URL/bl__API_URL", "http://localhost:3000/http://localhost:3000")]
    #[case("bl__API_URL_V2", "https://v2.example.com")]
    #[case("héllo bl__NAME ünïcode", "héllo world ünïcode")]
    fn test_apply(#[case] line: &str, #[case] expected: &str) {
        let subs: Substitutions = [
            ("bl__API_URL", "http://localhost:3000"),
            ("bl__API_URL_V2", "https://v2.example.com"),
            ("bl__NAME", "world"),
        ]
        .into_iter()
        .collect();
        assert_eq!(&*subs.apply(line.as_bytes()), expected.as_bytes());
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let subs: Substitutions = [("bl__A", "bl__B"), ("bl__B", "b")].into_iter().collect();
        assert_eq!(&*subs.apply(b"bl__A bl__B"), b"bl__B b");
    }

    #[test]
    fn test_borrowed_when_untouched() {
        let subs: Substitutions = [("bl__X", "x")].into_iter().collect();
        assert!(matches!(subs.apply(b"nothing"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_copy_lines_strips_directives() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("api.js");
        let destination = temp_dir.path().join("out.js");
        fs::write(
            &source,
            "// __author Jane\r\n// __var bl__API_URL = http://localhost:3000\r\nfetch(\"bl__API_URL/users\");",
        )
        .unwrap();
        let subs: Substitutions = [("bl__API_URL", "http://localhost:3000")].into_iter().collect();
        copy_lines(&source, &destination, &subs).unwrap();
        assert_eq!(fs::read_to_string(&destination).unwrap(), "fetch(\"http://localhost:3000/users\");\n");
    }

    #[test]
    fn test_copy_lines_keeps_non_utf8_bytes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("greet.txt");
        let destination = temp_dir.path().join("out.txt");
        fs::write(&source, b"# __author A\n# __var bl__X = 1\ncaf\xe9 bl__X\n\xff\xfe raw\r\n").unwrap();
        let subs: Substitutions = [("bl__X", "1")].into_iter().collect();
        let written = copy_lines(&source, &destination, &subs).unwrap();
        let expected: &[u8] = b"caf\xe9 1\n\xff\xfe raw\n";
        assert_eq!(fs::read(&destination).unwrap(), expected);
        assert_eq!(written, expected.len() as u64);
    }
}
