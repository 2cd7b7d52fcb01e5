//! Directive comment lines.
//!
//! Snippets carry metadata as comments such as `// __author Jane` or
//! `# __var bl__PORT = 8080`. The comment syntax in front of a directive is
//! never interpreted; only the directive text matters.

use crate::consts::DIRECTIVE_LINE_REGEX;

/// Comment terminators that may trail a directive value on the same line.
const CLOSERS: [&str; 2] = ["-->", "*/"];

/// Whether `line` consists solely of a directive behind optional comment
/// punctuation, and should therefore be dropped when substituting.
///
/// ```
/// use boiler_extract::is_directive_line;
///
/// assert!(is_directive_line("// __author Jane"));
/// assert!(is_directive_line("<!-- __var bl__TITLE = Home -->"));
/// assert!(!is_directive_line("const author = '__author';"));
/// ```
pub fn is_directive_line(line: &str) -> bool {
    DIRECTIVE_LINE_REGEX.is_match(line)
}

/// Trims a captured directive value and removes a trailing block comment
/// closer, so `<!-- __desc Header -->` yields `Header`.
pub(crate) fn clean_value(value: &str) -> &str {
    let value = value.trim();
    CLOSERS
        .iter()
        .find_map(|closer| value.strip_suffix(closer))
        .map_or(value, str::trim_end)
}
