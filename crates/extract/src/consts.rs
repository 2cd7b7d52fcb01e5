use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Directives are matched anywhere in a line so any comment syntax works.
regex!(AUTHOR_REGEX, r"__author\s+(.+)");
regex!(DESC_REGEX, r"__desc\s+(.+)");
regex!(VERSION_REGEX, r"__version\s+(.+)");
regex!(NAME_REGEX, r"__name\s+(.+)");
regex!(VAR_REGEX, r"__var\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*(.+)");
// A whole line that is only a directive behind some comment punctuation.
regex!(DIRECTIVE_LINE_REGEX, r"^\s*[^\w\s]*\s*__(?:author|desc|version|var|name)\s+\S");
