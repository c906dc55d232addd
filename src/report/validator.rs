//! Submission line grammar: `Фамилия И - X/Y/Z`.

use std::sync::LazyLock;

use regex::Regex;

/// Surname, one whitespace, a single-letter initial, a hyphen with optional
/// whitespace around it, then three unsigned integers separated by `/`.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[А-Яа-яA-Za-zёЁ\-]+\s[А-Яа-яA-Za-zёЁ\-]\s*-\s*\d+/\d+/\d+$").unwrap()
});

/// Returns `true` when the trimmed line matches the report grammar.
pub fn is_valid(line: &str) -> bool {
    LINE_PATTERN.is_match(line.trim())
}
