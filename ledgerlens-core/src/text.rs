//! Narration cleanup for statement free-text fields.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Clean a raw narration into a display string.
///
/// Collapses whitespace runs to a single space, then turns the statement
/// separators `/` and `-` into spaces, then trims. Total over all inputs;
/// callers map a missing narration to `""` before calling.
pub fn clean_narration(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    collapsed.replace('/', " ").replace('-', " ").trim().to_string()
}
