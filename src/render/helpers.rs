//! Text helpers exposed to templates.

use regex::Regex;
use std::sync::LazyLock;

static RE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n)+").unwrap());

/// Markdown heading marker: `base + sub` hashes, at least one.
pub fn heading(base: i32, sub: i32) -> String {
    "#".repeat(base.saturating_add(sub).max(1) as usize)
}

/// Strip surrounding whitespace; absent text stays absent.
pub fn trim(text: Option<&str>) -> Option<&str> {
    text.map(str::trim)
}

/// Collapse every run of newlines into a single space.
pub fn join_lines(text: &str) -> String {
    RE_NEWLINES.replace_all(text, " ").into_owned()
}
