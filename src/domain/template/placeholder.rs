//! `{{key}}` placeholder scanning shared by substitution and translation.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
pub static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("constant regex pattern is valid"));

/// One placeholder occurrence in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Exact placeholder text, braces included
    pub raw: &'a str,
    /// Inner identifier with surrounding whitespace trimmed
    pub key: &'a str,
    /// Byte range of `raw` in the source text
    pub span: Range<usize>,
}

/// All placeholder occurrences, in order of appearance.
pub fn extract_placeholders(text: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(Placeholder {
                raw: whole.as_str(),
                key: inner.as_str().trim(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Distinct placeholder keys, in order of first appearance.
pub fn placeholder_keys(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_placeholders(text)
        .into_iter()
        .filter(|p| seen.insert(p.key))
        .map(|p| p.key.to_string())
        .collect()
}

pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER_PATTERN.is_match(text)
}

/// Rewrite every placeholder in one pass.
///
/// `resolve` receives the trimmed key; `None` keeps the placeholder exactly as
/// written. Replacement values are not scanned again.
pub fn replace_placeholders<F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    PLACEHOLDER_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            resolve(caps[1].trim()).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
