//! Placeholder protection for machine translation.
//!
//! Each `{{...}}` occurrence is swapped for `<prefix><n>` before the text goes
//! to the translator and swapped back afterwards. Tokens are numbered by
//! occurrence, so a repeated placeholder gets one token per occurrence.
//!
//! Within one text every index has the same number of digits (`XVAR0`..`XVAR9`,
//! or `XVAR00`..`XVAR11` for twelve placeholders), so a digit written right
//! after a placeholder is never read as part of its token.

use std::fmt;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::template::PLACEHOLDER_PATTERN;

pub const DEFAULT_TOKEN_PREFIX: &str = "XVAR";

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Invalid token prefix {0:?}: must be ASCII letters followed by optional alphanumerics, not ending in a digit")]
    InvalidPrefix(String),

    #[error("Text already contains token-like sequence {0:?}")]
    PrefixCollision(String),

    #[error("Tokenized text does not contain each of its {expected} tokens exactly once")]
    AmbiguousTokens { expected: usize },
}

/// Token -> original placeholder text, in token order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    entries: Vec<(String, String)>,
}

impl VariableMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, original)| original.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, o)| (t.as_str(), o.as_str()))
    }

    /// Digits per token index for `count` tokens.
    fn index_width(count: usize) -> usize {
        count.saturating_sub(1).to_string().len()
    }
}

/// Text with placeholders replaced by tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedText {
    pub text: String,
    pub variables: VariableMap,
}

/// Tokens that did not come back from the translator exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMismatch {
    /// Placeholders whose token was dropped
    pub missing: Vec<String>,
    /// Placeholders whose token appeared more than once
    pub duplicated: Vec<String>,
}

impl fmt::Display for PlaceholderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing [{}], duplicated [{}]",
            self.missing.join(", "),
            self.duplicated.join(", ")
        )
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    prefix: String,
    token_pattern: Regex,
}

impl Tokenizer {
    pub fn new(prefix: &str) -> Result<Self, TokenizerError> {
        let valid = prefix.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && prefix.chars().all(|c| c.is_ascii_alphanumeric())
            && !prefix.ends_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(TokenizerError::InvalidPrefix(prefix.to_string()));
        }

        let token_pattern = Regex::new(&format!(r"{}(\d+)", regex::escape(prefix)))
            .map_err(|_| TokenizerError::InvalidPrefix(prefix.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            token_pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace placeholders by tokens, in order of appearance.
    ///
    /// Fails if the text already contains something shaped like a token,
    /// since restoring would then be ambiguous.
    pub fn tokenize(&self, text: &str) -> Result<TokenizedText, TokenizerError> {
        if !PLACEHOLDER_PATTERN.is_match(text) {
            return Ok(TokenizedText {
                text: text.to_string(),
                variables: VariableMap::default(),
            });
        }

        if let Some(existing) = self.token_pattern.find(text) {
            return Err(TokenizerError::PrefixCollision(existing.as_str().to_string()));
        }

        let width = VariableMap::index_width(PLACEHOLDER_PATTERN.find_iter(text).count());
        let mut entries = Vec::new();
        let tokenized = PLACEHOLDER_PATTERN
            .replace_all(text, |caps: &Captures<'_>| {
                let token = format!("{}{:0width$}", self.prefix, entries.len(), width = width);
                entries.push((token.clone(), caps[0].to_string()));
                token
            })
            .into_owned();

        let variables = VariableMap { entries };
        let pattern = self.fixed_width_pattern(width)?;
        let in_order = pattern
            .captures_iter(&tokenized)
            .map(|caps| caps[1].parse::<usize>().ok())
            .eq((0..variables.len()).map(Some));
        if !in_order {
            return Err(TokenizerError::AmbiguousTokens {
                expected: variables.len(),
            });
        }

        Ok(TokenizedText {
            text: tokenized,
            variables,
        })
    }

    /// Put the original placeholders back into translated text.
    ///
    /// Every token must appear exactly once. Token-like sequences with an
    /// index outside the map are left alone, as are digits following a token.
    pub fn restore(
        &self,
        translated: &str,
        variables: &VariableMap,
    ) -> Result<String, PlaceholderMismatch> {
        if variables.is_empty() {
            return Ok(translated.to_string());
        }

        let pattern = self
            .fixed_width_pattern(VariableMap::index_width(variables.len()))
            .map_err(|_| PlaceholderMismatch {
                missing: variables.entries.iter().map(|(_, o)| o.clone()).collect(),
                duplicated: Vec::new(),
            })?;

        let mut seen = vec![0usize; variables.len()];
        let restored = pattern
            .replace_all(translated, |caps: &Captures<'_>| {
                let index = caps[1].parse::<usize>().ok();
                match index.and_then(|i| variables.entries.get(i).map(|e| (i, e))) {
                    Some((i, (_, original))) => {
                        seen[i] += 1;
                        original.clone()
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        let originals = || variables.entries.iter().map(|(_, o)| o.clone());
        let missing: Vec<String> = originals()
            .zip(seen.iter())
            .filter(|(_, &count)| count == 0)
            .map(|(o, _)| o)
            .collect();
        let duplicated: Vec<String> = originals()
            .zip(seen.iter())
            .filter(|(_, &count)| count > 1)
            .map(|(o, _)| o)
            .collect();

        if missing.is_empty() && duplicated.is_empty() {
            Ok(restored)
        } else {
            Err(PlaceholderMismatch {
                missing,
                duplicated,
            })
        }
    }

    fn fixed_width_pattern(&self, width: usize) -> Result<Regex, TokenizerError> {
        Regex::new(&format!(r"{}(\d{{{}}})", regex::escape(&self.prefix), width))
            .map_err(|_| TokenizerError::InvalidPrefix(self.prefix.clone()))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            #[allow(clippy::expect_used)]
            token_pattern: Regex::new(r"XVAR(\d+)").expect("constant regex pattern is valid"),
        }
    }
}
