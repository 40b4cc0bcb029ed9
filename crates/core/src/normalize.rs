//! Font name matching.
//!
//! By default font names are compared exactly, the way the host document
//! spells them. Folded matching treats names that differ only in Unicode
//! composition, case, or whitespace runs as the same family.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse whitespace runs into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// How two font names are decided to be the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontMatching {
    /// Case-sensitive string equality, no normalization.
    #[default]
    Exact,
    /// Equality after NFC normalization, whitespace collapsing, and lowercasing.
    Folded,
}

impl FontMatching {
    /// The key under which a font name is tracked.
    pub fn key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            FontMatching::Exact => Cow::Borrowed(name),
            FontMatching::Folded => Cow::Owned(fold_font_name(name)),
        }
    }

    /// Whether two names refer to the same family under this policy.
    pub fn same(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

/// Fold a font name for loose comparison.
fn fold_font_name(name: &str) -> String {
    let composed: String = name.nfc().collect();
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(composed.trim(), " ")
        .to_lowercase()
}
