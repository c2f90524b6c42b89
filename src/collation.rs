// 🔤 Collation - String ordering for domains and tie-breaks

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollationMode {
    /// Plain code-point order
    #[default]
    Lexicographic,
    /// Case-insensitive primary order with code-point tie-break
    Locale,
}

/// String comparator shared by the extractor and both groupers
///
/// The locale tag is carried but not interpreted: every locale gets the
/// same case-folded ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collator {
    pub mode: CollationMode,
    pub locale: Option<String>,
}

impl Collator {
    pub fn new(mode: CollationMode, locale: Option<String>) -> Self {
        Collator { mode, locale }
    }

    pub fn lexicographic() -> Self {
        Collator::default()
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self.mode {
            CollationMode::Lexicographic => a.cmp(b),
            CollationMode::Locale => {
                let folded_a = a.chars().flat_map(char::to_lowercase);
                let folded_b = b.chars().flat_map(char::to_lowercase);
                folded_a.cmp(folded_b).then_with(|| a.cmp(b))
            }
        }
    }

    /// Positional comparison of two value lists; a missing position reads as ""
    pub fn compare_tuples(&self, a: &[String], b: &[String]) -> Ordering {
        let len = a.len().max(b.len());
        for i in 0..len {
            let left = a.get(i).map(String::as_str).unwrap_or("");
            let right = b.get(i).map(String::as_str).unwrap_or("");
            match self.compare(left, right) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}
