//! Whole-word keyword matching
//!
//! All keywords are compiled into one alternation wrapped in word
//! boundaries. Keywords are escaped and matched literally. Hits are
//! reported in text order, every occurrence included. When two keywords
//! could match at the same position (`top` and `top secret`), the longer
//! one wins, since the alternation is ordered longest first.

use crate::keywords::KeywordSet;
use regex::{Regex, RegexBuilder};

/// Compiled program budget; wordlists run to tens of thousands of terms
const PATTERN_SIZE_LIMIT: usize = 256 * (1 << 20);

/// Compiled matcher for a keyword set
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    /// `None` for an empty keyword set, which matches nothing
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    /// Compiles the keyword set into a single pattern
    pub fn new(keywords: &KeywordSet) -> Result<Self, regex::Error> {
        if keywords.is_empty() {
            return Ok(Self { pattern: None });
        }

        let mut terms: Vec<&str> = keywords.terms().iter().map(String::as_str).collect();
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = terms
            .iter()
            .map(|term| regex::escape(term))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Returns every keyword occurrence in `text`, in order of appearance
    ///
    /// `text` is expected to be lowercase already.
    pub fn find_matches(&self, text: &str) -> Vec<String> {
        match &self.pattern {
            Some(pattern) => pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
            None => Vec::new(),
        }
    }
}
