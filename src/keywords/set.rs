use crate::{InputError, InputResult};
use std::collections::HashSet;
use std::path::Path;

/// Lowercase, deduplicated search terms
///
/// Terms keep the order of their first appearance in the wordlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    /// Normalizes raw lines: trims, lowercases, drops blanks and duplicates
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for line in lines {
            let term = line.as_ref().trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            if seen.insert(term.clone()) {
                terms.push(term);
            }
        }

        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Loads a wordlist file, one keyword per line
///
/// # Returns
///
/// * `Ok(KeywordSet)` - The normalized, non-empty set
/// * `Err(InputError)` - The file could not be read, or held no keywords
pub fn load_keywords(path: &Path) -> InputResult<KeywordSet> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let keywords = KeywordSet::from_lines(content.lines());
    if keywords.is_empty() {
        return Err(InputError::NoKeywords(path.to_path_buf()));
    }

    tracing::info!("Loaded {} keywords from {}", keywords.len(), path.display());
    Ok(keywords)
}
