//! Keyword loading and matching
//!
//! - `KeywordSet`: the normalized, deduplicated wordlist loaded once per run
//! - `KeywordMatcher`: whole-word matching of the set against extracted text

mod matcher;
mod set;

pub use matcher::KeywordMatcher;
pub use set::{load_keywords, KeywordSet};
