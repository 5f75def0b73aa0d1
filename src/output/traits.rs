//! Report sink trait and associated types
//!
//! This module defines the interface the scanner records matches through,
//! and the record type written for every snapshot with keyword hits.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Keyword hits for one archived resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// The archived resource URL the text came from
    pub url: String,

    /// Every matched keyword occurrence, in text order
    pub keywords: Vec<String>,
}

impl MatchRecord {
    /// Renders the report block for this record
    ///
    /// ```
    /// use backscanner::output::MatchRecord;
    ///
    /// let record = MatchRecord {
    ///     url: "https://web.archive.org/web/2020/http://a.org/x.pdf".to_string(),
    ///     keywords: vec!["secret".to_string(), "nik".to_string()],
    /// };
    /// assert!(record.to_block().starts_with("URL: https://web.archive.org/web/2020/http://a.org/x.pdf\n"));
    /// assert!(record.to_block().contains("Keywords: secret, nik\n"));
    /// ```
    pub fn to_block(&self) -> String {
        format!(
            "URL: {}\nKeywords: {}\n{}\n",
            self.url,
            self.keywords.join(", "),
            "-".repeat(50)
        )
    }
}

/// Destination for match records
///
/// Implementations must persist each record before returning, so a crash
/// mid-run keeps everything recorded so far.
pub trait ReportSink {
    /// Records the keyword hits for one archived resource
    fn record(&mut self, record: &MatchRecord) -> OutputResult<()>;
}
