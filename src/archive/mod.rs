//! Web archive access
//!
//! This module contains everything that talks to the archive service:
//! - Building the shared HTTP client
//! - Enumerating capture timestamps through the CDX index
//! - Fetching archived snapshots with retry and exponential backoff
//! - Mapping (target URL, timestamp) pairs to archived resource URLs

mod fetcher;
mod snapshots;

pub use fetcher::{fetch_with_backoff, BackoffPolicy, FetchResult};
pub use snapshots::{list_snapshots, parse_index_response, IndexError};

use crate::config::FetchConfig;
use chrono::NaiveDateTime;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by index queries and snapshot fetches
///
/// Timeouts are applied per request, since the index and the snapshot
/// endpoints use different budgets.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the archived resource URL for one capture of `target`
///
/// # Example
///
/// ```
/// use backscanner::archive::archived_url;
///
/// assert_eq!(
///     archived_url("https://web.archive.org", "20200101000000", "http://example.com/a.pdf"),
///     "https://web.archive.org/web/20200101000000/http://example.com/a.pdf"
/// );
/// ```
pub fn archived_url(archive_base: &str, timestamp: &str, target: &str) -> String {
    format!(
        "{}/web/{}/{}",
        archive_base.trim_end_matches('/'),
        timestamp,
        target
    )
}

/// One capture of a target URL, identified by the archive's timestamp token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    timestamp: String,
}

// Missing trailing components of a short timestamp default to the start of
// the period: month and day to 01, time to 00:00:00.
const TIMESTAMP_PADDING: &str = "00000101000000";

impl Snapshot {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }

    /// The raw timestamp token as returned by the index
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Capture instant, when the token follows the `YYYYMMDDhhmmss` layout
    ///
    /// Tokens shorter than 14 digits are padded; anything else is treated as
    /// opaque and yields `None`.
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        let ts = self.timestamp.as_str();
        if ts.len() < 4 || ts.len() > 14 || !ts.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let padded = format!("{}{}", ts, &TIMESTAMP_PADDING[ts.len()..]);
        NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S").ok()
    }

    /// The fetchable URL of this capture
    pub fn archived_url(&self, archive_base: &str, target: &str) -> String {
        archived_url(archive_base, &self.timestamp, target)
    }
}
