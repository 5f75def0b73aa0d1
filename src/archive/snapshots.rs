//! Snapshot enumeration through the archive's CDX index
//!
//! Index lookups are best-effort: a single attempt, and any failure is
//! logged and reported as "no snapshots" so the scan moves on.

use crate::archive::Snapshot;
use crate::config::ArchiveConfig;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

/// Reasons an index query produced no usable rows
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Invalid index URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Index returned HTTP {0}")]
    Status(u16),

    #[error("Malformed index response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lists every 200-status capture of `target`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `archive` - Archive endpoints and index timeout
/// * `target` - The original (non-archived) URL
///
/// # Returns
///
/// Snapshots in the order the index returned them. Empty on any failure.
pub async fn list_snapshots(client: &Client, archive: &ArchiveConfig, target: &str) -> Vec<Snapshot> {
    match query_index(client, archive, target).await {
        Ok(snapshots) => {
            tracing::info!("Found {} snapshots for {}", snapshots.len(), target);
            snapshots
        }
        Err(e) => {
            tracing::error!("[ERROR] Failed to list snapshots for {}: {}", target, e);
            Vec::new()
        }
    }
}

async fn query_index(
    client: &Client,
    archive: &ArchiveConfig,
    target: &str,
) -> Result<Vec<Snapshot>, IndexError> {
    let url = Url::parse_with_params(
        &archive.index_url(),
        &[
            ("url", target),
            ("output", "json"),
            ("filter", "statuscode:200"),
            ("fl", "timestamp"),
        ],
    )?;

    tracing::debug!("Querying index: {}", url);

    let response = client
        .get(url)
        .timeout(archive.index_timeout())
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        return Err(IndexError::Status(response.status().as_u16()));
    }

    let body = response.bytes().await?;
    Ok(parse_index_response(&body)?)
}

/// Parses a CDX JSON response into snapshots
///
/// The response is an array of rows; the first row is the header and is
/// skipped, and the first column of every other row is the timestamp.
/// An empty body means the URL has no captures.
pub fn parse_index_response(body: &[u8]) -> Result<Vec<Snapshot>, serde_json::Error> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<serde_json::Value>> = serde_json::from_slice(body)?;

    Ok(rows
        .into_iter()
        .skip(1)
        .filter_map(|row| {
            row.into_iter().next().and_then(|column| match column {
                serde_json::Value::String(s) => Some(Snapshot::new(s)),
                serde_json::Value::Number(n) => Some(Snapshot::new(n.to_string())),
                _ => None,
            })
        })
        .collect())
}
