//! Snapshot fetcher with bounded retries
//!
//! Every attempt is a single GET with its own timeout. Attempts that fail
//! are followed by an exponential backoff wait before the next one:
//!
//! | Attempt (zero-based) | Wait after failure |
//! |----------------------|--------------------|
//! | 0                    | base               |
//! | 1                    | base * 2           |
//! | n                    | base * 2^n         |
//! | last                 | none               |
//!
//! Transport errors (connect, timeout, body read) are always retried.
//! A non-200 status is retried when `retry_on_status` is set, otherwise it
//! ends the fetch immediately.

use crate::config::FetchConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Retry schedule for a single resource
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Total number of attempts
    pub max_retries: u32,

    /// Wait after the first failed attempt
    pub base_delay: Duration,

    /// Per-attempt timeout
    pub timeout: Duration,

    /// Whether a non-200 response is retried
    pub retry_on_status: bool,
}

impl BackoffPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay(),
            timeout: config.timeout(),
            retry_on_status: config.retry_on_status,
        }
    }

    /// Wait applied after attempt `attempt` (zero-based) fails
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Total wait when every attempt fails
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries.saturating_sub(1))
            .map(|attempt| self.delay_for(attempt))
            .sum()
    }
}

/// Result of a fetch with backoff
#[derive(Debug)]
pub enum FetchResult {
    /// A 200 response was received
    Success {
        /// HTTP status code (always 200)
        status_code: u16,
        /// Content-Type header value, empty when absent
        content_type: String,
        /// Raw response body
        body: Vec<u8>,
        /// Attempts used, including the successful one
        attempts: u32,
        /// Total time spent in backoff waits
        waited: Duration,
    },

    /// No attempt succeeded; the caller should skip this resource
    Exhausted {
        /// Attempts used
        attempts: u32,
        /// Total time spent in backoff waits
        waited: Duration,
        /// Description of the last failure
        last_error: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            FetchResult::Success { attempts, .. } | FetchResult::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn waited(&self) -> Duration {
        match self {
            FetchResult::Success { waited, .. } | FetchResult::Exhausted { waited, .. } => *waited,
        }
    }
}

/// Outcome of one attempt that reached the server
struct AttemptResponse {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
}

/// Fetches `url`, retrying with exponential backoff
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The resource to fetch
/// * `policy` - Retry count, backoff base, and per-attempt timeout
///
/// # Returns
///
/// `FetchResult::Success` on the first 200 response, otherwise
/// `FetchResult::Exhausted` once the attempt budget is spent.
pub async fn fetch_with_backoff(client: &Client, url: &str, policy: &BackoffPolicy) -> FetchResult {
    let mut waited = Duration::ZERO;
    let mut last_error = String::from("no attempt made");

    for attempt in 0..policy.max_retries {
        match send_attempt(client, url, policy.timeout).await {
            Ok(response) if response.status == StatusCode::OK => {
                tracing::debug!(
                    "Fetched {} ({} bytes, attempt {})",
                    url,
                    response.body.len(),
                    attempt + 1
                );
                return FetchResult::Success {
                    status_code: response.status.as_u16(),
                    content_type: response.content_type,
                    body: response.body,
                    attempts: attempt + 1,
                    waited,
                };
            }
            Ok(response) => {
                last_error = format!("HTTP {}", response.status.as_u16());
                if !policy.retry_on_status {
                    tracing::warn!("[SKIP] {} returned {}, not retrying", url, last_error);
                    return FetchResult::Exhausted {
                        attempts: attempt + 1,
                        waited,
                        last_error,
                    };
                }
            }
            Err(e) => {
                last_error = describe_transport_error(&e);
            }
        }

        if attempt + 1 < policy.max_retries {
            let wait = policy.delay_for(attempt);
            tracing::warn!(
                "[RETRY-{}] {} failed ({}), waiting {:?}",
                attempt + 1,
                url,
                last_error,
                wait
            );
            tokio::time::sleep(wait).await;
            waited += wait;
        }
    }

    tracing::warn!(
        "[SKIP] Giving up on {} after {} attempts: {}",
        url,
        policy.max_retries,
        last_error
    );

    FetchResult::Exhausted {
        attempts: policy.max_retries,
        waited,
        last_error,
    }
}

/// Sends one GET and reads the body of a 200 response
async fn send_attempt(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<AttemptResponse, reqwest::Error> {
    let response = client.get(url).timeout(timeout).send().await?;
    let status = response.status();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Non-200 bodies are never inspected
    if status != StatusCode::OK {
        return Ok(AttemptResponse {
            status,
            content_type,
            body: Vec::new(),
        });
    }

    let body = response.bytes().await?.to_vec();

    Ok(AttemptResponse {
        status,
        content_type,
        body,
    })
}

/// Classifies a transport error for log output
fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
