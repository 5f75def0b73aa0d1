//! Scan orchestration
//!
//! For every target URL the scanner walks this sequence, one step at a time:
//!
//! ```text
//! Start -> Enumerating -> (per snapshot) Fetching -> Extracting -> Matching
//!       -> Recording -> (pause, next snapshot) -> Done
//! ```
//!
//! Snapshot-level failures are logged and skipped. Only a report write
//! failure stops the run.
//!
//! Extraction parses PDFs and may shell out to OCR tools, so it runs on the
//! blocking thread pool. The scanner still awaits it before moving on.

use crate::archive::{build_http_client, fetch_with_backoff, list_snapshots, BackoffPolicy};
use crate::archive::{FetchResult, Snapshot};
use crate::config::{ArchiveConfig, Config};
use crate::extract::{ExtractedText, TextExtractor};
use crate::keywords::{KeywordMatcher, KeywordSet};
use crate::output::{MatchRecord, ReportSink, ScanStats, SnapshotOutcome};
use crate::{InputError, ScanError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Runs the per-URL scan pipeline and records matches to a report sink
pub struct Scanner<R: ReportSink> {
    client: Client,
    archive: ArchiveConfig,
    policy: BackoffPolicy,
    request_delay: Duration,
    keywords: Arc<KeywordSet>,
    matcher: KeywordMatcher,
    extractor: Arc<TextExtractor>,
    report: R,
    stats: ScanStats,
}

impl<R: ReportSink> Scanner<R> {
    /// Creates a new scanner
    ///
    /// # Arguments
    ///
    /// * `config` - Archive endpoints, retry policy, pacing, and OCR settings
    /// * `keywords` - The keyword set, shared read-only for the whole run
    /// * `report` - Where match records go
    ///
    /// # Returns
    ///
    /// * `Ok(Scanner)` - Ready to scan
    /// * `Err(ScanError)` - The HTTP client or keyword pattern could not be built
    pub fn new(config: &Config, keywords: Arc<KeywordSet>, report: R) -> Result<Self, ScanError> {
        let client = build_http_client(&config.fetch)?;
        let matcher = KeywordMatcher::new(&keywords).map_err(InputError::from)?;

        Ok(Self {
            client,
            archive: config.archive.clone(),
            policy: BackoffPolicy::from_config(&config.fetch),
            request_delay: config.scan.request_delay(),
            keywords,
            matcher,
            extractor: Arc::new(TextExtractor::from_config(&config.ocr)),
            report,
            stats: ScanStats::new(),
        })
    }

    /// Replaces the extraction strategies
    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn report(&self) -> &R {
        &self.report
    }

    /// Consumes the scanner, returning the report sink and final statistics
    pub fn finish(self) -> (R, ScanStats) {
        (self.report, self.stats)
    }

    /// Scans every target in order
    pub async fn run(&mut self, targets: &[String]) -> Result<(), ScanError> {
        let start_time = std::time::Instant::now();

        for (index, target) in targets.iter().enumerate() {
            tracing::info!("Processing [{}/{}]: {}", index + 1, targets.len(), target);
            self.scan_target(target).await?;
        }

        tracing::info!(
            "Scan complete: {} targets, {} snapshots scanned, {} skipped, {} keyword hits in {:.1}s",
            self.stats.targets,
            self.stats.snapshots_scanned(),
            self.stats.snapshots_skipped(),
            self.stats.keyword_hits,
            start_time.elapsed().as_secs_f64()
        );

        Ok(())
    }

    /// Scans every archived capture of one target URL
    pub async fn scan_target(&mut self, target: &str) -> Result<(), ScanError> {
        self.stats.targets += 1;

        let snapshots = list_snapshots(&self.client, &self.archive, target).await;
        self.stats.snapshots_found += snapshots.len() as u64;

        for snapshot in &snapshots {
            let outcome = self.scan_snapshot(target, snapshot).await?;
            self.stats.record_outcome(outcome);

            if !self.request_delay.is_zero() {
                tracing::debug!("Pausing {:?} before the next request", self.request_delay);
                tokio::time::sleep(self.request_delay).await;
            }
        }

        Ok(())
    }

    /// Fetches, extracts, and matches a single snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(SnapshotOutcome)` - How the snapshot was handled
    /// * `Err(ScanError)` - The match record could not be written
    pub async fn scan_snapshot(
        &mut self,
        target: &str,
        snapshot: &Snapshot,
    ) -> Result<SnapshotOutcome, ScanError> {
        let url = snapshot.archived_url(&self.archive.base_url, target);
        match snapshot.captured_at() {
            Some(at) => tracing::info!("[SCAN] {} (captured {})", url, at),
            None => tracing::info!("[SCAN] {}", url),
        }

        let (content_type, body) = match fetch_with_backoff(&self.client, &url, &self.policy).await
        {
            FetchResult::Success {
                content_type, body, ..
            } => (content_type, body),
            FetchResult::Exhausted { .. } => return Ok(SnapshotOutcome::FetchFailed),
        };

        if !is_pdf_content_type(&content_type) {
            tracing::warn!("[SKIP] Not a valid PDF ({})", display_content_type(&content_type));
            return Ok(SnapshotOutcome::NotPdf);
        }

        let extractor = Arc::clone(&self.extractor);
        let extracted = match tokio::task::spawn_blocking(move || extractor.extract(&body)).await {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::error!("[EXTRACT FAIL] Extraction task for {} failed: {}", url, e);
                ExtractedText {
                    text: String::new(),
                    strategy: None,
                }
            }
        };
        self.stats.record_extraction(extracted.strategy);

        let matches = self.matcher.find_matches(&extracted.text);
        if matches.is_empty() {
            tracing::debug!("No keywords in {}", url);
            return Ok(SnapshotOutcome::Clean);
        }

        tracing::warn!("[!] Sensitive data FOUND in {}", url);
        tracing::warn!("    Keywords: {}", matches.join(", "));

        self.stats.keyword_hits += matches.len() as u64;
        self.report.record(&MatchRecord {
            url,
            keywords: matches,
        })?;

        Ok(SnapshotOutcome::Matched)
    }
}

/// Whether a Content-Type header declares a PDF
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(PDF_CONTENT_TYPE)
}

fn display_content_type(content_type: &str) -> &str {
    if content_type.is_empty() {
        "no content type"
    } else {
        content_type
    }
}
