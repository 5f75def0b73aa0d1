//! Scanner module
//!
//! This module contains the scan orchestration: enumerating the archived
//! captures of each target, fetching them with backoff, extracting text,
//! matching keywords, and recording hits, all strictly sequential.

mod orchestrator;

pub use orchestrator::{is_pdf_content_type, Scanner};

use crate::config::Config;
use crate::keywords::KeywordSet;
use crate::output::{FileReport, ScanStats};
use crate::ScanError;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete scan with a file report
///
/// This is the main entry point for a run. It will:
/// 1. Truncate the report and write its header
/// 2. Build the HTTP client, matcher, and extractor
/// 3. Scan every target in order
///
/// # Arguments
///
/// * `config` - The scan configuration
/// * `keywords` - The loaded keyword set
/// * `targets` - Target URLs, scanned in the given order
///
/// # Returns
///
/// * `Ok(ScanStats)` - Scan completed
/// * `Err(ScanError)` - The report could not be written or the client built
pub async fn scan(
    config: &Config,
    keywords: KeywordSet,
    targets: &[String],
) -> Result<ScanStats, ScanError> {
    let report = FileReport::create(Path::new(&config.output.report_path))?;
    let mut scanner = Scanner::new(config, Arc::new(keywords), report)?;

    scanner.run(targets).await?;

    let (report, stats) = scanner.finish();
    tracing::info!(
        "{} match records written to {}",
        report.records_written(),
        report.path().display()
    );

    Ok(stats)
}
