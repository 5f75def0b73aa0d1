//! Output module for scan reports and statistics
//!
//! This module handles:
//! - The report sink interface the scanner records matches through
//! - The flat-file report written during a run
//! - Run statistics and their console rendering

mod report;
pub mod stats;
mod traits;

pub use report::{FileReport, REPORT_TITLE};
pub use stats::{print_statistics, ScanStats, SnapshotOutcome};
pub use traits::{MatchRecord, OutputError, OutputResult, ReportSink};
