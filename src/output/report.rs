//! Flat-file report writer
//!
//! The report is truncated and given a fixed header when the writer is
//! created. Every record reopens the file in append mode and writes its
//! block straight through, with no buffering across records.

use crate::output::traits::{MatchRecord, OutputError, OutputResult, ReportSink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Title line at the top of every report
pub const REPORT_TITLE: &str = "BACKSCANNER SCAN RESULTS";

/// Report file on disk
#[derive(Debug)]
pub struct FileReport {
    path: PathBuf,
    records_written: usize,
}

impl FileReport {
    /// Creates (or truncates) the report and writes its header
    ///
    /// # Arguments
    ///
    /// * `path` - Where the report lives
    ///
    /// # Returns
    ///
    /// * `Ok(FileReport)` - Header written, ready for records
    /// * `Err(OutputError)` - The file could not be created
    pub fn create(path: &Path) -> OutputResult<Self> {
        let mut file = File::create(path).map_err(|e| write_error(path, e))?;
        writeln!(file, "{}\n{}", REPORT_TITLE, "=".repeat(50)).map_err(|e| write_error(path, e))?;

        tracing::debug!("Report initialized at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            records_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended since creation
    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

impl ReportSink for FileReport {
    fn record(&mut self, record: &MatchRecord) -> OutputResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| write_error(&self.path, e))?;

        file.write_all(record.to_block().as_bytes())
            .map_err(|e| write_error(&self.path, e))?;

        self.records_written += 1;
        Ok(())
    }
}

fn write_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Write {
        path: path.display().to_string(),
        source,
    }
}
