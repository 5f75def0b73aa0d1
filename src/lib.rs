//! BackScanner: sensitive keyword scanning over archived PDF snapshots
//!
//! This crate enumerates the web archive captures of a PDF, fetches each one
//! with retry and exponential backoff, extracts its text (native text layer
//! first, OCR second) and records every keyword hit to a flat-file report.

pub mod archive;
pub mod config;
pub mod extract;
pub mod keywords;
pub mod output;
pub mod scanner;
pub mod targets;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for BackScanner operations
///
/// Only run-level failures appear here. Per-snapshot problems (transport
/// errors, non-PDF captures, unreadable pages) are logged and skipped.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while loading the wordlist or the URL list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No keywords loaded from {0}")]
    NoKeywords(PathBuf),

    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for BackScanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for input loading
pub type InputResult<T> = std::result::Result<T, InputError>;

// Re-export commonly used types
pub use archive::{fetch_with_backoff, list_snapshots, FetchResult, Snapshot};
pub use config::Config;
pub use extract::{ExtractedText, TextExtractor};
pub use keywords::{KeywordMatcher, KeywordSet};
pub use scanner::Scanner;
