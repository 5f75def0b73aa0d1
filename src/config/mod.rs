//! Configuration module for BackScanner
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default.
//!
//! # Example
//!
//! ```no_run
//! use backscanner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scan.toml")).unwrap();
//! println!("Snapshots will be fetched from: {}", config.archive.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, Config, FetchConfig, OcrConfig, OutputConfig, ScanConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
