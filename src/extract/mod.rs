//! Text extraction from archived PDF payloads
//!
//! Extraction is an ordered list of strategies tried in sequence. Each one
//! either returns text or an explicit "no text" signal carrying the reason;
//! the first strategy that produces text wins. The default list is:
//!
//! 1. [`NativeTextStrategy`] - the PDF's own text layer
//! 2. [`OcrStrategy`] - rasterize every page and run OCR over the images
//!
//! The returned text is always lowercase, so keyword matching never has to
//! normalize case again.

mod native;
mod ocr;

pub use native::NativeTextStrategy;
pub use ocr::{is_ocr_available, OcrStrategy};

use crate::config::OcrConfig;
use thiserror::Error;

/// Reasons a strategy produced no text
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("PDF has no text layer")]
    EmptyTextLayer,

    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a single strategy
#[derive(Debug)]
pub enum Extraction {
    /// Text was produced (not yet lowercased)
    Text(String),

    /// The strategy could not produce text; the next one should be tried
    NoText(ExtractError),
}

impl From<Result<String, ExtractError>> for Extraction {
    fn from(result: Result<String, ExtractError>) -> Self {
        match result {
            Ok(text) => Extraction::Text(text),
            Err(e) => Extraction::NoText(e),
        }
    }
}

/// A way of turning PDF bytes into text
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs and statistics
    fn name(&self) -> &'static str;

    /// Attempts extraction over the whole document
    fn extract(&self, pdf: &[u8]) -> Extraction;
}

/// Lowercased text together with the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,

    /// `None` when every strategy came back empty
    pub strategy: Option<&'static str>,
}

/// Runs extraction strategies in order until one produces text
pub struct TextExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Native text layer first, then OCR unless disabled
    pub fn from_config(config: &OcrConfig) -> Self {
        let mut strategies: Vec<Box<dyn ExtractionStrategy>> = vec![Box::new(NativeTextStrategy)];

        if config.enabled {
            strategies.push(Box::new(OcrStrategy::from_config(config)));
        } else {
            tracing::debug!("OCR fallback disabled");
        }

        Self::new(strategies)
    }

    /// Names of the configured strategies, in order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extracts lowercase text from a PDF payload
    ///
    /// Never fails: when no strategy produces text the result is empty.
    pub fn extract(&self, pdf: &[u8]) -> ExtractedText {
        for strategy in &self.strategies {
            match strategy.extract(pdf) {
                Extraction::Text(text) => {
                    tracing::debug!(
                        "{} extraction produced {} chars",
                        strategy.name(),
                        text.len()
                    );
                    return ExtractedText {
                        text: text.to_lowercase(),
                        strategy: Some(strategy.name()),
                    };
                }
                Extraction::NoText(reason) => {
                    tracing::debug!("{} extraction produced no text: {}", strategy.name(), reason);
                }
            }
        }

        tracing::warn!("[EXTRACT FAIL] No strategy produced text");
        ExtractedText {
            text: String::new(),
            strategy: None,
        }
    }
}
