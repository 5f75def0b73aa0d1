//! Native text layer extraction
//!
//! Reads the text operators of every page with `lopdf`. An error on any
//! page abandons the whole document: partial text is never returned.

use crate::extract::{ExtractError, Extraction, ExtractionStrategy};
use lopdf::Document;

/// Concatenates the text layer of every page
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeTextStrategy;

impl NativeTextStrategy {
    fn extract_pages(pdf: &[u8]) -> Result<String, ExtractError> {
        let doc = Document::load_mem(pdf)?;

        if doc.is_encrypted() {
            return Err(ExtractError::Encrypted);
        }

        let mut text = String::new();
        for page_number in doc.get_pages().keys() {
            text.push_str(&doc.extract_text(&[*page_number])?);
        }

        // Scanned documents parse fine but carry no text operators
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyTextLayer);
        }

        Ok(text)
    }
}

impl ExtractionStrategy for NativeTextStrategy {
    fn name(&self) -> &'static str {
        "native"
    }

    fn extract(&self, pdf: &[u8]) -> Extraction {
        Self::extract_pages(pdf).into()
    }
}
