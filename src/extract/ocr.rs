//! OCR extraction for PDFs without a usable text layer
//!
//! Requires `pdftoppm` (poppler-utils) and `tesseract` on the system. The
//! payload is written to a scratch directory, every page is rendered to PNG
//! and each image is passed through tesseract. A page tesseract cannot read
//! contributes no text; a rendering failure yields no text at all.
//!
//! Every tool run is bounded by the configured timeout. Output is captured to
//! files in the scratch directory, and a run that overstays is killed.

use crate::config::OcrConfig;
use crate::extract::{ExtractError, Extraction, ExtractionStrategy};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Rasterize-and-recognize strategy
#[derive(Debug, Clone)]
pub struct OcrStrategy {
    dpi: u32,
    language: String,
    pdftoppm: String,
    tesseract: String,
    timeout: Duration,
}

impl OcrStrategy {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            dpi: config.dpi,
            language: config.language.clone(),
            pdftoppm: config.pdftoppm_path.clone(),
            tesseract: config.tesseract_path.clone(),
            timeout: config.timeout(),
        }
    }

    fn recognize(&self, pdf: &[u8]) -> Result<String, ExtractError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("snapshot.pdf");
        std::fs::write(&input, pdf)?;

        let images = self.render_pages(&input, scratch.path())?;
        tracing::info!(
            "Rendered {} pages at {} dpi, running OCR",
            images.len(),
            self.dpi
        );

        let mut text = String::new();
        for (index, image) in images.iter().enumerate() {
            match self.recognize_page(image) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => tracing::warn!("[OCR FAIL] Page {}: {}", index + 1, e),
            }
        }

        Ok(text)
    }

    /// Renders every page to `<dir>/page-N.png`, returning the images in page order
    fn render_pages(&self, input: &Path, dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        let mut command = Command::new(&self.pdftoppm);
        command
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(input)
            .arg(dir.join("page"));
        self.run_tool(&self.pdftoppm, command, &dir.join("pdftoppm"))?;

        // pdftoppm zero-pads page numbers, so lexical order is page order
        let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(tool_error(&self.pdftoppm, "produced no images".to_string()));
        }

        Ok(images)
    }

    fn recognize_page(&self, image: &Path) -> Result<String, ExtractError> {
        let mut command = Command::new(&self.tesseract);
        command.arg(image).arg("stdout").arg("-l").arg(&self.language);
        self.run_tool(&self.tesseract, command, image)
    }

    /// Runs a tool to completion within the timeout, returning its stdout
    ///
    /// Stdout and stderr land next to `capture` as `.out` and `.err` files.
    fn run_tool(
        &self,
        tool: &str,
        mut command: Command,
        capture: &Path,
    ) -> Result<String, ExtractError> {
        let stdout_path = capture.with_extension("out");
        let stderr_path = capture.with_extension("err");

        let mut child = command
            .stdin(Stdio::null())
            .stdout(File::create(&stdout_path)?)
            .stderr(File::create(&stderr_path)?)
            .spawn()
            .map_err(|e| tool_error(tool, e.to_string()))?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                if let Err(e) = child.kill() {
                    tracing::debug!("Could not kill {}: {}", tool, e);
                }
                child.wait()?;
                return Err(tool_error(
                    tool,
                    format!("timed out after {}s", self.timeout.as_secs()),
                ));
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            let stderr = std::fs::read(&stderr_path)?;
            return Err(tool_error(
                tool,
                String::from_utf8_lossy(&stderr).trim().to_string(),
            ));
        }

        let stdout = std::fs::read(&stdout_path)?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl ExtractionStrategy for OcrStrategy {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract(&self, pdf: &[u8]) -> Extraction {
        match self.recognize(pdf) {
            Ok(text) => Extraction::Text(text),
            Err(e) => {
                tracing::warn!("[OCR FAIL] {}", e);
                Extraction::NoText(e)
            }
        }
    }
}

fn tool_error(tool: &str, message: String) -> ExtractError {
    ExtractError::Tool {
        tool: tool.to_string(),
        message,
    }
}

/// Checks whether both OCR tools can be launched
pub fn is_ocr_available(config: &OcrConfig) -> bool {
    let pdftoppm = Command::new(&config.pdftoppm_path)
        .arg("-v")
        .output()
        .is_ok();
    let tesseract = Command::new(&config.tesseract_path)
        .arg("--version")
        .output()
        .is_ok();

    if !pdftoppm {
        tracing::debug!("pdftoppm not found - install poppler-utils for OCR support");
    }
    if !tesseract {
        tracing::debug!("tesseract not found - install tesseract-ocr for OCR support");
    }

    pdftoppm && tesseract
}
