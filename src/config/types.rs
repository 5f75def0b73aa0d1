use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for BackScanner
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub fetch: FetchConfig,
    pub scan: ScanConfig,
    pub ocr: OcrConfig,
    pub output: OutputConfig,
}

/// Web archive endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Root URL of the archive service (snapshots live under `<base-url>/web/`)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the CDX index endpoint, relative to `base-url`
    #[serde(rename = "index-path")]
    pub index_path: String,

    /// Timeout for a single index query (seconds)
    #[serde(rename = "index-timeout-secs")]
    pub index_timeout_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://web.archive.org".to_string(),
            index_path: "/cdx/search/cdx".to_string(),
            index_timeout_secs: 10,
        }
    }
}

impl ArchiveConfig {
    /// Full URL of the index endpoint
    pub fn index_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.index_path.trim_start_matches('/')
        )
    }

    pub fn index_timeout(&self) -> Duration {
        Duration::from_secs(self.index_timeout_secs)
    }
}

/// Snapshot fetch retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total number of attempts per snapshot
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Backoff base; attempt `n` (zero-based) waits `base * 2^n` after failing
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,

    /// Per-attempt timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Whether a non-200 response is retried like a transport error
    #[serde(rename = "retry-on-status")]
    pub retry_on_status: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            timeout_secs: 15,
            retry_on_status: true,
            user_agent: format!("backscanner/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Scan pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Pause after every snapshot, whatever its outcome (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 10_000,
        }
    }
}

impl ScanConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// OCR fallback settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Disabling OCR leaves the native text layer as the only strategy
    pub enabled: bool,

    /// Rasterization resolution
    pub dpi: u32,

    /// Tesseract language code
    pub language: String,

    #[serde(rename = "pdftoppm-path")]
    pub pdftoppm_path: String,

    #[serde(rename = "tesseract-path")]
    pub tesseract_path: String,

    /// Upper bound on a single `pdftoppm` or `tesseract` run (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: 300,
            language: "eng".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            timeout_secs: 120,
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the flat-file report, truncated at the start of every run
    #[serde(rename = "report-path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "VULN.txt".to_string(),
        }
    }
}
