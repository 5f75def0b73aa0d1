use crate::config::types::{ArchiveConfig, Config, FetchConfig, OcrConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_archive_config(&config.archive)?;
    validate_fetch_config(&config.fetch)?;
    validate_ocr_config(&config.ocr)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates archive endpoints
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.index_path.is_empty() {
        return Err(ConfigError::Validation(
            "index-path cannot be empty".to_string(),
        ));
    }

    if config.index_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "index-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the retry policy
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    // 2^31 * base would overflow any sensible delay
    if config.max_retries > 31 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 31, got {}",
            config.max_retries
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates OCR settings
fn validate_ocr_config(config: &OcrConfig) -> Result<(), ConfigError> {
    if !(72..=1200).contains(&config.dpi) {
        return Err(ConfigError::Validation(format!(
            "ocr dpi must be between 72 and 1200, got {}",
            config.dpi
        )));
    }

    if config.language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "ocr language cannot be empty".to_string(),
        ));
    }

    if config.pdftoppm_path.is_empty() || config.tesseract_path.is_empty() {
        return Err(ConfigError::Validation(
            "OCR tool paths cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "ocr timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
