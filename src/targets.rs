//! Target URL list loading

use crate::{InputError, InputResult};
use std::path::Path;
use url::Url;

/// Loads the URL list, one target per line
///
/// Blank lines are ignored. Lines that do not parse as URLs are kept (the
/// archive accepts bare host paths) but logged as a warning.
pub fn load_targets(path: &Path) -> InputResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let targets = parse_targets(&content);
    tracing::info!("Loaded {} target URLs from {}", targets.len(), path.display());
    Ok(targets)
}

/// Splits URL list content into trimmed, non-blank targets
pub fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .inspect(|line| {
            if Url::parse(line).is_err() {
                tracing::warn!("Target '{}' is not an absolute URL", line);
            }
        })
        .map(str::to_string)
        .collect()
}
