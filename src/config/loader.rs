//! Load resource config from a JSON file or string.

use crate::config::{validate, ReadConfig};
use crate::error::ConfigError;
use std::path::Path;

/// Parse and validate a resource config document.
pub fn parse(json: &str) -> Result<ReadConfig, ConfigError> {
    let config: ReadConfig = serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Read, parse and validate the resource config at `path`.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<ReadConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let config = parse(&raw)?;
    tracing::info!(path = %path.display(), resources = config.resources.len(), "loaded resource config");
    Ok(config)
}
