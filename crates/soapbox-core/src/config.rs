#![allow(clippy::module_name_repetitions)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Client-side transport configuration.
///
/// Loaded from `<config dir>/soapbox/config.toml` when present; every
/// field has a default so a missing file means default configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Global transport timeout applied to every request.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Bounded retry budget for transport-level failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

/// Environment variable overriding the configured base URL.
pub const API_URL_ENV: &str = "SOAPBOX_API_URL";

/// Load configuration from the platform config directory, then apply the
/// `SOAPBOX_API_URL` override if set.
///
/// # Errors
///
/// Returns an error when an existing config file cannot be read or parsed.
pub fn load_client_config() -> Result<ClientConfig> {
    let mut config = match dirs::config_dir() {
        Some(config_dir) => load_client_config_from(&config_dir.join("soapbox/config.toml"))?,
        None => ClientConfig::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
        config.base_url = url;
    }

    Ok(config)
}

/// Load configuration from a specific path; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_client_config_from(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ClientConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_retry_attempts() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let cfg = load_client_config_from(&tmp.path().join("config.toml"))
            .expect("load should succeed");
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.timeout_ms, 10_000);
        assert_eq!(cfg.retry_attempts, 3);
    }

    #[test]
    fn partial_config_fills_remaining_defaults() {
        let cfg: ClientConfig =
            toml::from_str("base_url = \"http://10.0.2.2:5000\"").expect("parse");
        assert_eq!(cfg.base_url, "http://10.0.2.2:5000");
        assert_eq!(cfg.timeout_ms, 10_000);
        assert_eq!(cfg.retry_attempts, 3);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").expect("write");
        assert!(load_client_config_from(&path).is_err());
    }
}
