//! Client configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Where the reference server listens when run locally.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid endpoint {0:?}: expected an http(s) URL")]
    Endpoint(String),
}

/// Settings for talking to the predict endpoint.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the predict route.
    pub endpoint: String,

    /// Request timeout in milliseconds. Absent means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        self.endpoint = endpoint.into();
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://");
        if ok {
            Ok(())
        } else {
            Err(ConfigError::Endpoint(self.endpoint.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ClientConfig::from_json_str("{}").unwrap(), ClientConfig::default());
        assert_eq!(ClientConfig::default().timeout(), None);
    }

    #[test]
    fn fields_override_defaults() {
        let config = ClientConfig::from_json_str(
            r#"{"endpoint": "https://digits.example/predict", "timeout_ms": 1500}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "https://digits.example/predict");
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        assert!(matches!(
            ClientConfig::from_json_str(r#"{"endpoint": "/predict"}"#),
            Err(ConfigError::Endpoint(_))
        ));
        assert!(matches!(
            ClientConfig::default().with_endpoint("ftp://x"),
            Err(ConfigError::Endpoint(_))
        ));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            ClientConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ClientConfig::from_json_file(Path::new("/nonexistent/digit-pad.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
