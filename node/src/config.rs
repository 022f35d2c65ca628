//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use namepool_mempool::MempoolConfig;

use crate::{LogFormat, NodeError};

/// Configuration for the name mempool service.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    #[serde(default)]
    pub mempool: MempoolConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The configured log format; anything but "json" is human-readable.
    pub fn log_format(&self) -> LogFormat {
        if self.log_format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Human
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
            mempool: MempoolConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.mempool, config.mempool);
        assert_eq!(parsed.log_level, config.log_level);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "info");
        assert!(!config.enable_metrics);
        assert!(!config.mempool.sanity_check_names);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"
            enable_metrics = true

            [mempool]
            sanity_check_names = true
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.enable_metrics);
        assert!(config.mempool.sanity_check_names);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = NodeConfig::from_toml_str("log_level = [").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("namepool.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").expect("write config");

        let config = NodeConfig::from_toml_file(&path).expect("should load");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = NodeConfig::from_toml_file("/nonexistent/namepool.toml").unwrap_err();
        assert!(matches!(err, NodeError::Io(_)));
    }
}
