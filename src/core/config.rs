//! TOML configuration file parsing and loading
//!
//! Runtime tuning for the queue engine and its fanout: wait estimation,
//! default capacity, logging and the email from-address. Every field has a
//! default so an empty file (or no file) yields a working configuration.

use crate::core::validation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Crate-wide runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueFlowConfig {
    /// Log level spec handed to the logger ("info", "debug", "queueflow=trace", ...)
    pub log_level: String,
    /// Optional log file path; stderr only when absent
    pub log_file: Option<String>,
    /// Capacity applied to service points created without an explicit limit
    pub default_max_queue_length: Option<u32>,
    /// Minutes of estimated wait attributed to each visitor ahead in the queue
    pub minutes_per_visitor: i64,
    /// From-address used by the email seam
    pub email_from: String,
}

impl Default for QueueFlowConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            default_max_queue_length: None,
            minutes_per_visitor: 5,
            email_from: "no-reply@queueflow.local".to_string(),
        }
    }
}

impl QueueFlowConfig {
    /// Parse configuration from TOML text and validate the values
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| format!("Error parsing configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading configuration file {}: {}", path.display(), e))?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), String> {
        validation::validate_minutes_per_visitor(self.minutes_per_visitor)?;
        if let Some(limit) = self.default_max_queue_length {
            validation::validate_max_queue_length(limit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueueFlowConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.minutes_per_visitor, 5);
        assert_eq!(config.default_max_queue_length, None);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = QueueFlowConfig::from_toml_str("").unwrap();
        assert_eq!(config, QueueFlowConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = QueueFlowConfig::from_toml_str(
            r#"
            log_level = "debug"
            log_file = "/var/log/queueflow.log"
            default_max_queue_length = 40
            minutes_per_visitor = 7
            email_from = "queues@branch.example"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file.as_deref(), Some("/var/log/queueflow.log"));
        assert_eq!(config.default_max_queue_length, Some(40));
        assert_eq!(config.minutes_per_visitor, 7);
        assert_eq!(config.email_from, "queues@branch.example");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(QueueFlowConfig::from_toml_str("minutes_per_visitor = 0").is_err());
        assert!(QueueFlowConfig::from_toml_str("default_max_queue_length = 0").is_err());
        assert!(QueueFlowConfig::from_toml_str("unknown_key = true").is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "minutes_per_visitor = 3").unwrap();

        let config = QueueFlowConfig::load(file.path()).unwrap();
        assert_eq!(config.minutes_per_visitor, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = QueueFlowConfig::load(Path::new("/nonexistent/queueflow.toml"));
        assert!(result.is_err());
    }
}
