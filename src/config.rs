use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_LABEL: &str = "monitorElements";

/// Converter parameters, as supplied by the host job configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConverterConfig {
    /// Label every run product is stored under.
    pub name: String,
    /// Only the last decimal digit is significant:
    /// <0 silent, 0 minimal, 1 run logging, >=2 per-element tracing.
    pub verbosity: i32,
    /// Run-number modulus gating run logging at verbosity 0.
    pub frequency: i32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LABEL.to_string(),
            verbosity: 0,
            frequency: 1,
        }
    }
}

impl ConverterConfig {
    pub fn new(name: &str, verbosity: i32, frequency: i32) -> Self {
        Self {
            name: name.to_string(),
            verbosity,
            frequency,
        }
    }

    /// `verbosity % 10`, sign preserved.
    pub fn effective_verbosity(&self) -> i32 {
        self.verbosity % 10
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_verbosity_uses_last_digit() {
        assert_eq!(ConverterConfig::new("dqm", 12, 1).effective_verbosity(), 2);
        assert_eq!(ConverterConfig::new("dqm", 10, 1).effective_verbosity(), 0);
        assert_eq!(ConverterConfig::new("dqm", -1, 1).effective_verbosity(), -1);
        assert_eq!(ConverterConfig::new("dqm", -10, 1).effective_verbosity(), 0);
    }

    #[test]
    fn parses_host_parameter_names() {
        let config =
            ConverterConfig::from_json_str(r#"{"Name": "dqmRun", "Verbosity": 1, "Frequency": 50}"#)
                .unwrap();
        assert_eq!(config, ConverterConfig::new("dqmRun", 1, 50));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConverterConfig::from_json_str(r#"{"Verbosity": -1}"#).unwrap();
        assert_eq!(config.name, DEFAULT_LABEL);
        assert_eq!(config.frequency, 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = ConverterConfig::from_json_str(r#"{"Name": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyName));
    }
}
