//! Logger configuration
//!
//! Configuration loaded from .scriptlog.toml file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Logger configuration supplied by the host
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Print mode by name: NONE, DEFAULT, PROPS or DEEP
    #[serde(default = "default_print_mode")]
    pub print_mode: String,

    /// Groups a record must be tagged with to be printed (empty = all)
    #[serde(default)]
    pub group_filters: Vec<String>,

    /// Append the caller's stack trace to printed values
    #[serde(default)]
    pub show_stack: bool,

    /// Echo rejected chain expressions before the error is returned
    #[serde(default)]
    pub show_errors: bool,

    /// Hand the log history to the on-screen overlay
    #[serde(default)]
    pub log_to_screen: bool,

    /// File extensions that identify script sources in stack traces
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Number of newest lines shown on screen
    #[serde(default = "default_history_tail")]
    pub history_tail: usize,
}

fn default_print_mode() -> String {
    "DEFAULT".to_string()
}

fn default_source_extensions() -> Vec<String> {
    vec![".js".to_string(), ".ts".to_string()]
}

fn default_history_tail() -> usize {
    500
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            print_mode: default_print_mode(),
            group_filters: Vec::new(),
            show_stack: false,
            show_errors: false,
            log_to_screen: false,
            source_extensions: default_source_extensions(),
            history_tail: default_history_tail(),
        }
    }
}

impl LoggerConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::from_toml_str(&content) {
                Ok(config) => {
                    log::info!("Loaded logger config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default logger config");
        Self::default()
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid logger configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.print_mode, "DEFAULT");
        assert!(config.group_filters.is_empty());
        assert!(!config.show_stack);
        assert!(!config.log_to_screen);
        assert_eq!(config.source_extensions, vec![".js", ".ts"]);
        assert_eq!(config.history_tail, 500);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            print_mode = "DEEP"
            group_filters = ["ui", "physics"]
            show_stack = true
            log_to_screen = true
        "#;
        let config = LoggerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.print_mode, "DEEP");
        assert_eq!(config.group_filters, vec!["ui", "physics"]);
        assert!(config.show_stack);
        assert!(config.log_to_screen);
        // unset keys use defaults
        assert_eq!(config.history_tail, 500);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config = LoggerConfig::from_toml_str("source_extensions = [\".lua\"]").unwrap();
        assert_eq!(config.source_extensions, vec![".lua"]);
        assert_eq!(config.print_mode, "DEFAULT");
    }

    #[test]
    fn test_config_rejects_wrong_types() {
        assert!(LoggerConfig::from_toml_str("show_stack = \"yes\"").is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = LoggerConfig {
            print_mode: "PROPS".to_string(),
            ..LoggerConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(LoggerConfig::from_toml_str(&text).unwrap(), config);
    }
}
