//! Configuration for scriptlog
//!
//! This crate provides:
//! - Configuration and cache directory paths
//! - Configuration file discovery (TOML)
//! - Logger configuration (LoggerConfig)

pub mod config_file;
pub mod logger_config;
pub mod paths;

pub use config_file::load_config_file;
pub use logger_config::LoggerConfig;
pub use paths::{cache_dir, config_dir, global_config_path};
