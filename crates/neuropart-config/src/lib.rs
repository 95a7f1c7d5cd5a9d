// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuropart configuration
//!
//! Two kinds of configuration feed a generation run:
//! - the **global descriptor** (`global.xml`): neuron totals, partition unit size,
//!   and the typed id ranges to split. Its root element is also appended into every
//!   generated manifest.
//! - the **tool settings** (`neuropart.toml`, optional): where templates live, where
//!   output goes, and how generation behaves. Loaded as TOML file, then environment
//!   overrides, then CLI overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neuropart_config::{load_config, load_global_config, validate_global_config};
//!
//! let settings = load_config(None, None).expect("Failed to load settings");
//! let global = load_global_config(settings.paths.global_path()).expect("Failed to load global.xml");
//! validate_global_config(&global).expect("Invalid global.xml");
//!
//! println!("Ranges: {}", global.ranges.len());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod global;
pub mod loader;
pub mod types;
pub mod validation;

pub use global::{load_global_config, parse_global_config, GlobalConfig, RangeSpec};
pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{
    check_output_location, validate_global_config, validate_run_config, ConfigValidationError,
};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed XML: {0}")]
    XmlError(String),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<xmltree::ParseError> for ConfigError {
    fn from(err: xmltree::ParseError) -> Self {
        ConfigError::XmlError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults_compile() {
        let config = RunConfig::default();
        assert_eq!(config.generation.append_mode, AppendMode::Once);
    }

    #[test]
    fn test_toml_error_maps_to_parse_error() {
        let err = toml::from_str::<RunConfig>("paths = 3").unwrap_err();
        assert!(matches!(ConfigError::from(err), ConfigError::ParseError(_)));
    }
}
