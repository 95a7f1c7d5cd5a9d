// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tool settings type definitions
//!
//! These structs map to sections in `neuropart.toml`. Every section and field
//! has a default, so a missing file or an empty file both yield a usable
//! configuration that reproduces the historical fixed-path invocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ConfigError;

/// Name of the settings file searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "neuropart.toml";

/// Root settings structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub paths: PathsConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Input and output locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `global.xml` and the `<type>_template.xml` files
    pub template_dir: PathBuf,
    /// Directory that is wiped and repopulated on every run
    pub output_dir: PathBuf,
    /// File name of the global descriptor, relative to `template_dir`
    pub global_file: String,
}

impl PathsConfig {
    /// Full path of the global descriptor
    pub fn global_path(&self) -> PathBuf {
        self.template_dir.join(&self.global_file)
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("./xml_templates"),
            output_dir: PathBuf::from("./xml_input4Hadoop"),
            global_file: "global.xml".to_string(),
        }
    }
}

/// Generation behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub append_mode: AppendMode,
    /// Process ranges concurrently (requires the `parallel` feature)
    pub parallel: bool,
    /// Pretty-print generated manifests
    pub indent: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            append_mode: AppendMode::Once,
            parallel: false,
            indent: true,
        }
    }
}

/// How the global descriptor's root is embedded into partition manifests
///
/// Legacy tooling stamped every partition of a range onto one shared template
/// tree and appended the global root each time, so the k-th manifest of a range
/// carried k copies of it. `Cumulative` reproduces those bytes; `Once` gives every
/// manifest exactly one copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppendMode {
    #[default]
    Once,
    Cumulative,
}

impl AppendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppendMode::Once => "once",
            AppendMode::Cumulative => "cumulative",
        }
    }
}

impl fmt::Display for AppendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(AppendMode::Once),
            "cumulative" | "legacy" => Ok(AppendMode::Cumulative),
            other => Err(ConfigError::InvalidValue(format!(
                "append_mode must be 'once' or 'cumulative', got '{}'",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for crates without a debug flag (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for the JSON log file (`file-logging` feature only)
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}
