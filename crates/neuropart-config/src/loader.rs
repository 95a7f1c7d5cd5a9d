// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tool settings loading with override support
//!
//! Settings are layered:
//! 1. `neuropart.toml` (optional; built-in defaults when absent)
//! 2. Environment variables
//! 3. CLI arguments

use crate::{AppendMode, ConfigError, ConfigResult, RunConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locate the settings file
///
/// Search order:
/// 1. `NEUROPART_CONFIG_PATH` environment variable (must exist)
/// 2. `./neuropart.toml` in the current working directory
///
/// Returns `Ok(None)` when no file is found; defaults apply in that case.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if `NEUROPART_CONFIG_PATH` names a missing file
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var("NEUROPART_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "settings file specified by NEUROPART_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let local = env::current_dir()?.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(Some(local));
    }

    Ok(None)
}

/// Load tool settings
///
/// # Arguments
///
/// * `config_path` - Explicit settings file. If `None`, [`find_config_file`] is consulted.
/// * `cli_args` - Optional CLI overrides, keyed as documented on [`apply_cli_overrides`]
///
/// # Errors
///
/// Returns error if an explicit file is missing, unreadable, or not valid TOML,
/// or if a CLI override has an invalid value
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<RunConfig> {
    let config_file = match config_path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match config_file {
        Some(file) => {
            debug!("Reading settings from {}", file.display());
            let content = fs::read_to_string(&file)?;
            toml::from_str::<RunConfig>(&content)?
        }
        None => {
            debug!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
            RunConfig::default()
        }
    };

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Apply environment variable overrides
///
/// Supported environment variables:
/// - `NEUROPART_TEMPLATE_DIR` -> `paths.template_dir`
/// - `NEUROPART_OUTPUT_DIR` -> `paths.output_dir`
/// - `NEUROPART_GLOBAL_FILE` -> `paths.global_file`
/// - `NEUROPART_APPEND_MODE` -> `generation.append_mode`
/// - `NEUROPART_PARALLEL` -> `generation.parallel`
/// - `NEUROPART_LOG_LEVEL` -> `logging.level`
/// - `NEUROPART_LOG_DIR` -> `logging.log_dir`
///
/// Values that fail to parse are skipped with a warning.
pub fn apply_environment_overrides(config: &mut RunConfig) {
    if let Ok(value) = env::var("NEUROPART_TEMPLATE_DIR") {
        config.paths.template_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("NEUROPART_OUTPUT_DIR") {
        config.paths.output_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("NEUROPART_GLOBAL_FILE") {
        config.paths.global_file = value;
    }
    if let Ok(value) = env::var("NEUROPART_APPEND_MODE") {
        match value.parse::<AppendMode>() {
            Ok(mode) => config.generation.append_mode = mode,
            Err(e) => warn!("Ignoring NEUROPART_APPEND_MODE: {}", e),
        }
    }
    if let Ok(value) = env::var("NEUROPART_PARALLEL") {
        config.generation.parallel = parse_flag(&value);
    }
    if let Ok(value) = env::var("NEUROPART_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("NEUROPART_LOG_DIR") {
        config.logging.log_dir = Some(PathBuf::from(value));
    }
}

/// Apply CLI argument overrides
///
/// Recognized keys: `template_dir`, `output_dir`, `global_file`, `append_mode`,
/// `parallel`, `log_level`, `log_dir`. Unknown keys are ignored.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unparseable `append_mode`; an
/// explicit command line is rejected rather than silently ignored.
pub fn apply_cli_overrides(
    config: &mut RunConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("template_dir") {
        config.paths.template_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("output_dir") {
        config.paths.output_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("global_file") {
        config.paths.global_file = value.clone();
    }
    if let Some(value) = cli_args.get("append_mode") {
        config.generation.append_mode = value.parse()?;
    }
    if let Some(value) = cli_args.get("parallel") {
        config.generation.parallel = parse_flag(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_dir") {
        config.logging.log_dir = Some(PathBuf::from(value));
    }
    Ok(())
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "NEUROPART_CONFIG_PATH",
        "NEUROPART_TEMPLATE_DIR",
        "NEUROPART_OUTPUT_DIR",
        "NEUROPART_GLOBAL_FILE",
        "NEUROPART_APPEND_MODE",
        "NEUROPART_PARALLEL",
        "NEUROPART_LOG_LEVEL",
        "NEUROPART_LOG_DIR",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var("NEUROPART_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("NEUROPART_CONFIG_PATH");

        assert_eq!(result.unwrap(), Some(config_path));
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();

        env::set_var("NEUROPART_CONFIG_PATH", dir.path().join("absent.toml"));
        let result = find_config_file();
        env::remove_var("NEUROPART_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("neuropart.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[paths]").unwrap();
        writeln!(file, "template_dir = \"templates\"").unwrap();
        writeln!(file, "[generation]").unwrap();
        writeln!(file, "parallel = true").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.paths.template_dir, PathBuf::from("templates"));
        assert_eq!(config.paths.output_dir, PathBuf::from("./xml_input4Hadoop"));
        assert!(config.generation.parallel);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("nope.toml")), None);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("neuropart.toml");
        fs::write(&config_path, "[generation\nappend_mode = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = RunConfig::default();

        env::set_var("NEUROPART_OUTPUT_DIR", "/tmp/partitions");
        env::set_var("NEUROPART_APPEND_MODE", "cumulative");
        env::set_var("NEUROPART_PARALLEL", "yes");

        apply_environment_overrides(&mut config);
        clear_env();

        assert_eq!(config.paths.output_dir, PathBuf::from("/tmp/partitions"));
        assert_eq!(config.generation.append_mode, AppendMode::Cumulative);
        assert!(config.generation.parallel);
    }

    #[test]
    fn test_invalid_environment_value_is_ignored() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = RunConfig::default();

        env::set_var("NEUROPART_APPEND_MODE", "sometimes");
        apply_environment_overrides(&mut config);
        clear_env();

        assert_eq!(config.generation.append_mode, AppendMode::Once);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = RunConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("template_dir".to_string(), "in".to_string());
        cli_args.insert("append_mode".to_string(), "cumulative".to_string());
        cli_args.insert("log_level".to_string(), "debug".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.paths.template_dir, PathBuf::from("in"));
        assert_eq!(config.generation.append_mode, AppendMode::Cumulative);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_cli_invalid_append_mode_is_an_error() {
        let mut config = RunConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("append_mode".to_string(), "twice".to_string());

        let result = apply_cli_overrides(&mut config, &cli_args);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("neuropart.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[paths]").unwrap();
        writeln!(file, "template_dir = \"file-templates\"").unwrap();
        writeln!(file, "output_dir = \"file-output\"").unwrap();

        env::set_var("NEUROPART_TEMPLATE_DIR", "env-templates");
        env::set_var("NEUROPART_OUTPUT_DIR", "env-output");

        let mut cli_args = HashMap::new();
        cli_args.insert("template_dir".to_string(), "cli-templates".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_env();

        // CLI wins for template_dir, env wins for output_dir (no CLI override)
        assert_eq!(config.paths.template_dir, PathBuf::from("cli-templates"));
        assert_eq!(config.paths.output_dir, PathBuf::from("env-output"));
    }
}
