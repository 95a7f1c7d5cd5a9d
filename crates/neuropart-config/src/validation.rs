//! Configuration validation
//!
//! Catches configuration errors before a run touches the output directory:
//! a zero or negative partition unit, inverted ranges, neuron types that
//! cannot name a file, and output locations that would wipe the inputs.

use std::path::{Component, Path};

use crate::{ConfigError, ConfigResult, GlobalConfig, RunConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    NonPositiveUnit { unit: i64 },
    InvertedRange { index: usize, neuron_type: String, start_id: i64, end_id: i64 },
    InvalidNeuronType { index: usize, neuron_type: String },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveUnit { unit } => {
                write!(f, "Partition unit size must be positive, got {}", unit)
            }
            Self::InvertedRange {
                index,
                neuron_type,
                start_id,
                end_id,
            } => {
                write!(
                    f,
                    "Range #{} ({}) ends before it starts: start={}, end={}",
                    index, neuron_type, start_id, end_id
                )
            }
            Self::InvalidNeuronType { index, neuron_type } => {
                write!(
                    f,
                    "Range #{} has neuron type '{}' which cannot be used in a file name",
                    index, neuron_type
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the parsed global descriptor
///
/// `total` and `channel` are informational and accepted as-is.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_global_config(config: &GlobalConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if config.partition_unit_size <= 0 {
        errors.push(ConfigValidationError::NonPositiveUnit {
            unit: config.partition_unit_size,
        });
    }

    for (index, range) in config.ranges.iter().enumerate() {
        if !is_valid_neuron_type(&range.neuron_type) {
            errors.push(ConfigValidationError::InvalidNeuronType {
                index,
                neuron_type: range.neuron_type.clone(),
            });
        }
        if range.end_id < range.start_id {
            errors.push(ConfigValidationError::InvertedRange {
                index,
                neuron_type: range.neuron_type.clone(),
                start_id: range.start_id,
                end_id: range.end_id,
            });
        }
    }

    into_result(errors)
}

/// Validate tool settings
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` if the output directory is empty, or
/// if wiping it would delete the templates or the working directory
pub fn validate_run_config(config: &RunConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if let Some(error) = output_location_error(&config.paths.output_dir, &config.paths.template_dir) {
        errors.push(error);
    }

    if config.paths.global_file.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.global_file".to_string(),
        });
    }

    into_result(errors)
}

/// Check that the output directory can be wiped without losing inputs
///
/// The output directory must not be the template directory or one of its
/// ancestors, and must not be the working directory, one of its ancestors, or
/// a filesystem root. Paths are compared lexically and, when both exist, after
/// canonicalization.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` describing the conflict
pub fn check_output_location(output_dir: &Path, template_dir: &Path) -> ConfigResult<()> {
    into_result(output_location_error(output_dir, template_dir).into_iter().collect())
}

fn output_location_error(output_dir: &Path, template_dir: &Path) -> Option<ConfigValidationError> {
    let field = "paths.output_dir".to_string();

    if output_dir.as_os_str().is_empty() {
        return Some(ConfigValidationError::MissingRequired { field });
    }

    let output = normalized(output_dir);
    if !output.iter().any(|c| matches!(c, Component::Normal(_))) {
        return Some(ConfigValidationError::InvalidValue {
            field,
            reason: format!(
                "'{}' is the working directory, one of its ancestors, or a filesystem root",
                output_dir.display()
            ),
        });
    }

    if normalized(template_dir).starts_with(&output) || contains_canonically(output_dir, template_dir) {
        return Some(ConfigValidationError::InvalidValue {
            field,
            reason: format!(
                "'{}' must not be or contain paths.template_dir '{}'",
                output_dir.display(),
                template_dir.display()
            ),
        });
    }

    None
}

fn contains_canonically(output_dir: &Path, template_dir: &Path) -> bool {
    match (output_dir.canonicalize(), template_dir.canonicalize()) {
        (Ok(output), Ok(template)) => template.starts_with(output),
        _ => false,
    }
}

fn is_valid_neuron_type(neuron_type: &str) -> bool {
    !neuron_type.is_empty()
        && neuron_type != "."
        && neuron_type != ".."
        && !neuron_type.contains(['/', '\\'])
}

/// Lexical normalization; `./out`, `out/` and `out/x/..` compare equal
fn normalized(path: &Path) -> Vec<Component<'_>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(components.last(), Some(Component::Normal(_))) => {
                components.pop();
            }
            other => components.push(other),
        }
    }
    components
}

fn into_result(errors: Vec<ConfigValidationError>) -> ConfigResult<()> {
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}
