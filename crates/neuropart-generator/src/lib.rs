// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuropart generator
//!
//! Turns the ranges declared in a global descriptor into per-partition XML
//! manifests:
//!
//! 1. each range `[start_id, end_id]` is cut into partitions of at most
//!    `partition_unit_size` ids ([`partition`]);
//! 2. the range's `<type>_template.xml` gets the partition bounds stamped onto
//!    `neuron/start_id` and `neuron/end_id`, and the global descriptor's root is
//!    appended ([`template`]);
//! 3. the result is written to `<output_dir>/<type>_<start>to<end>.xml` in an
//!    output directory that is wiped at the start of every run ([`output`]).
//!
//! ## Usage
//! ```ignore
//! use neuropart_config::load_global_config;
//! use neuropart_generator::{run, GenerateOptions};
//!
//! let global = load_global_config("xml_templates/global.xml")?;
//! let options = GenerateOptions::new("xml_templates", "xml_input4Hadoop");
//! let report = run(&global, &options)?;
//! println!("{} manifests written", report.file_count());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::path::PathBuf;

use neuropart_config::ConfigError;
use thiserror::Error;

pub mod output;
pub mod partition;
pub mod run;
pub mod template;

pub use output::{prepare_output_dir, render_document, write_document};
pub use partition::{partition_count, partitions, Partition, Partitions};
pub use run::{generate_range, run, summary_lines, GenerateOptions, RangeReport, RunReport};
pub use template::{output_file_name, template_file_name, NeuronTemplate, TemplateInstantiator};

/// Generation errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("Failed to serialize {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("No template for neuron type '{neuron_type}': {path} not found")]
    TemplateNotFound { neuron_type: String, path: PathBuf },

    #[error("Template {path} has no <{element}> element")]
    MalformedTemplate { path: PathBuf, element: String },

    #[error("Partition unit size must be positive, got {0}")]
    InvalidUnit(i64),

    #[error("Range ends before it starts: start={start_id}, end={end_id}")]
    InvertedRange { start_id: i64, end_id: i64 },

    #[error("Range {start_id}..={end_id} with unit {unit} yields more partitions than can be addressed")]
    PartitionOverflow { start_id: i64, end_id: i64, unit: i64 },

    #[error("Output path exists and is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
