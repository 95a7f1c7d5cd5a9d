// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuropart
//!
//! Generates per-partition XML job manifests from a global descriptor and one
//! template per neuron type.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neuropart = "0.1"  # Default: parallel range generation
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): ranges are generated on a rayon thread pool
//!   when `generation.parallel` is set
//! - **`file-logging`**: JSON log file next to the console output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neuropart::prelude::*;
//!
//! let settings = load_config(None, None)?;
//! validate_run_config(&settings)?;
//!
//! let global = load_global_config(settings.paths.global_path())?;
//! for line in summary_lines(&global) {
//!     println!("{}", line);
//! }
//!
//! let report = run(&global, &GenerateOptions::from_run_config(&settings))?;
//! println!("{} manifests written", report.file_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Layout
//!
//! ```text
//! neuropart-config         global.xml descriptor, neuropart.toml settings, validation
//!          ↓
//! neuropart-generator      partitioning, template stamping, output directory
//!
//! neuropart-observability  tracing setup for the binary
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use neuropart_config as config;
pub use neuropart_generator as generator;
pub use neuropart_observability as observability;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::config::{
        load_config, load_global_config, validate_global_config, validate_run_config, AppendMode,
        ConfigError, GlobalConfig, RangeSpec, RunConfig,
    };
    pub use crate::generator::{
        generate_range, partitions, run, summary_lines, GenerateOptions, GeneratorError,
        NeuronTemplate, Partition, RunReport,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let parts: Vec<Partition> = partitions(0, 99, 40).unwrap().collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(AppendMode::default(), AppendMode::Once);
    }
}
