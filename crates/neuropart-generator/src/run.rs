// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run orchestration
//!
//! One run: validate the descriptor, wipe and recreate the output directory,
//! then generate every declared range. Ranges are independent (each loads its
//! own template and writes its own file names), so with the `parallel` feature
//! they may be processed concurrently. The report always lists ranges in
//! declaration order, and the first failure aborts the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use neuropart_config::{
    check_output_location, validate_global_config, AppendMode, GlobalConfig, RangeSpec, RunConfig,
};
use tracing::{debug, info, warn};
use xmltree::Element;

use crate::output::{prepare_output_dir, write_document};
use crate::partition::partitions;
use crate::template::{output_file_name, NeuronTemplate};
use crate::Result;

/// Everything a run needs besides the descriptor
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub append_mode: AppendMode,
    pub parallel: bool,
    pub indent: bool,
}

impl GenerateOptions {
    pub fn new(template_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            output_dir: output_dir.into(),
            append_mode: AppendMode::Once,
            parallel: false,
            indent: true,
        }
    }

    pub fn from_run_config(config: &RunConfig) -> Self {
        Self {
            template_dir: config.paths.template_dir.clone(),
            output_dir: config.paths.output_dir.clone(),
            append_mode: config.generation.append_mode,
            parallel: config.generation.parallel,
            indent: config.generation.indent,
        }
    }

    pub fn with_append_mode(mut self, append_mode: AppendMode) -> Self {
        self.append_mode = append_mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }
}

/// Files written for one range, in partition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReport {
    pub neuron_type: String,
    pub files: Vec<PathBuf>,
}

/// Outcome of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// In declaration order
    pub ranges: Vec<RangeReport>,
}

impl RunReport {
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.ranges
            .iter()
            .flat_map(|range| range.files.iter().map(PathBuf::as_path))
    }

    pub fn file_count(&self) -> usize {
        self.ranges.iter().map(|range| range.files.len()).sum()
    }
}

/// Human-readable run summary
pub fn summary_lines(global: &GlobalConfig) -> Vec<String> {
    vec![
        format!("Total number of neurons: {}", global.total_neurons),
        format!("Number of channels: {}", global.num_channels),
        format!(
            "Maximum number of neurons in each partition: {}",
            global.partition_unit_size
        ),
    ]
}

/// Generate the manifests of one range into `options.output_dir`
///
/// The output directory must already exist. Files are overwritten.
pub fn generate_range(
    range: &RangeSpec,
    partition_unit_size: i64,
    global_root: &Element,
    options: &GenerateOptions,
) -> Result<RangeReport> {
    let template = NeuronTemplate::load(&options.template_dir, &range.neuron_type)?;
    let partitions = partitions(range.start_id, range.end_id, partition_unit_size)?;

    debug!(
        "Range {} [{}, {}]: {} partition(s), append mode {}",
        range.neuron_type,
        range.start_id,
        range.end_id,
        partitions.len(),
        options.append_mode
    );

    let mut instantiator = template.instantiator(options.append_mode, global_root);
    let mut files = Vec::with_capacity(partitions.len());

    for partition in partitions {
        let path = options
            .output_dir
            .join(output_file_name(&range.neuron_type, &partition));
        let document = instantiator.instantiate(&partition)?;
        write_document(document, &path, options.indent)?;
        debug!("Wrote {}", path.display());
        files.push(path);
    }

    Ok(RangeReport {
        neuron_type: range.neuron_type.clone(),
        files,
    })
}

/// Generate every declared range
///
/// The descriptor and the output location are validated before the output
/// directory is touched; after that, a failure leaves the output directory
/// partially populated.
pub fn run(global: &GlobalConfig, options: &GenerateOptions) -> Result<RunReport> {
    validate_global_config(global)?;
    check_output_location(&options.output_dir, &options.template_dir)?;
    prepare_output_dir(&options.output_dir)?;

    for line in summary_lines(global) {
        debug!("{}", line);
    }

    let ranges = if options.parallel && can_run_concurrently(&global.ranges) {
        generate_concurrently(global, options)?
    } else {
        generate_sequentially(global, options)?
    };

    let report = RunReport { ranges };
    info!(
        "Wrote {} manifest(s) for {} range(s) to {}",
        report.file_count(),
        report.ranges.len(),
        options.output_dir.display()
    );
    Ok(report)
}

fn generate_sequentially(global: &GlobalConfig, options: &GenerateOptions) -> Result<Vec<RangeReport>> {
    global
        .ranges
        .iter()
        .map(|range| generate_range(range, global.partition_unit_size, &global.root, options))
        .collect()
}

#[cfg(feature = "parallel")]
fn generate_concurrently(global: &GlobalConfig, options: &GenerateOptions) -> Result<Vec<RangeReport>> {
    use rayon::prelude::*;

    global
        .ranges
        .par_iter()
        .map(|range| generate_range(range, global.partition_unit_size, &global.root, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn generate_concurrently(global: &GlobalConfig, options: &GenerateOptions) -> Result<Vec<RangeReport>> {
    warn!("Parallel generation requested but the parallel feature is disabled; running sequentially");
    generate_sequentially(global, options)
}

/// Ranges sharing a neuron type may produce the same file name; those are
/// written one after another so the last declaration wins, as it would sequentially.
fn can_run_concurrently(ranges: &[RangeSpec]) -> bool {
    let mut seen = HashSet::new();
    let distinct = ranges.iter().all(|range| seen.insert(range.neuron_type.as_str()));
    if !distinct {
        warn!("Ranges share a neuron type; generating sequentially");
    }
    distinct
}
