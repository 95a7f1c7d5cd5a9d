// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use neuropart::config::{load_config, load_global_config, validate_run_config, RunConfig};
use neuropart::generator::{run, summary_lines, GenerateOptions};
use neuropart::observability::{init_logging, CrateDebugFlags};

/// Generate per-partition XML job manifests from global.xml and neuron templates
#[derive(Parser, Debug)]
#[command(name = "neuropart", version, author, long_about = None)]
struct Args {
    /// Settings file (default: $NEUROPART_CONFIG_PATH, then ./neuropart.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding global.xml and the <type>_template.xml files
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Output directory; removed and recreated on every run
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Descriptor file name inside the template directory
    #[arg(long)]
    global_file: Option<String>,

    /// How the global descriptor is appended: "once" or "cumulative"
    #[arg(long)]
    append_mode: Option<String>,

    /// Shorthand for --append-mode cumulative
    #[arg(long, default_value_t = false, conflicts_with = "append_mode")]
    legacy_append: bool,

    /// Generate ranges concurrently
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Directory for the JSON log file (file-logging feature)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Enable DEBUG for a crate (repeatable, or "all")
    #[arg(long = "debug", value_name = "CRATE")]
    debug_crates: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    /// Overrides for `load_config`, keyed by setting name
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(dir) = &self.template_dir {
            overrides.insert("template_dir".to_string(), dir.display().to_string());
        }
        if let Some(dir) = &self.output_dir {
            overrides.insert("output_dir".to_string(), dir.display().to_string());
        }
        if let Some(file) = &self.global_file {
            overrides.insert("global_file".to_string(), file.clone());
        }
        if let Some(mode) = &self.append_mode {
            overrides.insert("append_mode".to_string(), mode.clone());
        } else if self.legacy_append {
            overrides.insert("append_mode".to_string(), "cumulative".to_string());
        }
        if self.parallel {
            overrides.insert("parallel".to_string(), "true".to_string());
        }
        if let Some(dir) = &self.log_dir {
            overrides.insert("log_dir".to_string(), dir.display().to_string());
        }
        if self.verbose {
            overrides.insert("log_level".to_string(), "debug".to_string());
        }
        overrides
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_config(args.config.as_deref(), Some(&args.overrides()))
        .context("Failed to load settings")?;
    validate_run_config(&settings).context("Invalid settings")?;

    let debug_flags = CrateDebugFlags::from_names(&args.debug_crates).with_environment();
    let _logging = init_logging(
        &debug_flags,
        &settings.logging.level,
        settings.logging.log_dir.as_deref(),
    )?;

    generate(&settings)
}

fn generate(settings: &RunConfig) -> Result<()> {
    let global_path = settings.paths.global_path();
    info!("Reading global descriptor {}", global_path.display());
    let global = load_global_config(&global_path)
        .with_context(|| format!("Failed to read {}", global_path.display()))?;
    debug!("{} range(s) declared", global.ranges.len());

    for line in summary_lines(&global) {
        println!("{}", line);
    }

    let options = GenerateOptions::from_run_config(settings);
    let report = run(&global, &options).context("Generation failed")?;

    println!(
        "Wrote {} file(s) to {}",
        report.file_count(),
        options.output_dir.display()
    );
    Ok(())
}
