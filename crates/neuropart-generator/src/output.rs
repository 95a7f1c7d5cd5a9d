// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Output directory handling and manifest serialization
//!
//! The output directory belongs to the run: it is removed with everything in
//! it and recreated empty before any manifest is written.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use xmltree::{Element, EmitterConfig};

use crate::{GeneratorError, Result};

/// Remove `path` recursively if it exists, then create it empty
///
/// # Errors
///
/// `OutputNotDirectory` if `path` exists but is a file or symlink; `Io` if the
/// removal or creation fails.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => {
            info!("Removing previous output directory {}", path.display());
            fs::remove_dir_all(path).map_err(|e| GeneratorError::io(path, e))?;
        }
        Ok(_) => return Err(GeneratorError::OutputNotDirectory(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(GeneratorError::io(path, e)),
    }

    fs::create_dir_all(path).map_err(|e| GeneratorError::io(path, e))?;
    debug!("Created output directory {}", path.display());
    Ok(())
}

fn emit(document: &Element, indent: bool) -> std::result::Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let config = EmitterConfig::new().perform_indent(indent);
    document
        .write_with_config(&mut buffer, config)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}

/// Serialize a manifest, XML declaration included
pub fn render_document(document: &Element, indent: bool) -> Result<Vec<u8>> {
    emit(document, indent).map_err(|message| GeneratorError::Write {
        path: PathBuf::new(),
        message,
    })
}

/// Write a manifest to `path`, replacing any existing file
pub fn write_document(document: &Element, path: &Path, indent: bool) -> Result<()> {
    let bytes = emit(document, indent).map_err(|message| GeneratorError::Write {
        path: path.to_path_buf(),
        message,
    })?;
    fs::write(path, bytes).map_err(|e| GeneratorError::io(path, e))
}
