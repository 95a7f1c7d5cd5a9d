// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuropart-observability
//!
//! Logging setup shared by the neuropart binary and tests: a console
//! `tracing-subscriber` layer filtered per crate, plus an optional JSON log
//! file.
//!
//! ## Features
//! - `file-logging`: JSON log file via `tracing-appender`

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known neuropart crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neuropart",
    "neuropart-config",
    "neuropart-generator",
    "neuropart-observability",
];
