//! Per-crate debug flags
//!
//! Collected from repeated `--debug <crate>` values on the command line and the
//! `NEUROPART_DEBUG` environment variable (comma-separated crate names, or `all`).

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Set of crates with debug logging enabled
///
/// # Example
/// ```rust
/// use neuropart_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_names(["neuropart-generator"]);
/// assert!(flags.is_enabled("neuropart-generator"));
/// assert_eq!(flags.to_filter_string("info"), "neuropart_generator=debug,info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Build flags from crate names; `all` enables every known crate
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = CrateDebugFlags::default();
        for name in names {
            flags.enable(name.as_ref());
        }
        flags
    }

    /// Merge in the `NEUROPART_DEBUG` environment variable
    pub fn with_environment(mut self) -> Self {
        if let Ok(env_var) = env::var("NEUROPART_DEBUG") {
            for name in env_var.split(',') {
                self.enable(name);
            }
        }
        self
    }

    fn enable(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if name == "all" {
            self.enabled_crates
                .extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
        } else {
            self.enabled_crates.insert(name.to_string());
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Log level for a crate: DEBUG if flagged, INFO otherwise
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directives for these flags
    ///
    /// Tracing targets use the module path, so `neuropart-config` becomes
    /// `neuropart_config=debug`. `default_level` applies to everything else.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|name| format!("{}=debug", name.replace('-', "_")))
            .collect();
        filters.push(default_level.to_string());
        filters.join(",")
    }
}
