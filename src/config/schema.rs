//! Configuration schema for csspipe
//!
//! Global configuration lives at `~/.config/csspipe/config.toml`; a project
//! may override any key in a local `csspipe.toml`.

use crate::digest::{DigestOptions, DEFAULT_EXCLUDED_DIRS};
use crate::pipeline::{ResolverSettings, DEFAULT_CALLER, SUPPORTED_MAJOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline resolution settings
    pub pipeline: PipelineSection,

    /// Dependency cache key settings
    pub digest: DigestSection,
}

/// Pipeline resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Required postcss major version
    pub supported_major: u64,

    /// Caller marker handed to config discovery
    pub caller: String,

    /// Packages (`author:name`) whose browser stylesheets skip the pipeline
    pub excluded_packages: Vec<String>,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            supported_major: SUPPORTED_MAJOR,
            caller: DEFAULT_CALLER.to_string(),
            excluded_packages: Vec::new(),
        }
    }
}

impl PipelineSection {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            supported_major: self.supported_major,
            caller: self.caller.clone(),
            excluded_packages: self.excluded_packages.iter().cloned().collect(),
        }
    }
}

/// Dependency cache key settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestSection {
    /// Directory names never walked
    pub excluded_dirs: Vec<String>,

    /// Sort directory entries before hashing instead of using listing order
    pub sort_entries: bool,

    /// Always print cache diagnostics
    pub debug: bool,
}

impl Default for DigestSection {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            sort_entries: false,
            debug: false,
        }
    }
}

impl DigestSection {
    /// Engine options; the environment flag can only turn debug on
    pub fn digest_options(&self) -> DigestOptions {
        let defaults = DigestOptions::default();
        DigestOptions {
            excluded_dirs: self.excluded_dirs.iter().cloned().collect::<BTreeSet<_>>(),
            sort_entries: self.sort_entries,
            debug: self.debug || defaults.debug,
        }
    }
}
