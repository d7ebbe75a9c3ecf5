//! Probe abstraction for optional modules and project config
//!
//! The host decides how modules are located. [`crate::pipeline::NodeProbe`]
//! looks in a project's `node_modules`; tests supply their own.

use crate::pipeline::outcome::{CoreLibrary, PluginHandle};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Project-level configuration loaded through discovery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    /// User-authored plugins in declaration order
    pub plugins: Vec<PluginHandle>,

    /// Processing options
    pub options: serde_json::Map<String, serde_json::Value>,

    /// Packages whose stylesheets skip the pipeline
    pub excluded_packages: BTreeSet<String>,

    /// File the config was read from
    pub source: Option<PathBuf>,
}

/// Why discovery could not produce a project config
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("No PostCSS Config found in: {searched}")]
    NoConfigFound { searched: PathBuf },

    #[error("{0}")]
    Failed(String),
}

/// A loaded config-discovery facility
#[async_trait]
pub trait ConfigDiscovery: Send + Sync {
    /// Load the project config on behalf of `caller`
    async fn load(&self, caller: &str) -> Result<ProjectConfig, DiscoveryError>;
}

/// Locates the modules a pipeline is assembled from
///
/// Every method answers "is this module loadable"; absence is `None`,
/// never an error.
#[async_trait]
pub trait PipelineProbe: Send + Sync {
    /// Load the config-discovery facility
    async fn load_discovery(&self) -> Option<Arc<dyn ConfigDiscovery>>;

    /// Load the utility-class generator plugin
    async fn load_utility_plugin(&self) -> Option<PluginHandle>;

    /// Load the core transform library
    async fn load_core_library(&self) -> Option<CoreLibrary>;
}
