//! Memoized pipeline resolution
//!
//! A [`ConfigResolver`] runs the probe cascade at most once. Concurrent
//! callers that arrive before the first resolution completes wait on the
//! same in-flight probe; later callers read the stored outcome directly.

use crate::pipeline::outcome::{PipelineConfig, ResolutionOutcome, ResolveError};
use crate::pipeline::probe::{DiscoveryError, PipelineProbe};
use semver::Version;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Major version of postcss the pipeline is built against
pub const SUPPORTED_MAJOR: u64 = 8;

/// Marker passed to config discovery to identify the calling build tool
pub const DEFAULT_CALLER: &str = "meteor";

/// Knobs for the resolution cascade
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Pinned core library major version
    pub supported_major: u64,

    /// Caller marker handed to discovery
    pub caller: String,

    /// Excluded packages added on top of the project config's list
    pub excluded_packages: BTreeSet<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            supported_major: SUPPORTED_MAJOR,
            caller: DEFAULT_CALLER.to_string(),
            excluded_packages: BTreeSet::new(),
        }
    }
}

/// Write-once resolver for the active pipeline
pub struct ConfigResolver {
    probe: Arc<dyn PipelineProbe>,
    settings: ResolverSettings,
    cell: OnceCell<ResolutionOutcome>,
}

impl ConfigResolver {
    /// Create a resolver with default settings
    pub fn new(probe: Arc<dyn PipelineProbe>) -> Self {
        Self::with_settings(probe, ResolverSettings::default())
    }

    pub fn with_settings(probe: Arc<dyn PipelineProbe>, settings: ResolverSettings) -> Self {
        Self {
            probe,
            settings,
            cell: OnceCell::new(),
        }
    }

    /// Resolve the pipeline, probing only on the first call
    pub async fn resolve(&self) -> &ResolutionOutcome {
        self.cell.get_or_init(|| self.run_cascade()).await
    }

    /// The stored outcome, if resolution has completed
    pub fn get(&self) -> Option<&ResolutionOutcome> {
        self.cell.get()
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    async fn run_cascade(&self) -> ResolutionOutcome {
        let outcome = self.probe_pipeline().await;
        match &outcome {
            ResolutionOutcome::Success(config) => {
                info!("PostCSS pipeline: {}", config.plugin_names().join(", "))
            }
            ResolutionOutcome::Empty => debug!("No PostCSS pipeline configured"),
            ResolutionOutcome::Fatal(err) => warn!("PostCSS pipeline failed ({}): {}", err.kind, err),
        }
        outcome
    }

    async fn probe_pipeline(&self) -> ResolutionOutcome {
        let Some(discovery) = self.probe.load_discovery().await else {
            debug!("Config discovery unavailable");
            return ResolutionOutcome::Empty;
        };

        let loaded = discovery.load(&self.settings.caller).await;

        let mut plugins = Vec::new();
        if let Some(utility) = self.probe.load_utility_plugin().await {
            debug!("Utility plugin found: {}", utility.name);
            plugins.push(utility);
        }

        let mut options = serde_json::Map::new();
        let mut excluded_packages = self.settings.excluded_packages.clone();

        match loaded {
            Ok(project) => {
                if let Some(ref source) = project.source {
                    debug!("Loaded PostCSS config from {}", source.display());
                }
                plugins.extend(project.plugins);
                options = project.options;
                excluded_packages.extend(project.excluded_packages);
            }
            Err(DiscoveryError::NoConfigFound { searched }) => {
                if plugins.is_empty() {
                    debug!("No PostCSS config in {} and no utility plugin", searched.display());
                    return ResolutionOutcome::Empty;
                }
                debug!("No PostCSS config in {}, using utility plugin only", searched.display());
            }
            Err(DiscoveryError::Failed(reason)) => {
                return ResolutionOutcome::Fatal(ResolveError::discovery_failure(reason));
            }
        }

        if plugins.is_empty() {
            return ResolutionOutcome::Empty;
        }

        let major = self.settings.supported_major;
        let Some(core_library) = self.probe.load_core_library().await else {
            return ResolutionOutcome::Fatal(ResolveError::missing_required_library(major));
        };

        if let Err(err) = check_major(&core_library.version, major) {
            return ResolutionOutcome::Fatal(err);
        }

        ResolutionOutcome::Success(PipelineConfig {
            core_library,
            plugins,
            options,
            excluded_packages,
        })
    }
}

/// Check that `found` is a semver version with major `expected`
fn check_major(found: &str, expected: u64) -> Result<(), ResolveError> {
    match Version::parse(found.trim()) {
        Ok(version) if version.major == expected => Ok(()),
        _ => Err(ResolveError::version_incompatible(found, expected)),
    }
}
