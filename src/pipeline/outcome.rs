//! Resolved pipeline types and the resolution outcome

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A transform plugin in the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginHandle {
    /// Module name (e.g. `tailwindcss`, `autoprefixer`)
    pub name: String,

    /// Options passed to the plugin factory
    pub options: serde_json::Value,
}

impl PluginHandle {
    /// Create a plugin handle with empty options
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Create a plugin handle with options
    pub fn with_options(name: impl Into<String>, options: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// The postcss core library that runs the plugins
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreLibrary {
    /// Module name
    pub name: String,

    /// Version reported by the installed package
    pub version: String,

    /// Where the package was found, if on disk
    pub location: Option<PathBuf>,
}

impl CoreLibrary {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            location: None,
        }
    }
}

/// A fully resolved pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    /// Core library handle
    pub core_library: CoreLibrary,

    /// Plugins in cascade order
    pub plugins: Vec<PluginHandle>,

    /// Processing options (parser, syntax, map, ...)
    pub options: serde_json::Map<String, serde_json::Value>,

    /// Packages (`author:name`) whose browser stylesheets bypass the pipeline
    pub excluded_packages: BTreeSet<String>,
}

impl PipelineConfig {
    /// Plugin names in cascade order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Classification of resolution failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveErrorKind {
    /// An optional module is absent; degrades to an empty pipeline
    MissingOptionalDependency,
    /// No project config exists; triggers the utility-only fallback
    NoConfigFound,
    /// The core library is absent while plugins are configured
    MissingRequiredLibrary,
    /// Loading the project config failed for any other reason
    ConfigDiscoveryFailure,
    /// The core library has an unsupported major version
    VersionIncompatibility,
}

impl ResolveErrorKind {
    /// Whether this kind ends resolution with a fatal outcome
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredLibrary | Self::ConfigDiscoveryFailure | Self::VersionIncompatibility
        )
    }
}

impl fmt::Display for ResolveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingOptionalDependency => "missing-optional-dependency",
            Self::NoConfigFound => "no-config-found",
            Self::MissingRequiredLibrary => "missing-required-library",
            Self::ConfigDiscoveryFailure => "config-discovery-failure",
            Self::VersionIncompatibility => "version-incompatibility",
        };
        write!(f, "{}", name)
    }
}

/// A classified resolution failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub message: String,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The core library could not be loaded
    pub fn missing_required_library(major: u64) -> Self {
        let message = [
            "The postcss npm package could not be found in your node_modules",
            "directory. Please run the following command to install it:",
            &format!("    npm install postcss@{}", major),
            "or disable postcss by removing the postcss config.",
        ]
        .join("\n");
        Self::new(ResolveErrorKind::MissingRequiredLibrary, message)
    }

    /// Config discovery failed for a reason other than "not found"
    pub fn discovery_failure(reason: impl fmt::Display) -> Self {
        Self::new(
            ResolveErrorKind::ConfigDiscoveryFailure,
            format!("Failed to load PostCSS config: {}", reason),
        )
    }

    /// The core library major version does not match
    pub fn version_incompatible(found: &str, expected: u64) -> Self {
        Self::new(
            ResolveErrorKind::VersionIncompatibility,
            format!(
                "postcss {} is not supported: expected major version {}",
                found, expected
            ),
        )
    }
}

/// Result of resolving the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// A pipeline with at least one plugin
    Success(PipelineConfig),
    /// No pipeline is configured; not an error
    Empty,
    /// Resolution failed and builds must stop
    Fatal(ResolveError),
}

impl ResolutionOutcome {
    /// The resolved config, if any
    pub fn config(&self) -> Option<&PipelineConfig> {
        match self {
            Self::Success(config) => Some(config),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The fatal error, if any
    pub fn error(&self) -> Option<&ResolveError> {
        match self {
            Self::Fatal(err) => Some(err),
            _ => None,
        }
    }

    /// Convert into a result; `Empty` becomes `Ok(None)`
    pub fn to_result(&self) -> Result<Option<&PipelineConfig>, ResolveError> {
        match self {
            Self::Success(config) => Ok(Some(config)),
            Self::Empty => Ok(None),
            Self::Fatal(err) => Err(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_message_has_install_instruction() {
        let err = ResolveError::missing_required_library(8);
        assert_eq!(err.kind, ResolveErrorKind::MissingRequiredLibrary);
        assert!(err.message.contains("npm install postcss@8"));
    }

    #[test]
    fn version_message_names_both_versions() {
        let err = ResolveError::version_incompatible("7.0.0", 8);
        assert!(err.message.contains("7.0.0"));
        assert!(err.message.contains('8'));
    }

    #[test]
    fn fatal_kinds() {
        assert!(ResolveErrorKind::MissingRequiredLibrary.is_fatal());
        assert!(ResolveErrorKind::VersionIncompatibility.is_fatal());
        assert!(!ResolveErrorKind::NoConfigFound.is_fatal());
        assert!(!ResolveErrorKind::MissingOptionalDependency.is_fatal());
    }

    #[test]
    fn outcome_to_result() {
        assert_eq!(ResolutionOutcome::Empty.to_result(), Ok(None));
        let fatal = ResolutionOutcome::Fatal(ResolveError::discovery_failure("boom"));
        assert!(fatal.to_result().is_err());
        assert!(fatal.config().is_none());
    }
}
