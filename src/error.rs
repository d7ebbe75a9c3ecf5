//! Error types for csspipe
//!
//! All modules use `CsspipeResult<T>` as their return type. Pipeline
//! resolution failures are carried by [`ResolveError`] so they can be
//! memoized, and convert into [`CsspipeError::Resolve`] at the edges.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::{ResolveError, ResolveErrorKind};

/// Result type alias for csspipe operations
pub type CsspipeResult<T> = Result<T, CsspipeError>;

/// All errors that can occur in csspipe
#[derive(Error, Debug)]
pub enum CsspipeError {
    // Pipeline errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    // Digest errors
    #[error("Invalid glob pattern '{glob}' for {dir}: {reason}")]
    GlobInvalid {
        dir: PathBuf,
        glob: String,
        reason: String,
    },

    #[error("Failed to hash {path}: {reason}")]
    Hash { path: PathBuf, reason: String },

    #[error("Digest worker failed: {0}")]
    DigestWorker(String),

    #[error("Invalid dependency spec '{spec}': {reason}")]
    DependencySpec { spec: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl CsspipeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a hashing error for a path
    pub fn hash(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Hash {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Resolve(err) => match err.kind {
                ResolveErrorKind::MissingRequiredLibrary => {
                    Some("Install the postcss version named above with npm")
                }
                ResolveErrorKind::VersionIncompatibility => {
                    Some("Install a supported postcss major or set pipeline.supported_major")
                }
                ResolveErrorKind::ConfigDiscoveryFailure => {
                    Some("Check your .postcssrc or the \"postcss\" key in package.json")
                }
                _ => None,
            },
            Self::GlobInvalid { .. } => Some("Globs use globset syntax, e.g. **/*.css"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CsspipeError::GlobInvalid {
            dir: PathBuf::from("/app/styles"),
            glob: "[".to_string(),
            reason: "unclosed class".to_string(),
        };
        assert!(err.to_string().contains("Invalid glob pattern '['"));
    }

    #[test]
    fn resolve_error_is_transparent() {
        let err: CsspipeError = ResolveError::missing_required_library(8).into();
        assert!(err.to_string().contains("postcss npm package could not be found"));
        assert!(err.to_string().contains("npm install postcss@8"));
        assert!(!err.hint().unwrap().contains('8'));
    }

    #[test]
    fn missing_library_hint_defers_to_message() {
        let err: CsspipeError = ResolveError::missing_required_library(9).into();
        assert!(err.to_string().contains("npm install postcss@9"));
        assert!(!err.hint().unwrap().contains("postcss@"));
    }

    #[test]
    fn io_has_no_hint() {
        let err = CsspipeError::io(
            "reading dir",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.hint().is_none());
        assert_eq!(err.to_string(), "IO error: reading dir");
    }
}
