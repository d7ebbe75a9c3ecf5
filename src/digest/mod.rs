//! Dependency cache keys
//!
//! Turns a set of build dependencies into a hex digest the host compares
//! against a stored key to decide whether a previous output is reusable.
//!
//! # Dependency kinds
//!
//! | Kind | Contributes |
//! |------|-------------|
//! | `File` | content hash of one file |
//! | `DirGlob` | every directory path walked, plus content hashes of matched files |
//!
//! Directories named in [`DigestOptions::excluded_dirs`] (by default
//! `node_modules` and `.meteor`) are never entered.

pub mod diagnostics;
mod engine;
pub mod fs;
mod hasher;

pub use diagnostics::{DigestStats, DEBUG_ENV_VAR};
pub use engine::{DigestEngine, DigestOptions, DEFAULT_EXCLUDED_DIRS, DEFAULT_GLOB};
pub use fs::{DirEntryInfo, DirLister, EntryKind, StdDirLister};
pub use hasher::{FileHasher, HashAndWatch};

use crate::error::{CsspipeError, CsspipeResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// A unit whose change invalidates a cached build output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Dependency {
    /// A single file
    #[serde(rename = "dependency")]
    File { file: PathBuf },

    /// Every file under `dir` matching `glob` (all files when unset)
    #[serde(rename = "dir-dependency")]
    DirGlob {
        dir: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        glob: Option<String>,
    },
}

impl Dependency {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { file: path.into() }
    }

    pub fn dir(dir: impl Into<PathBuf>) -> Self {
        Self::DirGlob {
            dir: dir.into(),
            glob: None,
        }
    }

    pub fn dir_glob(dir: impl Into<PathBuf>, glob: impl Into<String>) -> Self {
        Self::DirGlob {
            dir: dir.into(),
            glob: Some(glob.into()),
        }
    }

    /// Parse a JSON array of dependency messages
    pub fn parse_list(json: &str) -> CsspipeResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parses `DIR` or `DIR=GLOB` into a directory dependency
impl FromStr for Dependency {
    type Err = CsspipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dir, glob) = match s.split_once('=') {
            Some((dir, glob)) => (dir, Some(glob)),
            None => (s, None),
        };

        if dir.is_empty() {
            return Err(CsspipeError::DependencySpec {
                spec: s.to_string(),
                reason: "directory must not be empty".to_string(),
            });
        }

        Ok(match glob {
            Some(glob) if !glob.is_empty() => Self::dir_glob(dir, glob),
            _ => Self::dir(dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dependency_messages() {
        let deps = Dependency::parse_list(
            r#"[
                {"type": "dependency", "file": "/app/tailwind.config.js"},
                {"type": "dir-dependency", "dir": "/app/client", "glob": "**/*.html"},
                {"type": "dir-dependency", "dir": "/app/imports"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            deps,
            vec![
                Dependency::file("/app/tailwind.config.js"),
                Dependency::dir_glob("/app/client", "**/*.html"),
                Dependency::dir("/app/imports"),
            ]
        );
    }

    #[test]
    fn parse_unknown_type_fails() {
        assert!(Dependency::parse_list(r#"[{"type": "asset", "file": "x"}]"#).is_err());
    }

    #[test]
    fn dir_spec_from_str() {
        assert_eq!(
            "imports=**/*.jsx".parse::<Dependency>().unwrap(),
            Dependency::dir_glob("imports", "**/*.jsx")
        );
        assert_eq!("imports".parse::<Dependency>().unwrap(), Dependency::dir("imports"));
        assert_eq!("imports=".parse::<Dependency>().unwrap(), Dependency::dir("imports"));
        assert!("=**".parse::<Dependency>().is_err());
    }
}
