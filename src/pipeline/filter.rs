//! Per-file pipeline filter
//!
//! Keeps a project's custom pipeline off stylesheets that dependency
//! packages ship already processed.

use crate::pipeline::outcome::{PipelineConfig, ResolutionOutcome};

/// Architecture prefix of browser bundles (`web.browser`, `web.browser.legacy`, ...)
const BROWSER_ARCH_PREFIX: &str = "web.browser";

/// Bundle path prefix of files that come from packages
const PACKAGE_PATH_PREFIX: &str = "packages/";

/// A file the host is about to transform
pub trait BuildFile {
    /// Target architecture tag
    fn arch(&self) -> &str;

    /// Path of the file inside the output bundle
    fn path_in_bundle(&self) -> &str;
}

/// Owned [`BuildFile`] for callers without their own file type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub arch: String,
    pub path_in_bundle: String,
}

impl FileTarget {
    pub fn new(arch: impl Into<String>, path_in_bundle: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            path_in_bundle: path_in_bundle.into(),
        }
    }
}

impl BuildFile for FileTarget {
    fn arch(&self) -> &str {
        &self.arch
    }

    fn path_in_bundle(&self) -> &str {
        &self.path_in_bundle
    }
}

/// Whether the pipeline should run on `file`
pub fn applies(file: &impl BuildFile, config: &PipelineConfig) -> bool {
    if config.plugins.is_empty() {
        return false;
    }

    if !file.arch().starts_with(BROWSER_ARCH_PREFIX) {
        return true;
    }

    match package_name(file.path_in_bundle()) {
        Some(name) => !config.excluded_packages.contains(&name),
        None => true,
    }
}

/// Like [`applies`], but false for anything other than a successful resolution
pub fn applies_to_outcome(file: &impl BuildFile, outcome: &ResolutionOutcome) -> bool {
    outcome.config().is_some_and(|config| applies(file, config))
}

/// Package name of a bundle path under `packages/`, with the
/// `author_name` directory form mapped back to `author:name`
fn package_name(path: &str) -> Option<String> {
    if !path.starts_with(PACKAGE_PATH_PREFIX) {
        return None;
    }
    path.split('/')
        .nth(1)
        .map(|segment| segment.replacen('_', ":", 1))
}
