//! Cache-key diagnostics
//!
//! Observational only: nothing here feeds back into the digest.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Environment flag that turns on the diagnostic block
pub const DEBUG_ENV_VAR: &str = "DEBUG_METEOR_POSTCSS_DEP_CACHE";

/// Shorter alias accepted alongside [`DEBUG_ENV_VAR`]
pub const DEBUG_ENV_VAR_ALIAS: &str = "DEBUG_POSTCSS_DEP_CACHE";

/// Whether either environment flag is set to `true`
pub fn env_flag_enabled() -> bool {
    [DEBUG_ENV_VAR, DEBUG_ENV_VAR_ALIAS]
        .iter()
        .any(|var| std::env::var(var).is_ok_and(|v| v == "true"))
}

/// Counters collected while computing one digest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestStats {
    /// Glob patterns grouped by directory
    pub globs_by_dir: BTreeMap<PathBuf, Vec<String>>,

    /// Files hashed, explicit and matched
    pub file_count: usize,

    /// Directories walked
    pub folder_count: usize,

    pub elapsed: Duration,
}

impl DigestStats {
    /// Render the free-form diagnostic block
    pub fn render(&self) -> String {
        let globs: BTreeMap<String, &Vec<String>> = self
            .globs_by_dir
            .iter()
            .map(|(dir, globs)| (dir.display().to_string(), globs))
            .collect();
        let globs = serde_json::to_string_pretty(&globs).unwrap_or_else(|_| format!("{:?}", globs));

        [
            "--- PostCSS Cache Info ---".to_string(),
            format!("Glob deps {}", globs),
            format!("File dep count {}", self.file_count),
            format!("Walked folders {}", self.folder_count),
            format!(
                "Created dep cache key in {:.3} ms",
                self.elapsed.as_secs_f64() * 1000.0
            ),
            "--------------------------".to_string(),
        ]
        .join("\n")
    }

    /// Log the counters, and print the block when `verbose`
    pub fn report(&self, verbose: bool) {
        debug!(
            files = self.file_count,
            folders = self.folder_count,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "Computed dependency cache key"
        );
        if verbose {
            eprintln!("{}", self.render());
        }
    }
}
