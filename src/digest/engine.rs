//! Digest computation
//!
//! Feed order into the SHA256 context:
//! 1. explicit files, in the order given, as `content_hash \0`
//! 2. per directory (sorted by path), depth-first: `abs_dir \0` on entry,
//!    then `content_hash \0` for each matched file
//!
//! Explicit file order is significant. Two dependency lists naming the same
//! files in a different order produce different digests.

use crate::digest::diagnostics::{self, DigestStats};
use crate::digest::fs::{DirLister, EntryKind, StdDirLister};
use crate::digest::hasher::HashAndWatch;
use crate::digest::Dependency;
use crate::error::{CsspipeError, CsspipeResult};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Pattern used for directory dependencies without a glob
pub const DEFAULT_GLOB: &str = "**";

/// Directory names the walk never enters
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".meteor"];

const SEPARATOR: &[u8] = b"\0";

/// Options for [`DigestEngine`]
#[derive(Debug, Clone)]
pub struct DigestOptions {
    /// Directory names skipped during the walk
    pub excluded_dirs: BTreeSet<String>,

    /// Sort directory entries by name before hashing. Off by default, so
    /// entries are fed in the order the platform lists them and digests can
    /// differ across filesystems.
    pub sort_entries: bool,

    /// Print the diagnostic block after each digest
    pub debug: bool,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            sort_entries: false,
            debug: diagnostics::env_flag_enabled(),
        }
    }
}

/// Computes dependency cache keys
#[derive(Debug, Clone, Default)]
pub struct DigestEngine<L = StdDirLister> {
    lister: L,
    options: DigestOptions,
}

impl DigestEngine<StdDirLister> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DigestOptions) -> Self {
        Self {
            lister: StdDirLister,
            options,
        }
    }
}

/// Per-call hashing state
struct DigestAccumulator {
    hasher: Sha256,
    stats: DigestStats,
    started: Instant,
}

impl DigestAccumulator {
    fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            stats: DigestStats::default(),
            started: Instant::now(),
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.hasher.update(SEPARATOR);
    }

    fn finish(mut self) -> (String, DigestStats) {
        self.stats.elapsed = self.started.elapsed();
        (hex::encode(self.hasher.finalize()), self.stats)
    }
}

impl<L: DirLister> DigestEngine<L> {
    /// Create an engine over a host-supplied directory lister
    pub fn with_lister(lister: L, options: DigestOptions) -> Self {
        Self { lister, options }
    }

    pub fn options(&self) -> &DigestOptions {
        &self.options
    }

    /// Compute the hex digest of `deps`
    pub fn digest<H>(&self, deps: &[Dependency], hasher: &H) -> CsspipeResult<String>
    where
        H: HashAndWatch + ?Sized,
    {
        let (digest, stats) = self.digest_with_stats(deps, hasher)?;
        stats.report(self.options.debug);
        Ok(digest)
    }

    /// Compute the digest and return the walk counters alongside it
    pub fn digest_with_stats<H>(
        &self,
        deps: &[Dependency],
        hasher: &H,
    ) -> CsspipeResult<(String, DigestStats)>
    where
        H: HashAndWatch + ?Sized,
    {
        let mut acc = DigestAccumulator::new();

        for dep in deps {
            match dep {
                Dependency::File { file } => {
                    acc.stats.file_count += 1;
                    let hash = hasher.hash_and_watch(file)?;
                    acc.feed(hash.as_bytes());
                }
                Dependency::DirGlob { dir, glob } => {
                    acc.stats
                        .globs_by_dir
                        .entry(dir.clone())
                        .or_default()
                        .push(effective_glob(glob.as_deref()).to_string());
                }
            }
        }

        let globs_by_dir: BTreeMap<PathBuf, Vec<String>> = acc.stats.globs_by_dir.clone();
        for (root, globs) in &globs_by_dir {
            let matcher = compile_globs(root, globs)?;
            debug!("Walking {} for {:?}", root.display(), globs);
            self.walk(&mut acc, root, Path::new(""), &matcher, hasher)?;
        }

        Ok(acc.finish())
    }

    fn walk<H>(
        &self,
        acc: &mut DigestAccumulator,
        root: &Path,
        rel_dir: &Path,
        matcher: &GlobSet,
        hasher: &H,
    ) -> CsspipeResult<()>
    where
        H: HashAndWatch + ?Sized,
    {
        let abs_dir = if rel_dir.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(rel_dir)
        };
        acc.feed(abs_dir.as_os_str().as_encoded_bytes());
        acc.stats.folder_count += 1;

        let mut entries = self.lister.read_dir_with_types(&abs_dir)?;
        if self.options.sort_entries {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }

        for entry in entries {
            let rel_path = rel_dir.join(&entry.name);
            match entry.kind {
                EntryKind::File if matcher.is_match(&rel_path) => {
                    acc.stats.file_count += 1;
                    let hash = hasher.hash_and_watch(&abs_dir.join(&entry.name))?;
                    acc.feed(hash.as_bytes());
                }
                EntryKind::Dir if !self.is_excluded(&entry.name) => {
                    self.walk(acc, root, &rel_path, matcher, hasher)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| self.options.excluded_dirs.contains(name))
    }
}

impl<L: DirLister + 'static> DigestEngine<L> {
    /// Compute the digest on the blocking pool
    pub async fn digest_async<H>(
        self: Arc<Self>,
        deps: Vec<Dependency>,
        hasher: Arc<H>,
    ) -> CsspipeResult<String>
    where
        H: HashAndWatch + Send + Sync + ?Sized + 'static,
    {
        tokio::task::spawn_blocking(move || self.digest(&deps, hasher.as_ref()))
            .await
            .map_err(|e| CsspipeError::DigestWorker(e.to_string()))?
    }
}

/// A missing or empty glob matches everything
fn effective_glob(glob: Option<&str>) -> &str {
    match glob {
        Some(glob) if !glob.is_empty() => glob,
        _ => DEFAULT_GLOB,
    }
}

/// Compile a directory's globs; `*` does not cross `/`
fn compile_globs(dir: &Path, globs: &[String]) -> CsspipeResult<GlobSet> {
    let invalid = |glob: &str, reason: String| CsspipeError::GlobInvalid {
        dir: dir.to_path_buf(),
        glob: glob.to_string(),
        reason,
    };

    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let compiled = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| invalid(glob, e.to_string()))?;
        builder.add(compiled);
    }
    builder
        .build()
        .map_err(|e| invalid(&globs.join(", "), e.to_string()))
}
