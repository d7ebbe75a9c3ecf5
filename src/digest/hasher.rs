//! Content hashing with watch registration

use crate::error::{CsspipeError, CsspipeResult};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Returns a file's content hash and registers the file for change-watching
pub trait HashAndWatch {
    fn hash_and_watch(&self, path: &Path) -> CsspipeResult<String>;
}

impl<F> HashAndWatch for F
where
    F: Fn(&Path) -> CsspipeResult<String>,
{
    fn hash_and_watch(&self, path: &Path) -> CsspipeResult<String> {
        self(path)
    }
}

/// SHA256 file hasher that records every hashed path as watched
#[derive(Debug, Default)]
pub struct FileHasher {
    watched: Mutex<BTreeSet<PathBuf>>,
}

impl FileHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths registered so far, sorted
    pub fn watched(&self) -> Vec<PathBuf> {
        let watched = self.watched.lock().unwrap_or_else(|e| e.into_inner());
        watched.iter().cloned().collect()
    }
}

impl HashAndWatch for FileHasher {
    fn hash_and_watch(&self, path: &Path) -> CsspipeResult<String> {
        let contents = std::fs::read(path).map_err(|e| CsspipeError::hash(path, e.to_string()))?;

        self.watched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf());

        Ok(hex::encode(Sha256::digest(&contents)))
    }
}
