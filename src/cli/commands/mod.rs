//! CLI command implementations

pub mod check;
pub mod config;
pub mod digest;
pub mod resolve;

pub use check::execute as check;
pub use config::execute as config;
pub use digest::execute as digest;
pub use resolve::execute as resolve;

use crate::error::{CsspipeError, CsspipeResult};
use std::path::PathBuf;

/// The given project directory, or the current directory
pub(crate) fn project_dir(project: Option<PathBuf>) -> CsspipeResult<PathBuf> {
    match project {
        Some(p) => p
            .canonicalize()
            .map_err(|e| CsspipeError::io(format!("opening project directory {}", p.display()), e)),
        None => std::env::current_dir().map_err(|e| CsspipeError::io("getting current directory", e)),
    }
}
