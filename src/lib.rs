//! csspipe - PostCSS pipeline resolution and dependency cache keys
//!
//! Decision logic for a build-time CSS transform plugin: which PostCSS
//! pipeline a build runs, whether it applies to a given file, and the
//! cache key that says when stylesheets need reprocessing.

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod pipeline;

pub use error::{CsspipeError, CsspipeResult};
