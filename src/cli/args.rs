//! CLI argument definitions using clap derive

use crate::digest::Dependency;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// csspipe - PostCSS pipeline resolution and dependency cache keys
///
/// Resolves which PostCSS plugins a CSS build runs and computes the cache
/// key that tells a build host when stylesheets need reprocessing.
#[derive(Parser, Debug)]
#[command(name = "csspipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CSSPIPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local csspipe.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the PostCSS pipeline for a project
    Resolve(ResolveArgs),

    /// Compute the dependency cache key
    Digest(DigestArgs),

    /// Check whether the pipeline applies to a bundle file
    Check(CheckArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the digest command
#[derive(Parser, Debug)]
pub struct DigestArgs {
    /// File dependency (repeatable, hashed in the order given)
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,

    /// Directory dependency as DIR or DIR=GLOB (repeatable)
    #[arg(long = "dir")]
    pub dirs: Vec<Dependency>,

    /// JSON file with dependency messages
    #[arg(long)]
    pub deps_json: Option<PathBuf>,

    /// Print cache diagnostics
    #[arg(long)]
    pub debug: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Target architecture (e.g. web.browser, os.linux.x86_64)
    #[arg(long)]
    pub arch: String,

    /// Path of the file inside the bundle
    #[arg(long)]
    pub path: String,

    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for resolve
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one plugin per line)
    Plain,
}
