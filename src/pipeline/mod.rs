//! PostCSS pipeline resolution
//!
//! Decides which transform pipeline applies to a build:
//! - [`ConfigResolver`] probes for a project config, the tailwind utility
//!   plugin and the postcss core library, once per resolver
//! - [`filter::applies`] decides per file whether the resolved pipeline runs
//!
//! # Resolution cascade
//!
//! | Discovery | Project config | Utility plugin | Outcome |
//! |-----------|----------------|----------------|---------|
//! | missing | - | - | Empty |
//! | ok | not found | missing | Empty |
//! | ok | not found | found | `[utility]` |
//! | ok | `[p1, p2]` | found | `[utility, p1, p2]` |
//! | ok | failed | - | Fatal |
//!
//! Any non-empty plugin list additionally requires the core library at the
//! pinned major version.

pub mod filter;
pub mod node;
mod outcome;
mod probe;
mod resolver;

pub use filter::{applies, applies_to_outcome, BuildFile, FileTarget};
pub use node::NodeProbe;
pub use outcome::{
    CoreLibrary, PipelineConfig, PluginHandle, ResolutionOutcome, ResolveError, ResolveErrorKind,
};
pub use probe::{ConfigDiscovery, DiscoveryError, PipelineProbe, ProjectConfig};
pub use resolver::{ConfigResolver, ResolverSettings, DEFAULT_CALLER, SUPPORTED_MAJOR};
