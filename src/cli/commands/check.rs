//! Check command - does the pipeline apply to a bundle file

use crate::cli::args::CheckArgs;
use crate::cli::commands::project_dir;
use crate::config::Config;
use crate::error::CsspipeResult;
use crate::pipeline::{applies_to_outcome, ConfigResolver, FileTarget, NodeProbe};
use console::style;
use std::sync::Arc;

/// Execute the check command
pub async fn execute(args: CheckArgs, config: &Config) -> CsspipeResult<()> {
    let project = project_dir(args.project)?;
    let resolver = ConfigResolver::with_settings(
        Arc::new(NodeProbe::new(&project)),
        config.pipeline.resolver_settings(),
    );

    let outcome = resolver.resolve().await;
    if let Some(err) = outcome.error() {
        return Err(err.clone().into());
    }

    let file = FileTarget::new(args.arch, args.path);
    if applies_to_outcome(&file, outcome) {
        println!("{} {}", style("applies").green(), file.path_in_bundle);
    } else {
        println!("{} {}", style("skipped").yellow(), file.path_in_bundle);
    }

    Ok(())
}
