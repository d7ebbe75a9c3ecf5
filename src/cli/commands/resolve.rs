//! Resolve command - show the PostCSS pipeline for a project

use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::cli::commands::project_dir;
use crate::config::Config;
use crate::error::CsspipeResult;
use crate::pipeline::{ConfigResolver, NodeProbe, PipelineConfig, ResolutionOutcome};
use console::style;
use std::sync::Arc;
use tracing::debug;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> CsspipeResult<()> {
    let project = project_dir(args.project)?;
    debug!("Resolving pipeline in {}", project.display());

    let resolver = ConfigResolver::with_settings(
        Arc::new(NodeProbe::new(&project)),
        config.pipeline.resolver_settings(),
    );

    match resolver.resolve().await {
        ResolutionOutcome::Success(pipeline) => match args.format {
            OutputFormat::Table => print_table(pipeline),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(pipeline)?),
            OutputFormat::Plain => {
                for name in pipeline.plugin_names() {
                    println!("{}", name);
                }
            }
        },
        ResolutionOutcome::Empty => match args.format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("{}", style("No PostCSS pipeline configured").dim()),
        },
        ResolutionOutcome::Fatal(err) => return Err(err.clone().into()),
    }

    Ok(())
}

fn print_table(pipeline: &PipelineConfig) {
    println!(
        "{} {} {}",
        style("Core:").bold(),
        pipeline.core_library.name,
        style(&pipeline.core_library.version).dim()
    );
    println!();

    println!("{:<4} {:<30}", style("#").bold(), style("PLUGIN").bold());
    println!("{}", "-".repeat(35));
    for (index, plugin) in pipeline.plugins.iter().enumerate() {
        println!("{:<4} {:<30}", index + 1, plugin.name);
    }

    if !pipeline.excluded_packages.is_empty() {
        println!();
        println!("{}", style("Excluded packages:").bold());
        for name in &pipeline.excluded_packages {
            println!("  {}", name);
        }
    }
}
