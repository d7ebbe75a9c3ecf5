//! Digest command - compute the dependency cache key

use crate::cli::args::DigestArgs;
use crate::config::Config;
use crate::digest::{Dependency, DigestEngine, FileHasher};
use crate::error::{CsspipeError, CsspipeResult};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Execute the digest command
pub async fn execute(args: DigestArgs, config: &Config) -> CsspipeResult<()> {
    let deps = collect_dependencies(&args).await?;
    if deps.is_empty() {
        return Err(CsspipeError::User(
            "No dependencies given. Use --file, --dir or --deps-json".to_string(),
        ));
    }
    debug!("Computing cache key over {} dependencies", deps.len());

    let mut options = config.digest.digest_options();
    options.debug |= args.debug;

    let engine = Arc::new(DigestEngine::with_options(options));
    let digest = engine.digest_async(deps, Arc::new(FileHasher::new())).await?;

    println!("{}", digest);
    Ok(())
}

/// Dependencies in input order: JSON messages, then files, then directories
async fn collect_dependencies(args: &DigestArgs) -> CsspipeResult<Vec<Dependency>> {
    let mut deps = Vec::new();

    if let Some(ref path) = args.deps_json {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CsspipeError::io(format!("reading {}", path.display()), e))?;
        deps.extend(Dependency::parse_list(&content)?);
    }

    deps.extend(args.files.iter().map(Dependency::file));
    deps.extend(args.dirs.iter().cloned());
    Ok(deps)
}
