//! Probe backed by a Node project's `node_modules`
//!
//! Modules are "loadable" when their package directory exists under
//! `{project_dir}/node_modules`. Project config is read from the JSON
//! sources postcss-load-config accepts:
//! 1. the `postcss` key of `package.json`
//! 2. `.postcssrc`
//! 3. `.postcssrc.json`
//!
//! Script configs (`postcss.config.js` and friends) are detected but cannot
//! be evaluated here and are reported as discovery failures.

use crate::pipeline::outcome::{CoreLibrary, PluginHandle};
use crate::pipeline::probe::{ConfigDiscovery, DiscoveryError, PipelineProbe, ProjectConfig};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

const DISCOVERY_MODULE: &str = "postcss-load-config";
const UTILITY_MODULE: &str = "tailwindcss";
const CORE_MODULE: &str = "postcss";

/// Config files that need a JS runtime to evaluate
const SCRIPT_CONFIGS: &[&str] = &[
    ".postcssrc.js",
    ".postcssrc.cjs",
    ".postcssrc.mjs",
    ".postcssrc.ts",
    ".postcssrc.yaml",
    ".postcssrc.yml",
    "postcss.config.js",
    "postcss.config.cjs",
    "postcss.config.mjs",
    "postcss.config.ts",
];

/// Key listing packages whose stylesheets skip the pipeline
const EXCLUDED_PACKAGES_KEY: &str = "excludedMeteorPackages";

/// Probe for a Node project directory
#[derive(Debug, Clone)]
pub struct NodeProbe {
    project_dir: PathBuf,
}

impl NodeProbe {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    fn module_dir(&self, name: &str) -> PathBuf {
        module_dir(&self.project_dir, name)
    }
}

fn module_dir(project_dir: &Path, name: &str) -> PathBuf {
    let mut dir = project_dir.join("node_modules");
    for part in name.split('/') {
        dir.push(part);
    }
    dir
}

#[async_trait]
impl PipelineProbe for NodeProbe {
    async fn load_discovery(&self) -> Option<Arc<dyn ConfigDiscovery>> {
        if !self.module_dir(DISCOVERY_MODULE).is_dir() {
            debug!("{} not installed", DISCOVERY_MODULE);
            return None;
        }
        Some(Arc::new(JsonConfigDiscovery {
            project_dir: self.project_dir.clone(),
        }))
    }

    async fn load_utility_plugin(&self) -> Option<PluginHandle> {
        self.module_dir(UTILITY_MODULE)
            .is_dir()
            .then(|| PluginHandle::new(UTILITY_MODULE))
    }

    async fn load_core_library(&self) -> Option<CoreLibrary> {
        let dir = self.module_dir(CORE_MODULE);
        let manifest = dir.join("package.json");
        let content = fs::read_to_string(&manifest).await.ok()?;

        let version = match serde_json::from_str::<Value>(&content) {
            Ok(json) => json.get("version")?.as_str()?.to_string(),
            Err(e) => {
                warn!("Unreadable {}: {}", manifest.display(), e);
                return None;
            }
        };

        Some(CoreLibrary {
            name: CORE_MODULE.to_string(),
            version,
            location: Some(dir),
        })
    }
}

/// Discovery over JSON config sources in the project root
struct JsonConfigDiscovery {
    project_dir: PathBuf,
}

#[async_trait]
impl ConfigDiscovery for JsonConfigDiscovery {
    async fn load(&self, caller: &str) -> Result<ProjectConfig, DiscoveryError> {
        debug!("Searching PostCSS config for {} in {}", caller, self.project_dir.display());

        let package_json = self.project_dir.join("package.json");
        if let Some(json) = read_json(&package_json).await? {
            if let Some(section) = json.get("postcss") {
                return parse_config(section, &package_json, &self.project_dir);
            }
        }

        for name in [".postcssrc", ".postcssrc.json"] {
            let path = self.project_dir.join(name);
            if let Some(json) = read_json(&path).await? {
                return parse_config(&json, &path, &self.project_dir);
            }
        }

        if let Some(script) = SCRIPT_CONFIGS
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|path| path.is_file())
        {
            return Err(DiscoveryError::Failed(format!(
                "{} cannot be evaluated, use a JSON config instead",
                script.display()
            )));
        }

        Err(DiscoveryError::NoConfigFound {
            searched: self.project_dir.clone(),
        })
    }
}

/// Read and parse a JSON file; a missing file is `None`
async fn read_json(path: &Path) -> Result<Option<Value>, DiscoveryError> {
    let content = match fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DiscoveryError::Failed(format!(
                "reading {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| DiscoveryError::Failed(format!("{}: {}", path.display(), e)))
}

fn parse_config(
    json: &Value,
    source: &Path,
    project_dir: &Path,
) -> Result<ProjectConfig, DiscoveryError> {
    let fail = |reason: String| DiscoveryError::Failed(format!("{}: {}", source.display(), reason));

    let Some(table) = json.as_object() else {
        return Err(fail("config must be an object".to_string()));
    };

    let plugins = match table.get("plugins") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, options)| !matches!(options, Value::Bool(false)))
            .map(|(name, options)| PluginHandle::with_options(name.clone(), options.clone()))
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(plugin_from_entry)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| fail("plugins entries must be a name or [name, options]".to_string()))?,
        Some(_) => return Err(fail("plugins must be an object or an array".to_string())),
    };

    for plugin in &plugins {
        if !module_dir(project_dir, &plugin.name).is_dir() {
            return Err(fail(format!(
                "Loading PostCSS Plugin failed: Cannot find module '{}'",
                plugin.name
            )));
        }
    }

    let excluded_packages: BTreeSet<String> = match table.get(EXCLUDED_PACKAGES_KEY) {
        None => BTreeSet::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<_>>()
            .ok_or_else(|| fail(format!("{} must be a list of strings", EXCLUDED_PACKAGES_KEY)))?,
        Some(_) => return Err(fail(format!("{} must be a list", EXCLUDED_PACKAGES_KEY))),
    };

    let options: Map<String, Value> = table
        .iter()
        .filter(|(key, _)| key.as_str() != "plugins" && key.as_str() != EXCLUDED_PACKAGES_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(ProjectConfig {
        plugins,
        options,
        excluded_packages,
        source: Some(source.to_path_buf()),
    })
}

fn plugin_from_entry(entry: &Value) -> Option<PluginHandle> {
    match entry {
        Value::String(name) => Some(PluginHandle::new(name.clone())),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(name)] => Some(PluginHandle::new(name.clone())),
            [Value::String(name), options] => {
                Some(PluginHandle::with_options(name.clone(), options.clone()))
            }
            _ => None,
        },
        _ => None,
    }
}
