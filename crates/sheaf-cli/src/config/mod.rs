//! Configuration for the sheaf CLI with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and config files.
//! Priority: CLI > Environment (`SHEAF_*`) > `sheaf.config.json` > Defaults

mod conversions;
mod defaults;
mod loading;
mod types;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use defaults::*;
pub use loading::CliOverrides;
pub use types::*;

/// Sheaf configuration, loaded from `sheaf.config.json`, `SHEAF_*` and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SheafConfig {
    /// Project root. Relative paths resolve against the working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Build output directory, relative to the root
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Build mode (development, production)
    #[serde(default = "default_mode")]
    pub mode: Mode,

    /// Minify in worker processes
    #[serde(default = "default_fork")]
    pub fork: bool,

    /// Maximum number of concurrently busy minify workers
    #[schemars(range(min = 1))]
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Program and arguments that start a minify worker.
    /// Defaults to the running `sheaf` binary with `minify-worker`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_command: Option<WorkerCommandConfig>,

    /// AMD optimizer settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// JSON file describing plugin scripts and static directories.
    /// Without it no plugins contribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_registry: Option<PathBuf>,

    /// Script manifest. Defaults to the forum's built-in lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<ScriptsConfig>,

    /// Output file names of the two bundles
    #[serde(default = "default_bundle_names")]
    pub bundle_names: BundleNamesConfig,
}

impl SheafConfig {
    /// Generate the JSON Schema for `sheaf.config.json`.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(SheafConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }

    /// Generate example `sheaf.config.json` content.
    pub fn example_config() -> crate::Result<String> {
        let example = Self {
            root: PathBuf::from("."),
            build_dir: PathBuf::from("build/public"),
            mode: Mode::Production,
            fork: true,
            max_workers: 3,
            worker_command: None,
            optimizer: OptimizerConfig::default(),
            plugin_registry: Some(PathBuf::from("build/plugins.json")),
            scripts: Some(ScriptsConfig {
                base: vec![
                    PathBuf::from("node_modules/jquery/dist/jquery.js"),
                    PathBuf::from("public/src/app.js"),
                ],
                client: vec![PathBuf::from("public/src/client/topic.js")],
                admin: vec![PathBuf::from("public/src/admin/admin.js")],
                modules: vec![VendorModuleConfig {
                    registered_name: "Chart.js".to_string(),
                    source_path: PathBuf::from("node_modules/chart.js/dist/Chart.min.js"),
                }],
            }),
            bundle_names: default_bundle_names(),
        };
        Ok(serde_json::to_string_pretty(&example)?)
    }
}

impl Default for SheafConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
