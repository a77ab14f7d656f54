//! Serializable mirrors of the bundler's configuration types.
//!
//! These carry the `JsonSchema` derive and the config file's field names;
//! `conversions` maps them onto the library types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::cli::Mode;

use super::defaults::{default_node, default_optimizer_modules};

/// A program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkerCommandConfig {
    pub program: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// AMD optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Node binary used to run the optimizer
    #[serde(default = "default_node")]
    pub node: PathBuf,

    /// Optimizer script (default: node_modules/requirejs/bin/r.js)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,

    /// Entry modules per target
    #[serde(default = "default_optimizer_modules")]
    pub modules: OptimizerModulesConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            script: None,
            modules: default_optimizer_modules(),
        }
    }
}

/// Optimizer entry modules: `shared` runs for both targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptimizerModulesConfig {
    #[serde(default)]
    pub shared: Vec<OptimizerModuleConfig>,
    #[serde(default)]
    pub client: Vec<OptimizerModuleConfig>,
    #[serde(default)]
    pub admin: Vec<OptimizerModuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptimizerModuleConfig {
    /// Module lookup root, relative to the project root
    pub base_url: PathBuf,
    /// Entry module name
    pub name: String,
}

/// Ordered script lists and the vendor module table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Scripts at the head of both bundles, in load order
    #[serde(default)]
    pub base: Vec<PathBuf>,
    /// Appended to the client bundle in production
    #[serde(default)]
    pub client: Vec<PathBuf>,
    /// Appended to the admin bundle
    #[serde(default)]
    pub admin: Vec<PathBuf>,
    /// Vendor files or directories exposed as named modules
    #[serde(default)]
    pub modules: Vec<VendorModuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VendorModuleConfig {
    /// Name the module is registered under, relative to the modules root
    pub registered_name: String,
    /// Project-relative file or directory
    pub source_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BundleNamesConfig {
    pub client: String,
    pub admin: String,
}
