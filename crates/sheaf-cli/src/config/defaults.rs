use super::types::{BundleNamesConfig, Mode, OptimizerModulesConfig};
use std::path::PathBuf;

/// Config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "sheaf.config.json";

/// Prefix of configuration environment variables (`SHEAF_MODE`, ...).
pub const ENV_PREFIX: &str = "SHEAF_";

pub fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_build_dir() -> PathBuf {
    PathBuf::from("build/public")
}

pub fn default_mode() -> Mode {
    Mode::Production
}

pub fn default_fork() -> bool {
    true
}

/// CPU count minus one, but at least one.
pub fn default_max_workers() -> usize {
    sheaf_bundler::minify::default_max_workers().max(1)
}

pub fn default_node() -> PathBuf {
    PathBuf::from("node")
}

pub fn default_optimizer_modules() -> OptimizerModulesConfig {
    sheaf_bundler::OptimizerModules::default().into()
}

pub fn default_bundle_names() -> BundleNamesConfig {
    sheaf_bundler::BundleNames::default().into()
}
