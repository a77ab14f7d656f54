use super::defaults::*;
use super::types::*;
use super::SheafConfig;
use crate::cli::ProjectArgs;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variables read after the prefix is stripped.
const ENV_KEYS: &[&str] = &[
    "root",
    "build_dir",
    "mode",
    "fork",
    "max_workers",
    "plugin_registry",
];

/// Flags that override every other source. Unset flags are not serialized,
/// so they leave file and environment values alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
}

impl SheafConfig {
    /// Load configuration from multiple sources, relative to the working
    /// directory.
    /// Priority: CLI args > environment variables > config file > defaults
    pub fn load(args: &ProjectArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(args, &cwd)
    }

    /// Load configuration with relative paths resolved against `cwd`.
    pub fn load_from(args: &ProjectArgs, cwd: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = locate_config_file(args, cwd)? {
            tracing::debug!(path = %path.display(), "Loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment
            .merge(env_provider())
            .merge(Serialized::defaults(CliOverrides::from(args)));

        let mut config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: format!("Check {} syntax, field types and {}* variables", CONFIG_FILE_NAME, ENV_PREFIX),
        })?;

        if config.root.is_relative() {
            config.root = cwd.join(&config.root);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get default configuration values.
    pub(crate) fn default_config() -> Self {
        Self {
            root: default_root(),
            build_dir: default_build_dir(),
            mode: default_mode(),
            fork: default_fork(),
            max_workers: default_max_workers(),
            worker_command: None,
            optimizer: OptimizerConfig::default(),
            plugin_registry: None,
            scripts: None,
            bundle_names: default_bundle_names(),
        }
    }
}

/// `--config` if given (it must exist), else `sheaf.config.json` in the root
/// named by `--root` or in `cwd`, if present.
fn locate_config_file(args: &ProjectArgs, cwd: &Path) -> Result<Option<PathBuf>> {
    if let Some(explicit) = &args.config {
        let path = cwd.join(explicit);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path).into());
        }
        return Ok(Some(path));
    }

    let root = args
        .root
        .as_ref()
        .map(|root| cwd.join(root))
        .unwrap_or_else(|| cwd.to_path_buf());
    let candidate = root.join(CONFIG_FILE_NAME);
    Ok(candidate.is_file().then_some(candidate))
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .only(ENV_KEYS)
        .map(|key| env_key_to_field(key.as_str()).into())
        .lowercase(false)
}

/// `BUILD_DIR` -> `buildDir`
pub(crate) fn env_key_to_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !field.is_empty();
        } else if upper_next {
            field.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            field.push(c.to_ascii_lowercase());
        }
    }
    field
}
