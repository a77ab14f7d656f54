//! Bridge to the external AMD module optimizer.
//!
//! A handful of vendor libraries ship as AMD modules and cannot simply be
//! concatenated. For each build target the optimizer is run once per entry
//! module, strictly in sequence, with every run appending to one text buffer.
//! The buffer is written to `<buildDir>/rjs-bundle-<target>.js`, which the
//! bundle composer always places last.

use crate::layout::ProjectLayout;
use crate::runtime::Runtime;
use crate::target::BuildTarget;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Modules every optimizer run treats as provided by the page.
pub const EXTERNAL_MODULES: &[&str] = &["jquery"];

/// One optimizer entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerModule {
    /// Module lookup root, relative to the project root.
    pub base_url: PathBuf,
    /// Entry module name, relative to `base_url`.
    pub name: String,
}

impl OptimizerModule {
    pub fn new(base_url: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            name: name.into(),
        }
    }
}

/// Entry points per target: `shared` runs for both, then the target's extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerModules {
    pub shared: Vec<OptimizerModule>,
    pub client: Vec<OptimizerModule>,
    pub admin: Vec<OptimizerModule>,
}

impl OptimizerModules {
    /// Entry points for `target`, in run order.
    pub fn for_target(&self, target: BuildTarget) -> impl Iterator<Item = &OptimizerModule> {
        let extra = match target {
            BuildTarget::Client => &self.client,
            BuildTarget::Admin => &self.admin,
        };
        self.shared.iter().chain(extra.iter())
    }
}

impl Default for OptimizerModules {
    fn default() -> Self {
        Self {
            shared: vec![
                OptimizerModule::new("node_modules", "timeago/jquery.timeago"),
                OptimizerModule::new("node_modules/nprogress", "nprogress"),
                OptimizerModule::new("node_modules/bootbox", "bootbox"),
            ],
            client: Vec::new(),
            admin: vec![OptimizerModule::new("node_modules/sortablejs", "Sortable")],
        }
    }
}

/// Configuration for a single optimizer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeConfig {
    /// Absolute module lookup root.
    pub base_url: PathBuf,
    pub name: String,
    /// Module names resolved to an empty stub instead of being inlined.
    pub externals: Vec<String>,
}

/// An AMD module optimizer.
///
/// Implementations append their output to `out`. Taking the buffer by
/// exclusive reference means two runs can never write into it at once.
#[async_trait]
pub trait ModuleOptimizer: Send + Sync + std::fmt::Debug {
    async fn optimize(&self, config: &OptimizeConfig, out: &mut String) -> Result<()>;
}

/// Runs `r.js` under node, one process per entry module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireJsOptimizer {
    node: PathBuf,
    script: PathBuf,
}

impl RequireJsOptimizer {
    pub fn new(node: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            script: script.into(),
        }
    }

    /// `node` from `PATH` and the project's `node_modules/requirejs/bin/r.js`.
    pub fn for_project(layout: &ProjectLayout) -> Self {
        Self::new("node", layout.resolve("node_modules/requirejs/bin/r.js"))
    }

    /// Use another node binary.
    pub fn with_node(mut self, node: impl Into<PathBuf>) -> Self {
        self.node = node.into();
        self
    }

    fn arguments(&self, config: &OptimizeConfig) -> Vec<String> {
        let mut args = vec![
            self.script.to_string_lossy().into_owned(),
            "-o".to_string(),
            format!("baseUrl={}", config.base_url.to_string_lossy()),
            format!("name={}", config.name),
            "optimize=none".to_string(),
            "out=stdout".to_string(),
            "logLevel=4".to_string(),
        ];
        args.extend(
            config
                .externals
                .iter()
                .map(|module| format!("paths.{}=empty:", module)),
        );
        args
    }
}

#[async_trait]
impl ModuleOptimizer for RequireJsOptimizer {
    async fn optimize(&self, config: &OptimizeConfig, out: &mut String) -> Result<()> {
        let failed = |message: String| Error::Optimizer {
            module: config.name.clone(),
            message,
        };

        let output = Command::new(&self.node)
            .args(self.arguments(config))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| failed(format!("failed to start {}: {}", self.node.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(failed(format!(
                "exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                detail
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| failed(format!("output is not UTF-8: {}", e)))?;
        out.push_str(&text);
        Ok(())
    }
}

/// Run every entry point of `target` in order and write the artifact.
///
/// Returns the artifact path. Stops at the first failing module.
pub async fn run_optimizer(
    optimizer: &dyn ModuleOptimizer,
    runtime: &dyn Runtime,
    layout: &ProjectLayout,
    modules: &OptimizerModules,
    target: BuildTarget,
) -> Result<PathBuf> {
    let mut text = String::new();
    let externals: Vec<String> = EXTERNAL_MODULES.iter().map(|m| m.to_string()).collect();

    for module in modules.for_target(target) {
        let config = OptimizeConfig {
            base_url: layout.resolve(&module.base_url),
            name: module.name.clone(),
            externals: externals.clone(),
        };
        debug!(build_target = %target, module = %config.name, "Optimizing AMD module");
        optimizer.optimize(&config, &mut text).await?;
    }

    let artifact = layout.artifact_path(target);
    write_artifact(runtime, &artifact, &text).await?;
    info!(build_target = %target, bytes = text.len(), "Wrote optimizer artifact");
    Ok(artifact)
}

async fn write_artifact(runtime: &dyn Runtime, path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        runtime
            .create_dir_all(parent)
            .await
            .map_err(|source| Error::PrepareDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    runtime
        .write_file(path, text.as_bytes())
        .await
        .map_err(|source| Error::Bundle {
            path: path.to_path_buf(),
            source,
        })
}
