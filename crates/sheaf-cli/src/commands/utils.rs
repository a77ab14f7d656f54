//! Shared helpers for the pipeline commands.

use crate::config::SheafConfig;
use crate::error::{BuildError, CliError, Result};
use crate::ui::{self, SummaryRow};
use sheaf_bundler::{
    BundleReport, JsonPluginRegistry, Pipeline, PluginRegistry, RequireJsOptimizer,
    StaticPluginRegistry, WorkerCommand, WorkerPool,
};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// Fail early when the project root is missing.
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(BuildError::RootNotFound(root.to_path_buf()).into());
    }
    Ok(())
}

/// Build the pipeline described by `config`.
///
/// The worker pool re-runs this binary as `sheaf minify-worker` unless the
/// config names another worker command.
pub fn build_pipeline(config: &SheafConfig) -> Result<Pipeline> {
    validate_root(&config.root)?;
    let layout = config.layout();

    let command = match &config.worker_command {
        Some(command) => WorkerCommand::from(command),
        None => WorkerCommand::current_exe()
            .map_err(|e| BuildError::WorkerUnavailable(e.to_string()))?,
    };
    let pool = WorkerPool::with_max_workers(command, config.max_workers);

    let registry: Arc<dyn PluginRegistry> = match &config.plugin_registry {
        Some(path) => Arc::new(JsonPluginRegistry::new(layout.resolve(path))),
        None => Arc::new(StaticPluginRegistry::empty()),
    };

    let optimizer = match &config.optimizer.script {
        Some(script) => RequireJsOptimizer::new(&config.optimizer.node, layout.resolve(script)),
        None => RequireJsOptimizer::for_project(&layout).with_node(&config.optimizer.node),
    };

    tracing::debug!(
        root = %layout.root().display(),
        build_dir = %layout.build_dir().display(),
        mode = %config.build_mode(),
        max_workers = config.max_workers,
        "Pipeline configured"
    );

    Ok(Pipeline::builder(layout)
        .mode(config.build_mode())
        .manifest(config.manifest())
        .bundle_names((&config.bundle_names).into())
        .optimizer_modules((&config.optimizer.modules).into())
        .registry(registry)
        .optimizer(Arc::new(optimizer))
        .worker_pool(Arc::new(pool))
        .build())
}

/// Run `task` to completion unless Ctrl-C arrives first.
pub async fn interruptible<T>(task: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        result = task => result,
        _ = tokio::signal::ctrl_c() => {
            ui::warning("Interrupted, stopping minify workers");
            Err(CliError::Interrupted)
        }
    }
}

/// Summary rows for written bundles.
pub async fn bundle_rows(reports: &[BundleReport]) -> Result<Vec<SummaryRow>> {
    let mut rows = Vec::with_capacity(reports.len());
    for report in reports {
        let metadata = tokio::fs::metadata(&report.output)
            .await
            .map_err(|_| BuildError::MissingOutput(report.output.clone()))?;
        let name = report
            .output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.output.display().to_string());

        rows.push(SummaryRow {
            name,
            target: report.target.to_string(),
            files: report.files,
            size: metadata.len(),
            duration: report.duration,
        });
    }
    Ok(rows)
}
