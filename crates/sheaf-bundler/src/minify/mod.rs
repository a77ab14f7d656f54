//! Minification: engines, executors and the worker pool.
//!
//! A [`MinifyExecutor`] accepts two kinds of work:
//!
//! - a batch of [`ModuleJob`]s, each minified to its own destination
//! - a [`BundleRequest`], concatenating an ordered file list into one bundle
//!   (minified or not)
//!
//! Two executors exist. [`InProcessExecutor`] runs the engine on the blocking
//! thread pool of the current process. [`WorkerPool`] ships work to long-lived
//! `sheaf minify-worker` subprocesses so a crash or memory spike in the
//! minifier cannot take the orchestrator down.

mod engine;
mod inline;
mod pool;
pub mod protocol;
pub mod worker;

pub use engine::{CONCAT_SEPARATOR, concat_sources, minify_bundle, minify_job, minify_source};
pub use inline::InProcessExecutor;
pub use pool::{WorkerCommand, WorkerPool, default_max_workers};

use crate::Result;
use crate::enumerate::ModuleJob;
use crate::manifest::ScriptDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Request to compose one bundle file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRequest {
    /// Sources in bundle order.
    pub files: Vec<ScriptDescriptor>,
    /// Output file name, used in error messages.
    pub file_name: String,
    pub dest_path: PathBuf,
    /// Minify the concatenation instead of writing it verbatim.
    pub minify: bool,
}

/// Executes minification work.
#[async_trait]
pub trait MinifyExecutor: Send + Sync + std::fmt::Debug {
    /// Minify every job to its destination. Parent directories must exist.
    async fn minify_batch(&self, jobs: Vec<ModuleJob>) -> Result<()>;

    /// Concatenate (and optionally minify) a bundle.
    async fn bundle(&self, request: BundleRequest) -> Result<()>;

    /// Terminate every worker process this executor owns. Idempotent.
    fn kill_all(&self);

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Module jobs split by whether their source is already minified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Sources that still need minification.
    pub minify: Vec<ModuleJob>,
    /// Pre-minified sources, linked as-is.
    pub link: Vec<ModuleJob>,
}

/// Split `jobs` into the minify and link groups.
///
/// Every job lands in exactly one group.
pub fn partition(jobs: Vec<ModuleJob>) -> Partition {
    let (link, minify) = jobs
        .into_iter()
        .partition(|job| is_preminified(&job.source_path));
    Partition { minify, link }
}

/// Whether `path` is a pre-minified artifact.
///
/// True for `*.min.js`, and for anything whose containing directory name ends
/// in `min` (`ace-builds/src-min/…`).
pub fn is_preminified(path: &Path) -> bool {
    let minified_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".min.js"));

    let minified_dir = path
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with("min"));

    minified_name || minified_dir
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(source: &str) -> ModuleJob {
        ModuleJob {
            source_path: PathBuf::from(source),
            destination_path: PathBuf::from("build").join(source),
            relative_name: source.to_string(),
        }
    }

    #[test]
    fn test_is_preminified() {
        assert!(is_preminified(Path::new("node_modules/chart.js/dist/Chart.min.js")));
        assert!(is_preminified(Path::new("node_modules/ace-builds/src-min/ace.js")));
        assert!(is_preminified(Path::new("vendor/admin/min/x.js")));
        assert!(!is_preminified(Path::new("node_modules/zxcvbn/dist/zxcvbn.js")));
        assert!(!is_preminified(Path::new("public/src/minimal/x.js")));
        assert!(!is_preminified(Path::new("public/src/admin.min.js.map")));
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let jobs = vec![
            job("a.js"),
            job("b.min.js"),
            job("src-min/c.js"),
            job("lib/d.js"),
            job("e.min.js"),
        ];
        let partition = partition(jobs.clone());

        assert_eq!(partition.minify.len() + partition.link.len(), jobs.len());
        for job in &jobs {
            let in_minify = partition.minify.contains(job);
            let in_link = partition.link.contains(job);
            assert!(in_minify ^ in_link, "{} must be in exactly one group", job.relative_name);
        }
        assert_eq!(
            partition
                .link
                .iter()
                .map(|j| j.relative_name.as_str())
                .collect::<Vec<_>>(),
            vec!["b.min.js", "src-min/c.js", "e.min.js"]
        );
    }
}
