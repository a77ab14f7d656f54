//! The build facade.
//!
//! [`Pipeline`] wires the stages together and exposes the four build
//! triggers: [`build_modules`](Pipeline::build_modules),
//! [`build_bundle`](Pipeline::build_bundle),
//! [`link_statics`](Pipeline::link_statics) and
//! [`kill_minifier`](Pipeline::kill_minifier).
//!
//! The manifest is shared read-only. Job lists, plugin contributions and the
//! optimizer buffer are rebuilt on every call.

use crate::compose::{bundle_file_list, compose_bundle};
use crate::enumerate::{enumerate_modules, module_sources};
use crate::layout::{BundleNames, MODULE_ROOTS, ProjectLayout};
use crate::link::{link_jobs, link_module_sources};
use crate::manifest::Manifest;
use crate::minify::{InProcessExecutor, MinifyExecutor, Partition, partition};
use crate::optimizer::{ModuleOptimizer, OptimizerModules, RequireJsOptimizer, run_optimizer};
use crate::plugins::{PluginRegistry, StaticPluginRegistry, collect_plugin_scripts};
use crate::prepare::prepare_directories;
use crate::runtime::{NativeRuntime, Runtime};
use crate::statics;
use crate::target::{BuildMode, BuildTarget};
use crate::{Error, Result};
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of [`Pipeline::build_modules`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulesReport {
    pub mode: BuildMode,
    /// Files minified.
    pub minified: usize,
    /// Files or trees linked.
    pub linked: usize,
    /// Destination directories prepared (production only).
    pub directories: usize,
    pub duration: Duration,
}

/// Outcome of [`Pipeline::build_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub target: BuildTarget,
    pub output: PathBuf,
    /// Scripts in the bundle, optimizer artifact included.
    pub files: usize,
    pub plugin_scripts: usize,
    pub minified: bool,
    pub duration: Duration,
}

/// Outcome of [`Pipeline::link_statics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticsReport {
    pub mounts: usize,
    pub root: PathBuf,
}

/// The build pipeline for one project.
#[derive(Debug)]
pub struct Pipeline {
    layout: ProjectLayout,
    mode: BuildMode,
    manifest: Arc<Manifest>,
    bundle_names: BundleNames,
    optimizer_modules: OptimizerModules,
    runtime: Arc<dyn Runtime>,
    registry: Arc<dyn PluginRegistry>,
    optimizer: Arc<dyn ModuleOptimizer>,
    /// Used when forking is requested.
    forked: Arc<dyn MinifyExecutor>,
    inline: Arc<dyn MinifyExecutor>,
}

impl Pipeline {
    pub fn builder(layout: ProjectLayout) -> PipelineBuilder {
        PipelineBuilder::new(layout)
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn executor(&self, fork: bool) -> &dyn MinifyExecutor {
        if fork {
            self.forked.as_ref()
        } else {
            self.inline.as_ref()
        }
    }

    /// Rebuild `<buildDir>/src`.
    ///
    /// The module roots are cleared first. Development links sources into
    /// place; production enumerates every script, prepares destinations, then
    /// minifies and links (pre-minified files) concurrently.
    pub async fn build_modules(&self, fork: bool) -> Result<ModulesReport> {
        let started = Instant::now();
        let runtime = self.runtime.as_ref();

        self.clear_module_roots().await?;
        let sources = module_sources(&self.layout, &self.manifest);

        if self.mode.is_development() {
            let linked = link_module_sources(runtime, &self.layout, &sources).await?;
            info!(linked, "Linked modules");
            return Ok(ModulesReport {
                mode: self.mode,
                linked,
                duration: started.elapsed(),
                ..Default::default()
            });
        }

        let jobs = enumerate_modules(runtime, &self.layout, &sources).await?;
        let directories = prepare_directories(runtime, &jobs).await?;

        let Partition { minify, link } = partition(jobs);
        let (minified, linked) = (minify.len(), link.len());
        let executor = self.executor(fork);
        info!(
            minify = minified,
            link = linked,
            executor = executor.name(),
            "Building modules"
        );

        futures::try_join!(executor.minify_batch(minify), link_jobs(runtime, &link))?;

        Ok(ModulesReport {
            mode: self.mode,
            minified,
            linked,
            directories,
            duration: started.elapsed(),
        })
    }

    async fn clear_module_roots(&self) -> Result<()> {
        try_join_all(MODULE_ROOTS.iter().map(|name| async move {
            let path = self.layout.module_root_dest(name);
            self.runtime
                .remove_dir_all(&path)
                .await
                .map_err(|source| Error::PrepareDir { path, source })
        }))
        .await?;
        Ok(())
    }

    /// Compose the bundle for `target`.
    ///
    /// Runs the optimizer, collects plugin scripts, then concatenates
    /// everything into the target's bundle file. Both targets may be built
    /// concurrently.
    pub async fn build_bundle(&self, target: BuildTarget, fork: bool) -> Result<BundleReport> {
        let started = Instant::now();
        let runtime = self.runtime.as_ref();

        let artifact = run_optimizer(
            self.optimizer.as_ref(),
            runtime,
            &self.layout,
            &self.optimizer_modules,
            target,
        )
        .await?;

        let contribution = self.registry.contribution(target).await?;
        let plugin_scripts = collect_plugin_scripts(&self.layout, &contribution.scripts).await?;

        let files = bundle_file_list(
            &self.layout,
            &self.manifest,
            target,
            self.mode,
            &plugin_scripts,
            &artifact,
        );
        let file_count = files.len();

        let output = compose_bundle(
            self.executor(fork),
            runtime,
            &self.layout,
            files,
            self.bundle_names.for_target(target),
            self.mode,
        )
        .await?;

        info!(build_target = %target, output = %output.display(), files = file_count, "Bundle written");
        Ok(BundleReport {
            target,
            output,
            files: file_count,
            plugin_scripts: plugin_scripts.len(),
            minified: self.mode.compresses(),
            duration: started.elapsed(),
        })
    }

    /// Rebuild the plugin statics tree from the registry.
    pub async fn link_statics(&self) -> Result<StaticsReport> {
        let mounts = self.registry.static_dirs().await?;
        let count = statics::link_statics(self.runtime.as_ref(), &self.layout, &mounts).await?;
        Ok(StaticsReport {
            mounts: count,
            root: self.layout.statics_root(),
        })
    }

    /// Terminate every minify worker. Safe to call at any time, repeatedly.
    pub fn kill_minifier(&self) {
        self.forked.kill_all();
        self.inline.kill_all();
    }
}

/// Builder for [`Pipeline`].
///
/// Defaults: production mode, the built-in manifest, the native runtime, no
/// plugins, `r.js` from the project's `node_modules`, and in-process
/// minification for both fork settings. Binaries that can host a worker pass a
/// [`WorkerPool`](crate::WorkerPool) through [`PipelineBuilder::worker_pool`].
#[derive(Debug)]
pub struct PipelineBuilder {
    layout: ProjectLayout,
    mode: BuildMode,
    manifest: Option<Arc<Manifest>>,
    bundle_names: BundleNames,
    optimizer_modules: OptimizerModules,
    runtime: Option<Arc<dyn Runtime>>,
    registry: Option<Arc<dyn PluginRegistry>>,
    optimizer: Option<Arc<dyn ModuleOptimizer>>,
    forked: Option<Arc<dyn MinifyExecutor>>,
}

impl PipelineBuilder {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            mode: BuildMode::default(),
            manifest: None,
            bundle_names: BundleNames::default(),
            optimizer_modules: OptimizerModules::default(),
            runtime: None,
            registry: None,
            optimizer: None,
            forked: None,
        }
    }

    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn manifest(mut self, manifest: impl Into<Arc<Manifest>>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    pub fn bundle_names(mut self, names: BundleNames) -> Self {
        self.bundle_names = names;
        self
    }

    pub fn optimizer_modules(mut self, modules: OptimizerModules) -> Self {
        self.optimizer_modules = modules;
        self
    }

    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn registry(mut self, registry: Arc<dyn PluginRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn optimizer(mut self, optimizer: Arc<dyn ModuleOptimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Executor used when a trigger is called with `fork = true`.
    pub fn worker_pool(mut self, executor: Arc<dyn MinifyExecutor>) -> Self {
        self.forked = Some(executor);
        self
    }

    pub fn build(self) -> Pipeline {
        let optimizer = self
            .optimizer
            .unwrap_or_else(|| Arc::new(RequireJsOptimizer::for_project(&self.layout)));
        let inline: Arc<dyn MinifyExecutor> = Arc::new(InProcessExecutor::new());

        Pipeline {
            mode: self.mode,
            manifest: self
                .manifest
                .unwrap_or_else(|| Arc::new(Manifest::builtin())),
            bundle_names: self.bundle_names,
            optimizer_modules: self.optimizer_modules,
            runtime: self
                .runtime
                .unwrap_or_else(|| Arc::new(NativeRuntime::new())),
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(StaticPluginRegistry::empty())),
            optimizer,
            forked: self.forked.unwrap_or_else(|| inline.clone()),
            inline,
            layout: self.layout,
        }
    }
}
