#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sheaf-bundler
//!
//! Static-asset build pipeline for the forum's two script targets: the main
//! client application and the admin control panel.
//!
//! The crate turns an ordered [`Manifest`] of scripts plus whatever the
//! plugin registry contributes into:
//!
//! - a mirrored per-module tree under `<build>/src` (minified in production,
//!   linked in development),
//! - one fixed-name bundle per [`BuildTarget`], and
//! - a plugin statics mount tree under `<build>/plugins`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheaf_bundler::{BuildMode, BuildTarget, Pipeline, ProjectLayout};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::builder(ProjectLayout::new("/srv/forum"))
//!     .mode(BuildMode::Production)
//!     .build();
//!
//! pipeline.build_modules(true).await?;
//! pipeline.build_bundle(BuildTarget::Client, true).await?;
//! pipeline.build_bundle(BuildTarget::Admin, true).await?;
//! pipeline.link_statics().await?;
//! pipeline.kill_minifier();
//! # Ok(()) }
//! ```
//!
//! ## Stages
//!
//! | Stage | Module |
//! |-------|--------|
//! | Module enumeration | [`enumerate`] |
//! | Directory preparation | [`prepare`] |
//! | Dev-mode linking | [`link`] |
//! | Minification (in-process or worker pool) | [`minify`] |
//! | AMD optimizer bridge | [`optimizer`] |
//! | Plugin contributions | [`plugins`] |
//! | Bundle composition | [`compose`] |
//! | Static directory mounts | [`statics`] |

pub mod compose;
pub mod diagnostics;
pub mod enumerate;
pub mod layout;
pub mod link;
pub mod manifest;
pub mod minify;
pub mod optimizer;
pub mod pipeline;
pub mod plugins;
pub mod prepare;
pub mod runtime;
pub mod statics;
pub mod target;
pub mod walk;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::init_logging_from_env;

pub use enumerate::ModuleJob;
pub use layout::{BundleNames, ProjectLayout};
pub use manifest::{Manifest, ScriptDescriptor, VendorModuleEntry};
pub use minify::{
    BundleRequest, InProcessExecutor, MinifyExecutor, WorkerCommand, WorkerPool,
};
pub use optimizer::{
    ModuleOptimizer, OptimizeConfig, OptimizerModule, OptimizerModules, RequireJsOptimizer,
};
pub use pipeline::{BundleReport, ModulesReport, Pipeline, PipelineBuilder, StaticsReport};
pub use plugins::{JsonPluginRegistry, PluginContribution, PluginRegistry, StaticPluginRegistry};
pub use runtime::{LinkStrategy, NativeRuntime, Runtime};
pub use target::{BuildMode, BuildTarget};

use std::path::PathBuf;

/// Error types for sheaf-bundler operations.
///
/// Every build trigger fails fast: the first failing item of a fanned-out
/// stage becomes the single error returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A module root or plugin directory could not be stat'd or walked.
    #[error("Failed to enumerate {}: {source}", .path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A destination directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    PrepareDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Linking or copying a module into the build tree failed.
    #[error("Failed to link {} -> {}: {source}", .from.display(), .to.display())]
    Link {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source could not be parsed or minified.
    #[error("Error minifying {name}: {message}")]
    Minify { name: String, message: String },

    /// A minify worker process failed or reported an error.
    #[error("Minify worker error: {0}")]
    Worker(String),

    /// The AMD module optimizer failed for one of its entry modules.
    #[error("Module optimizer failed for '{module}': {message}")]
    Optimizer { module: String, message: String },

    /// Reading sources or writing a bundle failed.
    #[error("Failed to write bundle {}: {source}", .path.display())]
    Bundle {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Clearing or relinking the plugin statics tree failed.
    #[error("Failed to link static directory '{mount}': {message}")]
    StaticLink { mount: String, message: String },

    /// The plugin registry could not be read.
    #[error("Plugin registry error: {0}")]
    Registry(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sheaf-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Convert a panicked or cancelled blocking task into a worker error.
    pub(crate) fn from_join(err: tokio::task::JoinError) -> Self {
        Error::Worker(format!("Task join error: {}", err))
    }
}
