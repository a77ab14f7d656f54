//! Command implementations for the sheaf CLI.
//!
//! - [`build`] - Full build: modules, both bundles, statics
//! - [`modules`] - Per-module tree only
//! - [`bundle`] - One or both target bundles
//! - [`statics`] - Plugin static mounts
//! - [`config`] - Schema and example output
//! - [`worker`] - Hidden minify worker entry point
//!
//! Every command that builds a [`sheaf_bundler::Pipeline`] kills the minify
//! workers before returning, on success, failure or Ctrl-C.

pub mod build;
pub mod bundle;
pub mod config;
pub mod modules;
pub mod statics;
pub(crate) mod utils;
pub mod worker;

pub use build::execute as build_execute;
pub use bundle::execute as bundle_execute;
pub use config::execute as config_execute;
pub use modules::execute as modules_execute;
pub use statics::execute as statics_execute;
pub use worker::execute as worker_execute;
