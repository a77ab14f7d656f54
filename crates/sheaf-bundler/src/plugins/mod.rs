//! Plugin contributions.
//!
//! This module provides:
//! - the [`PluginRegistry`] data source and its JSON and in-memory backends
//! - expansion of contributed script entries into concrete script files

pub mod collect;
pub mod registry;

pub use collect::collect_plugin_scripts;
pub use registry::{
    JsonPluginRegistry, PluginContribution, PluginRegistry, PluginScript, RegistryDocument,
    StaticPluginRegistry,
};
