//! Shared test utilities for sheaf-bundler tests
//!
//! Builds a small forum-shaped project on disk and a pipeline over it that
//! uses the in-process minifier and a scripted optimizer, so no node or
//! worker binary is needed.

#![allow(dead_code)]

use async_trait::async_trait;
use sheaf_bundler::{
    BuildMode, Manifest, ModuleOptimizer, OptimizeConfig, OptimizerModule, OptimizerModules,
    Pipeline, ProjectLayout, StaticPluginRegistry, VendorModuleEntry,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Write `content` to `root/relative`, creating parents.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, content).expect("write file");
}

/// A project with three module roots, two vendor modules, a base list of
/// two scripts, one extension script per target and one plugin.
pub fn create_forum_project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();

    write(root, "public/src/A.js", "window.A = 1;");
    write(root, "public/src/B.js", "window.B = 2;");
    write(root, "public/src/C.js", "window.C = 3;");
    write(root, "public/src/D.js", "window.D = 4;");

    write(root, "public/src/modules/alerts.js", "define('alerts', function () { return { level: 1 }; });");
    write(root, "public/src/modules/helpers/format.js", "define('helpers/format', function () { return function (value) { return String(value); }; });");
    write(root, "public/src/modules/vendor.min.js", "window.v=1;");
    write(root, "public/src/admin/panel.js", "define('admin/panel', function () { return {}; });");
    write(root, "public/src/client/topic.js", "define('forum/topic', function () { return {}; });");

    write(root, "node_modules/single/dist/single.js", "window.single = function (input) { return input * 2; };");
    write(root, "node_modules/tree/one.js", "window.one = 1;");
    write(root, "node_modules/tree/nested/two.js", "window.two = 2;");
    write(root, "node_modules/tree/README.md", "# not a script");

    write(root, "node_modules/plugin/client/P.js", "window.P = 5;");
    write(root, "node_modules/plugin/static/logo.svg", "<svg/>");

    dir
}

pub fn forum_manifest() -> Manifest {
    Manifest::new(
        vec!["public/src/A.js".into(), "public/src/B.js".into()],
        vec!["public/src/C.js".into()],
        vec!["public/src/D.js".into()],
        vec![
            VendorModuleEntry::new("single.js", "node_modules/single/dist/single.js"),
            VendorModuleEntry::new("tree", "node_modules/tree"),
        ],
    )
}

pub fn forum_registry() -> StaticPluginRegistry {
    StaticPluginRegistry::empty()
        .with_scripts(sheaf_bundler::BuildTarget::Client, ["node_modules/plugin/client"])
        .with_static_dir("plugin/assets", "node_modules/plugin/static")
}

/// Emits one comment line per entry module.
#[derive(Debug, Default)]
pub struct ScriptedOptimizer;

#[async_trait]
impl ModuleOptimizer for ScriptedOptimizer {
    async fn optimize(
        &self,
        config: &OptimizeConfig,
        out: &mut String,
    ) -> sheaf_bundler::Result<()> {
        out.push_str(&format!("/* optimized {} */\n", config.name));
        Ok(())
    }
}

pub fn optimizer_modules() -> OptimizerModules {
    OptimizerModules {
        shared: vec![OptimizerModule::new("node_modules", "shared-amd")],
        client: vec![],
        admin: vec![OptimizerModule::new("node_modules", "admin-amd")],
    }
}

pub fn forum_pipeline(root: &Path, mode: BuildMode) -> Pipeline {
    Pipeline::builder(ProjectLayout::new(root))
        .mode(mode)
        .manifest(forum_manifest())
        .registry(Arc::new(forum_registry()))
        .optimizer(Arc::new(ScriptedOptimizer))
        .optimizer_modules(optimizer_modules())
        .build()
}

/// Byte offset of `needle` in `haystack`, panicking with context if absent.
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, haystack))
}
