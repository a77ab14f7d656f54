//! Bundle composition.
//!
//! A bundle is base scripts, then the target's extension scripts, then plugin
//! scripts, then the optimizer artifact. Scripts share one global scope once
//! concatenated, so this order is what makes the bundle work.

use crate::layout::ProjectLayout;
use crate::manifest::{Manifest, ScriptDescriptor};
use crate::minify::{BundleRequest, MinifyExecutor};
use crate::runtime::Runtime;
use crate::target::{BuildMode, BuildTarget};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered descriptor list for one target's bundle.
///
/// `plugin_scripts` are absolute paths as produced by
/// [`collect_plugin_scripts`](crate::plugins::collect_plugin_scripts);
/// `artifact` is the optimizer output and always ends the list.
pub fn bundle_file_list(
    layout: &ProjectLayout,
    manifest: &Manifest,
    target: BuildTarget,
    mode: BuildMode,
    plugin_scripts: &[PathBuf],
    artifact: &Path,
) -> Vec<ScriptDescriptor> {
    manifest
        .bundle_scripts(target, mode)
        .into_iter()
        .chain(plugin_scripts.iter().map(PathBuf::as_path))
        .chain(std::iter::once(artifact))
        .map(|path| ScriptDescriptor::new(layout, path))
        .collect()
}

/// Write `files` as the bundle `file_name` inside the build directory.
///
/// Minifies unless `mode` is development.
pub async fn compose_bundle(
    executor: &dyn MinifyExecutor,
    runtime: &dyn Runtime,
    layout: &ProjectLayout,
    files: Vec<ScriptDescriptor>,
    file_name: &str,
    mode: BuildMode,
) -> Result<PathBuf> {
    let build_dir = layout.build_dir();
    runtime
        .create_dir_all(build_dir)
        .await
        .map_err(|source| Error::PrepareDir {
            path: build_dir.to_path_buf(),
            source,
        })?;

    let dest_path = build_dir.join(file_name);
    debug!(
        bundle = file_name,
        files = files.len(),
        executor = executor.name(),
        "Composing bundle"
    );

    executor
        .bundle(BundleRequest {
            files,
            file_name: file_name.to_string(),
            dest_path: dest_path.clone(),
            minify: mode.compresses(),
        })
        .await?;

    Ok(dest_path)
}
