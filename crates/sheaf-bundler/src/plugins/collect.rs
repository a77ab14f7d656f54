use super::registry::PluginScript;
use crate::Result;
use crate::layout::ProjectLayout;
use crate::walk::script_files;
use futures::future::try_join_all;
use std::path::PathBuf;
use tracing::debug;

/// Expand contributed script entries into absolute script paths.
///
/// File entries come first, in declared order. Directory entries are then
/// walked concurrently and their scripts appended; no ordering across
/// directories is promised.
pub async fn collect_plugin_scripts(
    layout: &ProjectLayout,
    entries: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in entries {
        match PluginScript::classify(layout.resolve(entry)) {
            PluginScript::File(path) => files.push(path),
            PluginScript::Dir(path) => dirs.push(path),
        }
    }

    let walked = try_join_all(dirs.iter().map(|dir| script_files(dir))).await?;
    let dir_count = walked.len();
    files.extend(walked.into_iter().flatten());

    debug!(
        entries = entries.len(),
        directories = dir_count,
        scripts = files.len(),
        "Collected plugin scripts"
    );
    Ok(files)
}
