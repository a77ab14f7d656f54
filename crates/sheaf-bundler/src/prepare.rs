//! Destination directory preparation.
//!
//! Runs between enumeration and materialization: every distinct parent
//! directory of a job list is created exactly once before any job writes.

use crate::enumerate::ModuleJob;
use crate::runtime::Runtime;
use crate::{Error, Result};
use futures::future::try_join_all;
use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::debug;

/// Create the distinct parent directories of `jobs`.
///
/// Returns the number of directories created (an already existing directory
/// counts as created).
pub async fn prepare_directories(runtime: &dyn Runtime, jobs: &[ModuleJob]) -> Result<usize> {
    let dirs: FxHashSet<&Path> = jobs
        .iter()
        .filter_map(|job| job.destination_path.parent())
        .collect();

    try_join_all(dirs.iter().map(|dir| async move {
        runtime
            .create_dir_all(dir)
            .await
            .map_err(|source| Error::PrepareDir {
                path: dir.to_path_buf(),
                source,
            })
    }))
    .await?;

    debug!(jobs = jobs.len(), directories = dirs.len(), "Prepared directories");
    Ok(dirs.len())
}
