//! Development-mode linking.
//!
//! Instead of compiling, development builds alias sources into the build
//! tree. A source that is a directory is linked as one tree; a file is linked
//! (or copied, depending on the runtime's [`LinkStrategy`]) on its own.
//! Linked output points back into the source tree and is never shipped.
//!
//! [`LinkStrategy`]: crate::runtime::LinkStrategy

use crate::enumerate::{ModuleJob, ModuleSource, enumerate_modules};
use crate::layout::ProjectLayout;
use crate::prepare::prepare_directories;
use crate::runtime::Runtime;
use crate::{Error, Result};
use futures::future::try_join_all;
use std::path::Path;
use tracing::debug;

/// Link every module source for a development build.
///
/// Sources are linked as one unit (tree or file), except a source whose
/// destination contains another source's destination: linking that one as a
/// tree would make the build tree alias the source tree, and the nested links
/// would land among the sources. Such a source is expanded and linked file by
/// file instead. Returns the number of links made.
pub async fn link_module_sources(
    runtime: &dyn Runtime,
    layout: &ProjectLayout,
    sources: &[ModuleSource],
) -> Result<usize> {
    let (hosts, units): (Vec<ModuleSource>, Vec<ModuleSource>) = sources
        .iter()
        .cloned()
        .partition(|source| hosts_other(source, sources));

    let jobs = enumerate_modules(runtime, layout, &hosts).await?;
    prepare_directories(runtime, &jobs).await?;

    let (units, ()) = futures::try_join!(link_sources(runtime, &units), link_jobs(runtime, &jobs))?;
    Ok(units + jobs.len())
}

fn hosts_other(source: &ModuleSource, sources: &[ModuleSource]) -> bool {
    sources.iter().any(|other| {
        other.destination_path != source.destination_path
            && other.destination_path.starts_with(&source.destination_path)
    })
}

/// Link a single job's source file to its destination.
pub async fn link_job(runtime: &dyn Runtime, job: &ModuleJob) -> Result<()> {
    link_file(runtime, &job.source_path, &job.destination_path).await
}

/// Link every job concurrently. Parent directories must already exist.
pub async fn link_jobs(runtime: &dyn Runtime, jobs: &[ModuleJob]) -> Result<()> {
    try_join_all(jobs.iter().map(|job| link_job(runtime, job))).await?;
    Ok(())
}

/// Link every module source (vendor entry or module root) into the build tree.
///
/// For each source the destination's parent is created while the source is
/// stat'd; the stat result then decides between a tree link and a file link.
pub async fn link_sources(runtime: &dyn Runtime, sources: &[ModuleSource]) -> Result<usize> {
    try_join_all(sources.iter().map(|source| link_source(runtime, source))).await?;
    Ok(sources.len())
}

async fn link_source(runtime: &dyn Runtime, source: &ModuleSource) -> Result<()> {
    let parent = async {
        match source.destination_path.parent() {
            Some(parent) => runtime
                .create_dir_all(parent)
                .await
                .map_err(|e| Error::PrepareDir {
                    path: parent.to_path_buf(),
                    source: e,
                }),
            None => Ok(()),
        }
    };
    let stat = async {
        runtime
            .metadata(&source.source_path)
            .await
            .map_err(|e| Error::Enumerate {
                path: source.source_path.clone(),
                source: e,
            })
    };

    let ((), metadata) = futures::try_join!(parent, stat)?;

    if metadata.is_dir {
        debug!(from = %source.source_path.display(), "Linking module tree");
        runtime
            .link_dir(&source.source_path, &source.destination_path)
            .await
            .map_err(|e| Error::Link {
                from: source.source_path.clone(),
                to: source.destination_path.clone(),
                source: e,
            })
    } else {
        link_file(runtime, &source.source_path, &source.destination_path).await
    }
}

async fn link_file(runtime: &dyn Runtime, from: &Path, to: &Path) -> Result<()> {
    debug!(from = %from.display(), "Linking module");
    runtime.link_file(from, to).await.map_err(|e| Error::Link {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}
