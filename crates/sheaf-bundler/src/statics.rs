//! Plugin static directory mounts.
//!
//! `<buildDir>/plugins` is rebuilt from scratch on every run: the old tree is
//! removed, then every mount is linked below it concurrently. Afterwards the
//! tree holds exactly the mounts of the currently registered plugins.

use crate::layout::ProjectLayout;
use crate::runtime::Runtime;
use crate::{Error, Result};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Clear the statics root and link every `mount -> source` pair below it.
///
/// Mount paths must be relative, may not climb out of the statics root, and
/// may not lie inside another mount. They are checked before anything is
/// removed. Returns the mount count.
pub async fn link_statics(
    runtime: &dyn Runtime,
    layout: &ProjectLayout,
    mounts: &BTreeMap<String, PathBuf>,
) -> Result<usize> {
    for mount in mounts.keys() {
        check_mount(mount)?;
    }
    check_disjoint(mounts.keys())?;

    let root = layout.statics_root();
    runtime
        .remove_dir_all(&root)
        .await
        .map_err(|e| Error::StaticLink {
            mount: root.display().to_string(),
            message: format!("cannot clear: {}", e),
        })?;

    try_join_all(
        mounts
            .iter()
            .map(|(mount, source)| link_mount(runtime, &root, mount, layout.resolve(source))),
    )
    .await?;

    info!(mounts = mounts.len(), root = %root.display(), "Linked plugin statics");
    Ok(mounts.len())
}

async fn link_mount(runtime: &dyn Runtime, root: &Path, mount: &str, source: PathBuf) -> Result<()> {
    let failed = |message: String| Error::StaticLink {
        mount: mount.to_string(),
        message,
    };

    let dest = root.join(mount);
    if let Some(parent) = dest.parent() {
        runtime
            .create_dir_all(parent)
            .await
            .map_err(|e| failed(format!("cannot create {}: {}", parent.display(), e)))?;
    }

    debug!(mount, source = %source.display(), "Linking static directory");
    runtime
        .link_dir(&source, &dest)
        .await
        .map_err(|e| failed(format!("cannot link {}: {}", source.display(), e)))
}

fn check_mount(mount: &str) -> Result<()> {
    let path = Path::new(mount);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if mount.is_empty() || escapes {
        return Err(Error::StaticLink {
            mount: mount.to_string(),
            message: "mount path must be relative and stay inside the statics root".to_string(),
        });
    }
    Ok(())
}

/// Mounts are linked concurrently, so none may contain another.
fn check_disjoint<'a>(mounts: impl IntoIterator<Item = &'a String>) -> Result<()> {
    let normalized: Vec<(&str, PathBuf)> = mounts
        .into_iter()
        .map(|mount| {
            let path = Path::new(mount)
                .components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect();
            (mount.as_str(), path)
        })
        .collect();

    for (i, (mount, path)) in normalized.iter().enumerate() {
        let nested = normalized
            .iter()
            .enumerate()
            .find(|(j, (_, other))| *j != i && path.starts_with(other));
        if let Some((_, (outer, _))) = nested {
            return Err(Error::StaticLink {
                mount: mount.to_string(),
                message: format!("overlaps the mount '{}'", outer),
            });
        }
    }
    Ok(())
}
