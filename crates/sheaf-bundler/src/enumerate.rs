//! Module enumeration.
//!
//! Expands the vendor module table and the fixed module roots into a flat
//! list of [`ModuleJob`]s. A source that is a file becomes one job; a source
//! that is a directory becomes one job per script file beneath it, with the
//! destination mirroring the relative structure.

use crate::layout::{MODULE_ROOTS, ProjectLayout};
use crate::manifest::Manifest;
use crate::runtime::Runtime;
use crate::walk::{is_script, walk_files};
use crate::{Error, Result};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// One unit of link-or-minify work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleJob {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    /// Source path relative to the project root, forward slashes.
    pub relative_name: String,
}

/// A top-level module source before expansion: a vendor entry or a module root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
}

/// Vendor module entries followed by the module roots, all resolved.
pub fn module_sources(layout: &ProjectLayout, manifest: &Manifest) -> Vec<ModuleSource> {
    let vendor = manifest.vendor_modules().iter().map(|entry| ModuleSource {
        source_path: layout.resolve(&entry.source_path),
        destination_path: layout.vendor_dest(&entry.registered_name),
    });

    let roots = MODULE_ROOTS.iter().map(|name| ModuleSource {
        source_path: layout.module_root_source(name),
        destination_path: layout.module_root_dest(name),
    });

    vendor.chain(roots).collect()
}

/// Expand every module source into jobs.
///
/// All sources are stat'd and walked concurrently. If any source is missing
/// or unreadable the whole enumeration fails with that source's error and no
/// jobs are returned.
pub async fn enumerate_modules(
    runtime: &dyn Runtime,
    layout: &ProjectLayout,
    sources: &[ModuleSource],
) -> Result<Vec<ModuleJob>> {
    let expanded = try_join_all(
        sources
            .iter()
            .map(|source| expand_source(runtime, layout, source)),
    )
    .await?;

    let jobs: Vec<ModuleJob> = expanded.into_iter().flatten().collect();
    debug!(
        sources = sources.len(),
        jobs = jobs.len(),
        "Enumerated module jobs"
    );
    Ok(jobs)
}

async fn expand_source(
    runtime: &dyn Runtime,
    layout: &ProjectLayout,
    source: &ModuleSource,
) -> Result<Vec<ModuleJob>> {
    let metadata = runtime
        .metadata(&source.source_path)
        .await
        .map_err(|e| Error::Enumerate {
            path: source.source_path.clone(),
            source: e,
        })?;

    if !metadata.is_dir {
        return Ok(vec![ModuleJob {
            source_path: source.source_path.clone(),
            destination_path: source.destination_path.clone(),
            relative_name: layout.relative_name(&source.source_path),
        }]);
    }

    let layout = layout.clone();
    let destination = source.destination_path.clone();
    walk_files(&source.source_path, move |entry| {
        is_script(&entry.path).then(|| ModuleJob {
            source_path: entry.path.clone(),
            destination_path: destination.join(&entry.relative),
            relative_name: layout.relative_name(&entry.path),
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::VendorModuleEntry;
    use crate::runtime::NativeRuntime;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "void 0;").unwrap();
    }

    #[tokio::test]
    async fn test_vendor_table_directory_expands() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "node_modules/one/one.js");
        write(root, "node_modules/two/two.min.js");
        for name in ["a", "b", "c", "d/e", "d/f"] {
            write(root, &format!("node_modules/tree/{}.js", name));
        }
        write(root, "node_modules/tree/README.md");

        let layout = ProjectLayout::new(root);
        let manifest = Manifest::new(
            vec![],
            vec![],
            vec![],
            vec![
                VendorModuleEntry::new("one.js", "node_modules/one/one.js"),
                VendorModuleEntry::new("two.js", "node_modules/two/two.min.js"),
                VendorModuleEntry::new("tree", "node_modules/tree"),
            ],
        );

        // Vendor entries only; module roots are covered by the pipeline tests
        let sources: Vec<_> = module_sources(&layout, &manifest)
            .into_iter()
            .take(manifest.vendor_modules().len())
            .collect();
        assert_eq!(sources.len(), 3);

        let jobs = enumerate_modules(&NativeRuntime::new(), &layout, &sources)
            .await
            .unwrap();
        assert_eq!(jobs.len(), 7);

        let nested = jobs
            .iter()
            .find(|job| job.relative_name == "node_modules/tree/d/e.js")
            .unwrap();
        assert_eq!(
            nested.destination_path,
            layout.vendor_dest("tree").join("d").join("e.js")
        );

        let single = jobs
            .iter()
            .find(|job| job.relative_name == "node_modules/one/one.js")
            .unwrap();
        assert_eq!(single.destination_path, layout.vendor_dest("one.js"));
    }

    #[tokio::test]
    async fn test_missing_source_fails_whole_enumeration() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "public/src/modules/present.js");

        let layout = ProjectLayout::new(root);
        let sources = vec![
            ModuleSource {
                source_path: root.join("public/src/modules"),
                destination_path: layout.module_root_dest("modules"),
            },
            ModuleSource {
                source_path: root.join("node_modules/missing.js"),
                destination_path: layout.vendor_dest("missing.js"),
            },
        ];

        let err = enumerate_modules(&NativeRuntime::new(), &layout, &sources)
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Enumerate { ref path, .. } if path.ends_with("missing.js"))
        );
    }

    #[test]
    fn test_module_sources_order() {
        let layout = ProjectLayout::new("/srv/forum");
        let sources = module_sources(&layout, &Manifest::builtin());
        assert_eq!(sources.len(), 13 + MODULE_ROOTS.len());
        assert_eq!(
            sources.last().unwrap().source_path,
            PathBuf::from("/srv/forum/public/src/client")
        );
        assert_eq!(
            sources[0].destination_path,
            PathBuf::from("/srv/forum/build/public/src/modules/Chart.js")
        );
    }
}
