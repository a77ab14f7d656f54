//! Recursive directory walking shared by every stage that expands a tree.
//!
//! Module enumeration, plugin script directories and recursive static copies
//! all go through [`walk_blocking`], so they agree on symlink handling (links
//! are followed), ordering (sorted by file name within a directory) and
//! failure propagation (the first unreadable entry fails the walk).

use crate::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Extension of files treated as scripts.
pub const SCRIPT_EXTENSION: &str = "js";

/// One entry below a walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub is_dir: bool,
}

/// Walk `root` synchronously, returning every entry below it (root excluded).
pub fn walk_blocking(root: &Path) -> io::Result<Vec<WalkEntry>> {
    let mut entries = Vec::new();

    for entry in walkdir::WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            e.into_io_error()
                .unwrap_or_else(|| io::Error::other(message))
        })?;

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(io::Error::other)?
            .to_path_buf();

        entries.push(WalkEntry {
            is_dir: entry.file_type().is_dir(),
            path: entry.into_path(),
            relative,
        });
    }

    Ok(entries)
}

/// Walk `root` off the async executor and map every file through `map`.
///
/// Files for which `map` returns `None` are skipped. Directories are never
/// passed to `map`.
pub async fn walk_files<T, F>(root: &Path, map: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(&WalkEntry) -> Option<T> + Send + 'static,
{
    let root = root.to_path_buf();
    let walk_root = root.clone();

    let entries = tokio::task::spawn_blocking(move || walk_blocking(&walk_root))
        .await
        .map_err(Error::from_join)?
        .map_err(|source| Error::Enumerate { path: root, source })?;

    Ok(entries
        .iter()
        .filter(|entry| !entry.is_dir)
        .filter_map(map)
        .collect())
}

/// All script files below `root`.
pub async fn script_files(root: &Path) -> Result<Vec<PathBuf>> {
    walk_files(root, |entry| is_script(&entry.path).then(|| entry.path.clone())).await
}

/// Whether `path` has the script extension.
pub fn is_script(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b/deep")).unwrap();
        fs::write(root.join("a.js"), "").unwrap();
        fs::write(root.join("notes.md"), "").unwrap();
        fs::write(root.join("b/c.js"), "").unwrap();
        fs::write(root.join("b/deep/d.js"), "").unwrap();
        fs::write(root.join("b/deep/e.json"), "").unwrap();
        temp
    }

    #[test]
    fn test_walk_blocking_relative_paths_sorted() {
        let temp = tree();
        let relatives: Vec<_> = walk_blocking(temp.path())
            .unwrap()
            .into_iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.relative.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            relatives,
            vec!["a.js", "b/c.js", "b/deep/d.js", "b/deep/e.json", "notes.md"]
        );
    }

    #[tokio::test]
    async fn test_script_files_filters_extension() {
        let temp = tree();
        let scripts = script_files(temp.path()).await.unwrap();
        assert_eq!(scripts.len(), 3);
        assert!(scripts.iter().all(|p| is_script(p)));
    }

    #[tokio::test]
    async fn test_missing_root_is_enumerate_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = script_files(&missing).await.unwrap_err();
        assert!(matches!(err, Error::Enumerate { path, .. } if path == missing));
    }

    #[test]
    fn test_is_script() {
        assert!(is_script(Path::new("public/src/app.js")));
        assert!(!is_script(Path::new("public/src/app.json")));
        assert!(!is_script(Path::new("public/src/js")));
    }
}
