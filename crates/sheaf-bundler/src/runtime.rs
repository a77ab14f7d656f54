//! Filesystem runtime used by every stage.
//!
//! `Runtime` is the seam between the pipeline and the filesystem/symlink
//! primitives. `NativeRuntime` implements it on top of `tokio::fs`; tests wrap
//! it to observe calls (e.g. counting directory creations).
//!
//! Linking is relative on Unix (`../../node_modules/x.js`), so a build tree
//! keeps working after the project directory moves. Platforms without
//! reliable symlinks get copies instead. The choice is a `LinkStrategy` fixed
//! when the runtime is constructed, never a fallback taken after a failure.

use crate::walk::walk_blocking;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;

/// File metadata needed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub is_dir: bool,
}

/// How sources are materialized in development mode and for pre-minified jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    /// Relative symbolic links for files and directories.
    Symlink,
    /// Byte copies; directories are copied recursively.
    Copy,
}

impl LinkStrategy {
    /// Strategy for the current platform.
    pub fn for_platform() -> Self {
        if cfg!(unix) {
            LinkStrategy::Symlink
        } else {
            LinkStrategy::Copy
        }
    }
}

/// Filesystem operations used by the build stages.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Stat a path, following symlinks.
    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Read a UTF-8 file.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a file, replacing any existing one.
    async fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Create a directory and its parents; an existing directory is success.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory tree; a missing directory is success.
    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Link (or copy) a single file to `dest`.
    async fn link_file(&self, src: &Path, dest: &Path) -> io::Result<()>;

    /// Link (or copy) a whole directory tree to `dest`.
    async fn link_dir(&self, src: &Path, dest: &Path) -> io::Result<()>;
}

/// `Runtime` backed by the native filesystem.
#[derive(Debug, Clone, Copy)]
pub struct NativeRuntime {
    strategy: LinkStrategy,
}

impl NativeRuntime {
    /// Runtime using the platform's link strategy.
    pub fn new() -> Self {
        Self::with_strategy(LinkStrategy::for_platform())
    }

    pub fn with_strategy(strategy: LinkStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> LinkStrategy {
        self.strategy
    }
}

impl Default for NativeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(FileMetadata {
            is_dir: metadata.is_dir(),
        })
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        // A linked tree is removed as a link, not followed into its target
        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        }
    }

    async fn link_file(&self, src: &Path, dest: &Path) -> io::Result<()> {
        clear_entry(dest).await?;
        match self.strategy {
            LinkStrategy::Symlink => symlink_file(&relative_target(src, dest), dest).await,
            LinkStrategy::Copy => tokio::fs::copy(src, dest).await.map(|_| ()),
        }
    }

    async fn link_dir(&self, src: &Path, dest: &Path) -> io::Result<()> {
        clear_entry(dest).await?;
        match self.strategy {
            LinkStrategy::Symlink => symlink_dir(&relative_target(src, dest), dest).await,
            LinkStrategy::Copy => {
                let src = src.to_path_buf();
                let dest = dest.to_path_buf();
                task::spawn_blocking(move || copy_tree(&src, &dest))
                    .await
                    .map_err(io::Error::other)?
            }
        }
    }
}

/// Link target for `src` as seen from the directory containing `dest`.
fn relative_target(src: &Path, dest: &Path) -> PathBuf {
    dest.parent()
        .and_then(|parent| pathdiff::diff_paths(src, parent))
        .unwrap_or_else(|| src.to_path_buf())
}

/// Remove whatever sits at `dest` (file, link or directory) before relinking.
async fn clear_entry(dest: &Path) -> io::Result<()> {
    match tokio::fs::symlink_metadata(dest).await {
        Ok(metadata) if metadata.is_dir() => tokio::fs::remove_dir_all(dest).await,
        Ok(_) => tokio::fs::remove_file(dest).await,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
async fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(unix)]
async fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink_file(target, link).await
}

#[cfg(windows)]
async fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink_dir(target, link).await
}

#[cfg(not(any(unix, windows)))]
async fn symlink_file(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

#[cfg(not(any(unix, windows)))]
async fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    symlink_file(target, link).await
}

fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in walk_blocking(src)? {
        let target = dest.join(&entry.relative);
        if entry.is_dir {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(&entry.path, &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_target() {
        let target = relative_target(
            Path::new("/srv/forum/node_modules/chart.js/dist/Chart.min.js"),
            Path::new("/srv/forum/build/public/src/modules/Chart.js"),
        );
        assert_eq!(
            target,
            PathBuf::from("../../../../node_modules/chart.js/dist/Chart.min.js")
        );
    }

    #[tokio::test]
    async fn test_create_dir_all_existing_is_ok() {
        let temp = TempDir::new().unwrap();
        let runtime = NativeRuntime::new();
        let dir = temp.path().join("a/b");
        runtime.create_dir_all(&dir).await.unwrap();
        runtime.create_dir_all(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_remove_missing_dir_is_ok() {
        let temp = TempDir::new().unwrap();
        let runtime = NativeRuntime::new();
        runtime
            .remove_dir_all(&temp.path().join("never-created"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_copy_strategy_copies_file_and_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("a.js"), "a").unwrap();
        std::fs::write(src.join("nested/b.js"), "b").unwrap();

        let runtime = NativeRuntime::with_strategy(LinkStrategy::Copy);
        let out = temp.path().join("out");
        std::fs::create_dir_all(&out).unwrap();

        runtime.link_file(&src.join("a.js"), &out.join("a.js")).await.unwrap();
        runtime.link_dir(&src, &out.join("tree")).await.unwrap();

        assert!(!std::fs::symlink_metadata(out.join("a.js")).unwrap().is_symlink());
        assert_eq!(std::fs::read_to_string(out.join("tree/nested/b.js")).unwrap(), "b");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_strategy_relinks_over_existing_entry() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("one.js"), "one").unwrap();
        std::fs::write(temp.path().join("two.js"), "two").unwrap();
        let out = temp.path().join("out");
        std::fs::create_dir_all(&out).unwrap();

        let runtime = NativeRuntime::with_strategy(LinkStrategy::Symlink);
        let dest = out.join("linked.js");
        runtime.link_file(&temp.path().join("one.js"), &dest).await.unwrap();
        runtime.link_file(&temp.path().join("two.js"), &dest).await.unwrap();

        assert!(std::fs::symlink_metadata(&dest).unwrap().is_symlink());
        assert_eq!(std::fs::read_link(&dest).unwrap(), PathBuf::from("../two.js"));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "two");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remove_linked_dir_keeps_target() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("keep.js"), "keep").unwrap();

        let runtime = NativeRuntime::with_strategy(LinkStrategy::Symlink);
        let link = temp.path().join("link");
        runtime.link_dir(&src, &link).await.unwrap();
        runtime.remove_dir_all(&link).await.unwrap();

        assert!(!link.exists());
        assert!(src.join("keep.js").exists());
    }
}
