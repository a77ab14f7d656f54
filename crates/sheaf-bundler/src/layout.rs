//! On-disk layout of a project and its build output.
//!
//! ```text
//! <root>/public/src/{modules,admin,client}     module roots
//! <build>/src/{modules,admin,client}           mirrored module trees
//! <build>/src/modules/<vendor name>            vendor modules
//! <build>/rjs-bundle-<target>.js               optimizer artifacts
//! <build>/<bundle name>                        composed bundles
//! <build>/plugins/<mount>                      plugin static mounts
//! ```

use crate::target::BuildTarget;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Module roots mirrored from `public/src` into the build tree.
pub const MODULE_ROOTS: [&str; 3] = ["modules", "admin", "client"];

/// Project root and build output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    build_dir: PathBuf,
}

impl ProjectLayout {
    /// Layout with the default build directory `<root>/build/public`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into().clean();
        let build_dir = root.join("build").join("public");
        Self { root, build_dir }
    }

    /// Override the build directory. Relative paths resolve against the root.
    pub fn with_build_dir(mut self, build_dir: impl AsRef<Path>) -> Self {
        self.build_dir = self.resolve(build_dir);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Resolve a project-relative path (absolute paths pass through).
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf().clean()
        } else {
            self.root.join(path).clean()
        }
    }

    /// Root-relative, forward-slash name used for display and module registration.
    pub fn relative_name(&self, path: &Path) -> String {
        let relative = pathdiff::diff_paths(path, &self.root).unwrap_or_else(|| path.to_path_buf());
        relative.to_string_lossy().replace('\\', "/")
    }

    /// Source directory of a module root (`public/src/<root>`).
    pub fn module_root_source(&self, name: &str) -> PathBuf {
        self.root.join("public").join("src").join(name)
    }

    /// Build directory of a module root (`<build>/src/<root>`).
    pub fn module_root_dest(&self, name: &str) -> PathBuf {
        self.build_dir.join("src").join(name)
    }

    /// Destination of a vendor module registered under `name`.
    pub fn vendor_dest(&self, name: &str) -> PathBuf {
        self.module_root_dest("modules").join(name)
    }

    /// Optimizer artifact written for `target`.
    pub fn artifact_path(&self, target: BuildTarget) -> PathBuf {
        self.build_dir.join(target.artifact_file_name())
    }

    /// Mount root for plugin static directories.
    pub fn statics_root(&self) -> PathBuf {
        self.build_dir.join("plugins")
    }
}

/// Fixed output file names of the two bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleNames {
    pub client: String,
    pub admin: String,
}

impl Default for BundleNames {
    fn default() -> Self {
        Self {
            client: "nodebb.min.js".to_string(),
            admin: "acp.min.js".to_string(),
        }
    }
}

impl BundleNames {
    pub fn for_target(&self, target: BuildTarget) -> &str {
        match target {
            BuildTarget::Client => &self.client,
            BuildTarget::Admin => &self.admin,
        }
    }
}
