//! Source manifest: which scripts belong to which target, in which order.
//!
//! Order within every list is load-bearing. Scripts share one global scope in
//! the composed bundle, so a script must come after everything it uses.
//! The manifest is built once at startup and never mutated afterwards.

mod defaults;

use crate::layout::ProjectLayout;
use crate::target::{BuildMode, BuildTarget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One entry of an ordered script list, resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDescriptor {
    /// Absolute path of the script.
    pub source_path: PathBuf,
    /// Root-relative name used for provenance and error messages.
    pub display_name: String,
}

impl ScriptDescriptor {
    pub fn new(layout: &ProjectLayout, path: impl AsRef<Path>) -> Self {
        let source_path = layout.resolve(path);
        let display_name = layout.relative_name(&source_path);
        Self {
            source_path,
            display_name,
        }
    }
}

/// A vendor file or directory exposed as an anonymously-defined module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorModuleEntry {
    /// Name the module is registered under (`Chart.js`, `timeago/locales`).
    pub registered_name: String,
    /// Project-relative file or directory.
    pub source_path: PathBuf,
}

impl VendorModuleEntry {
    pub fn new(registered_name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            registered_name: registered_name.into(),
            source_path: source_path.into(),
        }
    }
}

/// Immutable, ordered script declarations for both targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    base: Vec<PathBuf>,
    client: Vec<PathBuf>,
    admin: Vec<PathBuf>,
    modules: Vec<VendorModuleEntry>,
}

impl Manifest {
    /// Build a manifest from explicit lists.
    ///
    /// `base` is shared by both targets; `client` and `admin` are appended
    /// after it for their target. `modules` is the vendor module table.
    pub fn new(
        base: Vec<PathBuf>,
        client: Vec<PathBuf>,
        admin: Vec<PathBuf>,
        modules: Vec<VendorModuleEntry>,
    ) -> Self {
        Self {
            base,
            client,
            admin,
            modules,
        }
    }

    /// The forum's built-in manifest.
    pub fn builtin() -> Self {
        defaults::builtin()
    }

    pub fn base(&self) -> &[PathBuf] {
        &self.base
    }

    /// Target-extension list appended after the base scripts.
    pub fn extension(&self, target: BuildTarget) -> &[PathBuf] {
        match target {
            BuildTarget::Client => &self.client,
            BuildTarget::Admin => &self.admin,
        }
    }

    pub fn vendor_modules(&self) -> &[VendorModuleEntry] {
        &self.modules
    }

    /// Manifest portion of a target's bundle: base scripts, then the target's
    /// extension scripts.
    ///
    /// In development the client loads its extension modules one by one
    /// through the module loader, so they are left out of the client bundle.
    /// The admin extension is always bundled.
    pub fn bundle_scripts(&self, target: BuildTarget, mode: BuildMode) -> Vec<&Path> {
        let extension: &[PathBuf] = match target {
            BuildTarget::Client if mode.is_development() => &[],
            _ => self.extension(target),
        };

        self.base
            .iter()
            .chain(extension.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::builtin()
    }
}
