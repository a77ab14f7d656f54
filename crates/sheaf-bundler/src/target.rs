//! Build targets and build modes.
//!
//! - `BuildTarget`: which of the two deployable bundles is being produced
//! - `BuildMode`: development (link, never compress) or production
//!   (minify, concatenate, immutable artifacts)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two deployable script bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    /// The main client application.
    Client,
    /// The administrative control panel.
    Admin,
}

impl BuildTarget {
    /// Both targets, client first.
    pub const ALL: [BuildTarget; 2] = [BuildTarget::Client, BuildTarget::Admin];

    /// Stable lowercase name (`client`, `admin`).
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            BuildTarget::Client => "client",
            BuildTarget::Admin => "admin",
        }
    }

    /// Name the plugin registry uses for this target.
    ///
    /// The registry predates the `admin` name and still calls it `acp`.
    #[inline]
    pub fn registry_key(self) -> &'static str {
        match self {
            BuildTarget::Client => "client",
            BuildTarget::Admin => "acp",
        }
    }

    /// File name of the optimizer's intermediate artifact for this target.
    pub fn artifact_file_name(self) -> String {
        format!("rjs-bundle-{}.js", self.as_str())
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(BuildTarget::Client),
            "admin" | "acp" => Ok(BuildTarget::Admin),
            other => Err(format!(
                "Invalid build target: '{}'. Expected: client, admin",
                other
            )),
        }
    }
}

/// Development or production operation.
///
/// Threaded explicitly through every stage; nothing in this crate reads the
/// process environment to decide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Link sources into the build tree and never compress.
    Development,
    /// Minify modules and bundles.
    #[default]
    Production,
}

impl BuildMode {
    #[inline]
    pub fn is_development(self) -> bool {
        matches!(self, BuildMode::Development)
    }

    /// Whether modules and composed bundles are compressed.
    ///
    /// Applies to both the per-module stage and the composed bundle.
    #[inline]
    pub fn compresses(self) -> bool {
        !self.is_development()
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Development => f.write_str("development"),
            BuildMode::Production => f.write_str("production"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => Err(format!(
                "Invalid build mode: '{}'. Expected: development, production",
                other
            )),
        }
    }
}
