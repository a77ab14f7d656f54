//! Plugin registry backends.
//!
//! The registry is a pure data source. It is queried afresh on every build so
//! that plugins activated since the last build are picked up.

use crate::target::BuildTarget;
use crate::walk::is_script;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What plugins contribute to one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginContribution {
    /// Script files and directories, project-relative or absolute.
    pub scripts: Vec<PathBuf>,
    /// Mount path (below the statics root) to source directory.
    pub static_dirs: BTreeMap<String, PathBuf>,
}

/// A plugin script entry: a file used as-is, or a directory to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginScript {
    File(PathBuf),
    Dir(PathBuf),
}

impl PluginScript {
    /// Entries with the script extension are files; anything else is a
    /// directory.
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if is_script(&path) {
            PluginScript::File(path)
        } else {
            PluginScript::Dir(path)
        }
    }
}

/// Source of plugin contributions.
#[async_trait]
pub trait PluginRegistry: Send + Sync + std::fmt::Debug {
    /// Scripts and static directories contributed for `target`.
    async fn contribution(&self, target: BuildTarget) -> Result<PluginContribution>;

    /// Static directory mounts of every active plugin.
    async fn static_dirs(&self) -> Result<BTreeMap<String, PathBuf>>;
}

/// On-disk registry format.
///
/// ```json
/// {
///   "clientScripts": ["node_modules/plugin-a/lib/main.js", "node_modules/plugin-b/client"],
///   "acpScripts": [],
///   "staticDirs": { "plugin-a/images": "node_modules/plugin-a/static/images" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryDocument {
    #[serde(default)]
    pub client_scripts: Vec<PathBuf>,
    #[serde(default)]
    pub acp_scripts: Vec<PathBuf>,
    #[serde(default)]
    pub static_dirs: BTreeMap<String, PathBuf>,
}

impl RegistryDocument {
    /// Script entries for `target`, looked up by its registry key.
    pub fn scripts(&self, target: BuildTarget) -> &[PathBuf] {
        match target.registry_key() {
            "acp" => &self.acp_scripts,
            _ => &self.client_scripts,
        }
    }

    fn contribution(&self, target: BuildTarget) -> PluginContribution {
        PluginContribution {
            scripts: self.scripts(target).to_vec(),
            static_dirs: self.static_dirs.clone(),
        }
    }
}

/// Registry read from a JSON file on every query.
///
/// A missing file means no plugins are active.
#[derive(Debug, Clone)]
pub struct JsonPluginRegistry {
    path: PathBuf,
}

impl JsonPluginRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the registry file.
    pub async fn load(&self) -> Result<RegistryDocument> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RegistryDocument::default());
            }
            Err(e) => {
                return Err(Error::Registry(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&text)
            .map_err(|e| Error::Registry(format!("invalid {}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl PluginRegistry for JsonPluginRegistry {
    async fn contribution(&self, target: BuildTarget) -> Result<PluginContribution> {
        Ok(self.load().await?.contribution(target))
    }

    async fn static_dirs(&self) -> Result<BTreeMap<String, PathBuf>> {
        Ok(self.load().await?.static_dirs)
    }
}

/// In-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticPluginRegistry {
    document: RegistryDocument,
}

impl StaticPluginRegistry {
    /// A registry with no plugins.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_document(document: RegistryDocument) -> Self {
        Self { document }
    }

    pub fn with_scripts(
        mut self,
        target: BuildTarget,
        scripts: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        let list = match target {
            BuildTarget::Client => &mut self.document.client_scripts,
            BuildTarget::Admin => &mut self.document.acp_scripts,
        };
        list.extend(scripts.into_iter().map(Into::into));
        self
    }

    pub fn with_static_dir(mut self, mount: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        self.document.static_dirs.insert(mount.into(), source.into());
        self
    }
}

#[async_trait]
impl PluginRegistry for StaticPluginRegistry {
    async fn contribution(&self, target: BuildTarget) -> Result<PluginContribution> {
        Ok(self.document.contribution(target))
    }

    async fn static_dirs(&self) -> Result<BTreeMap<String, PathBuf>> {
        Ok(self.document.static_dirs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify() {
        assert_eq!(
            PluginScript::classify("plugin/lib/main.js"),
            PluginScript::File(PathBuf::from("plugin/lib/main.js"))
        );
        assert_eq!(
            PluginScript::classify("plugin/client"),
            PluginScript::Dir(PathBuf::from("plugin/client"))
        );
    }

    #[tokio::test]
    async fn test_json_registry_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = JsonPluginRegistry::new(temp.path().join("plugins.json"));
        let contribution = registry.contribution(BuildTarget::Client).await.unwrap();
        assert_eq!(contribution, PluginContribution::default());
    }

    #[tokio::test]
    async fn test_json_registry_selects_acp_for_admin() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugins.json");
        std::fs::write(
            &path,
            r#"{"clientScripts":["c.js"],"acpScripts":["a.js","admin-dir"],"staticDirs":{"x/img":"node_modules/x/img"}}"#,
        )
        .unwrap();

        let registry = JsonPluginRegistry::new(&path);
        let admin = registry.contribution(BuildTarget::Admin).await.unwrap();
        assert_eq!(
            admin.scripts,
            vec![PathBuf::from("a.js"), PathBuf::from("admin-dir")]
        );
        assert_eq!(admin.static_dirs.len(), 1);

        let client = registry.contribution(BuildTarget::Client).await.unwrap();
        assert_eq!(client.scripts, vec![PathBuf::from("c.js")]);
    }

    #[tokio::test]
    async fn test_json_registry_rereads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugins.json");
        std::fs::write(&path, r#"{"staticDirs":{"old":"old"}}"#).unwrap();
        let registry = JsonPluginRegistry::new(&path);
        assert!(registry.static_dirs().await.unwrap().contains_key("old"));

        std::fs::write(&path, r#"{"staticDirs":{"new":"new"}}"#).unwrap();
        let dirs = registry.static_dirs().await.unwrap();
        assert!(dirs.contains_key("new"));
        assert!(!dirs.contains_key("old"));
    }

    #[tokio::test]
    async fn test_json_registry_invalid_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugins.json");
        std::fs::write(&path, r#"{"clientScript":[]}"#).unwrap();
        let err = JsonPluginRegistry::new(&path)
            .contribution(BuildTarget::Client)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Registry(_)));
    }

    #[tokio::test]
    async fn test_static_registry_builder() {
        let registry = StaticPluginRegistry::empty()
            .with_scripts(BuildTarget::Admin, ["admin.js"])
            .with_static_dir("p/css", "node_modules/p/css");
        assert!(
            registry
                .contribution(BuildTarget::Client)
                .await
                .unwrap()
                .scripts
                .is_empty()
        );
        assert_eq!(
            registry.contribution(BuildTarget::Admin).await.unwrap().scripts,
            vec![PathBuf::from("admin.js")]
        );
    }
}
