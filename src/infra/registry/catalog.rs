//! Snapshot-backed module registry

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use super::entity::ModuleHandle;
use super::snapshot::{BUILTINS, Snapshot};
use super::{ModuleRegistry, RuntimeInfo};
use crate::error::{LoadError, SnapshotError};

/// Bundled CPython standard library snapshot
const BUNDLED_SNAPSHOT: &str = include_str!("../../../data/cpython-3.11.json");

#[derive(Debug)]
pub struct CatalogRegistry {
    runtime: RuntimeInfo,
    keywords: BTreeMap<String, String>,
    modules: IndexMap<String, ModuleHandle>,
    load_errors: HashMap<String, String>,
    builtins: ModuleHandle,
}

impl CatalogRegistry {
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        let built = snapshot.build()?;
        let builtins = built
            .modules
            .get(BUILTINS)
            .cloned()
            .ok_or_else(|| SnapshotError::parse("snapshot", "missing builtins module"))?;

        tracing::debug!(
            "Registry built: {} modules, Python {}",
            built.modules.len(),
            built.runtime.version
        );

        Ok(Self {
            runtime: built.runtime,
            keywords: built.keywords,
            modules: built.modules,
            load_errors: built.load_errors,
            builtins,
        })
    }

    pub fn bundled_snapshot() -> Result<Snapshot, SnapshotError> {
        Snapshot::from_json("bundled", BUNDLED_SNAPSHOT)
    }

    /// Registry over the bundled standard library snapshot only
    pub fn bundled() -> Result<Self, SnapshotError> {
        Self::from_snapshot(&Self::bundled_snapshot()?)
    }

    /// Bundled snapshot (optional) with extra snapshot files layered on top
    pub async fn load(bundled: bool, paths: &[PathBuf]) -> Result<Self, SnapshotError> {
        let mut snapshot = if bundled {
            Self::bundled_snapshot()?
        } else {
            Snapshot::default()
        };

        for path in paths {
            snapshot.merge(Self::read_snapshot(path).await?);
        }

        Self::from_snapshot(&snapshot)
    }

    async fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
        let content = tokio::fs::read_to_string(path).await?;
        tracing::debug!("Loaded snapshot {}", path.display());
        Snapshot::from_json(&path.display().to_string(), &content)
    }

    fn parent_package_error(&self, name: &str) -> LoadError {
        let Some((parent, _)) = name.rsplit_once('.') else {
            return LoadError::NotFound(name.to_string());
        };
        match self.modules.get(parent) {
            Some(module) if !module.package => LoadError::NotAPackage {
                name: name.to_string(),
                parent: parent.to_string(),
            },
            _ => LoadError::NotFound(name.to_string()),
        }
    }
}

impl ModuleRegistry for CatalogRegistry {
    fn load(&self, name: &str) -> Result<ModuleHandle, LoadError> {
        if let Some(message) = self.load_errors.get(name) {
            return Err(LoadError::failed(name, message.clone()));
        }
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| self.parent_package_error(name))
    }

    fn loaded(&self, name: &str) -> Option<ModuleHandle> {
        if self.load_errors.contains_key(name) {
            return None;
        }
        self.modules.get(name).cloned()
    }

    fn runtime(&self) -> &RuntimeInfo {
        &self.runtime
    }

    fn builtins(&self) -> ModuleHandle {
        Arc::clone(&self.builtins)
    }

    fn keyword_help(&self, keyword: &str) -> Option<String> {
        self.keywords.get(keyword).cloned()
    }

    fn aliases(&self, module: &ModuleHandle) -> Vec<String> {
        self.modules
            .iter()
            .filter(|(_, handle)| Arc::ptr_eq(handle, module))
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn find_origin(&self, name: &str) -> Option<PathBuf> {
        self.modules.get(name).and_then(|m| m.origin.clone())
    }
}
