//! Module registry abstraction
//!
//! The registry stands in for the interpreter's process-wide module table.
//! It is injected wherever modules are loaded, so tests can supply their own
//! implementation without side-effecting loads.

pub mod catalog;
pub mod entity;
pub mod snapshot;
#[cfg(test)]
pub(crate) mod stub;

use std::collections::BTreeSet;
use std::path::PathBuf;

pub use catalog::CatalogRegistry;
pub use entity::{BoundMethod, Class, Entity, EntityKind, Function, Module, ModuleHandle, Value};
pub use snapshot::{BUILTINS, Snapshot};

use crate::error::LoadError;

/// Facts about the runtime a registry describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub version: String,
    pub major: u32,
    pub minor: u32,
    pub builtin_module_names: BTreeSet<String>,
    pub stdlib_module_names: Option<BTreeSet<String>>,
    pub stdlib_root: Option<PathBuf>,
}

impl RuntimeInfo {
    /// `major.minor`, the key for versioned documentation
    pub fn short_version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

pub trait ModuleRegistry: Send + Sync {
    /// Import a module by its dotted name
    fn load(&self, name: &str) -> Result<ModuleHandle, LoadError>;

    /// A module that is already loaded, without triggering a load
    fn loaded(&self, name: &str) -> Option<ModuleHandle>;

    fn runtime(&self) -> &RuntimeInfo;

    /// The root builtin namespace, available without any import
    fn builtins(&self) -> ModuleHandle;

    /// Help text for a reserved word
    fn keyword_help(&self, keyword: &str) -> Option<String>;

    /// Every registry name bound to the same module object as `module`
    fn aliases(&self, module: &ModuleHandle) -> Vec<String>;

    /// File a module would be loaded from, without loading it
    fn find_origin(&self, name: &str) -> Option<PathBuf>;
}
