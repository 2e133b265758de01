//! Standard library membership and canonical module names

use std::path::Path;
use std::sync::Arc;

use crate::infra::registry::{ModuleHandle, ModuleRegistry};

const THIRD_PARTY_DIRS: &[&str] = &["site-packages", "dist-packages"];

#[derive(Clone)]
pub struct ModuleClassifier {
    registry: Arc<dyn ModuleRegistry>,
    canonical_aliases: Vec<String>,
}

impl ModuleClassifier {
    pub fn new(registry: Arc<dyn ModuleRegistry>, canonical_aliases: Vec<String>) -> Self {
        Self {
            registry,
            canonical_aliases,
        }
    }

    pub fn is_standard_library(&self, module: &str) -> bool {
        let root = module.split('.').next().unwrap_or_default();
        if root.is_empty() {
            return false;
        }

        let runtime = self.registry.runtime();
        if runtime.builtin_module_names.contains(root) {
            return true;
        }
        if let Some(stdlib) = &runtime.stdlib_module_names {
            return stdlib.contains(root);
        }

        // Older runtimes have no stdlib name list; fall back to the file origin
        let Some(stdlib_root) = &runtime.stdlib_root else {
            return false;
        };
        self.registry
            .find_origin(module)
            .or_else(|| self.registry.find_origin(root))
            .is_some_and(|origin| is_under_stdlib(&origin, stdlib_root))
    }

    /// Preferred alias bound to the same module object, if any
    fn canonical_alias(&self, module: &ModuleHandle) -> Option<String> {
        let aliases = self.registry.aliases(module);
        self.canonical_aliases
            .iter()
            .find(|preferred| aliases.contains(preferred))
            .cloned()
    }

    /// `name` unless a preferred alias of the same module object exists
    pub fn canonicalize(&self, name: &str, module: &ModuleHandle) -> String {
        self.canonical_alias(module)
            .unwrap_or_else(|| name.to_string())
    }
}

fn is_under_stdlib(origin: &Path, stdlib_root: &Path) -> bool {
    let origin = origin.to_string_lossy().to_lowercase();
    let stdlib_root = stdlib_root.to_string_lossy().to_lowercase();
    Path::new(&origin).starts_with(&stdlib_root)
        && !THIRD_PARTY_DIRS.iter().any(|dir| origin.contains(dir))
}
