//! Registry double for tests: wraps the bundled catalog and lets a test make
//! individual module loads slow, fail or panic.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use super::{CatalogRegistry, ModuleHandle, ModuleRegistry, RuntimeInfo};
use crate::error::LoadError;

#[derive(Debug, Clone)]
pub enum LoadBehavior {
    Sleep(Duration),
    Fail(String),
    Panic,
}

pub struct StubRegistry {
    inner: CatalogRegistry,
    behaviors: HashMap<String, LoadBehavior>,
    log: Mutex<Vec<String>>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self {
            inner: CatalogRegistry::bundled().expect("bundled snapshot"),
            behaviors: HashMap::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, module: &str, behavior: LoadBehavior) -> Self {
        self.behaviors.insert(module.to_string(), behavior);
        self
    }

    /// Module names in the order loads were attempted
    pub fn attempts(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl ModuleRegistry for StubRegistry {
    fn load(&self, name: &str) -> Result<ModuleHandle, LoadError> {
        self.log.lock().unwrap().push(name.to_string());
        match self.behaviors.get(name) {
            Some(LoadBehavior::Sleep(delay)) => std::thread::sleep(*delay),
            Some(LoadBehavior::Fail(message)) => return Err(LoadError::failed(name, message)),
            Some(LoadBehavior::Panic) => panic!("side effect while importing {name}"),
            None => {}
        }
        self.inner.load(name)
    }

    fn loaded(&self, name: &str) -> Option<ModuleHandle> {
        self.inner.loaded(name)
    }

    fn runtime(&self) -> &RuntimeInfo {
        self.inner.runtime()
    }

    fn builtins(&self) -> ModuleHandle {
        self.inner.builtins()
    }

    fn keyword_help(&self, keyword: &str) -> Option<String> {
        self.inner.keyword_help(keyword)
    }

    fn aliases(&self, module: &ModuleHandle) -> Vec<String> {
        self.inner.aliases(module)
    }

    fn find_origin(&self, name: &str) -> Option<PathBuf> {
        self.inner.find_origin(name)
    }
}
