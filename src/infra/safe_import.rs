//! Bounded-time module loading
//!
//! A module load can run arbitrary import-time code, and the load primitive
//! has no safe interruption point. Loads therefore run on the blocking pool
//! while the caller waits at most `timeout`. A load that overruns is
//! abandoned, not cancelled: it keeps running detached and its result is
//! dropped. Each timeout leaks at most that one background attempt.

use std::sync::Arc;
use std::time::Duration;

use crate::infra::registry::{ModuleHandle, ModuleRegistry};

#[derive(Debug)]
pub enum ImportOutcome {
    Loaded(ModuleHandle),
    Failed(String),
    Panicked,
    TimedOut,
}

impl ImportOutcome {
    pub fn into_module(self) -> Option<ModuleHandle> {
        match self {
            Self::Loaded(handle) => Some(handle),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SafeImporter {
    registry: Arc<dyn ModuleRegistry>,
}

impl SafeImporter {
    pub fn new(registry: Arc<dyn ModuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn ModuleRegistry> {
        &self.registry
    }

    /// Load `module`, or `None` if it fails or does not finish within `timeout`
    pub async fn load(&self, module: &str, timeout: Duration) -> Option<ModuleHandle> {
        self.try_load(module, timeout).await.into_module()
    }

    pub async fn try_load(&self, module: &str, timeout: Duration) -> ImportOutcome {
        let registry = Arc::clone(&self.registry);
        let name = module.to_string();
        let task = tokio::task::spawn_blocking(move || registry.load(&name));

        // Dropping the JoinHandle on timeout detaches the task
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(Ok(handle))) => ImportOutcome::Loaded(handle),
            Ok(Ok(Err(e))) => {
                tracing::debug!("Import of {} failed: {}", module, e);
                ImportOutcome::Failed(e.to_string())
            }
            Ok(Err(e)) => {
                tracing::debug!("Import of {} panicked: {}", module, e);
                ImportOutcome::Panicked
            }
            Err(_) => {
                tracing::warn!(
                    "Import of {} exceeded {:?}; abandoning it in the background",
                    module,
                    timeout
                );
                ImportOutcome::TimedOut
            }
        }
    }
}
