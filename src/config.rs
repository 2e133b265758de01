//! Global Configuration Singleton

use std::sync::OnceLock;
use std::time::Duration;

use crate::models::config::PyhoverConfig;

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    import_timeout: Duration,
    pub canonical_aliases: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&PyhoverConfig::default())
    }
}

impl From<&PyhoverConfig> for RuntimeConfig {
    fn from(config: &PyhoverConfig) -> Self {
        Self {
            // A zero budget would make every module unavailable
            import_timeout: Duration::from_millis(config.registry.import_timeout_ms.max(1)),
            canonical_aliases: config.registry.canonical_aliases.clone(),
        }
    }
}

impl RuntimeConfig {
    pub fn import_timeout(&self) -> Duration {
        self.import_timeout
    }
}

pub fn init(config: &PyhoverConfig) {
    let _ = CONFIG.set(RuntimeConfig::from(config));
}

pub fn import_timeout() -> Duration {
    config().import_timeout()
}

pub fn canonical_aliases() -> Vec<String> {
    config().canonical_aliases
}

fn config() -> RuntimeConfig {
    CONFIG.get().cloned().unwrap_or_default()
}
