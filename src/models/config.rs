//! Configuration model for pyhover
//!
//! Registry and output settings, loaded from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// pyhover configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PyhoverConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Module registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound for a single module load
    #[serde(default = "defaults::import_timeout_ms")]
    pub import_timeout_ms: u64,

    /// Load the bundled standard library snapshot
    #[serde(default = "defaults::bundled")]
    pub bundled: bool,

    /// Extra introspection snapshots layered over the bundled one
    #[serde(default)]
    pub snapshots: Vec<PathBuf>,

    /// Preferred module aliases, most preferred first
    #[serde(default = "defaults::canonical_aliases")]
    pub canonical_aliases: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            import_timeout_ms: defaults::import_timeout_ms(),
            bundled: defaults::bundled(),
            snapshots: Vec::new(),
            canonical_aliases: defaults::canonical_aliases(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "defaults::pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: defaults::pretty(),
        }
    }
}

mod defaults {
    // Registry
    pub fn import_timeout_ms() -> u64 {
        2000
    }
    pub fn bundled() -> bool {
        true
    }
    pub fn canonical_aliases() -> Vec<String> {
        vec!["os.path".to_string()]
    }

    // Output
    pub fn pretty() -> bool {
        true
    }
}
