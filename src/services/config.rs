//! Configuration service for pyhover

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::models::config::{PyhoverConfig, RegistryConfig};

#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn load(&self, global_only: bool) -> Result<PyhoverConfig, ConfigError>;
    fn config_path(&self, global: bool) -> PathBuf;
    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError>;
}

pub struct DefaultConfigService {
    root: PathBuf,
    global_path: PathBuf,
}

impl DefaultConfigService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            global_path: Self::global_config_path(),
        }
    }

    /// Use an explicit global config file instead of the XDG location
    pub fn with_global_path(mut self, path: PathBuf) -> Self {
        self.global_path = path;
        self
    }

    fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/pyhover/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pyhover")
            .join("config.toml")
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(".pyhover").join("config.toml")
    }

    async fn load_from_path(path: &Path) -> Result<Option<PyhoverConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(path).await?;
        let mut config: PyhoverConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Snapshot paths are relative to the file that names them
        if let Some(dir) = path.parent() {
            for snapshot in &mut config.registry.snapshots {
                if snapshot.is_relative() {
                    *snapshot = dir.join(&*snapshot);
                }
            }
        }
        Ok(Some(config))
    }

    async fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let config = PyhoverConfig::default();
        let content =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigService for DefaultConfigService {
    async fn load(&self, global_only: bool) -> Result<PyhoverConfig, ConfigError> {
        let global = Self::load_from_path(&self.global_path).await?;
        if global_only {
            return Ok(global.unwrap_or_default());
        }

        let mut config = global.unwrap_or_default();
        if let Some(project) = Self::load_from_path(&self.project_config_path()).await? {
            config = merge_config(config, project);
        }
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    fn config_path(&self, global: bool) -> PathBuf {
        if global {
            self.global_path.clone()
        } else {
            self.project_config_path()
        }
    }

    async fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError> {
        let path = self.config_path(global);

        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                key: "config".to_string(),
                message: format!(
                    "Config already exists: {}. Use --force to overwrite.",
                    path.display()
                ),
            });
        }

        Self::write_default_config(&path).await?;
        Ok(path)
    }
}

/// Project settings replace global ones; snapshot lists accumulate
fn merge_config(base: PyhoverConfig, overlay: PyhoverConfig) -> PyhoverConfig {
    let mut snapshots = base.registry.snapshots;
    for snapshot in overlay.registry.snapshots.iter() {
        if !snapshots.contains(snapshot) {
            snapshots.push(snapshot.clone());
        }
    }

    PyhoverConfig {
        registry: RegistryConfig {
            snapshots,
            ..overlay.registry
        },
        output: overlay.output,
    }
}

fn apply_env_overrides(
    mut config: PyhoverConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<PyhoverConfig, ConfigError> {
    if let Some(val) = var("PYHOVER_IMPORT_TIMEOUT_MS") {
        config.registry.import_timeout_ms =
            val.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PYHOVER_IMPORT_TIMEOUT_MS".to_string(),
                message: format!("expected milliseconds, got '{val}'"),
            })?;
    }
    if let Some(val) = var("PYHOVER_SNAPSHOTS") {
        config
            .registry
            .snapshots
            .extend(std::env::split_paths(&val).filter(|p| !p.as_os_str().is_empty()));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(root: &Path) -> DefaultConfigService {
        DefaultConfigService::new(root).with_global_path(root.join("global").join("config.toml"))
    }

    #[tokio::test]
    async fn test_missing_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = service(dir.path()).load(true).await.unwrap();
        assert_eq!(config.registry.import_timeout_ms, 2000);
        assert!(config.output.pretty);
    }

    #[tokio::test]
    async fn test_project_overrides_global() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let global = service.config_path(true);
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        std::fs::write(
            &global,
            "[registry]\nimport_timeout_ms = 500\nsnapshots = [\"/opt/numpy.json\"]\n",
        )
        .unwrap();

        let project = service.config_path(false);
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(
            &project,
            "[registry]\nimport_timeout_ms = 750\nsnapshots = [\"vendor.json\"]\n\n[output]\npretty = false\n",
        )
        .unwrap();

        let global_only = service.load(true).await.unwrap();
        assert_eq!(global_only.registry.import_timeout_ms, 500);

        let config = service.load(false).await.unwrap();
        assert_eq!(config.registry.import_timeout_ms, 750);
        assert!(!config.output.pretty);
        assert_eq!(
            config.registry.snapshots,
            vec![
                PathBuf::from("/opt/numpy.json"),
                dir.path().join(".pyhover").join("vendor.json"),
            ]
        );
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let path = service.init(false, false).await.unwrap();
        assert!(path.exists());
        let written: PyhoverConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.registry.canonical_aliases, vec!["os.path"]);

        assert!(matches!(
            service.init(false, false).await,
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(service.init(false, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let path = service.config_path(false);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[registry\n").unwrap();

        assert!(matches!(service.load(false).await, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env = |key: &str| match key {
            "PYHOVER_IMPORT_TIMEOUT_MS" => Some("250".to_string()),
            "PYHOVER_SNAPSHOTS" => Some("/a.json:/b.json".to_string()),
            _ => None,
        };
        let config = apply_env_overrides(PyhoverConfig::default(), env).unwrap();
        assert_eq!(config.registry.import_timeout_ms, 250);
        assert_eq!(config.registry.snapshots.len(), 2);

        let bad = |key: &str| (key == "PYHOVER_IMPORT_TIMEOUT_MS").then(|| "soon".to_string());
        assert!(apply_env_overrides(PyhoverConfig::default(), bad).is_err());
    }
}
