//! Application container for pyhover

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::OutputContext;
use crate::config;
use crate::error::PyhoverResult;
use crate::infra::registry::{CatalogRegistry, ModuleRegistry};
use crate::models::config::PyhoverConfig;
use crate::models::symbol::ResolveResponse;
use crate::services::config::{ConfigService, DefaultConfigService};
use crate::services::locator::PositionLocator;
use crate::services::resolver::{DefaultSymbolResolver, SymbolResolver};

pub struct App {
    root: PathBuf,
    pub(crate) output: OutputContext,
    pub(crate) locator: PositionLocator,
    pub(crate) resolver: Arc<dyn SymbolResolver>,
    pub(crate) registry: Arc<dyn ModuleRegistry>,
    pub(crate) config_service: Arc<dyn ConfigService>,
    pub(crate) config: PyhoverConfig,
}

impl App {
    pub async fn new() -> PyhoverResult<Self> {
        let root = std::env::current_dir()?;

        tracing::debug!("Initializing pyhover at {:?}", root);

        let config_service = Arc::new(DefaultConfigService::new(&root));
        let config = config_service.load(false).await?;

        // Initialize global config singleton (thread-safe, no unsafe)
        config::init(&config);

        Self::with_config(root, config, config_service).await
    }

    /// Build the registry described by `config`
    pub async fn with_config(
        root: PathBuf,
        config: PyhoverConfig,
        config_service: Arc<dyn ConfigService>,
    ) -> PyhoverResult<Self> {
        let registry =
            CatalogRegistry::load(config.registry.bundled, &config.registry.snapshots).await?;

        tracing::info!(
            "pyhover initialized (Python {}, {} snapshot(s))",
            registry.runtime().version,
            config.registry.snapshots.len() + usize::from(config.registry.bundled)
        );

        Self::from_parts(root, config, Arc::new(registry), config_service)
    }

    /// Assemble an app around an existing registry
    pub fn from_parts(
        root: PathBuf,
        config: PyhoverConfig,
        registry: Arc<dyn ModuleRegistry>,
        config_service: Arc<dyn ConfigService>,
    ) -> PyhoverResult<Self> {
        let resolver = DefaultSymbolResolver::new(
            Arc::clone(&registry),
            config.registry.canonical_aliases.clone(),
        )
        .with_timeout(config::RuntimeConfig::from(&config).import_timeout());

        Ok(Self {
            root,
            output: OutputContext::new(config.output.pretty),
            locator: PositionLocator::new()?,
            resolver: Arc::new(resolver),
            registry,
            config_service,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PyhoverConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<dyn ModuleRegistry> {
        &self.registry
    }

    pub fn set_output(&mut self, output: OutputContext) {
        self.output = output;
    }

    /// Label of the construct under the cursor; locate failures degrade to `None`
    pub fn locate(&self, source: &str, line: u32, column: u32) -> Option<String> {
        self.locator
            .locate(source, line, column)
            .unwrap_or_else(|e| {
                tracing::warn!("Locate failed: {}", e);
                None
            })
    }

    pub async fn resolve(&self, path: &str) -> ResolveResponse {
        self.resolver.resolve(path).await.into()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// App over the bundled snapshot, rooted in `root`
    pub(crate) fn bundled_app(root: &Path) -> App {
        let registry = Arc::new(CatalogRegistry::bundled().unwrap());
        let config_service = Arc::new(
            DefaultConfigService::new(root).with_global_path(root.join("global.toml")),
        );
        App::from_parts(
            root.to_path_buf(),
            PyhoverConfig::default(),
            registry,
            config_service,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_app_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let app = bundled_app(dir.path());

        assert_eq!(app.locate("x = {1: 2}\n", 1, 4).as_deref(), Some("dict"));
        assert_eq!(app.locate("x = (\n", 1, 4), None);

        let response = app.resolve("print").await;
        assert_eq!(response.symbol().unwrap().module, "builtins");
        assert!(app.resolve("no.such.thing").await.is_error());
        assert_eq!(app.root(), dir.path());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PyhoverConfig::default();
        config.registry.snapshots = vec![dir.path().join("absent.json")];
        let config_service = Arc::new(DefaultConfigService::new(dir.path()));

        let result = App::with_config(dir.path().to_path_buf(), config, config_service).await;
        assert!(matches!(result, Err(crate::error::PyhoverError::Snapshot(_))));
    }

    #[tokio::test]
    async fn test_without_bundled_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.json");
        std::fs::write(
            &path,
            r#"{"runtime": {"version": "3.13.0"}, "modules": {"builtins": {}}}"#,
        )
        .unwrap();
        let mut config = PyhoverConfig::default();
        config.registry.bundled = false;
        config.registry.snapshots = vec![path];
        let config_service = Arc::new(DefaultConfigService::new(dir.path()));

        let app = App::with_config(dir.path().to_path_buf(), config, config_service)
            .await
            .unwrap();
        assert_eq!(app.registry().runtime().short_version(), "3.13");
        assert!(app.resolve("os").await.is_error());
    }
}
