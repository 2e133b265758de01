//! Dotted path resolution
//!
//! Strategies run in a fixed order and the first one that produces an entity
//! wins:
//!
//! 1. reserved keywords
//! 2. an explicit `builtins.` prefix is dropped
//! 3. import descent, longest module prefix first
//! 4. lookup in the builtin namespace
//!
//! Load failures, timeouts and missing attributes only end the current
//! attempt. The caller sees either a record or a single unresolved error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::classifier::ModuleClassifier;
use super::describe::DescriptionBuilder;
use crate::infra::registry::{BUILTINS, Entity, ModuleRegistry};
use crate::infra::safe_import::SafeImporter;
use crate::models::symbol::{ResolutionError, ResolvedSymbol};

/// Reserved words of the Python grammar
pub const KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

#[async_trait]
pub trait SymbolResolver: Send + Sync {
    async fn resolve(&self, path: &str) -> Result<ResolvedSymbol, ResolutionError>;
}

pub struct DefaultSymbolResolver {
    importer: SafeImporter,
    describer: DescriptionBuilder,
    timeout: Duration,
}

impl DefaultSymbolResolver {
    pub fn new(registry: Arc<dyn ModuleRegistry>, canonical_aliases: Vec<String>) -> Self {
        let classifier = ModuleClassifier::new(Arc::clone(&registry), canonical_aliases);
        Self {
            importer: SafeImporter::new(Arc::clone(&registry)),
            describer: DescriptionBuilder::new(registry, classifier),
            timeout: crate::config::import_timeout(),
        }
    }

    /// Per-module load budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn registry(&self) -> &Arc<dyn ModuleRegistry> {
        self.importer.registry()
    }

    /// Drop a leading `builtins.` when the rest names a builtin
    fn strip_builtins<'a>(&self, path: &'a str) -> &'a str {
        match path.strip_prefix("builtins.") {
            Some(rest) => {
                let first = rest.split('.').next().unwrap_or_default();
                if self.registry().builtins().members.contains_key(first) {
                    tracing::debug!("Stripped builtins prefix: {}", rest);
                    rest
                } else {
                    path
                }
            }
            None => path,
        }
    }

    /// Returns the described entity, or whether any prefix loaded at all
    async fn import_descent(&self, path: &str, segments: &[&str]) -> Result<ResolvedSymbol, bool> {
        let mut any_loaded = false;

        for i in (1..=segments.len()).rev() {
            let module_name = segments[..i].join(".");
            let Some(module) = self.importer.load(&module_name, self.timeout).await else {
                continue;
            };
            any_loaded = true;

            match Entity::Module(module).traverse(segments[i..].iter().copied()) {
                Some(entity) => {
                    tracing::debug!("Resolved {} via module {}", path, module_name);
                    return Ok(self.describer.describe(&entity, &module_name, path));
                }
                None => {
                    tracing::debug!(
                        "Module {} has no attribute path {}",
                        module_name,
                        segments[i..].join(".")
                    );
                }
            }
        }

        Err(any_loaded)
    }

    fn builtins_fallback(&self, path: &str, segments: &[&str]) -> Option<ResolvedSymbol> {
        let builtins = Entity::Module(self.registry().builtins());
        let entity = builtins.traverse(segments.iter().copied())?;
        tracing::debug!("Resolved {} from builtins", path);
        Some(self.describer.describe(&entity, BUILTINS, path))
    }
}

#[async_trait]
impl SymbolResolver for DefaultSymbolResolver {
    async fn resolve(&self, path: &str) -> Result<ResolvedSymbol, ResolutionError> {
        let unresolved = || ResolutionError::new(format!("Could not resolve {path}"));

        if is_keyword(path) {
            return Ok(self.describer.keyword(path));
        }

        let target = self.strip_builtins(path);
        let segments: Vec<&str> = target.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(unresolved());
        }

        let any_loaded = match self.import_descent(target, &segments).await {
            Ok(symbol) => return Ok(symbol),
            Err(any_loaded) => any_loaded,
        };

        if !any_loaded && let Some(symbol) = self.builtins_fallback(target, &segments) {
            return Ok(symbol);
        }

        tracing::debug!("Could not resolve {}", path);
        Err(unresolved())
    }
}
