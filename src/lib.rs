//! pyhover - Python hover intelligence
//!
//! Locates the syntactic construct under a cursor in Python source and
//! resolves dotted paths to documentation metadata through an injected
//! module registry.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod models;
pub mod services;

use std::sync::{Arc, OnceLock};

pub use error::{PyhoverError, PyhoverResult};

use infra::registry::CatalogRegistry;
use models::symbol::{ResolutionError, ResolveResponse};
use services::locator::PositionLocator;
use services::resolver::{DefaultSymbolResolver, SymbolResolver};

/// Label of the smallest construct containing the cursor
///
/// `line` is 1-based, `column` a 0-based byte offset. Returns `None` for
/// unparsable source or positions with no labelled construct.
pub fn locate_symbol_kind(source: &str, line: u32, column: u32) -> Option<String> {
    PositionLocator::new()
        .and_then(|locator| locator.locate(source, line, column))
        .ok()
        .flatten()
}

/// Resolve a dotted path against the bundled standard library snapshot
pub async fn resolve_symbol(path: &str) -> ResolveResponse {
    static REGISTRY: OnceLock<Option<Arc<CatalogRegistry>>> = OnceLock::new();

    let registry = REGISTRY.get_or_init(|| match CatalogRegistry::bundled() {
        Ok(registry) => Some(Arc::new(registry)),
        Err(e) => {
            tracing::error!("Bundled snapshot unusable: {}", e);
            None
        }
    });

    match registry {
        Some(registry) => {
            DefaultSymbolResolver::new(registry.clone(), config::canonical_aliases())
                .resolve(path)
                .await
                .into()
        }
        None => ResolveResponse::Error(ResolutionError::new(format!("Could not resolve {path}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_symbol_kind() {
        assert_eq!(locate_symbol_kind("x = 1.5\n", 1, 5).as_deref(), Some("float"));
        assert_eq!(locate_symbol_kind("x = (\n", 1, 4), None);
    }

    #[test]
    fn test_resolve_symbol() {
        let response = tokio_test::block_on(resolve_symbol("os.path.join"));
        assert_eq!(response.symbol().unwrap().module, "os.path");

        let json = serde_json::to_value(tokio_test::block_on(resolve_symbol("zzz.not.real"))).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Could not resolve zzz.not.real"}));
    }
}
