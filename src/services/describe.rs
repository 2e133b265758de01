//! Entity to documentation record

use std::sync::Arc;

use super::classifier::ModuleClassifier;
use crate::infra::registry::{BUILTINS, Entity, EntityKind, ModuleRegistry};
use crate::models::symbol::{ResolvedSymbol, SymbolKind};

const DOCS_BASE: &str = "https://docs.python.org";

#[derive(Clone)]
pub struct DescriptionBuilder {
    registry: Arc<dyn ModuleRegistry>,
    classifier: ModuleClassifier,
}

impl DescriptionBuilder {
    pub fn new(registry: Arc<dyn ModuleRegistry>, classifier: ModuleClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Describe `entity`, reached through `access_module` under `display_name`
    pub fn describe(&self, entity: &Entity, access_module: &str, display_name: &str) -> ResolvedSymbol {
        let module = self.defining_module(entity, access_module);
        let qualname = entity
            .qualname()
            .map(str::to_string)
            .or_else(|| non_empty(display_name))
            .or_else(|| non_empty(entity.name()))
            .unwrap_or_else(|| entity.repr());
        let is_stdlib = self.classifier.is_standard_library(&module);
        let url = is_stdlib.then(|| self.documentation_url(entity, &module, &qualname));

        let kind = if entity.kind() == EntityKind::Module {
            SymbolKind::Module
        } else if module == BUILTINS {
            SymbolKind::Builtin
        } else if is_stdlib {
            SymbolKind::StdlibMember
        } else {
            SymbolKind::ThirdPartyMember
        };

        ResolvedSymbol {
            docstring: entity.docstring(),
            signature: entity.signature(),
            module,
            qualname,
            is_stdlib,
            url,
            kind,
        }
    }

    /// Record for a reserved word
    pub fn keyword(&self, keyword: &str) -> ResolvedSymbol {
        ResolvedSymbol {
            docstring: self.registry.keyword_help(keyword),
            signature: None,
            module: BUILTINS.to_string(),
            qualname: keyword.to_string(),
            is_stdlib: true,
            url: None,
            kind: SymbolKind::Keyword,
        }
    }

    fn defining_module(&self, entity: &Entity, access_module: &str) -> String {
        let Some(declared) = entity.declared_module() else {
            return access_module.to_string();
        };
        if declared == access_module || self.classifier.is_standard_library(access_module) {
            return access_module.to_string();
        }

        match self.registry.loaded(declared) {
            Some(handle) => self.classifier.canonicalize(access_module, &handle),
            None => access_module.to_string(),
        }
    }

    fn documentation_url(&self, entity: &Entity, module: &str, qualname: &str) -> String {
        let base = format!(
            "{}/{}/library",
            DOCS_BASE,
            self.registry.runtime().short_version()
        );

        let class_or_callable = entity.kind() == EntityKind::Class || entity.is_callable();
        let page = match module {
            BUILTINS if entity.is_exception() => "exceptions",
            BUILTINS if class_or_callable && !qualname.contains('.') => "functions",
            BUILTINS if class_or_callable => "stdtypes",
            other => other,
        };
        format!("{base}/{page}.html#{qualname}")
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::registry::{CatalogRegistry, Snapshot};

    fn builder() -> (Arc<CatalogRegistry>, DescriptionBuilder) {
        let registry = Arc::new(CatalogRegistry::bundled().unwrap());
        let classifier = ModuleClassifier::new(registry.clone(), vec!["os.path".to_string()]);
        (registry.clone(), DescriptionBuilder::new(registry, classifier))
    }

    fn member(registry: &CatalogRegistry, module: &str, path: &str) -> Entity {
        let handle = registry.load(module).unwrap();
        Entity::Module(handle).traverse(path.split('.')).unwrap()
    }

    #[test]
    fn test_access_module_wins_for_stdlib() {
        let (registry, builder) = builder();
        let join = member(&registry, "os.path", "join");
        let symbol = builder.describe(&join, "os.path", "os.path.join");

        assert_eq!(symbol.module, "os.path");
        assert_eq!(symbol.qualname, "join");
        assert_eq!(symbol.signature.as_deref(), Some("(a, *p)"));
        assert_eq!(
            symbol.url.as_deref(),
            Some("https://docs.python.org/3.11/library/os.path.html#join")
        );
        assert_eq!(symbol.kind, SymbolKind::StdlibMember);
    }

    #[test]
    fn test_builtin_url_routing() {
        let (registry, builder) = builder();
        let base = "https://docs.python.org/3.11/library";

        let len = member(&registry, BUILTINS, "len");
        let symbol = builder.describe(&len, BUILTINS, "len");
        assert_eq!(symbol.url, Some(format!("{base}/functions.html#len")));
        assert_eq!(symbol.kind, SymbolKind::Builtin);

        let append = member(&registry, BUILTINS, "list.append");
        let symbol = builder.describe(&append, BUILTINS, "list.append");
        assert_eq!(symbol.qualname, "list.append");
        assert_eq!(symbol.url, Some(format!("{base}/stdtypes.html#list.append")));

        let error = member(&registry, BUILTINS, "ValueError");
        let symbol = builder.describe(&error, BUILTINS, "ValueError");
        assert_eq!(symbol.url, Some(format!("{base}/exceptions.html#ValueError")));

        let dict = member(&registry, BUILTINS, "dict");
        let symbol = builder.describe(&dict, BUILTINS, "dict");
        assert_eq!(symbol.url, Some(format!("{base}/functions.html#dict")));
        assert!(symbol.signature.is_none());
    }

    #[test]
    fn test_builtin_values_link_to_builtins_page() {
        let (registry, builder) = builder();
        let base = "https://docs.python.org/3.11/library";

        let ellipsis = member(&registry, BUILTINS, "Ellipsis");
        let symbol = builder.describe(&ellipsis, BUILTINS, "Ellipsis");
        assert_eq!(symbol.kind, SymbolKind::Builtin);
        assert_eq!(symbol.url, Some(format!("{base}/builtins.html#Ellipsis")));

        let builtins = Entity::Module(registry.builtins());
        let symbol = builder.describe(&builtins, BUILTINS, BUILTINS);
        assert_eq!(symbol.kind, SymbolKind::Module);
        assert_eq!(symbol.url, Some(format!("{base}/builtins.html#builtins")));
    }

    #[test]
    fn test_third_party_reexport_takes_canonical_alias() {
        let mut snapshot = CatalogRegistry::bundled_snapshot().unwrap();
        snapshot.merge(
            Snapshot::from_json(
                "pathtools",
                r#"{"modules": {"pathtools": {
                    "origin": "/venv/lib/python3.11/site-packages/pathtools/__init__.py",
                    "members": {
                        "join": {"kind": "function", "module": "posixpath", "signature": "(a, *p)"},
                        "dumps": {"kind": "function", "module": "json", "signature": "(obj, **kw)"}
                    }
                }}}"#,
            )
            .unwrap(),
        );
        let registry = Arc::new(CatalogRegistry::from_snapshot(&snapshot).unwrap());
        let classifier = ModuleClassifier::new(registry.clone(), vec!["os.path".to_string()]);
        let builder = DescriptionBuilder::new(registry.clone(), classifier);

        let join = member(&registry, "pathtools", "join");
        let symbol = builder.describe(&join, "pathtools", "pathtools.join");
        assert_eq!(symbol.module, "os.path");
        assert!(symbol.is_stdlib);
        assert_eq!(symbol.kind, SymbolKind::StdlibMember);
        assert_eq!(
            symbol.url.as_deref(),
            Some("https://docs.python.org/3.11/library/os.path.html#join")
        );

        // No preferred alias for json, so the access module stays
        let dumps = member(&registry, "pathtools", "dumps");
        let symbol = builder.describe(&dumps, "pathtools", "pathtools.dumps");
        assert_eq!(symbol.module, "pathtools");
        assert!(!symbol.is_stdlib);
        assert!(symbol.url.is_none());
        assert_eq!(symbol.kind, SymbolKind::ThirdPartyMember);
    }

    #[test]
    fn test_module_entity() {
        let (registry, builder) = builder();
        let json = Entity::Module(registry.load("json").unwrap());
        let symbol = builder.describe(&json, "json", "json");

        assert_eq!(symbol.kind, SymbolKind::Module);
        assert_eq!(symbol.qualname, "json");
        assert!(symbol.signature.is_none());
        assert!(symbol.docstring.is_some());
        assert_eq!(
            symbol.url.as_deref(),
            Some("https://docs.python.org/3.11/library/json.html#json")
        );
    }

    #[test]
    fn test_value_uses_display_name() {
        let (registry, builder) = builder();
        let stdout = member(&registry, "sys", "stdout");
        let symbol = builder.describe(&stdout, "sys", "sys.stdout");

        assert_eq!(symbol.module, "sys");
        assert_eq!(symbol.qualname, "sys.stdout");
        assert!(symbol.signature.is_none());
        assert_eq!(symbol.kind, SymbolKind::StdlibMember);
    }

    #[test]
    fn test_keyword_record() {
        let (_, builder) = builder();
        let symbol = builder.keyword("for");

        assert_eq!(symbol.module, "builtins");
        assert_eq!(symbol.qualname, "for");
        assert!(symbol.is_stdlib);
        assert!(symbol.url.is_none());
        assert!(symbol.signature.is_none());
        assert!(symbol.docstring.is_some());
        assert_eq!(symbol.kind, SymbolKind::Keyword);
    }
}
