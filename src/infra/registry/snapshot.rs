//! Introspection snapshots
//!
//! A snapshot is a JSON dump of what a Python runtime exposes: runtime facts,
//! keyword help text and a tree of modules with their members. Several
//! snapshots can be merged (later ones win per module), then built into the
//! shared entity graph a [`CatalogRegistry`](super::CatalogRegistry) serves.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::RuntimeInfo;
use super::entity::{Class, Entity, Function, Module, ModuleHandle, Value};
use crate::error::SnapshotError;

/// Name of the root builtin namespace
pub const BUILTINS: &str = "builtins";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub runtime: Option<RuntimeSpec>,

    #[serde(default)]
    pub keywords: BTreeMap<String, String>,

    #[serde(default)]
    pub modules: IndexMap<String, ModuleSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSpec {
    /// Full version string, e.g. `3.11.4`
    pub version: String,

    #[serde(default)]
    pub builtin_module_names: Vec<String>,

    /// Absent on runtimes that predate `sys.stdlib_module_names`
    #[serde(default)]
    pub stdlib_module_names: Option<Vec<String>>,

    #[serde(default)]
    pub stdlib_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleSpec {
    #[serde(default)]
    pub doc: Option<String>,

    #[serde(default)]
    pub origin: Option<PathBuf>,

    #[serde(default)]
    pub package: bool,

    /// Registry name bound to the same module object as another entry
    #[serde(default)]
    pub alias_of: Option<String>,

    /// Error the module raised while being imported
    #[serde(default)]
    pub load_error: Option<String>,

    #[serde(default)]
    pub members: IndexMap<String, MemberSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberSpec {
    Function(FunctionSpec),
    Class(ClassSpec),
    Module { target: String },
    Value(ValueSpec),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionSpec {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub qualname: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassSpec {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub qualname: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub exception: bool,
    #[serde(default)]
    pub members: IndexMap<String, MemberSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueSpec {
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub repr: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub callable: bool,
    /// Class of the value as `module.Class`; a bare name means `builtins`
    #[serde(default)]
    pub class: Option<String>,
}

impl Snapshot {
    pub fn from_json(source_name: &str, json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::parse(source_name, e))
    }

    /// Layer `other` over `self`
    pub fn merge(&mut self, other: Snapshot) {
        if other.runtime.is_some() {
            self.runtime = other.runtime;
        }
        self.keywords.extend(other.keywords);
        self.modules.extend(other.modules);
    }

    pub fn build(&self) -> Result<BuiltCatalog, SnapshotError> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| SnapshotError::parse("snapshot", "missing runtime section"))
            .and_then(RuntimeInfo::from_spec)?;

        if !self.modules.contains_key(BUILTINS) {
            return Err(SnapshotError::parse(
                "snapshot",
                "missing builtins module",
            ));
        }

        let mut builder = Builder {
            specs: &self.modules,
            built: HashMap::new(),
            in_progress: HashSet::new(),
        };

        let mut modules = IndexMap::with_capacity(self.modules.len());
        for name in self.modules.keys() {
            let handle = builder.module(name)?;
            modules.insert(name.clone(), handle);
        }

        let load_errors = self
            .modules
            .iter()
            .filter_map(|(name, spec)| spec.load_error.clone().map(|e| (name.clone(), e)))
            .collect();

        Ok(BuiltCatalog {
            runtime,
            keywords: self.keywords.clone(),
            modules,
            load_errors,
        })
    }
}

/// Entity graph produced from a snapshot
#[derive(Debug)]
pub struct BuiltCatalog {
    pub runtime: RuntimeInfo,
    pub keywords: BTreeMap<String, String>,
    pub modules: IndexMap<String, ModuleHandle>,
    pub load_errors: HashMap<String, String>,
}

impl RuntimeInfo {
    fn from_spec(spec: &RuntimeSpec) -> Result<Self, SnapshotError> {
        let mut parts = spec.version.split('.');
        let major = parts.next().and_then(|p| p.parse().ok());
        let minor = parts
            .next()
            .and_then(|p| p.trim_end_matches(|c: char| !c.is_ascii_digit()).parse().ok());
        let (Some(major), Some(minor)) = (major, minor) else {
            return Err(SnapshotError::parse(
                "snapshot",
                format!("invalid runtime version '{}'", spec.version),
            ));
        };

        Ok(Self {
            version: spec.version.clone(),
            major,
            minor,
            builtin_module_names: spec.builtin_module_names.iter().cloned().collect(),
            stdlib_module_names: spec
                .stdlib_module_names
                .as_ref()
                .map(|names| names.iter().cloned().collect::<BTreeSet<_>>()),
            stdlib_root: spec.stdlib_root.clone(),
        })
    }
}

struct Builder<'a> {
    specs: &'a IndexMap<String, ModuleSpec>,
    built: HashMap<String, ModuleHandle>,
    in_progress: HashSet<String>,
}

impl Builder<'_> {
    fn module(&mut self, name: &str) -> Result<ModuleHandle, SnapshotError> {
        if let Some(handle) = self.built.get(name) {
            return Ok(Arc::clone(handle));
        }
        if !self.in_progress.insert(name.to_string()) {
            return Err(SnapshotError::Cycle(name.to_string()));
        }

        let specs = self.specs;
        let spec = specs.get(name).ok_or_else(|| SnapshotError::UnknownModule {
            module: name.to_string(),
            target: name.to_string(),
        })?;

        let handle = match &spec.alias_of {
            Some(target) => {
                if !specs.contains_key(target) {
                    return Err(SnapshotError::UnknownModule {
                        module: name.to_string(),
                        target: target.clone(),
                    });
                }
                self.module(target)?
            }
            None => Arc::new(self.build_module(name, spec)?),
        };

        self.in_progress.remove(name);
        self.built.insert(name.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    fn build_module(&mut self, name: &str, spec: &ModuleSpec) -> Result<Module, SnapshotError> {
        let mut module = Module::new(name);
        module.doc = spec.doc.clone();
        module.origin = spec.origin.clone();
        module.package = spec.package;

        let mut local_classes: HashMap<String, Arc<Class>> = HashMap::new();
        for (member, member_spec) in &spec.members {
            let entity = match member_spec {
                MemberSpec::Module { target } => {
                    if !self.specs.contains_key(target) {
                        return Err(SnapshotError::UnknownModule {
                            module: name.to_string(),
                            target: target.clone(),
                        });
                    }
                    Entity::Module(self.module(target)?)
                }
                other => self.build_member(name, None, member, other, &local_classes)?,
            };
            if let Entity::Class(class) = &entity {
                local_classes.insert(member.clone(), Arc::clone(class));
            }
            module.members.insert(member.clone(), entity);
        }
        Ok(module)
    }

    /// Build a function, class or value declared in `module`, optionally
    /// nested in the class whose qualified name is `owner`
    fn build_member(
        &mut self,
        module: &str,
        owner: Option<&str>,
        name: &str,
        spec: &MemberSpec,
        local_classes: &HashMap<String, Arc<Class>>,
    ) -> Result<Entity, SnapshotError> {
        let default_qualname = match owner {
            Some(owner) => format!("{owner}.{name}"),
            None => name.to_string(),
        };

        match spec {
            MemberSpec::Function(f) => Ok(Entity::Function(Arc::new(Function {
                name: name.to_string(),
                qualname: f.qualname.clone().unwrap_or(default_qualname),
                module: Some(f.module.clone().unwrap_or_else(|| module.to_string())),
                doc: f.doc.clone(),
                signature: f.signature.clone(),
            }))),
            MemberSpec::Class(c) => {
                let qualname = c.qualname.clone().unwrap_or(default_qualname);
                let mut members = IndexMap::with_capacity(c.members.len());
                for (member, member_spec) in &c.members {
                    if let MemberSpec::Module { target } = member_spec {
                        return Err(SnapshotError::parse(
                            module,
                            format!("class '{qualname}' cannot hold module reference '{target}'"),
                        ));
                    }
                    let entity = self.build_member(
                        module,
                        Some(&qualname),
                        member,
                        member_spec,
                        local_classes,
                    )?;
                    members.insert(member.clone(), entity);
                }
                Ok(Entity::Class(Arc::new(Class {
                    name: name.to_string(),
                    qualname,
                    module: c.module.clone().unwrap_or_else(|| module.to_string()),
                    doc: c.doc.clone(),
                    signature: c.signature.clone(),
                    exception: c.exception,
                    members,
                })))
            }
            MemberSpec::Value(v) => {
                let class = match &v.class {
                    Some(path) => Some(self.resolve_class(module, path, local_classes)?),
                    None => None,
                };
                Ok(Entity::Value(Arc::new(Value {
                    name: name.to_string(),
                    type_name: v.type_name.clone(),
                    repr: v.repr.clone(),
                    doc: v.doc.clone(),
                    callable: v.callable,
                    class,
                })))
            }
            MemberSpec::Module { target } => Err(SnapshotError::UnknownModule {
                module: module.to_string(),
                target: target.clone(),
            }),
        }
    }

    /// Classes referenced from the module being built must be declared
    /// earlier in that module
    fn resolve_class(
        &mut self,
        module: &str,
        path: &str,
        local_classes: &HashMap<String, Arc<Class>>,
    ) -> Result<Arc<Class>, SnapshotError> {
        let (owner, class_name) = path.rsplit_once('.').unwrap_or((BUILTINS, path));
        let unknown = || SnapshotError::UnknownClass {
            class: path.to_string(),
            owner: owner.to_string(),
        };

        if owner == module {
            return local_classes.get(class_name).cloned().ok_or_else(unknown);
        }
        if !self.specs.contains_key(owner) {
            return Err(unknown());
        }
        let handle = self.module(owner)?;
        match handle.members.get(class_name) {
            Some(Entity::Class(class)) => Ok(Arc::clone(class)),
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "runtime": {"version": "3.11.4", "builtin_module_names": ["builtins", "sys"]},
        "modules": {
            "builtins": {
                "members": {
                    "str": {"kind": "class", "doc": "str(object='') -> str"},
                    "len": {"kind": "function", "signature": "(obj, /)"}
                }
            },
            "posixpath": {"members": {"sep": {"kind": "value", "type": "str", "repr": "'/'", "class": "str"}}},
            "os": {"members": {"path": {"kind": "module", "target": "posixpath"}}},
            "os.path": {"alias_of": "posixpath"}
        }
    }"#;

    #[test]
    fn test_build_shares_alias_objects() {
        let snapshot = Snapshot::from_json("minimal", MINIMAL).unwrap();
        let catalog = snapshot.build().unwrap();

        let posixpath = &catalog.modules["posixpath"];
        assert!(Arc::ptr_eq(posixpath, &catalog.modules["os.path"]));
        match catalog.modules["os"].members.get("path") {
            Some(Entity::Module(m)) => assert!(Arc::ptr_eq(m, posixpath)),
            other => panic!("unexpected member: {other:?}"),
        }
        assert_eq!(catalog.runtime.major, 3);
        assert_eq!(catalog.runtime.minor, 11);
        assert!(catalog.runtime.stdlib_module_names.is_none());
    }

    #[test]
    fn test_value_class_reference_resolves_to_builtins() {
        let catalog = Snapshot::from_json("minimal", MINIMAL).unwrap().build().unwrap();
        let sep = catalog.modules["posixpath"].members.get("sep").unwrap();
        assert_eq!(sep.declared_module(), Some("builtins"));
        assert_eq!(sep.docstring().as_deref(), Some("str(object='') -> str"));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let json = r#"{
            "runtime": {"version": "3.12.0"},
            "modules": {
                "builtins": {},
                "a": {"members": {"b": {"kind": "module", "target": "b"}}},
                "b": {"members": {"a": {"kind": "module", "target": "a"}}}
            }
        }"#;
        let err = Snapshot::from_json("cyclic", json).unwrap().build().unwrap_err();
        assert!(matches!(err, SnapshotError::Cycle(_)));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let json = r#"{
            "runtime": {"version": "3.12.0"},
            "modules": {
                "builtins": {},
                "os.path": {"alias_of": "posixpath"}
            }
        }"#;
        let err = Snapshot::from_json("dangling", json).unwrap().build().unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownModule { .. }));
    }

    #[test]
    fn test_missing_runtime_or_builtins() {
        let err = Snapshot::from_json("empty", r#"{"modules": {"builtins": {}}}"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("runtime"));

        let err = Snapshot::from_json("empty", r#"{"runtime": {"version": "3.12"}}"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("builtins"));
    }

    #[test]
    fn test_merge_layers_modules() {
        let mut base = Snapshot::from_json("minimal", MINIMAL).unwrap();
        let extra = Snapshot::from_json(
            "requests",
            r#"{"modules": {"requests": {"origin": "/site-packages/requests/__init__.py", "package": true}}}"#,
        )
        .unwrap();
        base.merge(extra);

        assert!(base.runtime.is_some());
        let catalog = base.build().unwrap();
        assert!(catalog.modules["requests"].package);
    }

    #[test]
    fn test_class_member_qualnames() {
        let json = r#"{
            "runtime": {"version": "3.12.1"},
            "modules": {
                "builtins": {"members": {
                    "list": {"kind": "class", "members": {
                        "append": {"kind": "function", "signature": "(self, object, /)"}
                    }}
                }}
            }
        }"#;
        let catalog = Snapshot::from_json("list", json).unwrap().build().unwrap();
        let builtins = Entity::Module(Arc::clone(&catalog.modules["builtins"]));
        let append = builtins.traverse(["list", "append"]).unwrap();
        assert_eq!(append.qualname(), Some("list.append"));
        assert_eq!(append.declared_module(), Some("builtins"));
    }
}
