//! Resolvable runtime entities
//!
//! Each category a dotted path can land on (module, class, function, bound
//! method, plain value) is a variant of [`Entity`]. They all answer the same
//! narrow set of questions: name, kind, docstring, signature, callability,
//! qualified name, declaring module and attribute lookup.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

/// Shared handle to a loaded module
pub type ModuleHandle = Arc<Module>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Module,
    Class,
    Function,
    Method,
    Value,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Value => "value",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub struct Module {
    pub name: String,
    pub doc: Option<String>,
    pub origin: Option<PathBuf>,
    pub package: bool,
    pub members: IndexMap<String, Entity>,
}

#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub qualname: String,
    pub module: String,
    pub doc: Option<String>,
    pub signature: Option<String>,
    pub exception: bool,
    pub members: IndexMap<String, Entity>,
}

#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub qualname: String,
    pub module: Option<String>,
    pub doc: Option<String>,
    pub signature: Option<String>,
}

/// A function bound to an instance, e.g. `sys.stdout.write`
#[derive(Debug, Clone)]
pub struct BoundMethod {
    pub receiver: String,
    pub function: Arc<Function>,
}

#[derive(Debug)]
pub struct Value {
    pub name: String,
    pub type_name: String,
    pub repr: String,
    pub doc: Option<String>,
    pub callable: bool,
    pub class: Option<Arc<Class>>,
}

#[derive(Debug, Clone)]
pub enum Entity {
    Module(ModuleHandle),
    Class(Arc<Class>),
    Function(Arc<Function>),
    Method(BoundMethod),
    Value(Arc<Value>),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Module(_) => EntityKind::Module,
            Self::Class(_) => EntityKind::Class,
            Self::Function(_) => EntityKind::Function,
            Self::Method(_) => EntityKind::Method,
            Self::Value(_) => EntityKind::Value,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Module(m) => &m.name,
            Self::Class(c) => &c.name,
            Self::Function(f) => &f.name,
            Self::Method(m) => &m.function.name,
            Self::Value(v) => &v.name,
        }
    }

    /// Qualified name, for the categories that carry one
    pub fn qualname(&self) -> Option<&str> {
        match self {
            Self::Class(c) => Some(&c.qualname),
            Self::Function(f) => Some(&f.qualname),
            Self::Method(m) => Some(&m.function.qualname),
            Self::Module(_) | Self::Value(_) => None,
        }
    }

    /// Module the entity declares as its home
    pub fn declared_module(&self) -> Option<&str> {
        match self {
            Self::Module(m) => Some(&m.name),
            Self::Class(c) => Some(&c.module),
            Self::Function(f) => f.module.as_deref(),
            Self::Method(m) => m.function.module.as_deref(),
            Self::Value(v) => v.class.as_ref().map(|c| c.module.as_str()),
        }
    }

    /// Cleaned documentation text; instances fall back to their class
    pub fn docstring(&self) -> Option<String> {
        let raw = match self {
            Self::Module(m) => m.doc.as_deref(),
            Self::Class(c) => c.doc.as_deref(),
            Self::Function(f) => f.doc.as_deref(),
            Self::Method(m) => m.function.doc.as_deref(),
            Self::Value(v) => v
                .doc
                .as_deref()
                .or_else(|| v.class.as_ref().and_then(|c| c.doc.as_deref())),
        };
        raw.map(clean_doc)
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Self::Class(_) | Self::Function(_) | Self::Method(_) => true,
            Self::Value(v) => v.callable,
            Self::Module(_) => false,
        }
    }

    /// Call signature text; `None` when not callable or not introspectable
    pub fn signature(&self) -> Option<String> {
        if !self.is_callable() {
            return None;
        }
        match self {
            Self::Class(c) => c.signature.clone(),
            Self::Function(f) => f.signature.clone(),
            Self::Method(m) => m.function.signature.as_deref().map(bind_signature),
            Self::Module(_) | Self::Value(_) => None,
        }
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Self::Class(c) if c.exception)
    }

    /// Attribute lookup; `None` is the attribute-error case
    pub fn attr(&self, name: &str) -> Option<Entity> {
        match self {
            Self::Module(m) => m.members.get(name).cloned(),
            Self::Class(c) => c.members.get(name).cloned(),
            Self::Value(v) => {
                let member = v.class.as_ref()?.members.get(name)?;
                Some(match member {
                    Self::Function(function) => Self::Method(BoundMethod {
                        receiver: v.repr.clone(),
                        function: Arc::clone(function),
                    }),
                    other => other.clone(),
                })
            }
            Self::Function(_) | Self::Method(_) => None,
        }
    }

    /// Walk a chain of attribute names
    pub fn traverse<'a>(&self, parts: impl IntoIterator<Item = &'a str>) -> Option<Entity> {
        let mut current = self.clone();
        for part in parts {
            current = current.attr(part)?;
        }
        Some(current)
    }

    /// Textual representation, the last-resort display name
    pub fn repr(&self) -> String {
        match self {
            Self::Module(m) => match &m.origin {
                Some(origin) => format!("<module '{}' from '{}'>", m.name, origin.display()),
                None => format!("<module '{}' (built-in)>", m.name),
            },
            Self::Class(c) => format!("<class '{}.{}'>", c.module, c.qualname),
            Self::Function(f) => format!("<function {}>", f.qualname),
            Self::Method(m) => format!(
                "<bound method {} of {}>",
                m.function.qualname, m.receiver
            ),
            Self::Value(v) if v.repr.is_empty() => format!("<{} object>", v.type_name),
            Self::Value(v) => v.repr.clone(),
        }
    }
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            origin: None,
            package: false,
            members: IndexMap::new(),
        }
    }
}

/// Drop the receiver parameter from an unbound signature
///
/// `(self, s, /)` becomes `(s, /)`; `(self)` becomes `()`.
pub fn bind_signature(signature: &str) -> String {
    let Some(inner) = signature
        .strip_prefix('(')
        .and_then(|rest| rest.rsplit_once(')'))
    else {
        return signature.to_string();
    };
    let (params, tail) = inner;
    let rest = match params.split_once(',') {
        Some((_, rest)) => rest.trim_start(),
        None => "",
    };
    let rest = match rest {
        "/" => "",
        _ => rest.strip_prefix("/, ").unwrap_or(rest),
    };
    format!("({rest}){tail}")
}

/// Normalize docstring indentation the way Python's `inspect.cleandoc` does
pub fn clean_doc(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let mut lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    // Counted in chars; indentation may hold multibyte whitespace
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let first = lines[0].trim_start().to_string();
    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(first);
    for line in lines.drain(1..) {
        let body = line.char_indices().nth(margin).map_or("", |(i, _)| &line[i..]);
        cleaned.push(body.trim_end().to_string());
    }

    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, qualname: &str, signature: Option<&str>) -> Arc<Function> {
        Arc::new(Function {
            name: name.to_string(),
            qualname: qualname.to_string(),
            module: None,
            doc: Some("Write string to stream.".to_string()),
            signature: signature.map(str::to_string),
        })
    }

    #[test]
    fn test_clean_doc_strips_common_indent() {
        let doc = "Summary line.\n\n    Details here.\n      Indented more.\n    ";
        assert_eq!(
            clean_doc(doc),
            "Summary line.\n\nDetails here.\n  Indented more."
        );
    }

    #[test]
    fn test_clean_doc_multibyte_indent() {
        let doc = "Summary.\n  Body.\n\u{3000}More.";
        assert_eq!(clean_doc(doc), "Summary.\n Body.\nMore.");
    }

    #[test]
    fn test_clean_doc_leading_blank_lines() {
        assert_eq!(clean_doc("\n    Only body.\n"), "Only body.");
        assert_eq!(clean_doc(""), "");
    }

    #[test]
    fn test_bind_signature() {
        assert_eq!(bind_signature("(self, s, /)"), "(s, /)");
        assert_eq!(bind_signature("(self)"), "()");
        assert_eq!(bind_signature("(self, /)"), "()");
        assert_eq!(bind_signature("(self, a, b=1) -> int"), "(a, b=1) -> int");
        assert_eq!(bind_signature("no parens"), "no parens");
    }

    #[test]
    fn test_value_attr_binds_methods() {
        let write = function("write", "TextIOWrapper.write", Some("(self, s, /)"));
        let mut members = IndexMap::new();
        members.insert("write".to_string(), Entity::Function(write));
        let class = Arc::new(Class {
            name: "TextIOWrapper".to_string(),
            qualname: "TextIOWrapper".to_string(),
            module: "_io".to_string(),
            doc: Some("Character and line based layer over a BufferedIOBase object.".to_string()),
            signature: None,
            exception: false,
            members,
        });
        let stdout = Entity::Value(Arc::new(Value {
            name: "stdout".to_string(),
            type_name: "TextIOWrapper".to_string(),
            repr: "<_io.TextIOWrapper name='<stdout>'>".to_string(),
            doc: None,
            callable: false,
            class: Some(class),
        }));

        assert_eq!(stdout.declared_module(), Some("_io"));
        assert!(stdout.docstring().unwrap().starts_with("Character"));
        assert!(stdout.signature().is_none());

        let method = stdout.attr("write").unwrap();
        assert_eq!(method.kind(), EntityKind::Method);
        assert_eq!(method.qualname(), Some("TextIOWrapper.write"));
        assert_eq!(method.signature().as_deref(), Some("(s, /)"));
        assert!(stdout.attr("missing").is_none());
    }

    #[test]
    fn test_traverse_stops_on_missing_attribute() {
        let mut module = Module::new("json");
        module.members.insert(
            "dumps".to_string(),
            Entity::Function(function("dumps", "dumps", Some("(obj, **kw)"))),
        );
        let entity = Entity::Module(Arc::new(module));

        assert!(entity.traverse(["dumps"]).is_some());
        assert!(entity.traverse(["dumps", "nope"]).is_none());
        assert_eq!(entity.traverse([]).unwrap().name(), "json");
        assert!(!entity.is_callable());
        assert_eq!(entity.repr(), "<module 'json' (built-in)>");
    }

    #[test]
    fn test_value_repr_falls_back_to_type() {
        let value = Entity::Value(Arc::new(Value {
            name: "handle".to_string(),
            type_name: "Handle".to_string(),
            repr: String::new(),
            doc: None,
            callable: false,
            class: None,
        }));
        assert_eq!(value.repr(), "<Handle object>");
    }
}
