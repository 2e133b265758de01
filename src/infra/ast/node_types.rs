//! Tree-sitter Node Type Mappings
//!
//! Maps tree-sitter-python node types (from `src/node-types.json`) onto the
//! small taxonomy the locator classifies, and lists the grammar nodes that
//! have no counterpart in a Python AST.

use std::fmt;

/// Syntax categories the locator distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    List,
    Dict,
    Set,
    Tuple,
    Str,
    FString,
    Bytes,
    Int,
    Float,
    Complex,
    Bool,
    NoneLiteral,
    FunctionDef,
    AsyncFunctionDef,
    ClassDef,
    Other,
}

impl SyntaxKind {
    /// Category label for literal kinds; definitions and `Other` have none
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::List => Some("list"),
            Self::Dict => Some("dict"),
            Self::Set => Some("set"),
            Self::Tuple => Some("tuple"),
            Self::Str => Some("str"),
            Self::FString => Some("f-string"),
            Self::Bytes => Some("bytes"),
            Self::Int => Some("int"),
            Self::Float => Some("float"),
            Self::Complex => Some("complex"),
            Self::Bool => Some("bool"),
            Self::NoneLiteral => Some("None"),
            Self::FunctionDef | Self::AsyncFunctionDef | Self::ClassDef | Self::Other => None,
        }
    }

    pub fn is_function(self) -> bool {
        matches!(self, Self::FunctionDef | Self::AsyncFunctionDef)
    }

    /// Definitions that contribute a segment to qualified names
    pub fn is_definition(self) -> bool {
        matches!(
            self,
            Self::FunctionDef | Self::AsyncFunctionDef | Self::ClassDef
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FunctionDef => "function",
            Self::AsyncFunctionDef => "async function",
            Self::ClassDef => "class",
            Self::Other => "other",
            literal => literal.label().unwrap_or("other"),
        };
        f.write_str(s)
    }
}

/// Node type mapping entry
#[derive(Debug, Clone, Copy)]
struct NodeType {
    /// Category the node classifies as
    kind: SyntaxKind,
    /// Actual tree-sitter node type
    node_type: &'static str,
}

impl NodeType {
    const fn new(kind: SyntaxKind, node_type: &'static str) -> Self {
        Self { kind, node_type }
    }
}

/// Look up the base category of a node type
///
/// Strings and numbers are refined from their source text afterwards, see
/// [`string_kind`] and [`number_kind`].
pub fn kind_for(node_type: &str) -> SyntaxKind {
    PYTHON
        .iter()
        .find(|n| n.node_type == node_type)
        .map(|n| n.kind)
        .unwrap_or(SyntaxKind::Other)
}

/// Nodes without a Python AST counterpart; their children attach to the
/// nearest recorded ancestor instead
pub fn is_transparent(node_type: &str) -> bool {
    TRANSPARENT.contains(&node_type)
}

/// Python 2 statements the grammar still accepts
pub fn is_python2_only(node_type: &str) -> bool {
    PYTHON2_ONLY.contains(&node_type)
}

/// Tokens the grammar treats as extras; they are never statements
pub fn is_extra(node_type: &str) -> bool {
    matches!(node_type, "comment" | "line_continuation")
}

/// Classify a string literal by its prefix (`f"..."`, `rb'...'`)
pub fn string_kind(text: &str) -> SyntaxKind {
    let prefix = text
        .split(['"', '\''])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if prefix.contains('f') {
        SyntaxKind::FString
    } else if prefix.contains('b') {
        SyntaxKind::Bytes
    } else {
        SyntaxKind::Str
    }
}

/// Imaginary literals (`2j`, `1.5J`) parse as integer or float nodes
pub fn number_kind(base: SyntaxKind, text: &str) -> SyntaxKind {
    if text.ends_with(['j', 'J']) {
        SyntaxKind::Complex
    } else {
        base
    }
}

// =============================================================================
// Python - tree-sitter-python/src/node-types.json
// =============================================================================
const PYTHON: &[NodeType] = &[
    NodeType::new(SyntaxKind::List, "list"),
    NodeType::new(SyntaxKind::List, "list_comprehension"),
    NodeType::new(SyntaxKind::List, "list_pattern"),
    NodeType::new(SyntaxKind::Dict, "dictionary"),
    NodeType::new(SyntaxKind::Dict, "dictionary_comprehension"),
    NodeType::new(SyntaxKind::Set, "set"),
    NodeType::new(SyntaxKind::Set, "set_comprehension"),
    NodeType::new(SyntaxKind::Tuple, "tuple"),
    NodeType::new(SyntaxKind::Tuple, "expression_list"),
    NodeType::new(SyntaxKind::Tuple, "pattern_list"),
    NodeType::new(SyntaxKind::Tuple, "tuple_pattern"),
    NodeType::new(SyntaxKind::Str, "string"),
    NodeType::new(SyntaxKind::Str, "concatenated_string"),
    NodeType::new(SyntaxKind::Int, "integer"),
    NodeType::new(SyntaxKind::Float, "float"),
    NodeType::new(SyntaxKind::Bool, "true"),
    NodeType::new(SyntaxKind::Bool, "false"),
    NodeType::new(SyntaxKind::NoneLiteral, "none"),
    NodeType::new(SyntaxKind::FunctionDef, "function_definition"),
    NodeType::new(SyntaxKind::ClassDef, "class_definition"),
];

const PYTHON2_ONLY: &[&str] = &["print_statement", "exec_statement", "chevron"];

const TRANSPARENT: &[&str] = &[
    "module",
    "block",
    "parameters",
    "expression_statement",
    "parenthesized_expression",
    "decorated_definition",
    "type",
    "pair",
    "comment",
    "string_start",
    "string_content",
    "string_end",
    "escape_sequence",
];
