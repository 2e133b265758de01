//! Python syntax infrastructure
//!
//! Tree-sitter parsing flattened into a parent-linked arena, with the node
//! type table used to classify what sits under a cursor.

pub mod node_types;
pub mod tree;

pub use node_types::{SyntaxKind, is_transparent, kind_for};
pub use tree::{NodeId, SyntaxNode, SyntaxTree};

/// A parser configured for the Python grammar
pub fn python_parser() -> Result<tree_sitter::Parser, tree_sitter::LanguageError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into())?;
    Ok(parser)
}
