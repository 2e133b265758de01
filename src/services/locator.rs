//! Cursor position to syntax category

use std::sync::Mutex;

use tree_sitter::Parser;

use crate::error::LocateError;
use crate::infra::ast::{self, SyntaxKind, SyntaxTree};

pub struct PositionLocator {
    parser: Mutex<Parser>,
}

impl PositionLocator {
    pub fn new() -> Result<Self, LocateError> {
        let parser = ast::python_parser().map_err(|e| LocateError::Grammar(e.to_string()))?;
        Ok(Self {
            parser: Mutex::new(parser),
        })
    }

    /// Label for the smallest construct containing `line` (1-based) and
    /// `column` (0-based)
    ///
    /// `None` when the source does not parse, no node contains the position,
    /// or the node has no label.
    pub fn locate(&self, source: &str, line: u32, column: u32) -> Result<Option<String>, LocateError> {
        let tree = {
            let mut parser = self.parser.lock().map_err(|_| LocateError::LockPoisoned)?;
            SyntaxTree::parse(&mut parser, source)
        };
        let Some(tree) = tree else {
            return Ok(None);
        };

        let Some(id) = tree.smallest_containing(line, column) else {
            return Ok(None);
        };
        let node = tree.node(id);
        tracing::debug!("Cursor {}:{} is in {} at {:?}", line, column, node.kind, node.span);

        Ok(match node.kind {
            SyntaxKind::FunctionDef | SyntaxKind::AsyncFunctionDef => tree.qualified_name(id),
            kind => kind.label().map(str::to_string),
        })
    }
}
