//! Per-query syntax arena
//!
//! A flattened copy of the tree-sitter tree holding only the nodes a Python
//! AST would have. Nodes live in a `Vec` in pre-order (parents before
//! children, siblings in source order) and refer to their parent by index.

use tree_sitter::{Node, Parser, Tree};

use super::node_types::{self, SyntaxKind};
use crate::models::position::{Position, Span};

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    /// Declared name, for definitions
    pub name: Option<String>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Parse `source`; `None` when it is not valid Python
    pub fn parse(parser: &mut Parser, source: &str) -> Option<Self> {
        let tree = parser.parse(source, None)?;
        if tree.root_node().has_error() {
            tracing::debug!("Source has syntax errors; skipping");
            return None;
        }
        if !Self::is_valid_python(&tree, source.as_bytes()) {
            tracing::debug!("Source is not valid Python 3; skipping");
            return None;
        }
        Some(Self::from_tree(&tree, source))
    }

    /// Catch what the grammar tolerates but CPython refuses: Python 2
    /// statements, backtick repr and broken indentation
    fn is_valid_python(tree: &Tree, source: &[u8]) -> bool {
        let mut cursor = tree.walk();
        let mut stack = vec![tree.root_node()];

        while let Some(node) = stack.pop() {
            let valid = match node.kind() {
                kind if node_types::is_python2_only(kind) => false,
                // The scanner opens a string on a backtick
                "string_start" => !node.utf8_text(source).is_ok_and(|t| t.ends_with('`')),
                "module" => {
                    let statements = Self::statements(node);
                    statements
                        .first()
                        .is_none_or(|first| first.start_position().column == 0)
                        && Self::aligned(&statements, 0)
                }
                "block" => Self::is_indented_block(node),
                _ => true,
            };
            if !valid {
                return false;
            }
            stack.extend(node.named_children(&mut cursor));
        }

        true
    }

    fn statements<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| !node_types::is_extra(child.kind()))
            .collect()
    }

    /// A suite needs at least one statement, indented past its header
    /// unless it shares the header's line
    fn is_indented_block(block: Node) -> bool {
        let statements = Self::statements(block);
        let Some(first) = statements.first() else {
            return false;
        };
        let start = first.start_position();
        let past_header = block.parent().is_none_or(|header| {
            let header = header.start_position();
            start.row == header.row || start.column > header.column
        });
        past_header && Self::aligned(&statements, start.column)
    }

    /// Statements opening a new line all start at `column`
    fn aligned(statements: &[Node], column: usize) -> bool {
        statements.windows(2).all(|pair| {
            let (prev, next) = (pair[0].start_position(), pair[1].start_position());
            next.row == prev.row || next.column == column
        })
    }

    pub fn from_tree(tree: &Tree, source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut nodes = Vec::new();
        let mut cursor = tree.walk();
        let mut stack: Vec<(Node, Option<NodeId>)> = vec![(tree.root_node(), None)];

        while let Some((node, parent)) = stack.pop() {
            let recorded = if Self::skip(node) {
                parent
            } else {
                nodes.push(SyntaxNode {
                    kind: Self::classify(node, bytes),
                    span: Span::new(
                        Position::from_point(node.start_position()),
                        Position::from_point(node.end_position()),
                    ),
                    name: Self::definition_name(node, bytes),
                    parent,
                });
                Some(nodes.len() - 1)
            };

            let name_id = Self::definition_name_node(node).map(|n| n.id());
            let children: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|child| Some(child.id()) != name_id)
                .collect();
            // Reversed so the first child is popped first
            stack.extend(children.into_iter().rev().map(|child| (child, recorded)));
        }

        Self { nodes }
    }

    fn skip(node: Node) -> bool {
        if node_types::is_transparent(node.kind()) {
            return true;
        }
        // Implicitly concatenated pieces form a single literal
        node.kind() == "string"
            && node
                .parent()
                .is_some_and(|p| p.kind() == "concatenated_string")
    }

    fn classify(node: Node, source: &[u8]) -> SyntaxKind {
        let base = node_types::kind_for(node.kind());
        let text = node.utf8_text(source).unwrap_or_default();
        match base {
            SyntaxKind::Str if node.kind() == "concatenated_string" => {
                let mut cursor = node.walk();
                let kinds: Vec<SyntaxKind> = node
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() == "string")
                    .map(|c| node_types::string_kind(c.utf8_text(source).unwrap_or_default()))
                    .collect();
                if kinds.contains(&SyntaxKind::FString) {
                    SyntaxKind::FString
                } else if !kinds.is_empty() && kinds.iter().all(|k| *k == SyntaxKind::Bytes) {
                    SyntaxKind::Bytes
                } else {
                    SyntaxKind::Str
                }
            }
            SyntaxKind::Str => node_types::string_kind(text),
            SyntaxKind::Int | SyntaxKind::Float => node_types::number_kind(base, text),
            SyntaxKind::FunctionDef if Self::is_async(node) => SyntaxKind::AsyncFunctionDef,
            other => other,
        }
    }

    fn is_async(node: Node) -> bool {
        node.child(0).is_some_and(|first| first.kind() == "async")
    }

    fn definition_name_node(node: Node) -> Option<Node> {
        match node.kind() {
            "function_definition" | "class_definition" => node.child_by_field_name("name"),
            _ => None,
        }
    }

    fn definition_name(node: Node, source: &[u8]) -> Option<String> {
        Self::definition_name_node(node)
            .and_then(|n| n.utf8_text(source).ok())
            .map(str::to_string)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    /// All nodes in traversal order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes.iter().enumerate()
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> {
        std::iter::successors(self.nodes[id].parent, |&p| self.nodes[p].parent)
            .map(|p| &self.nodes[p])
    }

    /// Smallest node containing the cursor; ties keep the earlier node in
    /// traversal order, i.e. the outer one
    pub fn smallest_containing(&self, line: u32, column: u32) -> Option<NodeId> {
        let mut best: Option<(NodeId, u64)> = None;
        for (id, node) in self.nodes() {
            if !node.span.contains(line, column) {
                continue;
            }
            let size = node.span.size();
            if best.is_none_or(|(_, min)| size < min) {
                best = Some((id, size));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Dotted name of a definition including every enclosing class or function
    pub fn qualified_name(&self, id: NodeId) -> Option<String> {
        let node = self.node(id);
        let mut segments = vec![node.name.as_deref()?];
        segments.extend(
            self.ancestors(id)
                .filter(|a| a.kind.is_definition())
                .filter_map(|a| a.name.as_deref()),
        );
        segments.reverse();
        Some(segments.join("."))
    }
}
