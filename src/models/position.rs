//! Source position types
//!
//! Positions follow the Python AST convention: lines are 1-based, columns are
//! 0-based UTF-8 byte offsets within the line.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Position within a source file (1-based line, 0-based column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Convert a 0-indexed tree-sitter point to a Python-style position
    pub fn from_point(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row as u32 + 1,
            column: point.column as u32,
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

/// Inclusive source interval occupied by a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Weight of one line relative to one column when comparing spans
    pub const LINE_WEIGHT: u64 = 10_000;

    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end >= start, "span end precedes start");
        Self { start, end }
    }

    /// Whether the cursor lies inside the span, both boundaries inclusive
    pub fn contains(&self, line: u32, column: u32) -> bool {
        if line < self.start.line || line > self.end.line {
            return false;
        }
        if line == self.start.line && column < self.start.column {
            return false;
        }
        if line == self.end.line && column > self.end.column {
            return false;
        }
        true
    }

    /// Size metric where any line difference outweighs column differences
    pub fn size(&self) -> u64 {
        let lines = u64::from(self.end.line - self.start.line);
        let columns = i64::from(self.end.column) - i64::from(self.start.column);
        (lines * Self::LINE_WEIGHT).saturating_add_signed(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(sl: u32, sc: u32, el: u32, ec: u32) -> Span {
        Span::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn test_contains_single_line_boundaries() {
        let s = span(3, 4, 3, 10);
        assert!(s.contains(3, 4));
        assert!(s.contains(3, 10));
        assert!(s.contains(3, 7));
        assert!(!s.contains(3, 3));
        assert!(!s.contains(3, 11));
        assert!(!s.contains(2, 5));
        assert!(!s.contains(4, 5));
    }

    #[test]
    fn test_contains_multi_line_ignores_columns_in_middle() {
        let s = span(1, 8, 5, 2);
        assert!(s.contains(3, 0));
        assert!(s.contains(3, 500));
        assert!(!s.contains(1, 7));
        assert!(s.contains(5, 2));
        assert!(!s.contains(5, 3));
    }

    #[test]
    fn test_size_prefers_fewer_lines() {
        // A wide single-line node is still smaller than a narrow two-line node
        assert!(span(1, 0, 1, 9000).size() < span(1, 5, 2, 0).size());
        assert_eq!(span(2, 4, 2, 9).size(), 5);
        // Column deltas may be negative on multi-line spans
        assert_eq!(span(1, 8, 2, 2).size(), 9_994);
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(2, 0) > Position::new(1, 99));
        assert!(Position::new(1, 3) < Position::new(1, 4));
    }
}
