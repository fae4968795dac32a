//! Source positions of stylesheet nodes.

use serde::Serialize;

/// A 1-based line/column location in the source document.
///
/// Field order matters: the derived `Ord` compares `line` first and then
/// `column`, which is the only ordering used for ignore-zone membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// True when `self` is at or after `other`.
    pub fn is_at_or_after(&self, other: &Position) -> bool {
        self >= other
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Inclusive source span of a node: `start` is its first character and `end`
/// its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// True when `inner` lies entirely within `self`.
    pub fn encloses(&self, inner: &Span) -> bool {
        inner.start.is_at_or_after(&self.start) && self.end.is_at_or_after(&inner.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_line_then_column() {
        let a = Position::new(1, 40);
        let b = Position::new(2, 1);
        assert!(b.is_at_or_after(&a));
        assert!(!a.is_at_or_after(&b));
        assert!(a.is_at_or_after(&Position::new(1, 40)));
        assert!(!Position::new(1, 39).is_at_or_after(&a));
    }

    #[test]
    fn span_encloses_bounds_inclusively() {
        let zone = Span::new(Position::new(1, 10), Position::new(3, 1));
        assert!(zone.encloses(&Span::new(Position::new(1, 10), Position::new(3, 1))));
        assert!(zone.encloses(&Span::new(Position::new(2, 1), Position::new(2, 30))));
        assert!(!zone.encloses(&Span::new(Position::new(1, 9), Position::new(2, 1))));
        assert!(!zone.encloses(&Span::new(Position::new(2, 1), Position::new(3, 2))));
    }
}
