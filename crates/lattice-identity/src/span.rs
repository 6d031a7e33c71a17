//! Source location types for diagnostics.
//!
//! Locations are captured from the scanner's current position at the time of
//! the triggering reduction; they are never re-derived from the tree.

use crate::FileId;

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
    pub line: u32,    // Start line (1-indexed)
    pub column: u32,  // Start column (1-indexed)
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        // miette uses (offset, length)
        (span.start, span.end - span.start).into()
    }
}

impl From<&Span> for miette::SourceSpan {
    fn from(span: &Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}

/// A span tied to the file it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Location {
    pub file: FileId,
    pub span: Span,
}

impl Location {
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_start_and_extends_end() {
        let a = Span::new(0, 3, 1, 1);
        let b = Span::new(10, 14, 2, 4);
        let m = a.merge(b);
        assert_eq!(m.start, 0);
        assert_eq!(m.end, 14);
        assert_eq!(m.line, 1);
    }

    #[test]
    fn span_to_source_span() {
        let s = Span::new(5, 9, 1, 6);
        let ss: miette::SourceSpan = s.into();
        assert_eq!(ss.offset(), 5);
        assert_eq!(ss.len(), 4);
    }
}
