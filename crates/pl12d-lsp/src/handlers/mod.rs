//! LSP request handlers.
//!
//! Each handler answers one request against a syntax tree parsed from a
//! snapshot of the document text.

pub mod completion;
pub mod definition;
mod describe;
pub mod formatting;
pub mod hover;

use lsp_types::{Position, Range};
use pl12d_syntax::{Point, Span};

/// Convert a wire position to a tree point. Columns are passed through
/// unchanged, so both sides count bytes.
pub fn to_point(position: Position) -> Point {
    Point::new(position.line, position.character)
}

/// Convert a tree point to a wire position.
pub fn to_position(point: Point) -> Position {
    Position::new(point.row, point.column)
}

/// Convert a node span to a wire range.
pub fn to_range(span: Span) -> Range {
    Range::new(to_position(span.start), to_position(span.end))
}
