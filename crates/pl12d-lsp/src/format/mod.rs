//! Formatting engine.
//!
//! Four independent passes each produce edits against the original text:
//! block indentation, trailing whitespace, function signature spacing and
//! call argument spacing. Spacing edits only ever replace a gap of pure
//! whitespace between two tokens on one row, and indentation edits only
//! replace the leading blanks of a line, so the passes touch disjoint text.
//!
//! Formatting an already formatted document yields no edits.

mod arguments;
mod indentation;
mod signature;
mod whitespace;

pub use arguments::argument_edits;
pub use indentation::indentation_edits;
pub use signature::signature_edits;
pub use whitespace::trailing_whitespace_edits;

use lsp_types::{Position, Range, TextEdit};
use pl12d_syntax::{NodeId, SyntaxTree};

use crate::handlers::to_position;

/// Columns per nesting level.
pub const INDENT_WIDTH: usize = 4;

/// Compute one edit batch for the whole document.
///
/// The batch is sorted by position and its ranges do not overlap.
pub fn format_edits(tree: &SyntaxTree) -> Vec<TextEdit> {
    let mut edits = indentation_edits(tree);
    edits.extend(trailing_whitespace_edits(tree.source()));
    edits.extend(signature_edits(tree));
    edits.extend(argument_edits(tree));
    into_batch(edits)
}

/// Sort edits and drop any that would overlap an earlier one.
fn into_batch(mut edits: Vec<TextEdit>) -> Vec<TextEdit> {
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let mut batch: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(last) = batch.last() {
            if edit.range.start < last.range.end || edit.range == last.range {
                tracing::warn!(
                    kept = ?last.range,
                    dropped = ?edit.range,
                    "overlapping formatting edits"
                );
                continue;
            }
        }
        batch.push(edit);
    }
    batch
}

fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Replace the whitespace between two tokens on the same row.
///
/// Nothing is produced when the tokens sit on different rows, when the gap
/// holds anything but blanks, or when it already equals `replacement`.
fn respace(tree: &SyntaxTree, from: NodeId, to: NodeId, replacement: &str) -> Option<TextEdit> {
    let gap = tree.gap(from, to)?;
    if !is_blank(gap) || gap == replacement {
        return None;
    }
    Some(TextEdit::new(
        Range::new(
            to_position(tree.span(from).end),
            to_position(tree.span(to).start),
        ),
        replacement.to_string(),
    ))
}

/// Set the leading blanks of the line `node` starts to `width` spaces.
///
/// Nodes that do not begin their line are left alone.
fn reindent(tree: &SyntaxTree, node: NodeId, width: usize) -> Option<TextEdit> {
    if !tree.starts_line(node) {
        return None;
    }
    let target = " ".repeat(width);
    if tree.line_prefix(node) == target {
        return None;
    }
    let start = tree.span(node).start;
    Some(TextEdit::new(
        Range::new(Position::new(start.row, 0), to_position(start)),
        target,
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pl12d_syntax::SyntaxParser;

    pub(crate) fn parse(source: &str) -> SyntaxTree {
        SyntaxParser::new().unwrap().parse(source).unwrap()
    }

    fn offset(source: &str, position: Position) -> usize {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(position.line as usize)
            .map(str::len)
            .sum();
        line_start + position.character as usize
    }

    /// Apply a batch computed against `source`.
    pub(crate) fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
        let mut sorted = edits.to_vec();
        sorted.sort_by_key(|edit| (edit.range.start, edit.range.end));
        let mut result = source.to_string();
        for edit in sorted.iter().rev() {
            let start = offset(source, edit.range.start);
            let end = offset(source, edit.range.end);
            result.replace_range(start..end, &edit.new_text);
        }
        result
    }

    fn format(source: &str) -> String {
        apply_edits(source, &format_edits(&parse(source)))
    }

    #[test]
    fn test_formatted_document_has_no_edits() {
        let source = "// Adds two numbers.
Integer Add(Integer augend, Integer addend) {
    return augend + addend;
}

void main() {
    Integer result = Add(1, 2);
    if (result) {
        Print(\"ok\");
    } else if (result > 3) {
        Print();
    }
}
";
        assert!(format_edits(&parse(source)).is_empty());
    }

    #[test]
    fn test_formats_every_concern() {
        let source = "Integer   Add(Integer  augend,Integer addend)   {
  return augend + addend;
}
void main() {
Integer result = Add( 1 ,2 );
  if (result) {
        Print( );
  }
}
";
        let expected = "Integer Add(Integer augend, Integer addend) {
  return augend + addend;
}
void main() {
    Integer result = Add(1, 2);
    if (result) {
        Print();
    }
}
";
        assert_eq!(format(source), expected);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let source = "void   Loop(Integer  count ,
        Text label)
{
Integer i;
for (i = 0; i < count; i++) {
        while (i) {
      i = i - 1;
        }
}
    Print( label,  count );
}
";
        let once = format(source);
        let tree = parse(&once);
        assert!(
            format_edits(&tree).is_empty(),
            "second pass produced edits for:\n{once}"
        );
    }

    #[test]
    fn test_batch_is_sorted_and_disjoint() {
        let source = "void main() {\nInteger a = Foo( 1,2 );   \n  Integer b;\n}\n";
        let edits = format_edits(&parse(source));
        assert!(!edits.is_empty());
        for pair in edits.windows(2) {
            assert!(pair[0].range.end <= pair[1].range.start);
        }
    }

    #[test]
    fn test_overlapping_edits_are_dropped() {
        let edit = |start: u32, end: u32| {
            TextEdit::new(
                Range::new(Position::new(0, start), Position::new(0, end)),
                String::new(),
            )
        };
        let batch = into_batch(vec![edit(4, 8), edit(0, 2), edit(6, 9), edit(2, 3)]);
        let ranges: Vec<(u32, u32)> = batch
            .iter()
            .map(|edit| (edit.range.start.character, edit.range.end.character))
            .collect();
        assert_eq!(ranges, [(0, 2), (2, 3), (4, 8)]);
    }
}
