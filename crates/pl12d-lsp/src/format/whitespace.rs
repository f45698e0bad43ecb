//! Trailing whitespace.

use lsp_types::{Position, Range, TextEdit};

/// One edit per line that ends in spaces, deleting them.
///
/// Columns are byte offsets, matching the syntax tree. A `\r` before the
/// line feed is kept.
pub fn trailing_whitespace_edits(source: &str) -> Vec<TextEdit> {
    source
        .split('\n')
        .enumerate()
        .filter_map(|(row, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let kept = line.trim_end_matches(' ').len();
            if kept == line.len() {
                return None;
            }
            let row = row as u32;
            Some(TextEdit::new(
                Range::new(
                    Position::new(row, kept as u32),
                    Position::new(row, line.len() as u32),
                ),
                String::new(),
            ))
        })
        .collect()
}
