//! Call argument spacing.

use lsp_types::TextEdit;
use pl12d_syntax::{kind, SyntaxTree};

use super::respace;

/// Edits normalising whitespace inside every call's argument list.
///
/// No space after `(`, before `)` or before `,`; exactly one space after
/// `,`. Arguments split across lines keep their layout.
pub fn argument_edits(tree: &SyntaxTree) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for list in tree.preorder(tree.root()) {
        if tree.kind(list) != kind::ARGUMENT_LIST {
            continue;
        }
        for pair in tree.children(list).windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            let replacement = match (tree.kind(previous), tree.kind(next)) {
                (kind::OPEN_PAREN, _) | (_, kind::CLOSE_PAREN | kind::COMMA) => "",
                (kind::COMMA, _) => " ",
                _ => continue,
            };
            edits.extend(respace(tree, previous, next, replacement));
        }
    }
    edits
}
