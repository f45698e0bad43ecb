//! Document formatting handler.

use lsp_types::{DocumentFormattingParams, TextEdit};
use pl12d_syntax::SyntaxTree;

use crate::format::format_edits;

/// Handle a document formatting request.
///
/// Returns one batch of non-overlapping edits against the stored text.
/// The client's tab and space options are ignored: blocks are always
/// indented with four spaces.
pub fn handle_formatting(params: &DocumentFormattingParams, tree: &SyntaxTree) -> Vec<TextEdit> {
    let edits = format_edits(tree);
    tracing::debug!(
        uri = params.text_document.uri.as_str(),
        edits = edits.len(),
        "formatting"
    );
    edits
}
