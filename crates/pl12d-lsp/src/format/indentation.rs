//! Block indentation.

use lsp_types::TextEdit;
use pl12d_syntax::{kind, NodeId, SyntaxTree};

use super::{reindent, INDENT_WIDTH};

/// Edits that put statements and closing braces at four columns per
/// enclosing block.
///
/// Declarations, loops, `if`/`switch` statements and function definitions
/// that begin their line are indented to `depth * 4`, where depth counts
/// the blocks around them. The `}` of a multi-line block goes to the
/// block's own depth. Single-line blocks are never touched.
pub fn indentation_edits(tree: &SyntaxTree) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for node in tree.preorder(tree.root()) {
        if tree.kind(node) == kind::COMPOUND_STATEMENT {
            edits.extend(closing_brace(tree, node));
            continue;
        }
        if !is_target(tree, node) || !in_multi_line_block(tree, node) {
            continue;
        }
        edits.extend(reindent(tree, node, tree.block_depth(node) * INDENT_WIDTH));
    }
    edits
}

fn is_target(tree: &SyntaxTree, node: NodeId) -> bool {
    let parent_kind = tree.parent(node).map(|parent| tree.kind(parent));
    match tree.kind(node) {
        // Loop headers are formatted with their loop.
        kind::DECLARATION => parent_kind != Some(kind::FOR_STATEMENT),
        // `else if` continues the statement it belongs to.
        kind::IF_STATEMENT => {
            parent_kind != Some(kind::ELSE_CLAUSE)
                && tree.node(node).field != Some(kind::field::ALTERNATIVE)
        }
        kind::WHILE_STATEMENT
        | kind::FOR_STATEMENT
        | kind::SWITCH_STATEMENT
        | kind::FUNCTION_DEFINITION => true,
        _ => false,
    }
}

fn in_multi_line_block(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.enclosing(node, kind::COMPOUND_STATEMENT)
        .map_or(true, |block| !tree.span(block).is_single_line())
}

fn closing_brace(tree: &SyntaxTree, block: NodeId) -> Option<TextEdit> {
    if tree.span(block).is_single_line() {
        return None;
    }
    let brace = tree
        .children(block)
        .last()
        .copied()
        .filter(|&last| tree.kind(last) == kind::CLOSE_BRACE && !tree.span(last).is_empty())?;
    reindent(tree, brace, tree.block_depth(block) * INDENT_WIDTH)
}
