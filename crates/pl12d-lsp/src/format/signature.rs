//! Function signature spacing.

use lsp_types::TextEdit;
use pl12d_syntax::{kind, NodeId, SyntaxTree};

use super::{reindent, respace, INDENT_WIDTH};

/// Edits normalising the spacing of every function definition's signature.
///
/// - one space between the return type and the declarator
/// - one space between `)` and `{` when they share a line; a `{` on its
///   own line is indented to the function's depth instead
/// - inside the parameter list: nothing after `(` or before a `,`, one
///   space after a `,` and between a parameter's type and name, and one
///   extra indent level for parameters continued on a new line
pub fn signature_edits(tree: &SyntaxTree) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for node in tree.preorder(tree.root()) {
        if tree.kind(node) == kind::FUNCTION_DEFINITION {
            definition_edits(tree, node, &mut edits);
        }
    }
    edits
}

fn definition_edits(tree: &SyntaxTree, definition: NodeId, edits: &mut Vec<TextEdit>) {
    let depth = tree.block_depth(definition);
    let return_type = tree.child_by_field(definition, kind::field::TYPE);
    let Some(declarator) = tree.child_by_field(definition, kind::field::DECLARATOR) else {
        return;
    };

    if let Some(return_type) = return_type {
        edits.extend(respace(tree, return_type, declarator, " "));
    }

    if let Some(body) = tree.child_by_field(definition, kind::field::BODY) {
        if tree.span(declarator).end.row == tree.span(body).start.row {
            edits.extend(respace(tree, declarator, body, " "));
        } else {
            edits.extend(reindent(tree, body, depth * INDENT_WIDTH));
        }
    }

    if let Some(parameters) = tree
        .function_declarator(definition)
        .and_then(|declarator| tree.child_by_field(declarator, kind::field::PARAMETERS))
    {
        parameter_edits(tree, parameters, (depth + 1) * INDENT_WIDTH, edits);
    }
}

fn parameter_edits(
    tree: &SyntaxTree,
    parameters: NodeId,
    continuation: usize,
    edits: &mut Vec<TextEdit>,
) {
    let mut previous: Option<NodeId> = None;
    for &child in tree.children(parameters) {
        if let Some(previous) = previous {
            match (tree.kind(previous), tree.kind(child)) {
                (kind::OPEN_PAREN, kind::PARAMETER_DECLARATION)
                | (kind::PARAMETER_DECLARATION, kind::COMMA) => {
                    edits.extend(respace(tree, previous, child, ""));
                }
                (kind::COMMA, kind::PARAMETER_DECLARATION) => {
                    if tree.span(previous).end.row == tree.span(child).start.row {
                        edits.extend(respace(tree, previous, child, " "));
                    } else {
                        edits.extend(reindent(tree, child, continuation));
                    }
                }
                _ => {}
            }
        }

        if tree.kind(child) == kind::PARAMETER_DECLARATION {
            type_name_edits(tree, child, edits);
        }
        previous = Some(child);
    }
}

/// One space between a parameter's type and name. A reference marker the
/// grammar cannot place (`Text &name`) stays glued to the name.
fn type_name_edits(tree: &SyntaxTree, parameter: NodeId, edits: &mut Vec<TextEdit>) {
    let (Some(ty), Some(name)) = (
        tree.child_by_field(parameter, kind::field::TYPE),
        tree.child_by_field(parameter, kind::field::DECLARATOR),
    ) else {
        return;
    };

    match tree.prev_sibling(name) {
        Some(marker) if is_reference_marker(tree, marker) => {
            edits.extend(respace(tree, ty, marker, " "));
            edits.extend(respace(tree, marker, name, ""));
        }
        _ => edits.extend(respace(tree, ty, name, " ")),
    }
}

fn is_reference_marker(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.kind(node) == kind::ERROR && tree.text(node) == "&"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::{apply_edits, parse};

    fn format(source: &str) -> String {
        apply_edits(source, &signature_edits(&parse(source)))
    }

    #[test]
    fn test_signature_spacing() {
        let source = "Integer   Add(Integer  a,Integer b)   {\n    return a + b;\n}\n";
        assert_eq!(
            format(source),
            "Integer Add(Integer a, Integer b) {\n    return a + b;\n}\n"
        );
    }

    #[test]
    fn test_space_before_comma_and_after_paren() {
        let source = "void Foo(   Text a , Text b) {\n}\n";
        assert_eq!(format(source), "void Foo(Text a, Text b) {\n}\n");
    }

    #[test]
    fn test_missing_space_before_brace() {
        let source = "void Foo(){\n}\n";
        assert_eq!(format(source), "void Foo() {\n}\n");
    }

    #[test]
    fn test_brace_on_next_line_is_aligned() {
        let source = "void Foo()\n  {\n}\n";
        assert_eq!(format(source), "void Foo()\n{\n}\n");
    }

    #[test]
    fn test_continuation_parameters() {
        let source = "void SomeFunc(Text a,\n\tText b,\n         Integer c) {\n}\n";
        assert_eq!(
            format(source),
            "void SomeFunc(Text a,\n    Text b,\n    Integer c) {\n}\n"
        );
    }

    #[test]
    fn test_reference_parameter_spacing() {
        let source = "void Get(Text  &argument ,Integer i)   {\n}\n";
        assert_eq!(format(source), "void Get(Text &argument, Integer i) {\n}\n");
    }

    #[test]
    fn test_reference_marker_joins_name() {
        let source = "void Get(Integer i, Text & argument) {\n}\n";
        let once = format(source);
        assert_eq!(once, "void Get(Integer i, Text &argument) {\n}\n");
        assert!(signature_edits(&parse(&once)).is_empty());
    }

    #[test]
    fn test_well_formed_signature_has_no_edits() {
        let source = "// Doc.\nvoid SomeFunc(\n    Text a,\n    Integer b\n) {\n    SomeFunc(a, b);\n}\n";
        assert!(signature_edits(&parse(source)).is_empty());
    }
}
