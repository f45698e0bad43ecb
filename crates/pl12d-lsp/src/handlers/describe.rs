//! Human-readable renderings of declarations, shared by hover and
//! completion.

use pl12d_syntax::{kind, NodeId, SyntaxTree};

/// Render a code block of `signature` followed by an optional description.
pub fn doc_markdown(signature: &str, description: &str) -> String {
    if description.is_empty() {
        format!("```12dpl\n{signature}\n```")
    } else {
        format!("```12dpl\n{signature}\n```\n---\n{description}")
    }
}

/// `Type Name(Type a, Type b)` for a function definition, with parameters
/// normalised onto one line.
pub fn function_signature(tree: &SyntaxTree, definition: NodeId) -> Option<String> {
    let return_type = tree.child_by_field(definition, kind::field::TYPE)?;
    let declarator = tree.function_declarator(definition)?;
    let name = tree.child_by_field(declarator, kind::field::DECLARATOR)?;
    let parameters = tree.child_by_field(declarator, kind::field::PARAMETERS)?;

    let rendered: Vec<String> = tree
        .children(parameters)
        .iter()
        .filter(|&&child| tree.kind(child) == kind::PARAMETER_DECLARATION)
        .filter_map(|&parameter| parameter_signature(tree, parameter))
        .collect();

    Some(format!(
        "{} {}({})",
        tree.text(return_type),
        tree.text(name),
        rendered.join(", ")
    ))
}

/// `Type declarator` for one parameter declaration.
pub fn parameter_signature(tree: &SyntaxTree, parameter: NodeId) -> Option<String> {
    let ty = tree.child_by_field(parameter, kind::field::TYPE)?;
    let declarator = tree.child_by_field(parameter, kind::field::DECLARATOR)?;
    Some(format!("{} {}", tree.text(ty), tree.text(declarator)))
}

/// The comment ending on the line directly above a function definition,
/// with comment markers and indentation stripped.
pub fn doc_comment(tree: &SyntaxTree, definition: NodeId) -> Option<String> {
    let comment = tree.prev_sibling(definition)?;
    if tree.kind(comment) != kind::COMMENT
        || tree.span(comment).end.row + 1 != tree.span(definition).start.row
    {
        return None;
    }

    let text = tree.text(comment);
    let text = text.strip_prefix("/*").unwrap_or(text);
    let text = text.strip_suffix("*/").unwrap_or(text);
    let lines: Vec<&str> = text
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix("//").unwrap_or(line).trim()
        })
        .collect();
    let joined = lines.join("\n");
    let description = joined.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Type written in the declaration that introduced `name`.
pub fn declared_type(tree: &SyntaxTree, name: NodeId) -> Option<&str> {
    let owner = tree.ancestors(name).find(|&ancestor| {
        matches!(
            tree.kind(ancestor),
            kind::DECLARATION | kind::PARAMETER_DECLARATION | kind::FUNCTION_DEFINITION
        )
    })?;
    let ty = tree.child_by_field(owner, kind::field::TYPE)?;
    Some(tree.text(ty))
}

/// Whether `name` is declared through an array declarator.
pub fn is_array(tree: &SyntaxTree, name: NodeId) -> bool {
    tree.ancestors(name)
        .take_while(|&ancestor| {
            !matches!(
                tree.kind(ancestor),
                kind::DECLARATION | kind::PARAMETER_DECLARATION
            )
        })
        .any(|ancestor| tree.kind(ancestor) == kind::ARRAY_DECLARATOR)
}
