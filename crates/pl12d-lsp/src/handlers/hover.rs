//! Hover handler.
//!
//! Shows the declaration behind the identifier under the cursor: function
//! signatures with their doc comment, parameters, variables and `#define`
//! lines. Calls to built-in library functions show the library
//! documentation.

use lsp_types::{Hover, HoverContents, HoverParams, MarkupContent, MarkupKind};
use pl12d_syntax::{kind, NodeId, SyntaxTree};

use super::completion::library_function;
use super::definition::{identifier_at, is_callee, resolve, Definition, DefinitionKind};
use super::describe::{
    declared_type, doc_comment, doc_markdown, function_signature, is_array, parameter_signature,
};
use super::{to_point, to_range};

/// Handle a hover request.
pub fn handle_hover(params: &HoverParams, tree: &SyntaxTree) -> Option<Hover> {
    let position = params.text_document_position_params.position;
    let identifier = identifier_at(tree, to_point(position))?;

    let value = match resolve(tree, identifier) {
        Ok(Some(definition)) => describe(tree, definition)?,
        Ok(None) if is_callee(tree, identifier) => {
            let function = library_function(tree.text(identifier))?;
            doc_markdown(function.signature, function.summary)
        }
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(%err, "hover lookup failed");
            return None;
        }
    };

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(to_range(tree.span(identifier))),
    })
}

/// Markdown describing a resolved declaration.
pub fn describe(tree: &SyntaxTree, definition: Definition) -> Option<String> {
    let name = definition.name;
    match definition.kind {
        DefinitionKind::Function => {
            let function = tree.enclosing(name, kind::FUNCTION_DEFINITION)?;
            let signature = function_signature(tree, function)?;
            let description = doc_comment(tree, function).unwrap_or_default();
            Some(doc_markdown(&signature, &description))
        }
        DefinitionKind::Parameter => {
            let parameter = tree.enclosing(name, kind::PARAMETER_DECLARATION)?;
            let signature = parameter_signature(tree, parameter)?;
            Some(doc_markdown(&format!("(parameter) {signature}"), ""))
        }
        DefinitionKind::Variable => Some(doc_markdown(&variable_signature(tree, name)?, "")),
        DefinitionKind::Define => {
            let define = tree.enclosing(name, kind::PREPROC_DEF)?;
            Some(doc_markdown(tree.text(define).trim(), ""))
        }
    }
}

fn variable_signature(tree: &SyntaxTree, name: NodeId) -> Option<String> {
    let ty = declared_type(tree, name)?;
    let suffix = if is_array(tree, name) { "[]" } else { "" };
    Some(format!("{ty} {}{suffix}", tree.text(name)))
}
