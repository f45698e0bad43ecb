//! Go-to-definition handler.
//!
//! Provides navigation from an identifier to its declaration:
//! - Callee of a call → function definition
//! - Anything else → innermost enclosing scope that declares it (function
//!   name, parameter, earlier local declaration or `#define`), then any
//!   function definition of that name
//!
//! When a name is declared more than once in the same place, the earliest
//! declaration in the document wins.

use lsp_types::{GotoDefinitionParams, GotoDefinitionResponse, Location};
use pl12d_syntax::{kind, quote, Match, NodeId, Point, SyntaxError, SyntaxTree};

use super::{to_point, to_range};

/// What introduced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// Function definition.
    Function,
    /// Parameter of the enclosing function.
    Parameter,
    /// Local or global variable declaration.
    Variable,
    /// Preprocessor `#define`.
    Define,
}

/// A resolved declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    /// The declaring identifier.
    pub name: NodeId,
    /// What kind of declaration it belongs to.
    pub kind: DefinitionKind,
}

/// Handle a go-to-definition request.
pub fn handle_goto_definition(
    params: &GotoDefinitionParams,
    tree: &SyntaxTree,
) -> Option<GotoDefinitionResponse> {
    let position = &params.text_document_position_params;
    let identifier = identifier_at(tree, to_point(position.position))?;

    tracing::debug!(identifier = tree.text(identifier), "go-to-definition");

    let definition = match resolve(tree, identifier) {
        Ok(definition) => definition?,
        Err(err) => {
            tracing::warn!(%err, "definition lookup failed");
            return None;
        }
    };

    Some(GotoDefinitionResponse::Scalar(Location {
        uri: position.text_document.uri.clone(),
        range: to_range(tree.span(definition.name)),
    }))
}

/// The identifier under `point`, if any.
pub fn identifier_at(tree: &SyntaxTree, point: Point) -> Option<NodeId> {
    let node = tree.node_at(point)?;
    (tree.kind(node) == kind::IDENTIFIER).then_some(node)
}

/// Whether `identifier` is the function being called in a call expression.
pub fn is_callee(tree: &SyntaxTree, identifier: NodeId) -> bool {
    tree.parent(identifier)
        .is_some_and(|parent| tree.kind(parent) == kind::CALL_EXPRESSION)
        && tree.node(identifier).field == Some(kind::field::FUNCTION)
}

/// Find the declaration of `identifier`.
pub fn resolve(tree: &SyntaxTree, identifier: NodeId) -> Result<Option<Definition>, SyntaxError> {
    let name = tree.text(identifier);
    if is_callee(tree, identifier) {
        return find_function(tree, name);
    }

    let locals = tree.query(&local_query(name))?;
    let before = tree.node(identifier).bytes.start;

    for scope in tree.ancestors(identifier) {
        if tree.kind(scope) == kind::FUNCTION_DEFINITION {
            if let Some(function) = tree.function_name(scope) {
                if tree.text(function) == name {
                    return Ok(Some(Definition {
                        name: function,
                        kind: DefinitionKind::Function,
                    }));
                }
            }
            if let Some(parameter) = find_parameter(tree, scope, name)? {
                return Ok(Some(Definition {
                    name: parameter,
                    kind: DefinitionKind::Parameter,
                }));
            }
        }

        if let Some(local) = first_local_in(tree, &locals, scope, before) {
            return Ok(Some(local));
        }
    }

    find_function(tree, name)
}

/// First function definition named `name` in document order.
pub fn find_function(tree: &SyntaxTree, name: &str) -> Result<Option<Definition>, SyntaxError> {
    let matches = tree.query(&function_query(name))?;
    Ok(matches
        .first()
        .and_then(|m| m.capture("name"))
        .map(|name| Definition {
            name,
            kind: DefinitionKind::Function,
        }))
}

fn find_parameter(
    tree: &SyntaxTree,
    definition: NodeId,
    name: &str,
) -> Result<Option<NodeId>, SyntaxError> {
    let Some(parameters) = tree
        .function_declarator(definition)
        .and_then(|declarator| tree.child_by_field(declarator, kind::field::PARAMETERS))
    else {
        return Ok(None);
    };

    let matches = tree.query(&parameter_query(name))?;
    Ok(matches
        .iter()
        .filter_map(|m| m.capture("name"))
        .find(|&node| tree.is_ancestor(parameters, node)))
}

fn first_local_in(
    tree: &SyntaxTree,
    locals: &[Match],
    scope: NodeId,
    before: usize,
) -> Option<Definition> {
    locals.iter().find_map(|m| {
        let declaration = m.capture("decl")?;
        if tree.parent(declaration) != Some(scope) || tree.node(declaration).bytes.start > before {
            return None;
        }
        let kind = if tree.kind(declaration) == kind::PREPROC_DEF {
            DefinitionKind::Define
        } else {
            DefinitionKind::Variable
        };
        Some(Definition {
            name: m.capture("name")?,
            kind,
        })
    })
}

fn function_query(name: &str) -> String {
    format!(
        r"((function_definition
  declarator: [
    (function_declarator declarator: (identifier) @name)
    (pointer_declarator declarator: (function_declarator declarator: (identifier) @name))
  ])
 (#eq? @name {}))",
        quote(name)
    )
}

fn parameter_query(name: &str) -> String {
    format!(
        r"((parameter_declaration
  declarator: [
    (identifier) @name
    (pointer_declarator declarator: (identifier) @name)
    (array_declarator declarator: (identifier) @name)
    (pointer_declarator declarator: (array_declarator declarator: (identifier) @name))
  ])
 (#eq? @name {}))",
        quote(name)
    )
}

fn local_query(name: &str) -> String {
    let name = quote(name);
    format!(
        r"((declaration
  declarator: [
    (identifier) @name
    (init_declarator declarator: (identifier) @name)
    (array_declarator declarator: (identifier) @name)
    (init_declarator declarator: (array_declarator declarator: (identifier) @name))
  ]) @decl
 (#eq? @name {name}))
((preproc_def name: (identifier) @name) @decl
 (#eq? @name {name}))"
    )
}
