//! Errors raised by the syntax provider.

use thiserror::Error;

/// Failure inside the parser or query engine.
///
/// Malformed source is never an error; it parses into a tree containing
/// `ERROR` nodes.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser gave up without producing a tree.
    #[error("parser produced no tree")]
    NoTree,

    /// A structural query failed to compile.
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
}
