//! Syntax provider for the 12d Programming Language (12dPL).
//!
//! 12dPL is a C-family language, so source text is parsed with the
//! `tree-sitter` C grammar, which is error tolerant: malformed input still
//! produces a best-effort tree with `ERROR` nodes instead of failing.
//!
//! Every parse is converted into a [`SyntaxTree`], an arena of nodes
//! addressed by [`NodeId`] with parent and child relations stored as
//! indices. Structural queries run against the same parse and report their
//! captures as arena ids.
//!
//! # Example
//!
//! ```ignore
//! use pl12d_syntax::{SyntaxParser, Point};
//!
//! let mut parser = SyntaxParser::new()?;
//! let tree = parser.parse("Integer Foo() {}")?;
//! let node = tree.node_at(Point::new(0, 9)).unwrap();
//! assert_eq!(tree.text(node), "Foo");
//! ```

mod error;
pub mod kind;
mod query;
mod shape;
mod tree;

pub use error::SyntaxError;
pub use query::{quote, Capture, Match};
pub use tree::{Node, NodeId, Point, Preorder, Span, SyntaxParser, SyntaxTree};
