//! Arena representation of a parsed document.
//!
//! The parser's own nodes borrow the tree they came from and carry parent
//! back-references, so each parse is flattened once into a `Vec<Node>`.
//! Relations are plain indices and every walk is an explicit worklist.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use tree_sitter::{Language, Parser, Tree};

use crate::error::SyntaxError;
use crate::kind;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Zero-based row and column of a position in the source.
///
/// `column` is a byte offset within the row, exactly as the parser reports
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    /// Zero-based line.
    pub row: u32,
    /// Zero-based byte column within the line.
    pub column: u32,
}

impl Point {
    /// Create a new point.
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row as u32, point.column as u32)
    }
}

/// Start and end points of a node. The end is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// First position covered by the node.
    pub start: Point,
    /// Position just past the node.
    pub end: Point,
}

impl Span {
    /// Whether `point` lies inside the span, counting the end position as
    /// inside so a cursor placed right after a word still hits it.
    pub fn contains(&self, point: Point) -> bool {
        self.start <= point && point <= self.end
    }

    /// Whether the span starts and ends on the same row.
    pub const fn is_single_line(&self) -> bool {
        self.start.row == self.end.row
    }

    /// Whether the span covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Grammar kind, e.g. `function_definition` or `(`.
    pub kind: &'static str,
    /// Field name under the parent, e.g. `declarator`.
    pub field: Option<&'static str>,
    /// Whether the node is a named grammar rule rather than a literal token.
    pub named: bool,
    /// Row/column extent.
    pub span: Span,
    /// Byte extent in the source.
    pub bytes: Range<usize>,
    /// Enclosing node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

/// Parser for 12dPL source text.
pub struct SyntaxParser {
    parser: Parser,
    language: Language,
}

impl SyntaxParser {
    /// Create a parser loaded with the grammar.
    pub fn new() -> Result<Self, SyntaxError> {
        let language: Language = tree_sitter_c::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        Ok(Self { parser, language })
    }

    /// Parse the whole of `source` into a fresh tree.
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, SyntaxError> {
        let raw = self.parser.parse(source, None).ok_or(SyntaxError::NoTree)?;
        Ok(SyntaxTree::build(source.to_owned(), raw, self.language.clone()))
    }
}

impl fmt::Debug for SyntaxParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxParser").finish_non_exhaustive()
    }
}

/// A parsed document: the source snapshot plus its node arena.
pub struct SyntaxTree {
    pub(crate) source: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) raw: Tree,
    pub(crate) language: Language,
    raw_ids: HashMap<usize, NodeId>,
}

impl SyntaxTree {
    fn build(source: String, raw: Tree, language: Language) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let mut raw_ids = HashMap::new();
        {
            let mut parents: Vec<NodeId> = Vec::new();
            let mut cursor = raw.walk();
            'walk: loop {
                let raw_node = cursor.node();
                let id = NodeId(nodes.len() as u32);
                let parent = parents.last().copied();
                nodes.push(Node {
                    kind: raw_node.kind(),
                    field: cursor.field_name(),
                    named: raw_node.is_named(),
                    span: Span {
                        start: raw_node.start_position().into(),
                        end: raw_node.end_position().into(),
                    },
                    bytes: raw_node.byte_range(),
                    parent,
                    children: Vec::new(),
                });
                if let Some(parent) = parent {
                    nodes[parent.index()].children.push(id);
                }
                raw_ids.insert(raw_node.id(), id);

                if cursor.goto_first_child() {
                    parents.push(id);
                    continue;
                }
                while !cursor.goto_next_sibling() {
                    if !cursor.goto_parent() {
                        break 'walk;
                    }
                    parents.pop();
                }
            }
        }
        tracing::trace!(nodes = nodes.len(), "built syntax tree");

        Self {
            source,
            nodes,
            raw,
            language,
            raw_ids,
        }
    }

    /// The source text this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root node.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> &'static str {
        self.node(id).kind
    }

    /// Row/column extent of a node.
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Source text covered by a node.
    pub fn text(&self, id: NodeId) -> &str {
        self.source.get(self.node(id).bytes.clone()).unwrap_or_default()
    }

    /// Enclosing node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children in source order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child stored under `field`.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.node(child).field == Some(field))
    }

    /// Enclosing nodes, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// Whether `ancestor` strictly encloses `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Pre-order walk starting at `from`, driven by an explicit stack.
    pub fn preorder(&self, from: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![from],
        }
    }

    /// The smallest node whose span contains `point`.
    ///
    /// When two siblings touch at `point` (the end of one word is the start
    /// of the next token) an identifier wins, otherwise the earlier sibling.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        let mut current = self.root();
        if !self.span(current).contains(point) {
            return None;
        }
        loop {
            let mut next = None;
            for &child in self.children(current) {
                let span = self.span(child);
                if span.is_empty() || !span.contains(point) {
                    continue;
                }
                if self.kind(child) == kind::IDENTIFIER {
                    next = Some(child);
                    break;
                }
                next.get_or_insert(child);
            }
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Text between the start of the node's row and the node itself.
    pub fn line_prefix(&self, id: NodeId) -> &str {
        let node = self.node(id);
        let line_start = node.bytes.start - node.span.start.column as usize;
        self.source
            .get(line_start..node.bytes.start)
            .unwrap_or_default()
    }

    /// Whether only blanks precede the node on its row.
    pub fn starts_line(&self, id: NodeId) -> bool {
        self.line_prefix(id).chars().all(|c| c == ' ' || c == '\t')
    }

    /// Source text between the end of `from` and the start of `to` when
    /// both sit on the same row.
    pub fn gap(&self, from: NodeId, to: NodeId) -> Option<&str> {
        let (left, right) = (self.node(from), self.node(to));
        if left.span.end.row != right.span.start.row || left.bytes.end > right.bytes.start {
            return None;
        }
        self.source.get(left.bytes.end..right.bytes.start)
    }

    pub(crate) fn raw_id(&self, raw: usize) -> Option<NodeId> {
        self.raw_ids.get(&raw).copied()
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`SyntaxTree::preorder`].
#[derive(Debug)]
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
