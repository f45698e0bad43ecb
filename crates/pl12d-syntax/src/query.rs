//! Structural pattern queries over a [`SyntaxTree`].

use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use crate::error::SyntaxError;
use crate::tree::{NodeId, SyntaxTree};

/// A node bound to a named capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Capture name without the leading `@`.
    pub name: String,
    /// The captured node.
    pub node: NodeId,
}

/// One match of a query pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Captures in the order the pattern declares them.
    pub captures: Vec<Capture>,
}

impl Match {
    /// First node captured under `name`.
    pub fn capture(&self, name: &str) -> Option<NodeId> {
        self.captures
            .iter()
            .find(|capture| capture.name == name)
            .map(|capture| capture.node)
    }
}

impl SyntaxTree {
    /// Run `pattern` against the whole tree.
    ///
    /// Text predicates such as `#eq?` are applied. Matches come back in
    /// document order of their first capture; matches starting at the same
    /// byte keep the order the engine produced them in.
    pub fn query(&self, pattern: &str) -> Result<Vec<Match>, SyntaxError> {
        let query = Query::new(&self.language, pattern)?;
        let names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, self.raw.root_node(), self.source.as_bytes());

        let mut found = Vec::new();
        while let Some(raw) = matches.next() {
            let captures = raw
                .captures
                .iter()
                .filter_map(|capture| {
                    let node = self.raw_id(capture.node.id())?;
                    Some(Capture {
                        name: names[capture.index as usize].to_string(),
                        node,
                    })
                })
                .collect();
            found.push(Match { captures });
        }

        found.sort_by_key(|m| m.captures.first().map(|c| self.node(c.node).bytes.start));
        tracing::trace!(matches = found.len(), "query executed");
        Ok(found)
    }
}

/// Quote `text` as a query string literal, for use in `#eq?` predicates.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
