//! Document store for open buffers.
//!
//! The store is owned by the session and only mutated by the dispatcher in
//! response to open/change notifications. Analyses take a `String`
//! snapshot, so a request always sees one complete version of the text.

use ropey::Rope;
use std::collections::HashMap;

/// An open document.
#[derive(Debug)]
pub struct Document {
    /// The document content as a rope.
    pub content: Rope,
    /// Version reported by the client.
    pub version: i32,
}

impl Document {
    /// Create a new document with the given content.
    pub fn new(content: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(content),
            version,
        }
    }

    /// Get the document content as a string.
    pub fn text(&self) -> String {
        self.content.to_string()
    }
}

/// Open documents keyed by URI string.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any previous one under `uri`.
    pub fn open(&mut self, uri: &str, content: &str, version: i32) {
        tracing::debug!(uri, version, "document opened");
        self.documents
            .insert(uri.to_owned(), Document::new(content, version));
    }

    /// Replace the whole text of a document.
    ///
    /// A change for a document that was never opened creates it.
    pub fn replace(&mut self, uri: &str, content: &str, version: i32) {
        match self.documents.get_mut(uri) {
            Some(doc) => {
                doc.content = Rope::from_str(content);
                doc.version = version;
                tracing::debug!(uri, version, "document replaced");
            }
            None => {
                tracing::debug!(uri, "change for unopened document, inserting");
                self.open(uri, content, version);
            }
        }
    }

    /// Get a document by URI.
    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Snapshot of a document's text.
    pub fn text(&self, uri: &str) -> Option<String> {
        self.get(uri).map(Document::text)
    }

    /// Whether no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
