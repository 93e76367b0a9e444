use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::node::{Arena, NodeId, NodeRef};
use crate::options::ParserOptions;
use crate::parser::GrammarDriver;

/// A parsed JSON document.
///
/// The document owns a private copy of the input text and a tree of nodes that refer into
/// it by byte span. String and number values are never copied out of the text during
/// parsing; the typed accessors convert on demand.
///
/// The top-level value must be an object or an array.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    arena: Arena,
    options: ParserOptions,
}

impl Document {
    /// Parses `text` with default options.
    pub fn parse(text: &str) -> Result<Document, ParseError> {
        Document::parse_with_options(text, ParserOptions::default())
    }

    pub fn parse_with_options(text: &str, options: ParserOptions) -> Result<Document, ParseError> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(text.len())
            .map_err(|_| ParseError::new(ParseErrorKind::OutOfMemory, text, 0))?;
        owned.push_str(text);
        Document::from_string_with_options(owned, options)
    }

    /// Parses `text`, taking ownership of it instead of copying.
    pub fn from_string(text: String) -> Result<Document, ParseError> {
        Document::from_string_with_options(text, ParserOptions::default())
    }

    pub fn from_string_with_options(
        text: String,
        options: ParserOptions,
    ) -> Result<Document, ParseError> {
        let arena = GrammarDriver::new(&text, options)
            .and_then(GrammarDriver::run)
            .map_err(|err| {
                log::debug!("{err}");
                err
            })?;
        log::debug!("parsed {} bytes into {} nodes", text.len(), arena.len());
        Ok(Document {
            text,
            arena,
            options,
        })
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The document's own copy of the input.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The root node. Its single child is the top-level object or array.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId::ROOT)
    }

    /// The top-level object or array.
    pub fn value(&self) -> NodeRef<'_> {
        let root = self.root();
        root.value().unwrap_or(root)
    }

    /// Looks up a node by id, if it belongs to this document.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.arena.len()).then(|| NodeRef::new(self, id))
    }

    /// Number of nodes in the tree, the root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Releases the document and everything it owns. Dropping it does the same.
    pub fn destroy(self) {
        log::trace!("releasing document with {} nodes", self.arena.len());
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}
