use std::fmt;

use xson_lexer::Span;

use crate::document::Document;
use crate::error::{AllocError, ParseErrorKind};
use crate::pair_index::PairIndex;

/// Index of a node in its document's arena. Only meaningful for the document that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The document root. Every document has one, even before parsing finishes.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Object,
    Array,
    Pair,
    String,
    Number,
    Bool,
    Null,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Root => "root",
            NodeType::Object => "object",
            NodeType::Array => "array",
            NodeType::Pair => "pair",
            NodeType::String => "string",
            NodeType::Number => "number",
            NodeType::Bool => "bool",
            NodeType::Null => "null",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectData {
    /// Pairs in document order, duplicates included.
    pub(crate) pairs: Vec<NodeId>,
    pub(crate) index: PairIndex,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Root { value: Option<NodeId> },
    Object(ObjectData),
    Array(Vec<NodeId>),
    Pair { key: NodeId, value: NodeId },
    /// Raw contents between the quotes.
    String(Span),
    Number(Span),
    Bool(bool),
    Null,
}

impl NodeKind {
    pub(crate) fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root { .. } => NodeType::Root,
            NodeKind::Object(_) => NodeType::Object,
            NodeKind::Array(_) => NodeType::Array,
            NodeKind::Pair { .. } => NodeType::Pair,
            NodeKind::String(_) => NodeType::String,
            NodeKind::Number(_) => NodeType::Number,
            NodeKind::Bool(_) => NodeType::Bool,
            NodeKind::Null => NodeType::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    /// The node's extent in the source text. Containers cover their brackets, pairs run
    /// from the key contents to the end of the value.
    pub(crate) span: Span,
}

/// Owner of every node in a document. Nodes refer to each other by [`NodeId`]; the root
/// always lives at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub(crate) fn with_root() -> Result<Arena, AllocError> {
        let mut nodes = Vec::new();
        nodes.try_reserve(1)?;
        nodes.push(Node {
            kind: NodeKind::Root { value: None },
            parent: None,
            span: Span::new(0, 0),
        });
        Ok(Arena { nodes })
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.0].kind.node_type()
    }

    pub(crate) fn push(&mut self, node: Node) -> Result<NodeId, AllocError> {
        self.nodes.try_reserve(1)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Makes `child` a child of `parent`, checking that the combination is legal.
    ///
    /// Root takes a single object or array, objects take pairs, arrays take values.
    /// `text` is needed to index pair keys.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        text: &[u8],
    ) -> Result<(), ParseErrorKind> {
        let child_type = self.node_type(child);
        let key_span = match self.kind(child) {
            NodeKind::Pair { key, .. } => Some(self.get(*key).span),
            _ => None,
        };
        let parent_type = self.node_type(parent);
        let cannot_attach = ParseErrorKind::CannotAttach {
            child: child_type,
            parent: parent_type,
        };

        match (&mut self.nodes[parent.0].kind, child_type) {
            (NodeKind::Root { value: slot @ None }, NodeType::Object | NodeType::Array) => {
                *slot = Some(child);
            }
            (NodeKind::Object(data), NodeType::Pair) => {
                let Some(key) = key_span else {
                    return Err(cannot_attach);
                };
                data.pairs.try_reserve(1).map_err(AllocError::from)?;
                if let Some(previous) = data.index.insert(text, key, child)? {
                    log::trace!(
                        "duplicate key {:?}, pair {} replaces pair {} in lookups",
                        String::from_utf8_lossy(&text[key.start..key.end]),
                        child.0,
                        previous.0
                    );
                }
                data.pairs.push(child);
            }
            (
                NodeKind::Array(items),
                NodeType::Object
                | NodeType::Array
                | NodeType::String
                | NodeType::Number
                | NodeType::Bool
                | NodeType::Null,
            ) => {
                items.try_reserve(1).map_err(AllocError::from)?;
                items.push(child);
            }
            _ => return Err(cannot_attach),
        }
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }
}

macro_rules! is_xxx {
    ($name:ident, $variant:pat) => {
        pub fn $name(&self) -> bool {
            matches!(self.kind(), $variant)
        }
    };
}

/// A borrowed view of one node in a [`Document`].
///
/// `NodeRef` is `Copy` and cheap to pass around; all its data lives in the document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> NodeRef<'a> {
        NodeRef { doc, id }
    }

    pub(crate) fn kind(&self) -> &'a NodeKind {
        self.doc.arena().kind(self.id)
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef::new(self.doc, id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.kind().node_type()
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Where this node sits in the source text.
    pub fn span(&self) -> Span {
        self.doc.arena().get(self.id).span
    }

    /// The source text the node was parsed from. For strings this includes the quotes.
    pub fn source(&self) -> &'a str {
        let span = self.span();
        match self.kind() {
            NodeKind::String(_) => &self.doc.text()[span.start - 1..span.end + 1],
            _ => &self.doc.text()[span.start..span.end],
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.arena().get(self.id).parent.map(|id| self.at(id))
    }

    is_xxx!(is_root, NodeKind::Root { .. });
    is_xxx!(is_object, NodeKind::Object(_));
    is_xxx!(is_array, NodeKind::Array(_));
    is_xxx!(is_pair, NodeKind::Pair { .. });
    is_xxx!(is_string, NodeKind::String(_));
    is_xxx!(is_number, NodeKind::Number(_));
    is_xxx!(is_bool, NodeKind::Bool(_));
    is_xxx!(is_null, NodeKind::Null);

    /// Direct children: the root's value, an object's pairs, an array's elements, or a
    /// pair's key and value. Leaves have none.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        let ids = match self.kind() {
            NodeKind::Root { value: Some(value) } => {
                ChildIds::Slice(std::slice::from_ref(value).iter())
            }
            NodeKind::Object(data) => ChildIds::Slice(data.pairs.iter()),
            NodeKind::Array(items) => ChildIds::Slice(items.iter()),
            NodeKind::Pair { key, value } => ChildIds::Two(*key, *value),
            _ => ChildIds::Done,
        };
        ids.map(move |id| NodeRef::new(doc, id))
    }

    /// Number of direct children, counting duplicate object keys separately.
    pub fn len(&self) -> usize {
        match self.kind() {
            NodeKind::Root { value } => value.is_some() as usize,
            NodeKind::Object(data) => data.pairs.len(),
            NodeKind::Array(items) => items.len(),
            NodeKind::Pair { .. } => 2,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `key` in an object. With duplicate keys the last one wins.
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        self.pair(key).and_then(|pair| pair.value())
    }

    /// Like [`get`](Self::get) but returns the pair node.
    pub fn pair(&self, key: &str) -> Option<NodeRef<'a>> {
        match self.kind() {
            NodeKind::Object(data) => data
                .index
                .get(self.doc.text().as_bytes(), key.as_bytes())
                .map(|id| self.at(id)),
            _ => None,
        }
    }

    pub fn element(&self, index: usize) -> Option<NodeRef<'a>> {
        match self.kind() {
            NodeKind::Array(items) => items.get(index).map(|&id| self.at(id)),
            _ => None,
        }
    }

    /// The key node of a pair.
    pub fn key(&self) -> Option<NodeRef<'a>> {
        match self.kind() {
            NodeKind::Pair { key, .. } => Some(self.at(*key)),
            _ => None,
        }
    }

    /// The value of a pair, or the top-level value of the root.
    pub fn value(&self) -> Option<NodeRef<'a>> {
        match self.kind() {
            NodeKind::Pair { value, .. } => Some(self.at(*value)),
            NodeKind::Root { value } => value.map(|id| self.at(id)),
            _ => None,
        }
    }

    /// The raw text of a string node, escapes left as written.
    pub fn as_str(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::String(span) => Some(&self.doc.text()[span.start..span.end]),
            _ => None,
        }
    }

    /// The textual form of a number node.
    pub fn as_number_text(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Number(span) => Some(&self.doc.text()[span.start..span.end]),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind() {
            NodeKind::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("type", &self.node_type())
            .field("span", &self.span())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

enum ChildIds<'a> {
    Slice(std::slice::Iter<'a, NodeId>),
    Two(NodeId, NodeId),
    One(NodeId),
    Done,
}

impl Iterator for ChildIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        match *self {
            ChildIds::Slice(ref mut iter) => iter.next().copied(),
            ChildIds::Two(first, second) => {
                *self = ChildIds::One(second);
                Some(first)
            }
            ChildIds::One(last) => {
                *self = ChildIds::Done;
                Some(last)
            }
            ChildIds::Done => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn attach_rules() {
        let text = br#"{"a": 1}"#;
        let mut arena = Arena::with_root().unwrap();
        let number = arena
            .push(Node {
                kind: NodeKind::Number(Span::new(6, 7)),
                parent: None,
                span: Span::new(6, 7),
            })
            .unwrap();
        assert_eq!(
            arena.attach(NodeId::ROOT, number, text),
            Err(ParseErrorKind::CannotAttach {
                child: NodeType::Number,
                parent: NodeType::Root
            })
        );

        let object = arena
            .push(Node {
                kind: NodeKind::Object(ObjectData::default()),
                parent: None,
                span: Span::new(0, 8),
            })
            .unwrap();
        assert_eq!(
            arena.attach(object, number, text),
            Err(ParseErrorKind::CannotAttach {
                child: NodeType::Number,
                parent: NodeType::Object
            })
        );
        arena.attach(NodeId::ROOT, object, text).unwrap();
        assert_eq!(arena.get(object).parent, Some(NodeId::ROOT));

        // The root holds exactly one value.
        let second = arena
            .push(Node {
                kind: NodeKind::Array(Vec::new()),
                parent: None,
                span: Span::new(0, 0),
            })
            .unwrap();
        assert!(arena.attach(NodeId::ROOT, second, text).is_err());
    }

    #[test]
    fn attach_pair_indexes_key() {
        let text = br#"{"a": 1}"#;
        let mut arena = Arena::with_root().unwrap();
        let object = arena
            .push(Node {
                kind: NodeKind::Object(ObjectData::default()),
                parent: None,
                span: Span::new(0, 8),
            })
            .unwrap();
        let key = arena
            .push(Node {
                kind: NodeKind::String(Span::new(2, 3)),
                parent: None,
                span: Span::new(2, 3),
            })
            .unwrap();
        let value = arena
            .push(Node {
                kind: NodeKind::Number(Span::new(6, 7)),
                parent: None,
                span: Span::new(6, 7),
            })
            .unwrap();
        let pair = arena
            .push(Node {
                kind: NodeKind::Pair { key, value },
                parent: None,
                span: Span::new(2, 7),
            })
            .unwrap();
        arena.attach(object, pair, text).unwrap();
        match arena.kind(object) {
            NodeKind::Object(data) => {
                assert_eq!(data.pairs, vec![pair]);
                assert_eq!(data.index.get(text, b"a"), Some(pair));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn index_only_refers_to_listed_pairs() {
        let keys: Vec<String> = (0..40).map(|i| format!("\"k{}\": {i}", i % 25)).collect();
        let doc = crate::Document::parse(&format!("{{{}}}", keys.join(","))).unwrap();
        let text = doc.text().as_bytes();
        match doc.arena().kind(doc.value().id()) {
            NodeKind::Object(data) => {
                assert_eq!(data.pairs.len(), 40);
                assert_eq!(data.index.len(), 25);
                for i in 0..25 {
                    let key = format!("k{i}");
                    let pair = data.index.get(text, key.as_bytes()).unwrap();
                    assert!(data.pairs.contains(&pair));
                    // Keys seen twice resolve to the later pair.
                    let last = if i < 15 { 25 + i } else { i };
                    assert_eq!(pair, data.pairs[last]);
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn node_type_names() {
        assert_eq!(NodeType::Bool.to_string(), "bool");
        assert_eq!(NodeType::Pair.to_string(), "pair");
    }
}
