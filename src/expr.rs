//! Path expressions such as `store.books[2].title`.
//!
//! An expression is a dot-separated list of segments. A segment is an identifier, an
//! identifier followed by one `[index]`, or a bare `[index]`. Identifiers are compared
//! byte for byte against the raw object keys, so a key written with escapes has to be
//! queried with the same escapes.

use crate::error::QueryError;
use crate::node::{NodeId, NodeKind, NodeRef};

/// One parsed step of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'e> {
    /// The segment as written, for error messages.
    pub raw: &'e str,
    pub key: Option<&'e str>,
    /// `usize::MAX` if the written index does not fit.
    pub index: Option<usize>,
}

impl<'e> Segment<'e> {
    pub fn parse(raw: &'e str) -> Result<Segment<'e>, QueryError> {
        let invalid = || QueryError::InvalidExpression(raw.to_string());
        if raw.is_empty() {
            return Err(invalid());
        }

        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(invalid());
            }
            return Ok(Segment {
                raw,
                key: Some(raw),
                index: None,
            });
        };

        let key = &raw[..open];
        let digits = raw[open + 1..].strip_suffix(']').ok_or_else(invalid)?;
        if key.contains(']') || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Only overflow can fail here.
        let index = digits.parse::<usize>().unwrap_or(usize::MAX);
        Ok(Segment {
            raw,
            key: (!key.is_empty()).then_some(key),
            index: Some(index),
        })
    }
}

/// Splits `expr` into segments. The empty expression has none.
pub fn segments(expr: &str) -> impl Iterator<Item = Result<Segment<'_>, QueryError>> {
    expr.split('.')
        .filter(move |_| !expr.is_empty())
        .map(Segment::parse)
}

impl<'a> NodeRef<'a> {
    /// Resolves `expr` starting at this node.
    ///
    /// ```
    /// use xson::Document;
    ///
    /// let doc = Document::parse(r#"{"a": {"b": [{"c": 5}]}}"#).unwrap();
    /// let c = doc.root().evaluate("a.b[0].c").unwrap();
    /// assert_eq!(c.as_number_text(), Some("5"));
    /// ```
    pub fn evaluate(&self, expr: &str) -> Result<NodeRef<'a>, QueryError> {
        let mut node = self.id;
        if expr.is_empty() {
            node = step_into_root(*self, node)?;
        }
        for segment in segments(expr) {
            node = step(*self, node, &segment?)?;
        }
        Ok(NodeRef::new(self.doc, node))
    }
}

fn step_into_root(start: NodeRef<'_>, node: NodeId) -> Result<NodeId, QueryError> {
    match start.doc.arena().kind(node) {
        NodeKind::Root { value: Some(value) } => Ok(*value),
        NodeKind::Root { value: None } => Err(QueryError::NullTarget),
        _ => Ok(node),
    }
}

fn step(start: NodeRef<'_>, node: NodeId, segment: &Segment<'_>) -> Result<NodeId, QueryError> {
    let arena = start.doc.arena();
    let invalid = || QueryError::InvalidExpression(segment.raw.to_string());
    match arena.kind(node) {
        NodeKind::Root { .. } => {
            let value = step_into_root(start, node)?;
            step(start, value, segment)
        }
        NodeKind::Object(data) => {
            let key = segment.key.ok_or_else(invalid)?;
            let pair = data
                .index
                .get(start.doc.text().as_bytes(), key.as_bytes())
                .ok_or_else(|| QueryError::KeyNotFound(key.to_string()))?;
            let NodeKind::Pair { value, .. } = arena.kind(pair) else {
                return Err(QueryError::OperationNotSupported(arena.node_type(pair)));
            };
            match segment.index {
                None => Ok(*value),
                Some(index) => match arena.kind(*value) {
                    NodeKind::Array(items) => element(items, index),
                    _ => Err(QueryError::TypeMismatch {
                        expected: "array",
                        found: arena.node_type(*value),
                    }),
                },
            }
        }
        NodeKind::Array(items) => match (segment.key, segment.index) {
            (None, Some(index)) => element(items, index),
            _ => Err(invalid()),
        },
        NodeKind::Null => Err(QueryError::NullTarget),
        NodeKind::Pair { .. } | NodeKind::String(_) | NodeKind::Number(_) | NodeKind::Bool(_) => {
            Err(QueryError::OperationNotSupported(arena.node_type(node)))
        }
    }
}

fn element(items: &[NodeId], index: usize) -> Result<NodeId, QueryError> {
    items
        .get(index)
        .copied()
        .ok_or(QueryError::IndexOutOfRange {
            index,
            len: items.len(),
        })
}
