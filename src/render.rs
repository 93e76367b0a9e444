//! Pretty printing back to JSON text.
//!
//! Strings and numbers are written exactly as they appeared in the input, so rendering
//! and re-parsing a document gives back the same tree. The printer keeps its own work
//! stack instead of recursing.

use crate::document::Document;
use crate::node::{NodeId, NodeKind, NodeRef};

enum Step {
    Node(NodeId, usize),
    Text(&'static str),
    /// Line break followed by the indentation for the given level.
    Newline(usize),
}

fn push_children(steps: &mut Vec<Step>, children: &[NodeId], level: usize, close: &'static str) {
    steps.push(Step::Text(close));
    steps.push(Step::Newline(level));
    for (i, &child) in children.iter().enumerate().rev() {
        steps.push(Step::Node(child, level + 1));
        steps.push(Step::Newline(level + 1));
        if i > 0 {
            steps.push(Step::Text(","));
        }
    }
}

/// Spaces at the start of a line at `level`.
fn indentation(level: usize, indent_width: usize) -> usize {
    level.saturating_mul(indent_width)
}

fn render_into(out: &mut String, doc: &Document, start: NodeId, indent_width: usize) {
    let arena = doc.arena();
    let text = doc.text();
    let mut steps = vec![Step::Node(start, 0)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Text(s) => out.push_str(s),
            Step::Newline(level) => {
                out.push('\n');
                out.extend(std::iter::repeat(' ').take(indentation(level, indent_width)));
            }
            Step::Node(id, level) => match arena.kind(id) {
                NodeKind::Root { value } => {
                    if let Some(value) = value {
                        steps.push(Step::Node(*value, level));
                    }
                }
                NodeKind::Object(data) if data.pairs.is_empty() => out.push_str("{}"),
                NodeKind::Object(data) => {
                    out.push('{');
                    push_children(&mut steps, &data.pairs, level, "}");
                }
                NodeKind::Array(items) if items.is_empty() => out.push_str("[]"),
                NodeKind::Array(items) => {
                    out.push('[');
                    push_children(&mut steps, items, level, "]");
                }
                NodeKind::Pair { key, value } => {
                    steps.push(Step::Node(*value, level));
                    steps.push(Step::Text(": "));
                    steps.push(Step::Node(*key, level));
                }
                NodeKind::String(span) => {
                    out.push('"');
                    out.push_str(&text[span.start..span.end]);
                    out.push('"');
                }
                NodeKind::Number(span) => out.push_str(&text[span.start..span.end]),
                NodeKind::Bool(true) => out.push_str("true"),
                NodeKind::Bool(false) => out.push_str("false"),
                NodeKind::Null => out.push_str("null"),
            },
        }
    }
}

impl NodeRef<'_> {
    /// Renders this node and everything below it, with `indent_width` spaces per level.
    pub fn render(&self, indent_width: usize) -> String {
        let mut out = String::new();
        render_into(&mut out, self.doc, self.id, indent_width);
        if self.is_root() {
            out.push('\n');
        }
        out
    }
}

impl Document {
    /// Renders the whole document, one key/value pair or element per line, ending with a
    /// newline.
    ///
    /// ```
    /// use xson::Document;
    ///
    /// let doc = Document::parse(r#"{"a":[1,true],"b":{}}"#).unwrap();
    /// assert_eq!(doc.render(2), "{\n  \"a\": [\n    1,\n    true\n  ],\n  \"b\": {}\n}\n");
    /// ```
    pub fn render(&self, indent_width: usize) -> String {
        self.root().render(indent_width)
    }
}
