//! The grammar driver: walks the input once, left to right, recognizing tokens with the
//! state machines from `xson_lexer` and assembling nodes with a lexical stack.
//!
//! The stack holds one frame per token or partially reduced construct that is still
//! waiting for its surroundings. Containers are opened on `{` / `[` and re-tagged as
//! complete on the matching close; a string, a colon and a value on top of each other
//! reduce to a pair. Nothing here recurses, so nesting depth is bounded by memory only
//! (or by [`ParserOptions::max_depth`]).

use xson_lexer::{is_number_start, is_whitespace, scan_literal, scan_number, scan_string};
use xson_lexer::{LexemeKind, Span};

use crate::error::{AllocError, ParseError, ParseErrorKind};
use crate::node::{Arena, Node, NodeId, NodeKind, NodeType, ObjectData};
use crate::options::ParserOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Bottom of the stack, before anything has been read.
    Empty,
    LeftBrace,
    LeftBracket,
    Comma,
    Colon,
    /// A closed object.
    Object,
    /// A closed array.
    Array,
    String,
    Number,
    /// `true`, `false` or `null`.
    Literal,
    Pair,
}

impl LexState {
    fn describe(self) -> &'static str {
        match self {
            LexState::Empty => "start of input",
            LexState::LeftBrace => "'{'",
            LexState::LeftBracket => "'['",
            LexState::Comma => "','",
            LexState::Colon => "':'",
            LexState::Object => "an object",
            LexState::Array => "an array",
            LexState::String => "a string",
            LexState::Number => "a number",
            LexState::Literal => "a literal",
            LexState::Pair => "a key/value pair",
        }
    }

    fn is_value(self) -> bool {
        matches!(
            self,
            LexState::Object
                | LexState::Array
                | LexState::String
                | LexState::Number
                | LexState::Literal
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    state: LexState,
    span: Span,
    /// The node this frame stands for. Punctuation frames have none.
    node: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// Where a freshly recognized value is going to end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Right of a colon; reduces to a pair immediately.
    PairValue,
    ArrayElement,
    /// The root's single value.
    Root,
    /// Left of a colon, still waiting for it.
    Key,
}

pub(crate) struct GrammarDriver<'t> {
    text: &'t str,
    bytes: &'t [u8],
    arena: Arena,
    stack: Vec<Frame>,
    /// The innermost container being filled, or the root.
    current: NodeId,
    depth: usize,
    options: ParserOptions,
}

impl<'t> GrammarDriver<'t> {
    pub(crate) fn new(text: &'t str, options: ParserOptions) -> Result<Self, ParseError> {
        let oom = |_: AllocError| ParseError::new(ParseErrorKind::OutOfMemory, text, 0);
        let arena = Arena::with_root().map_err(oom)?;
        let mut stack = Vec::new();
        stack
            .try_reserve(options.initial_stack_capacity.max(1))
            .map_err(|e| oom(e.into()))?;
        stack.push(Frame {
            state: LexState::Empty,
            span: Span::new(0, 0),
            node: Some(NodeId::ROOT),
        });
        Ok(GrammarDriver {
            text,
            bytes: text.as_bytes(),
            arena,
            stack,
            current: NodeId::ROOT,
            depth: 0,
            options,
        })
    }

    pub(crate) fn run(mut self) -> Result<Arena, ParseError> {
        let mut pos = 0;
        while let Some(&b) = self.bytes.get(pos) {
            pos = match b {
                b'{' => self.open(pos, Container::Object)?,
                b'[' => self.open(pos, Container::Array)?,
                b'}' => self.close(pos, Container::Object)?,
                b']' => self.close(pos, Container::Array)?,
                b'"' => self.string(pos)?,
                b':' => self.colon(pos)?,
                b',' => self.comma(pos)?,
                b't' | b'f' | b'n' => self.literal(pos)?,
                b if is_number_start(b) => self.number(pos)?,
                b if is_whitespace(b) => pos + 1,
                b => return Err(self.error(ParseErrorKind::InvalidByte(b), pos)),
            };
        }
        self.finish()
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.text, offset)
    }

    fn top(&self) -> LexState {
        self.stack.last().map_or(LexState::Empty, |frame| frame.state)
    }

    fn current_type(&self) -> NodeType {
        self.arena.node_type(self.current)
    }

    fn unexpected(&self, pos: usize) -> ParseError {
        let found = self.text[pos..].chars().next().unwrap_or('\0');
        self.error(
            ParseErrorKind::Unexpected {
                found,
                after: self.top().describe(),
            },
            pos,
        )
    }

    fn push_frame(&mut self, frame: Frame, pos: usize) -> Result<(), ParseError> {
        self.stack
            .try_reserve(1)
            .map_err(|_| self.error(ParseErrorKind::OutOfMemory, pos))?;
        self.stack.push(frame);
        Ok(())
    }

    fn push_node(&mut self, kind: NodeKind, span: Span, pos: usize) -> Result<NodeId, ParseError> {
        let node = Node {
            kind,
            parent: Some(self.current),
            span,
        };
        self.arena
            .push(node)
            .map_err(|_| self.error(ParseErrorKind::OutOfMemory, pos))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, pos: usize) -> Result<(), ParseError> {
        self.arena
            .attach(parent, child, self.bytes)
            .map_err(|kind| self.error(kind, pos))
    }

    /// Where a value starting at `pos` may go, if anywhere.
    fn value_slot(&self, pos: usize) -> Result<Slot, ParseError> {
        match (self.top(), self.current_type()) {
            (LexState::Colon, NodeType::Object) => Ok(Slot::PairValue),
            (LexState::LeftBracket | LexState::Comma, NodeType::Array) => Ok(Slot::ArrayElement),
            _ => Err(self.unexpected(pos)),
        }
    }

    /// Places a scalar or freshly opened container according to `slot`.
    fn place(&mut self, slot: Slot, node: NodeId, pos: usize) -> Result<(), ParseError> {
        match slot {
            Slot::PairValue => self.reduce_pair(pos),
            Slot::ArrayElement | Slot::Root => self.attach(self.current, node, pos),
            Slot::Key => Ok(()),
        }
    }

    fn open(&mut self, pos: usize, container: Container) -> Result<usize, ParseError> {
        let slot = match (self.top(), self.current_type()) {
            (LexState::Empty, NodeType::Root) => Slot::Root,
            _ => self.value_slot(pos)?,
        };
        if let Some(max_depth) = self.options.max_depth {
            if self.depth >= max_depth {
                return Err(self.error(ParseErrorKind::TooDeep(max_depth), pos));
            }
        }

        let (kind, state) = match container {
            Container::Object => (NodeKind::Object(ObjectData::default()), LexState::LeftBrace),
            Container::Array => (NodeKind::Array(Vec::new()), LexState::LeftBracket),
        };
        let span = Span::new(pos, pos + 1);
        let node = self.push_node(kind, span, pos)?;
        // A container that is a pair value gets attached when the pair reduces, after it
        // closes.
        if slot != Slot::PairValue {
            self.place(slot, node, pos)?;
        }
        self.push_frame(
            Frame {
                state,
                span,
                node: Some(node),
            },
            pos,
        )?;
        self.current = node;
        self.depth += 1;
        log::trace!("open {:?} at {} (depth {})", container, pos, self.depth);
        Ok(pos + 1)
    }

    fn close(&mut self, pos: usize, container: Container) -> Result<usize, ParseError> {
        let (open_state, closed_state, node_type) = match container {
            Container::Object => (LexState::LeftBrace, LexState::Object, NodeType::Object),
            Container::Array => (LexState::LeftBracket, LexState::Array, NodeType::Array),
        };
        let top = self.top();
        let legal = self.current_type() == node_type
            && match container {
                Container::Object => matches!(top, LexState::LeftBrace | LexState::Pair),
                Container::Array => top == LexState::LeftBracket || top.is_value(),
            };
        if !legal {
            return Err(self.unexpected(pos));
        }

        while let Some(frame) = self.stack.last() {
            if frame.state == open_state && frame.node == Some(self.current) {
                break;
            }
            self.stack.pop();
        }
        match self.stack.last_mut() {
            Some(frame) => {
                frame.state = closed_state;
                frame.span.end = pos + 1;
            }
            None => return Err(self.error(ParseErrorKind::Unbalanced, pos)),
        }

        let closed = self.current;
        self.arena.get_mut(closed).span.end = pos + 1;
        self.current = match self.arena.get(closed).parent {
            Some(parent) => parent,
            None => return Err(self.error(ParseErrorKind::Unbalanced, pos)),
        };
        self.depth -= 1;
        log::trace!("close {:?} at {} (depth {})", container, pos, self.depth);

        let below = self.stack.len().checked_sub(2).map(|i| self.stack[i].state);
        if below == Some(LexState::Colon) {
            self.reduce_pair(pos)?;
        }
        Ok(pos + 1)
    }

    fn string(&mut self, pos: usize) -> Result<usize, ParseError> {
        let slot = match (self.top(), self.current_type()) {
            (LexState::LeftBrace | LexState::Comma, NodeType::Object) => Slot::Key,
            _ => self.value_slot(pos)?,
        };
        let lexeme =
            scan_string(self.bytes, pos).map_err(|e| ParseError::from_lex(e, self.text))?;
        let node = self.push_node(NodeKind::String(lexeme.span), lexeme.span, pos)?;
        self.push_frame(
            Frame {
                state: LexState::String,
                span: lexeme.span,
                node: Some(node),
            },
            pos,
        )?;
        self.place(slot, node, pos)?;
        Ok(lexeme.next)
    }

    fn number(&mut self, pos: usize) -> Result<usize, ParseError> {
        let slot = self.value_slot(pos)?;
        let lexeme =
            scan_number(self.bytes, pos).map_err(|e| ParseError::from_lex(e, self.text))?;
        let node = self.push_node(NodeKind::Number(lexeme.span), lexeme.span, pos)?;
        self.push_frame(
            Frame {
                state: LexState::Number,
                span: lexeme.span,
                node: Some(node),
            },
            pos,
        )?;
        self.place(slot, node, pos)?;
        Ok(lexeme.next)
    }

    fn literal(&mut self, pos: usize) -> Result<usize, ParseError> {
        let slot = self.value_slot(pos)?;
        let lexeme =
            scan_literal(self.bytes, pos).map_err(|e| ParseError::from_lex(e, self.text))?;
        let kind = match lexeme.kind {
            LexemeKind::True => NodeKind::Bool(true),
            LexemeKind::False => NodeKind::Bool(false),
            _ => NodeKind::Null,
        };
        let node = self.push_node(kind, lexeme.span, pos)?;
        self.push_frame(
            Frame {
                state: LexState::Literal,
                span: lexeme.span,
                node: Some(node),
            },
            pos,
        )?;
        self.place(slot, node, pos)?;
        Ok(lexeme.next)
    }

    fn colon(&mut self, pos: usize) -> Result<usize, ParseError> {
        if self.top() != LexState::String || self.current_type() != NodeType::Object {
            return Err(self.unexpected(pos));
        }
        self.push_frame(
            Frame {
                state: LexState::Colon,
                span: Span::new(pos, pos + 1),
                node: None,
            },
            pos,
        )?;
        Ok(pos + 1)
    }

    fn comma(&mut self, pos: usize) -> Result<usize, ParseError> {
        let top = self.top();
        let legal = match self.current_type() {
            NodeType::Object => top == LexState::Pair,
            NodeType::Array => top.is_value(),
            _ => false,
        };
        if !legal {
            return Err(self.unexpected(pos));
        }
        self.push_frame(
            Frame {
                state: LexState::Comma,
                span: Span::new(pos, pos + 1),
                node: None,
            },
            pos,
        )?;
        Ok(pos + 1)
    }

    /// Replaces the `String Colon value` frames on top of the stack with a single pair and
    /// adds it to the current object.
    fn reduce_pair(&mut self, pos: usize) -> Result<(), ParseError> {
        let len = self.stack.len();
        if len < 4 {
            return Err(self.unexpected(pos));
        }
        let [key, colon, value] = [self.stack[len - 3], self.stack[len - 2], self.stack[len - 1]];
        if colon.state != LexState::Colon || !value.state.is_value() {
            return Err(self.unexpected(pos));
        }
        let (Some(key_node), Some(value_node)) = (key.node, value.node) else {
            return Err(self.error(ParseErrorKind::KeyNotString, key.span.start));
        };
        if key.state != LexState::String {
            return Err(self.error(ParseErrorKind::KeyNotString, key.span.start));
        }
        let before = self.stack[len - 4].state;
        if !matches!(before, LexState::LeftBrace | LexState::Comma)
            || self.current_type() != NodeType::Object
        {
            return Err(self.unexpected(pos));
        }
        self.stack.truncate(len - 3);

        let span = key.span.join(value.span);
        let pair = self.push_node(
            NodeKind::Pair {
                key: key_node,
                value: value_node,
            },
            span,
            pos,
        )?;
        log::trace!("reduce pair {} at {}..{}", pair.0, span.start, span.end);
        self.arena.get_mut(key_node).parent = Some(pair);
        self.arena.get_mut(value_node).parent = Some(pair);
        self.attach(self.current, pair, pos)?;
        self.push_frame(
            Frame {
                state: LexState::Pair,
                span,
                node: Some(pair),
            },
            pos,
        )
    }

    fn finish(self) -> Result<Arena, ParseError> {
        let complete = self.current == NodeId::ROOT
            && self.stack.len() == 2
            && matches!(self.top(), LexState::Object | LexState::Array);
        if !complete {
            log::debug!(
                "input ended with {} open frames, top is {}",
                self.stack.len(),
                self.top().describe()
            );
            return Err(self.error(ParseErrorKind::Unbalanced, self.bytes.len()));
        }
        Ok(self.arena)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(text: &str) -> Result<Arena, ParseError> {
        GrammarDriver::new(text, ParserOptions::default())?.run()
    }

    fn kind_of(text: &str) -> ParseErrorKind {
        parse(text).unwrap_err().kind
    }

    #[test]
    fn builds_parent_links() {
        let arena = parse(r#"{"a": [1, {"b": null}]}"#).unwrap();
        let NodeKind::Root { value: Some(object) } = arena.kind(NodeId::ROOT) else {
            panic!("root is empty");
        };
        let NodeKind::Object(data) = arena.kind(*object) else {
            panic!("not an object");
        };
        let pair = data.pairs[0];
        assert_eq!(arena.get(pair).parent, Some(*object));
        let NodeKind::Pair { key, value } = arena.kind(pair) else {
            panic!("not a pair");
        };
        assert_eq!(arena.get(*key).parent, Some(pair));
        assert_eq!(arena.get(*value).parent, Some(pair));
        let NodeKind::Array(items) = arena.kind(*value) else {
            panic!("not an array");
        };
        assert_eq!(items.len(), 2);
        for item in items {
            assert_eq!(arena.get(*item).parent, Some(*value));
        }
        assert_eq!(arena.get(*value).span, Span::new(6, 22));
    }

    #[test]
    fn rejects_misplaced_punctuation() {
        assert!(matches!(
            kind_of(r#"{"a":}"#),
            ParseErrorKind::Unexpected { found: '}', after: "':'" }
        ));
        assert!(matches!(
            kind_of("[1,]"),
            ParseErrorKind::Unexpected { found: ']', .. }
        ));
        assert!(matches!(
            kind_of(r#"{"a" 1}"#),
            ParseErrorKind::Unexpected { found: '1', .. }
        ));
        assert!(matches!(
            kind_of(r#"{1: 2}"#),
            ParseErrorKind::Unexpected { found: '1', .. }
        ));
        assert!(matches!(
            kind_of("[1 2]"),
            ParseErrorKind::Unexpected { found: '2', .. }
        ));
        assert!(matches!(
            kind_of(r#"["a": 1]"#),
            ParseErrorKind::Unexpected { found: ':', .. }
        ));
        assert!(matches!(
            kind_of("[}"),
            ParseErrorKind::Unexpected { found: '}', .. }
        ));
    }

    #[test]
    fn rejects_bare_scalars_and_trailing_values() {
        assert!(matches!(kind_of("1"), ParseErrorKind::Unexpected { .. }));
        assert!(matches!(kind_of(r#""a""#), ParseErrorKind::Unexpected { .. }));
        assert!(matches!(kind_of("[] []"), ParseErrorKind::Unexpected { .. }));
        assert!(matches!(kind_of("{} 1"), ParseErrorKind::Unexpected { .. }));
    }

    #[test]
    fn unbalanced_input() {
        assert_eq!(kind_of(""), ParseErrorKind::Unbalanced);
        assert_eq!(kind_of("   "), ParseErrorKind::Unbalanced);
        assert_eq!(kind_of(r#"{"a": [1, 2"#), ParseErrorKind::Unbalanced);
        assert_eq!(parse("[[").unwrap_err().offset, 2);
    }

    #[test]
    fn invalid_bytes() {
        assert_eq!(kind_of("[1, @]"), ParseErrorKind::InvalidByte(b'@'));
        assert_eq!(kind_of("[1]x"), ParseErrorKind::InvalidByte(b'x'));
    }

    #[test]
    fn depth_limit() {
        let options = ParserOptions {
            max_depth: Some(3),
            ..Default::default()
        };
        assert!(GrammarDriver::new("[[[1]]]", options).unwrap().run().is_ok());
        let err = GrammarDriver::new("[[[[1]]]]", options)
            .unwrap()
            .run()
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooDeep(3));
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn stack_grows_past_initial_capacity() {
        let options = ParserOptions {
            initial_stack_capacity: 0,
            ..Default::default()
        };
        let text = format!("{}{}", "[".repeat(100), "]".repeat(100));
        let arena = GrammarDriver::new(&text, options).unwrap().run().unwrap();
        assert_eq!(arena.len(), 101);
    }
}
