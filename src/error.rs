use thiserror::Error;
use xson_lexer::{LexError, LexErrorKind, Location};

use crate::node::NodeType;

/// The discriminated outcome of a failed parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    InvalidJson,
    OutOfMemory,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Lexical(#[from] LexErrorKind),
    #[error("invalid byte {0:#x}")]
    InvalidByte(u8),
    #[error("'{found}' is not allowed after {after}")]
    Unexpected { found: char, after: &'static str },
    #[error("object key must be a string")]
    KeyNotString,
    #[error("a {child} cannot be placed inside a {parent}")]
    CannotAttach { child: NodeType, parent: NodeType },
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("out of memory")]
    OutOfMemory,
    #[error("unbalanced structure")]
    Unbalanced,
}

/// The error type returned by [`Document::parse`](crate::Document::parse). Comes with
/// location information and a short excerpt of the input around the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {location}: {kind} near {context:?}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub location: Location,
    pub context: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, text: &str, offset: usize) -> ParseError {
        ParseError {
            kind,
            offset,
            location: Location::of_offset(text.as_bytes(), offset),
            context: context_window(text, offset).to_string(),
        }
    }

    pub(crate) fn from_lex(err: LexError, text: &str) -> ParseError {
        ParseError::new(ParseErrorKind::Lexical(err.kind), text, err.offset)
    }

    pub fn status(&self) -> ParseStatus {
        match self.kind {
            ParseErrorKind::OutOfMemory => ParseStatus::OutOfMemory,
            ParseErrorKind::Unbalanced => ParseStatus::Error,
            _ => ParseStatus::InvalidJson,
        }
    }
}

const CONTEXT_RADIUS: usize = 10;

/// Up to `CONTEXT_RADIUS` bytes on either side of `offset`, widened to char boundaries.
fn context_window(text: &str, offset: usize) -> &str {
    let mut start = offset.saturating_sub(CONTEXT_RADIUS).min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = offset.saturating_add(CONTEXT_RADIUS).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

/// An allocation request that could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AllocError;

impl From<std::collections::TryReserveError> for AllocError {
    fn from(_: std::collections::TryReserveError) -> Self {
        AllocError
    }
}

impl From<smallvec::CollectionAllocErr> for AllocError {
    fn from(_: smallvec::CollectionAllocErr) -> Self {
        AllocError
    }
}

impl From<AllocError> for ParseErrorKind {
    fn from(_: AllocError) -> Self {
        ParseErrorKind::OutOfMemory
    }
}

impl From<AllocError> for QueryError {
    fn from(_: AllocError) -> Self {
        QueryError::OutOfMemory
    }
}

/// A failed numeric or string conversion of a resolved leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("{text} is out of range for {target}")]
    OutOfRange { text: String, target: &'static str },
    #[error("{text:?} is not a valid {target}")]
    Malformed { text: String, target: &'static str },
    #[error("cannot decode string: {0}")]
    Escape(#[from] LexError),
}

/// Why an expression could not be resolved or converted.
///
/// A failed query never affects the document; callers can keep querying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("expression reached a null value")]
    NullTarget,
    #[error("out of memory")]
    OutOfMemory,
    #[error("index {index} is out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("key {0:?} not found")]
    KeyNotFound(String),
    #[error("cannot navigate into a {0} node")]
    OperationNotSupported(NodeType),
    #[error("invalid expression {0:?}")]
    InvalidExpression(String),
    #[error("expected {expected} but found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: NodeType,
    },
    #[error("string of {needed} bytes does not fit in {capacity} bytes")]
    CapacityExceeded { needed: usize, capacity: usize },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
