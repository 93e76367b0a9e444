use thiserror::Error;

/// What went wrong while recognizing a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape character {0:#x}")]
    InvalidEscape(u8),
    #[error("\\u escape must be followed by 4 hex digits, found byte {0:#x}")]
    InvalidUnicodeEscape(u8),
    #[error("unpaired UTF-16 surrogate {0:#x}")]
    UnpairedSurrogate(u16),
    #[error("malformed number literal")]
    MalformedNumber,
    #[error("unexpected byte {0:#x} in literal")]
    MalformedLiteral(u8),
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// A lexical error and the byte offset at which the recognizer gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

impl LexError {
    pub fn new(kind: LexErrorKind, offset: usize) -> LexError {
        LexError { kind, offset }
    }
}

/// A type alias for `Result<T, LexError>`.
pub type LexResult<T> = Result<T, LexError>;
