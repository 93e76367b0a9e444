//! Explicit state machines for the three kinds of JSON tokens that carry a value.
//!
//! Every machine consumes one byte per `step` and never backtracks, so recognition is
//! linear in the token length. The `scan_*` functions run a machine over a buffer from a
//! start offset and report the token span together with the offset at which the caller
//! should resume.

use crate::classify::{is_digit, is_digit_1_9, is_exponent, is_hex_digit, is_sign};
use crate::error::{LexError, LexErrorKind, LexResult};
use crate::location::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    String,
    Number,
    True,
    False,
    Null,
}

/// A recognized token.
///
/// For strings, `span` covers the raw contents between the quotes (escapes are left as
/// written). `next` is the offset of the first byte after the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub span: Span,
    pub next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringState {
    /// Just past the opening quote.
    Start,
    /// Inside a run of ordinary characters.
    Unescaped,
    Backslash,
    /// A complete two-character escape such as `\n`.
    Escaped,
    /// Saw `\u`, expecting the first of four hex digits.
    EscapeU,
    EscapeHex1,
    EscapeHex2,
    EscapeHex3,
    /// All four hex digits of a `\uXXXX` escape seen.
    EscapeHex4,
    End,
    Invalid,
}

#[derive(Debug, Clone)]
pub struct StringFsm {
    state: StringState,
}

impl Default for StringFsm {
    fn default() -> Self {
        StringFsm::new()
    }
}

impl StringFsm {
    pub fn new() -> Self {
        StringFsm {
            state: StringState::Start,
        }
    }

    pub fn state(&self) -> StringState {
        self.state
    }

    pub fn step(&mut self, b: u8) -> StringState {
        use StringState::*;
        self.state = match self.state {
            Start | Unescaped | Escaped | EscapeHex4 => match b {
                b'"' => End,
                b'\\' => Backslash,
                _ => Unescaped,
            },
            Backslash => match b {
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => Escaped,
                b'u' => EscapeU,
                _ => Invalid,
            },
            EscapeU if is_hex_digit(b) => EscapeHex1,
            EscapeHex1 if is_hex_digit(b) => EscapeHex2,
            EscapeHex2 if is_hex_digit(b) => EscapeHex3,
            EscapeHex3 if is_hex_digit(b) => EscapeHex4,
            EscapeU | EscapeHex1 | EscapeHex2 | EscapeHex3 | End | Invalid => Invalid,
        };
        self.state
    }
}

/// Recognizes a string literal whose opening quote is at `open`.
pub fn scan_string(bytes: &[u8], open: usize) -> LexResult<Lexeme> {
    debug_assert_eq!(bytes.get(open), Some(&b'"'));
    let mut fsm = StringFsm::new();
    let mut pos = open + 1;
    while let Some(&b) = bytes.get(pos) {
        let before = fsm.state();
        match fsm.step(b) {
            StringState::End => {
                return Ok(Lexeme {
                    kind: LexemeKind::String,
                    span: Span::new(open + 1, pos),
                    next: pos + 1,
                });
            }
            StringState::Invalid => {
                let kind = if before == StringState::Backslash {
                    LexErrorKind::InvalidEscape(b)
                } else {
                    LexErrorKind::InvalidUnicodeEscape(b)
                };
                return Err(LexError::new(kind, pos));
            }
            _ => pos += 1,
        }
    }
    Err(LexError::new(LexErrorKind::UnterminatedString, pos))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberState {
    Start,
    Minus,
    /// A leading `0`, which can only be followed by a fraction or an exponent.
    Zero,
    Integer,
    Dot,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
    End,
    Invalid,
}

#[derive(Debug, Clone)]
pub struct NumberFsm {
    state: NumberState,
}

impl Default for NumberFsm {
    fn default() -> Self {
        NumberFsm::new()
    }
}

impl NumberFsm {
    pub fn new() -> Self {
        NumberFsm {
            state: NumberState::Start,
        }
    }

    pub fn state(&self) -> NumberState {
        self.state
    }

    /// Feeds the next byte, or `None` at the end of the input.
    ///
    /// `End` means the byte did not belong to the number; it must not be consumed.
    pub fn step(&mut self, b: Option<u8>) -> NumberState {
        use NumberState::*;
        self.state = match (self.state, b) {
            (Start, Some(b'-')) => Minus,
            (Start | Minus, Some(b'0')) => Zero,
            (Start | Minus, Some(b)) if is_digit_1_9(b) => Integer,
            (Zero | Integer, Some(b'.')) => Dot,
            (Integer, Some(b)) if is_digit(b) => Integer,
            (Zero | Integer | Fraction, Some(b)) if is_exponent(b) => Exponent,
            (Dot | Fraction, Some(b)) if is_digit(b) => Fraction,
            (Exponent, Some(b)) if is_sign(b) => ExponentSign,
            (Exponent | ExponentSign | ExponentDigits, Some(b)) if is_digit(b) => ExponentDigits,
            (Zero | Integer | Fraction | ExponentDigits, _) => End,
            _ => Invalid,
        };
        self.state
    }
}

/// Recognizes a number literal starting at `start`.
///
/// The returned `next` points at the first byte that could not extend the number.
pub fn scan_number(bytes: &[u8], start: usize) -> LexResult<Lexeme> {
    let mut fsm = NumberFsm::new();
    let mut pos = start;
    loop {
        match fsm.step(bytes.get(pos).copied()) {
            NumberState::End => {
                return Ok(Lexeme {
                    kind: LexemeKind::Number,
                    span: Span::new(start, pos),
                    next: pos,
                });
            }
            NumberState::Invalid => {
                return Err(LexError::new(LexErrorKind::MalformedNumber, pos));
            }
            _ => pos += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralState {
    Start,
    T,
    Tr,
    Tru,
    F,
    Fa,
    Fal,
    Fals,
    N,
    Nu,
    Nul,
    End(LexemeKind),
    Invalid,
}

#[derive(Debug, Clone)]
pub struct LiteralFsm {
    state: LiteralState,
}

impl Default for LiteralFsm {
    fn default() -> Self {
        LiteralFsm::new()
    }
}

impl LiteralFsm {
    pub fn new() -> Self {
        LiteralFsm {
            state: LiteralState::Start,
        }
    }

    pub fn state(&self) -> LiteralState {
        self.state
    }

    pub fn step(&mut self, b: u8) -> LiteralState {
        use LiteralState::*;
        self.state = match (self.state, b) {
            (Start, b't') => T,
            (T, b'r') => Tr,
            (Tr, b'u') => Tru,
            (Tru, b'e') => End(LexemeKind::True),
            (Start, b'f') => F,
            (F, b'a') => Fa,
            (Fa, b'l') => Fal,
            (Fal, b's') => Fals,
            (Fals, b'e') => End(LexemeKind::False),
            (Start, b'n') => N,
            (N, b'u') => Nu,
            (Nu, b'l') => Nul,
            (Nul, b'l') => End(LexemeKind::Null),
            _ => Invalid,
        };
        self.state
    }
}

/// Recognizes `true`, `false` or `null` starting at `start`.
///
/// The literal must not run into further identifier characters, so `trueish` is rejected.
pub fn scan_literal(bytes: &[u8], start: usize) -> LexResult<Lexeme> {
    let mut fsm = LiteralFsm::new();
    let mut pos = start;
    loop {
        let Some(&b) = bytes.get(pos) else {
            return Err(LexError::new(LexErrorKind::UnexpectedEof, pos));
        };
        match fsm.step(b) {
            LiteralState::End(kind) => {
                let next = pos + 1;
                if let Some(&after) = bytes.get(next) {
                    if after.is_ascii_alphanumeric() {
                        return Err(LexError::new(LexErrorKind::MalformedLiteral(after), next));
                    }
                }
                return Ok(Lexeme {
                    kind,
                    span: Span::new(start, next),
                    next,
                });
            }
            LiteralState::Invalid => {
                return Err(LexError::new(LexErrorKind::MalformedLiteral(b), pos));
            }
            _ => pos += 1,
        }
    }
}
