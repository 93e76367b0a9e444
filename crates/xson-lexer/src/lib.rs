//! Token recognizers for JSON. This crate provides three finite state machines, one each
//! for string, number and literal (`true`, `false`, `null`) tokens, plus the byte
//! classifiers they are built from.
//!
//! Recognizers never copy: they report a [`Span`] into the caller's buffer and the offset
//! at which scanning should continue. Decoding escape sequences is a separate, optional
//! step ([`unescape`]).
//!
//! ```
//! use xson_lexer::{scan_number, scan_string, LexemeKind};
//!
//! # fn main() {
//!     let s = br#""key": -12.5e3]"#;
//!     let key = scan_string(s, 0).unwrap();
//!     assert_eq!(&s[key.span.start..key.span.end], b"key");
//!     let number = scan_number(s, 7).unwrap();
//!     assert_eq!(number.kind, LexemeKind::Number);
//!     assert_eq!(&s[number.span.start..number.span.end], b"-12.5e3");
//!     assert_eq!(s[number.next], b']');
//! # }
//! ```

mod classify;
mod error;
mod fsm;
mod location;
mod unescape;

pub use classify::*;
pub use error::*;
pub use fsm::*;
pub use location::*;
pub use unescape::*;
