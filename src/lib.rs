//! A JSON parser that builds a tree of spans into its own copy of the input, and answers
//! path queries like `"store.books[2].title"` against it.
//!
//! Parsing is a single left-to-right pass without recursion. String and number values
//! are not converted until a typed getter asks for them.
//!
//! ```
//! use xson::{Document, QueryError};
//!
//! # fn main() {
//!     let doc = Document::parse(r#"{"a": {"b": [{"c": 5}]}, "ok": true}"#).unwrap();
//!     assert_eq!(doc.get_integer("a.b[0].c").unwrap(), 5);
//!     assert!(doc.get_bool("ok").unwrap());
//!     assert_eq!(doc.get_array_size("a.b").unwrap(), 1);
//!     assert_eq!(
//!         doc.get_integer("a.b[1].c"),
//!         Err(QueryError::IndexOutOfRange { index: 1, len: 1 })
//!     );
//! # }
//! ```

mod accessors;
mod document;
mod error;
mod expr;
mod node;
mod options;
mod pair_index;
mod parser;
mod render;

pub use accessors::FromJsonNumber;
pub use document::Document;
pub use error::{ConversionError, ParseError, ParseErrorKind, ParseStatus, QueryError};
pub use expr::{segments, Segment};
pub use node::{NodeId, NodeRef, NodeType};
pub use options::{CapacityPolicy, EscapeMode, ParserOptions};
pub use xson_lexer::{Location, Span};
