/// Configuration for parsing a [`Document`](crate::Document) and for the typed accessors
/// that later read from it.
///
/// ```rust
/// use xson::{CapacityPolicy, Document, EscapeMode, ParserOptions};
///
/// let options = ParserOptions {
///     escapes: EscapeMode::Decode,
///     capacity_policy: CapacityPolicy::Truncate,
///     ..Default::default()
/// };
/// let doc = Document::parse_with_options(r#"{"name": "caf\u00e9 au lait"}"#, options).unwrap();
/// assert_eq!(doc.get_string("name", 5).unwrap(), "café");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Number of lexical stack frames reserved before parsing starts. The stack grows on
    /// demand past this.
    ///
    /// # Default
    ///
    /// `32`
    pub initial_stack_capacity: usize,

    /// Maximum container nesting depth. Documents nested deeper fail with
    /// [`ParseErrorKind::TooDeep`](crate::ParseErrorKind::TooDeep).
    ///
    /// # Default
    ///
    /// `None` (unlimited; the parser does not recurse)
    pub max_depth: Option<usize>,

    /// How string accessors treat escape sequences.
    ///
    /// # Default
    ///
    /// [`EscapeMode::Raw`]
    pub escapes: EscapeMode,

    /// What `get_string` does with a value longer than the requested capacity.
    ///
    /// # Default
    ///
    /// [`CapacityPolicy::Fail`]
    pub capacity_policy: CapacityPolicy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            initial_stack_capacity: 32,
            max_depth: None,
            escapes: EscapeMode::Raw,
            capacity_policy: CapacityPolicy::Fail,
        }
    }
}

/// Whether string values are returned as written in the document or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Return the text between the quotes exactly as it appears in the input, so
    /// `"\u0041"` reads back as the six characters `\u0041`.
    #[default]
    Raw,
    /// Decode `\n`, `\"`, `\uXXXX` (including surrogate pairs) and friends.
    Decode,
}

/// Policy for strings that exceed the caller-supplied capacity (in bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// Return [`QueryError::CapacityExceeded`](crate::QueryError::CapacityExceeded).
    #[default]
    Fail,
    /// Keep the longest prefix that fits and ends on a char boundary.
    Truncate,
}
