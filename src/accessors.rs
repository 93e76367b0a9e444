//! Typed getters: resolve an expression, then convert the leaf it lands on.

use std::borrow::Cow;

use xson_lexer::unescape;

use crate::document::Document;
use crate::error::{AllocError, ConversionError, QueryError};
use crate::node::{NodeKind, NodeRef};
use crate::options::{CapacityPolicy, EscapeMode};

/// Numeric types a JSON number can be read as.
pub trait FromJsonNumber: Sized {
    /// Converts the textual form of a number. `text` is always lexically valid JSON.
    fn from_json_number(text: &str) -> Result<Self, ConversionError>;
}

fn out_of_range(text: &str, target: &'static str) -> ConversionError {
    ConversionError::OutOfRange {
        text: text.to_string(),
        target,
    }
}

fn malformed(text: &str, target: &'static str) -> ConversionError {
    ConversionError::Malformed {
        text: text.to_string(),
        target,
    }
}

macro_rules! impl_from_json_number_int {
    ($($ty:ty),*) => {
        $(
            impl FromJsonNumber for $ty {
                fn from_json_number(text: &str) -> Result<$ty, ConversionError> {
                    use std::num::IntErrorKind;
                    let target = stringify!($ty);
                    match text.parse::<$ty>() {
                        Ok(n) => Ok(n),
                        Err(e) => match e.kind() {
                            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                                Err(out_of_range(text, target))
                            }
                            _ => match text.strip_prefix('-') {
                                // A negative integer for an unsigned target. "-0" is still 0.
                                Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => {
                                    if digits.bytes().all(|b| b == b'0') {
                                        Ok(0)
                                    } else {
                                        Err(out_of_range(text, target))
                                    }
                                }
                                _ => Err(malformed(text, target)),
                            },
                        },
                    }
                }
            }
        )*
    };
}

macro_rules! impl_from_json_number_float {
    ($($ty:ty),*) => {
        $(
            impl FromJsonNumber for $ty {
                fn from_json_number(text: &str) -> Result<$ty, ConversionError> {
                    let target = stringify!($ty);
                    match text.parse::<$ty>() {
                        Ok(n) if n.is_infinite() => Err(out_of_range(text, target)),
                        Ok(n) => Ok(n),
                        Err(_) => Err(malformed(text, target)),
                    }
                }
            }
        )*
    };
}

impl_from_json_number_int!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_from_json_number_float!(f32, f64);

impl<'a> NodeRef<'a> {
    fn number_text(&self) -> Result<&'a str, QueryError> {
        self.as_number_text().ok_or(QueryError::TypeMismatch {
            expected: "number",
            found: self.node_type(),
        })
    }

    /// Reads this number node as `T`.
    pub fn to_number<T: FromJsonNumber>(&self) -> Result<T, QueryError> {
        Ok(T::from_json_number(self.number_text()?)?)
    }

    pub fn to_bool(&self) -> Result<bool, QueryError> {
        match self.kind() {
            NodeKind::Bool(b) => Ok(*b),
            _ => Err(QueryError::TypeMismatch {
                expected: "bool",
                found: self.node_type(),
            }),
        }
    }

    /// Reads this string node into a new `String` of at most `capacity` bytes, following
    /// the document's [`EscapeMode`] and [`CapacityPolicy`].
    pub fn to_string_with_capacity(&self, capacity: usize) -> Result<String, QueryError> {
        let raw = self.as_str().ok_or(QueryError::TypeMismatch {
            expected: "string",
            found: self.node_type(),
        })?;
        let options = self.doc.options();
        let value = match options.escapes {
            EscapeMode::Raw => Cow::Borrowed(raw),
            EscapeMode::Decode => unescape(raw).map_err(ConversionError::from)?,
        };

        let fitted = if value.len() <= capacity {
            &value[..]
        } else {
            match options.capacity_policy {
                CapacityPolicy::Fail => {
                    return Err(QueryError::CapacityExceeded {
                        needed: value.len(),
                        capacity,
                    })
                }
                CapacityPolicy::Truncate => {
                    let mut end = capacity;
                    while !value.is_char_boundary(end) {
                        end -= 1;
                    }
                    &value[..end]
                }
            }
        };

        let mut out = String::new();
        out.try_reserve_exact(fitted.len()).map_err(AllocError::from)?;
        out.push_str(fitted);
        Ok(out)
    }

    /// Number of elements of this array node.
    pub fn array_size(&self) -> Result<usize, QueryError> {
        match self.kind() {
            NodeKind::Array(items) => Ok(items.len()),
            _ => Err(QueryError::TypeMismatch {
                expected: "array",
                found: self.node_type(),
            }),
        }
    }

    /// Number of pairs of this object node, duplicate keys included.
    pub fn object_size(&self) -> Result<usize, QueryError> {
        match self.kind() {
            NodeKind::Object(data) => Ok(data.pairs.len()),
            _ => Err(QueryError::TypeMismatch {
                expected: "object",
                found: self.node_type(),
            }),
        }
    }
}

/// Expression-based getters. Every one of them starts at the root.
impl Document {
    /// Resolves `expr` against the document. The empty expression returns the top-level
    /// value.
    pub fn evaluate(&self, expr: &str) -> Result<NodeRef<'_>, QueryError> {
        self.root().evaluate(expr)
    }

    /// ```
    /// use xson::Document;
    ///
    /// let doc = Document::parse(r#"{"sizes": [8, 16, 256]}"#).unwrap();
    /// assert_eq!(doc.get_number::<u8>("sizes[1]").unwrap(), 16);
    /// assert!(doc.get_number::<u8>("sizes[2]").is_err());
    /// ```
    pub fn get_number<T: FromJsonNumber>(&self, expr: &str) -> Result<T, QueryError> {
        self.evaluate(expr)?.to_number()
    }

    pub fn get_integer(&self, expr: &str) -> Result<i64, QueryError> {
        self.get_number(expr)
    }

    pub fn get_unsigned(&self, expr: &str) -> Result<u64, QueryError> {
        self.get_number(expr)
    }

    pub fn get_double(&self, expr: &str) -> Result<f64, QueryError> {
        self.get_number(expr)
    }

    pub fn get_bool(&self, expr: &str) -> Result<bool, QueryError> {
        self.evaluate(expr)?.to_bool()
    }

    /// Copies the string at `expr`, bounded by `capacity` bytes. What happens with longer
    /// values depends on [`ParserOptions::capacity_policy`](crate::ParserOptions).
    pub fn get_string(&self, expr: &str, capacity: usize) -> Result<String, QueryError> {
        self.evaluate(expr)?.to_string_with_capacity(capacity)
    }

    pub fn get_array_size(&self, expr: &str) -> Result<usize, QueryError> {
        self.evaluate(expr)?.array_size()
    }

    pub fn get_object_size(&self, expr: &str) -> Result<usize, QueryError> {
        self.evaluate(expr)?.object_size()
    }
}
