use std::fmt;

/// A byte offset and the corresponding line and column number.
///
/// Lines start at 1, columns at 0, matching what editors report for the byte
/// before the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub byte_offset: u64,
    pub line: u64,
    pub col: u64,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            byte_offset: 0,
            line: 1,
            col: 0,
        }
    }
}

impl Location {
    /// Computes the location of `offset` by walking `bytes` from the start.
    ///
    /// Only used on the error path, so the linear walk is fine.
    pub fn of_offset(bytes: &[u8], offset: usize) -> Location {
        let mut location = Location::default();
        for &b in &bytes[..offset.min(bytes.len())] {
            location.advance_by_byte(b);
        }
        location
    }

    fn advance_by_byte(&mut self, c: u8) {
        if c == b'\n' {
            self.col = 0;
            self.line += 1;
        } else {
            self.col += 1;
        }
        self.byte_offset += 1;
    }
}

/// A half-open byte range `start..end` into the document buffer.
///
/// Token values are stored as spans rather than copies; the buffer they point into must
/// outlive them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line:{}, col:{}", self.line, self.col)
    }
}
