use std::borrow::Cow;

use smallvec::SmallVec;

use crate::classify::hex_value;
use crate::error::{LexError, LexErrorKind, LexResult};

/// Decodes the escape sequences of a raw string view (the text between the quotes).
///
/// Returns the input unchanged if it contains no backslash. Error offsets are relative to
/// the start of `raw`.
pub fn unescape(raw: &str) -> LexResult<Cow<'_, str>> {
    if !raw.contains('\\') {
        return Ok(Cow::Borrowed(raw));
    }

    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let run_end = raw[pos..].find('\\').map_or(bytes.len(), |i| pos + i);
        out.push_str(&raw[pos..run_end]);
        pos = run_end;
        if pos == bytes.len() {
            break;
        }

        // bytes[pos] is a backslash.
        let escaped = *bytes
            .get(pos + 1)
            .ok_or(LexError::new(LexErrorKind::UnexpectedEof, pos + 1))?;
        pos += 2;
        let c = match escaped {
            b'\\' => '\\',
            b'/' => '/',
            b'"' => '"',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let u = read_hex4(bytes, pos)?;
                pos += 4;
                match u {
                    0xD800..=0xDBFF => {
                        // First surrogate; the second one must follow directly.
                        if bytes.get(pos) != Some(&b'\\') || bytes.get(pos + 1) != Some(&b'u') {
                            return Err(LexError::new(LexErrorKind::UnpairedSurrogate(u), pos));
                        }
                        let u2 = read_hex4(bytes, pos + 2)?;
                        if !matches!(u2, 0xDC00..=0xDFFF) {
                            return Err(LexError::new(LexErrorKind::UnpairedSurrogate(u), pos));
                        }
                        pos += 6;
                        // Assemble the pair the same way char::decode_utf16 does it.
                        let c = ((((u & 0x3ff) as u32) << 10) | (u2 & 0x3ff) as u32) + 0x1_0000;
                        char::from_u32(c)
                            .ok_or(LexError::new(LexErrorKind::UnpairedSurrogate(u), pos))?
                    }
                    0xDC00..=0xDFFF => {
                        return Err(LexError::new(LexErrorKind::UnpairedSurrogate(u), pos - 6));
                    }
                    _ => char::from_u32(u as u32)
                        .ok_or(LexError::new(LexErrorKind::UnpairedSurrogate(u), pos))?,
                }
            }
            b => return Err(LexError::new(LexErrorKind::InvalidEscape(b), pos - 1)),
        };
        out.push(c);
    }
    Ok(Cow::Owned(out))
}

fn read_hex4(bytes: &[u8], start: usize) -> LexResult<u16> {
    let digits: SmallVec<[u8; 4]> = bytes.iter().skip(start).take(4).copied().collect();
    if digits.len() < 4 {
        return Err(LexError::new(
            LexErrorKind::UnexpectedEof,
            start + digits.len(),
        ));
    }
    let mut u = 0u16;
    for (i, &b) in digits.iter().enumerate() {
        match hex_value(b) {
            Some(h) => u = u * 0x10 + h as u16,
            None => {
                return Err(LexError::new(
                    LexErrorKind::InvalidUnicodeEscape(b),
                    start + i,
                ))
            }
        }
    }
    Ok(u)
}
