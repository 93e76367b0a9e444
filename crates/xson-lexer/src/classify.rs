//! Byte classifiers shared by the token recognizers and the grammar driver.

/// `0`..=`9`
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// `1`..=`9`, the only digits a multi-digit integer part may start with.
pub fn is_digit_1_9(b: u8) -> bool {
    matches!(b, b'1'..=b'9')
}

/// The sign allowed after an exponent marker.
pub fn is_sign(b: u8) -> bool {
    matches!(b, b'+' | b'-')
}

pub fn is_exponent(b: u8) -> bool {
    matches!(b, b'e' | b'E')
}

pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

// Note: u8::is_ascii_whitespace is not usable here because it includes U+000C FORM FEED,
// which is not whitespace in JSON.
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x20 | 0xa | 0xd | 0x9)
}

/// A byte that starts a number token: a minus sign or a digit.
pub fn is_number_start(b: u8) -> bool {
    b == b'-' || is_digit(b)
}

/// Value of a hexadecimal digit, or `None` if `b` is not one.
pub fn hex_value(b: u8) -> Option<u8> {
    if b.is_ascii_digit() {
        Some(b - b'0')
    } else if (b'a'..=b'f').contains(&b) {
        Some(10 + (b - b'a'))
    } else if (b'A'..=b'F').contains(&b) {
        Some(10 + (b - b'A'))
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn form_feed_is_not_whitespace() {
        assert!(is_whitespace(b' '));
        assert!(is_whitespace(b'\t'));
        assert!(is_whitespace(b'\r'));
        assert!(is_whitespace(b'\n'));
        assert!(!is_whitespace(0x0c));
    }

    #[test]
    fn number_start() {
        assert!(is_number_start(b'-'));
        assert!(is_number_start(b'0'));
        assert!(!is_number_start(b'+'));
        assert!(!is_number_start(b'.'));
    }

    #[test]
    fn hex_values() {
        assert_eq!(hex_value(b'7'), Some(7));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
    }
}
