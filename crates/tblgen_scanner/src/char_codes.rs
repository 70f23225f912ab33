//! Character code constants and class predicates used by the scanner.
//!
//! Every class the scanner recognizes is ASCII-only; characters outside
//! the 7-bit range never start or continue a token other than a quoted
//! string.

pub const MAX_ASCII_CHARACTER: u8 = 0x7F;

pub const TAB: char = '\t';
pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const SPACE: char = ' ';
pub const DOUBLE_QUOTE: char = '"';
pub const UNDERSCORE: char = '_';

/// Maximum width in bytes of one UTF-8 encoded character.
pub const MAX_UTF8_WIDTH: usize = 4;

/// Check if a character is skipped between tokens.
#[inline]
pub fn is_white_space(ch: char) -> bool {
    matches!(ch, SPACE | TAB | LINE_FEED | CARRIAGE_RETURN)
}

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == UNDERSCORE
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_digit(ch)
}

/// Width of the UTF-8 sequence introduced by `lead`, or 0 if `lead` cannot
/// start a well-formed sequence.
#[inline]
pub fn utf8_sequence_width(lead: u8) -> usize {
    match lead {
        0x00..=MAX_ASCII_CHARACTER => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => MAX_UTF8_WIDTH,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_ascii_only() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('Z'));
        assert!(!is_identifier_start('9'));
        assert!(is_identifier_part('9'));
        assert!(!is_identifier_start('é'));
        assert!(!is_digit('٣')); // Arabic-Indic digit three
        assert!(!is_white_space('\u{00A0}'));
        assert!(!is_white_space('\u{000B}'));
    }

    #[test]
    fn test_utf8_sequence_width() {
        assert_eq!(utf8_sequence_width(b'a'), 1);
        assert_eq!(utf8_sequence_width(0xC3), 2); // ä
        assert_eq!(utf8_sequence_width(0xE6), 3); // 本
        assert_eq!(utf8_sequence_width(0xF0), 4);
        assert_eq!(utf8_sequence_width(0x80), 0); // continuation byte
        assert_eq!(utf8_sequence_width(0xC0), 0); // overlong lead
        assert_eq!(utf8_sequence_width(0xFF), 0);
    }
}
