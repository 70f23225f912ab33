//! Causes of `Error` tokens.

use tblgen_core::text::TextSpan;
use tblgen_diagnostics::{messages, Diagnostic};
use thiserror::Error;

/// Why the scanner produced an `Error` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Input ended before the closing quote. `offset` is the opening quote.
    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },

    /// A character that starts no token.
    #[error("invalid character {ch:?} at byte {offset}")]
    UnrecognizedCharacter { ch: char, offset: usize },

    /// A byte sequence that is not well-formed UTF-8.
    #[error("invalid UTF-8 sequence of {len} byte(s) at byte {offset}")]
    InvalidUtf8 { offset: usize, len: usize },
}

impl ScanError {
    /// Byte offset of the offending input.
    pub fn offset(&self) -> usize {
        match *self {
            ScanError::UnterminatedString { offset }
            | ScanError::UnrecognizedCharacter { offset, .. }
            | ScanError::InvalidUtf8 { offset, .. } => offset,
        }
    }

    /// The bytes the error points at.
    pub fn span(&self) -> TextSpan {
        match *self {
            ScanError::UnterminatedString { offset } => TextSpan::new(offset, 1),
            ScanError::UnrecognizedCharacter { ch, offset } => TextSpan::new(offset, ch.len_utf8()),
            ScanError::InvalidUtf8 { offset, len } => TextSpan::new(offset, len),
        }
    }

    /// Diagnostic code reported for this error.
    pub fn code(&self) -> u32 {
        match self {
            ScanError::UnterminatedString { .. } => messages::UNTERMINATED_STRING_LITERAL.code,
            ScanError::UnrecognizedCharacter { .. } => messages::INVALID_CHARACTER.code,
            ScanError::InvalidUtf8 { .. } => messages::INVALID_UTF8_SEQUENCE.code,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = self.span();
        match *self {
            ScanError::UnterminatedString { .. } => {
                Diagnostic::at(span, &messages::UNTERMINATED_STRING_LITERAL, &[])
            }
            ScanError::UnrecognizedCharacter { ch, .. } => {
                let ch = ch.escape_debug().to_string();
                Diagnostic::at(span, &messages::INVALID_CHARACTER, &[&ch])
            }
            ScanError::InvalidUtf8 { len, .. } => {
                let len = len.to_string();
                Diagnostic::at(span, &messages::INVALID_UTF8_SEQUENCE, &[&len])
            }
        }
    }
}

impl From<ScanError> for Diagnostic {
    fn from(error: ScanError) -> Self {
        error.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ScanError::UnterminatedString { offset: 0 },
            ScanError::UnrecognizedCharacter { ch: '@', offset: 0 },
            ScanError::InvalidUtf8 { offset: 0, len: 1 },
        ];
        assert_eq!(errors.map(|e| e.code()), [1002, 1127, 1128]);
    }

    #[test]
    fn test_unrecognized_character_span_covers_whole_character() {
        let err = ScanError::UnrecognizedCharacter { ch: '本', offset: 6 };
        assert_eq!(err.offset(), 6);
        assert_eq!(err.span(), TextSpan::new(6, 3));
    }

    #[test]
    fn test_to_diagnostic() {
        let diag = ScanError::UnrecognizedCharacter { ch: '$', offset: 2 }.to_diagnostic();
        assert_eq!(diag.code, 1127);
        assert_eq!(diag.message_text, "Invalid character '$'.");
        assert_eq!(diag.span, Some(TextSpan::new(2, 1)));

        let diag: Diagnostic = ScanError::InvalidUtf8 { offset: 9, len: 3 }.into();
        assert_eq!(diag.message_text, "Invalid UTF-8 sequence of 3 byte(s).");
        assert_eq!(diag.span, Some(TextSpan::new(9, 3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ScanError::UnterminatedString { offset: 4 }.to_string(),
            "unterminated string literal starting at byte 4"
        );
        assert_eq!(
            ScanError::UnrecognizedCharacter { ch: '\u{7}', offset: 0 }.to_string(),
            "invalid character '\\u{7}' at byte 0"
        );
    }
}
