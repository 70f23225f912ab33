//! Tokens produced by the scanner.

use serde::{Serialize, Serializer};
use std::fmt;
use tblgen_core::text::TextSpan;

/// The closed set of token categories.
///
/// `Error` and `EndOfInput` are reserved kinds that carry no text. Every
/// operator kind corresponds to exactly one ASCII punctuation character,
/// see [`TokenKind::from_ascii_operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Reserved
    Error,
    EndOfInput,

    /// Declared for grammar layers built on top of the scanner. The scanner
    /// itself never produces it.
    Comment,
    Identifier,
    Number,
    QuotedString,

    // Operators
    Plus,
    Minus,
    Multiply,
    Period,
    Backslash,
    Colon,
    Percent,
    Pipe,
    Exclamation,
    Question,
    Pound,
    Ampersand,
    Semi,
    Comma,
    LParen,
    RParen,
    LAngle,
    RAngle,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
}

impl TokenKind {
    /// Every operator kind, in declaration order.
    pub const OPERATORS: [TokenKind; 23] = [
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Multiply,
        TokenKind::Period,
        TokenKind::Backslash,
        TokenKind::Colon,
        TokenKind::Percent,
        TokenKind::Pipe,
        TokenKind::Exclamation,
        TokenKind::Question,
        TokenKind::Pound,
        TokenKind::Ampersand,
        TokenKind::Semi,
        TokenKind::Comma,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LAngle,
        TokenKind::RAngle,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::Equals,
    ];

    /// Look up the operator spelled by a single byte.
    ///
    /// Bytes outside the 7-bit range are rejected before the table is
    /// consulted, so no non-ASCII byte ever maps to an operator.
    pub fn from_ascii_operator(byte: u8) -> Option<TokenKind> {
        if !byte.is_ascii() {
            return None;
        }
        let kind = match byte {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Multiply,
            b'.' => TokenKind::Period,
            b'\\' => TokenKind::Backslash,
            b':' => TokenKind::Colon,
            b'%' => TokenKind::Percent,
            b'|' => TokenKind::Pipe,
            b'!' => TokenKind::Exclamation,
            b'?' => TokenKind::Question,
            b'#' => TokenKind::Pound,
            b'&' => TokenKind::Ampersand,
            b';' => TokenKind::Semi,
            b',' => TokenKind::Comma,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'<' => TokenKind::LAngle,
            b'>' => TokenKind::RAngle,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'=' => TokenKind::Equals,
            _ => return None,
        };
        Some(kind)
    }

    /// The character an operator kind is spelled with.
    pub fn operator_char(self) -> Option<char> {
        let ch = match self {
            TokenKind::Plus => '+',
            TokenKind::Minus => '-',
            TokenKind::Multiply => '*',
            TokenKind::Period => '.',
            TokenKind::Backslash => '\\',
            TokenKind::Colon => ':',
            TokenKind::Percent => '%',
            TokenKind::Pipe => '|',
            TokenKind::Exclamation => '!',
            TokenKind::Question => '?',
            TokenKind::Pound => '#',
            TokenKind::Ampersand => '&',
            TokenKind::Semi => ';',
            TokenKind::Comma => ',',
            TokenKind::LParen => '(',
            TokenKind::RParen => ')',
            TokenKind::LAngle => '<',
            TokenKind::RAngle => '>',
            TokenKind::LBrace => '{',
            TokenKind::RBrace => '}',
            TokenKind::LBracket => '[',
            TokenKind::RBracket => ']',
            TokenKind::Equals => '=',
            _ => return None,
        };
        Some(ch)
    }

    /// Upper-case name used when printing tokens.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Error => "ERROR",
            TokenKind::EndOfInput => "EOF",
            TokenKind::Comment => "COMMENT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::QuotedString => "QUOTE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Multiply => "MULTIPLY",
            TokenKind::Period => "PERIOD",
            TokenKind::Backslash => "BACKSLASH",
            TokenKind::Colon => "COLON",
            TokenKind::Percent => "PERCENT",
            TokenKind::Pipe => "PIPE",
            TokenKind::Exclamation => "EXCLAMATION",
            TokenKind::Question => "QUESTION",
            TokenKind::Pound => "POUND",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Semi => "SEMI",
            TokenKind::Comma => "COMMA",
            TokenKind::LParen => "L_PAREN",
            TokenKind::RParen => "R_PAREN",
            TokenKind::LAngle => "L_ANG",
            TokenKind::RAngle => "R_ANG",
            TokenKind::LBrace => "L_BRACE",
            TokenKind::RBrace => "R_BRACE",
            TokenKind::LBracket => "L_BRACKET",
            TokenKind::RBracket => "R_BRACKET",
            TokenKind::Equals => "EQUALS",
        }
    }

    #[inline]
    pub fn is_operator(self) -> bool {
        self.operator_char().is_some()
    }

    /// Whether this is `Error` or `EndOfInput`.
    #[inline]
    pub fn is_reserved(self) -> bool {
        matches!(self, TokenKind::Error | TokenKind::EndOfInput)
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::Number | TokenKind::QuotedString
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A classified, positioned piece of the scanned buffer.
///
/// `text` borrows from the buffer the scanner was created over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The exact text consumed. Empty for `Error` and `EndOfInput`.
    pub text: &'a str,
    /// Byte offset of the token's first byte.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    pub fn end_of_input(offset: usize) -> Self {
        Self::new(TokenKind::EndOfInput, "", offset)
    }

    pub fn error(offset: usize) -> Self {
        Self::new(TokenKind::Error, "", offset)
    }

    /// Byte offset one past the token's last byte.
    #[inline]
    pub fn end(&self) -> usize {
        self.span().end()
    }

    #[inline]
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.offset, self.text.len())
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    #[inline]
    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token{{{}, '{}', {}}}", self.kind, self.text, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_table_round_trips_through_operator_char() {
        for kind in TokenKind::OPERATORS {
            let ch = kind.operator_char().unwrap();
            assert_eq!(TokenKind::from_ascii_operator(ch as u8), Some(kind));
        }
    }

    #[test]
    fn test_operator_table_is_total_over_bytes() {
        let mapped = (0..=u8::MAX)
            .filter(|&b| TokenKind::from_ascii_operator(b).is_some())
            .count();
        assert_eq!(mapped, TokenKind::OPERATORS.len());
        for byte in 0x80..=u8::MAX {
            assert_eq!(TokenKind::from_ascii_operator(byte), None);
        }
    }

    #[test]
    fn test_non_operator_punctuation() {
        for byte in [b'"', b'\'', b'/', b'@', b'$', b'^', b'~', b'`', b'_'] {
            assert_eq!(TokenKind::from_ascii_operator(byte), None, "{}", byte as char);
        }
    }

    #[test]
    fn test_kind_classification() {
        assert!(TokenKind::Pipe.is_operator());
        assert!(!TokenKind::Identifier.is_operator());
        assert!(TokenKind::Error.is_reserved());
        assert!(TokenKind::EndOfInput.is_reserved());
        assert!(!TokenKind::Comment.is_reserved());
        assert!(TokenKind::QuotedString.is_literal());
        assert!(!TokenKind::Comment.is_literal());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(
            Token::new(TokenKind::Identifier, "foo", 0).to_string(),
            "Token{IDENTIFIER, 'foo', 0}"
        );
        assert_eq!(Token::end_of_input(21).to_string(), "Token{EOF, '', 21}");
        assert_eq!(
            Token::new(TokenKind::LAngle, "<", 3).to_string(),
            "Token{L_ANG, '<', 3}"
        );
    }

    #[test]
    fn test_token_span() {
        let token = Token::new(TokenKind::QuotedString, "\"本ä\"", 13);
        assert_eq!(token.end(), 20);
        assert_eq!(token.span(), TextSpan::new(13, 7));
        assert_eq!(Token::error(4).span(), TextSpan::new(4, 0));
    }

    #[test]
    fn test_token_serializes_kind_by_name() {
        let json = serde_json::to_string(&Token::new(TokenKind::Number, "42", 5)).unwrap();
        assert_eq!(json, r#"{"kind":"NUMBER","text":"42","offset":5}"#);
    }
}
