//! The scanner.
//!
//! Converts a UTF-8 byte buffer into tokens one at a time. The scanner is
//! always primed: `current` holds the character at `pos`, and `next_pos` is
//! where the character after it begins. Once the buffer is exhausted,
//! `current` is `None` and both positions sit at the buffer length.

use crate::char_codes::*;
use crate::error::ScanError;
use crate::token::{Token, TokenKind};
use memchr::memchr;
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// A decoded character, or the marker for a malformed byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoded {
    Char(char),
    Malformed,
}

/// Single-pass scanner over a borrowed byte buffer.
///
/// Scan errors never stop the scanner. They are returned as `Error` tokens
/// with the cause kept in [`Scanner::last_error`], and the scanner moves past
/// the offending input so that repeated calls always make progress. Only the
/// most recent cause is held; callers that want every diagnostic build them
/// as the errors arrive.
pub struct Scanner<'a> {
    /// The buffer being scanned.
    source: &'a [u8],
    /// The character at `pos`; `None` once the buffer is exhausted.
    current: Option<Decoded>,
    /// Byte offset of `current`.
    pos: usize,
    /// Byte offset of the character after `current`.
    next_pos: usize,
    /// Cause of the most recent `Error` token.
    last_error: Option<ScanError>,
    /// Set once the iterator has yielded `EndOfInput`.
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `source` with its first character already decoded.
    pub fn new(source: &'a [u8]) -> Self {
        let mut scanner = Self {
            source,
            current: None,
            pos: 0,
            next_pos: 0,
            last_error: None,
            finished: false,
        };
        scanner.advance();
        scanner
    }

    /// The buffer being scanned.
    #[inline]
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Byte offset of the character the next token will start at or after.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Whether every byte of the buffer has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// The cause of the most recently returned `Error` token.
    ///
    /// Not cleared by later successful tokens.
    #[inline]
    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan and return the next token.
    ///
    /// Once the buffer is exhausted every call returns `EndOfInput` at the
    /// buffer length.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_white_space();

        let start = self.pos;
        let token = match self.current {
            None => Token::end_of_input(self.next_pos),
            Some(Decoded::Malformed) => {
                let len = self.next_pos - start;
                self.advance();
                self.fail(start, ScanError::InvalidUtf8 { offset: start, len })
            }
            Some(Decoded::Char(ch)) => {
                let operator = u8::try_from(ch)
                    .ok()
                    .and_then(TokenKind::from_ascii_operator);
                if let Some(kind) = operator {
                    self.advance();
                    self.finish_ascii(kind, start)
                } else if is_identifier_start(ch) {
                    self.scan_identifier()
                } else if is_digit(ch) {
                    self.scan_number()
                } else if ch == DOUBLE_QUOTE {
                    self.scan_quoted_string()
                } else {
                    // Step past the character so a caller that keeps going resumes after it.
                    self.advance();
                    self.fail(start, ScanError::UnrecognizedCharacter { ch, offset: start })
                }
            }
        };

        trace!(kind = %token.kind, text = token.text, offset = token.offset, "token");
        token
    }

    /// Decode the character at `next_pos` and make it current.
    fn advance(&mut self) {
        let Some(&lead) = self.source.get(self.next_pos) else {
            self.pos = self.source.len();
            self.next_pos = self.source.len();
            self.current = None;
            return;
        };

        self.pos = self.next_pos;
        let (decoded, width) = if lead <= MAX_ASCII_CHARACTER {
            (Decoded::Char(char::from(lead)), 1)
        } else {
            decode_multibyte(&self.source[self.pos..])
        };
        self.next_pos += width;
        self.current = Some(decoded);

        debug_assert!(self.pos < self.next_pos && self.next_pos <= self.source.len());
    }

    /// Jump forward so that the character at `pos` becomes current.
    fn advance_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.next_pos);
        self.next_pos = pos;
        self.advance();
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        match self.current {
            Some(Decoded::Char(ch)) => Some(ch),
            _ => None,
        }
    }

    fn skip_white_space(&mut self) {
        while self.current_char().is_some_and(is_white_space) {
            self.advance();
        }
    }

    fn scan_identifier(&mut self) -> Token<'a> {
        let start = self.pos;
        while self.current_char().is_some_and(is_identifier_part) {
            self.advance();
        }
        self.finish_ascii(TokenKind::Identifier, start)
    }

    fn scan_number(&mut self) -> Token<'a> {
        let start = self.pos;
        while self.current_char().is_some_and(is_digit) {
            self.advance();
        }
        self.finish_ascii(TokenKind::Number, start)
    }

    /// Scan from an opening `"` through the next `"`.
    ///
    /// There are no escapes. A `"` byte never occurs inside a multi-byte
    /// UTF-8 sequence, so the closing quote is found with a plain byte search
    /// and the body is validated in one pass by [`Scanner::finish_quoted_string`].
    fn scan_quoted_string(&mut self) -> Token<'a> {
        let start = self.pos;
        let body = self.next_pos;
        match memchr(DOUBLE_QUOTE as u8, &self.source[body..]) {
            Some(close) => {
                self.advance_to(body + close + 1);
                self.finish_quoted_string(start)
            }
            None => {
                self.advance_to(self.source.len());
                self.fail(start, ScanError::UnterminatedString { offset: start })
            }
        }
    }

    /// Build an operator, identifier or number token spanning `start..pos`.
    ///
    /// These spans only ever hold ASCII, which is always valid UTF-8, so the
    /// conversion cannot fall back to the empty string.
    fn finish_ascii(&self, kind: TokenKind, start: usize) -> Token<'a> {
        let source = self.source;
        let bytes = &source[start..self.pos];
        debug_assert!(bytes.is_ascii());
        Token::new(kind, std::str::from_utf8(bytes).unwrap_or_default(), start)
    }

    /// Build the quoted string token spanning `start..pos`.
    ///
    /// If the span is not valid UTF-8 the token becomes an `Error` at
    /// `start`, with the cause pointing at the first malformed sequence.
    fn finish_quoted_string(&mut self, start: usize) -> Token<'a> {
        let source = self.source;
        let bytes = &source[start..self.pos];
        match simdutf8::compat::from_utf8(bytes) {
            Ok(text) => Token::new(TokenKind::QuotedString, text, start),
            Err(err) => {
                let valid = err.valid_up_to();
                let len = err.error_len().unwrap_or(bytes.len() - valid);
                self.fail(start, ScanError::InvalidUtf8 { offset: start + valid, len })
            }
        }
    }

    /// Remember `error` and return an `Error` token at `offset`.
    fn fail(&mut self, offset: usize, error: ScanError) -> Token<'a> {
        debug!(%error, offset, "scan error");
        self.last_error = Some(error);
        Token::error(offset)
    }
}

/// Decode the non-ASCII character at the start of `bytes`.
///
/// Returns the character and its width, or `Malformed` with the width of the
/// maximal invalid prefix (never zero).
fn decode_multibyte(bytes: &[u8]) -> (Decoded, usize) {
    let width = utf8_sequence_width(bytes[0]);
    if let Some(ch) = bytes
        .get(..width)
        .and_then(|seq| std::str::from_utf8(seq).ok())
        .and_then(|s| s.chars().next())
    {
        return (Decoded::Char(ch), width);
    }

    let window = &bytes[..bytes.len().min(MAX_UTF8_WIDTH)];
    let invalid = match std::str::from_utf8(window) {
        Ok(_) => 1,
        Err(err) => err.error_len().unwrap_or(window.len()),
    };
    (Decoded::Malformed, invalid.max(1))
}

impl<'a> From<&'a str> for Scanner<'a> {
    fn from(source: &'a str) -> Self {
        Scanner::new(source.as_bytes())
    }
}

impl fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("len", &self.source.len())
            .field("current", &self.current)
            .field("pos", &self.pos)
            .field("next_pos", &self.next_pos)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Yields every token up to and including the first `EndOfInput`.
impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is_end_of_input();
        Some(token)
    }
}

impl FusedIterator for Scanner<'_> {}

/// Scan `source` to the end and collect every token, `EndOfInput` included.
pub fn tokenize(source: &[u8]) -> Vec<Token<'_>> {
    Scanner::new(source).collect()
}
