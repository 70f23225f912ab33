//! tblgen_scanner: Single-pass lexical scanner for TableGen-style sources.
//!
//! Turns a UTF-8 byte buffer into a stream of tokens:
//! - single-character operators and punctuation
//! - ASCII identifiers and decimal digit runs
//! - double-quoted strings (no escapes)
//! - `Error` tokens for unterminated strings, unrecognized characters and
//!   malformed UTF-8, with the cause available from the scanner
//!
//! ```
//! use tblgen_scanner::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::from("def x");
//! assert_eq!(scanner.next_token().text, "def");
//! assert_eq!(scanner.next_token().offset, 4);
//! assert_eq!(scanner.next_token().kind, TokenKind::EndOfInput);
//! ```

mod char_codes;
mod error;
mod scanner;
mod token;

pub use error::ScanError;
pub use scanner::{tokenize, Scanner};
pub use token::{Token, TokenKind};
