//! tblgen_core: Source position types shared by the scanner and its tools.
//!
//! Provides byte-offset spans and a line map for turning offsets into
//! `line:column` pairs when reporting diagnostics.

pub mod text;

pub use text::{LineAndColumn, LineMap, TextPos, TextSpan};
