//! Parser module for command lines
//!
//! This module contains the tokenizer and the recursive descent parser.

pub mod types;
pub mod lexer;
pub mod context;
pub mod parser;

// Re-exports
pub use types::{EofError, ParseError, ParserOptions, SyntaxError};
pub use lexer::{HereDoc, Token, Tokenizer};
pub use parser::{parse, ArrayKind, Parser};
