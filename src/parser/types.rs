//! Parser Types and Constants
//!
//! Shared error types, limits, options and token classes used across parser modules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::lexer::Token;

// Parser limits to prevent hangs and resource exhaustion
pub const MAX_INPUT_SIZE: usize = 1_000_000; // 1MB max input
pub const MAX_PARSER_DEPTH: usize = 100; // Max nesting of sequences, closures and arrays, fits a 2 MiB stack

lazy_static::lazy_static! {
    /// Redirections that carry their target inline: `2>&1`, `<&-`
    pub static ref REDIR_NO_ARG: regex_lite::Regex =
        regex_lite::Regex::new(r"^(?:[0-9]?>&[0-9-]|[0-9-]?<&[0-9-])$").unwrap();

    /// Redirections followed by a file name: `>`, `2>>`, `&>`, `<>`, `<<<`
    pub static ref REDIR_ARG: regex_lite::Regex =
        regex_lite::Regex::new(r"^(?:[0-9&]?>|[0-9]?>>|[0-9]?<|[0-9]?<>|<<<)$").unwrap();

    /// Here-document operators: `<<`, `<<-`
    pub static ref REDIR_HEREDOC: regex_lite::Regex =
        regex_lite::Regex::new(r"^<<-?$").unwrap();
}

/// Tokens that separate pipelines inside a program
pub fn is_sequencing_token(t: &Token) -> bool {
    matches!(t.as_str(), ";" | "\n" | "&" | "&&" | "||")
}

/// Tokens that chain statements into a pipeline
pub fn is_pipe_token(t: &Token) -> bool {
    matches!(t.as_str(), "|" | "|&")
}

/// Closing delimiters of sequences, closures and arrays
pub fn is_closing_token(t: &Token) -> bool {
    matches!(t.as_str(), "}" | ")" | "]")
}

/// Tokens that end a statement without being part of it
pub fn is_statement_end(t: &Token) -> bool {
    is_sequencing_token(t) || is_pipe_token(t) || is_closing_token(t)
}

/// Tokens that can never start an array key or list element
pub fn is_invalid_array_key(t: &Token) -> bool {
    matches!(
        t.as_str(),
        "{" | ";" | "&" | "&&" | "||" | "|" | "|&" | ")" | "}" | "="
    )
}

/// Tokens that can never be an array map value
pub fn is_invalid_array_value(t: &Token) -> bool {
    matches!(
        t.as_str(),
        ";" | "\n" | "&" | "&&" | "||" | "|" | "|&" | ")" | "}" | "]" | "="
    )
}

/// Tunable limits for a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Deepest allowed nesting of `( )`, `{ }` and `[ ]`
    pub max_depth: usize,
    /// Largest accepted input, in bytes
    pub max_input_size: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_PARSER_DEPTH,
            max_input_size: MAX_INPUT_SIZE,
        }
    }
}

/// An unexpected token at a known position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {line}:{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Input ended while a construct was still open.
///
/// `missing` names the open constructs, outermost first (e.g. `closure array(2)`),
/// and `repair` is a token that would let the input continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {line}:{column}: {message} (missing {missing})")]
pub struct EofError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub missing: String,
    pub repair: String,
}

impl EofError {
    pub fn new(
        message: impl Into<String>,
        line: usize,
        column: usize,
        missing: impl Into<String>,
        repair: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            missing: missing.into(),
            repair: repair.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eof(#[from] EofError),
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax(e) => e.line,
            Self::Eof(e) => e.line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Self::Syntax(e) => e.column,
            Self::Eof(e) => e.column,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Syntax(e) => &e.message,
            Self::Eof(e) => &e.message,
        }
    }

    /// The missing-construct hint, for errors caused by end of input
    pub fn missing(&self) -> Option<&str> {
        match self {
            Self::Syntax(_) => None,
            Self::Eof(e) => Some(&e.missing),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirection_classes() {
        for op in ["2>&1", ">&2", "<&-", "3<&0", "1>&-"] {
            assert!(REDIR_NO_ARG.is_match(op), "{}", op);
            assert!(!REDIR_ARG.is_match(op), "{}", op);
        }
        for op in [">", "2>", "&>", ">>", "2>>", "<", "0<", "<>", "<<<"] {
            assert!(REDIR_ARG.is_match(op), "{}", op);
            assert!(!REDIR_NO_ARG.is_match(op), "{}", op);
        }
        assert!(REDIR_HEREDOC.is_match("<<"));
        assert!(REDIR_HEREDOC.is_match("<<-"));
        assert!(!REDIR_HEREDOC.is_match("<<<"));
        assert!(!REDIR_ARG.is_match("a>"));
        assert!(!REDIR_ARG.is_match("12>"));
    }

    #[test]
    fn test_error_display() {
        let err: ParseError = SyntaxError::new("unexpected token ')'", 1, 3).into();
        assert_eq!(err.to_string(), "Parse error at 1:3: unexpected token ')'");
        assert_eq!(err.missing(), None);

        let err: ParseError = EofError::new("unexpected EOT", 2, 1, "closure array(2)", "]").into();
        assert!(err.is_eof());
        assert_eq!(err.missing(), Some("closure array(2)"));
        assert_eq!(
            err.to_string(),
            "Parse error at 2:1: unexpected EOT (missing closure array(2))"
        );
    }

    #[test]
    fn test_options_from_partial_toml() {
        let options: ParserOptions = toml::from_str("max_depth = 8").unwrap();
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.max_input_size, MAX_INPUT_SIZE);
    }
}
