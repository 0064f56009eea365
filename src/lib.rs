//! gogo-parse - A parser for gogo-style shell command lines
//!
//! This library turns a command line script into an AST of programs, pipelines
//! and statements whose nodes keep exact source spans, for an evaluator to run.

pub mod ast;
pub mod parser;

pub use ast::types::*;
pub use parser::{parse, ParseError, Parser, ParserOptions};
