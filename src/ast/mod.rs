//! Abstract Syntax Tree (AST) Types for Command Lines
//!
//! Programs, pipelines and statements, plus the three bracketed word forms:
//! sequences `( )`, closures `{ }` and arrays `[ ]`.
//!
//! Architecture:
//!   Input → Tokenizer → Parser → AST → (evaluator, not part of this crate)

pub mod types;
