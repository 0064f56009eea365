//! Abstract Syntax Tree (AST) Types for Command Lines
//!
//! Every node carries the token spanning its whole source text, so an evaluator
//! can always re-slice the input a node came from.

use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::parser::lexer::Token;
use crate::parser::types::{REDIR_HEREDOC, REDIR_NO_ARG};

// =============================================================================
// BASE TYPES
// =============================================================================

/// Span in source code: byte offset and length, plus 1-based line and column
/// of the first character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub length: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The text this span covers in `source`
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}

// =============================================================================
// PROGRAM & PIPELINES
// =============================================================================

/// Root node: `pipe1 ; pipe2 ; ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramNode {
    pub token: Token,
    pub executables: Vec<Executable>,
}

/// Anything that can appear in a program or pipeline
///
/// Statements are shared with the parser's statement registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Executable {
    Statement(Arc<StatementNode>),
    Pipeline(PipelineNode),
    Operator(OperatorNode),
}

impl Executable {
    pub fn token(&self) -> &Token {
        match self {
            Self::Statement(n) => &n.token,
            Self::Pipeline(n) => &n.token,
            Self::Operator(n) => &n.token,
        }
    }

    pub fn as_statement(&self) -> Option<&StatementNode> {
        match self {
            Self::Statement(n) => Some(n.as_ref()),
            _ => None,
        }
    }

    pub fn as_pipeline(&self) -> Option<&PipelineNode> {
        match self {
            Self::Pipeline(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<&OperatorNode> {
        match self {
            Self::Operator(n) => Some(n),
            _ => None,
        }
    }
}

/// `stmt1 | stmt2 | ...`, statements alternating with their pipe operators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineNode {
    pub token: Token,
    pub executables: Vec<Executable>,
}

impl PipelineNode {
    pub fn statements(&self) -> impl Iterator<Item = &StatementNode> {
        self.executables.iter().filter_map(Executable::as_statement)
    }
}

/// A separator (`;`, newline, `&`, `&&`, `||`) or pipe (`|`, `|&`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorNode {
    pub token: Token,
}

impl OperatorNode {
    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }
}

// =============================================================================
// STATEMENTS
// =============================================================================

/// One pipeline stage: words plus redirections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementNode {
    pub token: Token,
    pub words: Vec<WordNode>,
    /// Flat list: operator and argument pairs, lone duplication operators,
    /// and here-doc operator and body pairs, in source order
    pub redirections: Vec<Token>,
}

impl StatementNode {
    /// Pair up the flat redirection list
    pub fn redirects(&self) -> Vec<Redirect<'_>> {
        let mut out = Vec::new();
        let mut i = 0;
        while let Some(operator) = self.redirections.get(i) {
            if REDIR_NO_ARG.is_match(operator.as_str()) {
                out.push(Redirect::Duplicate(operator));
                i += 1;
                continue;
            }
            let Some(target) = self.redirections.get(i + 1) else {
                break;
            };
            if REDIR_HEREDOC.is_match(operator.as_str()) {
                out.push(Redirect::HereDoc {
                    operator,
                    body: target,
                    strip_tabs: operator.as_str().ends_with('-'),
                });
            } else {
                out.push(Redirect::File { operator, target });
            }
            i += 2;
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.redirections.is_empty()
    }
}

/// A typed view of one redirection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Redirect<'a> {
    /// `2>&1`, `<&-`
    Duplicate(&'a Token),
    /// `> file`, `2>> log`, `<<< word`
    File { operator: &'a Token, target: &'a Token },
    /// `<<EOF` / `<<-EOF`, with the body text up to the terminator line
    HereDoc {
        operator: &'a Token,
        body: &'a Token,
        strip_tabs: bool,
    },
}

/// A value in word position: plain token or nested construct
///
/// Equality and hashing compare source text, which is what array map keys rely on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WordNode {
    Text(Token),
    Sequence(SequenceNode),
    Closure(ClosureNode),
    Array(ArrayNode),
}

impl WordNode {
    pub fn token(&self) -> &Token {
        match self {
            Self::Text(t) => t,
            Self::Sequence(n) => &n.token,
            Self::Closure(n) => &n.token,
            Self::Array(n) => &n.token,
        }
    }

    pub fn as_str(&self) -> &str {
        self.token().as_str()
    }
}

impl PartialEq for WordNode {
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token()
    }
}

impl Eq for WordNode {}

impl Hash for WordNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token().hash(state);
    }
}

impl PartialEq<&str> for WordNode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

// =============================================================================
// GROUPS
// =============================================================================

/// `( program )`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceNode {
    pub token: Token,
    pub program: ProgramNode,
}

/// `{ program }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureNode {
    pub token: Token,
    pub program: ProgramNode,
}

/// `[ a b ... ]` or `[ k1=v1 k2=v2 ... ]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayNode {
    pub token: Token,
    pub contents: ArrayContents,
}

impl ArrayNode {
    pub fn list(&self) -> Option<&[WordNode]> {
        match &self.contents {
            ArrayContents::List(items) => Some(items),
            ArrayContents::Map(_) => None,
        }
    }

    pub fn map(&self) -> Option<&IndexMap<WordNode, WordNode>> {
        match &self.contents {
            ArrayContents::List(_) => None,
            ArrayContents::Map(entries) => Some(entries),
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self.contents, ArrayContents::Map(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayContents {
    List(Vec<WordNode>),
    /// Keys in insertion order
    #[serde(serialize_with = "serialize_entries")]
    Map(IndexMap<WordNode, WordNode>),
}

// Keys are nodes, not strings, so entries go out as [key, value] pairs
fn serialize_entries<S: Serializer>(
    entries: &IndexMap<WordNode, WordNode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(entries.iter())
}

// =============================================================================
// FACTORY FUNCTIONS (AST builders)
// =============================================================================

/// AST factory for building nodes
pub struct AST;

impl AST {
    pub fn program(token: Token, executables: Vec<Executable>) -> ProgramNode {
        ProgramNode { token, executables }
    }

    pub fn pipeline(token: Token, executables: Vec<Executable>) -> PipelineNode {
        PipelineNode { token, executables }
    }

    pub fn operator(token: Token) -> OperatorNode {
        OperatorNode { token }
    }

    pub fn statement(token: Token, words: Vec<WordNode>, redirections: Vec<Token>) -> StatementNode {
        StatementNode {
            token,
            words,
            redirections,
        }
    }

    pub fn sequence(token: Token, program: ProgramNode) -> SequenceNode {
        SequenceNode { token, program }
    }

    pub fn closure(token: Token, program: ProgramNode) -> ClosureNode {
        ClosureNode { token, program }
    }

    pub fn list(token: Token, items: Vec<WordNode>) -> ArrayNode {
        ArrayNode {
            token,
            contents: ArrayContents::List(items),
        }
    }

    pub fn map(token: Token, entries: IndexMap<WordNode, WordNode>) -> ArrayNode {
        ArrayNode {
            token,
            contents: ArrayContents::Map(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(value: &str, start: usize) -> Token {
        Token::new(value, start, 1, start + 1)
    }

    #[test]
    fn test_span_slice() {
        let span = Span {
            start: 4,
            length: 3,
            line: 1,
            column: 5,
        };
        assert_eq!(span.end(), 7);
        assert_eq!(span.slice("cmd out rest"), "out");
    }

    #[test]
    fn test_redirects_pairing() {
        let stmt = AST::statement(
            tok("cmd", 0),
            vec![WordNode::Text(tok("cmd", 0))],
            vec![
                tok(">", 4),
                tok("out", 6),
                tok("2>&1", 10),
                tok("<<-", 15),
                tok("body\n", 30),
            ],
        );
        let redirects = stmt.redirects();
        assert_eq!(redirects.len(), 3);
        assert!(matches!(redirects[0], Redirect::File { operator, target } if *operator == ">" && *target == "out"));
        assert!(matches!(redirects[1], Redirect::Duplicate(op) if *op == "2>&1"));
        assert!(matches!(redirects[2], Redirect::HereDoc { body, strip_tabs: true, .. } if *body == "body\n"));
    }

    #[test]
    fn test_word_equality_by_text() {
        let a = WordNode::Text(tok("[x]", 0));
        let b = WordNode::Array(AST::list(tok("[x]", 9), vec![WordNode::Text(tok("x", 10))]));
        assert_eq!(a, b);
        assert_eq!(a, "[x]");
    }

    #[test]
    fn test_array_contents_are_exclusive() {
        let list = AST::list(tok("[a]", 0), vec![WordNode::Text(tok("a", 1))]);
        assert!(list.list().is_some());
        assert!(list.map().is_none());

        let mut entries = IndexMap::new();
        entries.insert(WordNode::Text(tok("a", 1)), WordNode::Text(tok("1", 3)));
        let map = AST::map(tok("[a=1]", 0), entries);
        assert!(map.is_map());
        assert!(map.list().is_none());
    }

    #[test]
    fn test_map_serializes_as_pairs() {
        let mut entries = IndexMap::new();
        entries.insert(WordNode::Text(tok("a", 1)), WordNode::Text(tok("1", 3)));
        let map = AST::map(tok("[a=1]", 0), entries);
        let json = serde_json::to_value(&map).unwrap();
        let pairs = json["contents"]["map"].as_array().unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0][0]["value"], "a");
        assert_eq!(pairs[0][1]["kind"], "text");
    }
}
