//! Recursive Descent Parser for Command Lines
//!
//! This parser pulls tokens from the tokenizer one at a time, with a single
//! token of pushback, and produces an AST.
//!
//! Grammar (simplified):
//!   program   ::= (statement (('|' | '|&') statement)* [sep])*
//!   sep       ::= ';' | '\n' | '&' | '&&' | '||'
//!   statement ::= (word | sequence | closure | array | redirection)*
//!   sequence  ::= '(' program ')'
//!   closure   ::= '{' program '}'
//!   array     ::= '[' (element* | (key '=' value)*) ']'

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::types::{
    ArrayNode, ClosureNode, Executable, ProgramNode, SequenceNode, Span, StatementNode, WordNode,
    AST,
};
use crate::parser::context::{Context, ContextStack};
use crate::parser::lexer::{Token, Tokenizer};
use crate::parser::types::{
    is_closing_token, is_invalid_array_key, is_invalid_array_value, is_pipe_token,
    is_sequencing_token, is_statement_end, EofError, ParseError, ParserOptions, SyntaxError,
    REDIR_ARG, REDIR_HEREDOC, REDIR_NO_ARG,
};

/// Whether an array literal is a list or a map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Undetermined,
    List,
    Map,
}

impl ArrayKind {
    /// Settle an undetermined kind from the token following the first element.
    /// A decided kind never changes.
    pub fn resolve(self, next: &Token) -> Self {
        match self {
            Self::Undetermined if *next == "=" => Self::Map,
            Self::Undetermined => Self::List,
            decided => decided,
        }
    }
}

/// Parse a complete source text with default options
pub fn parse(input: &str) -> Result<ProgramNode, ParseError> {
    Parser::new(input).program()
}

/// Main parser struct. One instance parses one source text, once.
pub struct Parser {
    tz: Tokenizer,
    options: ParserOptions,
    stack: ContextStack,
    tokens: Vec<Token>,
    statements: Vec<Arc<StatementNode>>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    pub fn with_options(input: &str, options: ParserOptions) -> Self {
        Parser {
            tz: Tokenizer::new(input),
            options,
            stack: ContextStack::new(),
            tokens: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// Get the raw input string being parsed.
    pub fn source(&self) -> &str {
        self.tz.source()
    }

    /// Every token consumed so far, each once, in scan order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every statement completed so far, ordered by start offset
    pub fn statements(&self) -> Vec<&StatementNode> {
        let mut statements: Vec<&StatementNode> =
            self.statements.iter().map(Arc::as_ref).collect();
        statements.sort_by_key(|s| s.token.start());
        statements
    }

    // ===========================================================================
    // HELPER METHODS
    // ===========================================================================

    fn next(&mut self) -> Result<Option<Token>, ParseError> {
        let pushed = self.tz.has_pushed();
        let token = self.tz.next()?;
        if !pushed {
            if let Some(t) = &token {
                self.tokens.push(t.clone());
            }
        }
        Ok(token)
    }

    fn push(&mut self, token: Token) {
        self.tz.push(token);
    }

    fn expect(&mut self, expected: &str) -> Result<Token, ParseError> {
        let t = match self.next()? {
            Some(t) => t,
            None => {
                return Err(self.eof_error(
                    &format!("unexpected EOT looking for '{}'", expected),
                    None,
                    expected,
                ))
            }
        };
        if t != expected {
            return Err(SyntaxError::new(
                format!("expected '{}' but got '{}'", expected, quoted(&t)),
                t.line(),
                t.column(),
            )
            .into());
        }
        Ok(t)
    }

    fn expect_not_eof(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Some(t) => {
                self.push(t);
                Ok(())
            }
            None => Err(self.eof_error("unexpected EOT", None, "0")),
        }
    }

    /// Consume an opening delimiter and record the construct as open
    fn start(&mut self, open: &str, context: Context) -> Result<Token, ParseError> {
        if self.stack.len() >= self.options.max_depth {
            let (_, line, column) = self.tz.position();
            return Err(SyntaxError::new(
                format!("maximum nesting depth of {} exceeded", self.options.max_depth),
                line,
                column,
            )
            .into());
        }
        self.stack.push(context);
        self.expect(open)
    }

    fn end(&mut self, close: &str) -> Result<Token, ParseError> {
        let t = self.expect(close)?;
        self.stack.pop();
        Ok(t)
    }

    fn eof_error(&self, message: &str, additional: Option<Context>, repair: &str) -> ParseError {
        EofError::new(
            message,
            self.tz.line(),
            self.tz.column(),
            self.stack.missing(additional),
            repair,
        )
        .into()
    }

    fn unexpected(t: &Token, looking_for: &str) -> ParseError {
        SyntaxError::new(
            format!("unexpected token '{}' while looking for {}", quoted(t), looking_for),
            t.line(),
            t.column(),
        )
        .into()
    }

    /// Entry points refuse sources over the configured size
    fn check_input_size(&self) -> Result<(), ParseError> {
        let size = self.source().len();
        if size > self.options.max_input_size {
            return Err(SyntaxError::new(
                format!(
                    "Input too large: {} bytes exceeds limit of {}",
                    size, self.options.max_input_size
                ),
                1,
                1,
            )
            .into());
        }
        Ok(())
    }

    /// Token spanning `first` through `last`
    fn whole(&self, first: &Span, last: &Span) -> Token {
        self.tz.slice(first.start, last.end(), first.line, first.column)
    }

    /// Zero-length token at an `(offset, line, column)` position
    fn empty_at(&self, (offset, line, column): (usize, usize, usize)) -> Token {
        self.tz.slice(offset, offset, line, column)
    }

    fn whole_of(&self, executables: &[Executable], start: (usize, usize, usize)) -> Token {
        match (executables.first(), executables.last()) {
            (Some(first), Some(last)) => self.whole(&first.token().span, &last.token().span),
            _ => self.empty_at(start),
        }
    }

    /// Close an open pipe chain around `statement`, or append it bare
    fn close_pipeline(
        &self,
        executables: &mut Vec<Executable>,
        pipes: &mut Option<Vec<Executable>>,
        statement: Arc<StatementNode>,
    ) {
        match pipes.take() {
            Some(mut chain) => {
                chain.push(Executable::Statement(statement));
                let token = self.whole_of(&chain, (0, 1, 1));
                executables.push(Executable::Pipeline(AST::pipeline(token, chain)));
            }
            None => executables.push(Executable::Statement(statement)),
        }
    }

    // ===========================================================================
    // PROGRAM PARSING
    // ===========================================================================

    /// Parse the whole input
    pub fn program(&mut self) -> Result<ProgramNode, ParseError> {
        self.check_input_size()?;
        let program = self.parse_program()?;
        log::debug!(
            "parsed program: {} executables, {} statements, {} tokens",
            program.executables.len(),
            self.statements.len(),
            self.tokens.len()
        );
        Ok(program)
    }

    fn parse_program(&mut self) -> Result<ProgramNode, ParseError> {
        let start = self.tz.position();
        let mut executables: Vec<Executable> = Vec::new();
        let mut pipes: Option<Vec<Executable>> = None;

        loop {
            let t = match self.next()? {
                Some(t) => t,
                None => {
                    if pipes.is_some() {
                        return Err(self.eof_error(
                            "unexpected EOT while looking for a statement after |",
                            Some(Context::Pipe),
                            "0",
                        ));
                    }
                    return Ok(AST::program(self.whole_of(&executables, start), executables));
                }
            };

            if is_closing_token(&t) {
                if pipes.is_some() {
                    return Err(EofError::new(
                        format!(
                            "unexpected token '{}' while looking for a statement after |",
                            quoted(&t)
                        ),
                        t.line(),
                        t.column(),
                        self.stack.missing(Some(Context::Pipe)),
                        "0",
                    )
                    .into());
                }
                if self.stack.is_empty() {
                    return Err(SyntaxError::new(
                        format!("unexpected token '{}'", quoted(&t)),
                        t.line(),
                        t.column(),
                    )
                    .into());
                }
                // The enclosing sequence, closure or array consumes its closer
                self.push(t);
                return Ok(AST::program(self.whole_of(&executables, start), executables));
            }

            self.push(t);
            let statement = self.parse_statement()?;

            match self.next()? {
                None => {
                    self.close_pipeline(&mut executables, &mut pipes, statement);
                    return Ok(AST::program(self.whole_of(&executables, start), executables));
                }
                Some(t) if is_sequencing_token(&t) => {
                    self.close_pipeline(&mut executables, &mut pipes, statement);
                    executables.push(Executable::Operator(AST::operator(t)));
                }
                Some(t) if is_pipe_token(&t) => {
                    let chain = pipes.get_or_insert_with(Vec::new);
                    chain.push(Executable::Statement(statement));
                    chain.push(Executable::Operator(AST::operator(t)));
                }
                Some(t) => {
                    // Implicit boundary: the token starts whatever comes next
                    self.close_pipeline(&mut executables, &mut pipes, statement);
                    self.push(t);
                }
            }
        }
    }

    // ===========================================================================
    // STATEMENT PARSING
    // ===========================================================================

    /// Parse one statement, registering it for [`Parser::statements`]
    pub fn statement(&mut self) -> Result<Arc<StatementNode>, ParseError> {
        self.check_input_size()?;
        self.parse_statement()
    }

    fn parse_statement(&mut self) -> Result<Arc<StatementNode>, ParseError> {
        let start = self.tz.position();
        let mut words: Vec<WordNode> = Vec::new();
        let mut redirections: Vec<Token> = Vec::new();
        let mut extent: Option<(Span, Span)> = None;
        let mut need_redir_arg = false;

        loop {
            let t = match self.next()? {
                Some(t) if !is_statement_end(&t) => t,
                end => {
                    if need_redir_arg {
                        return Err(EofError::new(
                            "Expected file name for redirection",
                            self.tz.line(),
                            self.tz.column(),
                            "redir",
                            "foo",
                        )
                        .into());
                    }
                    if let Some(t) = end {
                        self.push(t);
                    }
                    break;
                }
            };

            if t == "{" {
                self.push(t);
                let closure = self.parse_closure()?;
                cover(&mut extent, closure.token.span);
                words.push(WordNode::Closure(closure));
            } else if t == "[" {
                self.push(t);
                let array = self.parse_array()?;
                cover(&mut extent, array.token.span);
                words.push(WordNode::Array(array));
            } else if t == "(" {
                self.push(t);
                let sequence = self.parse_sequence()?;
                cover(&mut extent, sequence.token.span);
                words.push(WordNode::Sequence(sequence));
            } else if need_redir_arg {
                cover(&mut extent, t.span);
                redirections.push(t);
                need_redir_arg = false;
            } else if REDIR_NO_ARG.is_match(t.as_str()) {
                cover(&mut extent, t.span);
                redirections.push(t);
            } else if REDIR_ARG.is_match(t.as_str()) {
                cover(&mut extent, t.span);
                redirections.push(t);
                need_redir_arg = true;
            } else if REDIR_HEREDOC.is_match(t.as_str()) {
                let strip_tabs = t.as_str().ends_with('-');
                cover(&mut extent, t.span);
                redirections.push(t);
                let doc = self.tz.read_here_doc(strip_tabs)?;
                // The body lies past the end of the line, only the delimiter counts
                cover(&mut extent, doc.delimiter.span);
                redirections.push(doc.body);
            } else {
                cover(&mut extent, t.span);
                words.push(WordNode::Text(t));
            }
        }

        let token = match extent {
            Some((first, last)) => self.whole(&first, &last),
            None => self.empty_at(start),
        };
        let statement = Arc::new(AST::statement(token, words, redirections));
        log::debug!(
            "statement {:?} at {}:{}",
            statement.token.value,
            statement.token.line(),
            statement.token.column()
        );
        self.statements.push(Arc::clone(&statement));
        Ok(statement)
    }

    // ===========================================================================
    // GROUP PARSING
    // ===========================================================================

    pub fn sequence(&mut self) -> Result<SequenceNode, ParseError> {
        self.check_input_size()?;
        self.parse_sequence()
    }

    pub fn closure(&mut self) -> Result<ClosureNode, ParseError> {
        self.check_input_size()?;
        self.parse_closure()
    }

    pub fn array(&mut self) -> Result<ArrayNode, ParseError> {
        self.check_input_size()?;
        self.parse_array()
    }

    fn parse_sequence(&mut self) -> Result<SequenceNode, ParseError> {
        let open = self.start("(", Context::Sequence)?;
        self.expect_not_eof()?;
        let program = self.parse_program()?;
        let close = self.end(")")?;
        Ok(AST::sequence(self.whole(&open.span, &close.span), program))
    }

    fn parse_closure(&mut self) -> Result<ClosureNode, ParseError> {
        let open = self.start("{", Context::Closure)?;
        self.expect_not_eof()?;
        let program = self.parse_program()?;
        let close = self.end("}")?;
        Ok(AST::closure(self.whole(&open.span, &close.span), program))
    }

    fn parse_array(&mut self) -> Result<ArrayNode, ParseError> {
        let open = self.start("[", Context::Array)?;
        let mut kind = ArrayKind::Undetermined;
        let mut list: Vec<WordNode> = Vec::new();
        let mut map: IndexMap<WordNode, WordNode> = IndexMap::new();

        loop {
            let key = match self.next()? {
                Some(t) => t,
                None => return Err(self.eof_error("unexpected EOT", None, "]")),
            };
            if key == "]" {
                self.push(key);
                break;
            }
            if key == "\n" {
                continue;
            }
            if is_invalid_array_key(&key) {
                return Err(Self::unexpected(&key, "array key"));
            }
            let key = self.element(key)?;

            if kind == ArrayKind::Undetermined {
                let next = match self.next()? {
                    Some(t) => t,
                    None => {
                        return Err(self.eof_error(
                            "unexpected EOT while looking for array token",
                            None,
                            "]",
                        ))
                    }
                };
                kind = kind.resolve(&next);
                self.push(next);
            }

            if kind == ArrayKind::Map {
                self.expect("=")?;
                let value = match self.next()? {
                    Some(t) => t,
                    None => {
                        return Err(self.eof_error(
                            "unexpected EOT while looking for array value",
                            None,
                            "0",
                        ))
                    }
                };
                if is_invalid_array_value(&value) {
                    return Err(Self::unexpected(&value, "array value"));
                }
                let value = if value == "{" {
                    self.push(value);
                    WordNode::Closure(self.parse_closure()?)
                } else {
                    self.element(value)?
                };
                map.insert(key, value);
            } else {
                list.push(key);
            }
        }

        let close = self.end("]")?;
        let token = self.whole(&open.span, &close.span);
        Ok(match kind {
            ArrayKind::Map => AST::map(token, map),
            ArrayKind::List | ArrayKind::Undetermined => AST::list(token, list),
        })
    }

    /// A plain token, or the sequence or array it opens
    fn element(&mut self, t: Token) -> Result<WordNode, ParseError> {
        if t == "(" {
            self.push(t);
            Ok(WordNode::Sequence(self.parse_sequence()?))
        } else if t == "[" {
            self.push(t);
            Ok(WordNode::Array(self.parse_array()?))
        } else {
            Ok(WordNode::Text(t))
        }
    }
}

/// Token text as it appears in diagnostics, control characters escaped
fn quoted(t: &Token) -> String {
    t.value.escape_default().to_string()
}

/// Grow a statement's extent to include `span`
fn cover(extent: &mut Option<(Span, Span)>, span: Span) {
    match extent {
        Some((_, last)) => *last = span,
        None => *extent = Some((span, span)),
    }
}
