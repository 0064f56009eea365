//! Tokenizer for Command Lines
//!
//! The tokenizer scans source text into a stream of tokens that the parser pulls
//! one at a time. It handles:
//! - Operators, separators and group delimiters
//! - Words (quotes, escapes and `${...}` / `$(...)` kept inside the word)
//! - Comments and line continuations
//! - Redirection operators
//! - Here-documents, read on demand by the parser
//!
//! Tokens are exact spans: their value is the raw source text, nothing is unquoted.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::ast::types::Span;
use crate::parser::types::{EofError, ParseError, SyntaxError};

/// A token produced by the tokenizer
///
/// Equality and hashing only look at the text, so a token compares equal to
/// any other token (or `&str`) with the same content.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(value: impl Into<String>, start: usize, line: usize, column: usize) -> Self {
        let value = value.into();
        let length = value.len();
        Self {
            value,
            span: Span {
                start,
                length,
                line,
                column,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end()
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A here-document read by [`Tokenizer::read_here_doc`]
#[derive(Debug, Clone, PartialEq)]
pub struct HereDoc {
    /// The delimiter word as written after the operator, quotes included
    pub delimiter: Token,
    /// Every line between the operator's line and the terminator line
    pub body: Token,
}

/// Region skipped once the scan reaches the newline ending a heredoc operator's line
#[derive(Debug, Clone, Copy)]
struct PendingBody {
    newline: usize,
    resume: usize,
    line: usize,
    column: usize,
}

/// Pull tokenizer with a single pushback slot
pub struct Tokenizer {
    text: String,
    index: usize,
    line: usize,
    column: usize,
    pushed: Option<Token>,
    /// Last token produced by scanning, not by pushback
    last: Option<Token>,
    /// Group delimiters opened so far and not yet closed
    groups: Vec<char>,
    pending_body: Option<PendingBody>,
}

impl Tokenizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            index: 0,
            line: 1,
            column: 1,
            pushed: None,
            last: None,
            groups: Vec::new(),
            pending_body: None,
        }
    }

    /// The whole source as a single token
    pub fn text(&self) -> Token {
        Token::new(self.text.as_str(), 0, 1, 1)
    }

    pub fn source(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// `(offset, line, column)` of the next delivered token, or of the scan
    /// position when nothing is pushed back
    pub fn position(&self) -> (usize, usize, usize) {
        match &self.pushed {
            Some(t) => (t.start(), t.line(), t.column()),
            None => (self.index, self.line, self.column),
        }
    }

    pub fn has_pushed(&self) -> bool {
        self.pushed.is_some()
    }

    /// Store a token to be returned by the next call to [`Tokenizer::next`]
    pub fn push(&mut self, token: Token) {
        debug_assert!(
            self.pushed.is_none(),
            "pushback slot already holds {:?}",
            self.pushed
        );
        self.pushed = Some(token);
    }

    /// Token covering `start..end` of the source
    pub fn slice(&self, start: usize, end: usize, line: usize, column: usize) -> Token {
        Token::new(&self.text[start..end], start, line, column)
    }

    /// Next token, or `None` at end of input
    pub fn next(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(token) = self.pushed.take() {
            return Ok(Some(token));
        }

        let skip_newlines = match &self.last {
            None => true,
            Some(t) => matches!(
                t.as_str(),
                "\n" | ";" | "&" | "|" | "|&" | "&&" | "||" | "{" | "("
            ),
        };
        self.skip_space(skip_newlines)?;

        let start = self.index;
        let line = self.line;
        let column = self.column;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        if c == '\n' {
            // The newline may jump over a heredoc body, so its extent is fixed
            self.bump_line_end();
            return Ok(Some(self.emit(start, start + 1, line, column)));
        }

        self.scan_token(c)?;
        let end = self.index;
        Ok(Some(self.emit(start, end, line, column)))
    }

    /// Scan one token other than a newline, starting at `c`
    fn scan_token(&mut self, c: char) -> Result<(), ParseError> {
        match c {
            '(' | '{' | '[' => {
                self.bump();
                self.groups.push(c);
            }
            ')' | '}' | ']' => {
                self.bump();
                self.close_group(c);
            }
            ';' => {
                self.bump();
            }
            '&' => {
                self.bump();
                if matches!(self.peek(), Some('&') | Some('>')) {
                    self.bump();
                }
            }
            '|' => {
                self.bump();
                if matches!(self.peek(), Some('|') | Some('&')) {
                    self.bump();
                }
            }
            '=' if self.in_array() => {
                self.bump();
            }
            '<' | '>' => self.scan_redirection(),
            c if c.is_ascii_digit() && matches!(self.peek_at(1), Some('<') | Some('>')) => {
                self.bump();
                self.scan_redirection();
            }
            _ => self.scan_word()?,
        }
        Ok(())
    }

    /// Read the here-document introduced by the operator just scanned.
    ///
    /// The delimiter is the next word on the current line. The body is every line
    /// after the current one up to a line equal to the delimiter; with
    /// `strip_leading_tabs`, leading tabs are ignored when matching that line.
    /// The body is returned verbatim as an exact span. Scanning resumes on the
    /// current line, and skips the body once it reaches the end of that line.
    /// The line ends at the first newline outside quotes, groups, comments and
    /// continuations.
    pub fn read_here_doc(&mut self, strip_leading_tabs: bool) -> Result<HereDoc, ParseError> {
        debug_assert!(self.pushed.is_none(), "here-doc read with a pushed-back token");

        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }

        let start = self.index;
        let line = self.line;
        let column = self.column;
        let mut delimiter = String::new();

        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => break,
                ';' | '&' | '|' | '<' | '>' | '(' | ')' => break,
                '\'' | '"' => {
                    let from = self.index + 1;
                    self.scan_quote(c)?;
                    delimiter.push_str(&self.text[from..self.index - 1]);
                }
                '\\' => {
                    self.bump();
                    if let Some(escaped) = self.bump() {
                        delimiter.push(escaped);
                    }
                }
                _ => {
                    delimiter.push(c);
                    self.bump();
                }
            }
        }

        if delimiter.is_empty() {
            return Err(SyntaxError::new("expected here-doc delimiter", line, column).into());
        }
        let delimiter_token = self.slice(start, self.index, line, column);

        // Several heredocs on one line are read back to back
        let (newline, body_start, body_line) = match self.pending_body {
            Some(pending) => (pending.newline, pending.resume, pending.line),
            None => match self.find_line_end()? {
                Some((newline, newline_line)) => (newline, newline + 1, newline_line + 1),
                None => {
                    return Err(EofError::new(
                        "unexpected EOT while looking for here-doc body",
                        self.line,
                        self.column,
                        "heredoc",
                        format!("\n{}", delimiter),
                    )
                    .into())
                }
            },
        };

        let mut line_start = body_start;
        let mut line_no = body_line;
        loop {
            let line_end = self.text[line_start..]
                .find('\n')
                .map_or(self.text.len(), |i| line_start + i);

            let mut candidate = self.text[line_start..line_end].trim_end_matches('\r');
            if strip_leading_tabs {
                candidate = candidate.trim_start_matches('\t');
            }

            if candidate == delimiter {
                let (resume, resume_line, resume_column) = if line_end < self.text.len() {
                    (line_end + 1, line_no + 1, 1)
                } else {
                    let width = self.text[line_start..line_end].chars().count();
                    (line_end, line_no, width + 1)
                };
                self.pending_body = Some(PendingBody {
                    newline,
                    resume,
                    line: resume_line,
                    column: resume_column,
                });

                let body = self.slice(body_start, line_start, body_line, 1);
                log::trace!("here-doc {:?}: {} bytes", delimiter, body.span.length);
                return Ok(HereDoc {
                    delimiter: delimiter_token,
                    body,
                });
            }

            if line_end >= self.text.len() {
                return Err(EofError::new(
                    format!("unexpected EOT while looking for here-doc terminator '{}'", delimiter),
                    line,
                    column,
                    "heredoc",
                    format!("\n{}", delimiter),
                )
                .into());
            }

            line_start = line_end + 1;
            line_no += 1;
        }
    }

    /// Offset and line of the newline ending the current logical line.
    /// The scan position is left untouched.
    fn find_line_end(&mut self) -> Result<Option<(usize, usize)>, ParseError> {
        let (index, line, column) = (self.index, self.line, self.column);
        let groups = self.groups.clone();

        let found = self.scan_to_line_end();

        self.index = index;
        self.line = line;
        self.column = column;
        self.groups = groups;
        found
    }

    fn scan_to_line_end(&mut self) -> Result<Option<(usize, usize)>, ParseError> {
        loop {
            self.skip_space(false)?;
            match self.peek() {
                None => return Ok(None),
                Some('\n') => return Ok(Some((self.index, self.line))),
                Some(c) => self.scan_token(c)?,
            }
        }
    }

    fn emit(&mut self, start: usize, end: usize, line: usize, column: usize) -> Token {
        let token = self.slice(start, end, line, column);
        log::trace!("token {:?} at {}:{}", token.value, line, column);
        self.last = Some(token.clone());
        token
    }

    fn peek(&self) -> Option<char> {
        self.text[self.index..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.text[self.index..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume a newline that ends a logical line, jumping over the here-doc
    /// bodies it introduces
    fn bump_line_end(&mut self) {
        let at = self.index;
        self.bump();
        if let Some(pending) = self.pending_body.filter(|p| p.newline == at) {
            self.index = pending.resume;
            self.line = pending.line;
            self.column = pending.column;
            self.pending_body = None;
        }
    }

    fn in_array(&self) -> bool {
        self.groups.last() == Some(&'[')
    }

    fn close_group(&mut self, close: char) {
        let open = match close {
            ')' => '(',
            '}' => '{',
            _ => '[',
        };
        if self.groups.last() == Some(&open) {
            self.groups.pop();
        }
    }

    fn skip_space(&mut self, skip_newlines: bool) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.bump();
                }
                Some('\n') if skip_newlines => self.bump_line_end(),
                // Line continuation
                Some('\\') if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                Some('#') => self.skip_line_comment(),
                Some('/') if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                Some('/') if self.peek_at(1) == Some('*') => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while matches!(self.peek(), Some(c) if c != '\n') {
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        let column = self.column;
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                None => {
                    return Err(EofError::new(
                        "unexpected EOT looking for closing comment: */",
                        line,
                        column,
                        "comment",
                        "*/",
                    )
                    .into())
                }
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn scan_redirection(&mut self) {
        match self.bump() {
            Some('>') => match self.peek() {
                Some('>') => {
                    self.bump();
                }
                Some('&') if self.is_fd_target(1) => {
                    self.bump();
                    self.bump();
                }
                _ => {}
            },
            Some('<') => match self.peek() {
                Some('<') => {
                    self.bump();
                    if matches!(self.peek(), Some('<') | Some('-')) {
                        self.bump();
                    }
                }
                Some('>') => {
                    self.bump();
                }
                Some('&') if self.is_fd_target(1) => {
                    self.bump();
                    self.bump();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn is_fd_target(&self, offset: usize) -> bool {
        matches!(self.peek_at(offset), Some(c) if c.is_ascii_digit() || c == '-')
    }

    fn scan_word(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' | ';' | '&' | '|' | '<' | '>' | '(' | ')' | '{' | '}'
                | '[' | ']' => break,
                '=' if self.in_array() => break,
                '\\' => self.scan_escape()?,
                '\'' | '"' => self.scan_quote(c)?,
                '$' if matches!(self.peek_at(1), Some('{') | Some('(')) => {
                    self.bump();
                    self.scan_group()?;
                }
                _ => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    fn scan_escape(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        let column = self.column;
        self.bump();
        if self.bump().is_none() {
            return Err(EofError::new("unexpected EOT in \\ escape", line, column, "escape", "").into());
        }
        Ok(())
    }

    fn scan_quote(&mut self, quote: char) -> Result<(), ParseError> {
        let line = self.line;
        let column = self.column;
        self.bump();
        loop {
            match self.bump() {
                None => {
                    let missing = if quote == '\'' { "quote" } else { "dquote" };
                    return Err(EofError::new(
                        format!("unexpected EOT looking for matching quote: {}", quote),
                        line,
                        column,
                        missing,
                        quote.to_string(),
                    )
                    .into());
                }
                Some(c) if c == quote => return Ok(()),
                Some('\\') if quote == '"' => {
                    self.bump();
                }
                Some(_) => {}
            }
        }
    }

    /// Balanced `{...}` or `(...)` following a `$`
    fn scan_group(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        let column = self.column;
        let open = match self.bump() {
            Some(c) => c,
            None => return Ok(()),
        };
        let (close, missing) = if open == '{' { ('}', "brace") } else { (')', "paren") };
        let mut depth = 1;

        loop {
            match self.peek() {
                None => {
                    return Err(EofError::new(
                        format!("unexpected EOT looking for matching '{}'", close),
                        line,
                        column,
                        missing,
                        close.to_string(),
                    )
                    .into())
                }
                Some(c @ ('\'' | '"')) => self.scan_quote(c)?,
                Some('\\') => self.scan_escape()?,
                Some(c) => {
                    self.bump();
                    if c == open {
                        depth += 1;
                    } else if c == close {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(input: &str) -> Vec<String> {
        let mut tz = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(t) = tz.next().unwrap() {
            out.push(t.value);
        }
        out
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(values("echo hello"), vec!["echo", "hello"]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            values("a | b |& c && d || e ; f & g"),
            vec!["a", "|", "b", "|&", "c", "&&", "d", "||", "e", ";", "f", "&", "g"]
        );
        assert_eq!(values("(a){b}[c]"), vec!["(", "a", ")", "{", "b", "}", "[", "c", "]"]);
    }

    #[test]
    fn test_redirections() {
        assert_eq!(values("cmd > out.txt"), vec!["cmd", ">", "out.txt"]);
        assert_eq!(values("cmd 2>&1 >>log"), vec!["cmd", "2>&1", ">>", "log"]);
        assert_eq!(values("cmd <in <>rw <&- &>all"), vec!["cmd", "<", "in", "<>", "rw", "<&-", "&>", "all"]);
        assert_eq!(values("cmd <<<word"), vec!["cmd", "<<<", "word"]);
    }

    #[test]
    fn test_quotes_stay_in_word() {
        assert_eq!(values("echo 'a b' \"c | d\""), vec!["echo", "'a b'", "\"c | d\""]);
        assert_eq!(values("echo ${a} $(b c) x\\ y"), vec!["echo", "${a}", "$(b c)", "x\\ y"]);
    }

    #[test]
    fn test_equals_split_only_in_arrays() {
        assert_eq!(values("a=b"), vec!["a=b"]);
        assert_eq!(values("[a=b]"), vec!["[", "a", "=", "b", "]"]);
        assert_eq!(values("[(x=y)]"), vec!["[", "(", "x=y", ")", "]"]);
    }

    #[test]
    fn test_newlines_collapse() {
        assert_eq!(values("\n\na\n\n\nb"), vec!["a", "\n", "b"]);
        assert_eq!(values("a |\n b"), vec!["a", "|", "b"]);
        assert_eq!(values("a;\nb"), vec!["a", ";", "b"]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(values("echo a # trailing\nb"), vec!["echo", "a", "\n", "b"]);
        assert_eq!(values("echo /* block */ a // rest"), vec!["echo", "a"]);
        assert_eq!(values("ls http://example.com#anchor"), vec!["ls", "http://example.com#anchor"]);
    }

    #[test]
    fn test_token_positions() {
        let mut tz = Tokenizer::new("ab\n  cd");
        let ab = tz.next().unwrap().unwrap();
        assert_eq!((ab.start(), ab.line(), ab.column()), (0, 1, 1));
        let nl = tz.next().unwrap().unwrap();
        assert_eq!(nl.as_str(), "\n");
        let cd = tz.next().unwrap().unwrap();
        assert_eq!((cd.start(), cd.line(), cd.column()), (5, 2, 3));
        assert_eq!(&tz.source()[cd.start()..cd.end()], "cd");
    }

    #[test]
    fn test_pushback() {
        let mut tz = Tokenizer::new("a b");
        let a = tz.next().unwrap().unwrap();
        tz.push(a.clone());
        assert!(tz.has_pushed());
        assert_eq!(tz.position(), (0, 1, 1));
        assert_eq!(tz.next().unwrap().unwrap(), a);
        assert_eq!(tz.next().unwrap().unwrap(), "b");
        assert_eq!(tz.next().unwrap(), None);
    }

    #[test]
    fn test_token_equality_by_content() {
        let a = Token::new("x", 0, 1, 1);
        let b = Token::new("x", 10, 3, 4);
        assert_eq!(a, b);
        assert_eq!(a, "x");
        assert_ne!(a, Token::new("y", 0, 1, 1));
    }

    #[test]
    fn test_heredoc() {
        let mut tz = Tokenizer::new("cat <<EOF\nhello\nworld\nEOF\nnext");
        assert_eq!(tz.next().unwrap().unwrap(), "cat");
        assert_eq!(tz.next().unwrap().unwrap(), "<<");
        let doc = tz.read_here_doc(false).unwrap();
        assert_eq!(doc.delimiter, "EOF");
        assert_eq!(doc.body, "hello\nworld\n");
        assert_eq!(doc.body.line(), 2);
        assert_eq!(tz.next().unwrap().unwrap(), "\n");
        let next = tz.next().unwrap().unwrap();
        assert_eq!(next, "next");
        assert_eq!(next.line(), 5);
    }

    #[test]
    fn test_heredoc_rest_of_line_keeps_tokenizing() {
        let mut tz = Tokenizer::new("cat <<'END' | grep x\nbody\nEND\nwc");
        tz.next().unwrap();
        tz.next().unwrap();
        let doc = tz.read_here_doc(false).unwrap();
        assert_eq!(doc.delimiter, "'END'");
        assert_eq!(doc.body, "body\n");
        let mut rest = Vec::new();
        while let Some(t) = tz.next().unwrap() {
            rest.push(t.value);
        }
        assert_eq!(rest, vec!["|", "grep", "x", "\n", "wc"]);
    }

    #[test]
    fn test_heredoc_body_follows_logical_line() {
        let mut tz = Tokenizer::new("cat <<EOF 'x\ny' \\\n| wc\nbody\nEOF\nnext");
        tz.next().unwrap();
        tz.next().unwrap();
        let doc = tz.read_here_doc(false).unwrap();
        assert_eq!(doc.body, "body\n");
        assert_eq!(doc.body.line(), 4);

        let mut rest = Vec::new();
        while let Some(t) = tz.next().unwrap() {
            rest.push((t.value, t.span.line));
        }
        let expected: Vec<(String, usize)> = vec![
            ("'x\ny'".into(), 1),
            ("|".into(), 3),
            ("wc".into(), 3),
            ("\n".into(), 3),
            ("next".into(), 6),
        ];
        assert_eq!(rest, expected);
    }

    #[test]
    fn test_heredoc_strip_tabs_matches_indented_terminator() {
        let mut tz = Tokenizer::new("cat <<-EOF\n\tindented\n\tEOF\n");
        tz.next().unwrap();
        tz.next().unwrap();
        let doc = tz.read_here_doc(true).unwrap();
        // body is kept verbatim, tabs included
        assert_eq!(doc.body, "\tindented\n");

        let mut tz = Tokenizer::new("cat <<EOF\n\tindented\n\tEOF\n");
        tz.next().unwrap();
        tz.next().unwrap();
        let err = tz.read_here_doc(false).unwrap_err();
        assert_eq!(err.missing(), Some("heredoc"));
    }

    #[test]
    fn test_two_heredocs_on_one_line() {
        let mut tz = Tokenizer::new("cmd <<A <<B\none\nA\ntwo\nB\n");
        tz.next().unwrap();
        tz.next().unwrap();
        let first = tz.read_here_doc(false).unwrap();
        assert_eq!(tz.next().unwrap().unwrap(), "<<");
        let second = tz.read_here_doc(false).unwrap();
        assert_eq!(first.body, "one\n");
        assert_eq!(second.body, "two\n");
        assert_eq!(tz.next().unwrap().unwrap(), "\n");
        assert_eq!(tz.next().unwrap(), None);
    }

    #[test]
    fn test_heredoc_errors() {
        let mut tz = Tokenizer::new("cat <<EOF");
        tz.next().unwrap();
        tz.next().unwrap();
        let err = tz.read_here_doc(false).unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.missing(), Some("heredoc"));

        let mut tz = Tokenizer::new("cat <<\nbody");
        tz.next().unwrap();
        tz.next().unwrap();
        assert!(!tz.read_here_doc(false).unwrap_err().is_eof());
    }

    #[test]
    fn test_unterminated_quote() {
        let mut tz = Tokenizer::new("echo 'abc");
        tz.next().unwrap();
        let err = tz.next().unwrap_err();
        assert_eq!(err.missing(), Some("quote"));
        assert_eq!((err.line(), err.column()), (1, 6));

        let mut tz = Tokenizer::new("echo \"abc");
        tz.next().unwrap();
        assert_eq!(tz.next().unwrap_err().missing(), Some("dquote"));
    }

    #[test]
    fn test_unterminated_group_and_comment() {
        let mut tz = Tokenizer::new("echo ${abc");
        tz.next().unwrap();
        assert_eq!(tz.next().unwrap_err().missing(), Some("brace"));

        let mut tz = Tokenizer::new("echo /* never closed");
        tz.next().unwrap();
        assert_eq!(tz.next().unwrap_err().missing(), Some("comment"));
    }
}
