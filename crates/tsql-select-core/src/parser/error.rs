//! Parser error types.

use thiserror::Error;

use crate::lexer::Token;

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input text (unterminated literal, stray character).
    Lexical,
    /// Unexpected token, unmatched bracket, wrong argument count.
    Syntax,
    /// The tokens do not form a condition. The only kind a speculative
    /// bracket parse recovers from.
    NotACondition,
    /// Tokens left over after a complete statement.
    Incomplete,
    /// Bracket nesting deeper than the configured limit.
    DepthLimit,
}

/// A parse error.
///
/// `line` and `column` are zero-based and absent when no token was available
/// to point at, e.g. at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", location(.line, .column, .token_text))]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub token_text: Option<String>,
}

fn location(line: &Option<usize>, column: &Option<usize>, token_text: &Option<String>) -> String {
    match (line, column, token_text) {
        (Some(line), Some(column), Some(text)) => {
            format!(" at line {line}, column {column} near '{text}'")
        }
        (Some(line), Some(column), None) => format!(" at line {line}, column {column}"),
        _ => String::new(),
    }
}

impl ParseError {
    /// Creates an error without position information.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            column: None,
            token_text: None,
        }
    }

    /// Turns [`ErrorKind::NotACondition`] into a syntax error.
    ///
    /// Applied wherever the grammar has committed to a shape, so an enclosing
    /// speculative bracket parse does not retry on an error from inside it.
    #[must_use]
    pub const fn committed(mut self) -> Self {
        if matches!(self.kind, ErrorKind::NotACondition) {
            self.kind = ErrorKind::Syntax;
        }
        self
    }

    /// Returns true if the error carries a line and column.
    #[must_use]
    pub const fn is_positioned(&self) -> bool {
        self.line.is_some() && self.column.is_some()
    }
}

/// Maps token offsets to line and column using the whitespace tokens of the
/// same input.
#[derive(Debug, Clone, Copy)]
pub struct ErrorGenerator<'a> {
    whitespace: &'a [Token],
}

impl<'a> ErrorGenerator<'a> {
    /// Creates a generator over the whitespace and comment tokens of an input.
    #[must_use]
    pub const fn new(whitespace: &'a [Token]) -> Self {
        Self { whitespace }
    }

    /// Zero-based `(line, column)` of a byte offset.
    ///
    /// Only newlines inside whitespace tokens starting before `offset` count.
    /// The column is measured from just past the last such newline, or from
    /// the start of input on line 0.
    #[must_use]
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let mut line = 0;
        let mut line_start = 0;
        for token in self
            .whitespace
            .iter()
            .take_while(|token| token.span.start < offset)
        {
            for (index, _) in token.text.match_indices('\n') {
                line += 1;
                line_start = token.span.start + index + 1;
            }
        }
        (line, offset.saturating_sub(line_start))
    }

    /// An error pointing at `token`.
    #[must_use]
    pub fn at(&self, token: &Token, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        let (line, column) = self.position(token.span.start);
        ParseError {
            kind,
            message: message.into(),
            line: Some(line),
            column: Some(column),
            token_text: Some(token.text.clone()),
        }
    }
}
