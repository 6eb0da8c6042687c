//! Parse context: a token cursor plus shared error reporting.

use super::error::{ErrorGenerator, ErrorKind, ParseError};
use super::token_list::TokenList;
use crate::lexer::{Keyword, Token, TokenKind};

/// The state every grammar rule works on.
///
/// Child contexts created by [`ParseContext::subcontext`] cover a narrower
/// token range but report positions through the same [`ErrorGenerator`].
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub tokens: TokenList<'a>,
    errors: ErrorGenerator<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> ParseContext<'a> {
    /// Creates a top-level context.
    #[must_use]
    pub const fn new(tokens: TokenList<'a>, errors: ErrorGenerator<'a>, max_depth: usize) -> Self {
        Self {
            tokens,
            errors,
            depth: 0,
            max_depth,
        }
    }

    /// A context one bracket level deeper over `tokens`.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::DepthLimit`] error once nesting exceeds the
    /// configured maximum.
    pub fn subcontext(&self, tokens: TokenList<'a>) -> Result<Self, ParseError> {
        if self.depth >= self.max_depth {
            let message = format!("brackets nested deeper than {} levels", self.max_depth);
            return Err(match tokens.peek(0) {
                Some(token) => self.errors.at(token, ErrorKind::DepthLimit, message),
                None => ParseError::new(ErrorKind::DepthLimit, message),
            });
        }
        Ok(Self {
            tokens,
            errors: self.errors,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }

    /// Checks that `nesting` further levels of recursion within this bracket
    /// level stay under the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::DepthLimit`] error at the current token.
    pub fn check_nesting(&self, nesting: usize) -> Result<(), ParseError> {
        if self.depth + nesting < self.max_depth {
            return Ok(());
        }
        let message = format!("expression nested deeper than {} levels", self.max_depth);
        Err(match self.tokens.peek(0) {
            Some(token) => self.errors.at(token, ErrorKind::DepthLimit, message),
            None => ParseError::new(ErrorKind::DepthLimit, message),
        })
    }

    /// A context at the same depth over `tokens`, e.g. one comma segment.
    #[must_use]
    pub const fn segment(&self, tokens: TokenList<'a>) -> Self {
        Self {
            tokens,
            errors: self.errors,
            depth: self.depth,
            max_depth: self.max_depth,
        }
    }

    /// An error pointing at `token`.
    #[must_use]
    pub fn error_at(
        &self,
        token: &Token,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> ParseError {
        self.errors.at(token, kind, message)
    }

    /// A syntax error at the current token, or an unpositioned one at the end
    /// of the range.
    #[must_use]
    pub fn error_here(&self, expected: &str) -> ParseError {
        self.error_here_as(ErrorKind::Syntax, expected)
    }

    /// Like [`ParseContext::error_here`] with an explicit kind.
    #[must_use]
    pub fn error_here_as(&self, kind: ErrorKind, expected: &str) -> ParseError {
        match self.tokens.peek(0) {
            Some(token) => self.errors.at(
                token,
                kind,
                format!("expected {expected}, found '{}'", token.text),
            ),
            None => ParseError::new(kind, format!("expected {expected}, found end of input")),
        }
    }

    /// Checks if the current token is the given keyword.
    #[must_use]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.tokens.peek(0).is_some_and(|t| t.is_keyword(keyword))
    }

    /// Checks if the token `k` ahead is the given keyword.
    #[must_use]
    pub fn check_keyword_at(&self, k: usize, keyword: Keyword) -> bool {
        self.tokens.peek(k).is_some_and(|t| t.is_keyword(keyword))
    }

    /// Checks if the current token has the given kind.
    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.tokens.peek(0).is_some_and(|t| &t.kind == kind)
    }

    /// Consumes the keyword if present.
    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.check_keyword(keyword);
        if found {
            self.tokens.advance(1);
        }
        found
    }

    /// Consumes a token of the given kind if present.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        let found = self.check(kind);
        if found {
            self.tokens.advance(1);
        }
        found
    }

    /// Expects and consumes a keyword.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming the keyword otherwise.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<&'a Token, ParseError> {
        match self.tokens.peek(0) {
            Some(token) if token.is_keyword(keyword) => {
                self.tokens.advance(1);
                Ok(token)
            }
            _ => Err(self.error_here(keyword.as_str())),
        }
    }

    /// Expects and consumes a token of the given kind.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming `expected` otherwise.
    pub fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<&'a Token, ParseError> {
        match self.tokens.peek(0) {
            Some(token) if &token.kind == kind => {
                self.tokens.advance(1);
                Ok(token)
            }
            _ => Err(self.error_here(expected)),
        }
    }

    /// Consumes a bracketed group and returns the opening bracket with a
    /// child context over its contents.
    ///
    /// # Errors
    ///
    /// Fails if the current token is not `(`, the bracket is never closed,
    /// or nesting is too deep.
    pub fn take_bracketed(&mut self) -> Result<(&'a Token, Self), ParseError> {
        match self.tokens.peek(0) {
            Some(token) if token.kind == TokenKind::LeftParen => {}
            _ => return Err(self.error_here("'('")),
        }
        let Some((open, inner)) = self.tokens.take_bracketed() else {
            let open = self.tokens.peek(0);
            return Err(match open {
                Some(token) => self.error_at(token, ErrorKind::Syntax, "unmatched bracket"),
                None => ParseError::new(ErrorKind::Syntax, "unmatched bracket"),
            });
        };
        Ok((open, self.subcontext(inner)?))
    }

    /// Fails if any token is left in this context.
    ///
    /// # Errors
    ///
    /// Returns a syntax error at the first leftover token.
    pub fn expect_end(&self) -> Result<(), ParseError> {
        match self.tokens.peek(0) {
            Some(token) => Err(self.error_at(
                token,
                ErrorKind::Syntax,
                format!("unexpected token '{}'", token.text),
            )),
            None => Ok(()),
        }
    }
}
