//! Cursor over a contiguous token range.

use crate::lexer::{Keyword, Token, TokenKind};

/// A cursor over a slice of significant tokens.
///
/// Sub-ranges (bracket contents, comma segments) are independent lists
/// borrowing the same token buffer.
#[derive(Debug, Clone, Copy)]
pub struct TokenList<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenList<'a> {
    /// Creates a list positioned at the first token.
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Token `k` places ahead of the cursor.
    #[must_use]
    pub fn peek(&self, k: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + k)
    }

    /// Token `k` places before the end of the range, if not yet consumed.
    #[must_use]
    pub fn peek_from_end(&self, k: usize) -> Option<&'a Token> {
        let index = self.tokens.len().checked_sub(k + 1)?;
        if index < self.position {
            return None;
        }
        self.tokens.get(index)
    }

    /// Consumes and returns the current token.
    pub fn take(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Skips up to `n` tokens.
    pub fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.tokens.len());
    }

    /// Returns true if unconsumed tokens remain.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Number of unconsumed tokens.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    /// The unconsumed tokens.
    #[must_use]
    pub fn rest(&self) -> &'a [Token] {
        &self.tokens[self.position..]
    }

    /// Cursor position for a later [`TokenList::restore_position`].
    #[must_use]
    pub const fn save_position(&self) -> usize {
        self.position
    }

    /// Moves the cursor back to a saved position.
    pub fn restore_position(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    /// Consumes a `(` and everything up to its matching `)`, returning the
    /// opening token and the enclosed tokens.
    ///
    /// Returns `None`, consuming nothing, if the current token is not `(` or
    /// the range ends before the bracket closes.
    pub fn take_bracketed(&mut self) -> Option<(&'a Token, TokenList<'a>)> {
        let open = self.peek(0)?;
        if open.kind != TokenKind::LeftParen {
            return None;
        }

        let mut depth = 0usize;
        for (offset, token) in self.rest().iter().enumerate() {
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        let start = self.position + 1;
                        let end = self.position + offset;
                        self.position = end + 1;
                        return Some((open, TokenList::new(&self.tokens[start..end])));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Concatenates token text up to the next top-level comma and consumes
    /// that comma.
    pub fn parse_text_until_comma(&mut self) -> String {
        let end = self.find_top_level(|token| token.kind == TokenKind::Comma);
        let text = join_text(&self.rest()[..end]);
        self.advance(end + 1);
        text
    }

    /// Splits the unconsumed tokens at top-level commas, consuming them all.
    ///
    /// An empty list yields no segments; empty segments between commas are
    /// kept.
    pub fn split_commas(&mut self) -> Vec<TokenList<'a>> {
        let mut segments = Vec::new();
        if !self.has_more() {
            return segments;
        }
        loop {
            let end = self.find_top_level(|token| token.kind == TokenKind::Comma);
            let rest = self.rest();
            segments.push(TokenList::new(&rest[..end]));
            if end >= rest.len() {
                self.position = self.tokens.len();
                return segments;
            }
            self.advance(end + 1);
        }
    }

    /// Offset from the cursor of the last top-level `keyword`.
    ///
    /// Scans backwards from the end of the range, tracking bracket nesting,
    /// so keywords inside nested brackets are skipped.
    #[must_use]
    pub fn last_top_level_keyword(&self, keyword: Keyword) -> Option<usize> {
        let mut depth = 0usize;
        for (offset, token) in self.rest().iter().enumerate().rev() {
            match token.kind {
                TokenKind::RightParen => depth += 1,
                TokenKind::LeftParen => depth = depth.saturating_sub(1),
                TokenKind::Keyword(k) if k == keyword && depth == 0 => return Some(offset),
                _ => {}
            }
        }
        None
    }

    /// Offset from the cursor of the first top-level `keyword`.
    #[must_use]
    pub fn first_top_level_keyword(&self, keyword: Keyword) -> Option<usize> {
        let offset = self.find_top_level(|token| token.is_keyword(keyword));
        (offset < self.remaining()).then_some(offset)
    }

    /// Splits the unconsumed tokens at `offset` from the cursor. The token at
    /// `offset` starts the second list.
    #[must_use]
    pub fn split_at(&self, offset: usize) -> (TokenList<'a>, TokenList<'a>) {
        let (head, tail) = self.rest().split_at(offset.min(self.remaining()));
        (TokenList::new(head), TokenList::new(tail))
    }

    /// Source-like text of the unconsumed tokens.
    #[must_use]
    pub fn text(&self) -> String {
        join_text(self.rest())
    }

    /// Offset from the cursor of the first top-level token matching
    /// `predicate`, or [`TokenList::remaining`] if none does.
    fn find_top_level(&self, predicate: impl Fn(&Token) -> bool) -> usize {
        let mut depth = 0usize;
        for (offset, token) in self.rest().iter().enumerate() {
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ if depth == 0 && predicate(token) => return offset,
                _ => {}
            }
        }
        self.remaining()
    }
}

/// Joins token text, separating tokens with one space only where the source
/// had a gap between them.
fn join_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if previous.is_some_and(|previous| !previous.span.touches(token.span)) {
            text.push(' ');
        }
        text.push_str(&token.text);
        previous = Some(token);
    }
    text
}
