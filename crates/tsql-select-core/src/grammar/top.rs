//! `TOP n [PERCENT] [WITH TIES]`.

use super::Grammar;
use crate::ast::Top;
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ParseContext, ParseError};
use crate::tree::NodeId;

impl Grammar {
    /// Parses a `TOP` clause. The count is a number, a variable or a
    /// bracketed column.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the count is missing or `WITH` is not
    /// followed by `TIES`.
    pub fn parse_top(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Top)?;

        let count = match ctx.tokens.peek(0).map(|token| &token.kind) {
            Some(
                TokenKind::Integer(_)
                | TokenKind::Decimal(_)
                | TokenKind::Variable(_)
                | TokenKind::LeftParen,
            ) => self.parse_primary_column(ctx)?,
            _ => return Err(ctx.error_here("a TOP count")),
        };

        let percent = ctx.eat_keyword(Keyword::Percent);
        let with_ties = ctx.eat_keyword(Keyword::With);
        if with_ties {
            ctx.expect_keyword(Keyword::Ties)?;
        }

        Ok(self.add(Top {
            count: Some(count),
            percent,
            with_ties,
        }))
    }
}
