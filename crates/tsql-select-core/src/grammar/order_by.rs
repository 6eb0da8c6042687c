//! `ORDER BY` with `OFFSET` / `FETCH` paging.

use super::{parse_comma_list, Grammar};
use crate::ast::{OrderBy, OrderItem, SortDirection};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::{ParseContext, ParseError};
use crate::tree::NodeId;

/// `ROW` or `ROWS`.
fn expect_rows(ctx: &mut ParseContext<'_>) -> Result<(), ParseError> {
    if ctx.eat_keyword(Keyword::Row) || ctx.eat_keyword(Keyword::Rows) {
        return Ok(());
    }
    Err(ctx.error_here("ROW or ROWS"))
}

impl Grammar {
    /// Parses `ORDER BY items [OFFSET n ROWS [FETCH {NEXT|FIRST} n ROWS ONLY]]`.
    ///
    /// # Errors
    ///
    /// Returns a syntax error on a malformed item or paging clause.
    pub fn parse_order_by(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Order)?;
        ctx.expect_keyword(Keyword::By)?;
        let items = parse_comma_list(self, ctx, Self::parse_order_item)?;

        let offset = if ctx.eat_keyword(Keyword::Offset) {
            let offset = self.parse_column(ctx)?;
            expect_rows(ctx)?;
            Some(offset)
        } else {
            None
        };

        let fetch = if ctx.eat_keyword(Keyword::Fetch) {
            if !(ctx.eat_keyword(Keyword::Next) || ctx.eat_keyword(Keyword::First)) {
                return Err(ctx.error_here("NEXT or FIRST"));
            }
            let fetch = self.parse_column(ctx)?;
            expect_rows(ctx)?;
            ctx.expect_keyword(Keyword::Only)?;
            Some(fetch)
        } else {
            None
        };

        Ok(self.add(OrderBy {
            items,
            offset,
            fetch,
        }))
    }

    /// `column [COLLATE name] [ASC | DESC]`.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the column or collation name is missing.
    pub fn parse_order_item(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let column = self.parse_column(ctx)?;

        let collation = if ctx.eat_keyword(Keyword::Collate) {
            match ctx.tokens.peek(0) {
                Some(Token {
                    kind: TokenKind::Identifier(name),
                    ..
                }) => {
                    ctx.tokens.advance(1);
                    Some(name.clone())
                }
                _ => return Err(ctx.error_here("a collation name")),
            }
        } else {
            None
        };

        let direction = if ctx.eat_keyword(Keyword::Desc) {
            SortDirection::Desc
        } else {
            ctx.eat_keyword(Keyword::Asc);
            SortDirection::Asc
        };

        Ok(self.add(OrderItem {
            column: Some(column),
            collation,
            direction,
        }))
    }
}
