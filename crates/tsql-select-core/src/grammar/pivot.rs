//! `PIVOT (aggregation FOR column IN (values)) AS alias`.

use super::{parse_alias, parse_segments, parse_whole, Grammar};
use crate::ast::Pivot;
use crate::lexer::Keyword;
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

impl Grammar {
    /// Parses a `PIVOT` clause.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if `FOR`, `IN`, the value list or the alias is
    /// missing.
    pub fn parse_pivot(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Pivot)?;
        let (open, mut inner) = ctx.take_bracketed()?;

        let Some(split) = inner.tokens.first_top_level_keyword(Keyword::For) else {
            return Err(ctx.error_at(open, ErrorKind::Syntax, "PIVOT requires FOR"));
        };
        let (aggregation, rest) = inner.tokens.split_at(split);
        let aggregation = parse_whole(self, &inner, aggregation, Self::parse_column)?;
        inner.tokens = rest;
        inner.expect_keyword(Keyword::For)?;

        let pivot_column = self.parse_column(&mut inner)?;
        inner.expect_keyword(Keyword::In)?;
        let (values_open, mut values_ctx) = inner.take_bracketed()?;
        let values = parse_segments(self, &mut values_ctx, Self::parse_column)?;
        if values.is_empty() {
            return Err(ctx.error_at(
                values_open,
                ErrorKind::Syntax,
                "PIVOT requires at least one value",
            ));
        }
        inner.expect_end()?;

        let Some(alias) = parse_alias(ctx, false)? else {
            return Err(ctx.error_here("an alias for PIVOT"));
        };

        Ok(self.add(Pivot {
            aggregation: Some(aggregation),
            pivot_column: Some(pivot_column),
            values,
            alias,
        }))
    }
}
