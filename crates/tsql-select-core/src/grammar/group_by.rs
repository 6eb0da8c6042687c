//! `GROUP BY` with `ROLLUP`, `CUBE` and `GROUPING SETS`.

use super::{parse_segments, Grammar};
use crate::ast::{GroupBy, GroupingKind, GroupingSet};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

/// `ROLLUP (` or `CUBE (` at the cursor.
fn grouping_function(ctx: &ParseContext<'_>) -> Option<GroupingKind> {
    let kind = if ctx.check_keyword(Keyword::Rollup) {
        GroupingKind::Rollup
    } else if ctx.check_keyword(Keyword::Cube) {
        GroupingKind::Cube
    } else {
        return None;
    };
    ctx.tokens
        .peek(1)
        .is_some_and(|token| token.kind == TokenKind::LeftParen)
        .then_some(kind)
}

impl Grammar {
    /// Parses `GROUP BY ...`.
    ///
    /// Plain columns of a list are gathered into one `Columns` set placed
    /// where the first of them appeared.
    ///
    /// # Errors
    ///
    /// Returns a syntax error on a malformed grouping element.
    pub fn parse_group_by(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Group)?;
        ctx.expect_keyword(Keyword::By)?;

        if ctx.eat_keyword(Keyword::Grouping) {
            ctx.expect_keyword(Keyword::Sets)?;
            let sets = self.parse_grouping_sets(ctx)?;
            return Ok(self.add(GroupBy {
                grouping_sets: true,
                sets,
            }));
        }

        let mut sets = Vec::new();
        let mut plain: Option<(usize, Vec<Option<NodeId>>)> = None;
        loop {
            if let Some(kind) = grouping_function(ctx) {
                ctx.tokens.advance(1);
                sets.push(Some(self.parse_grouping_function(ctx, kind)?));
            } else {
                let column = self.parse_column(ctx)?;
                plain
                    .get_or_insert_with(|| (sets.len(), Vec::new()))
                    .1
                    .push(Some(column));
            }
            if !ctx.eat(&TokenKind::Comma) {
                break;
            }
        }
        if let Some((index, columns)) = plain {
            let set = self.add(GroupingSet {
                kind: GroupingKind::Columns,
                columns,
            });
            sets.insert(index, Some(set));
        }

        Ok(self.add(GroupBy {
            grouping_sets: false,
            sets,
        }))
    }

    /// The bracketed body of `GROUPING SETS (...)`.
    fn parse_grouping_sets(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Vec<Option<NodeId>>, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;

        let mut sets = Vec::new();
        for segment in inner.tokens.split_commas() {
            let mut segment = inner.segment(segment);
            let set = if let Some(kind) = grouping_function(&segment) {
                segment.tokens.advance(1);
                self.parse_grouping_function(&mut segment, kind)?
            } else if segment.check(&TokenKind::LeftParen) {
                let (_, mut columns_ctx) = segment.take_bracketed()?;
                let columns = parse_segments(self, &mut columns_ctx, Self::parse_column)?;
                self.add(GroupingSet {
                    kind: GroupingKind::Columns,
                    columns,
                })
            } else {
                let column = self.parse_column(&mut segment)?;
                self.add(GroupingSet {
                    kind: GroupingKind::Columns,
                    columns: vec![Some(column)],
                })
            };
            segment.expect_end()?;
            sets.push(Some(set));
        }

        if sets.is_empty() {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                "GROUPING SETS requires at least one set",
            ));
        }
        Ok(sets)
    }

    /// The bracketed column list after `ROLLUP` or `CUBE`.
    fn parse_grouping_function(
        &mut self,
        ctx: &mut ParseContext<'_>,
        kind: GroupingKind,
    ) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        let columns = parse_segments(self, &mut inner, Self::parse_column)?;
        if columns.is_empty() {
            let name = if kind == GroupingKind::Cube { "CUBE" } else { "ROLLUP" };
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("{name} requires at least one column"),
            ));
        }
        Ok(self.add(GroupingSet { kind, columns }))
    }
}
