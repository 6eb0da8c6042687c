//! Statement orchestration: CTEs, set-operator chains and select blocks.

use super::{expect_identifier, parse_comma_list, starts_subselect, Grammar};
use crate::ast::{Cte, Identifier, Select, SelectStatement, SetOperator};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

/// Consumes a set operator introducing the next select block.
fn parse_set_operator(ctx: &mut ParseContext<'_>) -> Option<SetOperator> {
    if ctx.eat_keyword(Keyword::Union) {
        if ctx.eat_keyword(Keyword::All) {
            return Some(SetOperator::UnionAll);
        }
        return Some(SetOperator::Union);
    }
    if ctx.eat_keyword(Keyword::Intersect) {
        return Some(SetOperator::Intersect);
    }
    if ctx.eat_keyword(Keyword::Except) {
        return Some(SetOperator::Except);
    }
    None
}

impl Grammar {
    /// Parses a full statement:
    /// `[WITH ctes] select {set-op select} [ORDER BY ...] [OPTION (...)]`.
    ///
    /// A statement is a committed shape: conditions inside it never surface
    /// as [`ErrorKind::NotACondition`] to an enclosing bracket.
    ///
    /// # Errors
    ///
    /// Returns a syntax error on any malformed clause.
    pub fn parse_select_statement(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<NodeId, ParseError> {
        self.parse_statement_body(ctx).map_err(ParseError::committed)
    }

    fn parse_statement_body(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let mut ctes = Vec::new();
        if ctx.eat_keyword(Keyword::With) {
            loop {
                ctes.push(Some(self.parse_cte(ctx)?));
                if !ctx.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let mut selects = vec![Some(self.parse_select_block(ctx, None)?)];
        while let Some(operator) = parse_set_operator(ctx) {
            selects.push(Some(self.parse_select_block(ctx, Some(operator))?));
        }

        let order_by = if ctx.check_keyword(Keyword::Order) {
            Some(self.parse_order_by(ctx)?)
        } else {
            None
        };
        let options = if ctx.check_keyword(Keyword::Option) {
            Some(self.parse_option_hints(ctx)?)
        } else {
            None
        };

        Ok(self.add(SelectStatement {
            ctes,
            selects,
            order_by,
            options,
        }))
    }

    /// Parses a single select block without set operators or `ORDER BY`.
    ///
    /// # Errors
    ///
    /// Returns a syntax error on any malformed clause.
    pub fn parse_select(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        self.parse_select_block(ctx, None).map_err(ParseError::committed)
    }

    /// `name [(col, ...)] AS (statement)`.
    fn parse_cte(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let name = expect_identifier(ctx, "a CTE name")?;

        let mut columns: Vec<Identifier> = Vec::new();
        if ctx.check(&TokenKind::LeftParen) {
            let (open, mut inner) = ctx.take_bracketed()?;
            for segment in inner.tokens.split_commas() {
                let mut segment = inner.segment(segment);
                columns.push(expect_identifier(&mut segment, "a column name")?);
                segment.expect_end()?;
            }
            if columns.is_empty() {
                return Err(ctx.error_at(open, ErrorKind::Syntax, "empty CTE column list"));
            }
        }

        ctx.expect_keyword(Keyword::As)?;
        let (open, mut inner) = ctx.take_bracketed()?;
        if !starts_subselect(&inner) {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("CTE '{name}' requires a select statement"),
            ));
        }
        let select = self.parse_select_statement(&mut inner)?;
        inner.expect_end()?;

        Ok(self.add(Cte {
            name,
            columns,
            select: Some(select),
        }))
    }

    fn parse_select_block(
        &mut self,
        ctx: &mut ParseContext<'_>,
        set_operator: Option<SetOperator>,
    ) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Select)?;

        let mut top = None;
        let mut distinct = false;
        loop {
            if ctx.eat_keyword(Keyword::Distinct) {
                distinct = true;
            } else if ctx.eat_keyword(Keyword::All) {
                distinct = false;
            } else if top.is_none() && ctx.check_keyword(Keyword::Top) {
                top = Some(self.parse_top(ctx)?);
            } else {
                break;
            }
        }

        let columns = parse_comma_list(self, ctx, Self::parse_select_column)?;

        let from = if ctx.eat_keyword(Keyword::From) {
            parse_comma_list(self, ctx, Self::parse_relation)?
        } else {
            Vec::new()
        };

        let pivot = if ctx.check_keyword(Keyword::Pivot) {
            Some(self.parse_pivot(ctx)?)
        } else {
            None
        };

        let where_clause = if ctx.eat_keyword(Keyword::Where) {
            Some(self.parse_condition(ctx)?)
        } else {
            None
        };

        let group_by = if ctx.check_keyword(Keyword::Group) {
            Some(self.parse_group_by(ctx)?)
        } else {
            None
        };

        let having = if ctx.eat_keyword(Keyword::Having) {
            Some(self.parse_condition(ctx)?)
        } else {
            None
        };

        Ok(self.add(Select {
            set_operator,
            top,
            distinct,
            columns,
            from,
            pivot,
            where_clause,
            group_by,
            having,
        }))
    }
}
