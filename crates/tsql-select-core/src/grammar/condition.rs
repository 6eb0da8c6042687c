//! Condition grammar.
//!
//! `AND` and `OR` have no relative precedence here: a run of terms becomes
//! one flat [`ChainCondition`](crate::ast::ChainCondition) read left to
//! right, and only brackets group.

use super::{parse_segments, starts_subselect, Grammar};
use crate::ast::{
    BetweenCondition, BracketCondition, ChainCondition, ComparisonCondition, ComparisonOperator,
    ConditionLink, ExistsCondition, InListCondition, InSelectCondition, IsNullCondition,
    LogicOperator, NotCondition, Quantifier, SetComparisonCondition, SubselectColumn,
};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

fn comparison_operator(kind: &TokenKind) -> Option<ComparisonOperator> {
    match kind {
        TokenKind::Eq => Some(ComparisonOperator::Eq),
        TokenKind::NotEq => Some(ComparisonOperator::NotEq),
        TokenKind::Lt => Some(ComparisonOperator::Lt),
        TokenKind::LtEq => Some(ComparisonOperator::LtEq),
        TokenKind::Gt => Some(ComparisonOperator::Gt),
        TokenKind::GtEq => Some(ComparisonOperator::GtEq),
        _ => None,
    }
}

fn logic_operator(ctx: &ParseContext<'_>) -> Option<LogicOperator> {
    if ctx.check_keyword(Keyword::And) {
        Some(LogicOperator::And)
    } else if ctx.check_keyword(Keyword::Or) {
        Some(LogicOperator::Or)
    } else {
        None
    }
}

impl Grammar {
    /// Parses a condition: one term, or a flat `AND`/`OR` chain of terms.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotACondition`] if the first term is a column
    /// without a predicate, or a syntax error. Terms after the first are
    /// committed and never report [`ErrorKind::NotACondition`].
    pub fn parse_condition(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let left = self.parse_condition_term(ctx)?;

        let mut links = Vec::new();
        while let Some(operator) = logic_operator(ctx) {
            ctx.tokens.advance(1);
            let condition = self
                .parse_condition_term(ctx)
                .map_err(ParseError::committed)?;
            links.push(Some(self.add(ConditionLink {
                operator,
                condition: Some(condition),
            })));
        }

        if links.is_empty() {
            return Ok(left);
        }
        Ok(self.add(ChainCondition {
            left: Some(left),
            links,
        }))
    }

    fn parse_condition_term(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        if let Some(hook) = self.hooks.condition {
            if let Some(condition) = hook(self, ctx)? {
                return Ok(condition);
            }
        }

        if ctx.eat_keyword(Keyword::Not) {
            let condition = self.nested(ctx, Self::parse_condition_term)?;
            return Ok(self.add(NotCondition {
                condition: Some(condition),
            }));
        }

        if ctx.eat_keyword(Keyword::Exists) {
            let select = self.parse_bracketed_select(ctx, "EXISTS")?;
            return Ok(self.add(ExistsCondition {
                select: Some(select),
            }));
        }

        if ctx.check(&TokenKind::LeftParen) {
            if let Some(condition) = self.attempt(ctx, Self::parse_bracket_condition)? {
                return Ok(condition);
            }
        }

        self.parse_predicate(ctx)
    }

    /// `( condition )`. Anything else in the brackets is reported as
    /// [`ErrorKind::NotACondition`] so the caller can retry it as a column.
    fn parse_bracket_condition(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        if !inner.tokens.has_more() || starts_subselect(&inner) {
            return Err(ctx.error_at(
                open,
                ErrorKind::NotACondition,
                "brackets do not hold a condition",
            ));
        }
        let condition = self.parse_condition(&mut inner)?;
        inner.expect_end()?;
        Ok(self.add(BracketCondition {
            inner: Some(condition),
        }))
    }

    /// A column followed by `IN`, `BETWEEN`, `LIKE`, `IS NULL` or a
    /// comparison operator.
    fn parse_predicate(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let column = self.parse_column(ctx)?;

        let negated = ctx.check_keyword(Keyword::Not)
            && [Keyword::In, Keyword::Between, Keyword::Like]
                .into_iter()
                .any(|keyword| ctx.check_keyword_at(1, keyword));
        if negated {
            ctx.tokens.advance(1);
        }

        if ctx.eat_keyword(Keyword::In) {
            return self.parse_in(ctx, column, negated);
        }

        if ctx.eat_keyword(Keyword::Between) {
            let lower = self.parse_column(ctx)?;
            ctx.expect_keyword(Keyword::And)?;
            let upper = self.parse_column(ctx)?;
            return Ok(self.add(BetweenCondition {
                column: Some(column),
                negated,
                lower: Some(lower),
                upper: Some(upper),
            }));
        }

        if ctx.eat_keyword(Keyword::Like) {
            let right = self.parse_column(ctx)?;
            let operator = if negated {
                ComparisonOperator::NotLike
            } else {
                ComparisonOperator::Like
            };
            return Ok(self.add(ComparisonCondition {
                left: Some(column),
                operator,
                right: Some(right),
            }));
        }

        if ctx.eat_keyword(Keyword::Is) {
            let negated = ctx.eat_keyword(Keyword::Not);
            ctx.expect_keyword(Keyword::Null)?;
            return Ok(self.add(IsNullCondition {
                column: Some(column),
                negated,
            }));
        }

        let Some(operator) = ctx.tokens.peek(0).and_then(|t| comparison_operator(&t.kind)) else {
            return Err(ctx.error_here_as(ErrorKind::NotACondition, "a comparison"));
        };
        ctx.tokens.advance(1);

        let quantifier = if ctx.eat_keyword(Keyword::Any) || ctx.eat_keyword(Keyword::Some) {
            Some(Quantifier::Any)
        } else if ctx.eat_keyword(Keyword::All) {
            Some(Quantifier::All)
        } else {
            None
        };

        if let Some(quantifier) = quantifier {
            let select = self.parse_bracketed_select(ctx, quantifier.as_str())?;
            let right = self.add(SubselectColumn {
                select: Some(select),
            });
            return Ok(self.add(SetComparisonCondition {
                left: Some(column),
                operator,
                quantifier,
                right: Some(right),
            }));
        }

        let right = self.parse_column(ctx)?;
        Ok(self.add(ComparisonCondition {
            left: Some(column),
            operator,
            right: Some(right),
        }))
    }

    fn parse_in(
        &mut self,
        ctx: &mut ParseContext<'_>,
        column: NodeId,
        negated: bool,
    ) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        if starts_subselect(&inner) {
            let select = self.parse_select_statement(&mut inner)?;
            inner.expect_end()?;
            return Ok(self.add(InSelectCondition {
                column: Some(column),
                negated,
                select: Some(select),
            }));
        }

        let values = parse_segments(self, &mut inner, Self::parse_column)?;
        if values.is_empty() {
            return Err(ctx.error_at(open, ErrorKind::Syntax, "IN requires at least one value"));
        }
        Ok(self.add(InListCondition {
            column: Some(column),
            negated,
            values,
        }))
    }

    /// `( SELECT ... )` after `EXISTS`, `ANY` or `ALL`.
    fn parse_bracketed_select(
        &mut self,
        ctx: &mut ParseContext<'_>,
        label: &str,
    ) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        if !starts_subselect(&inner) {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("{label} requires a subselect"),
            ));
        }
        let select = self.parse_select_statement(&mut inner)?;
        inner.expect_end()?;
        Ok(select)
    }
}
