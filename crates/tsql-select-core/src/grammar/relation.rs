//! `FROM` relations and join chains.

use super::{identifier_of, parse_alias, starts_subselect, Grammar};
use crate::ast::{
    BracketRelation, Identifier, Join, JoinChainRelation, JoinType, SubselectRelation,
    TableRelation,
};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

/// Consumes join keywords, if any.
fn parse_join_type(ctx: &mut ParseContext<'_>) -> Result<Option<JoinType>, ParseError> {
    let Some(token) = ctx.tokens.peek(0) else {
        return Ok(None);
    };
    let TokenKind::Keyword(keyword) = token.kind else {
        return Ok(None);
    };

    let join_type = match keyword {
        Keyword::Join => {
            ctx.tokens.advance(1);
            return Ok(Some(JoinType::Inner));
        }
        Keyword::Inner => JoinType::Inner,
        Keyword::Left => JoinType::Left,
        Keyword::Right => JoinType::Right,
        Keyword::Full => JoinType::Full,
        Keyword::Cross => {
            ctx.tokens.advance(1);
            if ctx.eat_keyword(Keyword::Apply) {
                return Ok(Some(JoinType::CrossApply));
            }
            ctx.expect_keyword(Keyword::Join)?;
            return Ok(Some(JoinType::Cross));
        }
        Keyword::Outer if ctx.check_keyword_at(1, Keyword::Apply) => {
            ctx.tokens.advance(2);
            return Ok(Some(JoinType::OuterApply));
        }
        _ => return Ok(None),
    };

    ctx.tokens.advance(1);
    if join_type != JoinType::Inner {
        ctx.eat_keyword(Keyword::Outer);
    }
    ctx.expect_keyword(Keyword::Join)?;
    Ok(Some(join_type))
}

impl Grammar {
    /// Parses one `FROM` entry: a relation followed by any number of joins.
    ///
    /// # Errors
    ///
    /// Returns a syntax error on a malformed relation or join.
    pub fn parse_relation(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let left = self.parse_primary_relation(ctx)?;

        let mut joins = Vec::new();
        while let Some(join_type) = parse_join_type(ctx)? {
            let relation = self.parse_primary_relation(ctx)?;
            let on = if join_type.requires_on() {
                ctx.expect_keyword(Keyword::On)?;
                Some(self.parse_condition(ctx)?)
            } else {
                None
            };
            joins.push(Some(self.add(Join {
                join_type,
                relation: Some(relation),
                on,
            })));
        }

        if joins.is_empty() {
            return Ok(left);
        }
        Ok(self.add(JoinChainRelation {
            left: Some(left),
            joins,
        }))
    }

    /// A table name, a bracketed relation, or an aliased subselect.
    fn parse_primary_relation(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        if ctx.check(&TokenKind::LeftParen) {
            let (open, mut inner) = ctx.take_bracketed()?;
            if !inner.tokens.has_more() {
                return Err(ctx.error_at(open, ErrorKind::Syntax, "empty brackets"));
            }

            if starts_subselect(&inner) {
                let select = self.parse_select_statement(&mut inner)?;
                inner.expect_end()?;
                let Some(alias) = parse_alias(ctx, false)? else {
                    return Err(ctx.error_here("an alias for the subselect"));
                };
                return Ok(self.add(SubselectRelation {
                    select: Some(select),
                    alias,
                }));
            }

            let relation = self.parse_relation(&mut inner)?;
            inner.expect_end()?;
            return Ok(self.add(BracketRelation {
                inner: Some(relation),
            }));
        }

        let Some(first) = ctx.tokens.peek(0) else {
            return Err(ctx.error_here("a table name"));
        };
        let Some(name) = identifier_of(first) else {
            return Err(ctx.error_here("a table name"));
        };
        ctx.tokens.advance(1);

        let mut name = vec![name];
        while ctx.eat(&TokenKind::Dot) {
            let Some(part) = ctx.tokens.peek(0).and_then(identifier_of) else {
                return Err(ctx.error_here("a name after '.'"));
            };
            ctx.tokens.advance(1);
            name.push(part);
        }
        if name.len() > 3 {
            return Err(ctx.error_at(
                first,
                ErrorKind::Syntax,
                format!(
                    "table name '{}' has more than three parts",
                    Identifier::join(&name)
                ),
            ));
        }

        let alias = parse_alias(ctx, false)?;
        Ok(self.add(TableRelation { name, alias }))
    }
}
