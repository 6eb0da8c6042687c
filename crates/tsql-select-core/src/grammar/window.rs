//! `OVER (...)` window specifications.
//!
//! Frame bounds are signed offsets from the current row: `None` is
//! unbounded, `0` the current row, negative values precede it and positive
//! values follow it.

use super::{parse_comma_list, Grammar};
use crate::ast::{FrameUnit, Window};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

/// One frame bound: `UNBOUNDED {PRECEDING|FOLLOWING}`, `CURRENT ROW` or
/// `n {PRECEDING|FOLLOWING}`.
fn parse_bound(ctx: &mut ParseContext<'_>) -> Result<Option<i64>, ParseError> {
    if ctx.eat_keyword(Keyword::Unbounded) {
        if ctx.eat_keyword(Keyword::Preceding) || ctx.eat_keyword(Keyword::Following) {
            return Ok(None);
        }
        return Err(ctx.error_here("PRECEDING or FOLLOWING"));
    }
    if ctx.eat_keyword(Keyword::Current) {
        ctx.expect_keyword(Keyword::Row)?;
        return Ok(Some(0));
    }

    let Some(token) = ctx.tokens.peek(0) else {
        return Err(ctx.error_here("a frame bound"));
    };
    let TokenKind::Integer(offset) = token.kind else {
        return Err(ctx.error_here("a frame bound"));
    };
    if offset < 0 {
        return Err(ctx.error_at(token, ErrorKind::Syntax, "frame offset must not be negative"));
    }
    ctx.tokens.advance(1);

    if ctx.eat_keyword(Keyword::Preceding) {
        Ok(Some(-offset))
    } else if ctx.eat_keyword(Keyword::Following) {
        Ok(Some(offset))
    } else {
        Err(ctx.error_here("PRECEDING or FOLLOWING"))
    }
}

/// A single bound fills one side of the frame and pins the other to the
/// current row: positive values become the upper bound, everything else the
/// lower bound.
const fn normalize_single_bound(bound: Option<i64>) -> (Option<i64>, Option<i64>) {
    match bound {
        Some(value) if value > 0 => (Some(0), Some(value)),
        _ => (bound, Some(0)),
    }
}

impl Grammar {
    /// Parses `OVER ([PARTITION BY ...] [ORDER BY ...] [ROWS|RANGE ...])`.
    ///
    /// # Errors
    ///
    /// Returns a syntax error on a malformed window.
    pub fn parse_over(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Over)?;
        let (_, mut inner) = ctx.take_bracketed()?;

        let partition_by = if inner.eat_keyword(Keyword::Partition) {
            inner.expect_keyword(Keyword::By)?;
            parse_comma_list(self, &mut inner, Self::parse_column)?
        } else {
            Vec::new()
        };

        let order_by = if inner.eat_keyword(Keyword::Order) {
            inner.expect_keyword(Keyword::By)?;
            parse_comma_list(self, &mut inner, Self::parse_order_item)?
        } else {
            Vec::new()
        };

        let frame = if inner.eat_keyword(Keyword::Rows) {
            Some(FrameUnit::Rows)
        } else if inner.eat_keyword(Keyword::Range) {
            Some(FrameUnit::Range)
        } else {
            None
        };

        let (lower, upper) = match frame {
            None => (None, None),
            Some(_) if inner.eat_keyword(Keyword::Between) => {
                let lower = parse_bound(&mut inner)?;
                inner.expect_keyword(Keyword::And)?;
                (lower, parse_bound(&mut inner)?)
            }
            Some(_) => normalize_single_bound(parse_bound(&mut inner)?),
        };
        inner.expect_end()?;

        Ok(self.add(Window {
            partition_by,
            order_by,
            frame,
            lower,
            upper,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bound_normalization() {
        assert_eq!(normalize_single_bound(Some(-99)), (Some(-99), Some(0)));
        assert_eq!(normalize_single_bound(Some(5)), (Some(0), Some(5)));
        assert_eq!(normalize_single_bound(Some(0)), (Some(0), Some(0)));
        assert_eq!(normalize_single_bound(None), (None, Some(0)));
    }
}
