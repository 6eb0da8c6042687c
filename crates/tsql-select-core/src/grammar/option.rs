//! `OPTION (...)` query hints.

use super::Grammar;
use crate::ast::OptionHints;
use crate::lexer::Keyword;
use crate::parser::{ErrorKind, ParseContext, ParseError};
use crate::tree::NodeId;

impl Grammar {
    /// Parses `OPTION (hint, ...)`. Hints are kept as verbatim text.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the hint list is missing or empty.
    pub fn parse_option_hints(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Option)?;
        let (open, mut inner) = ctx.take_bracketed()?;

        let mut hints = Vec::new();
        while inner.tokens.has_more() {
            let hint = inner.tokens.parse_text_until_comma();
            if hint.is_empty() {
                return Err(ctx.error_at(open, ErrorKind::Syntax, "empty query hint"));
            }
            hints.push(hint);
        }
        if hints.is_empty() {
            return Err(ctx.error_at(open, ErrorKind::Syntax, "OPTION requires at least one hint"));
        }

        Ok(self.add(OptionHints { hints }))
    }
}
