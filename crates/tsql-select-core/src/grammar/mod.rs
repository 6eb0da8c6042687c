//! The grammar engine.
//!
//! Each clause lives in its own `impl Grammar` block. Rules take the current
//! [`ParseContext`], consume what they recognise, and return the id of the
//! node they added to the arena.

mod column;
mod condition;
mod group_by;
mod option;
mod order_by;
mod pivot;
mod relation;
mod statement;
mod top;
mod window;

use tracing::trace;

use crate::ast::{Identifier, Node};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError, TokenList};
use crate::tree::{Ast, NodeId};

/// Replacement rule tried before the built-in column or condition grammar.
///
/// Return `Ok(None)` without consuming tokens to fall through to the
/// built-in rule.
pub type Hook = fn(&mut Grammar, &mut ParseContext<'_>) -> Result<Option<NodeId>, ParseError>;

/// Optional grammar overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hooks {
    /// Tried before every primary column.
    pub column: Option<Hook>,
    /// Tried before every condition term.
    pub condition: Option<Hook>,
}

/// Parser state for one input: the arena under construction plus hooks.
#[derive(Debug)]
pub struct Grammar {
    ast: Ast,
    hooks: Hooks,
    nesting: usize,
}

impl Grammar {
    /// Creates a grammar with an empty tree.
    #[must_use]
    pub fn new(hooks: Hooks) -> Self {
        Self {
            ast: Ast::new(),
            hooks,
            nesting: 0,
        }
    }

    /// Finishes parsing and returns the tree.
    #[must_use]
    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Adds a freshly built node to the tree, linking its children to it.
    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        self.ast.attach(node)
    }

    /// Runs `rule` one recursion level deeper.
    ///
    /// Rules that recurse without opening a bracket (`NOT`, unary minus,
    /// `CASE`) go through here so that nesting is bounded by the same
    /// maximum as brackets.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DepthLimit`] once bracket depth plus recursion
    /// reaches the maximum, or any error of `rule`.
    pub fn nested<'c, T>(
        &mut self,
        ctx: &mut ParseContext<'c>,
        rule: impl FnOnce(&mut Self, &mut ParseContext<'c>) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        ctx.check_nesting(self.nesting + 1)?;
        self.nesting += 1;
        let result = rule(self, ctx);
        self.nesting -= 1;
        result
    }

    /// Runs `rule` speculatively.
    ///
    /// If it fails with [`ErrorKind::NotACondition`] the cursor and the arena
    /// are restored and `Ok(None)` is returned. Any other error propagates.
    ///
    /// # Errors
    ///
    /// Every error of `rule` except [`ErrorKind::NotACondition`].
    pub fn attempt<'c, T>(
        &mut self,
        ctx: &mut ParseContext<'c>,
        rule: impl FnOnce(&mut Self, &mut ParseContext<'c>) -> Result<T, ParseError>,
    ) -> Result<Option<T>, ParseError> {
        let position = ctx.tokens.save_position();
        let checkpoint = self.ast.checkpoint();
        match rule(self, ctx) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind == ErrorKind::NotACondition => {
                trace!(reason = %error.message, "abandoned speculative parse");
                ctx.tokens.restore_position(position);
                self.ast.rollback(checkpoint);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

/// The identifier a token can stand for: plain and delimited names, and
/// unreserved keywords.
pub(crate) fn identifier_of(token: &Token) -> Option<Identifier> {
    match &token.kind {
        TokenKind::Identifier(name) => Some(Identifier::new(name.as_str())),
        TokenKind::DelimitedIdentifier(name) => Some(Identifier::delimited(name.as_str())),
        TokenKind::Keyword(keyword) if !keyword.is_reserved() => {
            Some(Identifier::new(token.text.as_str()))
        }
        _ => None,
    }
}

/// Returns true if the context starts a nested statement.
pub(crate) fn starts_subselect(ctx: &ParseContext<'_>) -> bool {
    ctx.check_keyword(Keyword::Select) || ctx.check_keyword(Keyword::With)
}

/// Consumes an identifier.
pub(crate) fn expect_identifier(
    ctx: &mut ParseContext<'_>,
    expected: &str,
) -> Result<Identifier, ParseError> {
    match ctx.tokens.peek(0).and_then(identifier_of) {
        Some(identifier) => {
            ctx.tokens.advance(1);
            Ok(identifier)
        }
        None => Err(ctx.error_here(expected)),
    }
}

/// Parses an optional alias: `AS name`, `AS 'name'` (when `allow_string`),
/// or a bare plain or delimited identifier.
pub(crate) fn parse_alias(
    ctx: &mut ParseContext<'_>,
    allow_string: bool,
) -> Result<Option<Identifier>, ParseError> {
    if ctx.eat_keyword(Keyword::As) {
        if allow_string {
            if let Some(Token {
                kind: TokenKind::String(name) | TokenKind::NationalString(name),
                ..
            }) = ctx.tokens.peek(0)
            {
                ctx.tokens.advance(1);
                return Ok(Some(Identifier::delimited(name.as_str())));
            }
        }
        return expect_identifier(ctx, "an alias after AS").map(Some);
    }

    match ctx.tokens.peek(0) {
        Some(token)
            if matches!(
                token.kind,
                TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier(_)
            ) =>
        {
            ctx.tokens.advance(1);
            Ok(identifier_of(token))
        }
        _ => Ok(None),
    }
}

/// Parses a comma-separated list of items with `rule`.
pub(crate) fn parse_comma_list(
    grammar: &mut Grammar,
    ctx: &mut ParseContext<'_>,
    rule: fn(&mut Grammar, &mut ParseContext<'_>) -> Result<NodeId, ParseError>,
) -> Result<Vec<Option<NodeId>>, ParseError> {
    let mut items = vec![Some(rule(grammar, ctx)?)];
    while ctx.eat(&TokenKind::Comma) {
        items.push(Some(rule(grammar, ctx)?));
    }
    Ok(items)
}

/// Parses a detached token range with `rule`, which must consume all of it.
pub(crate) fn parse_whole<'a>(
    grammar: &mut Grammar,
    ctx: &ParseContext<'a>,
    tokens: TokenList<'a>,
    rule: fn(&mut Grammar, &mut ParseContext<'_>) -> Result<NodeId, ParseError>,
) -> Result<NodeId, ParseError> {
    let mut segment = ctx.segment(tokens);
    let id = rule(grammar, &mut segment)?;
    segment.expect_end()?;
    Ok(id)
}

/// Parses every comma segment of a bracketed context with `rule`, requiring
/// each segment to be fully consumed.
pub(crate) fn parse_segments(
    grammar: &mut Grammar,
    ctx: &mut ParseContext<'_>,
    rule: fn(&mut Grammar, &mut ParseContext<'_>) -> Result<NodeId, ParseError>,
) -> Result<Vec<Option<NodeId>>, ParseError> {
    let mut items = Vec::new();
    for segment in ctx.tokens.split_commas() {
        let mut segment = ctx.segment(segment);
        items.push(Some(rule(grammar, &mut segment)?));
        segment.expect_end()?;
    }
    Ok(items)
}
