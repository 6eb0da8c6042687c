//! Parse entry points.

use tracing::debug;

use super::context::ParseContext;
use super::error::{ErrorGenerator, ErrorKind, ParseError};
use super::options::ParseOptions;
use super::token_list::TokenList;
use crate::error::Result;
use crate::grammar::{Grammar, Hook, Hooks};
use crate::lexer::{Lexer, TokenKind};
use crate::policy;
use crate::tree::{Ast, NodeId};

type Rule = fn(&mut Grammar, &mut ParseContext<'_>) -> std::result::Result<NodeId, ParseError>;

/// T-SQL `SELECT` parser.
///
/// A `Parser` is configuration only; every call lexes and parses its input
/// from scratch and returns an independent [`Ast`].
///
/// ```
/// use tsql_select_core::{Node, Parser};
///
/// let ast = Parser::new()
///     .parse_select_statement("SELECT a, b FROM t WHERE a > 1")
///     .unwrap();
/// let statement = ast.root_child().unwrap();
/// assert!(matches!(ast[statement], Node::Statement(_)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
    hooks: Hooks,
}

impl Parser {
    /// Creates a parser with default options and no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the parse options.
    #[must_use]
    pub const fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs a hook tried before every primary column.
    #[must_use]
    pub const fn with_column_hook(mut self, hook: Hook) -> Self {
        self.hooks.column = Some(hook);
        self
    }

    /// Installs a hook tried before every condition term.
    #[must_use]
    pub const fn with_condition_hook(mut self, hook: Hook) -> Self {
        self.hooks.condition = Some(hook);
        self
    }

    /// The active options.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses a complete statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeniedKeywords`](crate::Error::DeniedKeywords) if the
    /// keyword policy rejects the input, or
    /// [`Error::Parse`](crate::Error::Parse) on any lexical, syntax or
    /// completeness failure.
    pub fn parse_select_statement(&self, sql: &str) -> Result<Ast> {
        self.run(sql, "statement", Grammar::parse_select_statement)
    }

    /// Parses a single column, alias included.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse_select_statement`].
    pub fn parse_column(&self, sql: &str) -> Result<Ast> {
        self.run(sql, "column", Grammar::parse_select_column)
    }

    /// Parses a single condition.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse_select_statement`].
    pub fn parse_condition(&self, sql: &str) -> Result<Ast> {
        self.run(sql, "condition", Grammar::parse_condition)
    }

    /// Parses a single select block.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse_select_statement`].
    pub fn parse_select(&self, sql: &str) -> Result<Ast> {
        self.run(sql, "select", Grammar::parse_select)
    }

    fn run(&self, sql: &str, entry: &'static str, rule: Rule) -> Result<Ast> {
        debug!(entry, bytes = sql.len(), "parsing");

        let stream = Lexer::new(sql).tokenize();
        let errors = ErrorGenerator::new(&stream.whitespace);
        if let Some(token) = stream.first_error() {
            let message = match &token.kind {
                TokenKind::Error(message) => message.clone(),
                _ => format!("unexpected character '{}'", token.text),
            };
            return Err(errors.at(token, ErrorKind::Lexical, message).into());
        }

        if self.options.enforce_keyword_policy {
            policy::check(&stream.tokens)?;
        }

        let mut ctx = ParseContext::new(
            TokenList::new(&stream.tokens),
            errors,
            self.options.max_depth,
        );
        let mut grammar = Grammar::new(self.hooks);
        let id = rule(&mut grammar, &mut ctx)?;

        ctx.eat(&TokenKind::Semicolon);
        if let Some(token) = ctx.tokens.peek(0) {
            return Err(ctx
                .error_at(token, ErrorKind::Incomplete, "parsing incomplete")
                .into());
        }

        let mut ast = grammar.into_ast();
        ast.set_root_child(id);
        debug!(
            entry,
            tokens = stream.tokens.len(),
            nodes = ast.node_count(),
            "parsed"
        );
        Ok(ast)
    }
}
