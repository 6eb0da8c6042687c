//! Parser infrastructure and entry points.
//!
//! The grammar rules themselves live in [`crate::grammar`]; this module
//! provides the token cursor, the error machinery, and [`Parser`].

mod context;
mod error;
mod options;
mod parser;
mod token_list;

pub use context::ParseContext;
pub use error::{ErrorGenerator, ErrorKind, ParseError};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use token_list::TokenList;

use crate::error::Result;
use crate::tree::Ast;

/// Parses a complete statement with default options.
///
/// # Errors
///
/// See [`Parser::parse_select_statement`].
pub fn parse_select_statement(sql: &str) -> Result<Ast> {
    Parser::new().parse_select_statement(sql)
}

/// Parses a single column with default options.
///
/// # Errors
///
/// See [`Parser::parse_select_statement`].
pub fn parse_column(sql: &str) -> Result<Ast> {
    Parser::new().parse_column(sql)
}

/// Parses a single condition with default options.
///
/// # Errors
///
/// See [`Parser::parse_select_statement`].
pub fn parse_condition(sql: &str) -> Result<Ast> {
    Parser::new().parse_condition(sql)
}

/// Parses a single select block with default options.
///
/// # Errors
///
/// See [`Parser::parse_select_statement`].
pub fn parse_select(sql: &str) -> Result<Ast> {
    Parser::new().parse_select(sql)
}
