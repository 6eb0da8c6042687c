//! # tsql-select-core
//!
//! A recursive descent parser for T-SQL `SELECT` statements producing an
//! arena-allocated, navigable and editable syntax tree.
//!
//! This crate provides:
//! - A tokenizer with delimited identifiers, variables and national strings
//! - A keyword policy refusing DML, DDL and procedural statements up front
//! - A clause-per-module grammar with column and condition hooks
//! - A tree engine (children, clone, replace) driven by per-node field
//!   declarations from `#[derive(Node)]`
//!
//! ## Parsing
//!
//! ```rust
//! use tsql_select_core::{parse_select_statement, Column, Node};
//!
//! let ast = parse_select_statement("SELECT 1 + 2 % 3 * 4").unwrap();
//! let arithmetic = ast
//!     .descendants(ast.root())
//!     .find(|&id| matches!(ast[id], Node::Column(Column::Arithmetic(_))))
//!     .unwrap();
//! assert_eq!(ast.children(arithmetic).count(), 4);
//! ```
//!
//! ## Editing
//!
//! Rewrites go through [`Ast::replace_child`], which checks the declared node
//! class of the field being written:
//!
//! ```rust
//! use tsql_select_core::{parse_select_statement, Column, Node, NullColumn, TreeError};
//!
//! let mut ast = parse_select_statement("SELECT a FROM t WHERE a = 1").unwrap();
//! let select = ast
//!     .descendants(ast.root())
//!     .find(|&id| matches!(ast[id], Node::Select(_)))
//!     .unwrap();
//! let Node::Select(block) = &ast[select] else { unreachable!() };
//! let (column, relation) = (block.columns[0].unwrap(), block.from[0].unwrap());
//!
//! let null = ast.add(Column::Null(NullColumn)).unwrap();
//! assert!(ast.replace_child_and_reparent(select, column, null).is_ok());
//! assert_eq!(ast.parent(null), Some(select));
//!
//! let other = ast.add(Column::Null(NullColumn)).unwrap();
//! assert!(matches!(
//!     ast.replace_child(select, relation, other),
//!     Err(TreeError::TypeMismatch { .. })
//! ));
//! ```

extern crate self as tsql_select_core;

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod policy;
pub mod tree;

pub use ast::*;
pub use error::{Error, Result};
pub use grammar::{Grammar, Hook, Hooks};
pub use lexer::{Keyword, Lexer, Token, TokenKind, TokenStream};
pub use parser::{
    parse_column, parse_condition, parse_select, parse_select_statement, ErrorKind,
    ParseContext, ParseError, ParseOptions, Parser,
};
pub use tree::{Ast, NodeId, TreeError};
