//! T-SQL Lexer/Tokenizer
//!
//! A hand-written lexer producing significant tokens and, separately, the
//! whitespace and comment tokens needed to map offsets to line and column.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenCategory, TokenKind};
pub use tokenizer::{Lexer, TokenStream};
