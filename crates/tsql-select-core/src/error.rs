//! Crate-level error type.

use thiserror::Error;

use crate::parser::ParseError;

/// Errors returned by the parse entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input contains keywords the policy refuses.
    #[error("denied keywords: {}", .0.join(", "))]
    DeniedKeywords(Vec<String>),

    /// Lexing or grammar failure.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for parse entry points.
pub type Result<T> = std::result::Result<T, Error>;
