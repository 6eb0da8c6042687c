//! Token types for the T-SQL lexer.

use super::Span;

/// How a keyword may be used outside its grammar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Usage {
    /// Never an identifier.
    Reserved,
    /// Usable as a bare identifier (`SELECT rows FROM t`).
    Unreserved,
    /// Rejected by the keyword policy before parsing starts.
    Denied,
}

macro_rules! keywords {
    ($($variant:ident => $text:literal, $usage:ident;)*) => {
        /// T-SQL keywords recognised by the lexer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the keyword as an upper-case string.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }

            const fn usage(self) -> Usage {
                match self {
                    $(Self::$variant => Usage::$usage,)*
                }
            }
        }
    };
}

keywords! {
    All => "ALL", Reserved;
    And => "AND", Reserved;
    Any => "ANY", Reserved;
    Apply => "APPLY", Unreserved;
    As => "AS", Reserved;
    Asc => "ASC", Reserved;
    Between => "BETWEEN", Reserved;
    By => "BY", Reserved;
    Case => "CASE", Reserved;
    Collate => "COLLATE", Reserved;
    Cross => "CROSS", Reserved;
    Cube => "CUBE", Unreserved;
    Current => "CURRENT", Reserved;
    Desc => "DESC", Reserved;
    Distinct => "DISTINCT", Reserved;
    Else => "ELSE", Reserved;
    End => "END", Reserved;
    Except => "EXCEPT", Reserved;
    Exists => "EXISTS", Reserved;
    Fetch => "FETCH", Reserved;
    First => "FIRST", Unreserved;
    Following => "FOLLOWING", Unreserved;
    For => "FOR", Reserved;
    From => "FROM", Reserved;
    Full => "FULL", Reserved;
    Group => "GROUP", Reserved;
    Grouping => "GROUPING", Unreserved;
    Having => "HAVING", Reserved;
    In => "IN", Reserved;
    Inner => "INNER", Reserved;
    Intersect => "INTERSECT", Reserved;
    Is => "IS", Reserved;
    Join => "JOIN", Reserved;
    Left => "LEFT", Reserved;
    Like => "LIKE", Reserved;
    Next => "NEXT", Unreserved;
    Not => "NOT", Reserved;
    Null => "NULL", Reserved;
    Offset => "OFFSET", Unreserved;
    On => "ON", Reserved;
    Only => "ONLY", Unreserved;
    Option => "OPTION", Reserved;
    Or => "OR", Reserved;
    Order => "ORDER", Reserved;
    Outer => "OUTER", Reserved;
    Over => "OVER", Reserved;
    Partition => "PARTITION", Unreserved;
    Percent => "PERCENT", Reserved;
    Pivot => "PIVOT", Reserved;
    Preceding => "PRECEDING", Unreserved;
    Range => "RANGE", Unreserved;
    Replicate => "REPLICATE", Unreserved;
    Abs => "ABS", Unreserved;
    Right => "RIGHT", Reserved;
    Rollup => "ROLLUP", Unreserved;
    Row => "ROW", Unreserved;
    Rows => "ROWS", Unreserved;
    Select => "SELECT", Reserved;
    Sets => "SETS", Unreserved;
    Some => "SOME", Reserved;
    Then => "THEN", Reserved;
    Ties => "TIES", Unreserved;
    Top => "TOP", Reserved;
    Unbounded => "UNBOUNDED", Unreserved;
    Union => "UNION", Reserved;
    Using => "USING", Unreserved;
    When => "WHEN", Reserved;
    Where => "WHERE", Reserved;
    With => "WITH", Reserved;

    Alter => "ALTER", Denied;
    Backup => "BACKUP", Denied;
    Begin => "BEGIN", Denied;
    Commit => "COMMIT", Denied;
    Create => "CREATE", Denied;
    Declare => "DECLARE", Denied;
    Delete => "DELETE", Denied;
    Deny => "DENY", Denied;
    Drop => "DROP", Denied;
    Exec => "EXEC", Denied;
    Execute => "EXECUTE", Denied;
    Grant => "GRANT", Denied;
    Insert => "INSERT", Denied;
    Into => "INTO", Denied;
    Merge => "MERGE", Denied;
    Restore => "RESTORE", Denied;
    Revoke => "REVOKE", Denied;
    Rollback => "ROLLBACK", Denied;
    Set => "SET", Denied;
    Truncate => "TRUNCATE", Denied;
    Update => "UPDATE", Denied;
    Use => "USE", Denied;
}

impl Keyword {
    /// Returns true if the keyword can never stand in for an identifier.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        !matches!(self.usage(), Usage::Unreserved)
    }

    /// Returns true if the keyword policy rejects statements containing it.
    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(self.usage(), Usage::Denied)
    }

    /// Keywords that double as scalar function names when followed by `(`.
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Replicate | Self::Abs)
    }
}

/// Token classification exposed to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer(i64),
    /// Source text of a decimal, exponent or out-of-range integer literal.
    Decimal(String),
    String(String),
    /// `N'...'`
    NationalString(String),

    // Names
    Identifier(String),
    /// `[name]` or `"name"`.
    DelimitedIdentifier(String),
    /// `@name` or `@@name`, text includes the sigil.
    Variable(String),
    Keyword(Keyword),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Concat,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Dot,

    // Trivia
    Whitespace,
    Comment,

    /// Lexing error with message.
    Error(String),
}

/// Coarse token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Operator,
    Literal,
    Whitespace,
    Character,
}

/// A token with its source text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The raw source text of the token.
    pub text: String,
    /// The location in source.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Returns the category of this token.
    #[must_use]
    pub const fn category(&self) -> TokenCategory {
        match &self.kind {
            TokenKind::Keyword(_) => TokenCategory::Keyword,
            TokenKind::Identifier(_)
            | TokenKind::DelimitedIdentifier(_)
            | TokenKind::Variable(_) => TokenCategory::Identifier,
            TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::String(_)
            | TokenKind::NationalString(_) => TokenCategory::Literal,
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Concat
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => TokenCategory::Operator,
            TokenKind::Whitespace | TokenKind::Comment => TokenCategory::Whitespace,
            TokenKind::LeftParen
            | TokenKind::RightParen
            | TokenKind::LeftBrace
            | TokenKind::RightBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Dot
            | TokenKind::Error(_) => TokenCategory::Character,
        }
    }

    /// Returns true if this is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str_is_case_insensitive() {
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("customers"), None);
    }

    #[test]
    fn test_keyword_round_trips_through_text() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(*keyword));
        }
    }

    #[test]
    fn test_keyword_usage() {
        assert!(Keyword::Select.is_reserved());
        assert!(!Keyword::Rows.is_reserved());
        assert!(Keyword::Delete.is_denied());
        assert!(Keyword::Delete.is_reserved());
        assert!(!Keyword::Select.is_denied());
        assert!(Keyword::Left.is_function());
        assert!(!Keyword::Join.is_function());
    }

    #[test]
    fn test_token_category() {
        let span = Span::new(0, 1);
        assert_eq!(
            Token::new(TokenKind::Plus, "+", span).category(),
            TokenCategory::Operator
        );
        assert_eq!(
            Token::new(TokenKind::Comment, "--", span).category(),
            TokenCategory::Whitespace
        );
        assert_eq!(
            Token::new(TokenKind::Variable("@a".into()), "@a", span).category(),
            TokenCategory::Identifier
        );
    }
}
