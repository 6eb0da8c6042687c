//! Keyword deny-list.
//!
//! Statements that mention data modification, DDL, or procedural keywords
//! are refused before any grammar rule runs.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::Error;
use crate::lexer::{Keyword, Token, TokenKind};

/// Keywords refused by [`check`].
#[must_use]
pub fn denied_keywords() -> Vec<Keyword> {
    Keyword::ALL
        .iter()
        .copied()
        .filter(|keyword| keyword.is_denied())
        .collect()
}

/// Checks the whole token stream against the deny-list.
///
/// Only keyword tokens count, so a delimited `[DELETE]` column is accepted.
/// `USE` inside an `OPTION (...)` hint list is a hint (`USE HINT`, `USE PLAN`)
/// and is accepted too.
///
/// # Errors
///
/// Returns [`Error::DeniedKeywords`] listing every offending keyword once,
/// sorted.
pub fn check(tokens: &[Token]) -> Result<(), Error> {
    let mut denied = BTreeSet::new();
    // Bracket depth inside the current OPTION hint list.
    let mut hints: Option<usize> = None;

    for (index, token) in tokens.iter().enumerate() {
        match (&token.kind, hints) {
            (TokenKind::Keyword(Keyword::Option), None)
                if tokens
                    .get(index + 1)
                    .is_some_and(|next| next.kind == TokenKind::LeftParen) =>
            {
                hints = Some(0);
            }
            (TokenKind::LeftParen, Some(depth)) => hints = Some(depth + 1),
            (TokenKind::RightParen, Some(depth)) => {
                hints = depth.checked_sub(1).filter(|&depth| depth > 0);
            }
            (TokenKind::Keyword(Keyword::Use), Some(_)) => {}
            (TokenKind::Keyword(keyword), _) if keyword.is_denied() => {
                denied.insert(keyword.as_str());
            }
            _ => {}
        }
    }

    if denied.is_empty() {
        return Ok(());
    }
    let denied: Vec<String> = denied.into_iter().map(String::from).collect();
    debug!(keywords = ?denied, "keyword policy rejected input");
    Err(Error::DeniedKeywords(denied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn check_sql(sql: &str) -> Result<(), Error> {
        check(&Lexer::new(sql).tokenize().tokens)
    }

    #[test]
    fn test_select_is_allowed() {
        assert!(check_sql("SELECT a FROM t WHERE b = 1").is_ok());
    }

    #[test]
    fn test_denied_keywords_are_sorted_and_unique() {
        let error = check_sql("UPDATE t SET a = 1; DELETE FROM t; DROP TABLE t; delete from u")
            .expect_err("denied");
        assert_eq!(
            error,
            Error::DeniedKeywords(vec![
                String::from("DELETE"),
                String::from("DROP"),
                String::from("SET"),
                String::from("UPDATE"),
            ])
        );
    }

    #[test]
    fn test_delimited_identifier_is_not_a_keyword() {
        assert!(check_sql("SELECT [delete] FROM [update]").is_ok());
    }

    #[test]
    fn test_use_is_a_hint_inside_option() {
        let sql = "SELECT a FROM t OPTION (USE HINT('DISABLE_OPTIMIZER_ROWGOAL'))";
        assert!(check_sql(sql).is_ok());
        assert!(check_sql("SELECT a FROM t OPTION (RECOMPILE, USE PLAN N'<xml/>')").is_ok());
    }

    #[test]
    fn test_use_outside_option_is_denied() {
        assert_eq!(
            check_sql("USE db; SELECT a FROM t OPTION (USE HINT('X'))"),
            Err(Error::DeniedKeywords(vec![String::from("USE")]))
        );
        assert_eq!(
            check_sql("SELECT a FROM t OPTION (MAXDOP 1) USE db"),
            Err(Error::DeniedKeywords(vec![String::from("USE")]))
        );
        // Other denied keywords stay denied inside the hint list.
        assert_eq!(
            check_sql("SELECT a FROM t OPTION (DROP x)"),
            Err(Error::DeniedKeywords(vec![String::from("DROP")]))
        );
    }

    #[test]
    fn test_deny_list_contents() {
        let denied = denied_keywords();
        assert_eq!(denied.len(), 22);
        assert!(denied.contains(&Keyword::Exec));
        assert!(!denied.contains(&Keyword::Select));
    }
}
