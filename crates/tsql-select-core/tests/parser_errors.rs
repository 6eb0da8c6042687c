//! Tests for parser error cases and error positions.

mod common;
use common::*;
use tsql_select_core::{parse_select_statement, Error, ErrorKind, ParseOptions, Parser};

#[test]
fn error_empty_input() {
    let error = parse_err("");
    assert_eq!(error.message, "expected SELECT, found end of input");
    assert!(!error.is_positioned());
}

#[test]
fn error_incomplete_select() {
    let error = parse_err("SELECT");
    assert_eq!(error.message, "expected a column, found end of input");
}

#[test]
fn error_missing_from_table() {
    let error = parse_err("SELECT * FROM");
    assert_eq!(error.message, "expected a table name, found end of input");
}

#[test]
fn error_unclosed_paren() {
    let error = parse_err("SELECT (1 + 2");
    assert_eq!(error.message, "unmatched bracket");
    assert_eq!(error.column, Some(7));
}

#[test]
fn error_leftover_tokens() {
    let error = parse_err("SELECT a FROM t t2 t3");
    assert_eq!(error.kind, ErrorKind::Incomplete);
    assert_eq!(error.token_text.as_deref(), Some("t3"));
    assert_eq!(
        error.to_string(),
        "parsing incomplete at line 0, column 19 near 't3'"
    );
}

#[test]
fn error_position_on_later_lines() {
    let error = parse_err("SELECT a,\n       b\nFROM t\nWHERE )");
    assert_eq!(error.line, Some(3));
    assert_eq!(error.column, Some(6));
    assert_eq!(error.token_text.as_deref(), Some(")"));
}

#[test]
fn error_position_after_comments() {
    let error = parse_err("-- leading comment\nSELECT /* inline\n comment */ x.y.z");
    assert_eq!(error.line, Some(2));
    assert_eq!(error.column, Some(12));
}

#[test]
fn lexical_errors_are_positioned() {
    let error = parse_err("SELECT a FROM t WHERE b = 'open");
    assert_eq!(error.kind, ErrorKind::Lexical);
    assert_eq!(error.message, "Unterminated string literal");
    assert_eq!(error.column, Some(26));

    let error = parse_err("SELECT a ? b");
    assert_eq!(error.kind, ErrorKind::Lexical);
}

#[test]
fn denied_keywords_are_listed_together() {
    let error = parse_select_statement("SELECT a INTO x FROM t; DELETE FROM t; exec sp_who")
        .expect_err("denied");
    assert_eq!(
        error,
        Error::DeniedKeywords(vec![
            String::from("DELETE"),
            String::from("EXEC"),
            String::from("INTO"),
        ])
    );
    assert_eq!(error.to_string(), "denied keywords: DELETE, EXEC, INTO");
}

#[test]
fn policy_runs_before_grammar() {
    // The statement is also malformed, but the policy answers first.
    let error = parse_select_statement("DROP TABLE t").expect_err("denied");
    assert_eq!(error, Error::DeniedKeywords(vec![String::from("DROP")]));
}

#[test]
fn delimited_denied_words_are_names() {
    let ast = parse("SELECT [delete], [update] FROM [drop]");
    assert_eq!(select(&ast, 0).columns.len(), 2);
}

#[test]
fn depth_limit() {
    let sql = format!("SELECT {}1{}", "(".repeat(10), ")".repeat(10));
    assert!(parse_select_statement(&sql).is_ok());

    let shallow = Parser::new().with_options(ParseOptions::new().max_depth(4));
    let Err(Error::Parse(error)) = shallow.parse_select_statement(&sql) else {
        panic!("Expected a depth error");
    };
    assert_eq!(error.kind, ErrorKind::DepthLimit);
    assert_eq!(error.message, "brackets nested deeper than 4 levels");
}

#[test]
fn deeply_nested_input_fails_without_overflowing() {
    let sql = format!("SELECT {}1{}", "(".repeat(5000), ")".repeat(5000));
    let error = parse_err(&sql);
    assert_eq!(error.kind, ErrorKind::DepthLimit);
}

#[test]
fn prefix_chains_share_the_depth_limit() {
    let sql = format!("SELECT a FROM t WHERE {}a = 1", "NOT ".repeat(5000));
    let error = parse_err(&sql);
    assert_eq!(error.kind, ErrorKind::DepthLimit);
    assert_eq!(error.message, "expression nested deeper than 128 levels");

    let sql = format!("SELECT {}a", "- ".repeat(200_000));
    assert_eq!(parse_err(&sql).kind, ErrorKind::DepthLimit);

    let sql = format!(
        "SELECT {}1{} FROM t",
        "CASE WHEN a = 1 THEN ".repeat(1000),
        " END".repeat(1000)
    );
    assert_eq!(parse_err(&sql).kind, ErrorKind::DepthLimit);

    assert!(parse_select_statement("SELECT - - a FROM t WHERE NOT NOT a = 1").is_ok());
}

#[test]
fn prefix_depth_counts_against_the_configured_limit() {
    let shallow = Parser::new().with_options(ParseOptions::new().max_depth(4));
    assert!(shallow
        .parse_select_statement("SELECT a FROM t WHERE NOT NOT NOT a = 1")
        .is_ok());

    let Err(Error::Parse(error)) =
        shallow.parse_select_statement("SELECT a FROM t WHERE NOT NOT NOT NOT a = 1")
    else {
        panic!("Expected a depth error");
    };
    assert_eq!(error.kind, ErrorKind::DepthLimit);
    assert_eq!(error.message, "expression nested deeper than 4 levels");
    assert_eq!(error.token_text.as_deref(), Some("a"));

    // Brackets and prefixes draw on the same budget.
    let Err(Error::Parse(error)) =
        shallow.parse_select_statement("SELECT ((- - a)) FROM t")
    else {
        panic!("Expected a depth error");
    };
    assert_eq!(error.kind, ErrorKind::DepthLimit);
}
