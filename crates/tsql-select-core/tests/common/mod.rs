#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use tsql_select_core::{
    parse_select_statement, Ast, Column, Condition, Error, Node, NodeId, ParseError, Relation,
    Select, SelectStatement,
};

/// Routes engine logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn parse(sql: &str) -> Ast {
    init_tracing();
    parse_select_statement(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    init_tracing();
    match parse_select_statement(sql) {
        Err(Error::Parse(error)) => error,
        Err(other) => panic!("Expected a parse error for: {sql}, got {other:?}"),
        Ok(_) => panic!("Expected parse error for: {sql}"),
    }
}

/// The first node in pre-order matching `predicate`.
pub fn find(ast: &Ast, predicate: impl Fn(&Node) -> bool) -> NodeId {
    ast.descendants(ast.root())
        .find(|&id| predicate(&ast[id]))
        .unwrap_or_else(|| panic!("no matching node in {ast:#?}"))
}

/// Every node in pre-order matching `predicate`.
pub fn find_all(ast: &Ast, predicate: impl Fn(&Node) -> bool) -> Vec<NodeId> {
    ast.descendants(ast.root())
        .filter(|&id| predicate(&ast[id]))
        .collect()
}

pub fn statement(ast: &Ast) -> &SelectStatement {
    let id = ast.root_child().expect("root child");
    ast[id].as_statement().expect("statement")
}

/// The `index`-th select block of the top-level statement.
pub fn select(ast: &Ast, index: usize) -> &Select {
    let id = statement(ast).selects[index].expect("select block");
    ast[id].as_select().expect("select")
}

pub fn column(ast: &Ast, id: Option<NodeId>) -> &Column {
    ast[id.expect("column id")].as_column().expect("column")
}

pub fn condition(ast: &Ast, id: Option<NodeId>) -> &Condition {
    ast[id.expect("condition id")].as_condition().expect("condition")
}

pub fn relation(ast: &Ast, id: Option<NodeId>) -> &Relation {
    ast[id.expect("relation id")].as_relation().expect("relation")
}

/// The WHERE condition of the first select block.
pub fn where_condition(ast: &Ast) -> &Condition {
    condition(ast, select(ast, 0).where_clause)
}

/// The first select-list column of the first select block.
pub fn first_column(ast: &Ast) -> &Column {
    column(ast, select(ast, 0).columns[0])
}
