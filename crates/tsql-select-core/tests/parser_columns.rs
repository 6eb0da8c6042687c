//! Tests for the column grammar.

mod common;
use chrono::{NaiveDate, NaiveTime};
use common::*;
use tsql_select_core::{
    AggregateFunction, ArithmeticOperator, Ast, Column, Element, ErrorKind, Literal, NodeId,
};

fn columns(ast: &Ast) -> Vec<&Column> {
    select(ast, 0)
        .columns
        .iter()
        .map(|id| column(ast, *id))
        .collect()
}

fn literal(ast: &Ast, id: Option<NodeId>) -> Literal {
    match column(ast, id) {
        Column::Literal(literal) => literal.value.clone(),
        other => panic!("Expected a literal, got {other:?}"),
    }
}

fn arithmetic_steps(
    ast: &Ast,
    operations: &[Option<NodeId>],
) -> Vec<(ArithmeticOperator, Literal)> {
    operations
        .iter()
        .map(|id| match ast[id.expect("operation")].as_element() {
            Some(Element::ArithmeticOperation(step)) => (step.operator, literal(ast, step.operand)),
            other => panic!("Expected an arithmetic step, got {other:?}"),
        })
        .collect()
}

#[test]
fn arithmetic_run_is_one_flat_chain() {
    let ast = parse("SELECT 1 + 2 % 3 * 4");
    let Column::Arithmetic(chain) = first_column(&ast) else {
        panic!("Expected an arithmetic chain");
    };
    assert_eq!(literal(&ast, chain.left), Literal::Integer(1));
    assert_eq!(
        arithmetic_steps(&ast, &chain.operations),
        vec![
            (ArithmeticOperator::Add, Literal::Integer(2)),
            (ArithmeticOperator::Modulo, Literal::Integer(3)),
            (ArithmeticOperator::Multiply, Literal::Integer(4)),
        ]
    );
    assert_eq!(
        find_all(&ast, |node| matches!(node.as_column(), Some(Column::Arithmetic(_)))).len(),
        1
    );
}

#[test]
fn string_concatenation_operator() {
    let ast = parse("SELECT 'a' || 'b'");
    let Column::Arithmetic(chain) = first_column(&ast) else {
        panic!("Expected an arithmetic chain");
    };
    assert_eq!(
        arithmetic_steps(&ast, &chain.operations),
        vec![(ArithmeticOperator::Concat, Literal::String(String::from("b")))]
    );
}

#[test]
fn literals() {
    let ast = parse("SELECT 42, 1.5, 'it''s', N'unicode', NULL");
    let select = select(&ast, 0);
    assert_eq!(literal(&ast, select.columns[0]), Literal::Integer(42));
    assert_eq!(literal(&ast, select.columns[1]), Literal::Decimal(String::from("1.5")));
    assert_eq!(
        literal(&ast, select.columns[2]),
        Literal::String(String::from("it's"))
    );
    assert_eq!(
        literal(&ast, select.columns[3]),
        Literal::NationalString(String::from("unicode"))
    );
    assert!(matches!(column(&ast, select.columns[4]), Column::Null(_)));
}

#[test]
fn numeric_literals_keep_precision() {
    let ast = parse("SELECT 123456789012345678.9, 99999999999999999999, -1e3");
    let select = select(&ast, 0);
    assert_eq!(
        literal(&ast, select.columns[0]),
        Literal::Decimal(String::from("123456789012345678.9"))
    );
    assert_eq!(
        literal(&ast, select.columns[1]),
        Literal::Decimal(String::from("99999999999999999999"))
    );
    assert_eq!(
        literal(&ast, select.columns[2]),
        Literal::Decimal(String::from("-1e3"))
    );
}

#[test]
fn unary_minus() {
    let ast = parse("SELECT -5, -2.5, -a");
    let select = select(&ast, 0);
    assert_eq!(literal(&ast, select.columns[0]), Literal::Integer(-5));
    assert_eq!(literal(&ast, select.columns[1]), Literal::Decimal(String::from("-2.5")));
    let Column::Negated(negated) = column(&ast, select.columns[2]) else {
        panic!("Expected a negated column");
    };
    assert!(matches!(column(&ast, negated.operand), Column::Primitive(_)));
}

#[test]
fn variables() {
    let ast = parse("SELECT @limit, @@ROWCOUNT");
    let names: Vec<&str> = columns(&ast)
        .into_iter()
        .map(|column| match column {
            Column::Variable(variable) => variable.name.as_str(),
            other => panic!("Expected a variable, got {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["@limit", "@@ROWCOUNT"]);
}

#[test]
fn datetime_escapes() {
    let ast = parse("SELECT {d '2024-01-31'}, {t '12:30:00'}, {ts '2024-01-31 12:30:00'}");
    let select = select(&ast, 0);
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
    let time = NaiveTime::from_hms_opt(12, 30, 0).expect("time");
    assert_eq!(literal(&ast, select.columns[0]), Literal::Date(date));
    assert_eq!(literal(&ast, select.columns[1]), Literal::Time(time));
    assert_eq!(
        literal(&ast, select.columns[2]),
        Literal::Timestamp(date.and_time(time))
    );
}

#[test]
fn invalid_datetime_escape() {
    let error = parse_err("SELECT {d '2024-13-01'}");
    assert_eq!(error.kind, ErrorKind::Syntax);
    assert!(error.message.starts_with("invalid d literal '2024-13-01'"));
    assert_eq!(error.token_text.as_deref(), Some("'2024-13-01'"));

    let error = parse_err("SELECT {x '2024-01-01'}");
    assert_eq!(error.message, "unknown date/time escape 'x'");
}

#[test]
fn primitive_columns() {
    let ast = parse("SELECT a, t.b, [my col]");
    let columns = columns(&ast);

    let Column::Primitive(a) = columns[0] else { panic!() };
    assert!(a.table.is_none());
    assert_eq!(a.name.name, "a");

    let Column::Primitive(b) = columns[1] else { panic!() };
    assert_eq!(b.table.as_ref().map(|t| t.name.as_str()), Some("t"));
    assert_eq!(b.name.name, "b");

    let Column::Primitive(c) = columns[2] else { panic!() };
    assert!(c.name.delimited);
    assert_eq!(c.name.name, "my col");
}

#[test]
fn unreserved_keyword_as_column_name() {
    let ast = parse("SELECT rows, first FROM t");
    assert!(columns(&ast)
        .iter()
        .all(|column| matches!(column, Column::Primitive(_))));
}

#[test]
fn stars() {
    let ast = parse("SELECT *, t.* FROM t");
    let columns = columns(&ast);
    let Column::Star(all) = columns[0] else { panic!() };
    assert!(all.table.is_none());
    let Column::Star(qualified) = columns[1] else { panic!() };
    assert_eq!(qualified.table.as_ref().map(|t| t.name.as_str()), Some("t"));
}

#[test]
fn three_part_column_name_is_an_error() {
    let error = parse_err("SELECT x.y.z");
    assert_eq!(error.message, "column name 'x.y.z' has more than two parts");
    assert_eq!(error.column, Some(7));
}

#[test]
fn functions() {
    let ast = parse("SELECT dbo.fn(a, 1), GETDATE(), LEFT(name, 2)");
    let columns = columns(&ast);

    let Column::Function(qualified) = columns[0] else { panic!() };
    assert_eq!(
        qualified.name.iter().map(|part| part.name.as_str()).collect::<Vec<_>>(),
        vec!["dbo", "fn"]
    );
    assert_eq!(qualified.arguments.len(), 2);

    let Column::Function(no_arguments) = columns[1] else { panic!() };
    assert!(no_arguments.arguments.is_empty());

    let Column::Function(keyword) = columns[2] else { panic!() };
    assert_eq!(keyword.name[0].name, "LEFT");
    assert_eq!(keyword.arguments.len(), 2);
}

#[test]
fn aggregations() {
    let ast = parse("SELECT COUNT(*), count(DISTINCT a), SUM(ALL b), STRING_AGG(c, ',')");
    let columns = columns(&ast);

    let Column::Aggregation(count) = columns[0] else { panic!() };
    assert_eq!(count.function, AggregateFunction::Count);
    assert!(matches!(column(&ast, count.arguments[0]), Column::Star(_)));

    let Column::Aggregation(distinct) = columns[1] else { panic!() };
    assert_eq!(distinct.function, AggregateFunction::Count);
    assert!(distinct.distinct);

    let Column::Aggregation(sum) = columns[2] else { panic!() };
    assert!(!sum.distinct);

    let Column::Aggregation(string_agg) = columns[3] else { panic!() };
    assert_eq!(string_agg.function, AggregateFunction::StringAgg);
    assert_eq!(string_agg.arguments.len(), 2);
}

#[test]
fn empty_aggregation_is_an_error() {
    let error = parse_err("SELECT SUM()");
    assert_eq!(error.message, "SUM requires at least one column");
    assert_eq!(error.token_text.as_deref(), Some("SUM"));
}

#[test]
fn cast_takes_the_type_after_the_last_as() {
    let ast = parse("SELECT CAST(CAST(a AS INT) + 1 AS DECIMAL(10, 2)), TRY_CAST(b AS DATE)");
    let columns = columns(&ast);

    let Column::Cast(cast) = columns[0] else { panic!() };
    assert_eq!(cast.type_name, "DECIMAL(10, 2)");
    assert!(!cast.try_cast);
    assert!(matches!(column(&ast, cast.value), Column::Arithmetic(_)));

    let Column::Cast(try_cast) = columns[1] else { panic!() };
    assert_eq!(try_cast.type_name, "DATE");
    assert!(try_cast.try_cast);
}

#[test]
fn cast_expects_exactly_one_column() {
    let error = parse_err("SELECT CAST(a, b AS INT)");
    assert_eq!(error.message, "CAST expects exactly one column");
    assert_eq!(error.column, Some(11));
}

#[test]
fn convert() {
    let ast = parse("SELECT CONVERT(VARCHAR(10), created, 120), TRY_CONVERT(INT, x)");
    let columns = columns(&ast);

    let Column::Convert(convert) = columns[0] else { panic!() };
    assert_eq!(convert.type_name, "VARCHAR(10)");
    assert!(matches!(column(&ast, convert.value), Column::Primitive(_)));
    assert_eq!(literal(&ast, convert.style), Literal::Integer(120));

    let Column::Convert(try_convert) = columns[1] else { panic!() };
    assert!(try_convert.try_convert);
    assert!(try_convert.style.is_none());

    let error = parse_err("SELECT CONVERT(INT, a, 1, 2)");
    assert_eq!(error.message, "CONVERT expects one or two columns after the type");
}

#[test]
fn parse_with_culture() {
    let ast = parse("SELECT TRY_PARSE('1,5' AS DECIMAL(4, 1) USING 'de-DE'), PARSE(s AS INT)");
    let columns = columns(&ast);

    let Column::Parse(with_culture) = columns[0] else { panic!() };
    assert!(with_culture.try_parse);
    assert_eq!(with_culture.type_name, "DECIMAL(4, 1)");
    assert_eq!(
        literal(&ast, with_culture.culture),
        Literal::String(String::from("de-DE"))
    );

    let Column::Parse(plain) = columns[1] else { panic!() };
    assert!(plain.culture.is_none());
    assert_eq!(plain.type_name, "INT");
}

#[test]
fn iif() {
    let ast = parse("SELECT IIF(a > 1, 'big', 'small')");
    let Column::Iif(iif) = first_column(&ast) else {
        panic!("Expected IIF");
    };
    assert!(iif.condition.is_some());
    assert_eq!(literal(&ast, iif.else_value), Literal::String(String::from("small")));

    let error = parse_err("SELECT IIF(a > 1, 'big')");
    assert_eq!(error.message, "IIF expects exactly three arguments");
}

#[test]
fn case_forms() {
    let ast = parse(
        "SELECT CASE WHEN a = 1 THEN 'one' WHEN a = 2 THEN 'two' ELSE 'many' END, \
         CASE b WHEN 1 THEN 'x' END",
    );
    let columns = columns(&ast);

    let Column::Case(searched) = columns[0] else { panic!() };
    assert!(searched.operand.is_none());
    assert_eq!(searched.branches.len(), 2);
    assert!(searched.otherwise.is_some());
    let Some(Element::CaseBranch(branch)) = ast[searched.branches[0].expect("branch")].as_element()
    else {
        panic!("Expected a case branch");
    };
    assert!(branch.condition.is_some());
    assert!(branch.value.is_none());

    let Column::Case(simple) = columns[1] else { panic!() };
    assert!(simple.operand.is_some());
    assert!(simple.otherwise.is_none());
    let Some(Element::CaseBranch(branch)) = ast[simple.branches[0].expect("branch")].as_element()
    else {
        panic!("Expected a case branch");
    };
    assert!(branch.condition.is_none());
    assert_eq!(literal(&ast, branch.value), Literal::Integer(1));
}

#[test]
fn brackets_and_subselects() {
    let ast = parse("SELECT (a + 1) * 2, (SELECT MAX(x) FROM t)");
    let columns = columns(&ast);

    let Column::Arithmetic(chain) = columns[0] else { panic!() };
    assert!(matches!(column(&ast, chain.left), Column::Bracket(_)));

    let Column::Subselect(subselect) = columns[1] else { panic!() };
    assert!(ast[subselect.select.expect("statement")].as_statement().is_some());
}

#[test]
fn empty_brackets_report_the_opening_bracket() {
    let error = parse_err("SELECT ()");
    assert_eq!(error.message, "empty brackets");
    assert_eq!(error.line, Some(0));
    assert_eq!(error.column, Some(7));
    assert_eq!(error.token_text.as_deref(), Some("("));
}

#[test]
fn aliases() {
    let ast = parse("SELECT a AS x, b y, c AS 'z', d AS [w w], COUNT(*) total");
    let aliases: Vec<(String, bool)> = columns(&ast)
        .into_iter()
        .map(|column| match column {
            Column::Alias(alias) => (alias.alias.name.clone(), alias.alias.delimited),
            other => panic!("Expected an alias, got {other:?}"),
        })
        .collect();
    assert_eq!(
        aliases,
        vec![
            (String::from("x"), false),
            (String::from("y"), false),
            (String::from("z"), true),
            (String::from("w w"), true),
            (String::from("total"), false),
        ]
    );
}

#[test]
fn over_wraps_the_whole_arithmetic_run() {
    let ast = parse("SELECT SUM(a) + 1 OVER (PARTITION BY b) AS s");
    let Column::Alias(alias) = first_column(&ast) else {
        panic!("Expected an alias");
    };
    let Column::Over(over) = column(&ast, alias.column) else {
        panic!("Expected OVER");
    };
    assert!(matches!(column(&ast, over.column), Column::Arithmetic(_)));
    assert!(matches!(
        ast[over.window.expect("window")].as_element(),
        Some(Element::Window(_))
    ));
}

#[test]
fn column_entry_point() {
    let ast = tsql_select_core::parse_column("a + b AS total").expect("column");
    let root = ast.root_child().expect("root child");
    assert!(matches!(ast[root].as_column(), Some(Column::Alias(_))));
}
