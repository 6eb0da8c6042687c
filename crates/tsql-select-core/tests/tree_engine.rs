//! Tests for the tree engine: traversal, cloning and child replacement.

mod common;
use std::collections::HashSet;

use common::*;
use tsql_select_core::tree::Fields;
use tsql_select_core::{
    Ast, CaseBranch, CaseColumn, Column, ComparisonCondition, ComparisonOperator, FunctionColumn,
    Identifier, Literal, LiteralColumn, NodeClass, NodeId, NullColumn, TreeError,
};

const SQL: &str = "WITH c AS (SELECT a FROM t) \
    SELECT TOP 5 x.a, \
    CASE WHEN b IS NULL THEN 0 ELSE SUM(b) OVER (ORDER BY d ROWS 3 PRECEDING) END \
    FROM c x JOIN u ON u.id = x.id \
    WHERE x.a IN (1, 2) AND NOT EXISTS (SELECT 1 FROM v) \
    GROUP BY x.a, b ORDER BY 1 DESC";

fn integer(ast: &mut Ast, value: i64) -> NodeId {
    ast.add(LiteralColumn {
        value: Literal::Integer(value),
    })
    .expect("add literal")
}

#[test]
fn clone_is_disjoint_isomorphic_and_parentless() {
    let mut ast = parse(SQL);
    let original = ast.root_child().expect("statement");
    let before: HashSet<NodeId> = ast.descendants(original).collect();

    let copy = ast.clone_subtree(original);
    let after: HashSet<NodeId> = ast.descendants(copy).collect();

    assert!(before.is_disjoint(&after));
    assert_eq!(before.len(), after.len());
    assert_eq!(ast.kinds(original), ast.kinds(copy));
    assert_eq!(ast.parent(copy), None);
    assert_eq!(ast.parent(original), Some(ast.root()));

    for id in after.into_iter().filter(|&id| id != copy) {
        let parent = ast.parent(id).expect("cloned node has a parent");
        assert!(ast.children(parent).any(|child| child == id));
    }
    assert!(ast.validate(copy).is_ok());
}

#[test]
fn every_parsed_node_is_listed_by_its_parent() {
    let ast = parse(SQL);
    for id in ast.descendants(ast.root()).skip(1) {
        let parent = ast.parent(id).expect("parent");
        assert!(ast.children(parent).any(|child| child == id));
    }
    assert!(ast.validate(ast.root()).is_ok());
}

#[test]
fn clone_keeps_holes_in_place() {
    let mut ast = Ast::new();
    let first = integer(&mut ast, 1);
    let second = integer(&mut ast, 2);
    let function = ast
        .add(FunctionColumn {
            name: vec![Identifier::new("f")],
            arguments: vec![Some(first), None, Some(second)],
        })
        .expect("add function");

    let copy = ast.clone_subtree(function);
    let Some(Column::Function(cloned)) = ast[copy].as_column() else {
        panic!("Expected a function column");
    };
    assert_eq!(cloned.arguments.len(), 3);
    assert!(cloned.arguments[1].is_none());
    assert_ne!(cloned.arguments[0], Some(first));
    assert_eq!(cloned.name, vec![Identifier::new("f")]);
    assert_eq!(ast.children(copy).count(), 2);
}

#[test]
fn children_lists_singles_then_list_elements_skipping_holes() {
    let mut ast = Ast::new();
    let operand = integer(&mut ast, 1);
    let branch = |ast: &mut Ast, value| {
        let result = integer(ast, value);
        ast.add(CaseBranch {
            condition: None,
            value: None,
            result: Some(result),
        })
        .expect("add branch")
    };
    let branch_a = branch(&mut ast, 2);
    let branch_b = branch(&mut ast, 3);
    let case = ast
        .add(CaseColumn {
            operand: Some(operand),
            branches: vec![Some(branch_a), None, Some(branch_b)],
            otherwise: None,
        })
        .expect("add case");

    let children: Vec<NodeId> = ast.children(case).collect();
    assert_eq!(children, vec![operand, branch_a, branch_b]);
    assert_eq!(ast.parent(branch_b), Some(case));
}

#[test]
fn replace_child_swaps_by_identity() {
    let mut ast = Ast::new();
    let left = integer(&mut ast, 1);
    let right = integer(&mut ast, 1);
    let comparison = ast
        .add(ComparisonCondition {
            left: Some(left),
            operator: ComparisonOperator::Eq,
            right: Some(right),
        })
        .expect("add comparison");
    let replacement = ast.add(NullColumn).expect("add null");

    assert_eq!(ast.replace_child(comparison, right, replacement), Ok(true));
    let Some(tsql_select_core::Condition::Comparison(updated)) = ast[comparison].as_condition()
    else {
        panic!("Expected a comparison");
    };
    assert_eq!(updated.left, Some(left));
    assert_eq!(updated.right, Some(replacement));
    // Parent links are left to the caller.
    assert_eq!(ast.parent(replacement), None);
    assert_eq!(ast.parent(right), Some(comparison));
}

#[test]
fn replace_child_reports_missing_child_without_changes() {
    let mut ast = parse("SELECT a, b FROM t");
    let select = find(&ast, |node| node.as_select().is_some());
    let stranger = integer(&mut ast, 7);
    let replacement = integer(&mut ast, 8);
    let snapshot = ast.clone();

    assert_eq!(ast.replace_child(select, stranger, replacement), Ok(false));
    assert_eq!(ast, snapshot);
}

#[test]
fn replace_child_rejects_incompatible_classes() {
    let mut ast = parse("SELECT a FROM t WHERE a = 1");
    let select_id = find(&ast, |node| node.as_select().is_some());
    let column = select(&ast, 0).columns[0].expect("column");
    let condition = ast
        .add(ComparisonCondition {
            left: None,
            operator: ComparisonOperator::Eq,
            right: None,
        })
        .expect("add comparison");

    assert_eq!(
        ast.replace_child(select_id, column, condition),
        Err(TreeError::TypeMismatch {
            field: "columns",
            expected: NodeClass::Column,
            found: NodeClass::Condition,
        })
    );
    assert_eq!(select(&ast, 0).columns[0], Some(column));
}

#[test]
fn root_is_never_a_child() {
    let mut ast = parse("SELECT a");
    let statement = ast.root_child().expect("statement");
    let select_id = find(&ast, |node| node.as_select().is_some());
    assert_eq!(
        ast.replace_child(statement, select_id, ast.root()),
        Err(TreeError::RootAsChild)
    );
}

#[test]
fn replace_and_reparent_moves_parent_links() {
    let mut ast = parse("SELECT a, b FROM t");
    let select_id = find(&ast, |node| node.as_select().is_some());
    let old = select(&ast, 0).columns[1].expect("column");
    let new = ast.add(NullColumn).expect("add null");

    assert_eq!(ast.replace_child_and_reparent(select_id, old, new), Ok(()));
    assert_eq!(ast.parent(new), Some(select_id));
    assert_eq!(ast.parent(old), None);
    assert!(ast.validate(ast.root()).is_ok());
    assert_eq!(ast.kinds(select_id)[2], "NullColumn");
}

#[test]
fn replace_and_reparent_guards_the_tree_shape() {
    let mut ast = parse("SELECT a, b FROM t");
    let select_id = find(&ast, |node| node.as_select().is_some());
    let first = select(&ast, 0).columns[0].expect("column");
    let second = select(&ast, 0).columns[1].expect("column");

    assert_eq!(
        ast.replace_child_and_reparent(select_id, first, second),
        Err(TreeError::AlreadyAttached(second))
    );

    let wrapper = ast
        .add(tsql_select_core::BracketColumn { inner: None })
        .expect("add wrapper");
    assert_eq!(
        ast.replace_child_and_reparent(wrapper, first, wrapper),
        Err(TreeError::Cycle {
            parent: wrapper,
            child: wrapper,
        })
    );

    let detached = ast.add(NullColumn).expect("add null");
    assert_eq!(
        ast.replace_child_and_reparent(wrapper, first, detached),
        Err(TreeError::ChildNotFound {
            parent: wrapper,
            child: first,
        })
    );
    assert_eq!(ast.parent(detached), None);
}

#[test]
fn add_refuses_children_that_already_have_a_parent() {
    let mut ast = parse("SELECT a");
    let select_id = find(&ast, |node| node.as_select().is_some());
    let column = select(&ast, 0).columns[0].expect("column");
    let count = ast.node_count();

    assert_eq!(
        ast.add(Column::Bracket(tsql_select_core::BracketColumn {
            inner: Some(column),
        })),
        Err(TreeError::AlreadyAttached(column))
    );
    assert_eq!(ast.parent(column), Some(select_id));
    assert_eq!(ast.node_count(), count);
    assert!(ast.validate(ast.root()).is_ok());
}

#[test]
fn add_checks_every_child_slot() {
    let mut ast = Ast::new();
    let value = integer(&mut ast, 1);
    assert_eq!(
        ast.add(FunctionColumn {
            name: vec![Identifier::new("f")],
            arguments: vec![Some(value), Some(value)],
        }),
        Err(TreeError::AlreadyAttached(value))
    );
    assert_eq!(ast.parent(value), None);

    let condition = ast
        .add(ComparisonCondition {
            left: None,
            operator: ComparisonOperator::Eq,
            right: None,
        })
        .expect("add comparison");
    assert_eq!(
        ast.add(tsql_select_core::BracketColumn {
            inner: Some(condition),
        }),
        Err(TreeError::TypeMismatch {
            field: "inner",
            expected: NodeClass::Column,
            found: NodeClass::Condition,
        })
    );
    let root = ast.root();
    assert_eq!(
        ast.add(tsql_select_core::BracketColumn { inner: Some(root) }),
        Err(TreeError::RootAsChild)
    );

    let other = parse("SELECT a, b, c FROM t");
    let foreign = find(&other, |node| node.as_select().is_some());
    assert_eq!(
        ast.add(tsql_select_core::BracketColumn {
            inner: Some(foreign),
        }),
        Err(TreeError::UnknownNode(foreign))
    );
}

#[test]
fn unknown_ids_are_reported() {
    let mut ast = Ast::new();
    let other = parse("SELECT a, b, c FROM t");
    let foreign = find(&other, |node| node.as_select().is_some());
    assert_eq!(
        ast.replace_child(ast.root(), foreign, foreign),
        Err(TreeError::UnknownNode(foreign))
    );
}

#[test]
fn rollback_discards_nodes_and_their_links() {
    let mut ast = Ast::new();
    let kept = integer(&mut ast, 1);
    let checkpoint = ast.checkpoint();
    let _wrapper = ast
        .add(tsql_select_core::NegatedColumn {
            operand: Some(kept),
        })
        .expect("add negation");
    assert!(ast.parent(kept).is_some());

    ast.rollback(checkpoint);
    assert_eq!(ast.node_count(), 2);
    assert_eq!(ast.parent(kept), None);
}

#[test]
fn kinds_follow_preorder() {
    let ast = parse("SELECT -a");
    assert_eq!(
        ast.kinds(ast.root()),
        vec![
            "Root",
            "SelectStatement",
            "Select",
            "NegatedColumn",
            "PrimitiveColumn"
        ]
    );
    assert_eq!(ast[ast.root()].kind(), "Root");
}
