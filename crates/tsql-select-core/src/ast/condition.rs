//! Condition (predicate) nodes.

use tsql_select_derive::Node;

use super::{ComparisonOperator, LogicOperator, Quantifier};
use crate::tree::NodeId;

/// `left op right`, `LIKE` included.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ComparisonCondition {
    #[field(child = Column)]
    pub left: Option<NodeId>,
    #[field(scalar)]
    pub operator: ComparisonOperator,
    #[field(child = Column)]
    pub right: Option<NodeId>,
}

/// `left op {ANY | SOME | ALL} (SELECT ...)`; `right` is a subselect column.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct SetComparisonCondition {
    #[field(child = Column)]
    pub left: Option<NodeId>,
    #[field(scalar)]
    pub operator: ComparisonOperator,
    #[field(scalar)]
    pub quantifier: Quantifier,
    #[field(child = Column)]
    pub right: Option<NodeId>,
}

/// `column [NOT] IN (v1, v2, ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct InListCondition {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    pub negated: bool,
    #[field(child = Column)]
    pub values: Vec<Option<NodeId>>,
}

/// `column [NOT] IN (SELECT ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct InSelectCondition {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    pub negated: bool,
    #[field(child = Statement)]
    pub select: Option<NodeId>,
}

/// `column [NOT] BETWEEN lower AND upper`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct BetweenCondition {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    pub negated: bool,
    #[field(child = Column)]
    pub lower: Option<NodeId>,
    #[field(child = Column)]
    pub upper: Option<NodeId>,
}

/// `column IS [NOT] NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct IsNullCondition {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    pub negated: bool,
}

/// `EXISTS (SELECT ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ExistsCondition {
    #[field(child = Statement)]
    pub select: Option<NodeId>,
}

/// `NOT condition`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct NotCondition {
    #[field(child = Condition)]
    pub condition: Option<NodeId>,
}

/// `(condition)`. Brackets are the only way to group `AND`/`OR`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct BracketCondition {
    #[field(child = Condition)]
    pub inner: Option<NodeId>,
}

/// `left AND c1 OR c2 ...`, evaluated strictly left to right.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ChainCondition {
    #[field(child = Condition)]
    pub left: Option<NodeId>,
    #[field(child = ConditionLink)]
    pub links: Vec<Option<NodeId>>,
}

/// One `(AND|OR, condition)` step of a [`ChainCondition`].
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ConditionLink {
    #[field(scalar)]
    pub operator: LogicOperator,
    #[field(child = Condition)]
    pub condition: Option<NodeId>,
}

/// Condition family.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub enum Condition {
    Comparison(ComparisonCondition),
    SetComparison(SetComparisonCondition),
    InList(InListCondition),
    InSelect(InSelectCondition),
    Between(BetweenCondition),
    IsNull(IsNullCondition),
    Exists(ExistsCondition),
    Not(NotCondition),
    Bracket(BracketCondition),
    Chain(ChainCondition),
}
