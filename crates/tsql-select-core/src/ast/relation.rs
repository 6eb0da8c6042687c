//! Relation (FROM source) nodes.

use tsql_select_derive::Node;

use super::{Identifier, JoinType};
use crate::tree::NodeId;

/// A one to three part table name with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct TableRelation {
    #[field(opaque)]
    pub name: Vec<Identifier>,
    #[field(opaque)]
    pub alias: Option<Identifier>,
}

/// `(relation)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct BracketRelation {
    #[field(child = Relation)]
    pub inner: Option<NodeId>,
}

/// `(SELECT ...) alias`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct SubselectRelation {
    #[field(child = Statement)]
    pub select: Option<NodeId>,
    #[field(opaque)]
    pub alias: Identifier,
}

/// A relation followed by one or more joins.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct JoinChainRelation {
    #[field(child = Relation)]
    pub left: Option<NodeId>,
    #[field(child = Join)]
    pub joins: Vec<Option<NodeId>>,
}

/// One join of a [`JoinChainRelation`]. `on` is absent for `CROSS JOIN` and
/// `APPLY`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Join {
    #[field(scalar)]
    pub join_type: JoinType,
    #[field(child = Relation)]
    pub relation: Option<NodeId>,
    #[field(child = Condition)]
    pub on: Option<NodeId>,
}

/// Relation family.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub enum Relation {
    Table(TableRelation),
    Bracket(BracketRelation),
    Subselect(SubselectRelation),
    JoinChain(JoinChainRelation),
}
