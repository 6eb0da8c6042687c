//! Abstract Syntax Tree (AST) types for T-SQL `SELECT` statements.
//!
//! Nodes are grouped into closed families ([`Column`], [`Condition`],
//! [`Relation`], [`Element`]) under one [`Node`] sum type. Child fields hold
//! [`NodeId`]s into an [`Ast`](crate::tree::Ast) arena and declare the
//! [`NodeClass`] they accept.

mod column;
mod condition;
mod identifier;
mod relation;
mod statement;
mod types;

use std::fmt;

use tsql_select_derive::Node;

use crate::tree::NodeId;

pub use column::{
    AggregationColumn, AliasColumn, ArithmeticColumn, ArithmeticOperation, BracketColumn,
    CaseBranch, CaseColumn, CastColumn, Column, ConvertColumn, FunctionColumn, IifColumn,
    LiteralColumn, NegatedColumn, NullColumn, OverColumn, ParseColumn, PrimitiveColumn,
    StarColumn, SubselectColumn, VariableColumn,
};
pub use condition::{
    BetweenCondition, BracketCondition, ChainCondition, ComparisonCondition, Condition,
    ConditionLink, ExistsCondition, InListCondition, InSelectCondition, IsNullCondition,
    NotCondition, SetComparisonCondition,
};
pub use identifier::Identifier;
pub use relation::{
    BracketRelation, Join, JoinChainRelation, Relation, SubselectRelation, TableRelation,
};
pub use statement::{
    Cte, GroupBy, GroupingSet, OptionHints, OrderBy, OrderItem, Pivot, Select, SelectStatement,
    Top, Window,
};
pub use types::{
    AggregateFunction, ArithmeticOperator, ComparisonOperator, FrameUnit, GroupingKind, JoinType,
    Literal, LogicOperator, Quantifier, SetOperator, SortDirection,
};

/// The node kinds a child field can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    /// Accepts every class except [`NodeClass::Root`].
    Any,
    Root,
    Column,
    Condition,
    Relation,
    Statement,
    Select,
    Cte,
    Top,
    Pivot,
    GroupBy,
    GroupingSet,
    OrderBy,
    OrderItem,
    Window,
    OptionHints,
    Join,
    ArithmeticOperation,
    ConditionLink,
    CaseBranch,
}

impl NodeClass {
    /// Returns true if a field declared with `self` can hold a `found` node.
    #[must_use]
    pub fn accepts(self, found: Self) -> bool {
        found != Self::Root && (self == Self::Any || self == found)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Anchor of one parse result.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Root {
    #[field(child = Any)]
    pub child: Option<NodeId>,
}

/// Supporting nodes that only appear inside other nodes.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub enum Element {
    Cte(Cte),
    Top(Top),
    Pivot(Pivot),
    GroupBy(GroupBy),
    GroupingSet(GroupingSet),
    OrderBy(OrderBy),
    OrderItem(OrderItem),
    Window(Window),
    OptionHints(OptionHints),
    Join(Join),
    ArithmeticOperation(ArithmeticOperation),
    ConditionLink(ConditionLink),
    CaseBranch(CaseBranch),
}

impl Element {
    /// The class of the wrapped element.
    #[must_use]
    pub const fn class(&self) -> NodeClass {
        match self {
            Self::Cte(_) => NodeClass::Cte,
            Self::Top(_) => NodeClass::Top,
            Self::Pivot(_) => NodeClass::Pivot,
            Self::GroupBy(_) => NodeClass::GroupBy,
            Self::GroupingSet(_) => NodeClass::GroupingSet,
            Self::OrderBy(_) => NodeClass::OrderBy,
            Self::OrderItem(_) => NodeClass::OrderItem,
            Self::Window(_) => NodeClass::Window,
            Self::OptionHints(_) => NodeClass::OptionHints,
            Self::Join(_) => NodeClass::Join,
            Self::ArithmeticOperation(_) => NodeClass::ArithmeticOperation,
            Self::ConditionLink(_) => NodeClass::ConditionLink,
            Self::CaseBranch(_) => NodeClass::CaseBranch,
        }
    }
}

/// Any AST node.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub enum Node {
    Root(Root),
    Column(Column),
    Condition(Condition),
    Relation(Relation),
    Statement(SelectStatement),
    Select(Select),
    Element(Element),
}

impl Node {
    /// The class checked against a field's accepted class on replacement.
    #[must_use]
    pub const fn class(&self) -> NodeClass {
        match self {
            Self::Root(_) => NodeClass::Root,
            Self::Column(_) => NodeClass::Column,
            Self::Condition(_) => NodeClass::Condition,
            Self::Relation(_) => NodeClass::Relation,
            Self::Statement(_) => NodeClass::Statement,
            Self::Select(_) => NodeClass::Select,
            Self::Element(element) => element.class(),
        }
    }

    #[must_use]
    pub const fn as_column(&self) -> Option<&Column> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_condition(&self) -> Option<&Condition> {
        match self {
            Self::Condition(condition) => Some(condition),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_statement(&self) -> Option<&SelectStatement> {
        match self {
            Self::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_select(&self) -> Option<&Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

macro_rules! into_node {
    ($($family:ident :: $variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Self::$family($family::$variant(node))
                }
            }
        )*
    };
}

into_node! {
    Column::Literal => LiteralColumn,
    Column::Null => NullColumn,
    Column::Star => StarColumn,
    Column::Variable => VariableColumn,
    Column::Primitive => PrimitiveColumn,
    Column::Function => FunctionColumn,
    Column::Aggregation => AggregationColumn,
    Column::Cast => CastColumn,
    Column::Convert => ConvertColumn,
    Column::Parse => ParseColumn,
    Column::Iif => IifColumn,
    Column::Case => CaseColumn,
    Column::Bracket => BracketColumn,
    Column::Subselect => SubselectColumn,
    Column::Arithmetic => ArithmeticColumn,
    Column::Negated => NegatedColumn,
    Column::Over => OverColumn,
    Column::Alias => AliasColumn,
    Condition::Comparison => ComparisonCondition,
    Condition::SetComparison => SetComparisonCondition,
    Condition::InList => InListCondition,
    Condition::InSelect => InSelectCondition,
    Condition::Between => BetweenCondition,
    Condition::IsNull => IsNullCondition,
    Condition::Exists => ExistsCondition,
    Condition::Not => NotCondition,
    Condition::Bracket => BracketCondition,
    Condition::Chain => ChainCondition,
    Relation::Table => TableRelation,
    Relation::Bracket => BracketRelation,
    Relation::Subselect => SubselectRelation,
    Relation::JoinChain => JoinChainRelation,
    Element::Cte => Cte,
    Element::Top => Top,
    Element::Pivot => Pivot,
    Element::GroupBy => GroupBy,
    Element::GroupingSet => GroupingSet,
    Element::OrderBy => OrderBy,
    Element::OrderItem => OrderItem,
    Element::Window => Window,
    Element::OptionHints => OptionHints,
    Element::Join => Join,
    Element::ArithmeticOperation => ArithmeticOperation,
    Element::ConditionLink => ConditionLink,
    Element::CaseBranch => CaseBranch,
}

impl From<Column> for Node {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<Condition> for Node {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<Relation> for Node {
    fn from(relation: Relation) -> Self {
        Self::Relation(relation)
    }
}

impl From<SelectStatement> for Node {
    fn from(statement: SelectStatement) -> Self {
        Self::Statement(statement)
    }
}

impl From<Select> for Node {
    fn from(select: Select) -> Self {
        Self::Select(select)
    }
}
