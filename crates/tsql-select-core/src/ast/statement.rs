//! Statement, select block, and clause nodes.

use tsql_select_derive::Node;

use super::{FrameUnit, GroupingKind, Identifier, SetOperator, SortDirection};
use crate::tree::NodeId;

/// A complete `SELECT` statement.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct SelectStatement {
    #[field(child = Cte)]
    pub ctes: Vec<Option<NodeId>>,
    /// Select blocks; every block after the first carries a set operator.
    #[field(child = Select)]
    pub selects: Vec<Option<NodeId>>,
    #[field(child = OrderBy)]
    pub order_by: Option<NodeId>,
    #[field(child = OptionHints)]
    pub options: Option<NodeId>,
}

/// One select block.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Select {
    #[field(scalar)]
    pub set_operator: Option<SetOperator>,
    #[field(child = Top)]
    pub top: Option<NodeId>,
    pub distinct: bool,
    #[field(child = Column)]
    pub columns: Vec<Option<NodeId>>,
    #[field(child = Relation)]
    pub from: Vec<Option<NodeId>>,
    #[field(child = Pivot)]
    pub pivot: Option<NodeId>,
    #[field(child = Condition)]
    pub where_clause: Option<NodeId>,
    #[field(child = GroupBy)]
    pub group_by: Option<NodeId>,
    #[field(child = Condition)]
    pub having: Option<NodeId>,
}

/// `name [(columns)] AS (statement)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Cte {
    #[field(opaque)]
    pub name: Identifier,
    #[field(opaque)]
    pub columns: Vec<Identifier>,
    #[field(child = Statement)]
    pub select: Option<NodeId>,
}

/// `TOP count [PERCENT] [WITH TIES]`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Top {
    #[field(child = Column)]
    pub count: Option<NodeId>,
    pub percent: bool,
    pub with_ties: bool,
}

/// `PIVOT (aggregation FOR pivot_column IN (values)) AS alias`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Pivot {
    #[field(child = Column)]
    pub aggregation: Option<NodeId>,
    #[field(child = Column)]
    pub pivot_column: Option<NodeId>,
    #[field(child = Column)]
    pub values: Vec<Option<NodeId>>,
    #[field(opaque)]
    pub alias: Identifier,
}

/// `GROUP BY`; `grouping_sets` records the `GROUPING SETS (...)` form.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct GroupBy {
    pub grouping_sets: bool,
    #[field(child = GroupingSet)]
    pub sets: Vec<Option<NodeId>>,
}

/// A plain column list, `ROLLUP (...)` or `CUBE (...)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct GroupingSet {
    #[field(scalar)]
    pub kind: GroupingKind,
    #[field(child = Column)]
    pub columns: Vec<Option<NodeId>>,
}

/// Statement level `ORDER BY` with paging.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct OrderBy {
    #[field(child = OrderItem)]
    pub items: Vec<Option<NodeId>>,
    #[field(child = Column)]
    pub offset: Option<NodeId>,
    #[field(child = Column)]
    pub fetch: Option<NodeId>,
}

/// `column [COLLATE name] [ASC | DESC]`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct OrderItem {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    pub collation: Option<String>,
    #[field(scalar)]
    pub direction: SortDirection,
}

/// The `OVER (...)` specification.
///
/// Frame bounds are offsets from the current row: `None` is unbounded, `0`
/// the current row, negative values preceding rows and positive values
/// following rows.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct Window {
    #[field(child = Column)]
    pub partition_by: Vec<Option<NodeId>>,
    #[field(child = OrderItem)]
    pub order_by: Vec<Option<NodeId>>,
    #[field(scalar)]
    pub frame: Option<FrameUnit>,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

/// `OPTION (hint, ...)`, each hint kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct OptionHints {
    pub hints: Vec<String>,
}
