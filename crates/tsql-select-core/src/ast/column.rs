//! Column (expression) nodes.

use tsql_select_derive::Node;

use super::{AggregateFunction, ArithmeticOperator, Identifier, Literal};
use crate::tree::NodeId;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct LiteralColumn {
    #[field(scalar)]
    pub value: Literal,
}

/// `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct NullColumn;

/// `*` or `table.*`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct StarColumn {
    #[field(opaque)]
    pub table: Option<Identifier>,
}

/// `@name`; the name keeps its sigil.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct VariableColumn {
    pub name: String,
}

/// A one or two part column reference.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct PrimitiveColumn {
    #[field(opaque)]
    pub table: Option<Identifier>,
    #[field(opaque)]
    pub name: Identifier,
}

/// A scalar function call, `name(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct FunctionColumn {
    #[field(opaque)]
    pub name: Vec<Identifier>,
    #[field(child = Column)]
    pub arguments: Vec<Option<NodeId>>,
}

/// An aggregation such as `SUM(DISTINCT x)` or `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct AggregationColumn {
    #[field(scalar)]
    pub function: AggregateFunction,
    pub distinct: bool,
    #[field(child = Column)]
    pub arguments: Vec<Option<NodeId>>,
}

/// `CAST(value AS type)` / `TRY_CAST`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct CastColumn {
    #[field(child = Column)]
    pub value: Option<NodeId>,
    /// Type text exactly as written, e.g. `DECIMAL(10, 2)`.
    pub type_name: String,
    pub try_cast: bool,
}

/// `CONVERT(type, value [, style])` / `TRY_CONVERT`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ConvertColumn {
    pub type_name: String,
    #[field(child = Column)]
    pub value: Option<NodeId>,
    #[field(child = Column)]
    pub style: Option<NodeId>,
    pub try_convert: bool,
}

/// `PARSE(value AS type [USING culture])` / `TRY_PARSE`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ParseColumn {
    #[field(child = Column)]
    pub value: Option<NodeId>,
    pub type_name: String,
    #[field(child = Column)]
    pub culture: Option<NodeId>,
    pub try_parse: bool,
}

/// `IIF(condition, then, else)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct IifColumn {
    #[field(child = Condition)]
    pub condition: Option<NodeId>,
    #[field(child = Column)]
    pub then_value: Option<NodeId>,
    #[field(child = Column)]
    pub else_value: Option<NodeId>,
}

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct CaseColumn {
    #[field(child = Column)]
    pub operand: Option<NodeId>,
    #[field(child = CaseBranch)]
    pub branches: Vec<Option<NodeId>>,
    #[field(child = Column)]
    pub otherwise: Option<NodeId>,
}

/// One `WHEN .. THEN ..` of a [`CaseColumn`].
///
/// A searched `CASE` fills `condition`, a simple `CASE` fills `value`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct CaseBranch {
    #[field(child = Condition)]
    pub condition: Option<NodeId>,
    #[field(child = Column)]
    pub value: Option<NodeId>,
    #[field(child = Column)]
    pub result: Option<NodeId>,
}

/// `(column)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct BracketColumn {
    #[field(child = Column)]
    pub inner: Option<NodeId>,
}

/// `(SELECT ...)` used as a column.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct SubselectColumn {
    #[field(child = Statement)]
    pub select: Option<NodeId>,
}

/// A flat run of binary arithmetic: `left op1 x1 op2 x2 ...`.
///
/// Operators of equal and different precedence share one chain, so
/// `1 + 2 % 3 * 4` is a single node with three operations.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ArithmeticColumn {
    #[field(child = Column)]
    pub left: Option<NodeId>,
    #[field(child = ArithmeticOperation)]
    pub operations: Vec<Option<NodeId>>,
}

/// One `(operator, operand)` step of an [`ArithmeticColumn`].
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct ArithmeticOperation {
    #[field(scalar)]
    pub operator: ArithmeticOperator,
    #[field(child = Column)]
    pub operand: Option<NodeId>,
}

/// Unary minus on a non-literal operand.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct NegatedColumn {
    #[field(child = Column)]
    pub operand: Option<NodeId>,
}

/// `column OVER (...)`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct OverColumn {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    #[field(child = Window)]
    pub window: Option<NodeId>,
}

/// `column [AS] alias`.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub struct AliasColumn {
    #[field(child = Column)]
    pub column: Option<NodeId>,
    #[field(opaque)]
    pub alias: Identifier,
}

/// Column family.
#[derive(Debug, Clone, PartialEq, Eq, Node)]
pub enum Column {
    Literal(LiteralColumn),
    Null(NullColumn),
    Star(StarColumn),
    Variable(VariableColumn),
    Primitive(PrimitiveColumn),
    Function(FunctionColumn),
    Aggregation(AggregationColumn),
    Cast(CastColumn),
    Convert(ConvertColumn),
    Parse(ParseColumn),
    Iif(IifColumn),
    Case(CaseColumn),
    Bracket(BracketColumn),
    Subselect(SubselectColumn),
    Arithmetic(ArithmeticColumn),
    Negated(NegatedColumn),
    Over(OverColumn),
    Alias(AliasColumn),
}
