//! Scalar value types stored in node fields.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::tree::ScalarValue;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Decimal literal, kept as written.
    Decimal(String),
    /// String literal.
    String(String),
    /// `N'...'` string literal.
    NationalString(String),
    /// `{d '...'}` escape.
    Date(NaiveDate),
    /// `{t '...'}` escape.
    Time(NaiveTime),
    /// `{ts '...'}` escape.
    Timestamp(NaiveDateTime),
}

/// Binary arithmetic operators of an arithmetic chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

impl ArithmeticOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Concat => "||",
        }
    }
}

/// Two-sided comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
}

impl ComparisonOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

/// `AND` / `OR` in a condition chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOperator {
    And,
    Or,
}

/// Quantifier of a set comparison. `SOME` is parsed as `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Any,
    All,
}

impl Quantifier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::All => "ALL",
        }
    }
}

/// Aggregation functions recognised by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Count,
    CountBig,
    Sum,
    Avg,
    Min,
    Max,
    Stdev,
    Stdevp,
    Var,
    Varp,
    StringAgg,
}

impl AggregateFunction {
    /// Looks up an aggregation by function name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(Self::Count),
            "COUNT_BIG" => Some(Self::CountBig),
            "SUM" => Some(Self::Sum),
            "AVG" => Some(Self::Avg),
            "MIN" => Some(Self::Min),
            "MAX" => Some(Self::Max),
            "STDEV" => Some(Self::Stdev),
            "STDEVP" => Some(Self::Stdevp),
            "VAR" => Some(Self::Var),
            "VARP" => Some(Self::Varp),
            "STRING_AGG" => Some(Self::StringAgg),
            _ => None,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::CountBig => "COUNT_BIG",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Stdev => "STDEV",
            Self::Stdevp => "STDEVP",
            Self::Var => "VAR",
            Self::Varp => "VARP",
            Self::StringAgg => "STRING_AGG",
        }
    }
}

/// Modifier placed in front of every select block after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    CrossApply,
    OuterApply,
}

impl JoinType {
    /// Returns true if the join must carry an `ON` condition.
    #[must_use]
    pub const fn requires_on(self) -> bool {
        matches!(self, Self::Inner | Self::Left | Self::Right | Self::Full)
    }

    /// Returns the SQL representation of the join keywords.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
            Self::CrossApply => "CROSS APPLY",
            Self::OuterApply => "OUTER APPLY",
        }
    }
}

/// Kind of a grouping set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupingKind {
    Columns,
    Rollup,
    Cube,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Window frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnit {
    Rows,
    Range,
}

impl ScalarValue for Literal {}
impl ScalarValue for ArithmeticOperator {}
impl ScalarValue for ComparisonOperator {}
impl ScalarValue for LogicOperator {}
impl ScalarValue for Quantifier {}
impl ScalarValue for AggregateFunction {}
impl ScalarValue for SetOperator {}
impl ScalarValue for JoinType {}
impl ScalarValue for GroupingKind {}
impl ScalarValue for SortDirection {}
impl ScalarValue for FrameUnit {}
