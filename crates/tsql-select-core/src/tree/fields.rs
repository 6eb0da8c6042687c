//! Per-node field declarations.
//!
//! Every node type implements [`Fields`], normally through
//! `#[derive(Node)]`. The derive classifies each struct field into one of the
//! six [`FieldShape`]s when the crate compiles, so the tree engine never has to
//! inspect types at runtime: the descriptor table is a `'static` array built
//! per node kind.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::NodeId;
use crate::ast::NodeClass;

/// The structural shape of a node field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// Zero or one child node.
    Child,
    /// Ordered child nodes; absent elements are holes.
    ChildList,
    /// Plain value copied by value.
    Scalar,
    /// Sequence of plain values.
    ScalarList,
    /// Value type with its own clone semantics (not a node).
    Opaque,
    /// Sequence of opaque values.
    OpaqueList,
}

/// Static description of one field of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared.
    pub name: &'static str,
    /// Field shape.
    pub shape: FieldShape,
    /// Node class accepted by a child field; `None` for value fields.
    pub accepts: Option<NodeClass>,
}

impl FieldDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, shape: FieldShape, accepts: Option<NodeClass>) -> Self {
        Self {
            name,
            shape,
            accepts,
        }
    }
}

/// Read access to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Child(Option<NodeId>),
    ChildList(&'a [Option<NodeId>]),
    /// Scalar or opaque field: not visible to the tree engine.
    Value,
}

/// Write access to a field.
#[derive(Debug, PartialEq, Eq)]
pub enum FieldMut<'a> {
    Child(&'a mut Option<NodeId>),
    ChildList(&'a mut Vec<Option<NodeId>>),
    Value,
}

/// Structural contract shared by all AST nodes.
///
/// Field indices are declaration order and index into
/// [`Fields::descriptors`].
///
/// Every field of a derived node must land in one shape:
///
/// ```
/// use tsql_select_core::tree::{FieldShape, Fields};
/// use tsql_select_core::NodeId;
///
/// #[derive(tsql_select_derive::Node)]
/// struct Wrapper {
///     #[field(child = Column)]
///     inner: Option<NodeId>,
///     #[field(child = Column)]
///     items: Vec<Option<NodeId>>,
///     label: String,
/// }
///
/// let wrapper = Wrapper { inner: None, items: vec![None], label: String::new() };
/// let shapes: Vec<FieldShape> = wrapper.descriptors().iter().map(|d| d.shape).collect();
/// assert_eq!(shapes, [FieldShape::Child, FieldShape::ChildList, FieldShape::Scalar]);
/// ```
///
/// A field the derive cannot classify does not compile:
///
/// ```compile_fail
/// use std::collections::HashMap;
///
/// #[derive(tsql_select_derive::Node)]
/// struct Lookup {
///     names: HashMap<String, String>,
/// }
/// ```
///
/// A child is always optional, so a bare id is refused:
///
/// ```compile_fail
/// use tsql_select_core::NodeId;
///
/// #[derive(tsql_select_derive::Node)]
/// struct Single {
///     #[field(child = Column)]
///     inner: NodeId,
/// }
/// ```
///
/// A child list must name the node class it accepts:
///
/// ```compile_fail
/// use tsql_select_core::NodeId;
///
/// #[derive(tsql_select_derive::Node)]
/// struct List {
///     items: Vec<Option<NodeId>>,
/// }
/// ```
///
/// Scalars are limited to [`ScalarValue`] types:
///
/// ```compile_fail
/// use std::collections::HashMap;
///
/// #[derive(tsql_select_derive::Node)]
/// struct Lookup {
///     #[field(scalar)]
///     names: HashMap<String, String>,
/// }
/// ```
pub trait Fields {
    /// Kind tag of the concrete node.
    fn kind(&self) -> &'static str;

    /// Field table of the concrete node kind.
    fn descriptors(&self) -> &'static [FieldDescriptor];

    /// Reads field `index`; out-of-range indices yield [`FieldRef::Value`].
    fn field(&self, index: usize) -> FieldRef<'_>;

    /// Mutable access to field `index`.
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;
}

/// Marker for types allowed in scalar fields.
pub trait ScalarValue: Clone {}

/// Marker for opaque value types: cloned by their own `Clone`, never nodes.
pub trait OpaqueValue: Clone {}

macro_rules! scalar_values {
    ($($ty:ty),* $(,)?) => {
        $(impl ScalarValue for $ty {})*
    };
}

scalar_values!(
    String,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
);
