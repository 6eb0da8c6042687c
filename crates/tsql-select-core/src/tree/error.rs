//! Tree engine error types.

use thiserror::Error;

use super::NodeId;
use crate::ast::NodeClass;

/// Errors raised when editing a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),

    #[error("node {child} is not a child of node {parent}")]
    ChildNotFound { parent: NodeId, child: NodeId },

    #[error("field `{field}` accepts {expected} nodes, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: NodeClass,
        found: NodeClass,
    },

    #[error("the root node cannot be used as a child")]
    RootAsChild,

    #[error("node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("attaching node {child} under node {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}
