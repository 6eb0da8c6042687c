//! Generic tree conventions.
//!
//! Clone, child enumeration, and child replacement work over every node kind
//! by reading its field table instead of per-type code.

mod arena;
mod error;
mod fields;

pub use arena::{Ast, Checkpoint, Descendants, NodeId};
pub use error::TreeError;
pub use fields::{
    FieldDescriptor, FieldMut, FieldRef, FieldShape, Fields, OpaqueValue, ScalarValue,
};
