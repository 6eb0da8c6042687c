//! Arena storage for one parse result.

use std::fmt;
use std::ops::Index;

use tracing::trace;

use super::{FieldMut, FieldRef, FieldShape, Fields, TreeError};
use crate::ast::{Node, NodeClass, Root};

/// Handle to a node stored in an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node every [`Ast`] starts with.
    pub const ROOT: Self = Self(0);

    /// Position of the node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
}

/// Arena length captured before a speculative parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// A syntax tree: nodes owned by an arena, linked by [`NodeId`].
///
/// Ownership runs strictly downward through child fields. Parent links are
/// plain ids kept in the arena slots, so a node can be referenced as a child
/// from at most one place without any shared ownership.
///
/// Index `0` always holds the [`Root`] node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    slots: Vec<Slot>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    /// Creates a tree holding only an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: Node::Root(Root { child: None }),
                parent: None,
            }],
        }
    }

    /// The root node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The statement or fragment held by the root.
    #[must_use]
    pub fn root_child(&self) -> Option<NodeId> {
        match &self.slots[0].node {
            Node::Root(root) => root.child,
            _ => None,
        }
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the node, if `id` belongs to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).map(|slot| &slot.node)
    }

    /// Returns the recorded parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.index()).and_then(|slot| slot.parent)
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.index() < self.slots.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    /// Stores a node and links its children back to it.
    ///
    /// The new node itself has no parent until it is placed somewhere. Every
    /// child must be a detached node of this tree that its field accepts, so
    /// a node can never end up under two parents.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownNode`] if a child id is not in this tree
    /// - [`TreeError::RootAsChild`] if a child is a root node
    /// - [`TreeError::TypeMismatch`] if a field rejects the class of its child
    /// - [`TreeError::AlreadyAttached`] if a child already has a parent or
    ///   appears twice in `node`
    pub fn add(&mut self, node: impl Into<Node>) -> Result<NodeId, TreeError> {
        let node = node.into();
        let mut seen = Vec::new();
        for (index, descriptor) in node.descriptors().iter().enumerate() {
            let children: Vec<NodeId> = match node.field(index) {
                FieldRef::Child(child) => child.into_iter().collect(),
                FieldRef::ChildList(items) => items.iter().flatten().copied().collect(),
                FieldRef::Value => continue,
            };
            for child in children {
                self.check(child)?;
                let found = self[child].class();
                if found == NodeClass::Root {
                    return Err(TreeError::RootAsChild);
                }
                accept(descriptor.name, descriptor.accepts, found)?;
                if self.parent(child).is_some() || seen.contains(&child) {
                    return Err(TreeError::AlreadyAttached(child));
                }
                seen.push(child);
            }
        }
        Ok(self.attach(node))
    }

    /// [`Ast::add`] for callers that only hand over fresh, detached children.
    pub(crate) fn attach(&mut self, node: impl Into<Node>) -> NodeId {
        let node = node.into();
        let id = NodeId(self.slots.len());
        let children = child_ids(&node);
        self.slots.push(Slot { node, parent: None });
        for child in children {
            self.slots[child.index()].parent = Some(id);
        }
        id
    }

    /// Places `child` under the root, replacing whatever was there.
    pub(crate) fn set_root_child(&mut self, child: NodeId) {
        if let Some(previous) = self.root_child() {
            self.slots[previous.index()].parent = None;
        }
        self.slots[0].node = Node::Root(Root { child: Some(child) });
        self.slots[child.index()].parent = Some(NodeId::ROOT);
    }

    /// Overwrites the recorded parent of `id`.
    ///
    /// Pairs with [`Ast::replace_child`], which leaves parent links alone.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if either id is not in this tree.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TreeError> {
        self.check(id)?;
        if let Some(parent) = parent {
            self.check(parent)?;
        }
        self.slots[id.index()].parent = parent;
        Ok(())
    }

    /// Yields the present children of `id`: single-child fields first in
    /// declaration order, then the non-hole elements of each child list.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = &self[id];
        let descriptors = node.descriptors();

        let singles = descriptors
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.shape == FieldShape::Child)
            .filter_map(move |(index, _)| match node.field(index) {
                FieldRef::Child(child) => child,
                _ => None,
            });

        let lists = descriptors
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.shape == FieldShape::ChildList)
            .flat_map(move |(index, _)| list_items(node.field(index)).iter().flatten().copied());

        singles.chain(lists)
    }

    /// Pre-order walk of `id` and everything below it.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }

    /// Kind tags of the subtree at `id` in pre-order.
    #[must_use]
    pub fn kinds(&self, id: NodeId) -> Vec<&'static str> {
        self.descendants(id).map(|node| self[node].kind()).collect()
    }

    /// Deep-copies the subtree at `id` and returns the copy's id.
    ///
    /// Child slots are cloned recursively with holes kept in place, values
    /// are cloned by their own `Clone`. The copy has no parent.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let mut copy = self[id].clone();
        for index in 0..copy.descriptors().len() {
            match copy.field_mut(index) {
                FieldMut::Child(slot) => {
                    if let Some(child) = *slot {
                        *slot = Some(self.clone_subtree(child));
                    }
                }
                FieldMut::ChildList(items) => {
                    for item in items.iter_mut() {
                        if let Some(child) = *item {
                            *item = Some(self.clone_subtree(child));
                        }
                    }
                }
                FieldMut::Value => {}
            }
        }
        self.attach(copy)
    }

    /// Swaps `old` for `new` in the first child slot of `parent` holding
    /// `old`, scanning single-child fields before child lists.
    ///
    /// Returns `Ok(false)` when `old` is not a direct child. Parent links are
    /// not touched: use [`Ast::replace_child_and_reparent`] or
    /// [`Ast::set_parent`].
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownNode`] if an id is not in this tree
    /// - [`TreeError::RootAsChild`] if `old` or `new` is a root node
    /// - [`TreeError::TypeMismatch`] if the matching field rejects the class
    ///   of `new`
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<bool, TreeError> {
        self.check(parent)?;
        self.check(old)?;
        self.check(new)?;

        let found = self[new].class();
        if found == NodeClass::Root || self[old].class() == NodeClass::Root {
            return Err(TreeError::RootAsChild);
        }

        let node = &mut self.slots[parent.index()].node;
        let descriptors = node.descriptors();

        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptor.shape != FieldShape::Child {
                continue;
            }
            if let FieldMut::Child(slot) = node.field_mut(index) {
                if *slot == Some(old) {
                    accept(descriptor.name, descriptor.accepts, found)?;
                    *slot = Some(new);
                    trace!(%parent, %old, %new, field = descriptor.name, "replaced child");
                    return Ok(true);
                }
            }
        }

        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptor.shape != FieldShape::ChildList {
                continue;
            }
            if let FieldMut::ChildList(items) = node.field_mut(index) {
                if let Some(item) = items.iter_mut().find(|item| **item == Some(old)) {
                    accept(descriptor.name, descriptor.accepts, found)?;
                    *item = Some(new);
                    trace!(%parent, %old, %new, field = descriptor.name, "replaced list element");
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// [`Ast::replace_child`] that also moves the parent links: `new` is
    /// attached to `parent` and `old` becomes detached.
    ///
    /// # Errors
    ///
    /// Everything [`Ast::replace_child`] reports, plus
    /// [`TreeError::AlreadyAttached`] if `new` already has a parent,
    /// [`TreeError::Cycle`] if `new` is `parent` or one of its ancestors, and
    /// [`TreeError::ChildNotFound`] if `old` is not a child of `parent`.
    pub fn replace_child_and_reparent(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        self.check(new)?;
        if self.slots[new.index()].parent.is_some() {
            return Err(TreeError::AlreadyAttached(new));
        }
        if self.is_ancestor_or_self(new, parent) {
            return Err(TreeError::Cycle { parent, child: new });
        }
        if !self.replace_child(parent, old, new)? {
            return Err(TreeError::ChildNotFound { parent, child: old });
        }
        self.slots[new.index()].parent = Some(parent);
        self.slots[old.index()].parent = None;
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Checks parent consistency and child classes below `id`.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: a child whose recorded parent is
    /// not the node holding it ([`TreeError::ChildNotFound`]), or a child in
    /// a field that does not accept its class ([`TreeError::TypeMismatch`]).
    pub fn validate(&self, id: NodeId) -> Result<(), TreeError> {
        self.check(id)?;
        for node in self.descendants(id) {
            let value = &self[node];
            for (index, descriptor) in value.descriptors().iter().enumerate() {
                let children: Vec<NodeId> = match value.field(index) {
                    FieldRef::Child(child) => child.into_iter().collect(),
                    FieldRef::ChildList(items) => items.iter().flatten().copied().collect(),
                    FieldRef::Value => Vec::new(),
                };
                for child in children {
                    self.check(child)?;
                    if self.parent(child) != Some(node) {
                        return Err(TreeError::ChildNotFound {
                            parent: node,
                            child,
                        });
                    }
                    accept(descriptor.name, descriptor.accepts, self[child].class())?;
                }
            }
        }
        Ok(())
    }

    /// Marks the arena length so a failed speculative parse can be undone.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.slots.len())
    }

    /// Drops every node added since `checkpoint` and unlinks nodes that were
    /// adopted by them.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if checkpoint.0 >= self.slots.len() || checkpoint.0 == 0 {
            return;
        }
        let dropped = self.slots.len() - checkpoint.0;
        self.slots.truncate(checkpoint.0);
        for slot in &mut self.slots {
            if slot.parent.is_some_and(|parent| parent.index() >= checkpoint.0) {
                slot.parent = None;
            }
        }
        trace!(dropped, "rolled back speculative nodes");
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.slots[id.index()].node
    }
}

/// Pre-order iterator returned by [`Ast::descendants`].
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children: Vec<NodeId> = self.ast.children(id).collect();
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}

fn list_items(field: FieldRef<'_>) -> &[Option<NodeId>] {
    match field {
        FieldRef::ChildList(items) => items,
        _ => &[],
    }
}

fn child_ids(node: &Node) -> Vec<NodeId> {
    let mut ids = Vec::new();
    for index in 0..node.descriptors().len() {
        match node.field(index) {
            FieldRef::Child(child) => ids.extend(child),
            FieldRef::ChildList(items) => ids.extend(items.iter().flatten()),
            FieldRef::Value => {}
        }
    }
    ids
}

fn accept(
    field: &'static str,
    accepts: Option<NodeClass>,
    found: NodeClass,
) -> Result<(), TreeError> {
    match accepts {
        Some(expected) if !expected.accepts(found) => Err(TreeError::TypeMismatch {
            field,
            expected,
            found,
        }),
        _ => Ok(()),
    }
}
