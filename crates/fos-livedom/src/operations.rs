//! DOM Node Operations
//!
//! Core node manipulation: appendChild, insertBefore, removeChild,
//! replaceChild. Every check runs before the first edit, so a failed call
//! leaves the tree as it was.

use std::ops::{Deref, DerefMut};

use crate::observer::{MutationRecord, MutationType};
use crate::{DomTree, NodeId, NodeType};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Reference node is not where the operation expected it
    #[error("Failed to execute '{operation}' on '{interface}': {message}")]
    NotFound {
        operation: &'static str,
        interface: &'static str,
        message: &'static str,
    },

    /// Insertion would break the tree shape
    #[error("Failed to execute '{operation}' on '{interface}': {message}")]
    HierarchyRequest {
        operation: &'static str,
        interface: &'static str,
        message: &'static str,
    },

    /// Node exists but is the wrong kind for the operation
    #[error("Failed to execute '{operation}': node {node} is not a {expected} node")]
    InvalidNodeType {
        operation: &'static str,
        node: NodeId,
        expected: &'static str,
    },

    /// ID does not belong to this tree
    #[error("Failed to execute '{operation}': node {node} does not belong to this tree")]
    InvalidNode { operation: &'static str, node: NodeId },

    #[error("Failed to execute 'observe' on 'MutationObserver': {message}")]
    InvalidObserverOptions { message: &'static str },
}

/// Error category, without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomErrorKind {
    NotFound,
    HierarchyRequest,
    InvalidNodeType,
    InvalidNode,
    InvalidObserverOptions,
}

impl DomError {
    pub fn kind(&self) -> DomErrorKind {
        match self {
            Self::NotFound { .. } => DomErrorKind::NotFound,
            Self::HierarchyRequest { .. } => DomErrorKind::HierarchyRequest,
            Self::InvalidNodeType { .. } => DomErrorKind::InvalidNodeType,
            Self::InvalidNode { .. } => DomErrorKind::InvalidNode,
            Self::InvalidObserverOptions { .. } => DomErrorKind::InvalidObserverOptions,
        }
    }

    /// Name of the DOM operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            Self::NotFound { operation, .. }
            | Self::HierarchyRequest { operation, .. }
            | Self::InvalidNodeType { operation, .. }
            | Self::InvalidNode { operation, .. } => *operation,
            Self::InvalidObserverOptions { .. } => "observe",
        }
    }
}

const NOT_A_CHILD_REF: &str =
    "The node before which the new node is to be inserted is not a child of this node.";
const NOT_A_CHILD_REMOVE: &str = "The node to be removed is not a child of this node.";
const NOT_A_CHILD_REPLACE: &str = "The node to be replaced is not a child of this node.";

/// Node operations trait
pub trait NodeOperations {
    /// Append a child node
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Remove a child node
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Insert before a reference node (`None` appends)
    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId>;

    /// Replace a child with another node, returning the old child
    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId>;
}

impl NodeOperations for DomTree {
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_node("appendChild", parent, child, None)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node("removeChild", parent)?;
        self.node("removeChild", child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound {
                operation: "removeChild",
                interface: "Node",
                message: NOT_A_CHILD_REMOVE,
            });
        }
        self.detach(child);
        tracing::debug!("Removed node {} from {}", child, parent);
        Ok(child)
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.insert_node("insertBefore", parent, new_child, ref_child)
    }

    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        const OP: &str = "replaceChild";
        self.node(OP, old_child)?;
        self.ensure_pre_insert(OP, parent, new_child)?;
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::NotFound {
                operation: OP,
                interface: "Node",
                message: NOT_A_CHILD_REPLACE,
            });
        }
        if new_child == old_child {
            return Ok(old_child);
        }

        self.detach(new_child);
        let Some((_, index)) = self.unlink(old_child) else {
            return Ok(old_child);
        };
        self.link(parent, new_child, index);

        let previous = index.checked_sub(1).map(|i| self.children(parent)[i]);
        let next = self.children(parent).get(index + 1).copied();
        self.notify(parent, MutationType::ChildList, || {
            MutationRecord::child_list(parent, vec![new_child], vec![old_child], previous, next)
        });
        tracing::debug!("Replaced node {} with {} in {}", old_child, new_child, parent);
        Ok(old_child)
    }
}

impl DomTree {
    /// Scoped bypass of the "reference must be a child" check.
    ///
    /// The returned guard dereferences to the tree; the previous state is
    /// restored when it drops, on success and error paths alike.
    pub fn suppress_insert_validation(&mut self) -> InsertValidationGuard<'_> {
        let previous = std::mem::replace(&mut self.insert_validation_suppressed, true);
        tracing::trace!("Insert validation suppressed");
        InsertValidationGuard {
            tree: self,
            previous,
        }
    }

    pub fn is_insert_validation_suppressed(&self) -> bool {
        self.insert_validation_suppressed
    }

    /// Checks shared by every insertion path
    fn ensure_pre_insert(
        &self,
        operation: &'static str,
        parent: NodeId,
        child: NodeId,
    ) -> DomResult<()> {
        self.node(operation, parent)?;
        let child_node = self.node(operation, child)?;

        if !self.is_container(parent) {
            return Err(DomError::HierarchyRequest {
                operation,
                interface: "Node",
                message: "This node type does not support this method.",
            });
        }
        if child_node.node_type() == NodeType::Document {
            return Err(DomError::HierarchyRequest {
                operation,
                interface: "Node",
                message: "Nodes of type '#document' may not be inserted inside nodes of type '#document'.",
            });
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest {
                operation,
                interface: "Node",
                message: "The new child element contains the parent.",
            });
        }
        Ok(())
    }

    /// Resolve where `child` lands: the parent to attach to and the
    /// reference child to insert before.
    fn resolve_insertion_point(
        &self,
        operation: &'static str,
        parent: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<(NodeId, Option<NodeId>)> {
        let Some(reference) = ref_child else {
            return Ok((parent, None));
        };
        self.node(operation, reference)?;

        match self.parent(reference) {
            Some(p) if p == parent => Ok((parent, Some(reference))),
            Some(p) if self.insert_validation_suppressed && self.contains(parent, p) => {
                Ok((p, Some(reference)))
            }
            _ if self.insert_validation_suppressed => Ok((parent, None)),
            _ => Err(DomError::NotFound {
                operation,
                interface: "Node",
                message: NOT_A_CHILD_REF,
            }),
        }
    }

    fn insert_node(
        &mut self,
        operation: &'static str,
        parent: NodeId,
        child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insert(operation, parent, child)?;
        let (target, mut reference) = self.resolve_insertion_point(operation, parent, ref_child)?;
        if target != parent {
            self.ensure_pre_insert(operation, target, child)?;
        }

        if reference == Some(child) {
            reference = self.next_sibling(child);
        }

        self.detach(child);
        let index = reference
            .and_then(|r| self.child_index(r))
            .unwrap_or_else(|| self.children(target).len());
        self.link(target, child, index);

        let previous = index.checked_sub(1).map(|i| self.children(target)[i]);
        let next = self.children(target).get(index + 1).copied();
        self.notify(target, MutationType::ChildList, || {
            MutationRecord::child_list(target, vec![child], Vec::new(), previous, next)
        });
        tracing::debug!("Inserted node {} into {} at {}", child, target, index);
        Ok(child)
    }

    /// Unlink `child` from its current parent, if any, and report it
    pub(crate) fn detach(&mut self, child: NodeId) {
        let previous = self.previous_sibling(child);
        let next = self.next_sibling(child);
        if let Some((parent, _)) = self.unlink(child) {
            self.notify(parent, MutationType::ChildList, || {
                MutationRecord::child_list(parent, Vec::new(), vec![child], previous, next)
            });
        }
    }
}

/// Keeps insert validation suppressed while alive
pub struct InsertValidationGuard<'a> {
    tree: &'a mut DomTree,
    previous: bool,
}

impl Deref for InsertValidationGuard<'_> {
    type Target = DomTree;

    fn deref(&self) -> &DomTree {
        self.tree
    }
}

impl DerefMut for InsertValidationGuard<'_> {
    fn deref_mut(&mut self) -> &mut DomTree {
        self.tree
    }
}

impl Drop for InsertValidationGuard<'_> {
    fn drop(&mut self) {
        self.tree.insert_validation_suppressed = self.previous;
        tracing::trace!("Insert validation restored");
    }
}
