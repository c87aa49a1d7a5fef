//! DOM Tree (arena-based allocation)
//!
//! Owns every node of a document. Nodes are never freed: a removed node
//! stays addressable as a detached subtree, so a [`NodeId`] keeps its
//! identity across removal and re-insertion.

use crate::node::{Node, NodeData, NodeType};
use crate::observer::{MutationRecord, MutationType, ObserverId, RegisteredObserver};
use crate::operations::{DomError, DomResult};
use crate::{Config, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    config: Config,
    /// Set only while an [`crate::InsertValidationGuard`] is alive
    pub(crate) insert_validation_suppressed: bool,
    next_registration: u64,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a new tree holding only a document node
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new tree with explicit configuration
    pub fn with_config(config: Config) -> Self {
        let mut nodes = Vec::with_capacity(config.node_capacity.max(1));
        nodes.push(Node::document());
        Self {
            nodes,
            config,
            insert_validation_suppressed: false,
            next_registration: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get a node, or fail naming the operation that needed it
    pub(crate) fn node(&self, operation: &'static str, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::InvalidNode { operation, node: id })
    }

    pub(crate) fn node_mut(&mut self, operation: &'static str, id: NodeId) -> DomResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::InvalidNode { operation, node: id })
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True while the arena holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = if self.config.html_document {
            tag.to_ascii_lowercase()
        } else {
            tag.to_string()
        };
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.push(Node::text(data))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(Node::comment(data))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    /// `Node.nodeName`
    pub fn node_name(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        Some(match node.node_type() {
            NodeType::Document => "#document".to_string(),
            NodeType::Text => "#text".to_string(),
            NodeType::Comment => "#comment".to_string(),
            NodeType::Element => {
                let tag = &node.as_element()?.tag;
                if self.config.html_document {
                    tag.to_ascii_uppercase()
                } else {
                    tag.clone()
                }
            }
        })
    }

    /// Compare a stored tag name against a requested one
    pub(crate) fn tag_matches(&self, stored: &str, wanted: &str) -> bool {
        if self.config.html_document {
            stored.eq_ignore_ascii_case(wanted)
        } else {
            stored == wanted
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent()
    }

    /// Children in tree order (empty for unknown IDs)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of `id` among its parent's children
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        index.checked_sub(1).map(|i| self.children(parent)[i])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Descendants of `id` in tree order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Is `ancestor` an inclusive ancestor of `node`?
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let node = self.node_mut("setAttribute", id)?;
        let elem = node.as_element_mut().ok_or(DomError::InvalidNodeType {
            operation: "setAttribute",
            node: id,
            expected: "element",
        })?;
        elem.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let node = self.node_mut("removeAttribute", id)?;
        Ok(node.as_element_mut().and_then(|e| e.remove_attr(name)))
    }

    // ------------------------------------------------------------------
    // Raw structure edits (no validation, no notification)
    // ------------------------------------------------------------------

    /// Detach `child` from its parent. Returns the old parent and index.
    pub(crate) fn unlink(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(child)?;
        let index = self.child_index(child)?;
        self.nodes[parent.index()].children.remove(index);
        self.nodes[child.index()].parent = NodeId::NONE;
        Some((parent, index))
    }

    /// Attach a detached `child` to `parent` at `index`
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId, index: usize) {
        let siblings = &mut self.nodes[parent.index()].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.index()].parent = parent;
    }

    // ------------------------------------------------------------------
    // Observer registry
    // ------------------------------------------------------------------

    /// Attach a registration to `target`, replacing an existing one from
    /// the same observer in place
    pub fn register_observer(
        &mut self,
        target: NodeId,
        mut registration: RegisteredObserver,
    ) -> DomResult<()> {
        let order = self.next_registration;
        let node = self.node_mut("observe", target)?;
        if let Some(existing) = node
            .observers
            .iter_mut()
            .find(|r| r.observer == registration.observer)
        {
            existing.options = registration.options;
            existing.callback = registration.callback;
            return Ok(());
        }
        registration.order = order;
        node.observers.push(registration);
        self.next_registration += 1;
        tracing::trace!("Registered observer on node {}", target);
        Ok(())
    }

    /// Drop `observer`'s registration on `target`, if any
    pub fn unregister_observer(&mut self, target: NodeId, observer: ObserverId) {
        if let Some(node) = self.get_mut(target) {
            node.observers.retain(|r| r.observer != observer);
        }
    }

    /// Registrations held directly by `target`
    pub fn observer_count(&self, target: NodeId) -> usize {
        self.get(target).map_or(0, |n| n.observers.len())
    }

    /// Deliver one committed mutation of `target`.
    ///
    /// Matching registrations are those on `target` itself plus `subtree`
    /// registrations on its ancestors. They are merged per observer: each
    /// observer receives one record, in the order of its earliest matching
    /// registration, carrying the old value if any of its registrations asks
    /// for it. Delivery finishes before this returns. `build` only runs when
    /// at least one observer is interested.
    pub(crate) fn notify(
        &self,
        target: NodeId,
        kind: MutationType,
        build: impl FnOnce() -> MutationRecord,
    ) {
        let mut interested: Vec<(&RegisteredObserver, bool)> = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            let Some(node) = self.get(id) else { break };
            let matching = node
                .observers
                .iter()
                .filter(|r| r.options.wants(kind) && (id == target || r.options.subtree));
            for registration in matching {
                let old_value = registration.options.wants_old_value(kind);
                match interested
                    .iter_mut()
                    .find(|(seen, _)| seen.observer == registration.observer)
                {
                    Some((seen, wants_old)) => {
                        if registration.order < seen.order {
                            *seen = registration;
                        }
                        *wants_old |= old_value;
                    }
                    None => interested.push((registration, old_value)),
                }
            }
            current = node.parent();
        }
        if interested.is_empty() {
            return;
        }
        interested.sort_by_key(|(r, _)| r.order);

        let record = build();
        tracing::trace!(
            "Delivering {:?} record for node {} to {} observer(s)",
            kind,
            target,
            interested.len()
        );
        for (registration, wants_old) in interested {
            let mut delivered = record.clone();
            if !wants_old {
                delivered.old_value = None;
            }
            (registration.callback)(std::slice::from_ref(&delivered));
        }
    }

    /// Is `id` a node that may hold children?
    pub(crate) fn is_container(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Document | NodeData::Element(_)))
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
