//! DOM Observers
//!
//! MutationObserver registrations and the records delivered to them.
//! Delivery is synchronous: the tree hands each record to the callback
//! before the mutating call returns.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::operations::{DomError, DomResult};
use crate::{DomTree, NodeId};

/// Callback invoked with the records for one mutation
pub type MutationCallback = Rc<dyn Fn(&[MutationRecord])>;

static NEXT_OBSERVER_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a MutationObserver across all nodes it observes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

impl ObserverId {
    fn next() -> Self {
        ObserverId(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Mutation observer
pub struct MutationObserver {
    id: ObserverId,
    callback: MutationCallback,
    observed: Vec<NodeId>,
}

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Character data changes, with old values
    pub fn character_data_with_old_value() -> Self {
        Self {
            character_data: true,
            character_data_old_value: true,
            ..Default::default()
        }
    }

    /// Structural changes to the child list
    pub fn child_list() -> Self {
        Self {
            child_list: true,
            ..Default::default()
        }
    }

    fn validate(&self) -> DomResult<()> {
        if !(self.child_list || self.attributes || self.character_data) {
            return Err(DomError::InvalidObserverOptions {
                message: "The options object must set at least one of 'attributes', 'characterData', or 'childList' to true.",
            });
        }
        if (self.attribute_old_value || self.attribute_filter.is_some()) && !self.attributes {
            return Err(DomError::InvalidObserverOptions {
                message: "The options object may only set 'attributeOldValue' or 'attributeFilter' when 'attributes' is true.",
            });
        }
        if self.character_data_old_value && !self.character_data {
            return Err(DomError::InvalidObserverOptions {
                message: "The options object may only set 'characterDataOldValue' when 'characterData' is true.",
            });
        }
        Ok(())
    }

    /// Does this registration want records of the given type?
    pub fn wants(&self, kind: MutationType) -> bool {
        match kind {
            MutationType::Attributes => self.attributes,
            MutationType::CharacterData => self.character_data,
            MutationType::ChildList => self.child_list,
        }
    }

    /// Should records of the given type carry the old value?
    pub fn wants_old_value(&self, kind: MutationType) -> bool {
        match kind {
            MutationType::Attributes => self.attribute_old_value,
            MutationType::CharacterData => self.character_data_old_value,
            MutationType::ChildList => false,
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

impl MutationRecord {
    /// Record for a change of a text or comment node's data
    pub fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            old_value: Some(old_value),
        }
    }

    /// Record for a change of `target`'s children
    pub fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            old_value: None,
        }
    }
}

/// A (options, callback) pair attached to one node
#[derive(Clone)]
pub struct RegisteredObserver {
    pub(crate) observer: ObserverId,
    pub(crate) options: MutationObserverInit,
    pub(crate) callback: MutationCallback,
    /// Tree-wide registration sequence; delivery follows it
    pub(crate) order: u64,
}

impl RegisteredObserver {
    pub fn new(observer: ObserverId, options: MutationObserverInit, callback: MutationCallback) -> Self {
        Self {
            observer,
            options,
            callback,
            order: 0,
        }
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    pub fn options(&self) -> &MutationObserverInit {
        &self.options
    }
}

impl fmt::Debug for RegisteredObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredObserver")
            .field("observer", &self.observer)
            .field("options", &self.options)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl MutationObserver {
    pub fn new(callback: impl Fn(&[MutationRecord]) + 'static) -> Self {
        Self {
            id: ObserverId::next(),
            callback: Rc::new(callback),
            observed: Vec::new(),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Nodes this observer is currently registered on
    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    /// Register on `target`. Observing the same node again replaces the
    /// options of the existing registration.
    pub fn observe(
        &mut self,
        tree: &mut DomTree,
        target: NodeId,
        options: MutationObserverInit,
    ) -> DomResult<()> {
        options.validate()?;
        let registration = RegisteredObserver::new(self.id, options, Rc::clone(&self.callback));
        tree.register_observer(target, registration)?;
        if !self.observed.contains(&target) {
            self.observed.push(target);
        }
        Ok(())
    }

    /// Remove every registration this observer holds
    pub fn disconnect(&mut self, tree: &mut DomTree) {
        for target in self.observed.drain(..) {
            tree.unregister_observer(target, self.id);
        }
    }
}

impl fmt::Debug for MutationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationObserver")
            .field("id", &self.id)
            .field("observed", &self.observed)
            .finish_non_exhaustive()
    }
}
