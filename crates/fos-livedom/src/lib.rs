//! fOS Live DOM - Node tree, live collections and mutation observers
//!
//! Arena-backed DOM core. Nodes are addressed by [`NodeId`], collections are
//! computed views over the current tree, and every committed mutation is
//! delivered synchronously to the registered [`MutationObserver`]s.

mod character_data;
mod collection;
mod config;
mod document;
mod forms;
mod node;
mod observer;
mod operations;
mod tree;

pub use collection::{CollectionScope, LiveCollection};
pub use config::Config;
pub use document::Document;
pub use forms::{OptionsBefore, OptionsCollection};
pub use node::{Attribute, CharacterData, CharacterDataKind, ElementData, Node, NodeData, NodeType};
pub use observer::{
    MutationCallback, MutationObserver, MutationObserverInit, MutationRecord, MutationType,
    ObserverId, RegisteredObserver,
};
pub use operations::{DomError, DomErrorKind, DomResult, InsertValidationGuard, NodeOperations};
pub use tree::{Descendants, DomTree};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
