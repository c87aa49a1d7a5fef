//! HTMLOptionsCollection
//!
//! The live option list of one `<select>`. `add` and `remove` are ordinary
//! tree edits on the select's subtree; `selectedIndex` reads and writes the
//! select itself.

use crate::collection::LiveCollection;
use crate::operations::{DomError, DomResult, NodeOperations};
use crate::{DomTree, NodeId};

const INTERFACE: &str = "HTMLOptionsCollection";

/// Where `add` should place the new element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsBefore {
    /// Before the option currently at this index. Negative indices make
    /// `add` a no-op; indices past the end append.
    Index(i32),
    /// Before this option, which must be in the collection
    Element(NodeId),
}

impl From<i32> for OptionsBefore {
    fn from(index: i32) -> Self {
        OptionsBefore::Index(index)
    }
}

impl From<NodeId> for OptionsBefore {
    fn from(element: NodeId) -> Self {
        OptionsBefore::Element(element)
    }
}

/// Options collection bound to a select element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsCollection {
    select: NodeId,
    options: LiveCollection,
}

impl OptionsCollection {
    /// Bind to `select`, which must be a `<select>` element
    pub fn new(tree: &DomTree, select: NodeId) -> DomResult<Self> {
        Ok(Self {
            select,
            options: tree.select_options(select)?,
        })
    }

    /// The controlling select element
    pub fn select(&self) -> NodeId {
        self.select
    }

    /// The underlying live view
    pub fn as_collection(&self) -> &LiveCollection {
        &self.options
    }

    pub fn length(&self, tree: &DomTree) -> usize {
        self.options.length(tree)
    }

    pub fn item(&self, tree: &DomTree, index: usize) -> Option<NodeId> {
        self.options.item(tree, index)
    }

    pub fn index_of(&self, tree: &DomTree, option: NodeId) -> Option<usize> {
        self.options.index_of(tree, option)
    }

    pub fn named_item(&self, tree: &DomTree, name: &str) -> Option<NodeId> {
        self.options.named_item(tree, name)
    }

    pub fn iter<'t>(&'t self, tree: &'t DomTree) -> impl Iterator<Item = NodeId> + 't {
        self.options.iter(tree)
    }

    /// `selectedIndex`, read from the select
    pub fn selected_index(&self, tree: &DomTree) -> DomResult<i32> {
        tree.selected_index(self.select)
    }

    /// `selectedIndex`, written to the select
    pub fn set_selected_index(&self, tree: &mut DomTree, index: i32) -> DomResult<()> {
        tree.set_selected_index(self.select, index)
    }

    /// `HTMLOptionsCollection.add(element, before)`
    pub fn add(
        &self,
        tree: &mut DomTree,
        element: NodeId,
        before: Option<OptionsBefore>,
    ) -> DomResult<()> {
        let reference = match before {
            None => None,
            Some(OptionsBefore::Index(index)) => {
                let Ok(index) = usize::try_from(index) else {
                    tracing::trace!("Ignoring add() with negative index {}", index);
                    return Ok(());
                };
                self.item(tree, index)
            }
            Some(OptionsBefore::Element(option)) => {
                if self.index_of(tree, option).is_none() {
                    return Err(DomError::NotFound {
                        operation: "add",
                        interface: INTERFACE,
                        message: "The node before which the new node is to be inserted is not a child of this node.",
                    });
                }
                Some(option)
            }
        };

        let mut tree = tree.suppress_insert_validation();
        match reference {
            None => tree.append_child(self.select, element)?,
            Some(reference) => tree.insert_before(self.select, element, Some(reference))?,
        };
        Ok(())
    }

    /// `HTMLOptionsCollection.remove(index)`; a missing index does nothing
    pub fn remove(&self, tree: &mut DomTree, index: i32) -> DomResult<()> {
        let Some(option) = usize::try_from(index)
            .ok()
            .and_then(|i| self.item(tree, i))
        else {
            return Ok(());
        };
        let Some(parent) = tree.parent(option) else {
            return Ok(());
        };
        tree.remove_child(parent, option)?;
        Ok(())
    }
}
