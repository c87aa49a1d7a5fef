//! Live Collections
//!
//! `HTMLCollection`-style views. A collection stores only its root and its
//! filter; every `length`, `item` or `index_of` walks the tree as it is now,
//! so edits made anywhere between two calls are always visible.

use crate::tree::Descendants;
use crate::{DomTree, NodeId};

/// Which part of the tree under the root a collection ranges over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionScope {
    /// Element children of the root
    Children,
    /// Element descendants of the root, in tree order
    Descendants,
    /// A select's list of options: its children, with each `optgroup` child
    /// replaced by that group's own children
    Options,
}

/// Live, index-addressable list of elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCollection {
    root: NodeId,
    scope: CollectionScope,
    /// `None` matches every element
    tag: Option<String>,
}

impl LiveCollection {
    /// Element children of `root` (`ParentNode.children`)
    pub fn children(root: NodeId) -> Self {
        Self {
            root,
            scope: CollectionScope::Children,
            tag: None,
        }
    }

    /// All element descendants of `root`
    pub fn descendants(root: NodeId) -> Self {
        Self {
            root,
            scope: CollectionScope::Descendants,
            tag: None,
        }
    }

    /// `getElementsByTagName`; `"*"` matches every element
    pub fn by_tag_name(root: NodeId, tag: &str) -> Self {
        Self {
            root,
            scope: CollectionScope::Descendants,
            tag: (tag != "*").then(|| tag.to_string()),
        }
    }

    /// `option` elements listed by the select at `root`
    pub fn options(root: NodeId) -> Self {
        Self {
            root,
            scope: CollectionScope::Options,
            tag: Some("option".to_string()),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scope(&self) -> CollectionScope {
        self.scope
    }

    /// Does `id` currently qualify, ignoring its position?
    fn accepts(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(elem) = tree.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        match &self.tag {
            Some(tag) => tree.tag_matches(&elem.tag, tag),
            None => true,
        }
    }

    /// Qualifying elements in collection order
    pub fn iter<'t>(&'t self, tree: &'t DomTree) -> impl Iterator<Item = NodeId> + 't {
        let source = match self.scope {
            CollectionScope::Children => Source::Children(tree.children(self.root).iter()),
            CollectionScope::Descendants => Source::Descendants(tree.descendants(self.root)),
            CollectionScope::Options => Source::Options {
                tree,
                outer: tree.children(self.root).iter(),
                group: Default::default(),
            },
        };
        source.filter(move |&id| self.accepts(tree, id))
    }

    /// Current number of elements
    pub fn length(&self, tree: &DomTree) -> usize {
        self.iter(tree).count()
    }

    pub fn is_empty(&self, tree: &DomTree) -> bool {
        self.iter(tree).next().is_none()
    }

    /// Element at `index`, or `None` when out of bounds
    pub fn item(&self, tree: &DomTree, index: usize) -> Option<NodeId> {
        self.iter(tree).nth(index)
    }

    /// Current position of `node`, or `None` when it is not in the collection
    pub fn index_of(&self, tree: &DomTree, node: NodeId) -> Option<usize> {
        self.iter(tree).position(|id| id == node)
    }

    /// First element whose `id` or `name` attribute equals `name`
    pub fn named_item(&self, tree: &DomTree, name: &str) -> Option<NodeId> {
        if name.is_empty() {
            return None;
        }
        self.iter(tree).find(|&id| {
            tree.get_attribute(id, "id") == Some(name) || tree.get_attribute(id, "name") == Some(name)
        })
    }

    /// Snapshot of the current contents
    pub fn to_vec(&self, tree: &DomTree) -> Vec<NodeId> {
        self.iter(tree).collect()
    }
}

enum Source<'t> {
    Children(std::slice::Iter<'t, NodeId>),
    Descendants(Descendants<'t>),
    /// Children of the root, stepping one level into each `optgroup`
    Options {
        tree: &'t DomTree,
        outer: std::slice::Iter<'t, NodeId>,
        group: std::slice::Iter<'t, NodeId>,
    },
}

impl<'t> Iterator for Source<'t> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        match self {
            Source::Children(iter) => iter.next().copied(),
            Source::Descendants(iter) => iter.next(),
            Source::Options { tree, outer, group } => loop {
                let tree: &'t DomTree = *tree;
                if let Some(&id) = group.next() {
                    return Some(id);
                }
                let &id = outer.next()?;
                if tree.get(id).is_some_and(|n| n.has_tag("optgroup")) {
                    *group = tree.children(id).iter();
                } else {
                    return Some(id);
                }
            },
        }
    }
}
