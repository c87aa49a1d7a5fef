//! Character Data - text and comment node content
//!
//! `data`, `nodeValue` and `textContent` are views of one stored string.
//! Every setter funnels into [`DomTree::set_data`], which commits the new
//! value and then delivers `characterData` records.

use crate::node::{CharacterData, NodeData};
use crate::observer::{MutationRecord, MutationType};
use crate::operations::{DomError, DomResult};
use crate::{DomTree, NodeId, NodeType};

impl DomTree {
    fn character_data(&self, operation: &'static str, id: NodeId) -> DomResult<&CharacterData> {
        self.node(operation, id)?
            .as_character_data()
            .ok_or(DomError::InvalidNodeType {
                operation,
                node: id,
                expected: "character data",
            })
    }

    /// `CharacterData.data`
    pub fn data(&self, id: NodeId) -> DomResult<&str> {
        Ok(self.character_data("data", id)?.content())
    }

    /// Replace a text or comment node's content
    pub fn set_data(&mut self, id: NodeId, value: impl Into<String>) -> DomResult<()> {
        let node = self.node_mut("data", id)?;
        let content = node.as_character_data_mut().ok_or(DomError::InvalidNodeType {
            operation: "data",
            node: id,
            expected: "character data",
        })?;
        let old_value = content.replace(value.into());
        self.notify(id, MutationType::CharacterData, move || {
            MutationRecord::character_data(id, old_value)
        });
        Ok(())
    }

    /// `CharacterData.length`, counted in UTF-16 code units
    pub fn length(&self, id: NodeId) -> DomResult<usize> {
        Ok(self.data(id)?.encode_utf16().count())
    }

    /// `CharacterData.appendData`
    pub fn append_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        let mut value = self.data(id)?.to_string();
        value.push_str(data);
        self.set_data(id, value)
    }

    /// `Node.nodeValue`: the content for text and comment nodes, `None`
    /// for elements and the document
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_character_data().map(CharacterData::content)
    }

    /// Setting `nodeValue` on an element or the document does nothing
    pub fn set_node_value(&mut self, id: NodeId, value: impl Into<String>) -> DomResult<()> {
        if self.node("nodeValue", id)?.is_character_data() {
            self.set_data(id, value)
        } else {
            Ok(())
        }
    }

    /// `Node.textContent`
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Document => None,
            NodeData::CharacterData(cd) => Some(cd.content().to_string()),
            NodeData::Element(_) => Some(
                self.descendants(id)
                    .filter_map(|d| self.get(d))
                    .filter(|n| n.node_type() == NodeType::Text)
                    .filter_map(|n| n.as_character_data())
                    .map(CharacterData::content)
                    .collect(),
            ),
        }
    }

    /// Set `Node.textContent`.
    ///
    /// Text and comment nodes alias `set_data`. Elements drop all children
    /// and gain a single text node (none for an empty string), reported as
    /// one `childList` record.
    pub fn set_text_content(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        match self.node("textContent", id)?.node_type() {
            NodeType::Document => Ok(()),
            NodeType::Text | NodeType::Comment => self.set_data(id, value),
            NodeType::Element => {
                let removed = self.children(id).to_vec();
                for &child in &removed {
                    self.unlink(child);
                }
                let added = if value.is_empty() {
                    Vec::new()
                } else {
                    let text = self.create_text(value);
                    self.link(id, text, 0);
                    vec![text]
                };
                if !removed.is_empty() || !added.is_empty() {
                    self.notify(id, MutationType::ChildList, || {
                        MutationRecord::child_list(id, added, removed, None, None)
                    });
                }
                Ok(())
            }
        }
    }

    /// Markup for a leaf content node: `<!--data-->` for comments, the raw
    /// data for text. No escaping is applied.
    pub fn node_to_string(&self, id: NodeId) -> Option<String> {
        self.get(id)?.as_character_data().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MutationObserver, MutationObserverInit, NodeOperations};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<MutationRecord>>>, MutationObserver) {
        let records = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&records);
        let observer = MutationObserver::new(move |batch: &[MutationRecord]| {
            sink.borrow_mut().extend_from_slice(batch);
        });
        (records, observer)
    }

    #[test]
    fn test_accessors_alias_one_value() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment("a");

        tree.set_data(comment, "b").unwrap();
        assert_eq!(tree.node_value(comment), Some("b"));
        assert_eq!(tree.text_content(comment).as_deref(), Some("b"));

        tree.set_node_value(comment, "c").unwrap();
        assert_eq!(tree.data(comment).unwrap(), "c");

        tree.set_text_content(comment, "d").unwrap();
        assert_eq!(tree.data(comment).unwrap(), "d");
        assert_eq!(tree.node_value(comment), Some("d"));
    }

    #[test]
    fn test_comment_to_string() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment("hi");
        assert_eq!(tree.node_to_string(comment).as_deref(), Some("<!--hi-->"));

        let text = tree.create_text("a & b");
        assert_eq!(tree.node_to_string(text).as_deref(), Some("a & b"));

        let div = tree.create_element("div");
        assert_eq!(tree.node_to_string(div), None);
    }

    #[test]
    fn test_no_interested_observer_no_record() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let comment = tree.create_comment("a");
        let sibling = tree.create_text("s");
        tree.append_child(div, comment).unwrap();
        tree.append_child(div, sibling).unwrap();

        let (records, mut observer) = recorder();
        observer
            .observe(&mut tree, comment, MutationObserverInit::child_list())
            .unwrap();
        observer
            .observe(&mut tree, sibling, MutationObserverInit::character_data_with_old_value())
            .unwrap();

        tree.set_data(comment, "b").unwrap();
        assert_eq!(tree.data(comment).unwrap(), "b");
        assert!(records.borrow().is_empty());
    }

    #[test]
    fn test_old_value_delivery() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment("before");
        let (records, mut observer) = recorder();
        observer
            .observe(&mut tree, comment, MutationObserverInit::character_data_with_old_value())
            .unwrap();

        tree.set_data(comment, "after").unwrap();

        let records = records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mutation_type, MutationType::CharacterData);
        assert_eq!(records[0].target, comment);
        assert_eq!(records[0].old_value.as_deref(), Some("before"));
    }

    #[test]
    fn test_old_value_not_requested() {
        let mut tree = DomTree::new();
        let text = tree.create_text("before");
        let (records, mut observer) = recorder();
        observer
            .observe(&mut tree, text, MutationObserverInit {
                character_data: true,
                ..Default::default()
            })
            .unwrap();

        tree.set_node_value(text, "after").unwrap();

        let records = records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].old_value, None);
    }

    #[test]
    fn test_child_list_only_observer_ignores_data() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment("a");
        let (records, mut observer) = recorder();
        observer
            .observe(&mut tree, comment, MutationObserverInit::child_list())
            .unwrap();

        tree.set_data(comment, "b").unwrap();
        assert!(records.borrow().is_empty());
    }

    #[test]
    fn test_append_data_and_length() {
        let mut tree = DomTree::new();
        let text = tree.create_text("ab");
        tree.append_data(text, "c😀").unwrap();
        assert_eq!(tree.data(text).unwrap(), "abc😀");
        assert_eq!(tree.length(text).unwrap(), 5);
    }

    #[test]
    fn test_element_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let a = tree.create_text("Hello, ");
        let b = tree.create_element("b");
        let c = tree.create_text("World");
        let note = tree.create_comment("ignored");
        tree.append_child(p, a).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, c).unwrap();
        tree.append_child(p, note).unwrap();

        assert_eq!(tree.text_content(p).as_deref(), Some("Hello, World"));
        assert_eq!(tree.node_value(p), None);

        tree.set_text_content(p, "replaced").unwrap();
        assert_eq!(tree.children(p).len(), 1);
        assert_eq!(tree.text_content(p).as_deref(), Some("replaced"));
        assert_eq!(tree.parent(b), None);

        tree.set_text_content(p, "").unwrap();
        assert!(tree.children(p).is_empty());
    }

    #[test]
    fn test_data_on_element_fails() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        assert!(tree.data(div).is_err());
        assert!(tree.set_data(div, "x").is_err());
        tree.set_node_value(div, "ignored").unwrap();
    }
}
