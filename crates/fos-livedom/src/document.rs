//! Document - High-level document API

use crate::collection::LiveCollection;
use crate::operations::{DomResult, NodeOperations};
use crate::{Config, DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `html > head + body`
    pub fn new(url: &str) -> DomResult<Self> {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html)?;
        tree.append_child(html, head)?;
        tree.append_child(html, body)?;

        tracing::debug!("Created document for {}", url);
        Ok(Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        })
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self::with_config(url, Config::default())
    }

    /// Create an empty document with explicit tree configuration
    pub fn with_config(url: &str, config: Config) -> Self {
        Self {
            tree: DomTree::with_config(config),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        LiveCollection::by_tag_name(self.head_element, "title")
            .item(&self.tree, 0)
            .and_then(|title| self.tree.text_content(title))
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.is_valid().then_some(self.html_element)
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.is_valid().then_some(self.head_element)
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.is_valid().then_some(self.body_element)
    }

    /// Get element by ID, in tree order
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// Live collection of elements with the given tag name
    pub fn get_elements_by_tag_name(&self, tag: &str) -> LiveCollection {
        LiveCollection::by_tag_name(self.tree.root(), tag)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}
