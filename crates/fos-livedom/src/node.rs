//! DOM Node - Arena representation
//!
//! A node never owns its parent: `parent` is a plain [`NodeId`] into the
//! arena, while `children` is the owning, ordered edge.

use std::fmt;

use crate::NodeId;
use crate::observer::RegisteredObserver;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub(crate) parent: NodeId,
    /// Children in tree order
    pub(crate) children: Vec<NodeId>,
    /// Observers registered directly on this node, in registration order
    pub(crate) observers: Vec<RegisteredObserver>,
    /// Node-specific data
    pub(crate) data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            children: Vec::new(),
            observers: Vec::new(),
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::CharacterData(CharacterData::new(
            CharacterDataKind::Text,
            content,
        )))
    }

    /// Create a new comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::CharacterData(CharacterData::new(
            CharacterDataKind::Comment,
            content,
        )))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Parent node, if attached
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent.is_valid().then_some(self.parent)
    }

    /// Children in tree order
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Node-specific data
    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// DOM node type
    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::CharacterData(cd) => match cd.kind {
                CharacterDataKind::Text => NodeType::Text,
                CharacterDataKind::Comment => NodeType::Comment,
            },
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a leaf content node (text or comment)
    #[inline]
    pub fn is_character_data(&self) -> bool {
        matches!(self.data, NodeData::CharacterData(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get character data if this is a text or comment node
    #[inline]
    pub fn as_character_data(&self) -> Option<&CharacterData> {
        match &self.data {
            NodeData::CharacterData(cd) => Some(cd),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_character_data_mut(&mut self) -> Option<&mut CharacterData> {
        match &mut self.data {
            NodeData::CharacterData(cd) => Some(cd),
            _ => None,
        }
    }

    /// Check if this is an element with the given (already normalized) tag
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|e| e.tag == tag)
    }
}

/// DOM node type, with the numeric codes of `Node.nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Document,
}

impl NodeType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            3 => Some(NodeType::Text),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            _ => None,
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            NodeType::Element => 1,
            NodeType::Text => 3,
            NodeType::Comment => 8,
            NodeType::Document => 9,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text or comment payload
    CharacterData(CharacterData),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Selectedness (only meaningful for `<option>`)
    pub selectedness: bool,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            selectedness: false,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value;
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value,
        });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Check for a boolean attribute
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Which kind of leaf content node a payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterDataKind {
    Text,
    Comment,
}

/// Leaf content payload shared by text and comment nodes
///
/// There is exactly one stored string; `data`, `nodeValue` and
/// `textContent` all read and write it.
#[derive(Debug, Clone)]
pub struct CharacterData {
    kind: CharacterDataKind,
    content: String,
}

impl CharacterData {
    pub fn new(kind: CharacterDataKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    #[inline]
    pub fn kind(&self) -> CharacterDataKind {
        self.kind
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Swap in new content, handing back the previous value
    pub(crate) fn replace(&mut self, content: String) -> String {
        std::mem::replace(&mut self.content, content)
    }
}

impl fmt::Display for CharacterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CharacterDataKind::Comment => write!(f, "<!--{}-->", self.content),
            CharacterDataKind::Text => f.write_str(&self.content),
        }
    }
}
