//! Tree Configuration

/// DOM tree configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// HTML document semantics: tag names are stored lower-case and
    /// `node_name` reports them upper-case
    pub html_document: bool,

    /// Number of node slots to preallocate in the arena
    pub node_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            html_document: true,
            node_capacity: 64,
        }
    }
}

impl Config {
    /// Configuration for an XML document (tag names kept verbatim)
    pub fn xml() -> Self {
        Self {
            html_document: false,
            ..Self::default()
        }
    }
}
