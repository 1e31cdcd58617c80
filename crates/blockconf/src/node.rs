//! Configuration tree
//!
//! A [`Node`] is one block of a file (the root stands for the whole file). It
//! holds:
//! - `values`: key → every value assigned to that key, in source order
//! - `children`: `(key, Node)` pairs in source order; repeated keys stay
//!   separate entries
//!
//! Nodes are built once, by the parser or a [`NodeBuilder`], and expose no
//! mutating API afterwards. Ownership is strictly tree-shaped: a child has no
//! link to its parent.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::parser::Parser;
use indexmap::IndexMap;
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

/// Label used in parse errors when the input has no path
pub const ANONYMOUS: &str = "<input>";

/// One parsed block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    values: IndexMap<String, Vec<String>>,
    children: Vec<(String, Node)>,
}

impl Node {
    /// Start building a node by hand
    #[inline]
    #[must_use]
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    /// Parse a whole document held in memory
    ///
    /// # Errors
    /// Returns `Error::Parse` on the first malformed line
    pub fn parse_str(text: &str) -> Result<Self> {
        Parser::default().parse(text.as_bytes(), ANONYMOUS)
    }

    /// Parse from a line source; `label` names it in error messages
    ///
    /// # Errors
    /// - `Error::Parse` on the first malformed line
    /// - `Error::Source` if reading fails
    pub fn from_reader(reader: impl BufRead, label: &str) -> Result<Self> {
        Parser::default().parse(reader, label)
    }

    /// Open and parse a file (`.gz` and `.zst` files are decompressed)
    ///
    /// # Errors
    /// - `Error::Source` if the file cannot be opened or read
    /// - `Error::Parse` on the first malformed line
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Parser::default().parse_path(path)
    }

    /// Parse a file with a specific configuration
    ///
    /// # Errors
    /// Same as [`Node::from_path`]
    pub fn from_path_with(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self> {
        Parser::new(config).parse_path(path)
    }

    /// Values by key, keys in first-assignment order
    pub fn values(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Child blocks in source order
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(k, n)| (k.as_str(), n))
    }

    /// Raw values for `key`; empty if the key is unknown
    #[must_use]
    pub fn raw_values(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct value keys
    pub fn value_keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Neither values nor children
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.children.is_empty()
    }

    pub(crate) fn push_value(&mut self, key: &str, value: &str) {
        self.values
            .entry(key.to_owned())
            .or_default()
            .push(value.to_owned());
    }

    pub(crate) fn push_child(&mut self, key: &str, child: Node) {
        self.children.push((key.to_owned(), child));
    }
}

impl Drop for Node {
    // Flattens the subtree so deep hand-built trees never recurse here.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some((_, mut child)) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

impl FromStr for Node {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

/// Builder for [`Node`]
///
/// # Example
/// ```rust,ignore
/// let tree = Node::builder()
///     .value("name", "cool tree")
///     .child("branch", Node::builder().value("broken", "yes").build())
///     .build();
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    /// Append a value for `key`
    pub fn value(mut self, key: &str, value: &str) -> Self {
        self.node.push_value(key, value);
        self
    }

    /// Append several values for `key`
    pub fn values<'a>(mut self, key: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        for value in values {
            self.node.push_value(key, value);
        }
        self
    }

    /// Append a child block
    pub fn child(mut self, key: &str, child: Node) -> Self {
        self.node.push_child(key, child);
        self
    }

    /// Append an empty child block
    pub fn empty_child(self, key: &str) -> Self {
        self.child(key, Node::default())
    }

    /// Finish
    #[must_use]
    pub fn build(self) -> Node {
        self.node
    }
}
