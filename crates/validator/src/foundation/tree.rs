//! The nested error report produced by a validation run.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde::ser::SerializeMap;

use crate::foundation::error::{StructuralError, ValidationError};

// ============================================================================
// ERROR KEY
// ============================================================================

/// One path segment of an [`ErrorTree`]: a property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKey {
    /// Object property.
    Field(String),
    /// Position inside an array-of-objects field.
    Index(usize),
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for ErrorKey {
    fn from(name: &str) -> Self {
        Self::Field(name.to_owned())
    }
}

impl From<String> for ErrorKey {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for ErrorKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

// ============================================================================
// ERROR NODE
// ============================================================================

/// A value stored in an [`ErrorTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorNode {
    /// Message-only failure (flattened mode).
    Message(String),
    /// Full rule violation (detailed mode).
    Field(ValidationError),
    /// Shape mismatch (detailed mode).
    Structural(StructuralError),
    /// Failures of a nested object or of the elements of an array field.
    Nested(ErrorTree),
}

impl ErrorNode {
    /// The human-readable message of a leaf node, `None` for nested nodes.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Message(message) => Some(message.clone()),
            Self::Field(error) => Some(error.message.clone()),
            Self::Structural(error) => Some(error.to_string()),
            Self::Nested(_) => None,
        }
    }

    /// Returns the subtree of a nested node.
    pub fn as_tree(&self) -> Option<&ErrorTree> {
        match self {
            Self::Nested(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the rule violation of a detailed leaf.
    pub fn as_field_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Field(error) => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// ERROR TREE
// ============================================================================

/// Ordered mapping from [`ErrorKey`] to [`ErrorNode`].
///
/// Keys appear in rule-set order; a key is present only if something under it
/// failed. An empty tree means the instance is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    entries: IndexMap<ErrorKey, ErrorNode>,
}

impl ErrorTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of direct entries (not leaves).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Inserts a node, replacing any previous node under the same key.
    pub fn insert(&mut self, key: impl Into<ErrorKey>, node: ErrorNode) {
        self.entries.insert(key.into(), node);
    }

    /// Looks up a direct entry.
    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&ErrorNode> {
        self.entries.get(&key.into())
    }

    /// Follows a path of keys into nested trees.
    ///
    /// ```
    /// use formguard_validator::foundation::{ErrorKey, ErrorNode, ErrorTree};
    ///
    /// let mut item = ErrorTree::new();
    /// item.insert("description", ErrorNode::Message("Description is required.".into()));
    /// let mut items = ErrorTree::new();
    /// items.insert(0_usize, ErrorNode::Nested(item));
    /// let mut root = ErrorTree::new();
    /// root.insert("items", ErrorNode::Nested(items));
    ///
    /// let path = [ErrorKey::from("items"), ErrorKey::Index(0), ErrorKey::from("description")];
    /// let leaf = root.get_path(&path).and_then(ErrorNode::message);
    /// assert_eq!(leaf.as_deref(), Some("Description is required."));
    /// ```
    pub fn get_path(&self, path: &[ErrorKey]) -> Option<&ErrorNode> {
        let (first, rest) = path.split_first()?;
        let node = self.entries.get(first)?;
        if rest.is_empty() {
            Some(node)
        } else {
            node.as_tree()?.get_path(rest)
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ErrorKey, ErrorNode> {
        self.entries.iter()
    }

    /// Total number of leaf failures at any depth.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                ErrorNode::Nested(tree) => tree.leaf_count(),
                _ => 1,
            })
            .sum()
    }

    /// Converts the tree into a dot-path keyed map. See [`crate::flatten`].
    pub fn flatten(&self) -> IndexMap<String, String> {
        crate::flatten::flatten(self)
    }
}

impl<'a> IntoIterator for &'a ErrorTree {
    type Item = (&'a ErrorKey, &'a ErrorNode);
    type IntoIter = indexmap::map::Iter<'a, ErrorKey, ErrorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(&key.to_string(), node)?;
        }
        map.end()
    }
}
