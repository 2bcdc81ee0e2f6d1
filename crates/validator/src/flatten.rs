//! Dot-path flattening of error trees.
//!
//! Form templates bind errors by a single string key, e.g.
//! `items.0.description`. [`flatten`] turns a nested [`ErrorTree`] into that
//! shape.

use indexmap::IndexMap;

use crate::foundation::{ErrorNode, ErrorTree};

/// Flattens `tree` into a map from dot-joined path to message.
///
/// Paths appear in depth-first tree order. Field errors contribute their
/// message and structural errors their fixed text. When two paths collide
/// the later entry wins.
///
/// # Examples
///
/// ```
/// use formguard_validator::flatten::flatten;
/// use formguard_validator::foundation::{ErrorKey, ErrorNode, ErrorTree};
///
/// let mut item = ErrorTree::new();
/// item.insert("description", ErrorNode::Message("Description is required.".into()));
/// let mut items = ErrorTree::new();
/// items.insert(ErrorKey::Index(0), ErrorNode::Nested(item));
/// let mut tree = ErrorTree::new();
/// tree.insert("items", ErrorNode::Nested(items));
/// tree.insert("name", ErrorNode::Message("Name is required.".into()));
///
/// let flat = flatten(&tree);
/// assert_eq!(flat["items.0.description"], "Description is required.");
/// assert_eq!(flat["name"], "Name is required.");
/// ```
pub fn flatten(tree: &ErrorTree) -> IndexMap<String, String> {
    let mut flat = IndexMap::new();
    flatten_into(tree, "", &mut flat);
    flat
}

fn flatten_into(tree: &ErrorTree, prefix: &str, flat: &mut IndexMap<String, String>) {
    for (key, node) in tree {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };

        match node {
            ErrorNode::Nested(subtree) => flatten_into(subtree, &path, flat),
            ErrorNode::Message(message) => {
                flat.insert(path, message.clone());
            }
            ErrorNode::Field(error) => {
                flat.insert(path, error.message.clone());
            }
            ErrorNode::Structural(error) => {
                flat.insert(path, error.to_string());
            }
        }
    }
}
