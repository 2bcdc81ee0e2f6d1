//! Recursive execution of rule sets.
//!
//! The engine walks a [`RuleSet`] in insertion order and looks every key up
//! in the target object. Plain rules validate the field value; nested and
//! indexed rule sets recurse into objects and arrays of objects. Keys without
//! failures are left out of the resulting [`ErrorTree`], so an empty tree
//! means the instance is valid.

use serde_json::Value;
use tracing::trace;

use crate::collaborators::Collaborators;
use crate::foundation::{ErrorKey, ErrorNode, ErrorTree, StructuralError};
use crate::rule::{RuleEntry, RuleSet};

/// Executes rule sets against JSON values.
///
/// # Examples
///
/// ```
/// use formguard_validator::engine::Engine;
/// use formguard_validator::rule::{Rule, RuleSet};
/// use serde_json::json;
///
/// let rules = RuleSet::new()
///     .rule(Rule::string("name", "name")?)
///     .nested("address", RuleSet::new().rule(Rule::string("city", "city")?));
///
/// let report = Engine::default().execute(
///     &rules,
///     &json!({ "name": "Ada", "address": { "city": "" } }),
///     true,
/// );
/// assert_eq!(report.flatten()["address.city"], "City is required.");
/// # Ok::<(), formguard_validator::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    collaborators: Collaborators,
}

impl Engine {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Collaborators handed to every rule.
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Validates `target` against `rules`.
    ///
    /// With `flatten` set, every failure is recorded as its message only;
    /// otherwise field failures keep the full
    /// [`ValidationError`](crate::foundation::ValidationError) and structural
    /// failures their [`StructuralError`].
    ///
    /// Properties are looked up on `target` when it is an object; any other
    /// target makes every property absent.
    pub fn execute(&self, rules: &RuleSet, target: &Value, flatten: bool) -> ErrorTree {
        let mut tree = ErrorTree::new();

        for (key, entry) in rules {
            let value = target.get(key.as_str());
            let node = match entry {
                RuleEntry::Rule(rule) => rule
                    .validate_field(value, &self.collaborators)
                    .err()
                    .map(|error| {
                        trace!(field = %key, code = %error.code, "field failed validation");
                        if flatten {
                            ErrorNode::Message(error.message)
                        } else {
                            ErrorNode::Field(error)
                        }
                    }),
                RuleEntry::Nested(nested) => match value {
                    Some(object @ Value::Object(_)) => {
                        self.descend(nested, object, flatten)
                    }
                    _ => Some(structural(key, StructuralError::ExpectedObject, flatten)),
                },
                RuleEntry::Indexed(by_index) => match value {
                    Some(Value::Array(items)) => {
                        let mut items_tree = ErrorTree::new();
                        for (&index, nested) in by_index {
                            let node = match items.get(index) {
                                Some(object @ Value::Object(_)) => {
                                    self.descend(nested, object, flatten)
                                }
                                _ => Some(structural(
                                    key,
                                    StructuralError::ExpectedObjectItem,
                                    flatten,
                                )),
                            };
                            if let Some(node) = node {
                                items_tree.insert(ErrorKey::Index(index), node);
                            }
                        }
                        (!items_tree.is_empty()).then_some(ErrorNode::Nested(items_tree))
                    }
                    _ => Some(structural(
                        key,
                        StructuralError::ExpectedObjectOrArray,
                        flatten,
                    )),
                },
                RuleEntry::Object(_) | RuleEntry::ObjectArray(_) => match value {
                    None | Some(Value::Null | Value::Object(_) | Value::Array(_)) => None,
                    Some(_) => Some(structural(
                        key,
                        StructuralError::ExpectedObjectOrArray,
                        flatten,
                    )),
                },
            };

            if let Some(node) = node {
                tree.insert(key.as_str(), node);
            }
        }

        tree
    }

    fn descend(&self, rules: &RuleSet, object: &Value, flatten: bool) -> Option<ErrorNode> {
        let nested = self.execute(rules, object, flatten);
        (!nested.is_empty()).then_some(ErrorNode::Nested(nested))
    }
}

fn structural(key: &str, error: StructuralError, flatten: bool) -> ErrorNode {
    trace!(field = %key, code = error.code(), "structural mismatch");
    if flatten {
        ErrorNode::Message(error.to_string())
    } else {
        ErrorNode::Structural(error)
    }
}
