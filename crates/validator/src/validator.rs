//! Validation entry point.
//!
//! [`Validator`] ties the pieces together: it asks the [`Registry`] for the
//! root rule set, replaces object markers with the rule sets of the nested
//! values, runs the [`Engine`] and optionally flattens the result.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::collaborators::{Collaborators, FileReader, MailExchangeLookup, UsernameLookup};
use crate::engine::Engine;
use crate::foundation::{Error, ErrorTree};
use crate::registry::Registry;
use crate::rule::{RuleEntry, RuleSet};

/// A domain type whose rules live in a [`Registry`] under [`TYPE_KEY`].
///
/// Instances reach the engine through their `serde` JSON form, so field keys
/// in rule sets are the serialized field names.
///
/// [`TYPE_KEY`]: Validatable::TYPE_KEY
pub trait Validatable: Serialize {
    /// Registry key of the type's resolver.
    const TYPE_KEY: &'static str;
}

/// Validates instances against the rules registered for their type.
///
/// # Examples
///
/// ```
/// use formguard_validator::prelude::*;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Signup {
///     first_name: String,
///     email: String,
/// }
///
/// impl Validatable for Signup {
///     const TYPE_KEY: &'static str = "Signup";
/// }
///
/// let registry = Registry::new();
/// registry.register_typed::<Signup, _>(|_| {
///     Ok(RuleSet::new()
///         .rule(Rule::new("first name", "firstName", RuleOptions::string().length(4, 50))?)
///         .rule(Rule::email("email", "email")?))
/// });
///
/// let signup = Signup { first_name: "Bob".into(), email: "a@@b.com".into() };
/// let errors = Validator::new(&registry).validate_flattened(&signup)?;
///
/// assert_eq!(errors["firstName"], "First name is too short. This field must be at least 4 characters.");
/// assert_eq!(errors["email"], "Email address contains multiple '@' symbols.");
/// # Ok::<(), formguard_validator::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    registry: &'r Registry,
    engine: Engine,
}

impl<'r> Validator<'r> {
    /// Validator over `registry` with default collaborators.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            engine: Engine::default(),
        }
    }

    /// Replaces every collaborator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.engine = Engine::new(collaborators);
        self
    }

    /// Replaces the mail-exchange lookup used by email rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_mail_exchange(self, lookup: impl MailExchangeLookup + 'static) -> Self {
        let collaborators = self.engine.collaborators().clone().with_mail_exchange(lookup);
        self.with_collaborators(collaborators)
    }

    /// Replaces the username lookup used by username email rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_usernames(self, lookup: impl UsernameLookup + 'static) -> Self {
        let collaborators = self.engine.collaborators().clone().with_usernames(lookup);
        self.with_collaborators(collaborators)
    }

    /// Replaces the reader used by image rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_files(self, reader: impl FileReader + 'static) -> Self {
        let collaborators = self.engine.collaborators().clone().with_files(reader);
        self.with_collaborators(collaborators)
    }

    /// The registry rules are resolved from.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Validates `instance`, recording each failure as its message.
    pub fn validate<T: Validatable>(&self, instance: &T) -> Result<ErrorTree, Error> {
        self.validate_value(T::TYPE_KEY, &serde_json::to_value(instance)?, true)
    }

    /// Validates `instance`, keeping full error values.
    pub fn validate_detailed<T: Validatable>(&self, instance: &T) -> Result<ErrorTree, Error> {
        self.validate_value(T::TYPE_KEY, &serde_json::to_value(instance)?, false)
    }

    /// Validates `instance` and flattens the result to dot paths.
    pub fn validate_flattened<T: Validatable>(
        &self,
        instance: &T,
    ) -> Result<IndexMap<String, String>, Error> {
        self.validate(instance).map(|tree| tree.flatten())
    }

    /// Validates an untyped instance registered under `type_key`.
    ///
    /// # Errors
    ///
    /// [`Error::Registration`] when `type_key` (or a nested marker's type
    /// key) cannot be resolved, and whatever the resolvers return.
    pub fn validate_value(
        &self,
        type_key: &str,
        instance: &Value,
        flatten: bool,
    ) -> Result<ErrorTree, Error> {
        let rules = self.registry.rules_for(type_key, instance)?;
        let tree = self.validate_with(rules, instance, flatten)?;
        debug!(
            type_key,
            errors = tree.leaf_count(),
            valid = tree.is_empty(),
            "validation finished"
        );
        Ok(tree)
    }

    /// Validates `instance` against an explicit rule set.
    ///
    /// Object markers in `rules` are still resolved through the registry.
    pub fn validate_with(
        &self,
        rules: RuleSet,
        instance: &Value,
        flatten: bool,
    ) -> Result<ErrorTree, Error> {
        let rules = self.expand(rules, instance)?;
        Ok(self.engine.execute(&rules, instance, flatten))
    }

    fn resolve_nested(&self, type_key: &str, instance: &Value) -> Result<RuleSet, Error> {
        let rules = self.registry.rules_for(type_key, instance)?;
        self.expand(rules, instance)
    }

    /// Replaces markers with resolved rule sets, following `instance`.
    fn expand(&self, rules: RuleSet, instance: &Value) -> Result<RuleSet, Error> {
        if !rules.has_markers() {
            return Ok(rules);
        }

        let mut expanded = RuleSet::new();
        for (key, entry) in rules {
            let field = instance.get(key.as_str());
            let entry = match entry {
                RuleEntry::Object(marker) => match field {
                    None | Some(Value::Null) => continue,
                    Some(object @ Value::Object(_)) => {
                        RuleEntry::Nested(self.resolve_nested(marker.type_key(), object)?)
                    }
                    // the engine reports the shape mismatch
                    Some(_) => RuleEntry::Nested(RuleSet::new()),
                },
                RuleEntry::ObjectArray(marker) => match field {
                    None | Some(Value::Null) => continue,
                    Some(Value::Array(items)) => {
                        let mut by_index = IndexMap::with_capacity(items.len());
                        for (index, item) in items.iter().enumerate() {
                            let rules = if item.is_object() {
                                self.resolve_nested(marker.type_key(), item)?
                            } else {
                                RuleSet::new()
                            };
                            by_index.insert(index, rules);
                        }
                        RuleEntry::Indexed(by_index)
                    }
                    Some(_) => RuleEntry::Indexed(IndexMap::new()),
                },
                RuleEntry::Nested(nested) => match field {
                    Some(object @ Value::Object(_)) => {
                        RuleEntry::Nested(self.expand(nested, object)?)
                    }
                    _ => RuleEntry::Nested(nested),
                },
                RuleEntry::Indexed(by_index) => {
                    let items = field.and_then(Value::as_array);
                    let mut resolved = IndexMap::with_capacity(by_index.len());
                    for (index, nested) in by_index {
                        let nested = match items.and_then(|items| items.get(index)) {
                            Some(item @ Value::Object(_)) => self.expand(nested, item)?,
                            _ => nested,
                        };
                        resolved.insert(index, nested);
                    }
                    RuleEntry::Indexed(resolved)
                }
                rule @ RuleEntry::Rule(_) => rule,
            };
            expanded.insert(key, entry);
        }

        Ok(expanded)
    }
}

impl Validator<'static> {
    /// Validator over [`Registry::global`].
    pub fn global() -> Self {
        Self::new(Registry::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::LookupError;
    use crate::foundation::{ErrorNode, RegistrationError, StructuralError};
    use crate::rule::Rule;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Registry {
        let registry = Registry::new();
        registry.register("Address", |_: &Value| {
            Ok(RuleSet::new()
                .rule(Rule::string("street", "street")?)
                .rule(Rule::string("postcode", "postcode")?))
        });
        registry.register("LineItem", |_: &Value| {
            Ok(RuleSet::new().rule(Rule::string("description", "description")?))
        });
        registry.register("Order", |_: &Value| {
            Ok(RuleSet::new()
                .rule(Rule::email("email", "email")?)
                .object("shipTo", "Address")
                .object_array("items", "LineItem"))
        });
        registry
    }

    #[test]
    fn expands_markers_from_the_instance() {
        let registry = registry();
        let order = json!({
            "email": "jane@example.com",
            "shipTo": { "street": "1 Main St", "postcode": "" },
            "items": [{ "description": "Widget" }, { "description": "" }],
        });
        let tree = Validator::new(&registry).validate_value("Order", &order, true).unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "shipTo": { "postcode": "Postcode is required." },
                "items": { "1": { "description": "Description is required." } },
            })
        );
    }

    #[test]
    fn absent_nested_values_are_skipped() {
        let registry = registry();
        let order = json!({ "email": "jane@example.com", "shipTo": null });
        let tree = Validator::new(&registry).validate_value("Order", &order, true).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn scalar_in_place_of_object_is_structural() {
        let registry = registry();
        let order = json!({ "email": "jane@example.com", "shipTo": "home", "items": "none" });
        let tree = Validator::new(&registry).validate_value("Order", &order, false).unwrap();
        assert!(matches!(
            tree.get("shipTo"),
            Some(ErrorNode::Structural(StructuralError::ExpectedObject))
        ));
        assert!(matches!(
            tree.get("items"),
            Some(ErrorNode::Structural(StructuralError::ExpectedObjectOrArray))
        ));
    }

    #[test]
    fn non_object_list_entries_are_flagged_by_index() {
        let registry = registry();
        let order = json!({
            "email": "jane@example.com",
            "items": [{ "description": "Widget" }, 7],
        });
        let flat = Validator::new(&registry)
            .validate_value("Order", &order, true)
            .unwrap()
            .flatten();
        assert_eq!(flat["items.1"], "Invalid item: expected object.");
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn unknown_nested_type_aborts() {
        let registry = Registry::new();
        registry.register("Order", |_: &Value| Ok(RuleSet::new().object("shipTo", "Address")));
        let err = Validator::new(&registry)
            .validate_value("Order", &json!({ "shipTo": {} }), true)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registration(RegistrationError::NotRegistered { ref type_key }) if type_key == "Address"
        ));
    }

    #[test]
    fn collaborators_reach_the_rules() {
        let registry = registry();
        let validator = Validator::new(&registry)
            .with_mail_exchange(|_: &str| Ok::<_, LookupError>(false));
        let tree = validator
            .validate_value("Order", &json!({ "email": "jane@example.com" }), true)
            .unwrap();
        assert_eq!(
            tree.get("email").and_then(ErrorNode::message).as_deref(),
            Some("The domain of the email address is invalid.")
        );
    }

    #[test]
    fn explicit_rule_sets_expand_markers_too() {
        let registry = registry();
        let rules = RuleSet::new().object("from", "Address");
        let tree = Validator::new(&registry)
            .validate_with(rules, &json!({ "from": { "street": "1 Main St" } }), true)
            .unwrap();
        assert_eq!(tree.flatten()["from.postcode"], "Postcode is required.");
    }
}
