//! Integration test: registry behaviour seen through the validator

use formguard_validator::prelude::*;
use serde_json::{Value, json};

fn name_rules(min: usize) -> impl Fn(&Value) -> Result<RuleSet, Error> + Send + Sync {
    move |_: &Value| {
        Ok(RuleSet::new().rule(Rule::new(
            "name",
            "name",
            RuleOptions::string().length(min, 50),
        )?))
    }
}

#[test]
fn re_registration_last_write_wins() {
    let registry = Registry::new();
    registry.register("Customer", name_rules(2));
    registry.register("Customer", name_rules(5));

    let flat = Validator::new(&registry)
        .validate_value("Customer", &json!({ "name": "Ada" }), true)
        .unwrap()
        .flatten();
    assert_eq!(
        flat["name"],
        "Name is too short. This field must be at least 5 characters."
    );
}

#[test]
fn unregistered_type_aborts_validation() {
    let registry = Registry::new();
    let err = Validator::new(&registry)
        .validate_value("Customer", &json!({}), true)
        .unwrap_err();
    assert!(matches!(err, Error::Registration(RegistrationError::NotRegistered { .. })));
    assert_eq!(
        err.to_string(),
        "no validation rules registered for type 'Customer'"
    );
}

#[test]
fn override_applies_to_nested_types() {
    let registry = Registry::new();
    registry.register("Customer", |_: &Value| Ok(RuleSet::new().object("contact", "Contact")));
    registry.register("Contact", name_rules(2));
    registry.register("StrictContact", name_rules(10));
    registry.declare_override("Contact", "StrictContact");

    let flat = Validator::new(&registry)
        .validate_value("Customer", &json!({ "contact": { "name": "Ada" } }), true)
        .unwrap()
        .flatten();
    assert_eq!(
        flat["contact.name"],
        "Name is too short. This field must be at least 10 characters."
    );
}

#[test]
fn global_registry_is_shared() {
    Registry::global().register("GlobalProbe", name_rules(2));
    assert!(Registry::global().contains("GlobalProbe"));

    let tree = Validator::global()
        .validate_value("GlobalProbe", &json!({ "name": "Ada" }), true)
        .unwrap();
    assert!(tree.is_empty());
}
