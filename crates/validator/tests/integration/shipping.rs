//! Integration test: shipping order with nested addresses and line items
//!
//! Exercises marker expansion, structural errors and flattening.

use formguard_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    street: String,
    postcode: String,
    state: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItem {
    description: String,
    length_cm: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Shipment {
    name: String,
    from_address: Option<Address>,
    items: Vec<LineItem>,
}

impl Validatable for Address {
    const TYPE_KEY: &'static str = "Address";
}

impl Validatable for LineItem {
    const TYPE_KEY: &'static str = "LineItem";
}

impl Validatable for Shipment {
    const TYPE_KEY: &'static str = "Shipment";
}

fn registry() -> Registry {
    let registry = Registry::new();
    registry.register_typed::<Address, _>(|_| {
        Ok(RuleSet::new()
            .rule(Rule::new("street", "street", RuleOptions::string().length(2, 100))?)
            .rule(Rule::new("postcode", "postcode", RuleOptions::string().length(4, 4))?)
            .rule(Rule::string("state", "state")?))
    });
    registry.register_typed::<LineItem, _>(|_| {
        Ok(RuleSet::new()
            .rule(Rule::string("description", "description")?)
            .rule(Rule::new(
                "length",
                "lengthCm",
                RuleOptions::number().number_range(1.0, 200.0),
            )?))
    });
    // untyped, so malformed shipments still reach the engine
    registry.register(Shipment::TYPE_KEY, |_: &Value| {
        Ok(RuleSet::new()
            .rule(Rule::string("name", "name")?)
            .object("fromAddress", Address::TYPE_KEY)
            .object_array("items", LineItem::TYPE_KEY))
    });
    registry
}

fn address(postcode: &str, state: &str) -> Address {
    Address {
        street: "1 Main St".into(),
        postcode: postcode.into(),
        state: state.into(),
    }
}

fn item(description: &str, length_cm: f64) -> LineItem {
    LineItem {
        description: description.into(),
        length_cm,
    }
}

#[test]
fn valid_shipment_is_empty() {
    let registry = registry();
    let shipment = Shipment {
        name: "Spare parts".into(),
        from_address: Some(address("2000", "NSW")),
        items: vec![item("Gasket", 12.5), item("Bolt set", 4.0)],
    };
    assert!(Validator::new(&registry).validate(&shipment).unwrap().is_empty());
}

#[test]
fn nested_failures_keep_their_shape() {
    let registry = registry();
    let shipment = Shipment {
        name: String::new(),
        from_address: Some(address("", "")),
        items: vec![item("Gasket", 12.5), item("", 30.0)],
    };
    let tree = Validator::new(&registry).validate(&shipment).unwrap();
    assert_eq!(
        serde_json::to_value(&tree).unwrap(),
        json!({
            "name": "Name is required.",
            "fromAddress": {
                "postcode": "Postcode is required.",
                "state": "State is required.",
            },
            "items": {
                "1": { "description": "Description is required." },
            },
        })
    );
}

#[test]
fn flattening_joins_paths_with_dots() {
    let registry = registry();
    let shipment = Shipment {
        name: String::new(),
        from_address: Some(address("", "")),
        items: vec![item("", 12.5)],
    };
    let flat = Validator::new(&registry).validate_flattened(&shipment).unwrap();
    let pairs: Vec<(&str, &str)> = flat.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        pairs,
        [
            ("name", "Name is required."),
            ("fromAddress.postcode", "Postcode is required."),
            ("fromAddress.state", "State is required."),
            ("items.0.description", "Description is required."),
        ]
    );
}

#[test]
fn second_item_failure_after_first_passes() {
    let registry = registry();
    let shipment = Shipment {
        name: "Spare parts".into(),
        from_address: None,
        items: vec![item("Gasket", 12.5), item("Crate", 300.0)],
    };
    let flat = Validator::new(&registry).validate_flattened(&shipment).unwrap();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["items.1.lengthCm"], "Length must be between 1 and 200.");
}

#[test]
fn non_object_list_entry_is_flagged_at_its_index() {
    let registry = registry();
    let shipment = json!({
        "name": "Spare parts",
        "items": [{ "description": "Gasket", "lengthCm": 12.5 }, "not an item"],
    });
    let tree = Validator::new(&registry)
        .validate_value(Shipment::TYPE_KEY, &shipment, false)
        .unwrap();
    let items = tree.get("items").and_then(ErrorNode::as_tree).unwrap();
    assert_eq!(items.len(), 1);
    assert!(matches!(
        items.get(ErrorKey::Index(1)),
        Some(ErrorNode::Structural(StructuralError::ExpectedObjectItem))
    ));

    let flat = tree.flatten();
    assert_eq!(flat["items.1"], "Invalid item: expected object.");
}

#[test]
fn scalar_address_is_a_structural_error() {
    let registry = registry();
    let shipment = json!({ "name": "Spare parts", "fromAddress": "somewhere", "items": [] });
    let tree = Validator::new(&registry)
        .validate_value(Shipment::TYPE_KEY, &shipment, true)
        .unwrap();
    assert_eq!(
        tree.get("fromAddress").and_then(ErrorNode::message).as_deref(),
        Some("Invalid value: expected object.")
    );
}

#[test]
fn detailed_mode_keeps_error_values_at_depth() {
    let registry = registry();
    let shipment = Shipment {
        name: "Spare parts".into(),
        from_address: Some(address("20", "NSW")),
        items: vec![],
    };
    let tree = Validator::new(&registry).validate_detailed(&shipment).unwrap();
    let path = [ErrorKey::from("fromAddress"), ErrorKey::from("postcode")];
    let error = tree
        .get_path(&path)
        .and_then(ErrorNode::as_field_error)
        .unwrap();
    assert_eq!(error.code, "too_short");
    assert_eq!(error.rule, "Postcode");
    assert_eq!(error.param("min"), Some("4"));

    let json: Value = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["fromAddress"]["postcode"]["code"], "too_short");
    assert_eq!(json["fromAddress"]["postcode"]["field"], "postcode");
}

#[test]
fn hand_built_indexed_rules_run_without_registry() {
    let line = RuleSet::new().rule(Rule::string("description", "description").unwrap());
    let rules = RuleSet::new()
        .rule(Rule::string("name", "name").unwrap())
        .indexed("items", [(0, line.clone()), (1, line)]);
    let target = json!({ "name": "Parts", "items": [{ "description": "Gasket" }] });

    let tree = Engine::default().execute(&rules, &target, true);
    assert_eq!(tree.flatten()["items.1"], "Invalid item: expected object.");
}

#[test]
fn ill_typed_items_report_field_errors() {
    let registry = registry();
    let validator = Validator::new(&registry);

    let missing = json!({ "name": "Spare parts", "items": [{ "lengthCm": 5 }] });
    let flat = validator
        .validate_value(Shipment::TYPE_KEY, &missing, true)
        .unwrap()
        .flatten();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["items.0.description"], "Description is required.");

    let mistyped = json!({
        "name": "Spare parts",
        "fromAddress": { "street": "1 Main St", "postcode": 2000, "state": "NSW" },
        "items": [{ "description": "Gasket", "lengthCm": "long" }],
    });
    let flat = validator
        .validate_value(Shipment::TYPE_KEY, &mistyped, true)
        .unwrap()
        .flatten();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["items.0.lengthCm"], "Length must be a number.");
}
