//! Integration test: account registration form
//!
//! A typed form with conditional fields, credentials and a username check.

use formguard_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Registration {
    account_type: String,
    first_name: String,
    business_name: Option<String>,
    email: String,
    phone: String,
    password: String,
    age: Option<u32>,
}

impl Validatable for Registration {
    const TYPE_KEY: &'static str = "Registration";
}

impl Registration {
    fn valid() -> Self {
        Self {
            account_type: "personal".into(),
            first_name: "Grace".into(),
            business_name: None,
            email: "grace@example.com".into(),
            phone: "+61 412 345".into(),
            password: "Str0ng!pass".into(),
            age: Some(36),
        }
    }
}

fn registry() -> Registry {
    let registry = Registry::new();
    registry.register_typed::<Registration, _>(|form| {
        let mut rules = RuleSet::new()
            .rule(Rule::string("account type", "accountType")?)
            .rule(Rule::new(
                "first name",
                "firstName",
                RuleOptions::string().length(4, 50),
            )?)
            .rule(Rule::new("email", "email", RuleOptions::email().username())?)
            .rule(Rule::phone("phone", "phone")?)
            .rule(Rule::password("password", "password")?)
            .rule(Rule::new(
                "age",
                "age",
                RuleOptions::number()
                    .unbounded()
                    .number_range(18.0, 120.0)
                    .optional(),
            )?);

        if form.account_type == "business" {
            rules = rules.rule(Rule::new(
                "business name",
                "businessName",
                RuleOptions::string().length(2, 150),
            )?);
        }
        Ok(rules)
    });
    registry
}

#[test]
fn valid_form_has_no_errors() {
    let registry = registry();
    let errors = Validator::new(&registry)
        .validate(&Registration::valid())
        .unwrap();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn required_takes_precedence_over_length() {
    let registry = registry();
    let form = Registration {
        first_name: "   ".into(),
        ..Registration::valid()
    };
    let errors = Validator::new(&registry).validate_flattened(&form).unwrap();
    assert_eq!(errors["firstName"], "First name is required.");
}

#[test]
fn too_short_names_the_minimum() {
    let registry = registry();
    let form = Registration {
        first_name: "Bob".into(),
        ..Registration::valid()
    };
    let errors = Validator::new(&registry).validate_detailed(&form).unwrap();
    let error = errors
        .get("firstName")
        .and_then(ErrorNode::as_field_error)
        .unwrap();
    assert_eq!(error.code, "too_short");
    assert_eq!(error.param("min"), Some("4"));
    assert_eq!(
        error.message,
        "First name is too short. This field must be at least 4 characters."
    );
    assert_eq!(error.field, "firstName");
    assert_eq!(error.kind, FieldKind::String);
}

#[test]
fn conditional_field_only_for_business_accounts() {
    let registry = registry();
    let validator = Validator::new(&registry);

    let personal = Registration::valid();
    assert!(validator.validate(&personal).unwrap().is_empty());

    let business = Registration {
        account_type: "business".into(),
        ..Registration::valid()
    };
    let errors = validator.validate_flattened(&business).unwrap();
    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        ["businessName"],
        "business accounts need a business name"
    );
    assert_eq!(errors["businessName"], "Business name is required.");
}

#[test]
fn double_at_sign_reports_multiple_symbols() {
    let registry = registry();
    let form = Registration {
        email: "a@@b.com".into(),
        ..Registration::valid()
    };
    let errors = Validator::new(&registry).validate_flattened(&form).unwrap();
    assert_eq!(errors["email"], "Email address contains multiple '@' symbols.");
}

#[test]
fn taken_username_is_rejected() {
    let registry = registry();
    let validator = Validator::new(&registry).with_usernames(|address: &str| {
        Ok::<_, LookupError>(address == "grace@example.com")
    });
    let errors = validator.validate_flattened(&Registration::valid()).unwrap();
    assert_eq!(
        errors["email"],
        "Username already exists. Please choose a different one."
    );
}

#[test]
fn weak_password_and_bad_phone_both_reported() {
    let registry = registry();
    let form = Registration {
        password: "alllowercase1!".into(),
        phone: "(02) 98765".into(),
        ..Registration::valid()
    };
    let errors = Validator::new(&registry).validate_flattened(&form).unwrap();
    assert_eq!(
        errors["password"],
        "Password must contain at least one uppercase letter."
    );
    assert_eq!(
        errors["phone"],
        "Phone must only contain numbers, spaces, dashes, or plus signs."
    );
}

#[test]
fn optional_number_still_runs_its_type_check() {
    let registry = registry();
    let validator = Validator::new(&registry);

    let no_age = Registration {
        age: None,
        ..Registration::valid()
    };
    let errors = validator.validate_flattened(&no_age).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["age"], "Age must be a number.");

    let minor = Registration {
        age: Some(12),
        ..Registration::valid()
    };
    let errors = validator.validate_flattened(&minor).unwrap();
    assert_eq!(errors["age"], "Age must be between 18 and 120.");
}

#[test]
fn markup_is_rejected_before_anything_else() {
    let registry = registry();
    let form = Registration {
        first_name: "<script>x</script>".into(),
        ..Registration::valid()
    };
    let errors = Validator::new(&registry).validate_flattened(&form).unwrap();
    assert_eq!(errors["firstName"], "First name cannot contain HTML tags.");
}

#[test]
fn rule_options_load_from_configuration() {
    let options: RuleOptions = serde_json::from_value(serde_json::json!({
        "fieldKind": "number",
        "minLength": 1,
        "maxLength": 3,
        "numberRange": { "min": 1, "max": 500 },
    }))
    .unwrap();
    let rule = Rule::new("quantity", "quantity", options).unwrap();
    let collaborators = Collaborators::default();

    assert!(rule
        .validate_field(Some(&serde_json::json!(42)), &collaborators)
        .is_ok());
    assert_eq!(
        rule.validate_field(Some(&serde_json::json!(501)), &collaborators)
            .unwrap_err()
            .message,
        "Quantity must be between 1 and 500."
    );
}
