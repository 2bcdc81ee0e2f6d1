//! Registration form example for formguard-validator
//!
//! Run with `cargo run --example registration` to see the flattened report
//! and the engine's debug events.

use formguard_validator::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    street: String,
    postcode: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Registration {
    account_type: String,
    first_name: String,
    business_name: Option<String>,
    email: String,
    password: String,
    address: Option<Address>,
}

impl Validatable for Address {
    const TYPE_KEY: &'static str = "Address";
}

impl Validatable for Registration {
    const TYPE_KEY: &'static str = "Registration";
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = Registry::new();
    registry.register_typed::<Address, _>(|_| {
        Ok(RuleSet::new()
            .rule(Rule::new("street", "street", RuleOptions::string().length(2, 100))?)
            .rule(Rule::new("postcode", "postcode", RuleOptions::string().length(4, 4))?))
    });
    registry.register_typed::<Registration, _>(|form| {
        let mut rules = RuleSet::new()
            .rule(Rule::string("account type", "accountType")?)
            .rule(Rule::new("first name", "firstName", RuleOptions::string().length(4, 50))?)
            .rule(Rule::new("email", "email", RuleOptions::email().username())?)
            .rule(Rule::password("password", "password")?)
            .object("address", Address::TYPE_KEY);
        if form.account_type == "business" {
            rules = rules.rule(Rule::string("business name", "businessName")?);
        }
        Ok(rules)
    });

    let validator = Validator::new(&registry)
        .with_usernames(|email: &str| Ok::<_, LookupError>(email == "admin@example.com"));

    let form = Registration {
        account_type: "business".into(),
        first_name: "Bob".into(),
        business_name: None,
        email: "admin@example.com".into(),
        password: "password".into(),
        address: Some(Address {
            street: "1 Main St".into(),
            postcode: "20".into(),
        }),
    };

    let errors = validator.validate_flattened(&form)?;
    if errors.is_empty() {
        println!("registration is valid");
    } else {
        println!("{} problem(s):", errors.len());
        for (path, message) in &errors {
            println!("  {path}: {message}");
        }
    }

    let detailed = validator.validate_detailed(&form)?;
    println!("{}", serde_json::to_string_pretty(&detailed)?);

    Ok(())
}
