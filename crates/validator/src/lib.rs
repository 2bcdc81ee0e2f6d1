//! # formguard-validator
//!
//! Declarative field validation for nested form data.
//!
//! ## Quick Start
//!
//! ```
//! use formguard_validator::prelude::*;
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! registry.register("Contact", |_: &serde_json::Value| {
//!     Ok(RuleSet::new()
//!         .rule(Rule::string("name", "name")?)
//!         .rule(Rule::phone("phone", "phone")?))
//! });
//!
//! let report = Validator::new(&registry)
//!     .validate_value("Contact", &json!({ "name": "Ada", "phone": "" }), true)?;
//! assert_eq!(report.flatten()["phone"], "Phone is required.");
//! # Ok::<(), formguard_validator::Error>(())
//! ```
//!
//! ## Building Blocks
//!
//! - [`Rule`](rule::Rule): one field, a generic stage (markup, required,
//!   length) followed by a type-specific [`Validate`](foundation::Validate)
//!   check
//! - [`RuleSet`](rule::RuleSet): ordered rules, nested sets, per-index sets
//!   and object markers
//! - [`Engine`](engine::Engine): walks a rule set over a JSON value and
//!   builds an [`ErrorTree`](foundation::ErrorTree)
//! - [`Registry`](registry::Registry): type key to rule-set resolver, with
//!   overrides
//! - [`Validator`]: resolves, expands markers, runs the engine
//! - [`flatten`](flatten::flatten): error tree to dot-path map
//!
//! Blocking lookups (MX records, existing usernames, uploaded file content)
//! go through the traits in [`collaborators`].

// ValidationError is returned by value from every check.
#![allow(clippy::result_large_err)]

pub mod collaborators;
pub mod engine;
pub mod flatten;
pub mod foundation;
pub mod prelude;
pub mod registry;
pub mod rule;
pub mod validator;
pub mod validators;

pub use foundation::{Error, ErrorTree, ValidationError};
pub use registry::Registry;
pub use validator::{Validatable, Validator};
