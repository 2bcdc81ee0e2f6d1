//! Prelude module for convenient imports.
//!
//! Provides a single `use formguard_validator::prelude::*;` import that
//! brings in the types needed to declare rules and run validations.

// ============================================================================
// FOUNDATION: Traits, errors, reports
// ============================================================================

pub use crate::foundation::{
    CheckContext, ConfigError, Error, ErrorKey, ErrorNode, ErrorTree, RegistrationError,
    StructuralError, Validate, ValidationError, ValidationResult,
};

// ============================================================================
// RULES
// ============================================================================

pub use crate::rule::{Bounds, FieldKind, NumberRange, Rule, RuleEntry, RuleOptions, RuleSet};

// ============================================================================
// EXECUTION
// ============================================================================

pub use crate::collaborators::{Collaborators, LookupError};
pub use crate::engine::Engine;
pub use crate::flatten::flatten;
pub use crate::registry::Registry;
pub use crate::validator::{Validatable, Validator};
