//! The trait every type-specific check implements.

use std::fmt;

use serde_json::Value;

use crate::collaborators::Collaborators;
use crate::foundation::ValidationResult;

// ============================================================================
// CHECK CONTEXT
// ============================================================================

/// What a type-specific check may know about the rule running it.
///
/// Borrowed for the duration of one [`Rule::validate_field`] call.
///
/// [`Rule::validate_field`]: crate::rule::Rule::validate_field
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    /// Display label of the rule, first letter upper-cased.
    pub label: &'a str,
    /// Whether the rule was configured as required.
    pub required: bool,
    /// Injected blocking lookups.
    pub collaborators: &'a Collaborators,
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("label", &self.label)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// A type-specific check, the last stage of a rule's pipeline.
///
/// The input is the field value after the generic stage: trimmed text wrapped
/// in [`Value::String`] when generic validation is enabled and the value is a
/// scalar, the raw value otherwise. Absent properties arrive as
/// [`Value::Null`].
///
/// Checks return at most one error; the first failing condition wins.
///
/// # Examples
///
/// ```
/// use formguard_validator::foundation::{CheckContext, Validate, ValidationError, ValidationResult};
/// use serde_json::Value;
///
/// #[derive(Debug)]
/// struct Postcode;
///
/// impl Validate for Postcode {
///     fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
///         match input.as_str() {
///             Some(code) if code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
///             _ => Err(ValidationError::new(
///                 "invalid_postcode",
///                 format!("{} must be a four digit postcode.", ctx.label),
///             )),
///         }
///     }
/// }
/// ```
pub trait Validate: fmt::Debug + Send + Sync {
    /// Runs the check.
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()>;
}

impl<V: Validate + ?Sized> Validate for Box<V> {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        (**self).validate(input, ctx)
    }
}

impl<V: Validate + ?Sized> Validate for std::sync::Arc<V> {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        (**self).validate(input, ctx)
    }
}
