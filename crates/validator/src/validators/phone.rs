//! Phone number check.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::foundation::{CheckContext, Validate, ValidationError, ValidationResult};

static PHONE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9\-+\s]+$").unwrap());

/// Validates a phone number written with digits, spaces, dashes and plus
/// signs.
///
/// The value must contain at least one digit, and nothing but the allowed
/// characters. Length is left to the generic stage.
///
/// # Examples
///
/// ```
/// use formguard_validator::rule::Rule;
/// use formguard_validator::collaborators::Collaborators;
/// use serde_json::json;
///
/// let phone = Rule::phone("phone", "phone")?;
/// let collaborators = Collaborators::default();
///
/// assert!(phone.validate_field(Some(&json!("+61 412-345")), &collaborators).is_ok());
/// assert!(phone.validate_field(Some(&json!("(02) 9876 5432")), &collaborators).is_err());
/// # Ok::<(), formguard_validator::foundation::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phone;

impl Validate for Phone {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        let text = match input {
            Value::String(text) => text.as_str(),
            _ => "",
        };

        if !text.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new(
                "not_a_number",
                format!("{} must be a number.", ctx.label),
            ));
        }

        if !PHONE_CHARS.is_match(text) {
            return Err(ValidationError::new(
                "invalid_phone",
                format!(
                    "{} must only contain numbers, spaces, dashes, or plus signs.",
                    ctx.label
                ),
            ));
        }

        Ok(())
    }
}
