//! Password strength check.

use serde_json::Value;

use crate::foundation::{CheckContext, Validate, ValidationError, ValidationResult};

/// Requires an ASCII upper-case letter, an ASCII lower-case letter, a digit
/// and a special character.
///
/// Any character outside `[A-Za-z0-9]` counts as special, including `_` and
/// whitespace. Whitespace is otherwise allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Password;

const REQUIREMENTS: [(&str, &str, fn(char) -> bool); 4] = [
    ("missing_uppercase", "uppercase letter", |c| c.is_ascii_uppercase()),
    ("missing_lowercase", "lowercase letter", |c| c.is_ascii_lowercase()),
    ("missing_digit", "number", |c| c.is_ascii_digit()),
    ("missing_special", "special character", |c| !c.is_ascii_alphanumeric()),
];

impl Validate for Password {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        let text = input.as_str().unwrap_or_default();

        for (code, what, matches) in REQUIREMENTS {
            if !text.chars().any(matches) {
                return Err(ValidationError::new(
                    code,
                    format!("{} must contain at least one {what}.", ctx.label),
                ));
            }
        }

        Ok(())
    }
}
