//! Numeric check with an optional inclusive range.

use serde_json::Value;

use crate::foundation::{CheckContext, ConfigError, Validate, ValidationError, ValidationResult};
use crate::rule::NumberRange;

/// Validates that a value is numeric and, when both ends of the range are
/// configured, inside it.
///
/// Accepts JSON numbers and numeric text (`"42"`, `"-1.5"`, `"1e3"`).
/// Non-finite values are rejected.
///
/// # Examples
///
/// ```
/// use formguard_validator::collaborators::Collaborators;
/// use formguard_validator::foundation::{CheckContext, Validate};
/// use formguard_validator::rule::NumberRange;
/// use formguard_validator::validators::Number;
/// use serde_json::json;
///
/// let age = Number::new("age", NumberRange { min: Some(18.0), max: Some(120.0) })?;
/// let collaborators = Collaborators::default();
/// let ctx = CheckContext { label: "Age", required: true, collaborators: &collaborators };
///
/// assert!(age.validate(&json!("42"), &ctx).is_ok());
/// assert_eq!(
///     age.validate(&json!(12), &ctx).unwrap_err().message,
///     "Age must be between 18 and 120."
/// );
/// # Ok::<(), formguard_validator::foundation::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Number {
    range: NumberRange,
}

impl Number {
    /// Creates a numeric check. `property` only labels configuration errors.
    pub fn new(property: &str, range: NumberRange) -> Result<Self, ConfigError> {
        match range.ends() {
            Some((min, max)) if !range.is_ordered() => Err(ConfigError::NumberRange {
                property: property.to_owned(),
                min,
                max,
            }),
            _ => Ok(Self { range }),
        }
    }

    /// The configured range.
    pub fn range(&self) -> NumberRange {
        self.range
    }
}

/// Reads a finite number from a JSON number or numeric text.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

impl Validate for Number {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        let Some(number) = as_number(input) else {
            return Err(ValidationError::new(
                "not_a_number",
                format!("{} must be a number.", ctx.label),
            ));
        };

        let Some((min, max)) = self.range.ends() else {
            return Ok(());
        };

        if number < min || number > max {
            return Err(ValidationError::new(
                "out_of_range",
                format!("{} must be between {min} and {max}.", ctx.label),
            )
            .with_param("min", min)
            .with_param("max", max));
        }

        Ok(())
    }
}
