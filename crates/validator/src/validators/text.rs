//! Free-text check.

use serde_json::Value;

use crate::foundation::{CheckContext, Validate, ValidationError, ValidationResult};

/// Accepts any string value.
///
/// With the generic stage enabled every scalar has already been rendered as
/// text, so this only rejects arrays, objects and values that skipped the
/// generic stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Text;

impl Validate for Text {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        if input.is_string() {
            Ok(())
        } else {
            Err(ValidationError::new(
                "not_a_string",
                format!("{} must be a string.", ctx.label),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;
    use serde_json::json;

    #[test]
    fn only_strings_pass() {
        let collaborators = Collaborators::default();
        let ctx = CheckContext {
            label: "Name",
            required: true,
            collaborators: &collaborators,
        };
        assert!(Text.validate(&json!("Ada"), &ctx).is_ok());
        assert!(Text.validate(&json!(""), &ctx).is_ok());
        let err = Text.validate(&json!(7), &ctx).unwrap_err();
        assert_eq!(err.message, "Name must be a string.");
        assert!(Text.validate(&Value::Null, &ctx).is_err());
    }
}
