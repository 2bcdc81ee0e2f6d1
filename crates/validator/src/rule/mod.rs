//! Rules and rule sets
//!
//! A [`Rule`] binds one property of an instance to a validation pipeline:
//!
//! 1. **Generic stage** (unless disabled): render the value as text and trim
//!    it, reject markup tags, reject empty required values, then apply the
//!    length bounds when both are configured.
//! 2. **Type-specific stage**: the [`Validate`] check of the rule's kind.
//!
//! The pipeline stops at the first failure, so a field reports at most one
//! error per pass. [`Rule::validate_field_all`] is the variant that reports
//! every failing stage.
//!
//! ```
//! use formguard_validator::collaborators::Collaborators;
//! use formguard_validator::rule::{Rule, RuleOptions};
//! use serde_json::json;
//!
//! let rule = Rule::new("first name", "firstName", RuleOptions::string().length(4, 50))?;
//! let collaborators = Collaborators::default();
//!
//! let err = rule.validate_field(Some(&json!("  Bob ")), &collaborators).unwrap_err();
//! assert_eq!(err.message, "First name is too short. This field must be at least 4 characters.");
//! # Ok::<(), formguard_validator::foundation::ConfigError>(())
//! ```

pub mod bounds;
pub mod options;
pub mod set;

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::collaborators::Collaborators;
use crate::foundation::{CheckContext, ConfigError, Validate, ValidationError, ValidationResult};
use crate::validators::{Email, Image, Images, Number, Password, Phone, Text};

pub use bounds::{BoundViolation, Bounds, NumberRange};
pub use options::{DEFAULT_MAX_FILE_SIZE_MB, FieldKind, RuleOptions};
pub use set::{RuleEntry, RuleSet};

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

// ============================================================================
// RULE
// ============================================================================

/// A configured validation unit for one field.
#[derive(Clone)]
pub struct Rule {
    name: String,
    property: String,
    required: bool,
    length: Option<Bounds>,
    include_generic_validation: bool,
    kind: FieldKind,
    check: Arc<dyn Validate>,
}

impl Rule {
    /// Builds the rule for `options.field_kind`.
    ///
    /// `name` is the label used in messages (its first letter is upper-cased);
    /// `property` is the key read from the instance.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the options can never validate anything, e.g.
    /// `min_length > max_length`, or when the kind is
    /// [`FieldKind::Custom`] (use [`Rule::custom`]).
    pub fn new(
        name: impl Into<String>,
        property: impl Into<String>,
        options: RuleOptions,
    ) -> Result<Self, ConfigError> {
        let property = property.into();
        let check: Arc<dyn Validate> = match options.field_kind {
            FieldKind::String => Arc::new(Text),
            FieldKind::Number => Arc::new(Number::new(&property, options.number_range)?),
            FieldKind::Email => Arc::new(Email::new(options.is_username)),
            FieldKind::Phone => Arc::new(Phone),
            FieldKind::Password => Arc::new(Password),
            FieldKind::Image => Arc::new(Image::new(&property, options.max_file_size_mb)?),
            FieldKind::Images => Arc::new(Images::new(
                &property,
                options.max_file_size_mb,
                options.image_count_range,
            )?),
            FieldKind::Custom => {
                return Err(ConfigError::MissingCheck {
                    property,
                    kind: FieldKind::Custom,
                });
            }
        };
        Self::assemble(name.into(), property, &options, check)
    }

    /// Builds a rule around a caller-supplied check.
    ///
    /// The generic stage still follows `options`; the kind is recorded as
    /// [`FieldKind::Custom`].
    pub fn custom(
        name: impl Into<String>,
        property: impl Into<String>,
        options: RuleOptions,
        check: impl Validate + 'static,
    ) -> Result<Self, ConfigError> {
        let options = RuleOptions {
            field_kind: FieldKind::Custom,
            ..options
        };
        Self::assemble(name.into(), property.into(), &options, Arc::new(check))
    }

    /// String rule with default options.
    pub fn string(name: impl Into<String>, property: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::string())
    }

    /// Number rule with default options.
    pub fn number(name: impl Into<String>, property: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::number())
    }

    /// Email rule with default options.
    pub fn email(name: impl Into<String>, property: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::email())
    }

    /// Phone rule with default options.
    pub fn phone(name: impl Into<String>, property: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::phone())
    }

    /// Password rule with default options.
    pub fn password(
        name: impl Into<String>,
        property: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::password())
    }

    /// Single image rule with default options.
    pub fn image(name: impl Into<String>, property: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::image())
    }

    /// Image list rule with default options.
    pub fn images(name: impl Into<String>, property: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(name, property, RuleOptions::images())
    }

    fn assemble(
        name: String,
        property: String,
        options: &RuleOptions,
        check: Arc<dyn Validate>,
    ) -> Result<Self, ConfigError> {
        let length = Bounds::from_pair(options.min_length, options.max_length);
        if let Some(bounds) = length.filter(|b| !b.is_ordered()) {
            return Err(ConfigError::LengthBounds {
                property,
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(Self {
            name: capitalize(&name),
            property,
            required: options.required,
            length,
            include_generic_validation: options.include_generic_validation,
            kind: options.field_kind,
            check,
        })
    }

    /// Label used in messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property key read from the instance.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Whether empty values are rejected.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Length bounds, `None` when the length check is disabled.
    pub fn length(&self) -> Option<Bounds> {
        self.length
    }

    /// Whether the generic stage runs.
    pub fn includes_generic_validation(&self) -> bool {
        self.include_generic_validation
    }

    /// Kind of the type-specific check.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    // ========================================================================
    // PIPELINE
    // ========================================================================

    /// Validates one field value; `None` means the property is absent.
    ///
    /// Returns the first failure. The error carries this rule's label, kind
    /// and property key.
    pub fn validate_field(
        &self,
        value: Option<&Value>,
        collaborators: &Collaborators,
    ) -> ValidationResult<()> {
        let ctx = self.context(collaborators);
        let result = if self.include_generic_validation {
            self.generic_then_check(value, &ctx)
        } else {
            self.check.validate(value.unwrap_or(&Value::Null), &ctx)
        };
        result.map_err(|error| self.attach(error))
    }

    /// Validates one field value and reports every failing stage.
    ///
    /// Markup, required, length and the type-specific check are evaluated
    /// independently; the type-specific check contributes its first failure.
    /// Returns an empty vector for a valid value.
    pub fn validate_field_all(
        &self,
        value: Option<&Value>,
        collaborators: &Collaborators,
    ) -> Vec<ValidationError> {
        let ctx = self.context(collaborators);
        if !self.include_generic_validation {
            return self
                .check
                .validate(value.unwrap_or(&Value::Null), &ctx)
                .err()
                .map(|error| self.attach(error))
                .into_iter()
                .collect();
        }

        let Some(text) = render_text(value) else {
            return self
                .generic_then_check(value, &ctx)
                .err()
                .map(|error| self.attach(error))
                .into_iter()
                .collect();
        };
        let trimmed = text.trim();

        let mut errors = Vec::new();
        if let Err(error) = self.reject_markup(trimmed) {
            errors.push(error);
        }
        if trimmed.is_empty() && self.required {
            errors.push(ValidationError::required(&self.name));
        }
        if let Err(error) = self.check_length(trimmed) {
            errors.push(error);
        }
        if let Err(error) = self.check.validate(&Value::String(trimmed.to_owned()), &ctx) {
            errors.push(error);
        }
        errors.into_iter().map(|error| self.attach(error)).collect()
    }

    fn context<'a>(&'a self, collaborators: &'a Collaborators) -> CheckContext<'a> {
        CheckContext {
            label: &self.name,
            required: self.required,
            collaborators,
        }
    }

    fn attach(&self, error: ValidationError) -> ValidationError {
        error
            .with_field(self.property.as_str())
            .with_rule(self.name.as_str(), self.kind)
    }

    fn generic_then_check(
        &self,
        value: Option<&Value>,
        ctx: &CheckContext<'_>,
    ) -> ValidationResult<()> {
        let Some(text) = render_text(value) else {
            // arrays and objects: only emptiness applies
            let raw = value.unwrap_or(&Value::Null);
            if self.required && is_empty_compound(raw) {
                return Err(ValidationError::required(&self.name));
            }
            return self.check.validate(raw, ctx);
        };

        let trimmed = text.trim();
        self.reject_markup(trimmed)?;
        if self.required && trimmed.is_empty() {
            return Err(ValidationError::required(&self.name));
        }
        self.check_length(trimmed)?;
        self.check.validate(&Value::String(trimmed.to_owned()), ctx)
    }

    fn reject_markup(&self, text: &str) -> ValidationResult<()> {
        if MARKUP.is_match(text) {
            Err(ValidationError::contains_markup(&self.name))
        } else {
            Ok(())
        }
    }

    fn check_length(&self, text: &str) -> ValidationResult<()> {
        let Some(bounds) = self.length else {
            return Ok(());
        };
        bounds
            .check(text.chars().count())
            .map_err(|violation| match violation {
                BoundViolation::Below { min, actual } => {
                    ValidationError::too_short(&self.name, min, actual)
                }
                BoundViolation::Above { max, actual } => {
                    ValidationError::too_long(&self.name, max, actual)
                }
            })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("property", &self.property)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("length", &self.length)
            .field("include_generic_validation", &self.include_generic_validation)
            .field("check", &self.check)
            .finish()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Text form of a scalar for the generic stage. `None` for arrays and objects.
fn render_text(value: Option<&Value>) -> Option<Cow<'_, str>> {
    match value {
        None | Some(Value::Null) => Some(Cow::Borrowed("")),
        Some(Value::String(text)) => Some(Cow::Borrowed(text)),
        Some(Value::Number(number)) => Some(Cow::Owned(number.to_string())),
        Some(Value::Bool(flag)) => Some(Cow::Borrowed(if *flag { "true" } else { "false" })),
        Some(Value::Array(_) | Value::Object(_)) => None,
    }
}

fn is_empty_compound(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
