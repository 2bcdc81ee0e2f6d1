//! Error types for validation failures
//!
//! Two families live here:
//!
//! - **Data errors** end up inside an [`ErrorTree`](crate::foundation::ErrorTree):
//!   [`ValidationError`] (a rule rejected a field) and [`StructuralError`]
//!   (the instance does not have the shape the rule set expects).
//! - **Programmer errors** abort a validation run: [`ConfigError`] for rules
//!   that cannot be constructed and [`RegistrationError`] for type keys the
//!   registry does not know. Both are wrapped by the crate-level [`Error`].
//!
//! Error codes use `Cow<'static, str>` so the common static codes never
//! allocate.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use crate::rule::FieldKind;

/// Ordered key/value parameters attached to an error (typically 0-2 entries).
pub type ErrorParams = SmallVec<[(Cow<'static, str>, String); 2]>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A rule violation for a single field.
///
/// Produced by the type-specific checks and the generic pipeline of
/// [`Rule`](crate::rule::Rule). The owning rule's label, kind and property key
/// are attached by [`Rule::validate_field`](crate::rule::Rule::validate_field),
/// so individual checks only need to supply a code and a message.
///
/// # Examples
///
/// ```
/// use formguard_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Name is too short.")
///     .with_field("name")
///     .with_param("min", "4");
///
/// assert_eq!(error.param("min"), Some("4"));
/// assert_eq!(error.to_string(), "[name] too_short: Name is too short.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Machine-readable code, e.g. `required`, `too_short`, `invalid_email`.
    pub code: Cow<'static, str>,

    /// Human-readable message in English.
    pub message: String,

    /// Property key of the field that failed.
    pub field: String,

    /// Display label of the owning rule.
    pub rule: String,

    /// Kind of the owning rule.
    pub kind: FieldKind,

    /// Parameters used to build the message (bounds, limits).
    #[serde(skip_serializing_if = "SmallVec::is_empty")]
    pub params: ErrorParams,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: String::new(),
            rule: String::new(),
            kind: FieldKind::Custom,
            params: SmallVec::new(),
        }
    }

    /// Sets the property key for this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Records the rule that produced this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rule(mut self, rule: impl Into<String>, kind: FieldKind) -> Self {
        self.rule = rule.into();
        self.kind = kind;
        self
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.field, self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValidationError {
    /// "`{label}` is required."
    pub fn required(label: &str) -> Self {
        Self::new("required", format!("{label} is required."))
    }

    /// Markup found in a free-text field.
    pub fn contains_markup(label: &str) -> Self {
        Self::new("contains_markup", format!("{label} cannot contain HTML tags."))
    }

    /// Trimmed text shorter than the configured minimum.
    pub fn too_short(label: &str, min: usize, actual: usize) -> Self {
        Self::new(
            "too_short",
            format!("{label} is too short. This field must be at least {min} characters."),
        )
        .with_param("min", min)
        .with_param("actual", actual)
    }

    /// Trimmed text longer than the configured maximum.
    pub fn too_long(label: &str, max: usize, actual: usize) -> Self {
        Self::new(
            "too_long",
            format!("{label} is too long. This field can only hold up to {max} characters."),
        )
        .with_param("max", max)
        .with_param("actual", actual)
    }
}

// ============================================================================
// STRUCTURAL ERROR
// ============================================================================

/// The instance does not have the shape a nested or array entry expects.
///
/// Serializes as its message so detailed and flattened trees render the same
/// text for shape mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum StructuralError {
    /// A nested rule set was applied to something that is not an object.
    #[error("Invalid value: expected object.")]
    ExpectedObject,

    /// An element of an array-of-objects field is not an object.
    #[error("Invalid item: expected object.")]
    ExpectedObjectItem,

    /// An array-of-objects entry found neither an array nor an object.
    #[error("Invalid value: expected object or array of objects.")]
    ExpectedObjectOrArray,
}

impl StructuralError {
    /// Machine-readable code, mirrors [`ValidationError::code`].
    pub fn code(self) -> &'static str {
        match self {
            Self::ExpectedObject => "expected_object",
            Self::ExpectedObjectItem => "expected_object_item",
            Self::ExpectedObjectOrArray => "expected_object_or_array",
        }
    }
}

impl Serialize for StructuralError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// PROGRAMMER ERRORS
// ============================================================================

/// A rule was configured with options that can never validate anything.
///
/// Raised by rule constructors, never during validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `minLength` greater than `maxLength`.
    #[error("rule '{property}': minimum length {min} exceeds maximum length {max}")]
    LengthBounds {
        property: String,
        min: usize,
        max: usize,
    },

    /// Numeric range with `min > max`.
    #[error("rule '{property}': numeric minimum {min} exceeds maximum {max}")]
    NumberRange { property: String, min: f64, max: f64 },

    /// File-count range with `min > max`.
    #[error("rule '{property}': minimum file count {min} exceeds maximum {max}")]
    CountBounds {
        property: String,
        min: usize,
        max: usize,
    },

    /// A zero megabyte upload cap rejects every file.
    #[error("rule '{property}': maximum file size must be at least 1 MB")]
    InvalidFileSizeCap { property: String },

    /// The options name a kind the constructor cannot build.
    #[error("rule '{property}': field kind '{kind}' needs a custom check")]
    MissingCheck { property: String, kind: FieldKind },
}

/// A type key could not be resolved to a rule-producing function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// Nothing was registered under the key.
    #[error("no validation rules registered for type '{type_key}'")]
    NotRegistered { type_key: String },

    /// An override was declared for the key but its target is unregistered.
    #[error("type '{type_key}' is overridden by '{target}', which has no registered rules")]
    OverrideTargetMissing { type_key: String, target: String },
}

/// Crate-level error for operations that must abort a validation run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid rule configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unknown type key.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The instance could not be converted to or from a JSON tree.
    #[error("instance serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
