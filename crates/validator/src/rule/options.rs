//! Rule configuration.
//!
//! [`RuleOptions`] is the configuration object every rule constructor accepts.
//! Start from the per-kind defaults ([`RuleOptions::string`],
//! [`RuleOptions::email`], ...) and adjust with the builder methods, or
//! deserialize it from configuration (camelCase keys). Keys missing from the
//! configuration fall back to the defaults of the configured `fieldKind`; an
//! explicit `null` for `minLength`/`maxLength` disables the length check.
//!
//! ```
//! use formguard_validator::rule::{FieldKind, RuleOptions};
//!
//! let options: RuleOptions = serde_json::from_str(
//!     r#"{ "fieldKind": "email", "maxLength": 200, "isUsername": true }"#,
//! ).unwrap();
//!
//! assert_eq!(options.field_kind, FieldKind::Email);
//! assert_eq!(options.min_length, Some(6));
//! assert_eq!(options.max_length, Some(200));
//! assert!(options.is_username);
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::rule::bounds::{Bounds, NumberRange};

// ============================================================================
// FIELD KIND
// ============================================================================

/// Tag naming the type-specific check of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    #[default]
    String,
    /// Numeric value, optionally range-bound.
    Number,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Password with character-class requirements.
    Password,
    /// One uploaded image.
    Image,
    /// Several uploaded images for one field.
    Images,
    /// Caller-supplied check.
    Custom,
}

impl FieldKind {
    /// Lower-case name used in configuration and serialized errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::Image => "image",
            Self::Images => "images",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE OPTIONS
// ============================================================================

/// Default upload cap for image kinds, in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 5;

/// Configuration for one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRuleOptions")]
pub struct RuleOptions {
    /// Minimum trimmed length. `None` disables the length check.
    pub min_length: Option<usize>,
    /// Maximum trimmed length. `None` disables the length check.
    pub max_length: Option<usize>,
    /// Reject values that are empty after trimming.
    pub required: bool,
    /// Run the shared markup/required/length stage before the kind check.
    pub include_generic_validation: bool,
    /// Which type-specific check to build.
    pub field_kind: FieldKind,
    /// Inclusive numeric range for [`FieldKind::Number`].
    pub number_range: NumberRange,
    /// For [`FieldKind::Email`]: the address must not belong to an existing account.
    pub is_username: bool,
    /// Upload cap for image kinds, in megabytes.
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: u64,
    /// Allowed number of files for [`FieldKind::Images`].
    pub image_count_range: Option<Bounds>,
}

impl RuleOptions {
    /// Defaults for `kind`.
    pub fn for_kind(kind: FieldKind) -> Self {
        let base = Self {
            min_length: None,
            max_length: None,
            required: true,
            include_generic_validation: true,
            field_kind: kind,
            number_range: NumberRange::default(),
            is_username: false,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            image_count_range: None,
        };

        match kind {
            FieldKind::String => base.length(2, 50),
            FieldKind::Number => base.length(1, 30),
            FieldKind::Email => base.length(6, 100),
            FieldKind::Phone => base.length(10, 12),
            FieldKind::Password => base.length(8, 30),
            FieldKind::Image => base.generic(false),
            FieldKind::Images => Self {
                image_count_range: Some(Bounds { min: 1, max: 1 }),
                ..base.generic(false)
            },
            FieldKind::Custom => base,
        }
    }

    /// String defaults: 2..50 characters, required.
    pub fn string() -> Self {
        Self::for_kind(FieldKind::String)
    }

    /// Number defaults: 1..30 characters, required, no range.
    pub fn number() -> Self {
        Self::for_kind(FieldKind::Number)
    }

    /// Email defaults: 6..100 characters, required, not a username.
    pub fn email() -> Self {
        Self::for_kind(FieldKind::Email)
    }

    /// Phone defaults: 10..12 characters, required.
    pub fn phone() -> Self {
        Self::for_kind(FieldKind::Phone)
    }

    /// Password defaults: 8..30 characters, required.
    pub fn password() -> Self {
        Self::for_kind(FieldKind::Password)
    }

    /// Single image defaults: 5 MB, required, no generic stage.
    pub fn image() -> Self {
        Self::for_kind(FieldKind::Image)
    }

    /// Image list defaults: 5 MB per file, exactly one file, required.
    pub fn images() -> Self {
        Self::for_kind(FieldKind::Images)
    }

    /// Sets both length bounds.
    #[must_use = "builder methods must be chained or built"]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Disables the length check.
    #[must_use = "builder methods must be chained or built"]
    pub fn unbounded(mut self) -> Self {
        self.min_length = None;
        self.max_length = None;
        self
    }

    /// Sets the required flag.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Shorthand for `required(false)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Toggles the generic markup/required/length stage.
    #[must_use = "builder methods must be chained or built"]
    pub fn generic(mut self, enabled: bool) -> Self {
        self.include_generic_validation = enabled;
        self
    }

    /// Sets the inclusive numeric range.
    #[must_use = "builder methods must be chained or built"]
    pub fn number_range(mut self, min: f64, max: f64) -> Self {
        self.number_range = NumberRange {
            min: Some(min),
            max: Some(max),
        };
        self
    }

    /// Marks an email field as a username that must not already exist.
    #[must_use = "builder methods must be chained or built"]
    pub fn username(mut self) -> Self {
        self.is_username = true;
        self
    }

    /// Sets the upload cap in megabytes.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_file_size_mb(mut self, megabytes: u64) -> Self {
        self.max_file_size_mb = megabytes;
        self
    }

    /// Sets the allowed number of files.
    #[must_use = "builder methods must be chained or built"]
    pub fn image_count(mut self, min: usize, max: usize) -> Self {
        self.image_count_range = Some(Bounds { min, max });
        self
    }
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self::string()
    }
}

// ============================================================================
// DESERIALIZATION
// ============================================================================

/// Wire form: every key optional, `null` distinguishable from missing for the
/// length bounds.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRuleOptions {
    #[serde(default, deserialize_with = "explicit")]
    min_length: Option<Option<usize>>,
    #[serde(default, deserialize_with = "explicit")]
    max_length: Option<Option<usize>>,
    required: Option<bool>,
    include_generic_validation: Option<bool>,
    field_kind: Option<FieldKind>,
    number_range: Option<NumberRange>,
    is_username: Option<bool>,
    #[serde(rename = "maxFileSizeMB")]
    max_file_size_mb: Option<u64>,
    image_count_range: Option<Bounds>,
}

fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<RawRuleOptions> for RuleOptions {
    fn from(raw: RawRuleOptions) -> Self {
        let defaults = Self::for_kind(raw.field_kind.unwrap_or_default());
        Self {
            min_length: raw.min_length.unwrap_or(defaults.min_length),
            max_length: raw.max_length.unwrap_or(defaults.max_length),
            required: raw.required.unwrap_or(defaults.required),
            include_generic_validation: raw
                .include_generic_validation
                .unwrap_or(defaults.include_generic_validation),
            field_kind: defaults.field_kind,
            number_range: raw.number_range.unwrap_or(defaults.number_range),
            is_username: raw.is_username.unwrap_or(defaults.is_username),
            max_file_size_mb: raw.max_file_size_mb.unwrap_or(defaults.max_file_size_mb),
            image_count_range: raw.image_count_range.or(defaults.image_count_range),
        }
    }
}
