//! Uploaded image check.
//!
//! A file is accepted when it was uploaded without error, fits the size cap,
//! carries an image extension, and its content starts with a known image
//! signature. Content is read through the [`FileReader`] collaborator.
//!
//! [`FileReader`]: crate::collaborators::FileReader

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::collaborators::Collaborators;
use crate::foundation::{CheckContext, ConfigError, Validate, ValidationError, ValidationResult};

/// Upload completed without error.
pub const UPLOAD_OK: u32 = 0;

/// No file was sent for the slot.
pub const UPLOAD_NO_FILE: u32 = 4;

/// Extensions accepted for image uploads, lower-case.
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "avif", "bmp"];

const BYTES_PER_MB: u64 = 1024 * 1024;

// ============================================================================
// FILE DESCRIPTOR
// ============================================================================

/// One uploaded file as handed over by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDescriptor {
    /// Client-side file name. Empty when the slot holds no file.
    pub original_name: String,
    /// Client-declared MIME type. Informational only.
    pub mime_hint: String,
    /// Where the upload was stored.
    pub temp_path: PathBuf,
    /// Transport status code, [`UPLOAD_OK`] on success.
    pub upload_error_code: u32,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl FileDescriptor {
    /// Lower-cased extension of [`original_name`](Self::original_name).
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// True when the slot holds no file.
    pub fn is_empty(&self) -> bool {
        self.original_name.trim().is_empty()
    }
}

// ============================================================================
// IMAGE FORMAT
// ============================================================================

/// Image formats recognised by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    WebP,
    Bmp,
    Gif,
    Png,
    Tiff,
    Jpeg,
    Avif,
}

impl ImageFormat {
    /// Identifies the format of `bytes`, if any.
    ///
    /// RIFF containers are accepted as WebP without inspecting the form type.
    /// JPEG needs both the start-of-image and end-of-image markers.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"RIFF") {
            Some(Self::WebP)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if bytes.starts_with(b"GIF") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"\x89PNG") {
            Some(Self::Png)
        } else if bytes.starts_with(b"II*") || bytes.starts_with(b"MM*") {
            Some(Self::Tiff)
        } else if bytes.starts_with(b"\xFF\xD8") && bytes.len() >= 4 && bytes.ends_with(b"\xFF\xD9") {
            Some(Self::Jpeg)
        } else if bytes.get(4..12) == Some(b"ftypavif".as_slice()) {
            Some(Self::Avif)
        } else {
            None
        }
    }
}

// ============================================================================
// IMAGE
// ============================================================================

/// Validates a single uploaded image described by a [`FileDescriptor`].
///
/// # Examples
///
/// ```
/// use formguard_validator::collaborators::Collaborators;
/// use formguard_validator::foundation::{CheckContext, Validate};
/// use formguard_validator::validators::Image;
/// use serde_json::json;
///
/// let avatar = Image::new("avatar", 5)?;
/// let collaborators = Collaborators::default()
///     .with_files(|_: &std::path::Path| Ok::<_, std::io::Error>(b"\x89PNG\r\n\x1a\n".to_vec()));
/// let ctx = CheckContext { label: "Avatar", required: true, collaborators: &collaborators };
///
/// let upload = json!({
///     "originalName": "me.png",
///     "tempPath": "/tmp/upload-1",
///     "uploadErrorCode": 0,
///     "sizeBytes": 6 * 1024 * 1024,
/// });
/// assert_eq!(
///     avatar.validate(&upload, &ctx).unwrap_err().message,
///     "me.png exceeds the maximum size limit of 5MB."
/// );
/// # Ok::<(), formguard_validator::foundation::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    max_file_size_mb: u64,
}

impl Image {
    /// Creates an image check with a per-file cap in megabytes.
    pub fn new(property: &str, max_file_size_mb: u64) -> Result<Self, ConfigError> {
        if max_file_size_mb == 0 {
            return Err(ConfigError::InvalidFileSizeCap {
                property: property.to_owned(),
            });
        }
        Ok(Self { max_file_size_mb })
    }

    /// Per-file cap in megabytes.
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_mb
    }

    /// Validates one descriptor. Empty slots are handled by the caller.
    pub(crate) fn check_file(
        &self,
        file: &FileDescriptor,
        collaborators: &Collaborators,
    ) -> ValidationResult<()> {
        let name = file.original_name.as_str();
        let fail = |code: &'static str, message: String| {
            Err(ValidationError::new(code, message).with_param("file", name))
        };

        match file.upload_error_code {
            UPLOAD_OK => {}
            UPLOAD_NO_FILE => return fail("no_file", format!("{name} is not a valid file.")),
            _ => return fail("upload_failed", format!("File upload error for {name}.")),
        }

        if file.size_bytes > self.max_file_size_mb.saturating_mul(BYTES_PER_MB) {
            return Err(ValidationError::new(
                "file_too_large",
                format!(
                    "{name} exceeds the maximum size limit of {}MB.",
                    self.max_file_size_mb
                ),
            )
            .with_param("file", name)
            .with_param("max", self.max_file_size_mb));
        }

        let allowed = file
            .extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
        if !allowed {
            return fail(
                "invalid_extension",
                format!(
                    "{name} has an invalid extension. Allowed extensions: {}.",
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            );
        }

        let content = match collaborators.files.read(&file.temp_path) {
            Ok(content) => content,
            Err(error) => {
                warn!(file = name, path = %file.temp_path.display(), %error, "uploaded file could not be read");
                return fail("unreadable_file", format!("{name} could not be read."));
            }
        };

        if ImageFormat::sniff(&content).is_none() {
            return fail(
                "invalid_image_content",
                format!("{name} does not contain a valid image content."),
            );
        }

        Ok(())
    }
}

impl Validate for Image {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        let file = match input {
            Value::Null => FileDescriptor::default(),
            Value::Object(_) => FileDescriptor::deserialize(input).map_err(|_| not_a_file(ctx.label))?,
            _ => return Err(not_a_file(ctx.label)),
        };

        if file.is_empty() {
            return if ctx.required {
                Err(ValidationError::required(ctx.label))
            } else {
                Ok(())
            };
        }

        self.check_file(&file, ctx.collaborators)
    }
}

pub(crate) fn not_a_file(label: &str) -> ValidationError {
    ValidationError::new("not_a_file", format!("{label} must be an uploaded file."))
}
