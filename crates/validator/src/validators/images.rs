//! Multi-file image upload check.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::{CheckContext, ConfigError, Validate, ValidationError, ValidationResult};
use crate::rule::{BoundViolation, Bounds};
use crate::validators::image::{FileDescriptor, Image, not_a_file};

/// A multi-file upload in structure-of-arrays form, one array per attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileBatch {
    pub original_name: Vec<String>,
    pub mime_hint: Vec<String>,
    pub temp_path: Vec<PathBuf>,
    pub upload_error_code: Vec<u32>,
    pub size_bytes: Vec<u64>,
}

impl FileBatch {
    /// Zips the attribute arrays into one descriptor per index.
    ///
    /// Returns `None` when the arrays differ in length.
    pub fn into_files(self) -> Option<Vec<FileDescriptor>> {
        let len = self.original_name.len();
        let consistent = [
            self.mime_hint.len(),
            self.temp_path.len(),
            self.upload_error_code.len(),
            self.size_bytes.len(),
        ]
        .iter()
        .all(|&other| other == len);
        if !consistent {
            return None;
        }

        let files = self
            .original_name
            .into_iter()
            .zip(self.mime_hint)
            .zip(self.temp_path)
            .zip(self.upload_error_code)
            .zip(self.size_bytes)
            .map(
                |((((original_name, mime_hint), temp_path), upload_error_code), size_bytes)| {
                    FileDescriptor {
                        original_name,
                        mime_hint,
                        temp_path,
                        upload_error_code,
                        size_bytes,
                    }
                },
            )
            .collect();
        Some(files)
    }
}

/// Validates a list of uploaded images.
///
/// Accepts a [`FileBatch`] object or a JSON array of [`FileDescriptor`]s.
/// Slots without a file name are ignored. The number of files must fall
/// inside the count bounds, and every file must pass [`Image`]; the first
/// failing file, in index order, is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Images {
    image: Image,
    count: Option<Bounds>,
}

impl Images {
    pub fn new(
        property: &str,
        max_file_size_mb: u64,
        count: Option<Bounds>,
    ) -> Result<Self, ConfigError> {
        if let Some(bounds) = count.filter(|b| !b.is_ordered()) {
            return Err(ConfigError::CountBounds {
                property: property.to_owned(),
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(Self {
            image: Image::new(property, max_file_size_mb)?,
            count,
        })
    }

    /// Allowed number of files, `None` when unbounded.
    pub fn count(&self) -> Option<Bounds> {
        self.count
    }

    fn files(input: &Value, label: &str) -> Result<Vec<FileDescriptor>, ValidationError> {
        match input {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => Vec::<FileDescriptor>::deserialize(input).map_err(|_| not_a_file(label)),
            Value::Object(_) => FileBatch::deserialize(input)
                .map_err(|_| not_a_file(label))?
                .into_files()
                .ok_or_else(|| {
                    ValidationError::new(
                        "inconsistent_upload",
                        format!("{label} has inconsistent upload data."),
                    )
                }),
            _ => Err(not_a_file(label)),
        }
    }
}

impl Validate for Images {
    fn validate(&self, input: &Value, ctx: &CheckContext<'_>) -> ValidationResult<()> {
        let files: Vec<FileDescriptor> = Self::files(input, ctx.label)?
            .into_iter()
            .filter(|file| !file.is_empty())
            .collect();

        if files.is_empty() {
            return if ctx.required {
                Err(ValidationError::required(ctx.label))
            } else {
                Ok(())
            };
        }

        if let Some(bounds) = self.count {
            bounds.check(files.len()).map_err(|violation| match violation {
                BoundViolation::Below { min, actual } => ValidationError::new(
                    "too_few_files",
                    format!("{} must include at least {min} files.", ctx.label),
                )
                .with_param("min", min)
                .with_param("actual", actual),
                BoundViolation::Above { max, actual } => ValidationError::new(
                    "too_many_files",
                    format!("{} can only include up to {max} files.", ctx.label),
                )
                .with_param("max", max)
                .with_param("actual", actual),
            })?;
        }

        files
            .iter()
            .try_for_each(|file| self.image.check_file(file, ctx.collaborators))
    }
}
