//! Built-in type-specific checks
//!
//! Each [`FieldKind`](crate::rule::FieldKind) maps to one check here. Checks
//! run after the generic stage of a [`Rule`](crate::rule::Rule) and see the
//! trimmed text of scalar values, or the raw value when the generic stage is
//! disabled.
//!
//! # Kinds
//!
//! - **Text**: [`Text`]
//! - **Numeric**: [`Number`], [`Phone`]
//! - **Credentials**: [`Email`], [`Password`]
//! - **Uploads**: [`Image`], [`Images`]
//! - **Nesting**: [`ObjectMarker`], [`ObjectArrayMarker`]

pub mod email;
pub mod image;
pub mod images;
pub mod number;
pub mod object;
pub mod password;
pub mod phone;
pub mod text;

pub use email::Email;
pub use image::{
    ALLOWED_EXTENSIONS, FileDescriptor, Image, ImageFormat, UPLOAD_NO_FILE, UPLOAD_OK,
};
pub use images::{FileBatch, Images};
pub use number::Number;
pub use object::{ObjectArrayMarker, ObjectMarker};
pub use password::Password;
pub use phone::Phone;
pub use text::Text;
