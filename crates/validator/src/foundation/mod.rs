//! Core validation types and traits
//!
//! This module contains the building blocks every other module shares:
//!
//! - **Traits**: [`Validate`], the seam for type-specific checks, and the
//!   [`CheckContext`] handed to it
//! - **Errors**: [`ValidationError`], [`StructuralError`], and the aborting
//!   [`ConfigError`], [`RegistrationError`] and [`Error`]
//! - **Reports**: [`ErrorTree`], [`ErrorKey`], [`ErrorNode`]
//!
//! # Examples
//!
//! ```
//! use formguard_validator::foundation::{ErrorNode, ErrorTree, ValidationError};
//!
//! let mut tree = ErrorTree::new();
//! tree.insert("name", ErrorNode::Field(ValidationError::required("Name").with_field("name")));
//! assert_eq!(tree.leaf_count(), 1);
//! ```

pub mod error;
pub mod traits;
pub mod tree;

pub use error::{
    ConfigError, Error, ErrorParams, RegistrationError, StructuralError, ValidationError,
};
pub use traits::{CheckContext, Validate};
pub use tree::{ErrorKey, ErrorNode, ErrorTree};

/// Outcome of a single field check.
pub type ValidationResult<T> = Result<T, ValidationError>;
