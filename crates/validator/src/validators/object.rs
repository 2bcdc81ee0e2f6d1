//! Markers for properties that hold instances of other registered types.
//!
//! Markers carry no validation logic. [`Validator`](crate::Validator)
//! replaces them with the rule sets the registry resolves for the nested
//! values before the engine runs.

/// The property holds one instance of `type_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectMarker {
    property: String,
    type_key: String,
}

impl ObjectMarker {
    pub fn new(property: impl Into<String>, type_key: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            type_key: type_key.into(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Registry key of the nested type.
    pub fn type_key(&self) -> &str {
        &self.type_key
    }
}

/// The property holds an ordered list of instances of `type_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectArrayMarker {
    property: String,
    type_key: String,
}

impl ObjectArrayMarker {
    pub fn new(property: impl Into<String>, type_key: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            type_key: type_key.into(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Registry key of the element type.
    pub fn type_key(&self) -> &str {
        &self.type_key
    }
}
