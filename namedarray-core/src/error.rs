//! Errors raised while compiling view types and while working with named arrays

use std::ops::Range;

use thiserror::Error;

/// Result type used throughout namedarray
pub type Result<T> = std::result::Result<T, NamedArrayError>;

/// Errors that can occur when compiling a [`ViewType`](crate::layout::ViewType) or when reading, writing
/// and converting [`NamedArray`](crate::containers::NamedArray) instances
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NamedArrayError {
    /// Two fields of the same schema share a name
    #[error("field {field} is declared more than once in view type {type_name}")]
    DuplicateField { type_name: String, field: String },

    /// A region addresses elements outside of the shape of its view type
    #[error("region {region:?} of field {field} is out of bounds for {len} element(s)")]
    OutOfBounds {
        field: String,
        region: Range<usize>,
        len: usize,
    },

    /// A nested view type does not fit the range it is bound to
    #[error("field {field} binds view type {nested_type} with {expected} element(s) to a range of {found} element(s)")]
    ShapeMismatch {
        field: String,
        nested_type: String,
        expected: usize,
        found: usize,
    },

    /// The schema itself is malformed (empty type name, empty shape, zero-sized dimension)
    #[error("invalid view type {type_name:?}: {reason}")]
    InvalidSchema { type_name: String, reason: String },

    /// Data passed to a constructor or setter has the wrong shape
    #[error("shape mismatch: expected {expected:?}, got {found:?}")]
    Shape {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// The field is not part of the view type
    #[error("view type {type_name} has no field named {field}")]
    UnknownField { type_name: String, field: String },

    /// The field exists but is of a different region kind than requested
    #[error("field {field} is a {actual} field, not a {requested} field")]
    FieldKind {
        field: String,
        requested: &'static str,
        actual: &'static str,
    },

    /// An external object lacks an attribute that the conversion needs
    #[error("object has no attribute named {attribute}")]
    MissingAttribute { attribute: String },

    /// An external object holds or expects a value of an incompatible kind
    #[error("attribute {attribute} cannot hold this value: {reason}")]
    AttributeType { attribute: String, reason: String },
}

impl NamedArrayError {
    pub(crate) fn shape(expected: &[usize], found: &[usize]) -> Self {
        Self::Shape {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    pub(crate) fn missing_attribute(attribute: &str) -> Self {
        Self::MissingAttribute {
            attribute: attribute.to_owned(),
        }
    }

    pub(crate) fn attribute_type(attribute: &str, reason: impl Into<String>) -> Self {
        Self::AttributeType {
            attribute: attribute.to_owned(),
            reason: reason.into(),
        }
    }
}
