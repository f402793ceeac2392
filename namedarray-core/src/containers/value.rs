use std::convert::TryInto;

use nalgebra::Vector3;

use crate::error::{NamedArrayError, Result};

use super::{ArrayBuffer, NamedArray};

/// A value that is exchanged between a [`NamedArray`] and an external object: either a single number or a
/// sequence of numbers. Values are always copies, they never alias the buffer of a `NamedArray`
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl Value {
    /// Returns the number of elements in this value. A `Scalar` has one element
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Sequence(values) => values.len(),
        }
    }

    /// Returns `true` if this is an empty `Sequence`
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number if this is a `Scalar`
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(value) => Some(*value),
            Value::Sequence(_) => None,
        }
    }

    /// Returns the values if this is a `Sequence`
    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            Value::Scalar(_) => None,
            Value::Sequence(values) => Some(values),
        }
    }

    /// Returns all elements of this value. A `Scalar` becomes a `Vec` with one element
    pub fn into_vec(self) -> Vec<f64> {
        match self {
            Value::Scalar(value) => vec![value],
            Value::Sequence(values) => values,
        }
    }

    /// A short human-readable description of the kind of this value, used in error messages
    pub fn describe(&self) -> String {
        match self {
            Value::Scalar(_) => "a scalar".into(),
            Value::Sequence(values) => format!("a sequence of {} element(s)", values.len()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Sequence(values)
    }
}

impl From<&[f64]> for Value {
    fn from(values: &[f64]) -> Self {
        Value::Sequence(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(values: [f64; N]) -> Self {
        Value::Sequence(values.to_vec())
    }
}

impl From<Vector3<f64>> for Value {
    fn from(values: Vector3<f64>) -> Self {
        Value::Sequence(values.as_slice().to_vec())
    }
}

impl From<&ArrayBuffer> for Value {
    fn from(buffer: &ArrayBuffer) -> Self {
        Value::Sequence(buffer.to_vec())
    }
}

impl From<&NamedArray> for Value {
    fn from(array: &NamedArray) -> Self {
        Value::Sequence(array.data())
    }
}

/// Conversion of a Rust value into a [`Value`]. This is what `#[derive(AttributeObject)]` uses to read
/// the fields of a struct
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Conversion of a [`Value`] into a Rust value. This is what `#[derive(AttributeObject)]` uses to write
/// the fields of a struct. `attribute` is only used for error reporting
pub trait FromValue: Sized {
    fn from_value(attribute: &str, value: Value) -> Result<Self>;
}

macro_rules! impl_value_conversion_for_number {
    ($($number:ty),*) => {
        $(
            impl ToValue for $number {
                fn to_value(&self) -> Value {
                    Value::Scalar(*self as f64)
                }
            }

            impl FromValue for $number {
                fn from_value(attribute: &str, value: Value) -> Result<Self> {
                    match value {
                        Value::Scalar(number) => Ok(number as $number),
                        other => Err(NamedArrayError::attribute_type(
                            attribute,
                            format!("expected a scalar, got {}", other.describe()),
                        )),
                    }
                }
            }
        )*
    };
}

impl_value_conversion_for_number!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToValue for Vec<f64> {
    fn to_value(&self) -> Value {
        Value::Sequence(self.clone())
    }
}

impl FromValue for Vec<f64> {
    fn from_value(attribute: &str, value: Value) -> Result<Self> {
        match value {
            Value::Sequence(values) => Ok(values),
            other => Err(NamedArrayError::attribute_type(
                attribute,
                format!("expected a sequence, got {}", other.describe()),
            )),
        }
    }
}

impl<const N: usize> ToValue for [f64; N] {
    fn to_value(&self) -> Value {
        Value::Sequence(self.to_vec())
    }
}

impl<const N: usize> FromValue for [f64; N] {
    fn from_value(attribute: &str, value: Value) -> Result<Self> {
        let description = value.describe();
        match value {
            Value::Sequence(values) => values.try_into().map_err(|_| {
                NamedArrayError::attribute_type(
                    attribute,
                    format!("expected a sequence of {} element(s), got {}", N, description),
                )
            }),
            _ => Err(NamedArrayError::attribute_type(
                attribute,
                format!("expected a sequence of {} element(s), got {}", N, description),
            )),
        }
    }
}

impl ToValue for Vector3<f64> {
    fn to_value(&self) -> Value {
        Value::Sequence(self.as_slice().to_vec())
    }
}

impl FromValue for Vector3<f64> {
    fn from_value(attribute: &str, value: Value) -> Result<Self> {
        let values: [f64; 3] = FromValue::from_value(attribute, value)?;
        Ok(Vector3::from(values))
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(_attribute: &str, value: Value) -> Result<Self> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_conversion() {
        assert_eq!(Value::Scalar(3.0), 3_u8.to_value());
        assert_eq!(Ok(7_i32), i32::from_value("x", Value::Scalar(7.0)));
        assert!(matches!(
            f64::from_value("x", Value::Sequence(vec![1.0])),
            Err(NamedArrayError::AttributeType { .. })
        ));
    }

    #[test]
    fn test_sequence_conversion() {
        assert_eq!(
            Ok([1.0, 2.0, 3.0]),
            <[f64; 3]>::from_value("v", Value::Sequence(vec![1.0, 2.0, 3.0]))
        );
        assert!(<[f64; 3]>::from_value("v", Value::Sequence(vec![1.0])).is_err());
        assert!(<[f64; 3]>::from_value("v", Value::Scalar(1.0)).is_err());
        assert_eq!(
            Ok(Vector3::new(1.0, 2.0, 3.0)),
            Vector3::<f64>::from_value("v", Value::Sequence(vec![1.0, 2.0, 3.0]))
        );
        assert_eq!(
            Value::Sequence(vec![4.0, 5.0]),
            vec![4.0, 5.0].to_value()
        );
    }
}
