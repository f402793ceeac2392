use std::ops::{Add, Mul, Neg, Sub};

use crate::{
    containers::{ArrayBuffer, NamedArray},
    error::Result,
};

use super::{map, zip_map, NumericArray};

/// Elementwise sum of `lhs` and `rhs`
///
/// # Errors
///
/// If `lhs` and `rhs` don't have the same shape
pub fn try_add(lhs: &impl NumericArray, rhs: &impl NumericArray) -> Result<ArrayBuffer> {
    zip_map(lhs, rhs, |l, r| l + r)
}

/// Elementwise difference of `lhs` and `rhs`
///
/// # Errors
///
/// If `lhs` and `rhs` don't have the same shape
pub fn try_sub(lhs: &impl NumericArray, rhs: &impl NumericArray) -> Result<ArrayBuffer> {
    zip_map(lhs, rhs, |l, r| l - r)
}

// The operators mirror `try_add` and `try_sub` and panic on mismatching shapes, the same way that indexing a slice
// out of bounds panics. The result is always a new `ArrayBuffer` that does not alias any operand.
macro_rules! impl_arithmetic_ops {
    ($type:ty) => {
        impl<R: NumericArray> Add<R> for &$type {
            type Output = ArrayBuffer;

            fn add(self, rhs: R) -> ArrayBuffer {
                match try_add(self, &rhs) {
                    Ok(sum) => sum,
                    Err(why) => panic!("can't add arrays: {}", why),
                }
            }
        }

        impl<R: NumericArray> Sub<R> for &$type {
            type Output = ArrayBuffer;

            fn sub(self, rhs: R) -> ArrayBuffer {
                match try_sub(self, &rhs) {
                    Ok(difference) => difference,
                    Err(why) => panic!("can't subtract arrays: {}", why),
                }
            }
        }

        impl Mul<f64> for &$type {
            type Output = ArrayBuffer;

            fn mul(self, rhs: f64) -> ArrayBuffer {
                map(self, |value| value * rhs)
            }
        }

        impl Neg for &$type {
            type Output = ArrayBuffer;

            fn neg(self) -> ArrayBuffer {
                map(self, |value| -value)
            }
        }
    };
}

impl_arithmetic_ops!(ArrayBuffer);
impl_arithmetic_ops!(NamedArray);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ViewType;

    #[test]
    fn test_operators_on_named_arrays() -> anyhow::Result<()> {
        let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)])?;
        let a = NamedArray::from_slice(&vec3, &[1.0, 2.0, 3.0])?;
        let b = NamedArray::from_slice(&vec3, &[0.5, 0.5, 0.5])?;

        assert_eq!(vec![1.5, 2.5, 3.5], (&a + &b).to_vec());
        assert_eq!(vec![0.5, 1.5, 2.5], (&a - &b).to_vec());
        assert_eq!(vec![2.0, 4.0, 6.0], (&a * 2.0).to_vec());
        assert_eq!(vec![-1.0, -2.0, -3.0], (-&a).to_vec());
        assert_eq!(vec![1.0, 2.0, 3.0], a.data());
        Ok(())
    }

    #[test]
    fn test_mixed_operands() -> anyhow::Result<()> {
        let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)])?;
        let a = NamedArray::from_slice(&vec3, &[1.0, 2.0, 3.0])?;
        let buffer = ArrayBuffer::from_vec(vec![1.0, 1.0, 1.0]);
        assert_eq!(&buffer + &a, &a + &buffer);
        assert_eq!(vec![0.0, 1.0, 2.0], (&a - &buffer).to_vec());
        Ok(())
    }

    #[test]
    fn test_try_add_shape_mismatch() {
        let a = ArrayBuffer::zeros(3);
        let b = ArrayBuffer::zeros(2);
        assert!(try_add(&a, &b).is_err());
        assert!(try_sub(&a, &b).is_err());
    }

    #[test]
    #[should_panic]
    fn test_add_shape_mismatch_panics() {
        let _ = &ArrayBuffer::zeros(3) + &ArrayBuffer::zeros(2);
    }
}
