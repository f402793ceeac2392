use std::rc::Rc;

use nalgebra::DVector;

use crate::{
    containers::{ArrayBuffer, NamedArray},
    error::{NamedArrayError, Result},
};

/// Anything that is backed by an [`ArrayBuffer`]. All functions in this module accept a `NumericArray`, so they can
/// be applied to an `ArrayBuffer` and to a [`NamedArray`] alike, with identical results:
///
/// ```
/// # use namedarray_core::{containers::*, layout::*, math::*};
/// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
/// let v = NamedArray::from_slice(&vec3, &[0.0, 1.0, 2.0]).unwrap();
/// assert_eq!(sin(&v), sin(v.buffer()));
/// ```
pub trait NumericArray {
    fn array_buffer(&self) -> &ArrayBuffer;
}

impl NumericArray for ArrayBuffer {
    fn array_buffer(&self) -> &ArrayBuffer {
        self
    }
}

impl NumericArray for NamedArray {
    fn array_buffer(&self) -> &ArrayBuffer {
        self.buffer()
    }
}

impl<T: NumericArray + ?Sized> NumericArray for &T {
    fn array_buffer(&self) -> &ArrayBuffer {
        (**self).array_buffer()
    }
}

impl<T: NumericArray + ?Sized> NumericArray for Rc<T> {
    fn array_buffer(&self) -> &ArrayBuffer {
        (**self).array_buffer()
    }
}

/// Applies `f` to every element of `array` and returns the results in a new `ArrayBuffer` with the same shape
pub fn map(array: &impl NumericArray, f: impl FnMut(f64) -> f64) -> ArrayBuffer {
    let result = array.array_buffer().deep_copy();
    result.map_inplace(f);
    result
}

/// Combines the elements of `lhs` and `rhs` pairwise using `f`
///
/// # Errors
///
/// If `lhs` and `rhs` don't have the same shape
pub fn zip_map(
    lhs: &impl NumericArray,
    rhs: &impl NumericArray,
    mut f: impl FnMut(f64, f64) -> f64,
) -> Result<ArrayBuffer> {
    let (lhs, rhs) = (lhs.array_buffer(), rhs.array_buffer());
    if lhs.shape() != rhs.shape() {
        return Err(NamedArrayError::shape(
            lhs.shape().dims(),
            rhs.shape().dims(),
        ));
    }
    let rhs_values = rhs.to_vec();
    let result = lhs.deep_copy();
    result.with_slice_mut(|values| {
        for (l, r) in values.iter_mut().zip(rhs_values) {
            *l = f(*l, r);
        }
    });
    Ok(result)
}

/// Elementwise sine
pub fn sin(array: &impl NumericArray) -> ArrayBuffer {
    map(array, f64::sin)
}

/// Elementwise cosine
pub fn cos(array: &impl NumericArray) -> ArrayBuffer {
    map(array, f64::cos)
}

/// Elementwise square root
pub fn sqrt(array: &impl NumericArray) -> ArrayBuffer {
    map(array, f64::sqrt)
}

/// Elementwise absolute value
pub fn abs(array: &impl NumericArray) -> ArrayBuffer {
    map(array, f64::abs)
}

/// Elementwise exponential function
pub fn exp(array: &impl NumericArray) -> ArrayBuffer {
    map(array, f64::exp)
}

/// Sum of all elements
pub fn sum(array: &impl NumericArray) -> f64 {
    array.array_buffer().with_slice(|values| values.iter().sum())
}

/// Euclidean norm of all elements, as if the buffer was one flat vector
/// ```
/// # use namedarray_core::{containers::*, math::*};
/// assert_eq!(5.0, norm(&ArrayBuffer::from_vec(vec![3.0, 4.0])));
/// ```
pub fn norm(array: &impl NumericArray) -> f64 {
    to_dvector(array).norm()
}

/// Dot product of `lhs` and `rhs` as flat vectors
///
/// # Errors
///
/// If `lhs` and `rhs` don't have the same shape
pub fn dot(lhs: &impl NumericArray, rhs: &impl NumericArray) -> Result<f64> {
    let products = zip_map(lhs, rhs, |l, r| l * r)?;
    Ok(sum(&products))
}

/// Smallest element, or `None` for an empty buffer
pub fn min(array: &impl NumericArray) -> Option<f64> {
    array
        .array_buffer()
        .with_slice(|values| values.iter().copied().reduce(f64::min))
}

/// Largest element, or `None` for an empty buffer
pub fn max(array: &impl NumericArray) -> Option<f64> {
    array
        .array_buffer()
        .with_slice(|values| values.iter().copied().reduce(f64::max))
}

/// Copies all elements into a `nalgebra` vector, for everything that this module does not cover
pub fn to_dvector(array: &impl NumericArray) -> DVector<f64> {
    array
        .array_buffer()
        .with_slice(|values| DVector::from_column_slice(values))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::ViewType;
    use assert_approx_eq::assert_approx_eq;
    use rand::{thread_rng, Rng};

    fn vec3() -> Arc<ViewType> {
        ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap()
    }

    #[test]
    fn test_elementwise_matches_buffer() {
        let mut rng = thread_rng();
        for _ in 0..16 {
            let values: Vec<f64> = (0..3).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let v = NamedArray::from_slice(&vec3(), &values).unwrap();
            assert_eq!(sin(&v), sin(v.buffer()));
            assert_eq!(cos(&v), cos(v.buffer()));
            assert_eq!(abs(&v), abs(v.buffer()));
            assert_eq!(exp(&v), exp(v.buffer()));
            assert_eq!(norm(&v), norm(v.buffer()));
            assert_eq!(sum(&v), sum(v.buffer()));
        }
    }

    #[test]
    fn test_sin_values() {
        let v = NamedArray::from_slice(&vec3(), &[0.0, 1.0, 2.0]).unwrap();
        let result = sin(&v).to_vec();
        for (actual, input) in result.iter().zip([0.0_f64, 1.0, 2.0].iter()) {
            assert_approx_eq!(input.sin(), *actual);
        }
    }

    #[test]
    fn test_map_does_not_alias() {
        let v = NamedArray::from_slice(&vec3(), &[1.0, 2.0, 3.0]).unwrap();
        let doubled = map(&v, |value| value * 2.0);
        assert_eq!(vec![2.0, 4.0, 6.0], doubled.to_vec());
        assert_eq!(vec![1.0, 2.0, 3.0], v.data());
        assert!(!doubled.shares_memory_with(v.buffer()));
    }

    #[test]
    fn test_reductions() -> anyhow::Result<()> {
        let v = NamedArray::from_slice(&vec3(), &[1.0, 0.0, 0.0])?;
        assert_approx_eq!(1.0, norm(&v));
        let buffer = ArrayBuffer::from_vec(vec![3.0, -1.0, 2.0]);
        assert_eq!(Some(-1.0), min(&buffer));
        assert_eq!(Some(3.0), max(&buffer));
        assert_eq!(None, min(&ArrayBuffer::zeros(0)));
        assert_eq!(3.0, dot(&v, &buffer)?);
        assert!(dot(&v, &ArrayBuffer::zeros(2)).is_err());
        Ok(())
    }

    #[test]
    fn test_nested_view_is_numeric() -> anyhow::Result<()> {
        let vec3 = vec3();
        let twist = ViewType::builder("Twist", 6)
            .typed("linear", 0..3, &vec3)
            .typed("angular", 3..6, &vec3)
            .build()?;
        let t = NamedArray::from_slice(&twist, &[3.0, 4.0, 0.0, 1.0, 1.0, 1.0])?;
        let linear = t.nested("linear")?;
        assert_approx_eq!(5.0, norm(&linear));
        assert_eq!(3.0, sum(&t.nested("angular")?));
        Ok(())
    }
}
