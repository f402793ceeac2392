use std::fmt::Display;

use itertools::Itertools;

/// The shape of a numeric buffer, i.e. the sizes of its dimensions. Buffers are always stored flat in
/// row-major order, so the only thing that matters for addressing elements is the total number of elements
/// (see [`Shape::len`])
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Creates a new `Shape` from the given dimension sizes
    /// ```
    /// # use namedarray_core::layout::*;
    /// let shape = Shape::new(vec![2, 3]);
    /// assert_eq!(&[2, 3], shape.dims());
    /// ```
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self(dims.into())
    }

    /// Creates a one-dimensional `Shape` with `len` elements
    pub fn flat(len: usize) -> Self {
        Self(vec![len])
    }

    /// Returns the sizes of all dimensions of this `Shape`
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of dimensions of this `Shape`
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Returns the total number of elements that a buffer of this `Shape` stores. This is the product of
    /// all dimension sizes
    /// ```
    /// # use namedarray_core::layout::*;
    /// assert_eq!(6, Shape::new(vec![2, 3]).len());
    /// assert_eq!(3, Shape::from(3).len());
    /// ```
    pub fn len(&self) -> usize {
        self.0.iter().product()
    }

    /// Like [`Shape::len`], but returns `None` if the number of elements does not fit into a `usize`
    /// ```
    /// # use namedarray_core::layout::*;
    /// assert_eq!(Some(6), Shape::new(vec![2, 3]).checked_len());
    /// assert_eq!(None, Shape::new(vec![usize::MAX, 2]).checked_len());
    /// ```
    pub fn checked_len(&self) -> Option<usize> {
        self.0
            .iter()
            .try_fold(1_usize, |len, dim| len.checked_mul(*dim))
    }

    /// Returns `true` if a buffer of this `Shape` stores no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Same notation as a Python tuple, so (3,) for one dimension
        if self.0.len() == 1 {
            write!(f, "({},)", self.0[0])
        } else {
            write!(f, "({})", self.0.iter().join(", "))
        }
    }
}

impl From<usize> for Shape {
    fn from(len: usize) -> Self {
        Self::flat(len)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.to_vec())
    }
}

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Self {
        shape.clone()
    }
}
