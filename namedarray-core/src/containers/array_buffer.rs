use std::{
    cell::RefCell,
    fmt::{Debug, Display},
    io::{Read, Write},
    ops::Range,
    rc::Rc,
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use itertools::Itertools;

use crate::{
    error::{NamedArrayError, Result},
    layout::Shape,
};

/// A flat buffer of `f64` values with a [`Shape`]. This is the storage behind every
/// [`NamedArray`](super::NamedArray).
///
/// # Aliasing
///
/// The memory of an `ArrayBuffer` is reference counted. Cloning an `ArrayBuffer` or calling [`ArrayBuffer::slice`]
/// does *not* copy any values, instead the new `ArrayBuffer` refers to (a part of) the same memory, and writes through
/// one of them are visible through all others. This is what allows nested views to write into the buffer of their
/// parent. Use [`ArrayBuffer::deep_copy`] to get an independent copy.
///
/// Because the memory can be written through any alias, all mutating methods take `&self`. `ArrayBuffer` is neither
/// `Send` nor `Sync`, so aliases can never be shared between threads.
///
/// # Panics
///
/// The element accessors panic on out-of-bounds indices, just like slice indexing does. Calling a mutating method
/// from within the closure passed to [`ArrayBuffer::with_slice`] (or vice versa) on an alias of the same memory
/// panics as well.
#[derive(Clone)]
pub struct ArrayBuffer {
    storage: Rc<RefCell<Vec<f64>>>,
    offset: usize,
    shape: Shape,
}

impl ArrayBuffer {
    /// Creates a new zero-initialized `ArrayBuffer` with the given `Shape`
    /// ```
    /// # use namedarray_core::containers::*;
    /// let buffer = ArrayBuffer::zeros(3);
    /// assert_eq!(vec![0.0, 0.0, 0.0], buffer.to_vec());
    /// ```
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Self {
            storage: Rc::new(RefCell::new(vec![0.0; shape.len()])),
            offset: 0,
            shape,
        }
    }

    /// Creates a new one-dimensional `ArrayBuffer` that takes ownership of `values`
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            shape: Shape::flat(values.len()),
            storage: Rc::new(RefCell::new(values)),
            offset: 0,
        }
    }

    /// Creates a new `ArrayBuffer` with the given `Shape` that takes ownership of `values`
    ///
    /// # Errors
    ///
    /// If the number of elements in `shape` does not equal `values.len()`
    pub fn from_shape_vec(shape: impl Into<Shape>, values: Vec<f64>) -> Result<Self> {
        let shape = shape.into();
        if shape.checked_len() != Some(values.len()) {
            return Err(NamedArrayError::shape(shape.dims(), &[values.len()]));
        }
        Ok(Self {
            storage: Rc::new(RefCell::new(values)),
            offset: 0,
            shape,
        })
    }

    /// Like [`ArrayBuffer::from_shape_vec`], but copies the values from the given slice
    pub fn from_slice(shape: impl Into<Shape>, values: &[f64]) -> Result<Self> {
        Self::from_shape_vec(shape, values.to_vec())
    }

    /// Returns the `Shape` of this buffer
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the number of elements in this buffer
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// Returns `true` if this buffer has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index` (in flat, row-major order), or `None` if `index` is out of bounds
    pub fn get(&self, index: usize) -> Option<f64> {
        if index >= self.len() {
            return None;
        }
        Some(self.storage.borrow()[self.offset + index])
    }

    /// Returns the element at `index`
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds
    pub fn at(&self, index: usize) -> f64 {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "ArrayBuffer::at: index {} out of bounds for {} element(s)",
                index,
                self.len()
            )
        })
    }

    /// Sets the element at `index` to `value`
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds
    pub fn set_at(&self, index: usize, value: f64) {
        assert!(
            index < self.len(),
            "ArrayBuffer::set_at: index {} out of bounds for {} element(s)",
            index,
            self.len()
        );
        self.storage.borrow_mut()[self.offset + index] = value;
    }

    /// Returns a one-dimensional `ArrayBuffer` for the given `range` of this buffer. The new buffer shares its memory
    /// with this buffer, so writes through it are visible in this buffer, and vice versa
    ///
    /// # Panics
    ///
    /// If `range` is out of bounds
    /// ```
    /// # use namedarray_core::containers::*;
    /// let buffer = ArrayBuffer::zeros(4);
    /// let slice = buffer.slice(1..3);
    /// slice.set_at(0, 42.0);
    /// assert_eq!(42.0, buffer.at(1));
    /// ```
    pub fn slice(&self, range: Range<usize>) -> ArrayBuffer {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "ArrayBuffer::slice: range {:?} out of bounds for {} element(s)",
            range,
            self.len()
        );
        Self {
            storage: Rc::clone(&self.storage),
            offset: self.offset + range.start,
            shape: Shape::flat(range.end - range.start),
        }
    }

    /// Returns an `ArrayBuffer` with the given `Shape` that shares its memory with this buffer
    ///
    /// # Errors
    ///
    /// If `shape` does not have the same number of elements as this buffer
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<ArrayBuffer> {
        let shape = shape.into();
        if shape.checked_len() != Some(self.len()) {
            return Err(NamedArrayError::shape(self.shape.dims(), shape.dims()));
        }
        Ok(Self {
            storage: Rc::clone(&self.storage),
            offset: self.offset,
            shape,
        })
    }

    /// Returns `true` if this buffer and `other` refer to the same memory (not necessarily the same region of it)
    pub fn shares_memory_with(&self, other: &ArrayBuffer) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    /// Returns an independent copy of this buffer with the same `Shape`
    pub fn deep_copy(&self) -> ArrayBuffer {
        Self {
            storage: Rc::new(RefCell::new(self.to_vec())),
            offset: 0,
            shape: self.shape.clone(),
        }
    }

    /// Copies all values of this buffer into a new `Vec`
    pub fn to_vec(&self) -> Vec<f64> {
        self.with_slice(|values| values.to_vec())
    }

    /// Calls `f` with the values of this buffer as a slice
    pub fn with_slice<R>(&self, f: impl FnOnce(&[f64]) -> R) -> R {
        let storage = self.storage.borrow();
        f(&storage[self.offset..(self.offset + self.len())])
    }

    /// Calls `f` with the values of this buffer as a mutable slice
    pub fn with_slice_mut<R>(&self, f: impl FnOnce(&mut [f64]) -> R) -> R {
        let len = self.len();
        let mut storage = self.storage.borrow_mut();
        f(&mut storage[self.offset..(self.offset + len)])
    }

    /// Overwrites all values of this buffer with `values`. The buffer is left untouched if the lengths don't match
    ///
    /// # Errors
    ///
    /// If `values.len()` does not equal `self.len()`
    pub fn copy_from_slice(&self, values: &[f64]) -> Result<()> {
        if values.len() != self.len() {
            return Err(NamedArrayError::shape(self.shape.dims(), &[values.len()]));
        }
        self.with_slice_mut(|target| target.copy_from_slice(values));
        Ok(())
    }

    /// Sets all values of this buffer to `value`
    pub fn fill(&self, value: f64) {
        self.with_slice_mut(|target| target.iter_mut().for_each(|v| *v = value));
    }

    /// Applies `f` to every value of this buffer in place
    pub fn map_inplace(&self, mut f: impl FnMut(f64) -> f64) {
        self.with_slice_mut(|target| target.iter_mut().for_each(|v| *v = f(*v)));
    }

    /// Returns the raw bytes of all values in native byte order
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.with_slice(|values| bytemuck::cast_slice::<f64, u8>(values).to_vec())
    }

    /// Creates a new `ArrayBuffer` from raw bytes in native byte order, as produced by [`ArrayBuffer::to_ne_bytes`]
    ///
    /// # Errors
    ///
    /// If `bytes` does not contain exactly `shape.len()` values
    pub fn from_ne_bytes(shape: impl Into<Shape>, bytes: &[u8]) -> Result<Self> {
        let shape = shape.into();
        let value_size = std::mem::size_of::<f64>();
        let expected_bytes = shape
            .checked_len()
            .and_then(|len| len.checked_mul(value_size));
        if expected_bytes != Some(bytes.len()) {
            return Err(NamedArrayError::shape(
                shape.dims(),
                &[bytes.len() / value_size],
            ));
        }
        let values = bytes
            .chunks_exact(value_size)
            .map(bytemuck::pod_read_unaligned::<f64>)
            .collect();
        Self::from_shape_vec(shape, values)
    }

    /// Writes all values of this buffer as little-endian `f64` values to `writer`
    pub fn write_le<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let values = self.to_vec();
        for value in values {
            writer.write_f64::<LittleEndian>(value)?;
        }
        Ok(())
    }

    /// Reads a new `ArrayBuffer` of the given `Shape` from `reader`, which must provide little-endian `f64` values
    pub fn read_le<R: Read>(shape: impl Into<Shape>, mut reader: R) -> std::io::Result<Self> {
        let shape = shape.into();
        let mut values = vec![0.0; shape.len()];
        reader.read_f64_into::<LittleEndian>(&mut values)?;
        Ok(Self {
            storage: Rc::new(RefCell::new(values)),
            offset: 0,
            shape,
        })
    }
}

impl PartialEq for ArrayBuffer {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        // Take copies so that comparing two aliases of the same memory does not hold two borrows at once
        self.to_vec() == other.to_vec()
    }
}

impl From<Vec<f64>> for ArrayBuffer {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<&[f64]> for ArrayBuffer {
    fn from(values: &[f64]) -> Self {
        Self::from_vec(values.to_vec())
    }
}

impl Debug for ArrayBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayBuffer")
            .field("shape", &self.shape)
            .field("values", &self.to_vec())
            .finish()
    }
}

impl Display for ArrayBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with_slice(|values| write!(f, "[{}]", values.iter().join(", ")))
    }
}
