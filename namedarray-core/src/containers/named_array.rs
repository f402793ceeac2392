use std::{
    cell::OnceCell,
    fmt::{Debug, Display},
    rc::Rc,
    sync::Arc,
};

use crate::{
    error::{NamedArrayError, Result},
    layout::{FieldDefinition, RegionSpec, ViewType},
};

use super::{build_from, populate_from, ArrayBuffer, AttributeObject, Value};

/// The value of a single field of a [`NamedArray`], as returned by [`NamedArray::get`]
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// The element of a scalar field
    Scalar(f64),
    /// The elements of a range field. This buffer aliases the buffer of the `NamedArray`, so writing to it changes the
    /// `NamedArray`
    Range(ArrayBuffer),
    /// The nested `NamedArray` of a typed range field. It aliases the buffer of its parent
    Nested(Rc<NamedArray>),
}

impl FieldValue {
    /// Returns the number if this is a `Scalar`
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FieldValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the aliasing buffer if this is a `Range`
    pub fn as_range(&self) -> Option<&ArrayBuffer> {
        match self {
            FieldValue::Range(buffer) => Some(buffer),
            _ => None,
        }
    }

    /// Returns the nested view if this is `Nested`
    pub fn as_nested(&self) -> Option<&Rc<NamedArray>> {
        match self {
            FieldValue::Nested(nested) => Some(nested),
            _ => None,
        }
    }

    /// Copies this field value into a [`Value`]
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Scalar(value) => Value::Scalar(*value),
            FieldValue::Range(buffer) => Value::from(buffer),
            FieldValue::Nested(nested) => Value::from(nested.as_ref()),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Scalar(l), FieldValue::Scalar(r)) => l == r,
            (FieldValue::Range(l), FieldValue::Range(r)) => l == r,
            (FieldValue::Nested(l), FieldValue::Nested(r)) => l == r,
            _ => false,
        }
    }
}

/// A record with named fields whose storage is a single flat [`ArrayBuffer`]. The fields are described by the
/// [`ViewType`] of the `NamedArray`, so all `NamedArray`s of the same `ViewType` behave like instances of the same
/// struct.
///
/// # Nested views
///
/// Fields with a [`RegionSpec::TypedRange`] region are accessed as nested `NamedArray`s that alias a range of
/// the parent buffer. The nested view of each field is created on first access and then memoized, so repeated
/// calls to [`NamedArray::get`] return the same `Rc`. Writing to a typed field through [`NamedArray::set`] keeps the
/// memoized view: it aliases the written memory and thus sees the new values, as do its own nested views. To force
/// a new nested view, call [`NamedArray::invalidate`].
///
/// # Mutation
///
/// Since nested views and range fields alias the buffer, all setters take `&self`. A `NamedArray` is not `Send`.
///
/// ```
/// # use namedarray_core::{containers::*, layout::*};
/// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
/// let twist = ViewType::builder("Twist", 6)
///     .typed("linear", 0..3, &vec3)
///     .typed("angular", 3..6, &vec3)
///     .build()
///     .unwrap();
///
/// let t = NamedArray::new(&twist);
/// let linear = t.nested("linear").unwrap();
/// linear.set("y", 2.0).unwrap();
/// assert_eq!(vec![0.0, 2.0, 0.0, 0.0, 0.0, 0.0], t.data());
/// ```
pub struct NamedArray {
    view_type: Arc<ViewType>,
    buffer: ArrayBuffer,
    nested: Vec<OnceCell<Rc<NamedArray>>>,
}

impl NamedArray {
    /// Creates a new `NamedArray` of the given `ViewType` with all elements set to zero
    pub fn new(view_type: &Arc<ViewType>) -> Self {
        Self::wrap(Arc::clone(view_type), ArrayBuffer::zeros(view_type.shape()))
    }

    /// Creates a new `NamedArray` of the given `ViewType` with a copy of `values` as its data
    ///
    /// # Errors
    ///
    /// If `values.len()` does not equal the number of elements of `view_type`
    /// ```
    /// # use namedarray_core::{containers::*, layout::*};
    /// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
    /// let v = NamedArray::from_slice(&vec3, &[0.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(1.0, v.scalar("y").unwrap());
    /// assert!(NamedArray::from_slice(&vec3, &[0.0, 1.0]).is_err());
    /// ```
    pub fn from_slice(view_type: &Arc<ViewType>, values: &[f64]) -> Result<Self> {
        let buffer = ArrayBuffer::from_slice(view_type.shape(), values)?;
        Ok(Self::wrap(Arc::clone(view_type), buffer))
    }

    /// Creates a new `NamedArray` of the given `ViewType` that wraps `buffer` without copying it. Writes through the
    /// `NamedArray` are visible in all aliases of `buffer`
    ///
    /// # Errors
    ///
    /// If the shape of `buffer` is not the shape of `view_type`. Use [`ArrayBuffer::reshape`] to adjust the shape
    pub fn from_buffer(view_type: &Arc<ViewType>, buffer: ArrayBuffer) -> Result<Self> {
        if buffer.shape() != view_type.shape() {
            return Err(NamedArrayError::shape(
                view_type.shape().dims(),
                buffer.shape().dims(),
            ));
        }
        Ok(Self::wrap(Arc::clone(view_type), buffer))
    }

    /// Creates a new `NamedArray` of the given `ViewType` from the attributes of `object`. See [`build_from`]
    pub fn from_object(
        view_type: &Arc<ViewType>,
        object: &dyn AttributeObject,
        fields: Option<&[&str]>,
    ) -> Result<Self> {
        build_from(view_type, object, fields)
    }

    fn wrap(view_type: Arc<ViewType>, buffer: ArrayBuffer) -> Self {
        let nested = (0..view_type.field_count())
            .map(|_| OnceCell::new())
            .collect();
        Self {
            view_type,
            buffer,
            nested,
        }
    }

    /// Returns the `ViewType` of this `NamedArray`
    pub fn view_type(&self) -> &Arc<ViewType> {
        &self.view_type
    }

    /// Returns the name of the `ViewType` of this `NamedArray`
    pub fn type_name(&self) -> &str {
        self.view_type.name()
    }

    /// Returns the buffer that stores the data of this `NamedArray`. Every numeric operation that can be applied to
    /// this buffer can be applied to the `NamedArray` with the same result
    pub fn buffer(&self) -> &ArrayBuffer {
        &self.buffer
    }

    /// Consumes this `NamedArray` and returns its buffer
    pub fn into_buffer(self) -> ArrayBuffer {
        self.buffer
    }

    /// Returns a copy of all elements of this `NamedArray`
    pub fn data(&self) -> Vec<f64> {
        self.buffer.to_vec()
    }

    /// Returns a `NamedArray` of the same `ViewType` with an independent copy of the data
    pub fn deep_copy(&self) -> NamedArray {
        Self::wrap(Arc::clone(&self.view_type), self.buffer.deep_copy())
    }

    /// Returns the value of the given field
    ///
    /// - Scalar fields yield their element
    /// - Range fields yield an [`ArrayBuffer`] that aliases this `NamedArray`
    /// - Typed range fields yield the memoized nested `NamedArray`
    ///
    /// # Errors
    ///
    /// If this `NamedArray` has no field with the given name
    pub fn get(&self, field: &str) -> Result<FieldValue> {
        let index = self.index_of(field)?;
        Ok(self.value_at(index))
    }

    /// Returns the element of the given scalar field
    ///
    /// # Errors
    ///
    /// If there is no such field, or if it is no scalar field
    pub fn scalar(&self, field: &str) -> Result<f64> {
        match self.get(field)? {
            FieldValue::Scalar(value) => Ok(value),
            _ => Err(self.wrong_kind(field, "scalar")),
        }
    }

    /// Returns the aliasing buffer of the given range field. Typed range fields are accepted as well, in which case
    /// the raw range is returned
    ///
    /// # Errors
    ///
    /// If there is no such field, or if it is a scalar field
    pub fn range(&self, field: &str) -> Result<ArrayBuffer> {
        let index = self.index_of(field)?;
        match self.definition_at(index).region() {
            RegionSpec::Scalar(_) => Err(self.wrong_kind(field, "range")),
            region => Ok(self.buffer.slice(region.range())),
        }
    }

    /// Returns the memoized nested `NamedArray` of the given typed range field
    ///
    /// # Errors
    ///
    /// If there is no such field, or if it is no typed range field
    pub fn nested(&self, field: &str) -> Result<Rc<NamedArray>> {
        match self.get(field)? {
            FieldValue::Nested(nested) => Ok(nested),
            _ => Err(self.wrong_kind(field, "typed range")),
        }
    }

    /// Writes `value` into the region of the given field. Scalar fields require a [`Value::Scalar`], (typed) range
    /// fields require a [`Value::Sequence`] with as many elements as the range. The data is left untouched if any of
    /// these checks fail. Memoized nested views are kept, see the type-level documentation
    ///
    /// # Errors
    ///
    /// - `UnknownField` if there is no such field
    /// - `Shape` if `value` does not fit the region of the field
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(field)?;
        let region = self.definition_at(index).region();
        match (region, value.into()) {
            (RegionSpec::Scalar(offset), Value::Scalar(value)) => {
                self.buffer.set_at(*offset, value);
                Ok(())
            }
            (RegionSpec::Scalar(_), Value::Sequence(values)) => {
                Err(NamedArrayError::shape(&[], &[values.len()]))
            }
            (region, Value::Scalar(_)) => Err(NamedArrayError::shape(&[region.len()], &[])),
            (region, Value::Sequence(values)) => {
                self.buffer.slice(region.range()).copy_from_slice(&values)
            }
        }
    }

    /// Returns `true` if the nested view of the given field has been created and memoized
    ///
    /// # Errors
    ///
    /// If there is no such field
    pub fn is_memoized(&self, field: &str) -> Result<bool> {
        let index = self.index_of(field)?;
        Ok(self.nested[index].get().is_some())
    }

    /// Drops the memoized nested view of the given field, so that the next access creates a new one. Views that were
    /// handed out before stay valid and keep aliasing this `NamedArray`
    ///
    /// # Errors
    ///
    /// If there is no such field
    pub fn invalidate(&mut self, field: &str) -> Result<()> {
        let index = self.index_of(field)?;
        if self.nested[index].take().is_some() {
            log::trace!("Invalidated nested view {}.{}", self.type_name(), field);
        }
        Ok(())
    }

    /// Drops all memoized nested views. See [`NamedArray::invalidate`]
    pub fn invalidate_all(&mut self) {
        self.nested.iter_mut().for_each(|memo| {
            memo.take();
        });
    }

    /// Returns an iterator over the names and values of all fields, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldValue)> + '_ {
        self.view_type
            .fields()
            .enumerate()
            .map(move |(index, definition)| (definition.name(), self.value_at(index)))
    }

    /// Writes the fields of this `NamedArray` into the attributes of `object`. See [`populate_from`]
    pub fn fill_object(
        &self,
        object: &mut dyn AttributeObject,
        fields: Option<&[&str]>,
    ) -> Result<()> {
        populate_from(self, object, fields)
    }

    fn index_of(&self, field: &str) -> Result<usize> {
        self.view_type
            .index_of(field)
            .ok_or_else(|| self.view_type.unknown_field(field))
    }

    fn definition_at(&self, index: usize) -> &FieldDefinition {
        self.view_type
            .field_at(index)
            .expect("field index comes from the ViewType of this NamedArray")
    }

    pub(crate) fn value_at(&self, index: usize) -> FieldValue {
        match self.definition_at(index).region() {
            RegionSpec::Scalar(offset) => FieldValue::Scalar(self.buffer.at(*offset)),
            RegionSpec::Range(range) => FieldValue::Range(self.buffer.slice(range.clone())),
            RegionSpec::TypedRange(range, nested_type) => {
                let nested = self.nested[index].get_or_init(|| {
                    log::trace!(
                        "Creating nested view {}.{} of type {}",
                        self.type_name(),
                        self.definition_at(index).name(),
                        nested_type.name()
                    );
                    let buffer = self
                        .buffer
                        .slice(range.clone())
                        .reshape(nested_type.shape())
                        .expect("nested ViewType has as many elements as its range");
                    Rc::new(Self::wrap(Arc::clone(nested_type), buffer))
                });
                FieldValue::Nested(Rc::clone(nested))
            }
        }
    }

    fn wrong_kind(&self, field: &str, requested: &'static str) -> NamedArrayError {
        let actual = self
            .view_type
            .field(field)
            .map(|definition| definition.region().kind())
            .unwrap_or("unknown");
        NamedArrayError::FieldKind {
            field: field.to_owned(),
            requested,
            actual,
        }
    }
}

impl AsRef<ArrayBuffer> for NamedArray {
    fn as_ref(&self) -> &ArrayBuffer {
        &self.buffer
    }
}

/// A `NamedArray` is itself an object with attributes, one for each field. This makes it possible to convert between
/// `NamedArray`s of different view types that share field names, and to write functions that work with both plain
/// structs and `NamedArray`s. Nested views are exposed as nested objects for reading. For writing, nested fields are
/// assigned as a whole, which has the same effect on the underlying buffer
impl AttributeObject for NamedArray {
    fn has_attribute(&self, name: &str) -> bool {
        self.view_type.has_field(name)
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        self.get(name).ok().map(|value| value.to_value())
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        self.set(name, value)
    }

    fn attribute_object(&self, name: &str) -> Option<&dyn AttributeObject> {
        let index = self.view_type.index_of(name)?;
        self.definition_at(index).region().nested_type()?;
        // Make sure the memo is populated, then borrow from it
        self.value_at(index);
        self.nested[index]
            .get()
            .map(|nested| nested.as_ref() as &dyn AttributeObject)
    }
}

impl PartialEq for NamedArray {
    fn eq(&self, other: &Self) -> bool {
        self.view_type.name() == other.view_type.name() && self.buffer == other.buffer
    }
}

impl Debug for NamedArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.type_name(), self.data())
    }
}

impl Display for NamedArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.type_name(), self.buffer)
    }
}
