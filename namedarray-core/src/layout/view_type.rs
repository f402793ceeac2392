use std::{collections::HashSet, fmt::Display, ops::Range, sync::Arc};

use itertools::Itertools;

use crate::error::{NamedArrayError, Result};

use super::{FieldDefinition, RegionSpec, Shape};

/// The compiled description of a named array type. A `ViewType` has a name, a fixed [`Shape`] and an ordered
/// list of named fields, each of which refers to a [`RegionSpec`] of a flat buffer with that shape. It is the
/// runtime equivalent of a struct definition: every [`NamedArray`](crate::containers::NamedArray) holds an
/// `Arc<ViewType>` and resolves its fields through it.
///
/// `ViewType`s are immutable once compiled and are shared through `Arc`, both by all instances and by other
/// view types that nest them. Compiling the same schema twice yields two independent, but equal, view types.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ViewType {
    name: String,
    shape: Shape,
    fields: Vec<FieldDefinition>,
}

impl ViewType {
    /// Compiles a new `ViewType` from the given name, shape and field specifications. Fields keep the order
    /// in which they are passed in
    ///
    /// # Errors
    ///
    /// - `InvalidSchema` if `type_name` or a field name is empty, or if `shape` has no dimensions or a
    ///   zero-sized dimension
    /// - `DuplicateField` if two fields share the same name
    /// - `OutOfBounds` if a region does not lie within `shape`
    /// - `ShapeMismatch` if a nested view type does not have as many elements as the range it is bound to
    ///
    /// ```
    /// # use namedarray_core::layout::*;
    /// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
    /// let twist = ViewType::compile(
    ///     "Twist",
    ///     6,
    ///     vec![("linear", vec3.region(0..3)), ("angular", vec3.region(3..6))],
    /// )
    /// .unwrap();
    /// assert_eq!(2, twist.fields().count());
    /// ```
    pub fn compile<S, I, N, R>(type_name: &str, shape: S, fields: I) -> Result<Arc<ViewType>>
    where
        S: Into<Shape>,
        I: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: Into<RegionSpec>,
    {
        let shape = shape.into();
        validate_shape(type_name, &shape)?;

        let len = shape.len();
        let mut known_names = HashSet::new();
        let mut definitions = vec![];
        for (name, region) in fields {
            let name = name.into();
            let region = region.into();
            if name.is_empty() {
                return Err(NamedArrayError::InvalidSchema {
                    type_name: type_name.to_owned(),
                    reason: "field names must not be empty".into(),
                });
            }
            if !known_names.insert(name.clone()) {
                return Err(NamedArrayError::DuplicateField {
                    type_name: type_name.to_owned(),
                    field: name,
                });
            }
            validate_region(&name, &region, len)?;
            definitions.push(FieldDefinition::new(name, region));
        }

        log::debug!(
            "Compiled view type {} with shape {} and {} field(s)",
            type_name,
            shape,
            definitions.len()
        );

        Ok(Arc::new(Self {
            name: type_name.to_owned(),
            shape,
            fields: definitions,
        }))
    }

    /// Returns a [`ViewTypeBuilder`] for incrementally defining a new `ViewType`
    /// ```
    /// # use namedarray_core::layout::*;
    /// let vec3 = ViewType::builder("Vec3", 3)
    ///     .scalar("x", 0)
    ///     .scalar("y", 1)
    ///     .scalar("z", 2)
    ///     .build()
    ///     .unwrap();
    /// assert!(vec3.has_field("y"));
    /// ```
    pub fn builder(type_name: &str, shape: impl Into<Shape>) -> ViewTypeBuilder {
        ViewTypeBuilder::new(type_name, shape)
    }

    /// Binds this `ViewType` to the given `range`, so that another schema can nest it
    pub fn region(self: &Arc<Self>, range: Range<usize>) -> RegionSpec {
        RegionSpec::TypedRange(range, Arc::clone(self))
    }

    /// Returns the name of this `ViewType`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `Shape` of the buffer that instances of this `ViewType` wrap
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the number of elements in the buffer that instances of this `ViewType` wrap
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// Returns `true` if instances of this `ViewType` wrap an empty buffer. Compiled view types are never empty
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Returns an iterator over all fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> + '_ {
        self.fields.iter()
    }

    /// Returns an iterator over all field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name())
    }

    /// Returns the number of fields of this `ViewType`
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the field with the given name, or `None` if no such field exists
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the field at the given position, or `None` if `index` is out of bounds
    pub fn field_at(&self, index: usize) -> Option<&FieldDefinition> {
        self.fields.get(index)
    }

    /// Returns `true` if a field with the given name exists
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the position of the field with the given name in declaration order
    /// ```
    /// # use namedarray_core::layout::*;
    /// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
    /// assert_eq!(Some(1), vec3.index_of("y"));
    /// assert_eq!(None, vec3.index_of("w"));
    /// ```
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    pub(crate) fn unknown_field(&self, field: &str) -> NamedArrayError {
        NamedArrayError::UnknownField {
            type_name: self.name.clone(),
            field: field.to_owned(),
        }
    }
}

impl Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {{ {} }}",
            self.name,
            self.shape,
            self.fields.iter().join(", ")
        )
    }
}

fn validate_shape(type_name: &str, shape: &Shape) -> Result<()> {
    let reason = if type_name.is_empty() {
        "type name must not be empty"
    } else if shape.ndim() == 0 {
        "shape must have at least one dimension"
    } else if shape.dims().contains(&0) {
        "all dimensions must be positive"
    } else if shape.checked_len().is_none() {
        "number of elements overflows usize"
    } else {
        return Ok(());
    };
    Err(NamedArrayError::InvalidSchema {
        type_name: type_name.to_owned(),
        reason: reason.into(),
    })
}

fn validate_region(field: &str, region: &RegionSpec, len: usize) -> Result<()> {
    if let RegionSpec::Scalar(offset) = region {
        if *offset >= len {
            return Err(NamedArrayError::OutOfBounds {
                field: field.to_owned(),
                region: *offset..offset.saturating_add(1),
                len,
            });
        }
        return Ok(());
    }
    let range = region.range();
    if range.start > range.end || range.end > len {
        return Err(NamedArrayError::OutOfBounds {
            field: field.to_owned(),
            region: range,
            len,
        });
    }
    if let Some(nested_type) = region.nested_type() {
        if nested_type.len() != region.len() {
            return Err(NamedArrayError::ShapeMismatch {
                field: field.to_owned(),
                nested_type: nested_type.name().to_owned(),
                expected: nested_type.len(),
                found: region.len(),
            });
        }
    }
    Ok(())
}

/// Incremental builder for a [`ViewType`]. All validation happens in [`ViewTypeBuilder::build`]
#[derive(Debug, Clone)]
pub struct ViewTypeBuilder {
    name: String,
    shape: Shape,
    fields: Vec<(String, RegionSpec)>,
}

impl ViewTypeBuilder {
    /// Creates a new builder for a `ViewType` with the given name and shape and no fields
    pub fn new(type_name: &str, shape: impl Into<Shape>) -> Self {
        Self {
            name: type_name.to_owned(),
            shape: shape.into(),
            fields: vec![],
        }
    }

    /// Adds a field for the single element at `offset`
    pub fn scalar(self, name: &str, offset: usize) -> Self {
        self.field(name, RegionSpec::Scalar(offset))
    }

    /// Adds a field for the elements in `range`
    pub fn range(self, name: &str, range: Range<usize>) -> Self {
        self.field(name, RegionSpec::Range(range))
    }

    /// Adds a field for the elements in `range`, viewed as `nested_type`
    pub fn typed(self, name: &str, range: Range<usize>, nested_type: &Arc<ViewType>) -> Self {
        self.field(name, nested_type.region(range))
    }

    /// Adds a field for an arbitrary region
    pub fn field(mut self, name: &str, region: impl Into<RegionSpec>) -> Self {
        self.fields.push((name.to_owned(), region.into()));
        self
    }

    /// Compiles the `ViewType`. See [`ViewType::compile`] for the possible errors
    pub fn build(self) -> Result<Arc<ViewType>> {
        ViewType::compile(&self.name, self.shape, self.fields)
    }
}
