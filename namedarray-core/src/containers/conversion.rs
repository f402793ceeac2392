use std::sync::Arc;

use crate::{
    error::{NamedArrayError, Result},
    layout::{RegionSpec, ViewType},
};

use super::{AttributeObject, FieldValue, NamedArray, Value};

/// Resolves the optional field selection of a conversion. `None` selects all fields in declaration order
fn selected_fields<'a>(view_type: &'a ViewType, fields: Option<&[&'a str]>) -> Vec<&'a str> {
    match fields {
        Some(fields) => fields.to_vec(),
        None => view_type.field_names().collect(),
    }
}

/// Writes the fields of `array` into the attributes of `object` that have the same names.
///
/// `fields` selects which fields to write, `None` writes all fields in declaration order. For every field:
/// - If it is a nested view and `object` exposes the attribute as a nested object, the nested view writes its own
///   fields into that nested object
/// - Otherwise, the value of the field is assigned to the attribute
///
/// # Errors
///
/// - `UnknownField` if `fields` contains a name that `array` does not have
/// - `MissingAttribute` if `object` (or one of its nested objects) does not have an attribute for a selected field
///
/// Processing stops at the first error. Attributes that were written before are *not* restored.
///
/// ```
/// # use namedarray_core::{containers::*, layout::*};
/// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
/// let v = NamedArray::from_slice(&vec3, &[1.0, 2.0, 3.0]).unwrap();
/// let mut object = AttributeMap::new()
///     .with_value("x", 0.0)
///     .with_value("y", 0.0)
///     .with_value("z", 0.0);
/// populate_from(&v, &mut object, None).unwrap();
/// assert_eq!(Some(Value::Scalar(2.0)), object.get_attribute("y"));
/// ```
pub fn populate_from(
    array: &NamedArray,
    object: &mut dyn AttributeObject,
    fields: Option<&[&str]>,
) -> Result<()> {
    let view_type = Arc::clone(array.view_type());
    for field in selected_fields(&view_type, fields) {
        let index = view_type
            .index_of(field)
            .ok_or_else(|| view_type.unknown_field(field))?;
        if !object.has_attribute(field) {
            return Err(NamedArrayError::missing_attribute(field));
        }

        match array.value_at(index) {
            FieldValue::Nested(nested) => {
                if let Some(nested_object) = object.attribute_object_mut(field) {
                    populate_from(&nested, nested_object, None)?;
                } else {
                    object.set_attribute(field, Value::from(nested.as_ref()))?;
                }
            }
            value => object.set_attribute(field, value.to_value())?,
        }
    }
    Ok(())
}

/// Creates a new `NamedArray` of the given `ViewType` from the attributes of `object` that have the same names as
/// its fields.
///
/// The new `NamedArray` starts out with all elements set to zero. `fields` selects which fields to read, `None`
/// reads all fields in declaration order, unselected fields keep their zero value. For every selected field:
/// - If it is a typed range field and `object` exposes the attribute as a nested object, a nested `NamedArray` is
///   built recursively from that object and its data is copied into the range
/// - Otherwise, the value of the attribute is assigned to the field, see [`NamedArray::set`]
///
/// # Errors
///
/// - `UnknownField` if `fields` contains a name that `view_type` does not have
/// - `MissingAttribute` if `object` (or one of its nested objects) does not have an attribute for a selected field
/// - `Shape` if the value of an attribute does not fit the region of its field
///
/// ```
/// # use namedarray_core::{containers::*, layout::*};
/// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
/// let object = AttributeMap::new()
///     .with_value("x", 1.0)
///     .with_value("y", 2.0)
///     .with_value("z", 3.0);
/// let v = build_from(&vec3, &object, Some(&["x"])).unwrap();
/// assert_eq!(vec![1.0, 0.0, 0.0], v.data());
/// ```
pub fn build_from(
    view_type: &Arc<ViewType>,
    object: &dyn AttributeObject,
    fields: Option<&[&str]>,
) -> Result<NamedArray> {
    let array = NamedArray::new(view_type);
    for field in selected_fields(view_type, fields) {
        let definition = view_type
            .field(field)
            .ok_or_else(|| view_type.unknown_field(field))?;
        if !object.has_attribute(field) {
            return Err(NamedArrayError::missing_attribute(field));
        }

        if let RegionSpec::TypedRange(_, nested_type) = definition.region() {
            if let Some(nested_object) = object.attribute_object(field) {
                let nested = build_from(nested_type, nested_object, None)?;
                array.set(field, &nested)?;
                continue;
            }
        }

        let value = object
            .get_attribute(field)
            .ok_or_else(|| NamedArrayError::missing_attribute(field))?;
        array.set(field, value)?;
    }
    Ok(array)
}
