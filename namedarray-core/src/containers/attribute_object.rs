use std::collections::BTreeMap;

use crate::error::{NamedArrayError, Result};

use super::Value;

/// Capability of an object to expose named attributes. This is the only thing that
/// [`populate_from`](super::populate_from) and [`build_from`](super::build_from) assume about the objects that
/// they convert from and to.
///
/// An attribute is either a plain [`Value`] or a nested object that itself implements `AttributeObject`. Nested
/// objects are what nested view types convert to. For plain Rust structs, prefer `#[derive(AttributeObject)]`
/// over implementing this trait by hand:
///
/// ```
/// # use namedarray_core::{containers::*, layout::*};
/// #[derive(AttributeObject, Default)]
/// struct Point {
///     x: f64,
///     y: f64,
///     z: f64,
/// }
///
/// let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
/// let v = build_from(&vec3, &Point { x: 1.0, y: 2.0, z: 3.0 }, None).unwrap();
/// assert_eq!(vec![1.0, 2.0, 3.0], v.data());
/// ```
pub trait AttributeObject {
    /// Returns `true` if this object has an attribute with the given name, no matter whether it is a plain value
    /// or a nested object
    fn has_attribute(&self, name: &str) -> bool;

    /// Returns the value of the attribute with the given name. Returns `None` if there is no such attribute, or
    /// if the attribute is a nested object that can't be represented as a single `Value`
    fn get_attribute(&self, name: &str) -> Option<Value>;

    /// Sets the attribute with the given name to `value`
    ///
    /// # Errors
    ///
    /// If the attribute does not exist and can't be created, or if it can't hold `value`
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;

    /// Returns the attribute with the given name as a nested object, or `None` if there is no such attribute or
    /// if it is a plain value
    fn attribute_object(&self, _name: &str) -> Option<&dyn AttributeObject> {
        None
    }

    /// Mutable version of [`AttributeObject::attribute_object`]
    fn attribute_object_mut(&mut self, _name: &str) -> Option<&mut dyn AttributeObject> {
        None
    }
}

/// A single entry of an [`AttributeMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Value(Value),
    Object(AttributeMap),
}

/// A dynamic object whose attributes are stored in a map, sorted by name. Setting an attribute that does not exist
/// yet creates it, the same as assigning an attribute on a dynamically typed object would
///
/// ```
/// # use namedarray_core::containers::*;
/// let mut object = AttributeMap::new()
///     .with_value("x", 1.0)
///     .with_object("offset", AttributeMap::new().with_value("y", vec![1.0, 2.0]));
/// assert!(object.has_attribute("offset"));
/// assert_eq!(Some(Value::Scalar(1.0)), object.get_attribute("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMap {
    attributes: BTreeMap<String, Attribute>,
}

impl AttributeMap {
    /// Creates a new `AttributeMap` without any attributes
    pub fn new() -> Self {
        Self {
            ..Default::default()
        }
    }

    /// Adds a plain value attribute, replacing any attribute with the same name
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert_value(name, value);
        self
    }

    /// Adds a nested object attribute, replacing any attribute with the same name
    pub fn with_object(mut self, name: &str, object: AttributeMap) -> Self {
        self.insert_object(name, object);
        self
    }

    /// Inserts a plain value attribute, replacing any attribute with the same name
    pub fn insert_value(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes
            .insert(name.to_owned(), Attribute::Value(value.into()));
    }

    /// Inserts a nested object attribute, replacing any attribute with the same name
    pub fn insert_object(&mut self, name: &str, object: AttributeMap) {
        self.attributes
            .insert(name.to_owned(), Attribute::Object(object));
    }

    /// Removes the attribute with the given name and returns it
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    /// Returns the attribute with the given name
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Returns the nested object with the given name, or `None` if there is no such attribute or if it is a plain value
    pub fn get_object(&self, name: &str) -> Option<&AttributeMap> {
        match self.attributes.get(name) {
            Some(Attribute::Object(object)) => Some(object),
            _ => None,
        }
    }

    /// Returns the number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if this object has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns an iterator over all attributes, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> + '_ {
        self.attributes
            .iter()
            .map(|(name, attribute)| (name.as_str(), attribute))
    }
}

impl AttributeObject for AttributeMap {
    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        match self.attributes.get(name) {
            Some(Attribute::Value(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        if name.is_empty() {
            return Err(NamedArrayError::attribute_type(
                name,
                "attribute names must not be empty",
            ));
        }
        self.insert_value(name, value);
        Ok(())
    }

    fn attribute_object(&self, name: &str) -> Option<&dyn AttributeObject> {
        match self.attributes.get(name) {
            Some(Attribute::Object(object)) => Some(object),
            _ => None,
        }
    }

    fn attribute_object_mut(&mut self, name: &str) -> Option<&mut dyn AttributeObject> {
        match self.attributes.get_mut(name) {
            Some(Attribute::Object(object)) => Some(object),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{populate_from, AttributeObject, NamedArray};
    use crate::layout::ViewType;

    #[derive(AttributeObject, Debug, Default, PartialEq)]
    struct Sample {
        time: f64,
        #[namedarray(nested)]
        offset: AttributeMap,
        #[namedarray(skip)]
        id: u32,
    }

    #[test]
    fn test_derived_object_with_nested_map() -> anyhow::Result<()> {
        let vec2 = ViewType::compile("Vec2", 2, vec![("x", 0), ("y", 1)])?;
        let sample_type = ViewType::builder("Sample", 3)
            .scalar("time", 0)
            .typed("offset", 1..3, &vec2)
            .build()?;
        let view = NamedArray::from_slice(&sample_type, &[0.5, 1.0, 2.0])?;

        let mut sample = Sample {
            offset: AttributeMap::new().with_value("x", 0.0).with_value("y", 0.0),
            id: 7,
            ..Default::default()
        };
        assert!(!sample.has_attribute("id"));
        populate_from(&view, &mut sample, None)?;
        assert_eq!(0.5, sample.time);
        assert_eq!(Some(Value::Scalar(2.0)), sample.offset.get_attribute("y"));
        assert_eq!(7, sample.id);
        Ok(())
    }

    #[test]
    fn test_attribute_map_set_replaces() -> anyhow::Result<()> {
        let mut object = AttributeMap::new().with_object("inner", AttributeMap::new());
        assert!(object.attribute_object("inner").is_some());
        assert_eq!(None, object.get_attribute("inner"));

        object.set_attribute("inner", Value::Scalar(2.0))?;
        assert!(object.attribute_object("inner").is_none());
        assert_eq!(Some(Value::Scalar(2.0)), object.get_attribute("inner"));
        Ok(())
    }

    #[test]
    fn test_attribute_map_nested_mut() -> anyhow::Result<()> {
        let mut object = AttributeMap::new().with_object("inner", AttributeMap::new());
        object
            .attribute_object_mut("inner")
            .expect("nested object")
            .set_attribute("x", Value::Scalar(1.0))?;
        assert_eq!(
            Some(Value::Scalar(1.0)),
            object.get_object("inner").and_then(|inner| inner.get_attribute("x"))
        );
        Ok(())
    }
}
