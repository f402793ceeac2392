use serde::{
    ser::{SerializeMap, SerializeStruct},
    Serialize, Serializer,
};

use super::{ArrayBuffer, FieldValue, NamedArray, Value};

impl Serialize for ArrayBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ArrayBuffer", 2)?;
        state.serialize_field("shape", self.shape())?;
        state.serialize_field("values", &self.to_vec())?;
        state.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(value) => serializer.serialize_f64(*value),
            Value::Sequence(values) => serializer.collect_seq(values),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(value) => serializer.serialize_f64(*value),
            FieldValue::Range(buffer) => serializer.collect_seq(buffer.to_vec()),
            FieldValue::Nested(nested) => nested.serialize(serializer),
        }
    }
}

/// A `NamedArray` serializes as a map from field names to field values, nested views become nested maps
impl Serialize for NamedArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.view_type().field_count()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
