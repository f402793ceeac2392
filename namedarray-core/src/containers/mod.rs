//! The runtime side of named arrays.
//!
//! A [`NamedArray`] combines a compiled [`ViewType`](crate::layout::ViewType) with an [`ArrayBuffer`] that stores
//! the data of all fields in one flat, contiguous piece of memory. Fields are read and written by name, nested view
//! types are accessed as nested `NamedArray`s that alias the memory of their parent.
//!
//! # Converting from and to other objects
//!
//! Any type that implements [`AttributeObject`] can be the source or target of a conversion:
//! - [`populate_from`] writes the fields of a `NamedArray` into the attributes of an object
//! - [`build_from`] creates a new `NamedArray` from the attributes of an object
//!
//! Fields and attributes are matched by name. [`AttributeMap`] is a dynamic object for cases where no Rust type is
//! available, `#[derive(AttributeObject)]` implements the trait for plain structs.

mod array_buffer;
pub use self::array_buffer::*;

mod value;
pub use self::value::*;

mod attribute_object;
pub use self::attribute_object::{Attribute, AttributeMap, AttributeObject};
pub use namedarray_derive::AttributeObject;

mod named_array;
pub use self::named_array::*;

mod conversion;
pub use self::conversion::*;

#[cfg(feature = "serde")]
mod serde_impls;
