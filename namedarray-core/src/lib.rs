#![warn(clippy::all)]

//! Named, typed views over flat numeric buffers
//!
//! A [`ViewType`](crate::layout::ViewType) is compiled once from a schema that maps field names to regions of a
//! flat `f64` buffer. A [`NamedArray`](crate::containers::NamedArray) of that type then reads and writes its fields by
//! name, while all of its data stays in one contiguous [`ArrayBuffer`](crate::containers::ArrayBuffer) that the
//! functions in [`math`] operate on as a whole. Nested view types give access to sub-ranges of the buffer as nested
//! `NamedArray`s that alias the memory of their parent.
//!
//! ```
//! # use namedarray_core::{containers::*, layout::*, math::*};
//! let vec3 = ViewType::compile("Vec3", 3, vec![("x", 0), ("y", 1), ("z", 2)]).unwrap();
//! let twist = ViewType::builder("Twist", 6)
//!     .typed("linear", 0..3, &vec3)
//!     .typed("angular", 3..6, &vec3)
//!     .build()
//!     .unwrap();
//!
//! let t = NamedArray::new(&twist);
//! t.nested("linear").unwrap().set("y", 2.0).unwrap();
//! assert_eq!(vec![0.0, 2.0, 0.0, 0.0, 0.0, 0.0], t.data());
//! assert_eq!(2.0, norm(&t));
//! ```

pub extern crate nalgebra;
extern crate self as namedarray_core;

pub mod containers;
pub mod error;
pub mod layout;
/// Bulk numeric operations on buffers and views
pub mod math;
