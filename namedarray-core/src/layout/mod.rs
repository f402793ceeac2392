//! Compiling schemas into view types
//!
//! A schema maps field names to regions of a flat numeric buffer of a fixed [`Shape`]. Compiling a schema
//! yields a [`ViewType`], which is shared through an `Arc` by all [`NamedArray`](crate::containers::NamedArray)s
//! of that type. View types can nest other view types by binding them to a range (see [`ViewType::region`]).

mod shape;
pub use self::shape::*;

mod region;
pub use self::region::*;

mod view_type;
pub use self::view_type::*;
