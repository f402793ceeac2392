use std::{
    fmt::Display,
    ops::{Range, RangeTo},
    sync::Arc,
};

use super::ViewType;

/// Describes which part of a flat buffer a field of a [`ViewType`] refers to. A region is either a single
/// element (`Scalar`), a contiguous range of elements (`Range`) or a contiguous range of elements that is
/// interpreted as another `ViewType` (`TypedRange`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RegionSpec {
    /// A single element at the given offset
    Scalar(usize),
    /// The elements within the given range
    Range(Range<usize>),
    /// The elements within the given range, viewed as the given nested `ViewType`
    TypedRange(Range<usize>, Arc<ViewType>),
}

impl RegionSpec {
    /// Returns the range of elements that this region covers. For a `Scalar` region, this is a range of length 1
    /// (or an empty range at `usize::MAX`, which no compiled `ViewType` contains)
    /// ```
    /// # use namedarray_core::layout::*;
    /// assert_eq!(2..3, RegionSpec::Scalar(2).range());
    /// assert_eq!(0..4, RegionSpec::Range(0..4).range());
    /// ```
    pub fn range(&self) -> Range<usize> {
        match self {
            RegionSpec::Scalar(offset) => *offset..offset.saturating_add(1),
            RegionSpec::Range(range) => range.clone(),
            RegionSpec::TypedRange(range, _) => range.clone(),
        }
    }

    /// Returns the number of elements in this region
    pub fn len(&self) -> usize {
        let range = self.range();
        range.end.saturating_sub(range.start)
    }

    /// Returns `true` if this region covers no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the nested `ViewType` for a `TypedRange` region, `None` otherwise
    pub fn nested_type(&self) -> Option<&Arc<ViewType>> {
        match self {
            RegionSpec::TypedRange(_, nested_type) => Some(nested_type),
            _ => None,
        }
    }

    /// A short human-readable name for the kind of this region
    pub fn kind(&self) -> &'static str {
        match self {
            RegionSpec::Scalar(_) => "scalar",
            RegionSpec::Range(_) => "range",
            RegionSpec::TypedRange(_, _) => "typed range",
        }
    }
}

impl Display for RegionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionSpec::Scalar(offset) => write!(f, "[{}]", offset),
            RegionSpec::Range(range) => write!(f, "[{}..{}]", range.start, range.end),
            RegionSpec::TypedRange(range, nested_type) => write!(
                f,
                "[{}..{}] as {}",
                range.start,
                range.end,
                nested_type.name()
            ),
        }
    }
}

impl From<usize> for RegionSpec {
    fn from(offset: usize) -> Self {
        RegionSpec::Scalar(offset)
    }
}

impl From<Range<usize>> for RegionSpec {
    fn from(range: Range<usize>) -> Self {
        RegionSpec::Range(range)
    }
}

impl From<RangeTo<usize>> for RegionSpec {
    fn from(range: RangeTo<usize>) -> Self {
        RegionSpec::Range(0..range.end)
    }
}

/// A single named field within a [`ViewType`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDefinition {
    name: String,
    region: RegionSpec,
}

impl FieldDefinition {
    pub(crate) fn new(name: String, region: RegionSpec) -> Self {
        Self { name, region }
    }

    /// Returns the name of this field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the region of the buffer that this field refers to
    pub fn region(&self) -> &RegionSpec {
        &self.region
    }

    /// Returns the range of elements that this field covers
    pub fn range(&self) -> Range<usize> {
        self.region.range()
    }

    /// Returns `true` if this field is viewed as a nested `ViewType`
    pub fn is_nested(&self) -> bool {
        self.region.nested_type().is_some()
    }
}

impl Display for FieldDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.region)
    }
}
