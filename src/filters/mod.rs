//! Filters, Approximate Membership Queries (AMQs).
pub mod bloomfilter;

pub mod compat;

use std::fmt::Debug;

/// A filter is a set-like data structure, that keeps track of elements it has seen without
/// the need to store them. Looking up values has a certain false positive rate, but a false
/// negative rate of 0%.
///
/// This kind of lookup is also referred to as Approximate Membership Queries (AMQs).
pub trait Filter<T>
where
    T: ?Sized,
{
    /// Error type that may occur during insertion or lookup.
    type Err: Debug;

    /// Insert new element into the filter.
    ///
    /// When an error is returned, the element may be partially recorded, i.e. the filter state
    /// might have changed.
    fn insert(&mut self, obj: &T) -> Result<(), Self::Err>;

    /// Guess if the given element was added to the filter.
    fn query(&self, obj: &T) -> Result<bool, Self::Err>;

    /// Number of elements the filter keeps track of.
    ///
    /// Exact sets report distinct elements, approximate filters may count every insertion.
    fn len(&self) -> usize;

    /// Check if filter is empty, i.e. contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
