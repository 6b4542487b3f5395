//! Implementation of `Filter` for certain non-probabilistic data structures. This can be helpful
//! for debugging and for measuring false positives against an exact baseline.
use std::collections::HashSet;
use std::convert::Infallible;
use std::hash::{BuildHasher, Hash};

use crate::filters::Filter;

impl<T, S> Filter<T> for HashSet<T, S>
where
    T: Clone + Eq + Hash,
    S: BuildHasher,
{
    type Err = Infallible;

    fn insert(&mut self, obj: &T) -> Result<(), Self::Err> {
        self.insert(obj.clone());
        Ok(())
    }

    fn query(&self, obj: &T) -> Result<bool, Self::Err> {
        Ok(self.contains(obj))
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}
