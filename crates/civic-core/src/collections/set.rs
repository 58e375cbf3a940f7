//! Hash set projected from [`HashTable`].

use crate::collections::{DynamicArray, HashTable};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

/// Unordered set of unique values.
#[derive(Clone)]
pub struct Set<T: Hash + Eq> {
    table: HashTable<T, ()>,
}

impl<T: Hash + Eq> Set<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Insert `item`. Returns `true` when it was not already present.
    pub fn add(&mut self, item: T) -> bool {
        self.table.insert(item, ()).is_none()
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(item)
    }

    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(item).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.table.iter().map(|(k, ())| k)
    }
}

impl<T: Hash + Eq + Clone> Set<T> {
    /// Copy of the members, in iteration order.
    #[must_use]
    pub fn to_array(&self) -> DynamicArray<T> {
        self.table.keys()
    }
}

impl<T: Hash + Eq> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.add(item);
        }
        set
    }
}

impl<T: Hash + Eq + fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
