//! Growable array with doubling capacity and bounds-checked access.

use crate::primitives::DEFAULT_ARRAY_CAPACITY;
use crate::CivicError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Resizable array.
///
/// Slots `[0, len)` are always occupied; slots past `len` are spare
/// capacity. Capacity never drops below 1 and doubles on overflow.
#[derive(Clone)]
pub struct DynamicArray<T> {
    slots: Box<[Option<T>]>,
    len: usize,
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    (0..capacity).map(|_| None).collect()
}

impl<T> DynamicArray<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ARRAY_CAPACITY)
    }

    /// Create an empty array; a requested capacity of 0 is raised to 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity.max(1)),
            len: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append an element. Amortized O(1).
    pub fn push(&mut self, item: T) {
        self.ensure_capacity(self.len + 1);
        self.slots[self.len] = Some(item);
        self.len += 1;
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.slots[self.len].take()
    }

    pub fn get(&self, index: usize) -> Result<&T, CivicError> {
        self.check(index)?;
        self.slots[index]
            .as_ref()
            .ok_or(CivicError::IndexOutOfRange { index, len: self.len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, CivicError> {
        self.check(index)?;
        let len = self.len;
        self.slots[index]
            .as_mut()
            .ok_or(CivicError::IndexOutOfRange { index, len })
    }

    /// Overwrite the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, CivicError> {
        self.check(index)?;
        self.slots[index]
            .replace(item)
            .ok_or(CivicError::IndexOutOfRange { index, len: self.len })
    }

    /// Insert at `index`, shifting later elements right. `index == len` appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), CivicError> {
        if index > self.len {
            return Err(CivicError::IndexOutOfRange { index, len: self.len });
        }
        self.ensure_capacity(self.len + 1);
        for i in (index..self.len).rev() {
            self.slots[i + 1] = self.slots[i].take();
        }
        self.slots[index] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Remove at `index`, shifting later elements left.
    pub fn remove(&mut self, index: usize) -> Result<T, CivicError> {
        self.check(index)?;
        let removed = self.slots[index].take();
        for i in index..self.len - 1 {
            self.slots[i] = self.slots[i + 1].take();
        }
        self.len -= 1;
        removed.ok_or(CivicError::IndexOutOfRange { index, len: self.len })
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), CivicError> {
        self.check(a)?;
        self.check(b)?;
        self.slots.swap(a, b);
        Ok(())
    }

    pub fn reverse(&mut self) {
        self.slots[..self.len].reverse();
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len
            .checked_sub(1)
            .and_then(|i| self.slots[i].as_ref())
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }

    /// Borrowing iterator over `[0, len)`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots[..self.len].iter(),
        }
    }

    fn check(&self, index: usize) -> Result<(), CivicError> {
        if index >= self.len {
            return Err(CivicError::IndexOutOfRange { index, len: self.len });
        }
        Ok(())
    }

    fn ensure_capacity(&mut self, desired: usize) {
        let capacity = self.slots.len();
        if desired <= capacity {
            return;
        }
        let new_capacity = capacity.saturating_mul(2).max(desired);
        let mut grown = empty_slots(new_capacity);
        for (dst, src) in grown.iter_mut().zip(self.slots.iter_mut()) {
            *dst = src.take();
        }
        self.slots = grown;
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Independent fixed-size copy of the current contents.
    #[must_use]
    pub fn to_array(&self) -> Box<[T]> {
        self.iter().cloned().collect()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Owned iterator over a copy taken now.
    ///
    /// Mutating this array afterwards does not affect the iterator, and the
    /// iterator does not observe elements pushed later.
    #[must_use]
    pub fn snapshot(&self) -> IntoIter<T> {
        self.clone().into_iter()
    }
}

impl<T: PartialEq> DynamicArray<T> {
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|x| x == item)
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

// =============================================================================
// ITERATORS
// =============================================================================

/// Borrowing iterator returned by [`DynamicArray::iter`].
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, Option<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().rev().find_map(Option::as_ref)
    }
}

/// Owning iterator.
pub struct IntoIter<T> {
    slots: Box<[Option<T>]>,
    front: usize,
    back: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.front < self.back {
            let item = self.slots[self.front].take();
            self.front += 1;
            if item.is_some() {
                return item;
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back - self.front))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        while self.back > self.front {
            self.back -= 1;
            let item = self.slots[self.back].take();
            if item.is_some() {
                return item;
            }
        }
        None
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            slots: self.slots,
            front: 0,
            back: self.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// =============================================================================
// SERDE
// =============================================================================

impl<T: Serialize> Serialize for DynamicArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DynamicArray<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(|items| items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_doubles_capacity() {
        let mut array = DynamicArray::with_capacity(1);
        assert_eq!(array.capacity(), 1);
        array.push(1);
        array.push(2);
        assert_eq!(array.capacity(), 2);
        array.push(3);
        assert_eq!(array.capacity(), 4);
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let array: DynamicArray<u8> = DynamicArray::with_capacity(0);
        assert_eq!(array.capacity(), 1);
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut array: DynamicArray<i32> = [10, 20].into_iter().collect();
        assert_eq!(*array.get(1).expect("get"), 20);
        assert!(matches!(
            array.get(2),
            Err(CivicError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(array.set(0, 11).expect("set"), 10);
        assert!(array.set(5, 0).is_err());
        assert_eq!(array.to_vec(), vec![11, 20]);
    }

    #[test]
    fn insert_and_remove_shift_elements() {
        let mut array: DynamicArray<char> = "acd".chars().collect();
        array.insert(1, 'b').expect("insert");
        array.insert(4, 'e').expect("append via insert");
        assert_eq!(array.to_vec(), vec!['a', 'b', 'c', 'd', 'e']);

        assert_eq!(array.remove(0).expect("remove"), 'a');
        assert_eq!(array.remove(3).expect("remove"), 'e');
        assert_eq!(array.to_vec(), vec!['b', 'c', 'd']);
        assert!(array.insert(9, 'z').is_err());
        assert!(array.remove(3).is_err());
    }

    #[test]
    fn snapshot_ignores_later_mutation() {
        let mut array: DynamicArray<u32> = (0..4).collect();
        let snapshot = array.snapshot();
        array.push(99);
        array.set(0, 42).expect("set");
        assert_eq!(snapshot.collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn to_array_is_independent() {
        let mut array: DynamicArray<String> = DynamicArray::new();
        array.push("x".to_string());
        let copy = array.to_array();
        array.clear();
        assert_eq!(copy.len(), 1);
        assert!(array.is_empty());
    }

    #[test]
    fn pop_last_and_reverse() {
        let mut array: DynamicArray<u8> = (1..=3).collect();
        assert_eq!(array.last(), Some(&3));
        array.reverse();
        assert_eq!(array.to_vec(), vec![3, 2, 1]);
        assert_eq!(array.pop(), Some(1));
        assert_eq!(array.len(), 2);
        assert_eq!(array.into_iter().rev().collect::<Vec<_>>(), vec![2, 3]);
    }
}
