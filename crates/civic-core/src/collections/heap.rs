//! Comparator-driven binary min-heap.
//!
//! The element the comparator ranks lowest is served first. One type serves
//! every priority ordering in the crate: chronological merges, the
//! oldest-open view, recommendation ranking and the Prim frontier.

use crate::CivicError;
use crate::collections::DynamicArray;
use std::cmp::Ordering;
use std::fmt;

/// Array-backed binary heap ordered by `compare`.
pub struct BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    items: DynamicArray<T>,
    compare: C,
}

impl<T, C> BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: C) -> Self {
        Self {
            items: DynamicArray::new(),
            compare,
        }
    }

    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            items: DynamicArray::with_capacity(capacity),
            compare,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append and sift up. O(log n).
    pub fn enqueue(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove the lowest-ranked element. O(log n).
    pub fn dequeue(&mut self) -> Result<T, CivicError> {
        let len = self.items.len();
        if len == 0 {
            return Err(CivicError::Empty("heap"));
        }
        self.items.swap(0, len - 1)?;
        let top = self.items.pop().ok_or(CivicError::Empty("heap"))?;
        self.sift_down(0);
        Ok(top)
    }

    pub fn peek(&self) -> Result<&T, CivicError> {
        self.items.first().ok_or(CivicError::Empty("heap"))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Dequeue everything, lowest first.
    pub fn into_sorted(mut self) -> DynamicArray<T> {
        let mut sorted = DynamicArray::with_capacity(self.items.len());
        while let Ok(item) = self.dequeue() {
            sorted.push(item);
        }
        sorted
    }

    fn precedes(&self, a: usize, b: usize) -> bool {
        match (self.items.get(a), self.items.get(b)) {
            (Ok(x), Ok(y)) => (self.compare)(x, y) == Ordering::Less,
            _ => false,
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.precedes(index, parent) || self.items.swap(index, parent).is_err() {
                break;
            }
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.precedes(left, smallest) {
                smallest = left;
            }
            if right < len && self.precedes(right, smallest) {
                smallest = right;
            }
            if smallest == index || self.items.swap(index, smallest).is_err() {
                break;
            }
            index = smallest;
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinaryHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
