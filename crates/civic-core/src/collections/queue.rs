//! FIFO queue over a circular buffer.

use crate::CivicError;
use crate::primitives::DEFAULT_QUEUE_CAPACITY;
use std::fmt;

/// First-in, first-out queue.
///
/// `head` is the slot of the oldest element, `tail` the slot the next
/// element goes into. The buffer doubles when full and is re-packed so the
/// oldest element lands in slot 0.
#[derive(Clone)]
pub struct Queue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Queue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity.max(1)).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn enqueue(&mut self, item: T) {
        if self.len == self.slots.len() {
            self.grow();
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
    }

    pub fn dequeue(&mut self) -> Result<T, CivicError> {
        if self.len == 0 {
            return Err(CivicError::Empty("queue"));
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        item.ok_or(CivicError::Empty("queue"))
    }

    pub fn peek(&self) -> Result<&T, CivicError> {
        if self.len == 0 {
            return Err(CivicError::Empty("queue"));
        }
        self.slots[self.head]
            .as_ref()
            .ok_or(CivicError::Empty("queue"))
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

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % self.slots.len()].as_ref())
    }

    fn grow(&mut self) {
        let capacity = self.slots.len();
        let mut grown: Box<[Option<T>]> = (0..capacity * 2).map(|_| None).collect();
        for (i, slot) in grown.iter_mut().take(self.len).enumerate() {
            *slot = self.slots[(self.head + i) % capacity].take();
        }
        self.slots = grown;
        self.head = 0;
        self.tail = self.len;
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
