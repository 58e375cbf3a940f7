//! LIFO stack backed by a [`DynamicArray`].

use crate::CivicError;
use crate::collections::DynamicArray;

/// Last-in, first-out stack.
#[derive(Debug, Clone, Default)]
pub struct Stack<T> {
    items: DynamicArray<T>,
}

impl<T> Stack<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: DynamicArray::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Result<T, CivicError> {
        self.items.pop().ok_or(CivicError::Empty("stack"))
    }

    pub fn peek(&self) -> Result<&T, CivicError> {
        self.items.last().ok_or(CivicError::Empty("stack"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate from the top of the stack down.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().rev()
    }
}
