//! # Collections
//!
//! Hand-built containers the indexes are composed from. Every fallible
//! access returns [`crate::CivicError`] instead of panicking.

mod avl_tree;
mod binary_tree;
mod dynamic_array;
mod hash_table;
mod heap;
mod queue;
mod set;
mod stack;

pub use avl_tree::AvlTree;
pub use binary_tree::{BinaryTree, InOrder, LevelOrder, NodeHandle};
pub use dynamic_array::DynamicArray;
pub use hash_table::{FixedState, HashTable};
pub use heap::BinaryHeap;
pub use queue::Queue;
pub use set::Set;
pub use stack::Stack;
