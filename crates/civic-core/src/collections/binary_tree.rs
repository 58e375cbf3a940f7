//! Arena-backed binary tree with explicit slot insertion.
//!
//! Nodes are only ever attached through [`BinaryTree::insert_root`],
//! [`BinaryTree::insert_left`] and [`BinaryTree::insert_right`]; each call
//! refuses to overwrite an occupied slot. Traversals are lazy.

use crate::CivicError;
use crate::collections::{DynamicArray, Queue, Stack};

/// Position of a node inside the tree that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Arena index of the node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TreeNode<T> {
    value: T,
    left: Option<NodeHandle>,
    right: Option<NodeHandle>,
}

/// Plain (unbalanced, unordered) binary tree.
#[derive(Debug, Clone)]
pub struct BinaryTree<T> {
    nodes: DynamicArray<TreeNode<T>>,
    root: Option<NodeHandle>,
}

impl<T> BinaryTree<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: DynamicArray::new(),
            root: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    pub fn get(&self, handle: NodeHandle) -> Result<&T, CivicError> {
        self.node(handle).map(|n| &n.value)
    }

    pub fn left(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, CivicError> {
        self.node(handle).map(|n| n.left)
    }

    pub fn right(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, CivicError> {
        self.node(handle).map(|n| n.right)
    }

    pub fn insert_root(&mut self, value: T) -> Result<NodeHandle, CivicError> {
        if self.root.is_some() {
            return Err(CivicError::SlotOccupied("root"));
        }
        let handle = self.allocate(value);
        self.root = Some(handle);
        Ok(handle)
    }

    pub fn insert_left(&mut self, parent: NodeHandle, value: T) -> Result<NodeHandle, CivicError> {
        if self.node(parent)?.left.is_some() {
            return Err(CivicError::SlotOccupied("left"));
        }
        let handle = self.allocate(value);
        self.node_mut(parent)?.left = Some(handle);
        Ok(handle)
    }

    pub fn insert_right(
        &mut self,
        parent: NodeHandle,
        value: T,
    ) -> Result<NodeHandle, CivicError> {
        if self.node(parent)?.right.is_some() {
            return Err(CivicError::SlotOccupied("right"));
        }
        let handle = self.allocate(value);
        self.node_mut(parent)?.right = Some(handle);
        Ok(handle)
    }

    /// Last node reached by following right children from the root.
    #[must_use]
    pub fn rightmost(&self) -> Option<NodeHandle> {
        let mut current = self.root?;
        while let Ok(Some(next)) = self.right(current) {
            current = next;
        }
        Some(current)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Left subtree, node, right subtree.
    pub fn in_order(&self) -> InOrder<'_, T> {
        InOrder {
            tree: self,
            pending: Stack::new(),
            current: self.root,
        }
    }

    /// Breadth-first, left to right within a level.
    pub fn level_order(&self) -> LevelOrder<'_, T> {
        let mut pending = Queue::new();
        if let Some(root) = self.root {
            pending.enqueue(root);
        }
        LevelOrder {
            tree: self,
            pending,
        }
    }

    fn allocate(&mut self, value: T) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(TreeNode {
            value,
            left: None,
            right: None,
        });
        handle
    }

    fn node(&self, handle: NodeHandle) -> Result<&TreeNode<T>, CivicError> {
        self.nodes
            .get(handle.0)
            .map_err(|_| CivicError::UnknownNode(handle.0))
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut TreeNode<T>, CivicError> {
        self.nodes
            .get_mut(handle.0)
            .map_err(|_| CivicError::UnknownNode(handle.0))
    }
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy in-order traversal.
pub struct InOrder<'a, T> {
    tree: &'a BinaryTree<T>,
    pending: Stack<NodeHandle>,
    current: Option<NodeHandle>,
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.current {
            self.pending.push(handle);
            self.current = self.tree.node(handle).ok()?.left;
        }
        let handle = self.pending.pop().ok()?;
        let node = self.tree.node(handle).ok()?;
        self.current = node.right;
        Some(&node.value)
    }
}

/// Lazy level-order traversal.
pub struct LevelOrder<'a, T> {
    tree: &'a BinaryTree<T>,
    pending: Queue<NodeHandle>,
}

impl<'a, T> Iterator for LevelOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.pending.dequeue().ok()?;
        let node = self.tree.node(handle).ok()?;
        if let Some(left) = node.left {
            self.pending.enqueue(left);
        }
        if let Some(right) = node.right {
            self.pending.enqueue(right);
        }
        Some(&node.value)
    }
}
