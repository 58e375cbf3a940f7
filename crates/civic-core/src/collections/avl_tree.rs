//! Self-balancing ordered map.
//!
//! Insertion descends by key comparison; an equal key merges the stored
//! value with the incoming one and leaves the shape untouched. On the way
//! back up every node's height is recomputed and a single or double
//! rotation is applied wherever the balance factor leaves `[-1, 1]`.

use crate::collections::DynamicArray;
use std::cmp::Ordering;
use std::fmt;

type Link<K, V> = Option<Box<AvlNode<K, V>>>;

struct AvlNode<K, V> {
    key: K,
    value: V,
    height: i32,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> AvlNode<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn balance(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

fn height<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

//     node            pivot
//     /   \          /    \
//  pivot   c   ->   a     node
//  /   \                  /   \
// a     b                b     c
fn rotate_right<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

fn rebalance<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    node.update_height();
    let balance = node.balance();
    if balance > 1 {
        // left-right: straighten the left child first
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        return rotate_right(node);
    }
    if balance < -1 {
        // right-left
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        return rotate_left(node);
    }
    node
}

/// Returns the new subtree root and whether a node was added.
fn insert<K: Ord, V, F>(link: Link<K, V>, key: K, value: V, merge: F) -> (Box<AvlNode<K, V>>, bool)
where
    F: FnOnce(V, V) -> V,
{
    let Some(mut node) = link else {
        return (AvlNode::leaf(key, value), true);
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, added) = insert(node.left.take(), key, value, merge);
            node.left = Some(child);
            (rebalance(node), added)
        }
        Ordering::Greater => {
            let (child, added) = insert(node.right.take(), key, value, merge);
            node.right = Some(child);
            (rebalance(node), added)
        }
        Ordering::Equal => {
            let AvlNode {
                key: stored,
                value: old,
                height,
                left,
                right,
            } = *node;
            let merged = Box::new(AvlNode {
                key: stored,
                value: merge(old, value),
                height,
                left,
                right,
            });
            (merged, false)
        }
    }
}

/// Ordered map with AVL balancing.
pub struct AvlTree<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K: Ord, V> AvlTree<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Insert `value` under `key`, or replace the stored value with
    /// `merge(stored, value)` when the key is already present.
    pub fn add_or_update<F>(&mut self, key: K, value: V, merge: F)
    where
        F: FnOnce(V, V) -> V,
    {
        let (root, added) = insert(self.root.take(), key, value, merge);
        self.root = Some(root);
        if added {
            self.len += 1;
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            node = match key.cmp(&current.key) {
                Ordering::Less => current.left.as_deref(),
                Ordering::Greater => current.right.as_deref(),
                Ordering::Equal => return Some(&current.value),
            };
        }
        None
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root; 0 for an empty tree.
    #[must_use]
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    /// Every stored height is correct and every balance factor is in `[-1, 1]`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        fn check<K, V>(link: &Link<K, V>) -> Option<i32> {
            let Some(node) = link else {
                return Some(0);
            };
            let left = check(&node.left)?;
            let right = check(&node.right)?;
            let actual = 1 + left.max(right);
            ((left - right).abs() <= 1 && node.height == actual).then_some(actual)
        }
        check(&self.root).is_some()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Ascending-key traversal.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            pending: DynamicArray::new(),
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }
}

impl<K: Ord, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator over an [`AvlTree`].
pub struct Iter<'a, K, V> {
    pending: DynamicArray<&'a AvlNode<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a AvlNode<K, V>>) {
        while let Some(current) = node {
            self.pending.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
