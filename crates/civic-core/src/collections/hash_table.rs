//! Separate-chaining hash table.
//!
//! Buckets hold singly linked chains; new keys are pushed at the chain head.
//! The bucket array doubles once the entry count exceeds twice the bucket
//! count. Key order is unspecified but deterministic for a fixed insertion
//! sequence, because the default hasher uses fixed keys.

use crate::collections::DynamicArray;
use crate::primitives::{INITIAL_BUCKETS, MAX_LOAD_FACTOR};
use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Deterministic hasher builder used when the caller does not supply one.
pub type FixedState = BuildHasherDefault<DefaultHasher>;

struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

type Chain<K, V> = Option<Box<Entry<K, V>>>;

fn empty_buckets<K, V>(count: usize) -> Box<[Chain<K, V>]> {
    (0..count).map(|_| None).collect()
}

fn matches<K: Borrow<Q>, Q: Eq + ?Sized>(stored: &K, key: &Q) -> bool {
    key.eq(stored.borrow())
}

/// Hash map keyed by the caller's `Hash`/`Eq` notion.
pub struct HashTable<K, V, S = FixedState> {
    buckets: Box<[Chain<K, V>]>,
    len: usize,
    hasher: S,
}

impl<K: Hash + Eq, V> HashTable<K, V, FixedState> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(FixedState::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashTable<K, V, S> {
    /// Create an empty table hashing keys with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            buckets: empty_buckets(INITIAL_BUCKETS),
            len: 0,
            hasher,
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
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut node = self.buckets[self.index_for(key)].as_deref();
        while let Some(entry) = node {
            if matches(&entry.key, key) {
                return Some(&entry.value);
            }
            node = entry.next.as_deref();
        }
        None
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.index_for(key);
        let mut node = self.buckets[index].as_deref_mut();
        while let Some(entry) = node {
            if matches(&entry.key, key) {
                return Some(&mut entry.value);
            }
            node = entry.next.as_deref_mut();
        }
        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Insert or update. Returns the replaced value when the key existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.index_for(&key);
        let mut node = self.buckets[index].as_deref_mut();
        while let Some(entry) = node {
            if entry.key == key {
                return Some(std::mem::replace(&mut entry.value, value));
            }
            node = entry.next.as_deref_mut();
        }

        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry {
            key,
            value,
            next: head,
        }));
        self.len += 1;
        if self.len > self.buckets.len().saturating_mul(MAX_LOAD_FACTOR) {
            self.resize();
        }
        None
    }

    /// Remove a key, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.index_for(key);
        let mut cursor = &mut self.buckets[index];
        while cursor
            .as_ref()
            .is_some_and(|entry| !matches(&entry.key, key))
        {
            cursor = &mut cursor.as_mut()?.next;
        }
        let removed = cursor.take()?;
        let Entry { value, next, .. } = *removed;
        *cursor = next;
        self.len -= 1;
        Some(value)
    }

    pub fn clear(&mut self) {
        self.buckets = empty_buckets(INITIAL_BUCKETS);
        self.len = 0;
    }

    /// Iterate `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            node: None,
            remaining: self.len,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    fn index_for<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn resize(&mut self) {
        let doubled = self.buckets.len().saturating_mul(2);
        let old = std::mem::replace(&mut self.buckets, empty_buckets(doubled));
        for mut chain in old.into_vec() {
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let index = self.index_for(&entry.key);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> HashTable<K, V, S> {
    /// Copy of every key, in iteration order.
    #[must_use]
    pub fn keys(&self) -> DynamicArray<K> {
        let mut keys = DynamicArray::with_capacity(self.len);
        for (key, _) in self.iter() {
            keys.push(key.clone());
        }
        keys
    }
}

impl<K: Hash + Eq, V> Default for HashTable<K, V, FixedState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Clone> Clone for HashTable<K, V, S> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_hasher(self.hasher.clone());
        for (key, value) in self.iter() {
            copy.insert(key.clone(), value.clone());
        }
        copy
    }
}

impl<K: fmt::Debug + Hash + Eq, V: fmt::Debug, S: BuildHasher> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over the entries of a [`HashTable`].
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Chain<K, V>>,
    node: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.node {
                self.node = entry.next.as_deref();
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
            self.node = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_updates_existing_key() {
        let mut table = HashTable::new();
        assert_eq!(table.insert("water", 1), None);
        assert_eq!(table.insert("water", 2), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("water"), Some(&2));
    }

    #[test]
    fn resizes_past_load_factor() {
        let mut table = HashTable::new();
        let limit = INITIAL_BUCKETS * MAX_LOAD_FACTOR;
        for i in 0..=limit {
            table.insert(i, i * 10);
        }
        assert_eq!(table.bucket_count(), INITIAL_BUCKETS * 2);
        for i in 0..=limit {
            assert_eq!(table.get(&i), Some(&(i * 10)));
        }
    }

    #[test]
    fn remove_unlinks_from_chain() {
        let mut table = HashTable::new();
        for i in 0..100u32 {
            table.insert(i, i);
        }
        assert_eq!(table.remove(&42), Some(42));
        assert_eq!(table.remove(&42), None);
        assert!(!table.contains_key(&42));
        assert_eq!(table.len(), 99);
        assert_eq!(table.iter().count(), 99);
    }

    #[test]
    fn string_keys_lookup_by_str() {
        let mut table: HashTable<String, usize> = HashTable::new();
        table.insert("cat:roads".to_string(), 3);
        if let Some(count) = table.get_mut("cat:roads") {
            *count += 1;
        }
        assert_eq!(table.get("cat:roads"), Some(&4));
        assert_eq!(table.keys().to_vec(), vec!["cat:roads".to_string()]);
    }

    #[test]
    fn iteration_order_is_repeatable() {
        let build = || {
            let mut table = HashTable::new();
            for word in ["triage", "water", "roads", "finance", "qa"] {
                table.insert(word, word.len());
            }
            table.keys().to_vec()
        };
        assert_eq!(build(), build());
    }
}
