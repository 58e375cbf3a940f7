//! # Creation-Time Index
//!
//! Issues ordered by `created_at`. Issues sharing an exact timestamp share
//! one bucket and keep their insertion order inside it.

use crate::collections::{AvlTree, DynamicArray};
use crate::types::Issue;
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct CreationIndex {
    by_created: AvlTree<DateTime<Utc>, DynamicArray<Issue>>,
    count: usize,
}

fn append(mut bucket: DynamicArray<Issue>, incoming: DynamicArray<Issue>) -> DynamicArray<Issue> {
    bucket.extend(incoming);
    bucket
}

impl CreationIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the index and rebuild it from `snapshot`.
    pub fn rebuild<'a>(&mut self, snapshot: impl IntoIterator<Item = &'a Issue>) {
        self.by_created.clear();
        self.count = 0;
        for issue in snapshot {
            self.add(issue.clone());
        }
        tracing::debug!(issues = self.count, "creation index rebuilt");
    }

    pub fn add(&mut self, issue: Issue) {
        let key = issue.created_at;
        let mut bucket = DynamicArray::with_capacity(1);
        bucket.push(issue);
        self.by_created.add_or_update(key, bucket, append);
        self.count += 1;
    }

    /// Number of indexed issues (not distinct timestamps).
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Up to `n` issues, oldest first.
    #[must_use]
    pub fn earliest(&self, n: usize) -> DynamicArray<Issue> {
        self.by_created
            .iter()
            .flat_map(|(_, bucket)| bucket.iter())
            .take(n)
            .cloned()
            .collect()
    }
}
