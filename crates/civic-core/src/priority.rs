//! Oldest-open view: the K issues waiting longest.

use crate::collections::{BinaryHeap, DynamicArray};
use crate::primitives::ISSUE_HEAP_CAPACITY;
use crate::timeline::StatusIndex;
use crate::types::Issue;
use std::cmp::Ordering;

/// Creation time ascending, then identifier ascending.
pub fn oldest_first(a: &Issue, b: &Issue) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// The `k` oldest issues of `issues`.
///
/// With `only_open`, issues whose latest checkpoint is Resolved, Closed or
/// Rejected are skipped; issues without a timeline count as open.
pub fn oldest_open<'a>(
    issues: impl IntoIterator<Item = &'a Issue>,
    statuses: &StatusIndex,
    k: usize,
    only_open: bool,
) -> DynamicArray<Issue> {
    let mut selected = DynamicArray::with_capacity(k.min(ISSUE_HEAP_CAPACITY));
    if k == 0 {
        return selected;
    }
    let mut heap = BinaryHeap::with_capacity(ISSUE_HEAP_CAPACITY, oldest_first);
    for issue in issues {
        if !only_open || statuses.is_open(&issue.id) {
            heap.enqueue(issue.clone());
        }
    }
    while selected.len() < k {
        let Ok(issue) = heap.dequeue() else {
            break;
        };
        selected.push(issue);
    }
    selected
}
