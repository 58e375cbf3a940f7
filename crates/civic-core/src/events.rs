//! # Event Catalogue
//!
//! Local events bucketed by category, with chronological listing,
//! free-text search and search-frequency category recommendations.

use crate::collections::{BinaryHeap, DynamicArray, HashTable, Queue, Set};
use crate::primitives::{CATEGORY_TOKEN_PREFIX, RECENT_SEARCHES};
use crate::types::EventItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Start time ascending, then title, then id.
fn chronological(a: &EventItem, b: &EventItem) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

// =============================================================================
// SEARCH STATS
// =============================================================================

/// Persistable form of the search counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRecord {
    /// `(token, count)` pairs sorted by token.
    pub counts: Vec<(String, usize)>,
    /// Most recent tokens, oldest first.
    pub recent: Vec<String>,
}

#[derive(Debug, Default)]
struct SearchLog {
    history: Queue<String>,
    counts: HashTable<String, usize>,
}

impl SearchLog {
    fn remember(&mut self, token: String) {
        self.history.enqueue(token);
        while self.history.len() > RECENT_SEARCHES {
            if self.history.dequeue().is_err() {
                break;
            }
        }
    }
}

/// Search counters shared between the searching side and readers.
///
/// The single lock of the crate. A poisoned lock is recovered: the counters
/// stay usable even if a holder panicked.
#[derive(Debug, Default)]
pub struct SearchStats {
    log: Mutex<SearchLog>,
}

impl SearchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SearchLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one occurrence of `token`.
    pub fn track(&self, token: &str) {
        let mut log = self.lock();
        log.remember(token.to_string());
        if let Some(count) = log.counts.get_mut(token) {
            *count += 1;
        } else {
            log.counts.insert(token.to_string(), 1);
        }
    }

    #[must_use]
    pub fn count(&self, token: &str) -> usize {
        self.lock().counts.get(token).copied().unwrap_or(0)
    }

    /// Up to `n` most recent tokens, newest first. At most
    /// `RECENT_SEARCHES` are kept.
    #[must_use]
    pub fn recent(&self, n: usize) -> DynamicArray<String> {
        let log = self.lock();
        let mut newest_first: DynamicArray<String> = log.history.iter().cloned().collect();
        newest_first.reverse();
        newest_first.into_iter().take(n).collect()
    }

    /// Copy of the counters for persistence.
    #[must_use]
    pub fn record(&self) -> SearchRecord {
        let log = self.lock();
        let mut counts: Vec<(String, usize)> = log
            .counts
            .iter()
            .map(|(token, count)| (token.clone(), *count))
            .collect();
        counts.sort();
        SearchRecord {
            counts,
            recent: log.history.iter().cloned().collect(),
        }
    }

    /// Replace the counters with a stored record.
    pub fn restore(&self, record: &SearchRecord) {
        let mut log = self.lock();
        log.counts.clear();
        log.history = Queue::new();
        for (token, count) in &record.counts {
            if *count > 0 {
                log.counts.insert(token.clone(), *count);
            }
        }
        for token in &record.recent {
            log.remember(token.clone());
        }
        tracing::debug!(tokens = log.counts.len(), "search counters restored");
    }

    /// The `max` most searched categories, most frequent first; ties go to
    /// the alphabetically smaller category.
    #[must_use]
    pub fn recommend_top_categories(&self, max: usize) -> DynamicArray<String> {
        let mut ranked = BinaryHeap::new(|a: &(String, usize), b: &(String, usize)| {
            b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        });
        {
            let log = self.lock();
            for (token, count) in log.counts.iter() {
                if let Some(category) = token.strip_prefix(CATEGORY_TOKEN_PREFIX) {
                    ranked.enqueue((category.to_string(), *count));
                }
            }
        }
        let mut top = DynamicArray::new();
        while top.len() < max {
            let Ok((category, _)) = ranked.dequeue() else {
                break;
            };
            top.push(category);
        }
        top
    }
}

// =============================================================================
// EVENT CATALOG
// =============================================================================

/// Events grouped by their exact category string.
#[derive(Debug, Default)]
pub struct EventCatalog {
    by_category: HashTable<String, DynamicArray<EventItem>>,
    categories: Set<String>,
    stats: SearchStats,
}

impl EventCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add events to their category buckets.
    pub fn ingest(&mut self, events: impl IntoIterator<Item = EventItem>) {
        let mut added = 0usize;
        for event in events {
            self.categories.add(event.category.clone());
            if let Some(bucket) = self.by_category.get_mut(event.category.as_str()) {
                bucket.push(event);
            } else {
                let key = event.category.clone();
                let mut bucket = DynamicArray::new();
                bucket.push(event);
                self.by_category.insert(key, bucket);
            }
            added += 1;
        }
        tracing::debug!(added, categories = self.categories.len(), "events ingested");
    }

    /// Drop every event. Search counters are kept.
    pub fn clear(&mut self) {
        self.by_category.clear();
        self.categories = Set::new();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.values().map(DynamicArray::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known categories, sorted.
    #[must_use]
    pub fn categories(&self) -> DynamicArray<String> {
        let mut sorted = BinaryHeap::new(|a: &String, b: &String| a.cmp(b));
        for category in self.categories.iter() {
            sorted.enqueue(category.clone());
        }
        sorted.into_sorted()
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Up to `max` events, soonest first.
    #[must_use]
    pub fn upcoming(&self, max: usize) -> DynamicArray<EventItem> {
        let mut heap = BinaryHeap::new(chronological);
        for event in self.by_category.values().flat_map(DynamicArray::iter) {
            heap.enqueue(event.clone());
        }
        let mut soonest = DynamicArray::new();
        while soonest.len() < max {
            let Ok(event) = heap.dequeue() else {
                break;
            };
            soonest.push(event);
        }
        soonest
    }

    /// Events matching every given filter, in chronological order.
    ///
    /// `query` is matched case-insensitively as a substring of title,
    /// description and location. A known `category` limits the search to
    /// its bucket; an unknown one searches everything. Date bounds are
    /// inclusive. Non-empty queries and categories are recorded in the
    /// search counters.
    pub fn search(
        &self,
        query: &str,
        category: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DynamicArray<EventItem> {
        let query = query.trim().to_lowercase();
        let category = category.trim();
        if !query.is_empty() {
            self.stats.track(&query);
        }
        if !category.is_empty() {
            self.stats
                .track(&format!("{}{}", CATEGORY_TOKEN_PREFIX, category.to_lowercase()));
        }

        let mut heap = BinaryHeap::new(chronological);
        let mut consider = |event: &EventItem| {
            if !query.is_empty() {
                let blob = format!("{} {} {}", event.title, event.description, event.location)
                    .to_lowercase();
                if !blob.contains(&query) {
                    return;
                }
            }
            if from.is_some_and(|from| event.start < from) || to.is_some_and(|to| event.start > to) {
                return;
            }
            heap.enqueue(event.clone());
        };

        match self.by_category.get(category) {
            Some(bucket) if !category.is_empty() => bucket.iter().for_each(&mut consider),
            _ => self
                .by_category
                .values()
                .flat_map(DynamicArray::iter)
                .for_each(&mut consider),
        }
        heap.into_sorted()
    }

    #[must_use]
    pub fn recommend_top_categories(&self, max: usize) -> DynamicArray<String> {
        self.stats.recommend_top_categories(max)
    }
}
