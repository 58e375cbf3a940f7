//! # Session
//!
//! Composition root owning one instance of every index. Built once at
//! startup and passed to whatever needs routing, timelines or search.
//!
//! The session holds records only in memory; loading them from and saving
//! them to files is the caller's job.

use crate::avl_index::CreationIndex;
use crate::collections::{BinaryTree, DynamicArray};
use crate::config::CoreConfig;
use crate::events::{EventCatalog, SearchRecord};
use crate::geo::{GeoMst, LocationMap, open_issues_mst};
use crate::priority::oldest_open;
use crate::routing::{Department, DepartmentNetwork};
use crate::timeline::{StatusIndex, StatusUpdate};
use crate::types::{Category, EventItem, Issue, IssueId, IssueStatus, StatusCheckpoint};
use crate::CivicError;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct Session {
    config: CoreConfig,
    issues: DynamicArray<Issue>,
    network: DepartmentNetwork,
    statuses: StatusIndex,
    created: CreationIndex,
    locations: LocationMap,
    events: EventCatalog,
}

impl Session {
    /// Session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(CoreConfig::default())
    }

    /// Session with a validated configuration.
    pub fn with_config(config: CoreConfig) -> Result<Self, CivicError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CoreConfig) -> Self {
        Self {
            locations: LocationMap::from_config(&config),
            config,
            issues: DynamicArray::new(),
            network: DepartmentNetwork::new(),
            statuses: StatusIndex::new(),
            created: CreationIndex::new(),
            events: EventCatalog::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    #[must_use]
    pub fn network(&self) -> &DepartmentNetwork {
        &self.network
    }

    // =========================================================================
    // INGEST
    // =========================================================================

    /// Replace the issue set and rebuild the indexes from it.
    ///
    /// Timelines already present are kept; every issue gets one, with its
    /// Submitted checkpoint stamped at the issue's creation time.
    pub fn load_snapshot(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues = issues.into_iter().collect();
        self.created.rebuild(&self.issues);
        for issue in &self.issues {
            self.statuses.ensure_at(issue.id, issue.created_at);
        }
        tracing::info!(issues = self.issues.len(), "snapshot loaded");
    }

    /// Replay stored status changes in order. Returns how many applied.
    ///
    /// Updates for issues that are not loaded are skipped.
    pub fn apply_status_updates<'a>(
        &mut self,
        updates: impl IntoIterator<Item = &'a StatusUpdate>,
    ) -> usize {
        let mut applied = 0;
        for update in updates {
            if self.issue(&update.issue_id).is_none() {
                tracing::warn!(issue = %update.issue_id, "status update for unknown issue skipped");
                continue;
            }
            if self.statuses.apply(update) {
                applied += 1;
            } else {
                tracing::warn!(
                    issue = %update.issue_id,
                    status = %update.status,
                    "stored status update skipped"
                );
            }
        }
        applied
    }

    /// Index one new issue.
    pub fn add_issue(&mut self, issue: Issue) -> IssueId {
        let id = issue.id;
        self.statuses.ensure_at(id, issue.created_at);
        self.created.add(issue.clone());
        self.issues.push(issue);
        tracing::debug!(issue = %id, "issue added");
        id
    }

    pub fn load_events(&mut self, events: impl IntoIterator<Item = EventItem>) {
        self.events.ingest(events);
    }

    /// Seed the search counters from a stored record.
    pub fn restore_searches(&mut self, record: &SearchRecord) {
        self.events.stats().restore(record);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn issues(&self) -> &DynamicArray<Issue> {
        &self.issues
    }

    #[must_use]
    pub fn issue(&self, id: &IssueId) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == *id)
    }

    #[must_use]
    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    #[must_use]
    pub fn oldest_open(&self, k: usize, only_open: bool) -> DynamicArray<Issue> {
        oldest_open(&self.issues, &self.statuses, k, only_open)
    }

    #[must_use]
    pub fn earliest(&self, n: usize) -> DynamicArray<Issue> {
        self.created.earliest(n)
    }

    #[must_use]
    pub fn route_to_department(&self, category: Category) -> DynamicArray<Department> {
        self.network.route_to_department(category)
    }

    #[must_use]
    pub fn full_lifecycle_route(&self, category: Category) -> DynamicArray<Department> {
        self.network.full_lifecycle_route(category)
    }

    #[must_use]
    pub fn timeline(&self, id: &IssueId) -> DynamicArray<StatusCheckpoint> {
        self.statuses.timeline(id)
    }

    #[must_use]
    pub fn current_status(&self, id: &IssueId) -> Option<IssueStatus> {
        self.statuses.current_status(id)
    }

    /// Timeline of `id` as a right-leaning chain of checkpoints.
    pub fn timeline_tree(&self, id: &IssueId) -> Result<BinaryTree<StatusCheckpoint>, CivicError> {
        self.statuses.timeline_tree(id)
    }

    /// Issue count per latest status, in lifecycle order.
    #[must_use]
    pub fn status_counts(&self) -> DynamicArray<(IssueStatus, usize)> {
        let latest = self.statuses.snapshot_latest();
        IssueStatus::ALL
            .into_iter()
            .map(|status| (status, latest.iter().filter(|(_, s)| *s == status).count()))
            .collect()
    }

    #[must_use]
    pub fn open_issues_mst(&self) -> GeoMst {
        open_issues_mst(&self.issues, &self.statuses, &self.locations)
    }

    #[must_use]
    pub fn search_events(
        &self,
        query: &str,
        category: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DynamicArray<EventItem> {
        self.events.search(query, category, from, to)
    }

    #[must_use]
    pub fn upcoming_events(&self, max: usize) -> DynamicArray<EventItem> {
        self.events.upcoming(max)
    }

    #[must_use]
    pub fn recommend_categories(&self, max: usize) -> DynamicArray<String> {
        self.events.recommend_top_categories(max)
    }

    #[must_use]
    pub fn event_categories(&self) -> DynamicArray<String> {
        self.events.categories()
    }

    /// Up to `n` recent search tokens, newest first.
    #[must_use]
    pub fn recent_searches(&self, n: usize) -> DynamicArray<String> {
        self.events.stats().recent(n)
    }

    /// Current search counters, for persistence.
    #[must_use]
    pub fn search_record(&self) -> SearchRecord {
        self.events.stats().record()
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Append `status` now. `Ok(false)` when the transition is not allowed.
    pub fn advance_status(
        &mut self,
        id: &IssueId,
        status: IssueStatus,
        note: &str,
    ) -> Result<bool, CivicError> {
        self.advance_status_at(id, status, note, Utc::now())
    }

    /// Append `status` stamped `at`. Unknown issues are an error.
    pub fn advance_status_at(
        &mut self,
        id: &IssueId,
        status: IssueStatus,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, CivicError> {
        if self.issue(id).is_none() {
            return Err(CivicError::InvalidInput(format!("unknown issue {}", id)));
        }
        Ok(self.statuses.add_status_at(*id, status, note, at))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
