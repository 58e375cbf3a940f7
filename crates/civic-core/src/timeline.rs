//! # Status Timelines
//!
//! One append-only checkpoint list per issue. The first touch of an issue
//! synthesizes a Submitted checkpoint; every later checkpoint must be a
//! valid transition from the current (last) status.

use crate::CivicError;
use crate::collections::{BinaryTree, DynamicArray, HashTable};
use crate::primitives::SUBMITTED_NOTE;
use crate::types::{IssueId, IssueStatus, StatusCheckpoint, is_valid_transition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored status change, as kept by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub issue_id: IssueId,
    pub status: IssueStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
}

/// Per-issue lifecycle timelines.
#[derive(Debug, Clone, Default)]
pub struct StatusIndex {
    timelines: HashTable<IssueId, DynamicArray<StatusCheckpoint>>,
}

impl StatusIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of issues with a timeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Create the timeline of `id` if missing, stamped now.
    pub fn ensure(&mut self, id: IssueId) -> bool {
        self.ensure_at(id, Utc::now())
    }

    /// Create the timeline of `id` if missing, with its Submitted checkpoint
    /// stamped `at`. Returns `true` when a timeline was created.
    pub fn ensure_at(&mut self, id: IssueId, at: DateTime<Utc>) -> bool {
        if self.timelines.contains_key(&id) {
            return false;
        }
        let mut timeline = DynamicArray::new();
        timeline.push(StatusCheckpoint::new(IssueStatus::Submitted, at, SUBMITTED_NOTE));
        self.timelines.insert(id, timeline);
        true
    }

    /// Append `status` stamped now, if the transition is allowed.
    pub fn add_status(&mut self, id: IssueId, status: IssueStatus, note: impl Into<String>) -> bool {
        self.add_status_at(id, status, note, Utc::now())
    }

    /// Append `status` stamped `at`, if the transition is allowed.
    ///
    /// A timestamp earlier than the current last checkpoint is raised to it,
    /// keeping every timeline non-decreasing in time.
    pub fn add_status_at(
        &mut self,
        id: IssueId,
        status: IssueStatus,
        note: impl Into<String>,
        at: DateTime<Utc>,
    ) -> bool {
        self.ensure_at(id, at);
        let Some(timeline) = self.timelines.get_mut(&id) else {
            return false;
        };
        let (current, last_at) = timeline
            .last()
            .map_or((IssueStatus::Submitted, at), |c| (c.status, c.timestamp));
        if !is_valid_transition(current, status) {
            tracing::debug!(issue = %id, %current, requested = %status, "transition refused");
            return false;
        }
        timeline.push(StatusCheckpoint::new(status, at.max(last_at), note));
        tracing::debug!(issue = %id, %status, "status appended");
        true
    }

    /// Replay a stored update. Same rules as [`Self::add_status_at`], except
    /// that an untracked issue is refused instead of getting a timeline.
    pub fn apply(&mut self, update: &StatusUpdate) -> bool {
        if !self.timelines.contains_key(&update.issue_id) {
            return false;
        }
        self.add_status_at(
            update.issue_id,
            update.status,
            update.note.clone(),
            update.timestamp,
        )
    }

    /// Copy of the checkpoints of `id`, oldest first. Empty for unknown ids.
    #[must_use]
    pub fn timeline(&self, id: &IssueId) -> DynamicArray<StatusCheckpoint> {
        self.timelines.get(id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn current_status(&self, id: &IssueId) -> Option<IssueStatus> {
        self.timelines.get(id)?.last().map(|c| c.status)
    }

    /// An issue without a timeline counts as open.
    #[must_use]
    pub fn is_open(&self, id: &IssueId) -> bool {
        self.current_status(id).is_none_or(IssueStatus::is_open)
    }

    /// Latest status of every tracked issue.
    #[must_use]
    pub fn snapshot_latest(&self) -> DynamicArray<(IssueId, IssueStatus)> {
        self.timelines
            .iter()
            .filter_map(|(id, timeline)| timeline.last().map(|c| (*id, c.status)))
            .collect()
    }

    /// The timeline of `id` as a right-leaning chain: each checkpoint is
    /// the right child of the one before it.
    pub fn timeline_tree(&self, id: &IssueId) -> Result<BinaryTree<StatusCheckpoint>, CivicError> {
        let mut tree = BinaryTree::new();
        let Some(timeline) = self.timelines.get(id) else {
            return Ok(tree);
        };
        let mut tail = None;
        for checkpoint in timeline {
            let handle = match tail {
                None => tree.insert_root(checkpoint.clone())?,
                Some(parent) => tree.insert_right(parent, checkpoint.clone())?,
            };
            tail = Some(handle);
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).single().expect("date")
    }

    #[test]
    fn first_touch_synthesizes_submitted() {
        let mut index = StatusIndex::new();
        let id = IssueId::from_u128(1);
        assert!(index.ensure_at(id, t0()));
        assert!(!index.ensure_at(id, t0()));
        let timeline = index.timeline(&id);
        assert_eq!(timeline.len(), 1);
        let first = timeline.first().expect("checkpoint");
        assert_eq!(first.status, IssueStatus::Submitted);
        assert_eq!(first.note, SUBMITTED_NOTE);
    }

    #[test]
    fn forward_flow_and_refusals() {
        let mut index = StatusIndex::new();
        let id = IssueId::from_u128(2);
        assert!(!index.add_status_at(id, IssueStatus::Assigned, "skip", t0()));
        assert!(index.add_status_at(id, IssueStatus::Triaged, "", t0()));
        assert!(index.add_status_at(id, IssueStatus::Assigned, "crew 4", t0()));
        assert!(index.add_status_at(id, IssueStatus::Rejected, "duplicate", t0()));
        assert!(!index.add_status_at(id, IssueStatus::InProgress, "", t0()));
        assert_eq!(index.current_status(&id), Some(IssueStatus::Rejected));
        assert!(!index.is_open(&id));
        assert_eq!(index.timeline(&id).len(), 4);
    }

    #[test]
    fn unknown_issue_is_open_with_empty_timeline() {
        let index = StatusIndex::new();
        let id = IssueId::from_u128(3);
        assert!(index.is_open(&id));
        assert!(index.timeline(&id).is_empty());
        assert_eq!(index.current_status(&id), None);
    }

    #[test]
    fn earlier_timestamps_are_raised() {
        let mut index = StatusIndex::new();
        let id = IssueId::from_u128(4);
        index.ensure_at(id, t0());
        assert!(index.add_status_at(id, IssueStatus::Triaged, "", t0() - Duration::hours(2)));
        let timeline = index.timeline(&id);
        assert_eq!(timeline.last().map(|c| c.timestamp), Some(t0()));
    }

    #[test]
    fn snapshot_and_tree_agree_with_timeline() {
        let mut index = StatusIndex::new();
        let a = IssueId::from_u128(10);
        let b = IssueId::from_u128(11);
        index.ensure_at(a, t0());
        index.ensure_at(b, t0());
        index.add_status_at(b, IssueStatus::Triaged, "", t0() + Duration::minutes(5));
        index.add_status_at(b, IssueStatus::Assigned, "", t0() + Duration::minutes(9));

        let mut latest = index.snapshot_latest().to_vec();
        latest.sort();
        assert_eq!(
            latest,
            vec![(a, IssueStatus::Submitted), (b, IssueStatus::Assigned)]
        );

        let tree = index.timeline_tree(&b).expect("tree");
        let from_tree: Vec<_> = tree.in_order().cloned().collect();
        assert_eq!(from_tree, index.timeline(&b).to_vec());
        assert_eq!(tree.level_order().count(), 3);
    }

    #[test]
    fn stored_updates_replay() {
        let mut index = StatusIndex::new();
        let id = IssueId::from_u128(12);
        index.ensure_at(id, t0());
        let update = StatusUpdate {
            issue_id: id,
            status: IssueStatus::Triaged,
            timestamp: t0() + Duration::hours(1),
            note: "triaged by desk".to_string(),
        };
        assert!(index.apply(&update));
        assert!(!index.apply(&update));
    }

    #[test]
    fn replay_refuses_untracked_issues() {
        let mut index = StatusIndex::new();
        let update = StatusUpdate {
            issue_id: IssueId::from_u128(13),
            status: IssueStatus::Triaged,
            timestamp: t0(),
            note: String::new(),
        };
        assert!(!index.apply(&update));
        assert!(index.is_empty());
        assert!(index.timeline(&update.issue_id).is_empty());
    }
}
