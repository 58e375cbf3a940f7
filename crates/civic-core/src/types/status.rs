//! Issue lifecycle states and the transition table.

use super::CivicError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a service request.
///
/// Forward flow: Submitted → Triaged → Assigned → InProgress → Resolved →
/// Closed. Rejected is reachable from every non-terminal state. Closed and
/// Rejected absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Submitted,
    Triaged,
    Assigned,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl IssueStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [IssueStatus; 7] = [
        IssueStatus::Submitted,
        IssueStatus::Triaged,
        IssueStatus::Assigned,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
        IssueStatus::Rejected,
    ];

    /// The forward flow shown on a timeline, without the rejection branch.
    pub const DEFAULT_FLOW: [IssueStatus; 6] = [
        IssueStatus::Submitted,
        IssueStatus::Triaged,
        IssueStatus::Assigned,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    /// No transition leaves a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, IssueStatus::Closed | IssueStatus::Rejected)
    }

    /// An issue whose latest status is Resolved, Closed or Rejected is no
    /// longer open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(
            self,
            IssueStatus::Resolved | IssueStatus::Closed | IssueStatus::Rejected
        )
    }

    /// The single forward successor, if any.
    #[must_use]
    pub const fn next_in_flow(self) -> Option<IssueStatus> {
        match self {
            IssueStatus::Submitted => Some(IssueStatus::Triaged),
            IssueStatus::Triaged => Some(IssueStatus::Assigned),
            IssueStatus::Assigned => Some(IssueStatus::InProgress),
            IssueStatus::InProgress => Some(IssueStatus::Resolved),
            IssueStatus::Resolved => Some(IssueStatus::Closed),
            IssueStatus::Closed | IssueStatus::Rejected => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Submitted => "Submitted",
            IssueStatus::Triaged => "Triaged",
            IssueStatus::Assigned => "Assigned",
            IssueStatus::InProgress => "InProgress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Closed => "Closed",
            IssueStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_' && *c != '-').collect();
        IssueStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CivicError::InvalidInput(format!("unknown status '{}'", s)))
    }
}

/// Whether moving from `current` to `next` is allowed.
pub fn is_valid_transition(current: IssueStatus, next: IssueStatus) -> bool {
    if current.is_terminal() {
        return false;
    }
    if next == IssueStatus::Rejected {
        return true;
    }
    current.next_in_flow() == Some(next)
}
