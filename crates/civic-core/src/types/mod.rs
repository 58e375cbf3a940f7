//! # Core Type Definitions
//!
//! This module contains the record shapes the indexes consume:
//! - Identifiers (`IssueId`)
//! - Service requests (`Issue`, `Category`, `ContactChannel`)
//! - Lifecycle checkpoints (`StatusCheckpoint`, `IssueStatus`)
//! - Local events (`EventItem`)
//! - Error types (`CivicError`)
//!
//! ## Time
//!
//! Every instant is a `DateTime<Utc>`. Ordering by creation time or event
//! start is therefore unambiguous across machines.

mod status;

pub use status::{IssueStatus, is_valid_transition};

use crate::collections::DynamicArray;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Globally unique identifier of one issue.
///
/// Generated client-side (UUID v4) and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub Uuid);

impl IssueId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build a deterministic identifier from a 128-bit value (fixtures, tests).
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for IssueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for IssueId {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| CivicError::InvalidInput(format!("invalid issue id '{}': {}", s, e)))
    }
}

// =============================================================================
// ISSUE
// =============================================================================

/// Service category of an issue. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Sanitation,
    Roads,
    Electricity,
    Water,
    Waste,
    Utilities,
    Safety,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Sanitation,
        Category::Roads,
        Category::Electricity,
        Category::Water,
        Category::Waste,
        Category::Utilities,
        Category::Safety,
    ];

    /// Canonical display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Sanitation => "Sanitation",
            Category::Roads => "Roads",
            Category::Electricity => "Electricity",
            Category::Water => "Water",
            Category::Waste => "Waste",
            Category::Utilities => "Utilities",
            Category::Safety => "Safety",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CivicError;

    /// Case-insensitive match on the canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CivicError::InvalidInput(format!("unknown category '{}'", s)))
    }
}

/// How the reporter wants to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContactChannel {
    None,
    Sms,
    WhatsApp,
    #[default]
    InApp,
}

/// A citizen-reported service request.
///
/// Owned by the persistence layer. The indexes clone snapshots of it and
/// never modify a record after it has been handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// References to attached files; the files themselves live elsewhere.
    #[serde(default)]
    pub attachments: DynamicArray<String>,
    #[serde(default)]
    pub preferred_channel: ContactChannel,
    #[serde(default)]
    pub phone_number: String,
}

impl Issue {
    /// Create an issue with a fresh identifier and no attachments.
    #[must_use]
    pub fn new(
        category: Category,
        location: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IssueId::new(),
            created_at,
            category,
            location: location.into(),
            description: description.into(),
            attachments: DynamicArray::new(),
            preferred_channel: ContactChannel::default(),
            phone_number: String::new(),
        }
    }

    /// Replace the identifier (fixtures that need stable ids).
    #[must_use]
    pub fn with_id(mut self, id: IssueId) -> Self {
        self.id = id;
        self
    }

    /// One-line summary for lists and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.id,
            self.created_at.format("%d %b %Y %H:%M"),
            self.category,
            self.location
        )
    }
}

// =============================================================================
// STATUS CHECKPOINT
// =============================================================================

/// One timestamped entry in an issue's lifecycle timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheckpoint {
    pub status: IssueStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
}

impl StatusCheckpoint {
    #[must_use]
    pub fn new(status: IssueStatus, timestamp: DateTime<Utc>, note: impl Into<String>) -> Self {
        Self {
            status,
            timestamp,
            note: note.into(),
        }
    }

    /// Checkpoint stamped with the current time.
    #[must_use]
    pub fn now(status: IssueStatus, note: impl Into<String>) -> Self {
        Self::new(status, Utc::now(), note)
    }
}

impl fmt::Display for StatusCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}",
            self.status,
            self.timestamp.format("%d %b %Y %H:%M")
        )
    }
}

// =============================================================================
// EVENT ITEM
// =============================================================================

/// A scheduled local event or announcement (outage notice, meeting, clean-up).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventItem {
    pub id: Uuid,
    pub title: String,
    /// Free-text category; not restricted to [`Category`].
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

impl EventItem {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        start: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category: category.into(),
            location: location.into(),
            start,
            description: description.into(),
        }
    }
}

impl fmt::Display for EventItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} ({})",
            self.title,
            self.start.format("%d %b %Y %H:%M"),
            self.location
        )
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the civic core and its presentation layer.
///
/// `Empty`, `IndexOutOfRange`, `SlotOccupied`, `UnknownNode` and
/// `InvalidWeight` are contract violations: the operation is aborted and
/// nothing is changed. A refused status transition is not an error; it is
/// reported as `false`.
#[derive(Debug, Error)]
pub enum CivicError {
    /// Pop, dequeue or peek on an empty stack, queue or heap.
    #[error("{0} is empty")]
    Empty(&'static str),

    /// Index outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Binary tree slot (root, left or right) already holds a node.
    #[error("{0} slot already occupied")]
    SlotOccupied(&'static str),

    /// Node handle that does not belong to this tree.
    #[error("unknown tree node: {0}")]
    UnknownNode(usize),

    /// Edge weight that is negative or not a number.
    #[error("invalid edge weight: {0}")]
    InvalidWeight(f64),

    /// Caller input that could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
