//! # civic-core
//!
//! In-memory containers, graph algorithms and issue indexes behind a
//! municipal service-request tracker - THE LOGIC.
//!
//! Everything here is built from the crate's own collections: dynamic
//! array, hash table, set, stack, queue, binary tree, AVL tree and binary
//! heap. On top of them sit a weighted graph (BFS paths, Prim's MST) and
//! the domain indexes: department routing, status timelines, creation-time
//! ordering, the oldest-open view, geographic clustering and the event
//! catalogue.
//!
//! ## Architectural Constraints
//!
//! - No file or network I/O; the app layer owns persistence
//! - Deterministic: fixed hashing keys, fixed routing edge order
//! - Contract violations return `Err`, never panic
//! - Single writer per structure; search counters are the only lock

// =============================================================================
// MODULES
// =============================================================================

pub mod avl_index;
pub mod collections;
pub mod config;
pub mod events;
pub mod formats;
pub mod geo;
pub mod graph;
pub mod primitives;
pub mod priority;
pub mod routing;
pub mod session;
pub mod timeline;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Category, CivicError, ContactChannel, EventItem, Issue, IssueId, IssueStatus,
    StatusCheckpoint, is_valid_transition,
};

// =============================================================================
// RE-EXPORTS: Collections and Graph
// =============================================================================

pub use collections::{
    AvlTree, BinaryHeap, BinaryTree, DynamicArray, HashTable, NodeHandle, Queue, Set, Stack,
};
pub use graph::{Edge, EdgeKind, Graph, MinimumSpanningTree, MstEdge, SerializableGraph};

// =============================================================================
// RE-EXPORTS: Indexes
// =============================================================================

pub use avl_index::CreationIndex;
pub use config::{CoreConfig, KnownLocation};
pub use events::{EventCatalog, SearchRecord, SearchStats};
pub use geo::{GeoMst, LocationMap, MstLink, Point, open_issues_mst};
pub use priority::{oldest_first, oldest_open};
pub use routing::{Department, DepartmentNetwork, ROUTING_EDGES};
pub use session::Session;
pub use timeline::{StatusIndex, StatusUpdate};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{PersistenceHeader, graph_from_bytes, graph_to_bytes};
