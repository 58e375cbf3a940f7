//! # Fixed Constants
//!
//! Compile-time constants shared by the containers, indexes and formats.
//! Runtime-tunable values have their defaults here and are overridden
//! through [`crate::config::CoreConfig`].

// =============================================================================
// CONTAINER SIZING
// =============================================================================

/// Capacity of a `DynamicArray` created with `new()`.
pub const DEFAULT_ARRAY_CAPACITY: usize = 8;

/// Capacity of a `Queue` created with `new()`.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Bucket count of a fresh `HashTable`.
pub const INITIAL_BUCKETS: usize = 16;

/// A `HashTable` doubles its buckets once `len > buckets * MAX_LOAD_FACTOR`.
pub const MAX_LOAD_FACTOR: usize = 2;

/// Initial heap capacity used by the oldest-open view.
pub const ISSUE_HEAP_CAPACITY: usize = 32;

// =============================================================================
// STATUS TIMELINE
// =============================================================================

/// Note attached to the synthesized first checkpoint of every timeline.
pub const SUBMITTED_NOTE: &str = "Issue submitted.";

// =============================================================================
// SEARCH RANKING
// =============================================================================

/// Prefix marking a category token in the search counters.
pub const CATEGORY_TOKEN_PREFIX: &str = "cat:";

/// Default number of recommended categories.
pub const DEFAULT_TOP_CATEGORIES: usize = 3;

/// Search tokens kept for the recent-searches list.
pub const RECENT_SEARCHES: usize = 20;

/// Default number of upcoming events returned.
pub const DEFAULT_UPCOMING: usize = 20;

// =============================================================================
// GEOGRAPHY
// =============================================================================

/// Side length of the square grid unknown place names are hashed into.
pub const GRID_EXTENT: f64 = 100.0;

/// Seed of the place-name hash.
pub const LOCATION_HASH_SEED: i32 = 23;

/// Multiplier of the place-name hash.
pub const LOCATION_HASH_MULTIPLIER: i32 = 31;

/// Built-in place names with fixed coordinates (lower-case keys).
pub const KNOWN_LOCATIONS: [(&str, f64, f64); 10] = [
    ("mamelodi", 12.0, 78.0),
    ("soshanguve", 18.0, 66.0),
    ("soshanguve park", 20.0, 64.0),
    ("atteridgeville", 8.0, 54.0),
    ("town hall", 50.0, 50.0),
    ("cbd", 52.0, 48.0),
    ("hatfield", 60.0, 52.0),
    ("menlyn", 68.0, 44.0),
    ("centurion", 40.0, 40.0),
    ("arcadia", 56.0, 56.0),
];

// =============================================================================
// BINARY FORMAT
// =============================================================================

/// Magic bytes for the graph snapshot header.
pub const MAGIC_BYTES: &[u8; 4] = b"CIVG";

/// Current graph snapshot format version.
pub const FORMAT_VERSION: u8 = 1;

/// Header length: magic + version byte.
pub const HEADER_LEN: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"CIVG");
        assert_eq!(HEADER_LEN, MAGIC_BYTES.len() + 1);
    }

    #[test]
    fn known_locations_are_lower_case_and_inside_grid() {
        for (name, x, y) in KNOWN_LOCATIONS {
            assert_eq!(name, name.to_lowercase());
            assert!((0.0..=GRID_EXTENT).contains(&x));
            assert!((0.0..=GRID_EXTENT).contains(&y));
        }
    }
}
