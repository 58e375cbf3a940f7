//! # Geographic Clustering
//!
//! Maps free-text locations onto a 2-D grid and links open issues with a
//! Euclidean minimum spanning tree.
//!
//! Unknown place names are hashed into the grid. The hash runs over UTF-16
//! code units with wrapping 32-bit arithmetic, starting at 23 and folding
//! `h = h * 31 + unit`; x comes from the low byte of the hash and y from the
//! next byte, each scaled from `0..=255` onto `0..=extent`.

use crate::collections::{DynamicArray, HashTable};
use crate::config::CoreConfig;
use crate::graph::{EdgeKind, Graph};
use crate::primitives::{GRID_EXTENT, KNOWN_LOCATIONS, LOCATION_HASH_MULTIPLIER, LOCATION_HASH_SEED};
use crate::timeline::StatusIndex;
use crate::types::{Issue, IssueId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Stable place-name hash. `key` is expected to be normalized already.
#[must_use]
pub fn location_hash(key: &str) -> i32 {
    key.encode_utf16().fold(LOCATION_HASH_SEED, |h, unit| {
        h.wrapping_mul(LOCATION_HASH_MULTIPLIER)
            .wrapping_add(i32::from(unit))
    })
}

/// Place-name to coordinate resolver.
#[derive(Debug, Clone)]
pub struct LocationMap {
    known: HashTable<String, Point>,
    extent: f64,
}

impl LocationMap {
    /// The built-in place table on the default grid.
    #[must_use]
    pub fn new() -> Self {
        let mut map = Self::empty(GRID_EXTENT);
        for (name, x, y) in KNOWN_LOCATIONS {
            map.insert(name, Point::new(x, y));
        }
        map
    }

    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        let mut map = Self::empty(config.grid_extent);
        for place in &config.known_locations {
            map.insert(&place.name, Point::new(place.x, place.y));
        }
        map
    }

    fn empty(extent: f64) -> Self {
        Self {
            known: HashTable::new(),
            extent,
        }
    }

    /// Add or replace a known place.
    pub fn insert(&mut self, name: &str, point: Point) {
        self.known.insert(normalize(name), point);
    }

    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Coordinate of `location`. Blank input maps to the origin.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Point {
        let key = normalize(location);
        if key.is_empty() {
            return Point::new(0.0, 0.0);
        }
        if let Some(point) = self.known.get(key.as_str()) {
            return *point;
        }
        let h = location_hash(&key);
        let x = f64::from(h & 0xFF);
        let y = f64::from((h >> 8) & 0xFF);
        Point::new(x / 255.0 * self.extent, y / 255.0 * self.extent)
    }
}

impl Default for LocationMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim, then lowercase one char at a time with the simple one-to-one
/// mapping: no final-sigma context, and `İ` becomes plain `i`.
fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// One link of the open-issue spanning tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MstLink {
    pub from: IssueId,
    pub to: IssueId,
    pub distance: f64,
}

/// Spanning tree over the locations of open issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMst {
    pub total_distance: f64,
    pub links: DynamicArray<MstLink>,
}

/// Minimum spanning tree over every open issue, rooted at the first one.
///
/// The graph is complete, so every open issue is reached. Fewer than two
/// open issues give a zero total and no links.
pub fn open_issues_mst<'a>(
    issues: impl IntoIterator<Item = &'a Issue>,
    statuses: &StatusIndex,
    locations: &LocationMap,
) -> GeoMst {
    let mut ids = DynamicArray::new();
    let mut points = DynamicArray::new();
    for issue in issues {
        if statuses.is_open(&issue.id) {
            ids.push(issue.id);
            points.push(locations.resolve(&issue.location));
        }
    }

    let mut result = GeoMst {
        total_distance: 0.0,
        links: DynamicArray::new(),
    };
    if ids.len() < 2 {
        return result;
    }

    let mut graph = Graph::new();
    for i in 0..points.len() {
        graph.add_vertex(i);
    }
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate().skip(i + 1) {
            if let Err(e) = graph.add_edge(i, j, a.distance(*b), EdgeKind::Undirected) {
                tracing::warn!(i, j, "distance edge refused: {}", e);
            }
        }
    }

    let mst = graph.prim_mst(&0);
    result.total_distance = mst.total_weight;
    for edge in &mst.edges {
        if let (Ok(from), Ok(to)) = (ids.get(edge.from), ids.get(edge.to)) {
            result.links.push(MstLink {
                from: *from,
                to: *to,
                distance: edge.weight,
            });
        }
    }
    tracing::debug!(
        open = ids.len(),
        total = result.total_distance,
        "open-issue spanning tree built"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, IssueStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn known_places_ignore_case_and_padding() {
        let map = LocationMap::new();
        assert_eq!(map.resolve("  Town Hall "), Point::new(50.0, 50.0));
        assert_eq!(map.resolve("MAMELODI"), Point::new(12.0, 78.0));
        assert_eq!(map.resolve("   "), Point::new(0.0, 0.0));
    }

    #[test]
    fn non_ascii_names_lowercase_char_by_char() {
        assert_eq!(normalize(" ΟΔΟΣ "), "οδοσ");
        assert_eq!(normalize("İstanbul"), "istanbul");
        // 23*31 + 'σ'(963) = 1676
        assert_eq!(location_hash(&normalize("Σ")), 1676);

        let map = LocationMap::new();
        assert_eq!(map.resolve("ΟΔΟΣ"), map.resolve("οδοσ"));
        assert_eq!(map.resolve("İstanbul"), map.resolve("istanbul"));
    }

    #[test]
    fn hash_matches_reference_values() {
        // 23*31 + 'a'(97) = 810
        assert_eq!(location_hash("a"), 810);
        assert_eq!(location_hash(""), 23);
        // long inputs wrap instead of overflowing
        let long = "x".repeat(64);
        assert_eq!(location_hash(&long), location_hash(&long));
    }

    #[test]
    fn unknown_places_land_inside_grid() {
        let map = LocationMap::new();
        for name in ["Lynnwood", "Garsfontein", "Pretoria North", "Ga-Rankuwa"] {
            let p = map.resolve(name);
            assert!((0.0..=GRID_EXTENT).contains(&p.x), "{name}: {p:?}");
            assert!((0.0..=GRID_EXTENT).contains(&p.y), "{name}: {p:?}");
            assert_eq!(p, map.resolve(&name.to_uppercase()));
        }
        // 'a' hashes to 810 = 0x32A: x from 0x2A, y from 0x03
        let p = map.resolve("a");
        assert!((p.x - 42.0 / 255.0 * 100.0).abs() < 1e-9);
        assert!((p.y - 3.0 / 255.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn mst_links_open_issues_only() {
        let at = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).single().expect("date");
        let issues = [
            Issue::new(Category::Roads, "CBD", "", at).with_id(IssueId::from_u128(1)),
            Issue::new(Category::Roads, "Town Hall", "", at).with_id(IssueId::from_u128(2)),
            Issue::new(Category::Roads, "Hatfield", "", at).with_id(IssueId::from_u128(3)),
            Issue::new(Category::Roads, "Mamelodi", "", at).with_id(IssueId::from_u128(4)),
        ];
        let mut statuses = StatusIndex::new();
        statuses.ensure_at(IssueId::from_u128(4), at);
        statuses.add_status_at(IssueId::from_u128(4), IssueStatus::Rejected, "spam", at);

        let mst = open_issues_mst(&issues, &statuses, &LocationMap::new());
        assert_eq!(mst.links.len(), 2);
        let cbd = Point::new(52.0, 48.0);
        let expected = cbd.distance(Point::new(50.0, 50.0)) + cbd.distance(Point::new(60.0, 52.0));
        assert!((mst.total_distance - expected).abs() < 1e-9);
        assert!(mst.links.iter().all(|l| l.from != IssueId::from_u128(4) && l.to != IssueId::from_u128(4)));
    }

    #[test]
    fn fewer_than_two_open_issues() {
        let at = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).single().expect("date");
        let single = [Issue::new(Category::Water, "CBD", "", at)];
        let mst = open_issues_mst(&single, &StatusIndex::new(), &LocationMap::new());
        assert_eq!(mst.total_distance, 0.0);
        assert!(mst.links.is_empty());
    }

    #[test]
    fn config_places_override_defaults() {
        let mut config = CoreConfig::default();
        config.known_locations.clear();
        config.known_locations.push(crate::config::KnownLocation {
            name: "Depot".to_string(),
            x: 3.0,
            y: 4.0,
        });
        let map = LocationMap::from_config(&config);
        assert_eq!(map.known_count(), 1);
        assert_eq!(map.resolve("depot"), Point::new(3.0, 4.0));
    }
}
