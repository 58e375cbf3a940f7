//! # Core Configuration
//!
//! Tunables of the indexes. Every field has a default from
//! [`crate::primitives`]; the app layer decides where overrides come from.

use crate::CivicError;
use crate::primitives::{
    DEFAULT_TOP_CATEGORIES, DEFAULT_UPCOMING, GRID_EXTENT, KNOWN_LOCATIONS,
};
use serde::{Deserialize, Serialize};

/// A named place with fixed grid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownLocation {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Place names resolved without hashing. Matched trimmed and lower-cased.
    pub known_locations: Vec<KnownLocation>,
    /// Side of the square grid unknown place names are hashed into.
    pub grid_extent: f64,
    /// Default count for category recommendations.
    pub top_categories: usize,
    /// Default count for the oldest-open view.
    pub oldest_open: usize,
    /// Default count for upcoming events.
    pub upcoming: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            known_locations: KNOWN_LOCATIONS
                .iter()
                .map(|(name, x, y)| KnownLocation {
                    name: (*name).to_string(),
                    x: *x,
                    y: *y,
                })
                .collect(),
            grid_extent: GRID_EXTENT,
            top_categories: DEFAULT_TOP_CATEGORIES,
            oldest_open: 5,
            upcoming: DEFAULT_UPCOMING,
        }
    }
}

impl CoreConfig {
    /// Reject values the geographic index cannot work with.
    pub fn validate(&self) -> Result<(), CivicError> {
        if !self.grid_extent.is_finite() || self.grid_extent <= 0.0 {
            return Err(CivicError::Config(format!(
                "grid_extent must be positive, got {}",
                self.grid_extent
            )));
        }
        for place in &self.known_locations {
            if place.name.trim().is_empty() {
                return Err(CivicError::Config("known location with empty name".to_string()));
            }
            if !place.x.is_finite() || !place.y.is_finite() {
                return Err(CivicError::Config(format!(
                    "known location '{}' has non-finite coordinates",
                    place.name
                )));
            }
        }
        Ok(())
    }
}
