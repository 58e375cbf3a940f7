//! # Application Configuration
//!
//! TOML file with a single `[core]` table mirroring
//! [`civic_core::CoreConfig`]. Every key is optional.
//!
//! ```toml
//! [core]
//! top_categories = 5
//! oldest_open = 10
//!
//! [[core.known_locations]]
//! name = "Sunnyside"
//! x = 58.0
//! y = 54.0
//! ```

use civic_core::{CivicError, CoreConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum configuration file size accepted.
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, CivicError> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| CivicError::Config(e.to_string()))?;
        config.core.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, CivicError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let size = std::fs::metadata(path)
            .map_err(|e| CivicError::Io(e.to_string()))?
            .len();
        if size > MAX_CONFIG_SIZE {
            return Err(CivicError::Config(format!(
                "{} is {} bytes (limit {})",
                path.display(),
                size,
                MAX_CONFIG_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| CivicError::Io(e.to_string()))?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
