use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::DEFAULT_MAX_SNAPSHOT_BYTES;
use crate::catalog::ChecklistCategory;
use crate::model::LatLon;

pub const DEFAULT_MAP_ZOOM: f64 = 8.0;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 25.0;
pub const DEFAULT_MAP_REGION: &str = "trip-map";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid map center: lat={lat}, lng={lng}")]
    InvalidCenter { lat: f64, lng: f64 },

    #[error("invalid zoom: {0}")]
    InvalidZoom(f64),

    #[error("map region must not be empty")]
    EmptyMapRegion,

    #[error("max_snapshot_bytes must be positive")]
    ZeroSnapshotLimit,
}

/// Whether the "remember this item" box starts checked, per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberDefaults {
    pub gear: bool,
    pub chores: bool,
    pub downloads: bool,
}

impl RememberDefaults {
    #[must_use]
    pub fn for_category(&self, category: ChecklistCategory) -> bool {
        match category {
            ChecklistCategory::Gear => self.gear,
            ChecklistCategory::Chore => self.chores,
            ChecklistCategory::Download => self.downloads,
        }
    }
}

impl Default for RememberDefaults {
    fn default() -> Self {
        Self {
            gear: true,
            chores: false,
            downloads: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub map_center: LatLon,
    pub map_zoom: f64,
    pub map_region: String,
    pub remember_by_default: RememberDefaults,
    pub max_snapshot_bytes: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            map_center: LatLon {
                lat: 40.0,
                lng: -111.0,
            },
            map_zoom: DEFAULT_MAP_ZOOM,
            map_region: DEFAULT_MAP_REGION.to_string(),
            remember_by_default: RememberDefaults::default(),
            max_snapshot_bytes: DEFAULT_MAX_SNAPSHOT_BYTES,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let LatLon { lat, lng } = self.map_center;
        if LatLon::new(lat, lng).is_err() {
            return Err(ConfigError::InvalidCenter { lat, lng });
        }
        if !self.map_zoom.is_finite() || !(MIN_ZOOM..=MAX_ZOOM).contains(&self.map_zoom) {
            return Err(ConfigError::InvalidZoom(self.map_zoom));
        }
        if self.map_region.trim().is_empty() {
            return Err(ConfigError::EmptyMapRegion);
        }
        if self.max_snapshot_bytes == 0 {
            return Err(ConfigError::ZeroSnapshotLimit);
        }
        Ok(())
    }
}
