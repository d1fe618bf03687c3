use crate::constants::MAX_ELEMENTS;
use crate::types::ZoomLevel;
use serde::{Deserialize, Serialize};

/// Runtime settings for a simulation instance, loaded from RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Current view rotation (0..=3) used for sprite projection.
    pub rotation: u8,
    /// Entity sprites are never invalidated at a zoom finer than this.
    pub vehicles_min_scale: ZoomLevel,
    /// Terrain type given to every surface when a flat map is created.
    pub default_land_type: u8,
    /// Capacity of the tile element buffer.
    pub max_elements: usize,
    /// Title screen demo: money effects are not spawned.
    pub title_mode: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rotation: 0,
            vehicles_min_scale: ZoomLevel::Half,
            default_land_type: 0,
            max_elements: MAX_ELEMENTS,
            title_mode: false,
        }
    }
}
