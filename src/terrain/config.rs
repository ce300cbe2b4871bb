//! Terrain generation parameters.

use serde::{Deserialize, Serialize};

use crate::config::{require_finite, require_sea_level, ConfigError};
use crate::erosion::ErosionConfig;

/// Parameters for the terrain stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid width in cells (longitude, wraps).
    pub width: u32,
    /// Grid height in cells (latitude, does not wrap).
    pub height: u32,
    /// Fraction of cells that end up below sea level, in (0, 1).
    pub sea_level: f32,
    /// Number of tectonic plates.
    pub num_plates: u32,
    /// Octaves for the continent-scale noise layer.
    pub fbm_octaves: u32,
    /// Strength of boundary ridges.
    pub mountain_scale: f32,
    /// Number of erosion particles to simulate.
    pub erosion_iterations: u32,
    /// Particle constants for hydraulic erosion.
    pub erosion: ErosionConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            sea_level: 0.40,
            num_plates: 8,
            fbm_octaves: 7,
            mountain_scale: 0.3,
            erosion_iterations: 50,
            erosion: ErosionConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Creates a configuration for a `width × height` grid with default parameters.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        require_sea_level(self.sea_level)?;
        if self.num_plates < 1 {
            return Err(ConfigError::NoPlates);
        }
        if self.fbm_octaves < 1 {
            return Err(ConfigError::NoOctaves);
        }
        require_finite("mountain_scale", self.mountain_scale)?;
        if self.mountain_scale < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "mountain_scale",
                value: self.mountain_scale,
            });
        }
        self.erosion.validate()
    }
}
