//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

use crate::config::{require_finite, require_sea_level, ConfigError};

/// Configuration for temperature and moisture generation.
///
/// Units:
/// - temperatures: °C
/// - elevation: normalised [0, 1], same grid the terrain stages produce
/// - moisture: [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// Elevation threshold separating ocean from land.
    pub sea_level: f32,
    /// Carried for seasonal models; the annual-mean model ignores it.
    pub axial_tilt: f32,
    /// Equatorial sea-level temperature.
    pub base_temperature: f32,
    /// Equator-to-pole temperature span.
    pub temperature_range: f32,
    /// Cooling at the highest land relative to the coast.
    pub altitude_lapse: f32,
    /// Moisture assigned to ocean cells.
    pub ocean_moisture: f32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.40,
            axial_tilt: 23.5,
            base_temperature: 15.0,
            temperature_range: 70.0,
            altitude_lapse: 40.0,
            ocean_moisture: 0.9,
        }
    }
}

impl ClimateConfig {
    pub fn earth_like() -> Self {
        Self::default()
    }

    /// Default climate over a world with the given sea level.
    pub fn with_sea_level(sea_level: f32) -> Self {
        Self {
            sea_level,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_sea_level(self.sea_level)?;
        require_finite("axial_tilt", self.axial_tilt)?;
        require_finite("base_temperature", self.base_temperature)?;
        require_finite("temperature_range", self.temperature_range)?;
        require_finite("altitude_lapse", self.altitude_lapse)?;
        if !(0.0..=1.0).contains(&self.ocean_moisture) {
            return Err(ConfigError::InvalidValue {
                field: "ocean_moisture",
                value: self.ocean_moisture,
            });
        }
        Ok(())
    }
}
