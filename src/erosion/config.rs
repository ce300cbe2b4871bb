//! Erosion configuration.

use serde::{Deserialize, Serialize};

use crate::config::{require_finite, ConfigError};

/// Constants for the particle-based hydraulic erosion simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    /// Fraction of the previous direction kept each step.
    pub inertia: f32,
    /// Fraction of spare capacity picked up from the surface.
    pub erosion_rate: f32,
    /// Fraction of excess sediment dropped when over capacity.
    pub deposit_rate: f32,
    /// Multiplicative water loss per step.
    pub evaporation: f32,
    /// Speed gain per unit of height drop.
    pub gravity: f32,
    /// Maximum steps per particle.
    pub max_lifetime: u32,
    /// Sediment capacity multiplier (Kc).
    pub capacity_factor: f32,
    /// Lower bound on the slope term when computing capacity.
    pub min_slope: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            inertia: 0.3,
            erosion_rate: 0.3,
            deposit_rate: 0.3,
            evaporation: 0.01,
            gravity: 4.0,
            max_lifetime: 50,
            capacity_factor: 8.0,
            min_slope: 0.01,
        }
    }
}

impl ErosionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("erosion.inertia", self.inertia),
            ("erosion.erosion_rate", self.erosion_rate),
            ("erosion.deposit_rate", self.deposit_rate),
            ("erosion.evaporation", self.evaporation),
        ] {
            require_finite(field, value)?;
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        for (field, value) in [
            ("erosion.gravity", self.gravity),
            ("erosion.capacity_factor", self.capacity_factor),
            ("erosion.min_slope", self.min_slope),
        ] {
            require_finite(field, value)?;
            if value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ErosionConfig::default();
        assert_eq!(config.inertia, 0.3);
        assert_eq!(config.max_lifetime, 50);
        assert_eq!(config.capacity_factor, 8.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_rates_outside_unit_range() {
        let config = ErosionConfig {
            evaporation: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "erosion.evaporation", .. })
        ));

        let config = ErosionConfig {
            gravity: f32::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
