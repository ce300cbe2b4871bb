//! Top-level planet configuration and validation errors.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::climate::ClimateConfig;
use crate::random::RandomSource;
use crate::terrain::TerrainConfig;

/// Precondition violations rejected before any generation stage runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("Sea level must lie strictly between 0 and 1, got {0}")]
    SeaLevelOutOfRange(f32),
    #[error("Terrain sea level {terrain} differs from climate sea level {climate}")]
    SeaLevelMismatch { terrain: f32, climate: f32 },
    #[error("At least one plate is required")]
    NoPlates,
    #[error("At least one noise octave is required")]
    NoOctaves,
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: f32 },
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejects NaN and infinities.
pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

pub(crate) fn require_sea_level(value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::SeaLevelOutOfRange(value))
    }
}

/// Everything needed to generate one planet from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub name: String,
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub climate: ClimateConfig,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            name: "Terra".to_string(),
            seed: 42,
            terrain: TerrainConfig::default(),
            climate: ClimateConfig::default(),
        }
    }
}

impl PlanetConfig {
    /// Builds a square-world configuration with a randomised plate count.
    ///
    /// Draws the plate count (`7 + next_int(0, 5)`) from `rng`. This draw
    /// happens before terrain generation and is part of the draw order.
    pub fn randomized(name: &str, seed: u64, size: u32, rng: &mut RandomSource) -> Self {
        let num_plates = 7 + rng.next_int(0, 5) as u32;
        Self {
            name: name.to_string(),
            seed,
            terrain: TerrainConfig {
                width: size,
                height: size,
                num_plates,
                erosion_iterations: size.saturating_mul(100),
                ..TerrainConfig::default()
            },
            climate: ClimateConfig::default(),
        }
    }

    /// Parses a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PlanetConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Sets the sea level on both the terrain and climate sections.
    pub fn set_sea_level(&mut self, sea_level: f32) {
        self.terrain.sea_level = sea_level;
        self.climate.sea_level = sea_level;
    }

    /// Overrides the grid size. Other terrain settings are kept.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.terrain.width = width;
        self.terrain.height = height;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.climate.validate()?;
        if self.terrain.sea_level != self.climate.sea_level {
            return Err(ConfigError::SeaLevelMismatch {
                terrain: self.terrain.sea_level,
                climate: self.climate.sea_level,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        PlanetConfig::default().validate().unwrap();
    }

    #[test]
    fn test_randomized_plate_range() {
        for seed in 0..50 {
            let mut rng = RandomSource::new(seed);
            let config = PlanetConfig::randomized("Test", seed, 64, &mut rng);
            assert!((7..=12).contains(&config.terrain.num_plates));
            assert_eq!(config.terrain.erosion_iterations, 6400);
            assert_eq!(config.terrain.width, 64);
            assert_eq!(config.terrain.height, 64);
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_randomized_consumes_one_draw() {
        let mut a = RandomSource::new(5);
        let mut b = RandomSource::new(5);
        PlanetConfig::randomized("A", 5, 32, &mut a);
        b.next_int(0, 5);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PlanetConfig::from_toml_str(
            r#"
            name = "Dune"
            seed = 7

            [terrain]
            width = 64
            height = 32
            "#,
        )
        .unwrap();
        assert_eq!(config.name, "Dune");
        assert_eq!(config.seed, 7);
        assert_eq!(config.terrain.width, 64);
        assert_eq!(config.terrain.height, 32);
        assert_eq!(config.terrain.num_plates, TerrainConfig::default().num_plates);
        assert_eq!(config.climate, ClimateConfig::default());
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        let err = PlanetConfig::from_toml_str("[terrain]\nsea_level = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::SeaLevelOutOfRange(_)));

        let err = PlanetConfig::from_toml_str("seed = \"abc\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_sea_level_mismatch_rejected() {
        let mut config = PlanetConfig::default();
        config.terrain.sea_level = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeaLevelMismatch { .. })
        ));
        config.set_sea_level(0.5);
        config.validate().unwrap();
    }

    #[test]
    fn test_size_override_keeps_file_settings() {
        let mut config = PlanetConfig::from_toml_str(
            "[terrain]\nwidth = 64\nheight = 32\nnum_plates = 3\nerosion_iterations = 10\n",
        )
        .unwrap();
        config.set_size(128, 128);
        assert_eq!((config.terrain.width, config.terrain.height), (128, 128));
        assert_eq!(config.terrain.num_plates, 3);
        assert_eq!(config.terrain.erosion_iterations, 10);
        config.validate().unwrap();

        config.set_size(0, 16);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDimension { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planet.toml");
        std::fs::write(&path, "name = \"Arrakis\"\n[climate]\nbase_temperature = 30.0\n").unwrap();
        let config = PlanetConfig::load(&path).unwrap();
        assert_eq!(config.name, "Arrakis");
        assert_eq!(config.climate.base_temperature, 30.0);

        let missing = PlanetConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
