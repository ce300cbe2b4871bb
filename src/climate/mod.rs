//! Climate generation.
//!
//! Derives annual-mean temperature and moisture grids from elevation,
//! latitude and low-frequency noise.

mod coast;
mod config;
mod moisture;
mod temperature;

use log::info;

use crate::config::ConfigError;
use crate::noise::PerlinNoise;
use crate::random::RandomSource;
use crate::terrain::Heightmap;

pub use coast::ocean_distance;
pub use config::ClimateConfig;
pub use moisture::{generate_moisture, temperate_moisture, tropical_moisture};
pub use temperature::{generate_temperature, land_height, latitude};

/// Temperature and moisture grids for one planet.
#[derive(Debug, Clone)]
pub struct ClimateMaps {
    pub temperature: Heightmap,
    pub moisture: Heightmap,
}

/// Seeds the climate noise fields from the shared random source.
///
/// Each generator call draws exactly one `u64`: temperature first,
/// then moisture.
#[derive(Debug, Clone)]
pub struct ClimateGenerator {
    config: ClimateConfig,
}

impl ClimateGenerator {
    /// Validates `config` and builds a generator.
    pub fn new(config: ClimateConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClimateConfig {
        &self.config
    }

    pub fn generate_temperature(&self, elevation: &Heightmap, rng: &mut RandomSource) -> Heightmap {
        info!("Generating temperature map...");
        let noise = PerlinNoise::new(rng.next_u64());
        let temp = generate_temperature(elevation, &self.config, &noise);
        info!(
            "Temperature range: {:.1}°C to {:.1}°C",
            temp.min_value(),
            temp.max_value()
        );
        temp
    }

    pub fn generate_moisture(&self, elevation: &Heightmap, rng: &mut RandomSource) -> Heightmap {
        info!("Generating moisture map...");
        let noise = PerlinNoise::new(rng.next_u64());
        let moisture = generate_moisture(elevation, &self.config, &noise);
        info!(
            "Moisture range: {:.3} to {:.3}",
            moisture.min_value(),
            moisture.max_value()
        );
        moisture
    }

    /// Temperature then moisture, in draw order.
    pub fn generate(&self, elevation: &Heightmap, rng: &mut RandomSource) -> ClimateMaps {
        let temperature = self.generate_temperature(elevation, rng);
        let moisture = self.generate_moisture(elevation, rng);
        ClimateMaps {
            temperature,
            moisture,
        }
    }
}
