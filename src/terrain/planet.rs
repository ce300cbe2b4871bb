//! Planet aggregate: the three grids, the derived biome map and summary statistics.

use log::info;

use crate::biomes::{classify, Biome};
use crate::climate::ClimateGenerator;
use crate::config::PlanetConfig;
use crate::export::{ByteReader, ByteWriter, DecodeError};
use crate::pipeline::PipelineError;
use crate::random::RandomSource;

use super::{Heightmap, TerrainGenerator};

/// A generated planet surface.
///
/// The biome array is derived state. It reflects the grids as of the last
/// call to [`Planet::classify_biomes`] (or [`Planet::reclassify_region`])
/// and is never refreshed automatically.
#[derive(Debug, Clone)]
pub struct Planet {
    pub(crate) name: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) sea_level: f32,
    pub(crate) elevation: Heightmap,
    pub(crate) temperature: Heightmap,
    pub(crate) moisture: Heightmap,
    pub(crate) biomes: Vec<Biome>,
    pub(crate) land_fraction: f32,
    pub(crate) avg_temperature: f32,
    pub(crate) avg_moisture: f32,
}

impl Planet {
    /// Assembles a planet from finished grids. Biomes are not classified yet.
    ///
    /// # Panics
    /// Panics if the three grids differ in size.
    pub fn new(
        name: impl Into<String>,
        sea_level: f32,
        elevation: Heightmap,
        temperature: Heightmap,
        moisture: Heightmap,
    ) -> Self {
        let dims = (elevation.width(), elevation.height());
        assert_eq!(dims, (temperature.width(), temperature.height()), "temperature grid size");
        assert_eq!(dims, (moisture.width(), moisture.height()), "moisture grid size");

        Self {
            name: name.into(),
            width: dims.0,
            height: dims.1,
            sea_level,
            elevation,
            temperature,
            moisture,
            biomes: Vec::new(),
            land_fraction: 0.0,
            avg_temperature: 0.0,
            avg_moisture: 0.0,
        }
    }

    /// Runs terrain, climate and biome classification.
    ///
    /// Draws from `rng` in order: terrain stages, temperature noise seed,
    /// moisture noise seed.
    pub fn generate(config: &PlanetConfig, rng: &mut RandomSource) -> Result<Self, PipelineError> {
        config.validate()?;

        let elevation = TerrainGenerator::new().generate(&config.terrain, rng)?;
        let climate = ClimateGenerator::new(config.climate.clone())?.generate(&elevation, rng);

        let mut planet = Planet::new(
            config.name.clone(),
            config.terrain.sea_level,
            elevation,
            climate.temperature,
            climate.moisture,
        );
        planet.classify_biomes();
        info!(
            "Planet '{}' complete: {:.1}% land, avg temperature {:.1}°C, avg moisture {:.3}",
            planet.name,
            planet.land_fraction * 100.0,
            planet.avg_temperature,
            planet.avg_moisture
        );
        Ok(planet)
    }

    /// Classifies every cell and refreshes the summary statistics.
    pub fn classify_biomes(&mut self) {
        let sea = self.sea_level;
        self.biomes = self
            .elevation
            .as_slice()
            .iter()
            .zip(self.temperature.as_slice())
            .zip(self.moisture.as_slice())
            .map(|((&e, &t), &m)| classify(e, t, m, sea))
            .collect();
        self.update_stats();
    }

    pub(crate) fn update_stats(&mut self) {
        let cells = self.elevation.len();
        let land = self
            .elevation
            .as_slice()
            .iter()
            .filter(|&&e| e >= self.sea_level)
            .count();
        self.land_fraction = if cells == 0 { 0.0 } else { land as f32 / cells as f32 };
        self.avg_temperature = self.temperature.average();
        self.avg_moisture = self.moisture.average();
    }

    pub fn is_classified(&self) -> bool {
        self.biomes.len() == self.elevation.len()
    }

    /// Stored biome at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the planet has not been classified or the cell is out of bounds.
    pub fn biome_at(&self, x: u32, y: u32) -> Biome {
        assert!(self.is_classified(), "biome_at called before classify_biomes");
        self.biomes[self.elevation.index(x, y)]
    }

    /// Biomes in row-major order; empty until classified.
    pub fn biomes(&self) -> &[Biome] {
        &self.biomes
    }

    /// Cell count per biome, indexed by [`Biome::as_u8`].
    pub fn biome_histogram(&self) -> [usize; Biome::COUNT] {
        let mut counts = [0usize; Biome::COUNT];
        for b in &self.biomes {
            counts[b.as_u8() as usize] += 1;
        }
        counts
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    pub fn elevation(&self) -> &Heightmap {
        &self.elevation
    }

    pub fn temperature(&self) -> &Heightmap {
        &self.temperature
    }

    pub fn moisture(&self) -> &Heightmap {
        &self.moisture
    }

    /// Fraction of cells at or above sea level.
    pub fn land_fraction(&self) -> f32 {
        self.land_fraction
    }

    pub fn avg_temperature(&self) -> f32 {
        self.avg_temperature
    }

    pub fn avg_moisture(&self) -> f32 {
        self.avg_moisture
    }

    /// Binary form: `name | width | height | sea_level | elevation | temperature | moisture`.
    ///
    /// Biomes and statistics are not written.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_string(&self.name);
        writer.write_u32(self.width);
        writer.write_u32(self.height);
        writer.write_f32(self.sea_level);
        self.elevation.encode(&mut writer);
        self.temperature.encode(&mut writer);
        self.moisture.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decodes a planet. Call [`Planet::classify_biomes`] before querying biomes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let name = reader.read_string()?;
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let sea_level = reader.read_f32()?;

        let mut read_grid = || -> Result<Heightmap, DecodeError> {
            let grid = Heightmap::decode(&mut reader)?;
            if (grid.width(), grid.height()) != (width, height) {
                return Err(DecodeError::DimensionMismatch {
                    expected: (width, height),
                    found: (grid.width(), grid.height()),
                });
            }
            Ok(grid)
        };
        let elevation = read_grid()?;
        let temperature = read_grid()?;
        let moisture = read_grid()?;

        Ok(Planet::new(name, sea_level, elevation, temperature, moisture))
    }
}
