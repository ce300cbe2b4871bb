//! Deterministic procedural planet generator.
//!
//! A seed drives a fixed sequence of stages: tectonic plates, fractal
//! continents, boundary ridges, particle erosion and sea-level calibration
//! produce an elevation grid; temperature and moisture are derived from it,
//! and every cell is classified into a biome. The same seed and
//! configuration always yield bit-identical grids.

pub mod biomes;
pub mod climate;
pub mod config;
pub mod erosion;
pub mod export;
pub mod noise;
pub mod pipeline;
pub mod random;
pub mod tectonics;
pub mod terrain;

pub use biomes::{classify, Biome};
pub use climate::{ClimateConfig, ClimateGenerator, ClimateMaps};
pub use config::{ConfigError, PlanetConfig};
pub use erosion::ErosionConfig;
pub use export::{load_planet, save_planet, DecodeError, ExportError, ExportMode};
pub use noise::{FractalNoiseConfig, PerlinNoise};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageId};
pub use random::{RandomSource, RngState};
pub use tectonics::{CrustType, PlateMap, TectonicPlate};
pub use terrain::{Brush, Heightmap, Planet, Region, TerrainConfig, TerrainGenerator};
