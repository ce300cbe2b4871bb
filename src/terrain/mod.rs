//! Terrain module.
//!
//! Holds the [`Heightmap`] grid, the terrain generator that drives the
//! stage pipeline, and the [`Planet`] aggregate with its editing and
//! serialization operations.

mod config;
mod generator;
mod heightmap;
mod planet;
mod sea_level;
mod terraform;

pub use config::TerrainConfig;
pub use generator::TerrainGenerator;
pub use heightmap::Heightmap;
pub use planet::Planet;
pub use sea_level::{calibrate_sea_level, ocean_fraction};
pub use terraform::{Brush, Region};
