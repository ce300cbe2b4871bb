//! Export module for saving planet data.
//!
//! Supports the native binary planet format for save/load round trips
//! and PNG rasters for visual inspection.

mod binary;
mod png;

use std::path::Path;

pub use binary::{ByteReader, ByteWriter, DecodeError};
pub use png::{export_all, export_grid_png, export_png, ExportError, ExportMode, PngExportOptions};

use crate::terrain::Planet;

/// Writes the binary planet blob to `path`, replacing any existing file.
pub fn save_planet(planet: &Planet, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, planet.encode())
}

/// Reads a planet written by [`save_planet`]. Biomes still need classifying.
pub fn load_planet(path: &Path) -> Result<Planet, DecodeError> {
    let bytes = std::fs::read(path)?;
    Planet::decode(&bytes)
}
