//! Terrain generator: runs the terrain pipeline and returns the elevation grid.

use log::info;

use crate::pipeline::{Pipeline, PipelineError, TerrainState};
use crate::random::RandomSource;

use super::{Heightmap, TerrainConfig};

/// Produces a sea-level-calibrated elevation grid from a configuration.
pub struct TerrainGenerator {
    pipeline: Pipeline,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainGenerator {
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::terrain(),
        }
    }

    /// Runs every terrain stage, drawing from `rng` in pipeline order.
    ///
    /// Plates and the plate map are dropped once the grid is finished.
    pub fn generate(
        &self,
        config: &TerrainConfig,
        rng: &mut RandomSource,
    ) -> Result<Heightmap, PipelineError> {
        info!(
            "Generating terrain ({}x{}, {} plates, {} octaves, {} erosion particles)",
            config.width,
            config.height,
            config.num_plates,
            config.fbm_octaves,
            config.erosion_iterations
        );

        let mut state = TerrainState::new(config.clone());
        self.pipeline.run_with_callbacks(
            &mut state,
            rng,
            |name, i, total| info!("[{}/{}] {}...", i + 1, total, name),
            |_, _, _| {},
        )?;

        let elevation = state.elevation;
        info!(
            "Terrain complete. Elevation range: [{:.3}, {:.3}]",
            elevation.min_value(),
            elevation.max_value()
        );
        Ok(elevation)
    }
}
