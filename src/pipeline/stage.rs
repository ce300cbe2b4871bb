//! Generation stage trait and pipeline orchestration.

use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use crate::config::ConfigError;
use crate::erosion::erode;
use crate::noise::{FractalNoiseConfig, PerlinNoise};
use crate::random::RandomSource;
use crate::tectonics::{apply_ridges, generate_plates, PlateMap, TectonicPlate};
use crate::terrain::{calibrate_sea_level, Heightmap, TerrainConfig};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Plate centers and Voronoi partition.
    Plates,
    /// Per-plate base elevation.
    BaseElevation,
    /// Continent and detail fBm layers.
    ContinentalNoise,
    /// Ridged mountains at plate boundaries.
    Ridges,
    /// Particle-based hydraulic erosion.
    Erosion,
    /// Percentile remap onto the configured sea level.
    SeaLevel,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Plates => "plates",
            StageId::BaseElevation => "base_elevation",
            StageId::ContinentalNoise => "continental_noise",
            StageId::Ridges => "ridges",
            StageId::Erosion => "erosion",
            StageId::SeaLevel => "sea_level",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Working data threaded through the terrain stages.
///
/// Plates and the plate map only live as long as this state; the
/// generator hands back the elevation grid alone.
#[derive(Debug, Clone)]
pub struct TerrainState {
    pub config: TerrainConfig,
    pub plates: Vec<TectonicPlate>,
    pub plate_map: Option<PlateMap>,
    pub elevation: Heightmap,
}

impl TerrainState {
    pub fn new(config: TerrainConfig) -> Self {
        let elevation = Heightmap::new(config.width, config.height, 0.0);
        Self {
            config,
            plates: Vec::new(),
            plate_map: None,
            elevation,
        }
    }

    fn plate_map(&self, stage: &str) -> Result<&PlateMap, PipelineError> {
        self.plate_map.as_ref().ok_or_else(|| {
            PipelineError::StageFailed(stage.to_string(), "plate map not generated".to_string())
        })
    }
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the terrain state in some way, building upon
/// previous stages. Stages that draw from the random source must always
/// draw the same number of values in the same order.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the state in place.
    ///
    /// # Arguments
    /// * `state` - The terrain being generated
    /// * `rng` - Shared random source, drawn in pipeline order
    ///
    /// # Returns
    /// `Ok(())` on success, or an error describing what went wrong
    fn execute(&self, state: &mut TerrainState, rng: &mut RandomSource)
        -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The full terrain pipeline, in draw order.
    pub fn terrain() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(PlateStage)
            .add_stage(BaseElevationStage)
            .add_stage(ContinentalNoiseStage)
            .add_stage(RidgeStage)
            .add_stage(ErosionStage)
            .add_stage(SeaLevelStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order.
    pub fn run(
        &self,
        state: &mut TerrainState,
        rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        self.run_with_callbacks(state, rng, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// The configuration is validated before any stage runs.
    ///
    /// # Arguments
    /// * `state` - The terrain being generated
    /// * `rng` - Shared random source
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        state: &mut TerrainState,
        rng: &mut RandomSource,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        state.config.validate()?;

        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            on_stage_start(stage.name(), i, total);
            stage.execute(state, rng)?;
            completed.push(stage.id());
            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Draws plate centers and partitions the map between them.
pub struct PlateStage;

impl GenerationStage for PlateStage {
    fn id(&self) -> StageId {
        StageId::Plates
    }

    fn name(&self) -> &str {
        "Tectonic Plates"
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        let (w, h) = (state.config.width, state.config.height);
        let plates = generate_plates(rng, state.config.num_plates, w, h);
        let plate_map = PlateMap::assign(&plates, w, h);

        let oceanic = plates.iter().filter(|p| p.is_oceanic()).count();
        debug!(
            "{} plates ({} oceanic, {} continental), cells per plate: {:?}",
            plates.len(),
            oceanic,
            plates.len() - oceanic,
            plate_map.cell_counts(plates.len())
        );

        state.plates = plates;
        state.plate_map = Some(plate_map);
        Ok(())
    }
}

/// Writes each plate's base elevation across its cell.
pub struct BaseElevationStage;

impl GenerationStage for BaseElevationStage {
    fn id(&self) -> StageId {
        StageId::BaseElevation
    }

    fn name(&self) -> &str {
        "Base Elevation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Plates]
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        _rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        let plate_map = state.plate_map(self.name())?;
        let bases: Vec<f32> = state
            .plates
            .iter()
            .map(|p| p.crust_type.base_elevation())
            .collect();
        let data = plate_map
            .as_slice()
            .iter()
            .map(|&id| bases[id as usize])
            .collect();
        state.elevation = Heightmap::from_vec(state.config.width, state.config.height, data);
        Ok(())
    }
}

/// Adds the broad continent layer and the fine detail layer.
pub struct ContinentalNoiseStage;

impl GenerationStage for ContinentalNoiseStage {
    fn id(&self) -> StageId {
        StageId::ContinentalNoise
    }

    fn name(&self) -> &str {
        "Continental Noise"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::BaseElevation]
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        let continents = PerlinNoise::new(rng.next_u64());
        let detail = PerlinNoise::new(rng.next_u64());
        let continent_layer = FractalNoiseConfig::continents(state.config.fbm_octaves);
        let detail_layer = FractalNoiseConfig::detail();

        let w = state.config.width as usize;
        let inv_w = 1.0 / state.config.width as f64;
        let inv_h = 1.0 / state.config.height as f64;

        state
            .elevation
            .as_mut_slice()
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                let ny = y as f64 * inv_h;
                for (x, e) in row.iter_mut().enumerate() {
                    let nx = x as f64 * inv_w;
                    let c = continent_layer.sample_fbm(&continents, nx, ny);
                    let d = detail_layer.sample_fbm(&detail, nx, ny);
                    *e += c as f32 * 0.35;
                    *e += d as f32 * 0.08;
                }
            });
        Ok(())
    }
}

/// Raises ridged mountains where plates meet.
pub struct RidgeStage;

impl GenerationStage for RidgeStage {
    fn id(&self) -> StageId {
        StageId::Ridges
    }

    fn name(&self) -> &str {
        "Mountain Ridges"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Plates, StageId::ContinentalNoise]
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        let noise = PerlinNoise::new(rng.next_u64());
        let plate_map = state.plate_map.as_ref().ok_or_else(|| {
            PipelineError::StageFailed(
                "Mountain Ridges".to_string(),
                "plate map not generated".to_string(),
            )
        })?;
        let raised = apply_ridges(
            &mut state.elevation,
            plate_map,
            &noise,
            state.config.mountain_scale,
        );
        debug!("Raised ridges on {} boundary cells", raised);
        Ok(())
    }
}

/// Runs the configured number of erosion particles.
pub struct ErosionStage;

impl GenerationStage for ErosionStage {
    fn id(&self) -> StageId {
        StageId::Erosion
    }

    fn name(&self) -> &str {
        "Hydraulic Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Ridges]
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        let stats = erode(
            &mut state.elevation,
            rng,
            state.config.erosion_iterations,
            &state.config.erosion,
        );
        debug!(
            "Erosion: {} particles, {} steps (lifetime {}, left interior {}, stalled {}), eroded {:.4}, deposited {:.4}",
            stats.particles,
            stats.steps,
            stats.lifetime_exhausted,
            stats.left_interior,
            stats.stalled,
            stats.eroded,
            stats.deposited
        );
        Ok(())
    }
}

/// Normalises the grid and pins the configured ocean fraction.
pub struct SeaLevelStage;

impl GenerationStage for SeaLevelStage {
    fn id(&self) -> StageId {
        StageId::SeaLevel
    }

    fn name(&self) -> &str {
        "Sea Level Calibration"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Erosion]
    }

    fn execute(
        &self,
        state: &mut TerrainState,
        _rng: &mut RandomSource,
    ) -> Result<(), PipelineError> {
        let threshold = calibrate_sea_level(&mut state.elevation, state.config.sea_level);
        debug!(
            "Water threshold {:.4} mapped to sea level {:.3}",
            threshold, state.config.sea_level
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            width: 32,
            height: 32,
            erosion_iterations: 200,
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_id_name() {
        assert_eq!(StageId::Plates.name(), "plates");
        assert_eq!(StageId::SeaLevel.name(), "sea_level");
    }

    #[test]
    fn test_terrain_pipeline_has_six_stages() {
        assert_eq!(Pipeline::terrain().stage_count(), 6);
    }

    #[test]
    fn test_pipeline_execution() {
        let mut state = TerrainState::new(small_config());
        let mut rng = RandomSource::new(42);
        Pipeline::terrain().run(&mut state, &mut rng).unwrap();

        assert_eq!(state.plates.len(), 8);
        assert!(state.plate_map.is_some());
        assert!(state.elevation.min_value() < state.elevation.max_value());
    }

    #[test]
    fn test_pipeline_with_callbacks() {
        let mut state = TerrainState::new(small_config());
        let mut rng = RandomSource::new(42);
        let mut started = Vec::new();
        let mut completed = 0;

        Pipeline::terrain()
            .run_with_callbacks(
                &mut state,
                &mut rng,
                |name, i, total| {
                    assert_eq!(total, 6);
                    started.push((i, name.to_string()));
                },
                |_, _, _| completed += 1,
            )
            .unwrap();

        assert_eq!(started.len(), 6);
        assert_eq!(started[0], (0, "Tectonic Plates".to_string()));
        assert_eq!(started[5], (5, "Sea Level Calibration".to_string()));
        assert_eq!(completed, 6);
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(RidgeStage);
        let mut state = TerrainState::new(small_config());
        let err = pipeline
            .run(&mut state, &mut RandomSource::new(1))
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingDependency(ref s, ref d)
            if s == "Mountain Ridges" && d == "plates"));
    }

    #[test]
    fn test_invalid_config_rejected_before_any_draw() {
        let mut state = TerrainState::new(TerrainConfig {
            sea_level: 0.0,
            ..small_config()
        });
        let mut rng = RandomSource::new(1);
        let err = Pipeline::terrain().run(&mut state, &mut rng).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::SeaLevelOutOfRange(_))));
        assert_eq!(rng.state().advances, 0);
    }

    #[test]
    fn test_base_elevation_values() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(PlateStage).add_stage(BaseElevationStage);
        let mut state = TerrainState::new(small_config());
        pipeline.run(&mut state, &mut RandomSource::new(9)).unwrap();

        let plate_map = state.plate_map.as_ref().unwrap();
        for (i, &e) in state.elevation.as_slice().iter().enumerate() {
            let plate = &state.plates[plate_map.as_slice()[i] as usize];
            assert_eq!(e, plate.crust_type.base_elevation());
        }
    }

    #[test]
    fn test_draw_order() {
        // Plates, then two noise seeds, then the ridge seed, then particles.
        let config = small_config();
        let mut state = TerrainState::new(config.clone());
        let mut rng = RandomSource::new(5);
        Pipeline::terrain().run(&mut state, &mut rng).unwrap();

        let mut replay = RandomSource::new(5);
        generate_plates(&mut replay, config.num_plates, config.width, config.height);
        replay.next_u64();
        replay.next_u64();
        replay.next_u64();
        for _ in 0..config.erosion_iterations * 2 {
            replay.next_float();
        }
        assert_eq!(rng.state(), replay.state());
    }
}
