//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that are composed, in random-draw order, into the terrain pipeline.

mod stage;

pub use stage::{
    BaseElevationStage, ContinentalNoiseStage, ErosionStage, GenerationStage, Pipeline,
    PipelineError, PlateStage, RidgeStage, SeaLevelStage, StageId, TerrainState,
};
