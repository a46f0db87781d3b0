//! Pipeline module for orchestrating world-overview generation.
//!
//! Each stage fills its products into a shared [`OverviewContext`]; the
//! pipeline checks stage dependencies and times every stage.

mod stage;

pub use stage::{
    CompositionStage, CoordinatesStage, MoistureStage, NoiseFieldStage, OverviewContext,
    OverviewOutput, OverviewStage, Pipeline, PipelineError, PlateStage, StageId, WeatherStage,
};
