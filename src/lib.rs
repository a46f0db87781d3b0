//! Equirectangular influence-map generator.
//!
//! This crate derives a planet-scale grid of plate membership, elevation,
//! temperature, moisture and prevailing wind from seeded noise fields, for
//! consumption by a downstream terrain voxelizer.

pub mod geometry;
pub mod noise;
pub mod tectonics;
pub mod climate;
pub mod influence;
pub mod export;
pub mod pipeline;
pub mod world;

pub use geometry::LatLon;
pub use crate::noise::{NoiseField, NoisePipeline};
pub use tectonics::{PlateInfo, TectonicConfig};
pub use climate::{ClimateConfig, PerturbedWeatherBands, WeatherModel};
pub use influence::{InfluenceCell, InfluenceMap, NeighborMap};
pub use export::{Layer, OverviewError, PngExportError};
pub use pipeline::{Pipeline, PipelineError, StageId};
pub use world::{
    DescriptorError, EquiRectDescriptors, EquiRectWorldGenerator, GeneratorKind, Progress,
    ProgressSink, WorldDescriptors, WorldGenerator,
};
