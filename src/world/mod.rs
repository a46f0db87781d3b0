//! World descriptors, progress reporting and the generator front end.

mod descriptors;
mod generator;
mod progress;

use std::path::Path;

use glam::Vec2;

use crate::export::OverviewError;
use crate::pipeline::PipelineError;

pub use descriptors::{DescriptorError, EquiRectDescriptors, WorldDescriptors};
pub use generator::EquiRectWorldGenerator;
pub use progress::{Progress, ProgressSink, ProgressSnapshot};

/// Available generator implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    EquiRect,
}

impl GeneratorKind {
    pub fn all() -> &'static [GeneratorKind] {
        &[GeneratorKind::EquiRect]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::EquiRect => EquiRectWorldGenerator::TYPE_NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.name() == name)
    }
}

/// A generator of any [`GeneratorKind`].
#[derive(Debug, Clone)]
pub enum WorldGenerator {
    EquiRect(EquiRectWorldGenerator),
}

impl WorldGenerator {
    pub fn new(kind: GeneratorKind) -> Self {
        match kind {
            GeneratorKind::EquiRect => WorldGenerator::EquiRect(EquiRectWorldGenerator::new()),
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        match self {
            WorldGenerator::EquiRect(_) => GeneratorKind::EquiRect,
        }
    }

    pub fn create(&mut self, world: &WorldDescriptors, progress: &dyn ProgressSink) -> Result<(), PipelineError> {
        match self {
            WorldGenerator::EquiRect(generator) => generator.create(world, progress),
        }
    }

    pub fn load(
        &mut self,
        world: &WorldDescriptors,
        dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<bool, PipelineError> {
        match self {
            WorldGenerator::EquiRect(generator) => generator.load(world, dir, progress),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), OverviewError> {
        match self {
            WorldGenerator::EquiRect(generator) => generator.save(dir),
        }
    }

    pub fn base_height(&self, position: Vec2) -> i32 {
        match self {
            WorldGenerator::EquiRect(generator) => generator.base_height(position),
        }
    }
}
