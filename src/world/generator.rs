//! The equirectangular world generator.

use std::path::Path;

use glam::{UVec2, Vec2};
use tracing::{debug, info, warn};

use super::descriptors::{EquiRectDescriptors, WorldDescriptors};
use super::progress::ProgressSink;
use crate::climate::PerturbedWeatherBands;
use crate::export::{
    load_normalize, load_overview, save_normalize, save_overview, OverviewError,
    NORMALIZE_FILE_NAME, OVERVIEW_FILE_NAME,
};
use crate::influence::{InfluenceCell, InfluenceMap, NeighborMap};
use crate::noise::NoisePipeline;
use crate::pipeline::{OverviewContext, Pipeline, PipelineError, WeatherStage};
use crate::tectonics::PlateInfo;

/// Generates, persists and samples the influence grid of one world.
#[derive(Debug, Clone)]
pub struct EquiRectWorldGenerator {
    world: WorldDescriptors,
    descriptors: EquiRectDescriptors,
    noise: NoisePipeline,
    map: InfluenceMap,
    neighbors: NeighborMap,
    plates: Vec<PlateInfo>,
    weather: Option<PerturbedWeatherBands>,
}

impl Default for EquiRectWorldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EquiRectWorldGenerator {
    pub const TYPE_NAME: &'static str = "EquiRectWorldGenerator";

    pub fn new() -> Self {
        let descriptors = EquiRectDescriptors::default();
        let noise = NoisePipeline::new(descriptors.plate_frequency, descriptors.continent_frequency);
        Self {
            world: WorldDescriptors::default(),
            descriptors,
            noise,
            map: InfluenceMap::default(),
            neighbors: NeighborMap::default(),
            plates: Vec::new(),
            weather: None,
        }
    }

    /// Adopts `world` and its generator arguments.
    ///
    /// When the arguments do not parse, the influence size is derived from
    /// the world and the descriptor JSON is written back into the stored
    /// world's generator arguments.
    pub fn initialize(&mut self, world: &WorldDescriptors) {
        self.world = world.clone();

        if let Err(err) = self.descriptors.load(self.world.generator_args()) {
            debug!(error = %err, "using default descriptors");
            self.descriptors.calculate_influence_size(&self.world);
            match self.descriptors.save() {
                Ok(json) => self.world.set_generator_args(json),
                Err(err) => warn!(error = %err, "failed to serialize descriptors"),
            }
        }

        self.descriptors.calculate_influence_size(&self.world);
        self.noise = NoisePipeline::new(self.descriptors.plate_frequency, self.descriptors.continent_frequency);
        info!(
            width = self.descriptors.influence_size.x,
            height = self.descriptors.influence_size.y,
            seed = self.descriptors.seed,
            "initialized generator"
        );
    }

    /// Initializes from `world` and generates everything from noise.
    pub fn create(&mut self, world: &WorldDescriptors, progress: &dyn ProgressSink) -> Result<(), PipelineError> {
        self.initialize(world);
        self.generate_world_overview(progress)?;

        progress.update("Normalize neighbors", 80, false);
        self.update_influence_neighbors();

        progress.update("Generating complete", 90, true);
        Ok(())
    }

    /// Loads a saved world from `dir`, regenerating whatever is missing or invalid.
    ///
    /// Returns `Ok(true)` only when both files were read. A rebuilt neighbor
    /// table is written back to `dir`.
    pub fn load(
        &mut self,
        world: &WorldDescriptors,
        dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<bool, PipelineError> {
        self.initialize(world);

        let overview_path = dir.join(OVERVIEW_FILE_NAME);
        let loaded = load_overview(&overview_path).and_then(|map| {
            if map.size() == self.descriptors.influence_size {
                Ok(map)
            } else {
                Err(OverviewError::SizeMismatch {
                    expected: self.descriptors.cell_count() as u64,
                    found: map.len() as u64,
                })
            }
        });

        let map = match loaded {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %overview_path.display(), error = %err, "regenerating world overview");
                self.generate_world_overview(progress)?;
                self.update_influence_neighbors();
                progress.update("Generating complete", 90, true);
                return Ok(false);
            }
        };
        self.map = map;
        self.plates.clear();
        self.rebuild_weather(progress)?;

        progress.update("Normalize neighbors", 80, false);
        let normalize_path = dir.join(NORMALIZE_FILE_NAME);
        match load_normalize(&normalize_path, Some(self.map.len())) {
            Ok(table) => self.neighbors = table,
            Err(err) => {
                warn!(path = %normalize_path.display(), error = %err, "rebuilding neighbor table");
                self.update_influence_neighbors();
                if let Err(err) = save_normalize(&self.neighbors, &normalize_path) {
                    warn!(error = %err, "failed to write neighbor table");
                }
                progress.update("Generating complete", 90, true);
                return Ok(false);
            }
        }

        progress.update("Generating complete", 90, true);
        Ok(true)
    }

    /// Writes `overview.bin` and `normalize.bin` into `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), OverviewError> {
        std::fs::create_dir_all(dir)?;
        save_overview(&self.map, &dir.join(OVERVIEW_FILE_NAME))?;
        save_normalize(&self.neighbors, &dir.join(NORMALIZE_FILE_NAME))?;
        info!(dir = %dir.display(), cells = self.map.len(), "saved world");
        Ok(())
    }

    /// Runs the full overview pipeline and adopts its products.
    pub fn generate_world_overview(&mut self, progress: &dyn ProgressSink) -> Result<(), PipelineError> {
        let mut ctx = OverviewContext::new(&self.descriptors, &self.noise, progress);
        Pipeline::overview().run(&mut ctx)?;
        let output = ctx.finish()?;

        self.map = output.map;
        self.plates = output.plates;
        self.weather = Some(output.weather);
        Ok(())
    }

    /// Rebuilds the neighbor table from the current heights.
    pub fn update_influence_neighbors(&mut self) {
        self.neighbors = NeighborMap::from_influence(&self.map);
    }

    fn rebuild_weather(&mut self, progress: &dyn ProgressSink) -> Result<(), PipelineError> {
        let mut ctx = OverviewContext::new(&self.descriptors, &self.noise, progress);
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(WeatherStage);
        pipeline.run(&mut ctx)?;
        self.weather = ctx.weather.take();
        Ok(())
    }

    /// Influence cell and in-cell offset of a world position.
    fn locate(&self, position: Vec2) -> (usize, Vec2) {
        let grid = self.descriptors.influence_grid_size.max(UVec2::ONE).as_vec2();
        let size = self.map.size();
        let cell = (position / grid)
            .floor()
            .as_uvec2()
            .min(size.saturating_sub(UVec2::ONE));
        let offset = ((position - cell.as_vec2() * grid) / grid).clamp(Vec2::ZERO, Vec2::ONE);
        (self.map.index(cell.x, cell.y), offset)
    }

    /// Surface height at a world position, in world units.
    ///
    /// # Panics
    /// If no neighbor table has been built or loaded.
    pub fn base_height(&self, position: Vec2) -> i32 {
        let (index, offset) = self.locate(position);
        let height = self.neighbors.sample(index, offset);
        (height * self.world.size().z as f32) as i32
    }

    pub fn world(&self) -> &WorldDescriptors {
        &self.world
    }

    pub fn descriptors(&self) -> &EquiRectDescriptors {
        &self.descriptors
    }

    pub fn descriptors_mut(&mut self) -> &mut EquiRectDescriptors {
        &mut self.descriptors
    }

    pub fn influence_map(&self) -> &InfluenceMap {
        &self.map
    }

    pub fn influence_size(&self) -> UVec2 {
        self.descriptors.influence_size
    }

    pub fn neighbors(&self) -> &NeighborMap {
        &self.neighbors
    }

    pub fn cell(&self, x: u32, y: u32) -> &InfluenceCell {
        self.map.get(x, y)
    }

    pub fn cell_at_position(&self, position: Vec2) -> &InfluenceCell {
        let (index, _) = self.locate(position);
        &self.map.cells()[index]
    }

    /// Plate table of the last generation; empty after loading from disk.
    pub fn plates(&self) -> &[PlateInfo] {
        &self.plates
    }

    pub fn plate_count(&self) -> usize {
        self.map.plate_count()
    }

    pub fn weather(&self) -> Option<&PerturbedWeatherBands> {
        self.weather.as_ref()
    }
}
