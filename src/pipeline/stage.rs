//! Overview generation stages and pipeline orchestration.

use std::collections::HashMap;
use std::time::Instant;

use glam::{UVec2, Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::climate::{diffuse_moisture, MoistureInputs, PerturbedWeatherBands, WeatherBands};
use crate::geometry::spherical_positions;
use crate::influence::{compose_cells, Composition, CompositionFields, InfluenceMap};
use crate::noise::{NoiseField, NoisePipeline};
use crate::tectonics::{assign_plates, PlateAssignment, PlateFields, PlateInfo};
use crate::world::{EquiRectDescriptors, ProgressSink};

/// Unique identifier for overview stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Perturbed weather band tables.
    Weather,
    /// Spherical sample positions of the influence grid.
    Coordinates,
    /// Every per-cell noise field.
    NoiseFields,
    /// Plate assignment and collisions.
    Plates,
    /// Height, climate and wind per cell.
    Composition,
    /// Moisture diffusion.
    Moisture,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Weather => "weather",
            StageId::Coordinates => "coordinates",
            StageId::NoiseFields => "noise fields",
            StageId::Plates => "plates",
            StageId::Composition => "composition",
            StageId::Moisture => "moisture",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Stage '{0}' found no {1}")]
    MissingOutput(String, String),
}

/// Working state shared by the stages of one overview run.
pub struct OverviewContext<'a> {
    pub descriptors: &'a EquiRectDescriptors,
    pub noise: &'a NoisePipeline,
    progress: &'a dyn ProgressSink,

    pub weather: Option<PerturbedWeatherBands>,
    pub positions: Vec<Vec3>,
    pub fields: HashMap<NoiseField, Vec<f32>>,
    pub plates: Option<PlateAssignment>,
    pub composition: Option<Composition>,
    pub map: Option<InfluenceMap>,
}

/// Products of a full overview run.
#[derive(Debug, Clone)]
pub struct OverviewOutput {
    pub map: InfluenceMap,
    pub plates: Vec<PlateInfo>,
    pub weather: PerturbedWeatherBands,
}

impl<'a> OverviewContext<'a> {
    pub fn new(
        descriptors: &'a EquiRectDescriptors,
        noise: &'a NoisePipeline,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            descriptors,
            noise,
            progress,
            weather: None,
            positions: Vec::new(),
            fields: HashMap::new(),
            plates: None,
            composition: None,
            map: None,
        }
    }

    pub fn size(&self) -> UVec2 {
        self.descriptors.influence_size
    }

    pub fn report(&self, status: &str, percent: u8) {
        self.progress.update(status, percent, false);
    }

    fn field(&self, stage: StageId, field: NoiseField) -> Result<&[f32], PipelineError> {
        self.fields
            .get(&field)
            .map(Vec::as_slice)
            .ok_or_else(|| missing(stage, field.name()))
    }

    fn sample(&mut self, field: NoiseField, seed: u32) {
        let values = self.noise.generate(field, &self.positions, seed);
        debug!(field = field.name(), seed, "sampled noise field");
        self.fields.insert(field, values);
    }

    /// Takes the finished products out of the context.
    pub fn finish(self) -> Result<OverviewOutput, PipelineError> {
        let map = self.map.ok_or_else(|| missing(StageId::Moisture, "influence map"))?;
        let weather = self.weather.ok_or_else(|| missing(StageId::Weather, "weather bands"))?;
        let plates = self.plates.map(|p| p.plates).unwrap_or_default();
        Ok(OverviewOutput { map, plates, weather })
    }
}

fn missing(stage: StageId, what: &str) -> PipelineError {
    PipelineError::MissingOutput(stage.name().to_string(), what.to_string())
}

/// One step of overview generation.
pub trait OverviewStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, filling its products into `ctx`.
    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError>;
}

/// Runs overview stages in order.
pub struct Pipeline {
    stages: Vec<Box<dyn OverviewStage>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The full world-overview sequence.
    pub fn overview() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(WeatherStage)
            .add_stage(CoordinatesStage)
            .add_stage(NoiseFieldStage)
            .add_stage(PlateStage)
            .add_stage(CompositionStage)
            .add_stage(MoistureStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: OverviewStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order.
    pub fn run(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        let mut completed: Vec<StageId> = Vec::new();

        for stage in &self.stages {
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let start = Instant::now();
            stage.execute(ctx)?;
            info!(stage = stage.name(), elapsed = ?start.elapsed(), "stage complete");
            completed.push(stage.id());
        }

        Ok(())
    }
}

/// Builds the per-column perturbed weather tables.
pub struct WeatherStage;

impl OverviewStage for WeatherStage {
    fn id(&self) -> StageId {
        StageId::Weather
    }

    fn name(&self) -> &str {
        "Weather Bands"
    }

    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        ctx.report("Generating weather bands", 0);

        let climate = &ctx.descriptors.climate;
        let base = WeatherBands::new(climate);
        let weather = PerturbedWeatherBands::new(
            &base,
            ctx.size(),
            ctx.noise.node(NoiseField::WeatherFront),
            ctx.descriptors.weather_seed(),
            climate,
        );
        ctx.weather = Some(weather);
        Ok(())
    }
}

/// Projects every grid cell onto a sphere of radius `width / 2`.
pub struct CoordinatesStage;

impl OverviewStage for CoordinatesStage {
    fn id(&self) -> StageId {
        StageId::Coordinates
    }

    fn name(&self) -> &str {
        "Coordinates"
    }

    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        ctx.report("Allocating resources", 5);
        let size = ctx.size();
        ctx.fields.clear();

        ctx.report("Generating coordinates", 10);
        ctx.positions = spherical_positions(size, size.x as f32 * 0.5);
        Ok(())
    }
}

/// Evaluates every noise field over the sample positions.
pub struct NoiseFieldStage;

impl OverviewStage for NoiseFieldStage {
    fn id(&self) -> StageId {
        StageId::NoiseFields
    }

    fn name(&self) -> &str {
        "Noise Fields"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Coordinates]
    }

    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        let descriptors = ctx.descriptors;
        let plate_seed = descriptors.plate_seed();

        ctx.report("Generating heightmap", 15);
        ctx.sample(NoiseField::Elevation, plate_seed);

        ctx.report("Generating terrain", 20);
        ctx.sample(NoiseField::TerrainScale, plate_seed);

        ctx.report("Generating air currents", 25);
        ctx.sample(NoiseField::WindNorthSouth, descriptors.wind_north_south_seed());
        ctx.sample(NoiseField::WindEastWest, descriptors.wind_east_west_seed());

        ctx.report("Generating tectonic plates", 30);
        ctx.sample(NoiseField::PlateId, plate_seed);

        ctx.report("Generating tectonic plates", 35);
        ctx.sample(NoiseField::PlateBorderId, plate_seed);
        ctx.sample(NoiseField::PlateDistance, plate_seed);

        ctx.report("Generating continents", 45);
        ctx.sample(NoiseField::ContinentId, descriptors.continent_seed());
        Ok(())
    }
}

/// Clusters cells into plates and resolves plate collisions.
pub struct PlateStage;

impl OverviewStage for PlateStage {
    fn id(&self) -> StageId {
        StageId::Plates
    }

    fn name(&self) -> &str {
        "Plates"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::NoiseFields]
    }

    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        ctx.report("Generating height map", 50);

        let fields = PlateFields {
            plate: ctx.field(self.id(), NoiseField::PlateId)?,
            border: ctx.field(self.id(), NoiseField::PlateBorderId)?,
            distance: ctx.field(self.id(), NoiseField::PlateDistance)?,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(ctx.descriptors.seed as u64);
        let assignment = assign_plates(ctx.size(), fields, &ctx.descriptors.tectonics, &mut rng);

        if assignment.plate_count() == 0 {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                "no plates discovered".to_string(),
            ));
        }
        info!(
            plates = assignment.plate_count(),
            configured = ctx.descriptors.plate_count,
            "discovered plates"
        );

        ctx.plates = Some(assignment);
        Ok(())
    }
}

/// Composes plate, weather and noise fields into influence cells.
pub struct CompositionStage;

impl OverviewStage for CompositionStage {
    fn id(&self) -> StageId {
        StageId::Composition
    }

    fn name(&self) -> &str {
        "Composition"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Weather, StageId::Plates]
    }

    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        ctx.report("Generating tectonic zones", 55);
        let plates = ctx.plates.as_ref().ok_or_else(|| missing(self.id(), "plates"))?;
        let weather = ctx.weather.as_ref().ok_or_else(|| missing(self.id(), "weather bands"))?;

        ctx.report("Generating influence map", 60);
        let fields = CompositionFields {
            elevation: ctx.field(self.id(), NoiseField::Elevation)?,
            terrain_scale: ctx.field(self.id(), NoiseField::TerrainScale)?,
            wind_north_south: ctx.field(self.id(), NoiseField::WindNorthSouth)?,
            wind_east_west: ctx.field(self.id(), NoiseField::WindEastWest)?,
            continent: ctx.field(self.id(), NoiseField::ContinentId)?,
        };
        let composition = compose_cells(
            ctx.size(),
            plates,
            fields,
            weather,
            &ctx.descriptors.tectonics,
            &ctx.descriptors.climate,
        );

        ctx.composition = Some(composition);
        Ok(())
    }
}

/// Diffuses moisture downwind and produces the final influence map.
pub struct MoistureStage;

impl OverviewStage for MoistureStage {
    fn id(&self) -> StageId {
        StageId::Moisture
    }

    fn name(&self) -> &str {
        "Moisture"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Composition]
    }

    fn execute(&self, ctx: &mut OverviewContext<'_>) -> Result<(), PipelineError> {
        ctx.report("Generating moisture", 70);
        let Composition { mut cells, moisture_seed } = ctx
            .composition
            .take()
            .ok_or_else(|| missing(self.id(), "composed cells"))?;

        let capacity: Vec<f32> = cells.iter().map(|c| c.moisture_capacity).collect();
        let air: Vec<Vec2> = cells.iter().map(|c| c.air_direction).collect();
        let height: Vec<f32> = cells.iter().map(|c| c.height_base).collect();

        let moisture = diffuse_moisture(
            ctx.size(),
            MoistureInputs {
                seed: &moisture_seed,
                capacity: &capacity,
                air: &air,
                height: &height,
            },
            &ctx.descriptors.climate,
        );
        for (cell, value) in cells.iter_mut().zip(moisture) {
            cell.moisture = value;
        }

        ctx.map = Some(InfluenceMap::new(ctx.size(), cells));
        Ok(())
    }
}
