//! World and generator descriptors.

use glam::{UVec2, UVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::climate::ClimateConfig;
use crate::tectonics::TectonicConfig;

/// Errors raised while parsing generator arguments.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Generator arguments are empty")]
    Empty,
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing descriptor fields: {0:?}")]
    MissingFields(Vec<&'static str>),
}

/// Host-side description of a world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDescriptors {
    size: UVec3,
    region_size: UVec3,
    chunk_size: UVec3,
    /// Opaque generator configuration, JSON for the equirectangular generator.
    generator_args: String,
}

impl WorldDescriptors {
    pub fn new(size: UVec3, region_size: UVec3, chunk_size: UVec3) -> Self {
        Self {
            size,
            region_size,
            chunk_size,
            generator_args: String::new(),
        }
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    pub fn set_size(&mut self, size: UVec3) {
        self.size = size;
    }

    pub fn region_size(&self) -> UVec3 {
        self.region_size
    }

    pub fn set_region_size(&mut self, size: UVec3) {
        self.region_size = size;
    }

    pub fn chunk_size(&self) -> UVec3 {
        self.chunk_size
    }

    pub fn set_chunk_size(&mut self, size: UVec3) {
        self.chunk_size = size;
    }

    pub fn generator_args(&self) -> &str {
        &self.generator_args
    }

    pub fn set_generator_args(&mut self, args: impl Into<String>) {
        self.generator_args = args.into();
    }
}

/// Persisted subset of [`EquiRectDescriptors`].
///
/// Every field is optional so that missing entries can be reported by name
/// while the present ones are still applied.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDescriptors {
    noise_scale: Option<f32>,
    continent_frequency: Option<f32>,
    continent_octaves: Option<u32>,
    continent_lacunarity: Option<f32>,
    sea_level: Option<f32>,
    continental_shelf: Option<f32>,
}

/// Configuration of the equirectangular generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquiRectDescriptors {
    pub seed: u32,

    pub noise_scale: f32,
    pub continent_frequency: f32,
    pub continent_octaves: u32,
    pub continent_lacunarity: f32,

    pub sea_level: f32,
    pub continental_shelf: f32,

    // Configuration only; the plate count is whatever the plate noise yields.
    pub plate_count: u32,
    pub plate_count_min: u32,
    pub plate_count_max: u32,

    pub plate_frequency: f32,
    pub plate_octaves: u32,
    pub plate_lacunarity: f32,

    /// Influence grid dimensions in cells.
    pub influence_size: UVec2,
    /// World units covered by one influence cell.
    pub influence_grid_size: UVec2,

    pub tectonics: TectonicConfig,
    pub climate: ClimateConfig,
}

impl Default for EquiRectDescriptors {
    fn default() -> Self {
        Self {
            seed: 1,
            noise_scale: 0.001,

            continent_frequency: 0.005,
            continent_octaves: 2,
            continent_lacunarity: 2.2,

            sea_level: 0.0,
            continental_shelf: 0.05,

            plate_count: 16,
            plate_count_min: 8,
            plate_count_max: 24,

            plate_frequency: 0.00025,
            plate_octaves: 3,
            plate_lacunarity: 2.0,

            influence_size: UVec2::new(4096, 4096),
            influence_grid_size: UVec2::new(4096, 4096),

            tectonics: TectonicConfig::default(),
            climate: ClimateConfig::default(),
        }
    }
}

impl EquiRectDescriptors {
    pub fn plate_seed(&self) -> u32 {
        self.seed.wrapping_add(2)
    }

    pub fn continent_seed(&self) -> u32 {
        self.seed
    }

    pub fn weather_seed(&self) -> u32 {
        self.plate_seed().wrapping_add(10)
    }

    pub fn wind_north_south_seed(&self) -> u32 {
        self.plate_seed().wrapping_add(3)
    }

    pub fn wind_east_west_seed(&self) -> u32 {
        self.plate_seed().wrapping_add(4)
    }

    /// Applies the persisted fields found in `json`.
    ///
    /// Fields that are present are applied even when others are missing; the
    /// missing ones are reported in [`DescriptorError::MissingFields`].
    pub fn load(&mut self, json: &str) -> Result<(), DescriptorError> {
        if json.trim().is_empty() {
            return Err(DescriptorError::Empty);
        }

        let persisted: PersistedDescriptors = serde_json::from_str(json)?;
        let mut missing = Vec::new();

        apply(persisted.noise_scale, &mut self.noise_scale, "noiseScale", &mut missing);
        apply(persisted.continent_frequency, &mut self.continent_frequency, "continentFrequency", &mut missing);
        apply(persisted.continent_octaves, &mut self.continent_octaves, "continentOctaves", &mut missing);
        apply(persisted.continent_lacunarity, &mut self.continent_lacunarity, "continentLacunarity", &mut missing);
        apply(persisted.sea_level, &mut self.sea_level, "seaLevel", &mut missing);
        apply(persisted.continental_shelf, &mut self.continental_shelf, "continentalShelf", &mut missing);

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DescriptorError::MissingFields(missing))
        }
    }

    /// Serializes the persisted fields as a JSON object.
    pub fn save(&self) -> Result<String, DescriptorError> {
        let persisted = PersistedDescriptors {
            noise_scale: Some(self.noise_scale),
            continent_frequency: Some(self.continent_frequency),
            continent_octaves: Some(self.continent_octaves),
            continent_lacunarity: Some(self.continent_lacunarity),
            sea_level: Some(self.sea_level),
            continental_shelf: Some(self.continental_shelf),
        };
        Ok(serde_json::to_string(&persisted)?)
    }

    /// Sizes the influence grid to cover the world and derives the plate and
    /// continent frequencies from it.
    pub fn calculate_influence_size(&mut self, world: &WorldDescriptors) {
        let grid = self.influence_grid_size.max(UVec2::ONE);
        let size = world.size();

        self.influence_size = UVec2::new(size.x.div_ceil(grid.x), size.y.div_ceil(grid.y)).max(UVec2::ONE);
        self.plate_frequency = 2.56 / self.influence_size.x as f32;
        self.continent_frequency = 10.0 * self.plate_frequency;
    }

    pub fn cell_count(&self) -> usize {
        (self.influence_size.x * self.influence_size.y) as usize
    }
}

fn apply<T>(value: Option<T>, target: &mut T, name: &'static str, missing: &mut Vec<&'static str>) {
    match value {
        Some(value) => *target = value,
        None => missing.push(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_string_keeps_defaults() {
        let mut descriptors = EquiRectDescriptors::default();
        let result = descriptors.load("");
        assert!(matches!(result, Err(DescriptorError::Empty)));
        assert_eq!(descriptors.noise_scale, 0.001);
        assert_eq!(descriptors.plate_count, 16);
    }

    #[test]
    fn test_malformed_json_fails() {
        let mut descriptors = EquiRectDescriptors::default();
        assert!(matches!(descriptors.load("{not json"), Err(DescriptorError::Parse(_))));
        assert_eq!(descriptors.continent_octaves, 2);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut source = EquiRectDescriptors::default();
        source.noise_scale = 0.002;
        source.continent_octaves = 5;
        source.sea_level = 0.1;
        let json = source.save().unwrap();
        assert!(json.contains("\"noiseScale\""));
        assert!(json.contains("\"continentalShelf\""));

        let mut target = EquiRectDescriptors::default();
        target.load(&json).unwrap();
        assert_eq!(target.noise_scale, 0.002);
        assert_eq!(target.continent_octaves, 5);
        assert_eq!(target.sea_level, 0.1);
    }

    #[test]
    fn test_missing_field_reported_but_present_applied() {
        let mut descriptors = EquiRectDescriptors::default();
        let result = descriptors.load(r#"{"noiseScale": 0.5, "seaLevel": 0.25}"#);
        match result {
            Err(DescriptorError::MissingFields(fields)) => {
                assert_eq!(fields.len(), 4);
                assert!(fields.contains(&"continentalShelf"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(descriptors.noise_scale, 0.5);
        assert_eq!(descriptors.sea_level, 0.25);
    }

    #[test]
    fn test_influence_size_rounds_up() {
        let world = WorldDescriptors::new(UVec3::new(10_000, 4096, 256), UVec3::splat(256), UVec3::splat(64));
        let mut descriptors = EquiRectDescriptors::default();
        descriptors.calculate_influence_size(&world);

        assert_eq!(descriptors.influence_size, UVec2::new(3, 1));
        assert_relative_eq!(descriptors.plate_frequency, 2.56 / 3.0);
        assert_relative_eq!(descriptors.continent_frequency, 25.6 / 3.0);
    }

    #[test]
    fn test_influence_size_at_least_one() {
        let world = WorldDescriptors::new(UVec3::ZERO, UVec3::ZERO, UVec3::ZERO);
        let mut descriptors = EquiRectDescriptors::default();
        descriptors.calculate_influence_size(&world);
        assert_eq!(descriptors.influence_size, UVec2::ONE);
    }

    #[test]
    fn test_derived_seeds() {
        let descriptors = EquiRectDescriptors { seed: 7, ..Default::default() };
        assert_eq!(descriptors.plate_seed(), 9);
        assert_eq!(descriptors.continent_seed(), 7);
        assert_eq!(descriptors.weather_seed(), 19);
        assert_eq!(descriptors.wind_north_south_seed(), 12);
        assert_eq!(descriptors.wind_east_west_seed(), 13);
    }
}
