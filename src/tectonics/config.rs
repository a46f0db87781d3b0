//! Configuration for plate assignment and height composition.

use serde::{Deserialize, Serialize};

/// Numeric constants of the plate model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TectonicConfig {
    /// Plate heights below this are oceanic; composed heights above it are land.
    pub ocean_threshold: f32,
    /// Plate height per unit of plate identity value.
    pub plate_height_scale: f32,
    /// Extra depth applied to oceanic plates.
    pub ocean_height_offset: f32,
    /// Scale applied to the centroid approach distance.
    pub collision_scale: f32,
    /// Upper clamp for collision magnitudes.
    pub max_collision: f32,
    /// Blend midpoint for ocean/continent boundaries.
    pub mixed_boundary_midpoint: f32,
    /// Blend midpoint for same-type boundaries.
    pub boundary_midpoint: f32,
    /// Amplitude of the elevation noise added to the own plate height.
    pub elevation_noise_scale: f32,
    /// Amplitude of the terrain-scale noise.
    pub terrain_noise_scale: f32,
    /// Floor of the terrain-scale noise multiplier.
    pub terrain_noise_base: f32,
}

impl Default for TectonicConfig {
    fn default() -> Self {
        Self {
            ocean_threshold: 0.5,
            plate_height_scale: 0.1,
            ocean_height_offset: 0.05,
            collision_scale: 0.5 / std::f32::consts::SQRT_2,
            max_collision: 1.0,
            mixed_boundary_midpoint: 0.7,
            boundary_midpoint: 0.5,
            elevation_noise_scale: 0.05,
            terrain_noise_scale: 0.2,
            terrain_noise_base: 0.2,
        }
    }
}

impl TectonicConfig {
    /// Pseudo-elevation of a plate from its identity value.
    pub fn plate_height(&self, value: f32) -> f32 {
        let height = value * self.plate_height_scale + 0.5;
        if height < self.ocean_threshold {
            height - self.ocean_height_offset
        } else {
            height
        }
    }

    /// Whether a plate or cell height counts as ocean.
    pub fn is_ocean(&self, height: f32) -> bool {
        height < self.ocean_threshold
    }

    /// Curve midpoint for a boundary between the two plate classes.
    pub fn curve_midpoint(&self, own_ocean: bool, border_ocean: bool) -> f32 {
        if own_ocean != border_ocean {
            self.mixed_boundary_midpoint
        } else {
            self.boundary_midpoint
        }
    }

    /// Elevation noise contribution for a raw noise sample in `[-1, 1]`.
    pub fn elevation_noise(&self, sample: f32) -> f32 {
        (sample + 1.0) * self.elevation_noise_scale
    }

    /// Terrain-scale multiplier for a raw noise sample in `[-1, 1]`.
    pub fn terrain_noise(&self, sample: f32) -> f32 {
        (sample + 1.0) * self.terrain_noise_scale + self.terrain_noise_base
    }
}
