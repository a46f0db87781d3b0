//! Plate records discovered from the plate identity field.

use glam::{UVec2, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{grid_to_lat_lon, lat_lon_to_unit, rotate_tangent_to_point};

/// A plate discovered on the influence grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateInfo {
    /// Identity value from the plate clustering field.
    pub value: f32,
    /// Representative grid point (the cell closest to the plate's feature point).
    pub point: UVec2,
    /// `point` projected onto the unit sphere.
    pub point3d: Vec3,
    /// Pseudo-elevation; below the ocean threshold the plate is oceanic.
    pub height: f32,
    /// Unit drift direction in the north pole tangent plane.
    pub drift: Vec2,
    /// `drift` rotated into the tangent plane at `point3d`.
    pub direction: Vec3,
    /// Adjacent plate indices, ascending.
    pub neighbors: Vec<usize>,
    /// Collision magnitude per entry of `neighbors`.
    pub collisions: Vec<f32>,
    /// Grid points belonging to this plate.
    pub points: Vec<UVec2>,
}

impl PlateInfo {
    /// Creates a plate at `point` with a random drift direction.
    ///
    /// # Arguments
    /// * `value` - Plate identity value
    /// * `point` - Representative grid point
    /// * `size` - Influence grid size
    /// * `height` - Plate pseudo-elevation
    /// * `rng` - Drift source; plates draw in index order
    pub fn new<R: Rng + ?Sized>(value: f32, point: UVec2, size: UVec2, height: f32, rng: &mut R) -> Self {
        let drift = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
            .try_normalize()
            .unwrap_or(Vec2::X);
        let point3d = lat_lon_to_unit(grid_to_lat_lon(point.x, point.y, size));

        Self {
            value,
            point,
            point3d,
            height,
            drift,
            direction: rotate_tangent_to_point(drift, point3d),
            neighbors: Vec::new(),
            collisions: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Collision magnitude against `other`, if the plates are adjacent.
    pub fn collision_with(&self, other: usize) -> Option<f32> {
        self.neighbors
            .binary_search(&other)
            .ok()
            .map(|i| self.collisions[i])
    }

    pub fn area(&self) -> usize {
        self.points.len()
    }
}
