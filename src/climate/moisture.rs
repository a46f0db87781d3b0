//! Wind-driven moisture diffusion over the influence grid.

use std::f32::consts::FRAC_PI_4;

use glam::{UVec2, Vec2};

use super::ClimateConfig;
use crate::geometry::neighbors::offset_cell;

/// Grid offsets for the eight wind octants, counter-clockwise from east.
///
/// North is `-y` because row 0 is the north pole.
const OCTANT_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Per-cell inputs of the diffusion pass, row-major.
#[derive(Debug, Clone, Copy)]
pub struct MoistureInputs<'a> {
    /// Seed moisture from composition.
    pub seed: &'a [f32],
    /// Moisture capacity.
    pub capacity: &'a [f32],
    /// Prevailing wind `(east, north)`.
    pub air: &'a [Vec2],
    /// Composed height; cells above the land threshold deplete.
    pub height: &'a [f32],
}

/// Spreads `amount` into the downwind neighbors of `(x, y)`.
///
/// The wind is quantized to the nearest of eight directions; the principal
/// neighbor and its two 45° siblings receive `amount * weights[1]` and
/// `amount * weights[0|2]` (clockwise sibling first). Columns wrap; deposits
/// past a pole are dropped.
pub fn fill_points(
    x: u32,
    y: u32,
    wind: Vec2,
    field: &mut [f32],
    size: UVec2,
    amount: f32,
    weights: [f32; 3],
) {
    if amount <= 0.0 || wind.length_squared() < 1e-12 {
        return;
    }

    let octant = (wind.y.atan2(wind.x) / FRAC_PI_4).round() as i32;
    for (step, weight) in (-1..=1).zip(weights) {
        let (dx, dy) = OCTANT_OFFSETS[(octant + step).rem_euclid(8) as usize];
        if let Some((nx, ny)) = offset_cell(x, y, dx, dy, size) {
            field[(ny * size.x + nx) as usize] += amount * weight;
        }
    }
}

/// Runs the fixed-sweep moisture diffusion and returns final moisture per cell.
///
/// Ocean cells start with a full budget of 1 and never deplete; land starts
/// empty. Each row-major sweep moves `budget * capacity * |wind|` downwind
/// from every cell with budget left, subtracting it from land cells. The
/// result is `clamp(seed + budget, 0, 1)`.
///
/// # Panics
/// If any input length differs from the cell count.
pub fn diffuse_moisture(size: UVec2, inputs: MoistureInputs<'_>, cfg: &ClimateConfig) -> Vec<f32> {
    let cell_count = (size.x * size.y) as usize;
    assert_eq!(inputs.seed.len(), cell_count, "seed moisture size");
    assert_eq!(inputs.capacity.len(), cell_count, "capacity size");
    assert_eq!(inputs.air.len(), cell_count, "air size");
    assert_eq!(inputs.height.len(), cell_count, "height size");

    let mut budget: Vec<f32> = inputs
        .height
        .iter()
        .map(|&h| if cfg.is_land(h) { 0.0 } else { 1.0 })
        .collect();

    for _ in 0..cfg.iterations {
        for y in 0..size.y {
            for x in 0..size.x {
                let i = (y * size.x + x) as usize;
                if budget[i] <= 0.0 {
                    continue;
                }

                let air = inputs.air[i];
                let captured = budget[i] * inputs.capacity[i] * air.length();
                if cfg.is_land(inputs.height[i]) {
                    budget[i] -= captured;
                }
                fill_points(x, y, air, &mut budget, size, captured, cfg.spread_weights);
            }
        }
    }

    inputs
        .seed
        .iter()
        .zip(&budget)
        .map(|(seed, residual)| (seed + residual).clamp(0.0, 1.0))
        .collect()
}
