//! Jittered-lattice cellular noise with dual-nearest lookups.
//!
//! Each integer lattice cell owns one feature point and one value, both
//! hashed from `(seed, cell)`. Values are 24-bit hash fractions, so a given
//! feature reproduces the exact same `f32` on every evaluation.

use glam::{IVec3, Vec3};

const PRIME_X: u32 = 501_125_321;
const PRIME_Y: u32 = 1_136_930_381;
const PRIME_Z: u32 = 1_720_413_743;

/// Which quantity a cellular evaluation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellularReturn {
    /// Value of the nearest feature point.
    NearestValue,
    /// Value of the second-nearest feature point.
    SecondValue,
    /// Ratio of nearest to second-nearest distance, in `[0, 1]`.
    DistanceRatio,
}

/// Configuration for a cellular source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularConfig {
    /// Feature point displacement within its cell (0 = regular grid, 1 = full cell).
    pub jitter: f32,
    /// Quantity to return.
    pub output: CellularReturn,
}

impl CellularConfig {
    pub fn new(output: CellularReturn) -> Self {
        Self { jitter: 1.0, output }
    }

    /// Samples the cellular field at `p`.
    pub fn sample(&self, p: Vec3, seed: u32) -> f32 {
        let (nearest, second) = nearest_two(p, seed, self.jitter);
        match self.output {
            CellularReturn::NearestValue => nearest.value,
            CellularReturn::SecondValue => second.value,
            CellularReturn::DistanceRatio => {
                if second.distance > 0.0 {
                    (nearest.distance / second.distance).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Feature {
    distance: f32,
    value: f32,
}

impl Feature {
    const FAR: Feature = Feature { distance: f32::MAX, value: 0.0 };
}

fn nearest_two(p: Vec3, seed: u32, jitter: f32) -> (Feature, Feature) {
    let base = p.floor().as_ivec3();
    let mut nearest = Feature::FAR;
    let mut second = Feature::FAR;

    for dz in -1..=1 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = base + IVec3::new(dx, dy, dz);
                let h = hash_cell(seed, cell);
                let offset = Vec3::new(
                    unit_from_hash(mix(h ^ 0x68E3_1DA4)),
                    unit_from_hash(mix(h ^ 0xB529_7A4D)),
                    unit_from_hash(mix(h ^ 0x1B56_C4E9)),
                ) - Vec3::splat(0.5);
                let feature = cell.as_vec3() + Vec3::splat(0.5) + offset * jitter;
                let distance = hybrid_distance(feature - p);
                let value = unit_from_hash(h) * 2.0 - 1.0;

                if distance < nearest.distance {
                    second = nearest;
                    nearest = Feature { distance, value };
                } else if distance < second.distance {
                    second = Feature { distance, value };
                }
            }
        }
    }

    (nearest, second)
}

/// Euclidean squared plus Manhattan distance.
fn hybrid_distance(v: Vec3) -> f32 {
    v.length_squared() + v.abs().element_sum()
}

fn hash_cell(seed: u32, cell: IVec3) -> u32 {
    let h = seed
        ^ (cell.x as u32).wrapping_mul(PRIME_X)
        ^ (cell.y as u32).wrapping_mul(PRIME_Y)
        ^ (cell.z as u32).wrapping_mul(PRIME_Z);
    mix(h.wrapping_mul(0x27D4_EB2D))
}

fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846C_A68B);
    h ^ (h >> 16)
}

/// Top 24 bits of `h` as a fraction in `[0, 1]`.
fn unit_from_hash(h: u32) -> f32 {
    (h >> 8) as f32 / 16_777_215.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_reproducible() {
        let cfg = CellularConfig::new(CellularReturn::NearestValue);
        let p = Vec3::new(3.2, -1.7, 0.4);
        assert_eq!(cfg.sample(p, 7).to_bits(), cfg.sample(p, 7).to_bits());
    }

    #[test]
    fn test_value_range() {
        let cfg = CellularConfig::new(CellularReturn::SecondValue);
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, 1.5);
            let v = cfg.sample(p, 3);
            assert!((-1.0..=1.0).contains(&v), "value {} out of range", v);
        }
    }

    #[test]
    fn test_ratio_range() {
        let cfg = CellularConfig::new(CellularReturn::DistanceRatio);
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.23, 0.5, i as f32 * 0.19);
            let r = cfg.sample(p, 11);
            assert!((0.0..=1.0).contains(&r), "ratio {} out of range", r);
        }
    }

    #[test]
    fn test_nearest_and_second_differ() {
        let nearest = CellularConfig::new(CellularReturn::NearestValue);
        let second = CellularConfig::new(CellularReturn::SecondValue);
        let p = Vec3::new(10.3, 4.4, -2.2);
        assert_ne!(nearest.sample(p, 5), second.sample(p, 5));
    }

    #[test]
    fn test_nearby_points_share_a_cell_value() {
        let cfg = CellularConfig::new(CellularReturn::NearestValue);
        let mut distinct: Vec<f32> = (0..100)
            .map(|i| cfg.sample(Vec3::new(i as f32 * 0.05, 0.0, 0.0), 9))
            .collect();
        distinct.sort_by(f32::total_cmp);
        distinct.dedup();
        assert!(distinct.len() < 20, "expected clustered values, got {}", distinct.len());
    }
}
