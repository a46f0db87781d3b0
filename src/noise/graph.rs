//! Composable noise operator trees evaluated over position batches.
//!
//! A tree is built from a source outward, e.g.
//! `NoiseNode::open_simplex().scaled(0.01).fractal(fbm)`, and evaluated with
//! [`NoiseNode::generate`]. Evaluation is a pure function of the tree, the
//! seed and the positions.

use glam::Vec3;
use ::noise::{NoiseFn, OpenSimplex};

use super::cellular::CellularConfig;
use super::fractal::FractalNoiseConfig;

const WARP_SEED_SALT: u32 = 0x9E37_79B9;

/// Domain warp parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpConfig {
    /// Offset amplitude in source units.
    pub amplitude: f32,
    /// Frequency of the offset field.
    pub frequency: f32,
    /// Octave layout of the offset field.
    pub fractal: FractalNoiseConfig,
}

impl WarpConfig {
    /// Single-octave warp.
    pub fn new(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            fractal: FractalNoiseConfig::new(1.0, 1, 1.0),
        }
    }

    /// Multi-octave warp.
    pub fn with_fractal(mut self, fractal: FractalNoiseConfig) -> Self {
        self.fractal = fractal;
        self
    }
}

/// A node in a noise operator tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseNode {
    /// Coherent OpenSimplex noise in roughly `[-1, 1]`.
    OpenSimplex,
    /// Cellular (Worley) noise.
    Cellular(CellularConfig),
    /// Multiplies sample positions by `frequency` before evaluating `source`.
    Scale { frequency: f32, source: Box<NoiseNode> },
    /// Offsets sample positions by a secondary field before evaluating `source`.
    Warp { warp: WarpConfig, source: Box<NoiseNode> },
    /// Fractal Brownian motion over `source`, normalized by the amplitude sum.
    Fractal { fractal: FractalNoiseConfig, source: Box<NoiseNode> },
}

impl NoiseNode {
    pub fn open_simplex() -> Self {
        NoiseNode::OpenSimplex
    }

    pub fn cellular(config: CellularConfig) -> Self {
        NoiseNode::Cellular(config)
    }

    pub fn scaled(self, frequency: f32) -> Self {
        NoiseNode::Scale { frequency, source: Box::new(self) }
    }

    pub fn warped(self, warp: WarpConfig) -> Self {
        NoiseNode::Warp { warp, source: Box::new(self) }
    }

    pub fn fractal(self, fractal: FractalNoiseConfig) -> Self {
        NoiseNode::Fractal { fractal, source: Box::new(self) }
    }

    /// Evaluates the tree at every position.
    ///
    /// # Arguments
    /// * `positions` - Sample positions
    /// * `seed` - Base seed; octaves and warp fields derive their own seeds from it
    ///
    /// # Returns
    /// One value per position, in the same order
    pub fn generate(&self, positions: &[Vec3], seed: u32) -> Vec<f32> {
        match self {
            NoiseNode::OpenSimplex => {
                let source = OpenSimplex::new(seed);
                positions.iter().map(|p| sample_simplex(&source, *p)).collect()
            }
            NoiseNode::Cellular(config) => {
                positions.iter().map(|p| config.sample(*p, seed)).collect()
            }
            NoiseNode::Scale { frequency, source } => {
                let scaled: Vec<Vec3> = positions.iter().map(|p| *p * *frequency).collect();
                source.generate(&scaled, seed)
            }
            NoiseNode::Warp { warp, source } => {
                let warped = warp_positions(positions, warp, seed);
                source.generate(&warped, seed)
            }
            NoiseNode::Fractal { fractal, source } => {
                let mut total = vec![0.0f32; positions.len()];
                for (octave, (amplitude, frequency)) in fractal.octave_weights().enumerate() {
                    let scaled: Vec<Vec3> = positions.iter().map(|p| *p * frequency).collect();
                    let values = source.generate(&scaled, seed.wrapping_add(octave as u32));
                    for (t, v) in total.iter_mut().zip(values) {
                        *t += v * amplitude;
                    }
                }
                let bound = fractal.amplitude_bound();
                for t in &mut total {
                    *t /= bound;
                }
                total
            }
        }
    }

    /// Evaluates the tree into a caller-provided buffer.
    ///
    /// Panics if `out` and `positions` differ in length.
    pub fn generate_into(&self, positions: &[Vec3], seed: u32, out: &mut [f32]) {
        assert_eq!(
            positions.len(),
            out.len(),
            "noise output buffer must match the position batch"
        );
        out.copy_from_slice(&self.generate(positions, seed));
    }

    /// Evaluates the tree at a single position.
    pub fn sample(&self, position: Vec3, seed: u32) -> f32 {
        self.generate(&[position], seed)[0]
    }
}

fn sample_simplex(source: &OpenSimplex, p: Vec3) -> f32 {
    source.get([p.x as f64, p.y as f64, p.z as f64]) as f32
}

/// Progressive fractal domain warp: each octave samples at the already-warped position.
fn warp_positions(positions: &[Vec3], warp: &WarpConfig, seed: u32) -> Vec<Vec3> {
    let mut warped = positions.to_vec();

    for (octave, (amplitude, frequency)) in warp.fractal.octave_weights().enumerate() {
        let octave_seed = seed
            .wrapping_add(WARP_SEED_SALT)
            .wrapping_add(octave as u32 * 3);
        let fx = OpenSimplex::new(octave_seed);
        let fy = OpenSimplex::new(octave_seed.wrapping_add(1));
        let fz = OpenSimplex::new(octave_seed.wrapping_add(2));

        let amplitude = warp.amplitude * amplitude;
        let frequency = warp.frequency * frequency;
        for p in warped.iter_mut() {
            let q = *p * frequency;
            let offset = Vec3::new(
                sample_simplex(&fx, q),
                sample_simplex(&fy, q),
                sample_simplex(&fz, q),
            );
            *p += offset * amplitude;
        }
    }

    warped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::cellular::CellularReturn;

    fn sample_positions() -> Vec<Vec3> {
        (0..64)
            .map(|i| {
                let t = i as f32 * 0.173;
                Vec3::new(t.cos() * 40.0, t.sin() * 40.0, t * 3.0)
            })
            .collect()
    }

    #[test]
    fn test_generate_is_deterministic() {
        let node = NoiseNode::open_simplex()
            .scaled(0.05)
            .warped(WarpConfig::new(0.5, 1.0))
            .fractal(FractalNoiseConfig::default());
        let positions = sample_positions();
        let a = node.generate(&positions, 42);
        let b = node.generate(&positions, 42);
        assert_eq!(a, b, "same seed and positions should produce same values");
    }

    #[test]
    fn test_seed_changes_output() {
        let node = NoiseNode::open_simplex().scaled(0.1);
        let positions = sample_positions();
        assert_ne!(node.generate(&positions, 1), node.generate(&positions, 2));
    }

    #[test]
    fn test_fbm_range() {
        let node = NoiseNode::open_simplex()
            .scaled(0.05)
            .fractal(FractalNoiseConfig::new(0.5, 4, 2.0));
        for v in node.generate(&sample_positions(), 3) {
            assert!(v.abs() <= 1.5, "fbm value {} out of expected range", v);
        }
    }

    #[test]
    fn test_batch_matches_single_sample() {
        let node = NoiseNode::cellular(CellularConfig::new(CellularReturn::NearestValue))
            .warped(WarpConfig::new(0.5, 1.0).with_fractal(FractalNoiseConfig::new(0.5, 5, 2.0)))
            .scaled(0.1);
        let positions = sample_positions();
        let batch = node.generate(&positions, 9);
        for (i, p) in positions.iter().enumerate() {
            assert_eq!(batch[i], node.sample(*p, 9), "mismatch at index {}", i);
        }
    }

    #[test]
    fn test_generate_into() {
        let node = NoiseNode::open_simplex();
        let positions = sample_positions();
        let mut out = vec![0.0; positions.len()];
        node.generate_into(&positions, 5, &mut out);
        assert_eq!(out, node.generate(&positions, 5));
    }

    #[test]
    #[should_panic]
    fn test_generate_into_rejects_short_buffer() {
        let node = NoiseNode::open_simplex();
        let mut out = vec![0.0; 3];
        node.generate_into(&sample_positions(), 5, &mut out);
    }
}
