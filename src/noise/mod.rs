//! Noise generation module.
//!
//! OpenSimplex sources come from the `noise` crate; cellular sources and the
//! scale/warp/fractal operators are composed here into per-quantity graphs.

mod cellular;
mod fractal;
mod graph;
mod pipeline;

pub use cellular::{CellularConfig, CellularReturn};
pub use fractal::FractalNoiseConfig;
pub use graph::{NoiseNode, WarpConfig};
pub use pipeline::{NoiseField, NoisePipeline};
