//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for the weather band model and moisture diffusion.
///
/// All quantities are normalized: temperature, moisture and capacity live in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateConfig {
    // Weather bands
    pub sinking_humidity: f32, // fraction of cell humidity at a descending edge
    pub temperature_exponent: f32,
    pub air_noise_blend: f32, // 0 = band wind only, 1 = noise wind only

    // Moisture seeding
    pub land_threshold: f32,
    pub capacity_scale: f32,
    pub seed_band_weight: f32,
    pub seed_air_weight: f32,

    // Diffusion
    pub iterations: u32,
    pub spread_weights: [f32; 3], // clockwise sibling, downwind, counter-clockwise sibling
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            sinking_humidity: 0.2,
            temperature_exponent: 1.15,
            air_noise_blend: 0.0,

            land_threshold: 0.5,
            capacity_scale: 0.5,
            seed_band_weight: 0.9,
            seed_air_weight: 0.1,

            iterations: 10,
            spread_weights: [0.25, 0.5, 0.25],
        }
    }
}

impl ClimateConfig {
    pub fn is_land(&self, height: f32) -> bool {
        height > self.land_threshold
    }
}
