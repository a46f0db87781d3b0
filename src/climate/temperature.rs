//! Latitude temperature model.

use super::ClimateConfig;

/// Normalized temperature for a latitude: 1 at the equator, 0 at the poles.
pub fn latitude_temperature(latitude_rad: f32, cfg: &ClimateConfig) -> f32 {
    let t = (latitude_rad.abs() / std::f32::consts::FRAC_PI_2).clamp(0.0, 1.0);
    // Nonlinear curve gives larger polar contrast.
    1.0 - t.powf(cfg.temperature_exponent)
}
