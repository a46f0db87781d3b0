//! Climate model.
//!
//! Latitude-banded circulation cells with per-column perturbed boundaries,
//! a latitude temperature curve, and wind-driven moisture diffusion.

mod config;
mod temperature;
mod weather;
mod perturbed;
mod moisture;

pub use config::ClimateConfig;
pub use temperature::latitude_temperature;
pub use weather::{
    default_weather_cells, generate_weather_bands, CellEdge, WeatherBand, WeatherBands,
    WeatherCell, WeatherModel,
};
pub use perturbed::PerturbedWeatherBands;
pub use moisture::{diffuse_moisture, fill_points, MoistureInputs};
