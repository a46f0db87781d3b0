//! Equirectangular geometry module.
//!
//! Maps grid cells to points on the sphere and back, and provides the
//! cylindrical neighbor rules shared by diffusion and normalization.

mod projection;
pub mod neighbors;

pub use projection::{
    LatLon, grid_to_lat_lon, lat_lon_to_grid, lat_lon_to_unit, unit_to_lat_lon,
    spherical_position, spherical_positions, rotate_tangent_to_point,
    local_tangent_basis, tangent_components,
};
