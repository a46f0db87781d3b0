//! Equirectangular grid projection.
//!
//! Grid column `x` maps to longitude `[0, 2π)` and row `y` maps to latitude,
//! with row 0 at the north pole. The sphere's polar axis is +Z.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, UVec2, Vec2, Vec3};

/// Latitude/longitude pair in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in `[-π/2, π/2]`, positive toward +Z.
    pub lat: f32,
    /// Longitude in `[0, 2π)`.
    pub lon: f32,
}

impl LatLon {
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }
}

/// Returns the latitude/longitude at the center of grid cell `(x, y)`.
pub fn grid_to_lat_lon(x: u32, y: u32, size: UVec2) -> LatLon {
    debug_assert!(x < size.x && y < size.y);
    let u = (x as f32 + 0.5) / size.x as f32;
    let v = (y as f32 + 0.5) / size.y as f32;
    LatLon::new(FRAC_PI_2 - v * PI, u * TAU)
}

/// Returns the grid cell containing `coord`.
///
/// Longitude wraps; latitude is clamped to the first/last row.
pub fn lat_lon_to_grid(coord: LatLon, size: UVec2) -> (u32, u32) {
    let u = coord.lon.rem_euclid(TAU) / TAU;
    let v = (FRAC_PI_2 - coord.lat) / PI;

    let x = ((u * size.x as f32).floor() as i64).rem_euclid(size.x as i64) as u32;
    let y = ((v * size.y as f32).floor() as i64).clamp(0, size.y as i64 - 1) as u32;
    (x, y)
}

/// Converts latitude/longitude to a point on the unit sphere.
pub fn lat_lon_to_unit(coord: LatLon) -> Vec3 {
    let (sin_lat, cos_lat) = coord.lat.sin_cos();
    let (sin_lon, cos_lon) = coord.lon.sin_cos();
    Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Converts a point on (or near) the unit sphere back to latitude/longitude.
pub fn unit_to_lat_lon(p: Vec3) -> LatLon {
    let p = p.normalize_or_zero();
    let lat = p.z.clamp(-1.0, 1.0).asin();
    let lon = p.y.atan2(p.x).rem_euclid(TAU);
    LatLon::new(lat, lon)
}

/// Returns the sphere point for grid cell `(x, y)` scaled by `radius`.
///
/// This is the position every noise field is sampled at, so fields wrap
/// seamlessly across the longitude seam and converge at the poles.
pub fn spherical_position(x: u32, y: u32, size: UVec2, radius: f32) -> Vec3 {
    lat_lon_to_unit(grid_to_lat_lon(x, y, size)) * radius
}

/// Builds the row-major batch of sample positions for a whole grid.
pub fn spherical_positions(size: UVec2, radius: f32) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity((size.x * size.y) as usize);
    for y in 0..size.y {
        for x in 0..size.x {
            positions.push(spherical_position(x, y, size, radius));
        }
    }
    positions
}

/// Rotates a tangent vector defined at the north pole into the tangent plane at `target`.
///
/// The rotation carries +Z onto `target` about their cross-product axis. When
/// `target` lies on the polar axis the vector is returned unrotated.
///
/// # Arguments
/// * `tangent` - 2D vector in the north pole's tangent plane (x, y)
/// * `target` - Unit sphere point to rotate to
pub fn rotate_tangent_to_point(tangent: Vec2, target: Vec3) -> Vec3 {
    let v = tangent.extend(0.0);
    let target = target.normalize_or_zero();
    let axis = Vec3::Z.cross(target);

    if axis.length_squared() < 1e-12 {
        return v;
    }

    let angle = Vec3::Z.dot(target).clamp(-1.0, 1.0).acos();
    Quat::from_axis_angle(axis.normalize(), angle) * v
}

/// Returns `(east, north)` tangent unit vectors at sphere point `p`.
///
/// Near the poles a fixed basis (+X east, +Y north) is used.
pub fn local_tangent_basis(p: Vec3) -> (Vec3, Vec3) {
    let east = Vec3::Z.cross(p);
    if east.length_squared() < 1e-12 {
        return (Vec3::X, Vec3::Y);
    }
    let east = east.normalize();
    let north = p.normalize().cross(east);
    (east, north)
}

/// Expresses a 3D tangent vector at `p` as `(east, north)` components.
pub fn tangent_components(v: Vec3, p: Vec3) -> Vec2 {
    let (east, north) = local_tangent_basis(p);
    Vec2::new(v.dot(east), v.dot(north))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_row_zero_is_north() {
        let size = UVec2::new(16, 8);
        let top = grid_to_lat_lon(0, 0, size);
        let bottom = grid_to_lat_lon(0, 7, size);
        assert!(top.lat > 0.0 && bottom.lat < 0.0);
        assert_abs_diff_eq!(top.lat, -bottom.lat, epsilon = 1e-6);
    }

    #[test]
    fn test_grid_round_trip() {
        let size = UVec2::new(32, 16);
        for y in 0..size.y {
            for x in 0..size.x {
                let coord = grid_to_lat_lon(x, y, size);
                assert_eq!(lat_lon_to_grid(coord, size), (x, y));
            }
        }
    }

    #[test]
    fn test_unit_round_trip() {
        let coord = LatLon::new(0.4, 2.5);
        let p = lat_lon_to_unit(coord);
        assert_abs_diff_eq!(p.length(), 1.0, epsilon = 1e-6);

        let back = unit_to_lat_lon(p);
        assert_abs_diff_eq!(back.lat, coord.lat, epsilon = 1e-5);
        assert_abs_diff_eq!(back.lon, coord.lon, epsilon = 1e-5);
    }

    #[test]
    fn test_longitude_wraps_to_column_zero() {
        let size = UVec2::new(8, 4);
        let (x, _) = lat_lon_to_grid(LatLon::new(0.0, TAU + 0.01), size);
        assert_eq!(x, 0);
    }

    #[test]
    fn test_rotation_at_pole_is_identity() {
        let v = Vec2::new(0.6, 0.8);
        let rotated = rotate_tangent_to_point(v, Vec3::Z);
        assert_eq!(rotated, Vec3::new(0.6, 0.8, 0.0));
    }

    #[test]
    fn test_rotated_vector_is_tangent() {
        let v = Vec2::new(1.0, 0.0);
        for coord in [LatLon::new(0.0, 0.0), LatLon::new(0.7, 1.3), LatLon::new(-1.2, 4.0)] {
            let p = lat_lon_to_unit(coord);
            let rotated = rotate_tangent_to_point(v, p);
            assert_abs_diff_eq!(rotated.dot(p), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(rotated.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_tangent_basis_is_orthonormal() {
        let p = lat_lon_to_unit(LatLon::new(0.3, 0.9));
        let (east, north) = local_tangent_basis(p);
        assert_abs_diff_eq!(east.dot(north), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(east.dot(p), 0.0, epsilon = 1e-6);
        assert!(north.z > 0.0, "north should point toward +Z");
    }

    #[test]
    fn test_positions_batch_layout() {
        let size = UVec2::new(4, 2);
        let positions = spherical_positions(size, 2.0);
        assert_eq!(positions.len(), 8);
        assert_eq!(positions[5], spherical_position(1, 1, size, 2.0));
        assert_abs_diff_eq!(positions[0].length(), 2.0, epsilon = 1e-5);
    }
}
