//! Convergence/divergence between adjacent plates.

use glam::Vec3;

use super::config::TectonicConfig;
use super::plate::PlateInfo;

/// Signed collision magnitude between two plates.
///
/// Each plate's drift is projected onto the line joining the two centroids;
/// the change in centroid separation after one step of projected drift is
/// scaled and clamped to `max_collision`. Positive means converging.
///
/// # Arguments
/// * `p1`, `p2` - Plate centroids on the unit sphere
/// * `dir1`, `dir2` - 3D drift directions
pub fn collision_magnitude(p1: Vec3, dir1: Vec3, p2: Vec3, dir2: Vec3, config: &TectonicConfig) -> f32 {
    let axis = p2 - p1;
    let axis_sq = axis.length_squared();
    if axis_sq < 1e-12 {
        return 0.0;
    }

    let d1 = axis * (dir1.dot(axis) / axis_sq);
    let d2 = axis * (dir2.dot(axis) / axis_sq);

    let before = axis.length();
    let after = ((p2 + d2) - (p1 + d1)).length();
    ((before - after) * config.collision_scale).min(config.max_collision)
}

/// Fills `collisions` for every plate from its `neighbors` list.
///
/// Returns the number of converging neighbor pairs.
pub fn resolve_collisions(plates: &mut [PlateInfo], config: &TectonicConfig) -> usize {
    let mut converging = 0;
    for i in 0..plates.len() {
        let collisions: Vec<f32> = plates[i]
            .neighbors
            .iter()
            .map(|&j| {
                collision_magnitude(
                    plates[i].point3d,
                    plates[i].direction,
                    plates[j].point3d,
                    plates[j].direction,
                    config,
                )
            })
            .collect();
        converging += collisions.iter().filter(|&&c| c > 0.0).count();
        plates[i].collisions = collisions;
    }
    converging / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_head_on_plates_converge() {
        let config = TectonicConfig::default();
        let p1 = Vec3::new(-0.1, 0.0, 0.0);
        let p2 = Vec3::new(0.1, 0.0, 0.0);
        let c = collision_magnitude(p1, Vec3::X * 0.05, p2, -Vec3::X * 0.05, &config);
        assert!(c > 0.0);
        assert_abs_diff_eq!(c, 0.1 * config.collision_scale, epsilon = 1e-6);
        assert!(c <= config.max_collision);
    }

    #[test]
    fn test_separating_plates_diverge() {
        let config = TectonicConfig::default();
        let p1 = Vec3::new(-0.5, 0.0, 0.0);
        let p2 = Vec3::new(0.5, 0.0, 0.0);
        let c = collision_magnitude(p1, -Vec3::X * 0.1, p2, Vec3::X * 0.1, &config);
        assert_abs_diff_eq!(c, -0.2 * config.collision_scale, epsilon = 1e-6);
    }

    #[test]
    fn test_perpendicular_drift_is_neutral() {
        let config = TectonicConfig::default();
        let c = collision_magnitude(Vec3::ZERO, Vec3::Y, Vec3::X, Vec3::Z, &config);
        assert_abs_diff_eq!(c, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_magnitude_is_symmetric() {
        let config = TectonicConfig::default();
        let (p1, d1) = (Vec3::new(0.2, 0.9, 0.1), Vec3::new(0.3, -0.2, 0.5));
        let (p2, d2) = (Vec3::new(-0.4, 0.6, 0.3), Vec3::new(-0.1, 0.4, 0.2));
        assert_abs_diff_eq!(
            collision_magnitude(p1, d1, p2, d2, &config),
            collision_magnitude(p2, d2, p1, d1, &config),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_coincident_centroids() {
        let config = TectonicConfig::default();
        assert_eq!(collision_magnitude(Vec3::X, Vec3::Y, Vec3::X, -Vec3::Y, &config), 0.0);
    }
}
