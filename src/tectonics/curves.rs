//! Boundary blend weights and terrain profiles.
//!
//! `d` is the per-plate normalized boundary distance: 0 deep inside a plate,
//! 1 on its boundary. Every profile is 0 at `d = 0` so plate interiors stay flat.

/// Kind of interaction at a plate boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Diverging oceanic plates: mid-ocean ridge.
    Ridge,
    /// Diverging continental plates: rift valley.
    Rift,
    /// Diverging ocean/continent pair: passive margin subsidence.
    PassiveMargin,
    /// Converging continental plates: orogeny.
    Orogeny,
    /// Continental plate over a subducting oceanic plate: volcanic arc.
    Arc,
    /// Oceanic plate subducting under a continental plate: trench.
    Trench,
    /// Converging oceanic plates: island arc.
    IslandArc,
}

impl BoundaryKind {
    /// Classifies a boundary from the signed collision magnitude and plate classes.
    ///
    /// Returns `None` when the plates neither converge nor diverge.
    pub fn classify(collision: f32, own_ocean: bool, border_ocean: bool) -> Option<Self> {
        if collision < 0.0 {
            Some(match (own_ocean, border_ocean) {
                (true, true) => BoundaryKind::Ridge,
                (false, false) => BoundaryKind::Rift,
                _ => BoundaryKind::PassiveMargin,
            })
        } else if collision > 0.0 {
            Some(match (own_ocean, border_ocean) {
                (false, false) => BoundaryKind::Orogeny,
                (false, true) => BoundaryKind::Arc,
                (true, false) => BoundaryKind::Trench,
                (true, true) => BoundaryKind::IslandArc,
            })
        } else {
            None
        }
    }

    /// Terrain profile of this boundary at normalized distance `d`.
    pub fn profile(&self, d: f32) -> f32 {
        let d = d.clamp(0.0, 1.0);
        match self {
            BoundaryKind::Ridge => 0.6 * d * d * d,
            BoundaryKind::Rift => -0.5 * d * d * d,
            BoundaryKind::PassiveMargin => -0.25 * d * d,
            BoundaryKind::Orogeny => d * d,
            BoundaryKind::Arc => 0.8 * d * d,
            BoundaryKind::Trench => -0.4 * d * d * d,
            BoundaryKind::IslandArc => 0.4 * d * d * d,
        }
    }
}

/// Blend weights `(own, border)` for a cell at normalized distance `d`.
///
/// Below `midpoint` the cell takes only its own plate; from there the border
/// weight rises smoothly to one half at the boundary. Weights always sum to 1.
pub fn calculate_curve(d: f32, midpoint: f32) -> (f32, f32) {
    let span = (1.0 - midpoint).max(f32::EPSILON);
    let t = ((d - midpoint) / span).clamp(0.0, 1.0);
    let s = t * t * (3.0 - 2.0 * t);
    let border = 0.5 * s;
    (1.0 - border, border)
}

/// Terrain shaping at a diverging boundary.
pub fn divergent_curve(d: f32, own_ocean: bool, border_ocean: bool) -> f32 {
    BoundaryKind::classify(-1.0, own_ocean, border_ocean)
        .map_or(0.0, |kind| kind.profile(d))
}

/// Terrain shaping at a converging boundary.
pub fn convergent_curve(d: f32, own_ocean: bool, border_ocean: bool) -> f32 {
    BoundaryKind::classify(1.0, own_ocean, border_ocean)
        .map_or(0.0, |kind| kind.profile(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_calculate_curve_sums_to_one() {
        for i in 0..=20 {
            let d = i as f32 / 20.0;
            for midpoint in [0.5, 0.7] {
                let (own, border) = calculate_curve(d, midpoint);
                assert_abs_diff_eq!(own + border, 1.0, epsilon = 1e-6);
                assert!(border <= own);
            }
        }
    }

    #[test]
    fn test_calculate_curve_endpoints() {
        assert_eq!(calculate_curve(0.0, 0.5), (1.0, 0.0));
        assert_eq!(calculate_curve(0.7, 0.7), (1.0, 0.0));
        let (own, border) = calculate_curve(1.0, 0.5);
        assert_abs_diff_eq!(own, 0.5);
        assert_abs_diff_eq!(border, 0.5);
    }

    #[test]
    fn test_mixed_midpoint_delays_blending() {
        let (_, same) = calculate_curve(0.65, 0.5);
        let (_, mixed) = calculate_curve(0.65, 0.7);
        assert!(same > 0.0);
        assert_eq!(mixed, 0.0);
    }

    #[test]
    fn test_profiles_vanish_in_interior() {
        for own in [true, false] {
            for border in [true, false] {
                assert_eq!(divergent_curve(0.0, own, border), 0.0);
                assert_eq!(convergent_curve(0.0, own, border), 0.0);
            }
        }
    }

    #[test]
    fn test_continental_collision_is_strongest() {
        let orogeny = convergent_curve(1.0, false, false);
        for (own, border) in [(false, true), (true, false), (true, true)] {
            assert!(orogeny > convergent_curve(1.0, own, border));
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(BoundaryKind::classify(0.0, true, true), None);
        assert_eq!(BoundaryKind::classify(-0.3, true, true), Some(BoundaryKind::Ridge));
        assert_eq!(BoundaryKind::classify(0.3, true, false), Some(BoundaryKind::Trench));
        assert_eq!(BoundaryKind::classify(0.3, false, true), Some(BoundaryKind::Arc));
        assert!(divergent_curve(1.0, false, false) < 0.0, "continental rifts sink");
        assert!(divergent_curve(1.0, true, true) > 0.0, "ocean ridges rise");
    }
}
