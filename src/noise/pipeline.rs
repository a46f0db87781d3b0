//! Per-quantity noise graphs used by overview generation.

use glam::Vec3;

use super::cellular::{CellularConfig, CellularReturn};
use super::fractal::FractalNoiseConfig;
use super::graph::{NoiseNode, WarpConfig};

/// Physical quantities sampled from noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseField {
    /// Small elevation perturbation added to the plate height.
    Elevation,
    /// Multiplier applied to boundary terrain shaping.
    TerrainScale,
    /// North/south air current component.
    WindNorthSouth,
    /// East/west air current component.
    WindEastWest,
    /// Nearest plate identity.
    PlateId,
    /// Second-nearest plate identity.
    PlateBorderId,
    /// Nearest-to-second-nearest distance ratio.
    PlateDistance,
    /// Continent identity.
    ContinentId,
    /// Weather front displacement.
    WeatherFront,
}

impl NoiseField {
    pub fn name(&self) -> &'static str {
        match self {
            NoiseField::Elevation => "elevation",
            NoiseField::TerrainScale => "terrain scale",
            NoiseField::WindNorthSouth => "north/south air",
            NoiseField::WindEastWest => "east/west air",
            NoiseField::PlateId => "plate id",
            NoiseField::PlateBorderId => "plate border id",
            NoiseField::PlateDistance => "plate distance",
            NoiseField::ContinentId => "continent id",
            NoiseField::WeatherFront => "weather front",
        }
    }
}

/// Owned set of noise graphs, one per [`NoiseField`].
///
/// Built once per generator from its frequencies; evaluation never mutates it.
#[derive(Debug, Clone)]
pub struct NoisePipeline {
    elevation: NoiseNode,
    terrain_scale: NoiseNode,
    wind: NoiseNode,
    plate_id: NoiseNode,
    plate_border_id: NoiseNode,
    plate_distance: NoiseNode,
    continent_id: NoiseNode,
    weather_front: NoiseNode,
}

impl NoisePipeline {
    /// Builds the graphs for the given plate and continent frequencies.
    pub fn new(plate_frequency: f32, continent_frequency: f32) -> Self {
        let fbm = FractalNoiseConfig::new(0.5, 4, 2.0);
        let cell_warp = WarpConfig::new(0.5, 1.0)
            .with_fractal(FractalNoiseConfig::new(0.5, 5, 2.0));
        let cellular = |output, frequency| {
            NoiseNode::cellular(CellularConfig::new(output))
                .warped(cell_warp)
                .scaled(frequency)
        };

        Self {
            elevation: NoiseNode::open_simplex().scaled(0.01).fractal(fbm),
            terrain_scale: NoiseNode::open_simplex().scaled(0.05).fractal(fbm),
            wind: NoiseNode::open_simplex()
                .scaled(0.01)
                .warped(WarpConfig::new(0.5, 1.0))
                .fractal(fbm),
            plate_id: cellular(CellularReturn::NearestValue, plate_frequency),
            plate_border_id: cellular(CellularReturn::SecondValue, plate_frequency),
            plate_distance: cellular(CellularReturn::DistanceRatio, plate_frequency),
            continent_id: cellular(CellularReturn::NearestValue, continent_frequency),
            weather_front: NoiseNode::open_simplex().scaled(0.003).warped(
                WarpConfig::new(1.0, 0.003).with_fractal(FractalNoiseConfig::new(1.0, 4, 2.0)),
            ),
        }
    }

    /// Returns the graph for `field`.
    pub fn node(&self, field: NoiseField) -> &NoiseNode {
        match field {
            NoiseField::Elevation => &self.elevation,
            NoiseField::TerrainScale => &self.terrain_scale,
            NoiseField::WindNorthSouth | NoiseField::WindEastWest => &self.wind,
            NoiseField::PlateId => &self.plate_id,
            NoiseField::PlateBorderId => &self.plate_border_id,
            NoiseField::PlateDistance => &self.plate_distance,
            NoiseField::ContinentId => &self.continent_id,
            NoiseField::WeatherFront => &self.weather_front,
        }
    }

    /// Evaluates `field` over a position batch.
    pub fn generate(&self, field: NoiseField, positions: &[Vec3], seed: u32) -> Vec<f32> {
        self.node(field).generate(positions, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(radius: f32, count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| {
                let a = i as f32 / count as f32 * std::f32::consts::TAU;
                Vec3::new(a.cos() * radius, a.sin() * radius, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_plate_fields_agree_on_cells() {
        let pipeline = NoisePipeline::new(0.05, 0.5);
        let positions = ring(64.0, 256);
        let ids = pipeline.generate(NoiseField::PlateId, &positions, 3);
        let borders = pipeline.generate(NoiseField::PlateBorderId, &positions, 3);
        let distance = pipeline.generate(NoiseField::PlateDistance, &positions, 3);

        let mut distinct = ids.clone();
        distinct.sort_by(f32::total_cmp);
        distinct.dedup();
        assert!(distinct.len() > 1, "ring should cross several plates");
        assert!(distinct.len() < 64, "plates should cluster");

        for i in 0..positions.len() {
            assert_ne!(ids[i], borders[i], "border id must come from another cell");
            assert!((0.0..=1.0).contains(&distance[i]));
        }
    }

    #[test]
    fn test_wind_components_differ_by_seed() {
        let pipeline = NoisePipeline::new(0.05, 0.5);
        let positions = ring(100.0, 32);
        let ns = pipeline.generate(NoiseField::WindNorthSouth, &positions, 5);
        let ew = pipeline.generate(NoiseField::WindEastWest, &positions, 6);
        assert_ne!(ns, ew);
    }
}
