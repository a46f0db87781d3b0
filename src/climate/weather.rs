//! Three-cell atmospheric circulation bands.
//!
//! Six cells (polar, ferrel, hadley per hemisphere) span the latitudes from
//! south to north. Each cell is split at its mid-latitude into two moisture
//! bands. Latitudes are radians; wind vectors are `(east, north)`.

use glam::Vec2;

use super::ClimateConfig;
use crate::geometry::LatLon;

/// Edge of a circulation cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEdge {
    Lower,
    Upper,
}

/// A circulation cell bounded by two latitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherCell {
    pub name: &'static str,
    pub lower: f32,
    pub upper: f32,
    pub size: f32,
    /// Moisture carried by air rising at this cell's wet edge.
    pub humidity: f32,
    /// Prevailing wind at `lower`.
    pub wind_lower: Vec2,
    /// Prevailing wind at `upper`.
    pub wind_upper: Vec2,
    /// Edge where air rises (wet); the other edge sinks (dry).
    pub rising: CellEdge,
}

impl WeatherCell {
    fn new(
        name: &'static str,
        lower_deg: f32,
        upper_deg: f32,
        humidity: f32,
        wind_lower: Vec2,
        wind_upper: Vec2,
        rising: CellEdge,
    ) -> Self {
        let lower = lower_deg.to_radians();
        let upper = upper_deg.to_radians();
        Self {
            name,
            lower,
            upper,
            size: upper - lower,
            humidity,
            wind_lower,
            wind_upper,
            rising,
        }
    }

    fn edge_humidity(&self, edge: CellEdge, cfg: &ClimateConfig) -> f32 {
        if edge == self.rising {
            self.humidity
        } else {
            self.humidity * cfg.sinking_humidity
        }
    }

    /// Wind interpolated linearly across the cell.
    pub fn wind_at(&self, latitude: f32) -> Vec2 {
        let t = fraction(latitude, self.lower, self.size);
        (self.wind_upper - self.wind_lower) * t + self.wind_lower
    }
}

/// A moisture band with three control values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherBand {
    pub lower: f32,
    pub upper: f32,
    pub size: f32,
    pub moisture_lower: f32,
    pub moisture_middle: f32,
    pub moisture_upper: f32,
}

impl WeatherBand {
    /// Moisture eased lower→middle→upper across the band.
    ///
    /// The lower half eases out of `moisture_lower`, the upper half eases into
    /// `moisture_upper`; both halves meet at `moisture_middle`.
    pub fn moisture_at(&self, latitude: f32) -> f32 {
        let value = fraction(latitude, self.lower, self.size);
        if value < 0.5 {
            let v = value * 2.0 - 1.0;
            (self.moisture_middle - self.moisture_lower) * (1.0 - v * v) + self.moisture_lower
        } else {
            let v = (value - 0.5) * 2.0;
            (self.moisture_upper - self.moisture_middle) * v * v + self.moisture_middle
        }
    }
}

fn fraction(latitude: f32, lower: f32, size: f32) -> f32 {
    if size > 0.0 {
        ((latitude - lower) / size).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Index of the first entry whose upper bound exceeds `latitude`, or the last entry.
pub(crate) fn find_index<I>(uppers: I, latitude: f32) -> usize
where
    I: ExactSizeIterator<Item = f32>,
{
    let last = uppers.len().saturating_sub(1);
    uppers
        .enumerate()
        .find(|&(_, upper)| latitude < upper)
        .map_or(last, |(i, _)| i)
}

/// The six static circulation cells, south to north.
pub fn default_weather_cells() -> Vec<WeatherCell> {
    use CellEdge::{Lower, Upper};
    vec![
        WeatherCell::new("South Polar", -90.0, -60.0, 0.65, Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0), Upper),
        WeatherCell::new("South Ferrel", -60.0, -30.0, 0.75, Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0), Lower),
        WeatherCell::new("South Hadley", -30.0, 0.0, 0.95, Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0), Upper),
        WeatherCell::new("North Hadley", 0.0, 30.0, 0.95, Vec2::new(-1.0, 0.0), Vec2::new(0.0, -1.0), Lower),
        WeatherCell::new("North Ferrel", 30.0, 60.0, 0.74, Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Upper),
        WeatherCell::new("North Polar", 60.0, 90.0, 0.65, Vec2::new(-1.0, 0.0), Vec2::new(0.0, -1.0), Lower),
    ]
}

/// Splits each cell into two moisture bands.
///
/// Edge moisture is the cell humidity at a rising edge and a fraction of it
/// at a sinking edge, averaged with the neighboring cell on shared edges, so
/// adjacent bands agree at their common latitude.
pub fn generate_weather_bands(cells: &[WeatherCell], cfg: &ClimateConfig) -> Vec<WeatherBand> {
    let n = cells.len();
    let edges: Vec<f32> = (0..=n)
        .map(|k| {
            let below = k.checked_sub(1).map(|i| cells[i].edge_humidity(CellEdge::Upper, cfg));
            let above = cells.get(k).map(|c| c.edge_humidity(CellEdge::Lower, cfg));
            match (below, above) {
                (Some(a), Some(b)) => (a + b) * 0.5,
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => 0.0,
            }
        })
        .collect();

    let mut bands = Vec::with_capacity(n * 2);
    for (k, cell) in cells.iter().enumerate() {
        let mid = (cell.lower + cell.upper) * 0.5;
        let (low, high) = (edges[k], edges[k + 1]);
        let centre = (low + high) * 0.5;
        bands.push(band(cell.lower, mid, low, centre));
        bands.push(band(mid, cell.upper, centre, high));
    }
    bands
}

fn band(lower: f32, upper: f32, moisture_lower: f32, moisture_upper: f32) -> WeatherBand {
    WeatherBand {
        lower,
        upper,
        size: upper - lower,
        moisture_lower,
        moisture_middle: (moisture_lower + moisture_upper) * 0.5,
        moisture_upper,
    }
}

/// Per-coordinate queries over a weather band model.
pub trait WeatherModel {
    /// Index of the circulation cell containing `coord`.
    fn cell_index(&self, coord: LatLon) -> usize;

    /// Index of the moisture band containing `coord`.
    fn band_index(&self, coord: LatLon) -> usize;

    /// Prevailing wind `(east, north)` at `coord`.
    fn wind_direction(&self, coord: LatLon) -> Vec2;

    /// Raw moisture in `[0, 1]` at `coord`.
    fn moisture(&self, coord: LatLon) -> f32;
}

/// The unperturbed band model: boundaries depend on latitude only.
#[derive(Debug, Clone)]
pub struct WeatherBands {
    cells: Vec<WeatherCell>,
    bands: Vec<WeatherBand>,
}

impl WeatherBands {
    pub fn new(cfg: &ClimateConfig) -> Self {
        let cells = default_weather_cells();
        let bands = generate_weather_bands(&cells, cfg);
        Self { cells, bands }
    }

    pub fn cells(&self) -> &[WeatherCell] {
        &self.cells
    }

    pub fn bands(&self) -> &[WeatherBand] {
        &self.bands
    }
}

impl WeatherModel for WeatherBands {
    fn cell_index(&self, coord: LatLon) -> usize {
        find_index(self.cells.iter().map(|c| c.upper), coord.lat)
    }

    fn band_index(&self, coord: LatLon) -> usize {
        find_index(self.bands.iter().map(|b| b.upper), coord.lat)
    }

    fn wind_direction(&self, coord: LatLon) -> Vec2 {
        self.cells[self.cell_index(coord)].wind_at(coord.lat)
    }

    fn moisture(&self, coord: LatLon) -> f32 {
        self.bands[self.band_index(coord)].moisture_at(coord.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn at(lat_deg: f32) -> LatLon {
        LatLon::new(lat_deg.to_radians(), 0.0)
    }

    #[test]
    fn test_cells_span_the_globe() {
        let cells = default_weather_cells();
        assert_eq!(cells.len(), 6);
        assert_abs_diff_eq!(cells[0].lower, -FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(cells[5].upper, FRAC_PI_2, epsilon = 1e-6);
        for pair in cells.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
        }
    }

    #[test]
    fn test_bands_are_contiguous_and_continuous() {
        let cfg = ClimateConfig::default();
        let bands = generate_weather_bands(&default_weather_cells(), &cfg);
        assert_eq!(bands.len(), 12);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
            assert_abs_diff_eq!(pair[0].moisture_upper, pair[1].moisture_lower, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_itcz_is_wetter_than_subtropics() {
        let model = WeatherBands::new(&ClimateConfig::default());
        assert!(model.moisture(at(0.0)) > model.moisture(at(30.0)));
        assert!(model.moisture(at(-60.0)) > model.moisture(at(-30.0)));
    }

    #[test]
    fn test_indices_non_decreasing_with_latitude() {
        let model = WeatherBands::new(&ClimateConfig::default());
        let mut last = (0, 0);
        for i in -90..=90 {
            let coord = at(i as f32);
            let current = (model.cell_index(coord), model.band_index(coord));
            assert!(current.0 >= last.0 && current.1 >= last.1, "at {} degrees", i);
            last = current;
        }
        assert_eq!(last, (5, 11), "north pole falls back to the last entry");
    }

    #[test]
    fn test_wind_lies_on_cell_segment() {
        let model = WeatherBands::new(&ClimateConfig::default());
        for i in -90..=90 {
            let coord = at(i as f32);
            let cell = model.cells()[model.cell_index(coord)];
            let wind = model.wind_direction(coord);
            let segment = cell.wind_upper - cell.wind_lower;
            let offset = wind - cell.wind_lower;
            assert_abs_diff_eq!(segment.perp_dot(offset), 0.0, epsilon = 1e-5);
            let t = segment.dot(offset) / segment.length_squared();
            assert!((-1e-5..=1.0 + 1e-5).contains(&t), "t = {} at {} degrees", t, i);
        }
    }

    #[test]
    fn test_moisture_continuous_at_band_midpoint() {
        let band = WeatherBand {
            lower: 0.0,
            upper: 1.0,
            size: 1.0,
            moisture_lower: 0.2,
            moisture_middle: 0.9,
            moisture_upper: 0.4,
        };
        assert_abs_diff_eq!(band.moisture_at(0.0), 0.2);
        assert_abs_diff_eq!(band.moisture_at(0.5), 0.9);
        assert_abs_diff_eq!(band.moisture_at(1.0), 0.4);
        assert_abs_diff_eq!(band.moisture_at(0.4999), band.moisture_at(0.5001), epsilon = 1e-3);
    }
}
