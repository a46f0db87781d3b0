//! Weather bands with per-column noise-perturbed boundaries.
//!
//! Every internal cell boundary is displaced independently in each longitude
//! column. A positive sample pushes the boundary north by up to half of the
//! cell above it; a negative sample pushes it south by up to half of the cell
//! below, so boundaries never cross and adjacent cells stay contiguous.

use std::f32::consts::{PI, TAU};

use glam::{UVec2, Vec2};
use tracing::debug;

use super::weather::{
    find_index, generate_weather_bands, WeatherBand, WeatherBands, WeatherCell, WeatherModel,
};
use super::ClimateConfig;
use crate::geometry::{spherical_position, LatLon};
use crate::noise::NoiseNode;

/// Weather model whose cell and band boundaries vary by longitude column.
#[derive(Debug, Clone)]
pub struct PerturbedWeatherBands {
    width: u32,
    cell_count: usize,
    band_count: usize,
    cells: Vec<WeatherCell>,
    bands: Vec<WeatherBand>,
}

impl PerturbedWeatherBands {
    /// Samples the front noise once per (boundary, column) and builds the tables.
    ///
    /// # Arguments
    /// * `base` - Unperturbed cells to displace
    /// * `size` - Influence grid size; one column per grid column
    /// * `front` - Front displacement noise
    /// * `seed` - Seed for `front`
    /// * `cfg` - Climate parameters used to rebuild bands per column
    pub fn new(base: &WeatherBands, size: UVec2, front: &NoiseNode, seed: u32, cfg: &ClimateConfig) -> Self {
        let boundaries = base.cells().len().saturating_sub(1);
        let radius = size.x as f32 * 0.5;

        let mut positions = Vec::with_capacity(boundaries * size.x as usize);
        for cell in &base.cells()[..boundaries] {
            let row = boundary_row(cell.upper, size.y);
            for x in 0..size.x {
                positions.push(spherical_position(x, row, size, radius));
            }
        }

        let offsets = front.generate(&positions, seed);
        debug!(boundaries, columns = size.x, "sampled weather fronts");
        Self::from_offsets(base, size.x, &offsets, cfg)
    }

    /// Builds the tables from precomputed offsets.
    ///
    /// `offsets[boundary * width + column]` displaces the boundary between cell
    /// `boundary` and `boundary + 1`; samples are clamped to `[-1, 1]`.
    ///
    /// # Panics
    /// If `offsets` does not hold one sample per internal boundary and column.
    pub fn from_offsets(base: &WeatherBands, width: u32, offsets: &[f32], cfg: &ClimateConfig) -> Self {
        let base_cells = base.cells();
        let cell_count = base_cells.len();
        let w = width as usize;
        assert_eq!(
            offsets.len(),
            cell_count.saturating_sub(1) * w,
            "one offset per boundary and column"
        );

        let mut cells = Vec::with_capacity(cell_count * w);
        let mut bands = Vec::new();

        for x in 0..w {
            let column_start = cells.len();
            for (i, cell) in base_cells.iter().enumerate() {
                let mut perturbed = *cell;

                if i > 0 {
                    let n = offsets[(i - 1) * w + x].clamp(-1.0, 1.0);
                    let reach = if n > 0.0 { cell.size } else { base_cells[i - 1].size };
                    perturbed.lower += n * reach * 0.5;
                }
                if i + 1 < cell_count {
                    let n = offsets[i * w + x].clamp(-1.0, 1.0);
                    let reach = if n > 0.0 { base_cells[i + 1].size } else { cell.size };
                    perturbed.upper += n * reach * 0.5;
                }
                perturbed.size = perturbed.upper - perturbed.lower;
                cells.push(perturbed);
            }
            bands.extend(generate_weather_bands(&cells[column_start..], cfg));
        }

        let band_count = if w > 0 { bands.len() / w } else { 0 };
        Self { width, cell_count, band_count, cells, bands }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Longitude column for `coord`.
    pub fn column(&self, coord: LatLon) -> usize {
        let x = (coord.lon.rem_euclid(TAU) / TAU * self.width as f32).floor() as i64;
        x.clamp(0, self.width as i64 - 1) as usize
    }

    /// Perturbed cells of column `x`, south to north.
    pub fn column_cells(&self, x: usize) -> &[WeatherCell] {
        &self.cells[x * self.cell_count..(x + 1) * self.cell_count]
    }

    /// Perturbed bands of column `x`, south to north.
    pub fn column_bands(&self, x: usize) -> &[WeatherBand] {
        &self.bands[x * self.band_count..(x + 1) * self.band_count]
    }
}

impl WeatherModel for PerturbedWeatherBands {
    fn cell_index(&self, coord: LatLon) -> usize {
        let cells = self.column_cells(self.column(coord));
        find_index(cells.iter().map(|c| c.upper), coord.lat)
    }

    fn band_index(&self, coord: LatLon) -> usize {
        let bands = self.column_bands(self.column(coord));
        find_index(bands.iter().map(|b| b.upper), coord.lat)
    }

    fn wind_direction(&self, coord: LatLon) -> Vec2 {
        let cells = self.column_cells(self.column(coord));
        let index = find_index(cells.iter().map(|c| c.upper), coord.lat);
        cells[index].wind_at(coord.lat)
    }

    fn moisture(&self, coord: LatLon) -> f32 {
        let bands = self.column_bands(self.column(coord));
        let index = find_index(bands.iter().map(|b| b.upper), coord.lat);
        bands[index].moisture_at(coord.lat)
    }
}

/// Grid row sampled for a boundary at `latitude` (row 0 is the north pole).
fn boundary_row(latitude: f32, height: u32) -> u32 {
    let row = (height / 2) as i64 - (latitude * height as f32 / PI).floor() as i64;
    row.clamp(0, height as i64 - 1) as u32
}
