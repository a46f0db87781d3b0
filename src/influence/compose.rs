//! Composes plate, weather and noise fields into influence cells.

use glam::{UVec2, Vec2};

use super::cell::InfluenceCell;
use crate::climate::{latitude_temperature, ClimateConfig, WeatherModel};
use crate::geometry::{grid_to_lat_lon, lat_lon_to_unit, rotate_tangent_to_point, tangent_components};
use crate::tectonics::{
    calculate_curve, convergent_curve, divergent_curve, PlateAssignment, TectonicConfig,
};

/// Per-cell noise samples consumed by composition, row-major.
#[derive(Debug, Clone, Copy)]
pub struct CompositionFields<'a> {
    pub elevation: &'a [f32],
    pub terrain_scale: &'a [f32],
    pub wind_north_south: &'a [f32],
    pub wind_east_west: &'a [f32],
    pub continent: &'a [f32],
}

/// Composed cells plus the moisture seed for diffusion.
#[derive(Debug, Clone)]
pub struct Composition {
    pub cells: Vec<InfluenceCell>,
    pub moisture_seed: Vec<f32>,
}

/// Builds one influence cell per grid cell.
///
/// Moisture in the returned cells holds the seed value; run diffusion to
/// replace it with final moisture.
///
/// # Panics
/// If a field or the plate assignment does not cover the grid.
pub fn compose_cells<W>(
    size: UVec2,
    plates: &PlateAssignment,
    fields: CompositionFields<'_>,
    weather: &W,
    tectonics: &TectonicConfig,
    climate: &ClimateConfig,
) -> Composition
where
    W: WeatherModel + ?Sized,
{
    let cell_count = (size.x * size.y) as usize;
    assert_eq!(plates.cells.len(), cell_count, "plate assignment size");
    for field in [
        fields.elevation,
        fields.terrain_scale,
        fields.wind_north_south,
        fields.wind_east_west,
        fields.continent,
    ] {
        assert_eq!(field.len(), cell_count, "composition field size");
    }

    let mut cells = Vec::with_capacity(cell_count);
    let mut moisture_seed = Vec::with_capacity(cell_count);

    for i in 0..cell_count {
        let (x, y) = (i as u32 % size.x, i as u32 / size.x);
        let coord = grid_to_lat_lon(x, y, size);
        let point = lat_lon_to_unit(coord);

        let membership = plates.cells[i];
        let own = &plates.plates[membership.plate];
        let border = &plates.plates[membership.border];
        let distance = membership.distance;

        let direction = tangent_components(rotate_tangent_to_point(own.drift, point), point);

        let band_wind = weather.wind_direction(coord);
        let noise_wind = Vec2::new(fields.wind_east_west[i], fields.wind_north_south[i]);
        let air_direction = band_wind.lerp(noise_wind, climate.air_noise_blend);

        let own_ocean = tectonics.is_ocean(own.height);
        let border_ocean = tectonics.is_ocean(border.height);
        let (own_weight, border_weight) =
            calculate_curve(distance, tectonics.curve_midpoint(own_ocean, border_ocean));

        let (collision, terrain_scale) = if membership.plate != membership.border {
            let collision = plates.collision(membership.plate, membership.border);
            let terrain_scale = if collision < 0.0 {
                divergent_curve(distance, own_ocean, border_ocean)
            } else if collision > 0.0 {
                convergent_curve(distance, own_ocean, border_ocean)
            } else {
                0.0
            };
            (collision, terrain_scale)
        } else {
            (0.0, 0.0)
        };

        let height_base = ((own.height + tectonics.elevation_noise(fields.elevation[i])) * own_weight
            + border.height * border_weight
            + terrain_scale * collision.abs() * tectonics.terrain_noise(fields.terrain_scale[i]))
        .clamp(0.0, 1.0);

        let band_moisture = weather.moisture(coord);
        let seed = if tectonics.is_ocean(height_base) {
            1.0
        } else {
            band_moisture * climate.seed_band_weight + fields.wind_north_south[i] * climate.seed_air_weight
        };
        moisture_seed.push(seed);

        cells.push(InfluenceCell {
            tectonic_plate: membership.plate as u32,
            border_plate: membership.border as u32,
            plate_value: own.value,
            continent_value: fields.continent[i],
            plate_distance_value: distance,
            plate_height: own.height,
            direction,
            air_direction,
            collision,
            height_base,
            terrain_scale,
            temperature: latitude_temperature(coord.lat, climate),
            moisture: seed,
            moisture_capacity: band_moisture * climate.capacity_scale,
            weather_cell: weather.cell_index(coord) as u32,
            weather_band: weather.band_index(coord) as u32,
        });
    }

    Composition { cells, moisture_seed }
}
