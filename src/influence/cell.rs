//! Per-cell influence record.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One influence grid cell.
///
/// Plain-old-data with only 4-byte fields, so it has no padding and is
/// persisted as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct InfluenceCell {
    /// Index of the owning plate.
    pub tectonic_plate: u32,
    /// Index of the nearest other plate; equals `tectonic_plate` for interior cells.
    pub border_plate: u32,
    /// Raw plate identity value.
    pub plate_value: f32,
    /// Raw continent identity value.
    pub continent_value: f32,
    /// Boundary distance normalized per plate to `[0, 1]`.
    pub plate_distance_value: f32,
    /// Pseudo-elevation of the owning plate.
    pub plate_height: f32,
    /// Plate drift `(east, north)` at this cell.
    pub direction: Vec2,
    /// Prevailing wind `(east, north)` at this cell.
    pub air_direction: Vec2,
    /// Signed boundary interaction: negative divergent, positive convergent, 0 interior.
    pub collision: f32,
    /// Composed elevation in `[0, 1]`.
    pub height_base: f32,
    /// Boundary terrain profile value.
    pub terrain_scale: f32,
    /// Normalized temperature in `[0, 1]`.
    pub temperature: f32,
    /// Final moisture in `[0, 1]`.
    pub moisture: f32,
    /// Moisture the cell can pass on per sweep.
    pub moisture_capacity: f32,
    /// Circulation cell index.
    pub weather_cell: u32,
    /// Moisture band index.
    pub weather_band: u32,
}

impl InfluenceCell {
    /// Size in bytes of one persisted record.
    pub const BYTE_SIZE: usize = std::mem::size_of::<InfluenceCell>();

    pub fn is_interior(&self) -> bool {
        self.tectonic_plate == self.border_plate
    }
}
