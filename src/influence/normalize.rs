//! Neighbor-normalization table for smooth sub-cell height sampling.
//!
//! For every cell, four floats hold the mean height of each 2x2 quadrant of
//! its 3x3 neighborhood: top-left, top-right, bottom-left, bottom-right. They
//! are the heights at the cell's four corners.

use glam::Vec2;

use super::map::InfluenceMap;
use crate::geometry::neighbors::neighbors_3x3;

/// Neighborhood slots forming each corner quadrant.
const QUADRANTS: [[usize; 4]; 4] = [[0, 1, 3, 4], [1, 2, 4, 5], [3, 4, 6, 7], [4, 5, 7, 8]];

/// Four corner heights per influence cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborMap {
    values: Vec<f32>,
}

impl NeighborMap {
    pub const FLOATS_PER_CELL: usize = 4;

    /// Derives the table from the composed heights of `map`.
    pub fn from_influence(map: &InfluenceMap) -> Self {
        let size = map.size();
        let cells = map.cells();
        let mut values = Vec::with_capacity(cells.len() * Self::FLOATS_PER_CELL);

        for y in 0..size.y {
            for x in 0..size.x {
                let neighbors = neighbors_3x3(x, y, size);
                for quadrant in QUADRANTS {
                    let sum: f32 = quadrant.iter().map(|&k| cells[neighbors[k]].height_base).sum();
                    values.push(sum * 0.25);
                }
            }
        }

        Self { values }
    }

    /// Wraps a raw table, e.g. one read from disk.
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether this table matches a grid of `cell_count` cells.
    pub fn matches(&self, cell_count: usize) -> bool {
        self.values.len() == cell_count * Self::FLOATS_PER_CELL
    }

    /// Corner heights of cell `index`.
    pub fn corners(&self, index: usize) -> [f32; 4] {
        let base = index * Self::FLOATS_PER_CELL;
        [
            self.values[base],
            self.values[base + 1],
            self.values[base + 2],
            self.values[base + 3],
        ]
    }

    /// Bilinear height inside cell `index`; `offset` is in `[0, 1]²` from the top-left corner.
    pub fn sample(&self, index: usize, offset: Vec2) -> f32 {
        let [top_left, top_right, bottom_left, bottom_right] = self.corners(index);
        bi_lerp(top_left, top_right, bottom_left, bottom_right, offset)
    }
}

fn bi_lerp(top_left: f32, top_right: f32, bottom_left: f32, bottom_right: f32, t: Vec2) -> f32 {
    let top = top_left + (top_right - top_left) * t.x;
    let bottom = bottom_left + (bottom_right - bottom_left) * t.x;
    top + (bottom - top) * t.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influence::InfluenceCell;
    use approx::assert_abs_diff_eq;
    use glam::UVec2;

    fn map_from_heights(size: UVec2, heights: &[f32]) -> InfluenceMap {
        let cells = heights
            .iter()
            .map(|&h| InfluenceCell { height_base: h, ..Default::default() })
            .collect();
        InfluenceMap::new(size, cells)
    }

    #[test]
    fn test_flat_map_is_flat() {
        let map = map_from_heights(UVec2::new(4, 3), &[0.4; 12]);
        let table = NeighborMap::from_influence(&map);
        assert!(table.matches(12));
        for v in table.values() {
            assert_abs_diff_eq!(*v, 0.4, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_quadrant_averages() {
        // 3x3 grid, heights 0..9 row-major; centre cell sees the whole grid.
        let heights: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let map = map_from_heights(UVec2::new(3, 3), &heights);
        let table = NeighborMap::from_influence(&map);
        let corners = table.corners(4);
        assert_abs_diff_eq!(corners[0], (0.0 + 1.0 + 3.0 + 4.0) / 4.0);
        assert_abs_diff_eq!(corners[1], (1.0 + 2.0 + 4.0 + 5.0) / 4.0);
        assert_abs_diff_eq!(corners[2], (3.0 + 4.0 + 6.0 + 7.0) / 4.0);
        assert_abs_diff_eq!(corners[3], (4.0 + 5.0 + 7.0 + 8.0) / 4.0);
    }

    #[test]
    fn test_seam_neighbors_wrap() {
        let heights = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let map = map_from_heights(UVec2::new(4, 3), &heights);
        let table = NeighborMap::from_influence(&map);
        // Column 3 sees column 0 on its right.
        let corners = table.corners(4 + 3);
        assert_abs_diff_eq!(corners[1], 0.5);
        assert_abs_diff_eq!(corners[0], 0.0);
    }

    #[test]
    fn test_sample_hits_corners() {
        let table = NeighborMap::from_values(vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(table.sample(0, Vec2::ZERO), 0.0);
        assert_eq!(table.sample(0, Vec2::new(1.0, 0.0)), 1.0);
        assert_eq!(table.sample(0, Vec2::new(0.0, 1.0)), 2.0);
        assert_eq!(table.sample(0, Vec2::ONE), 3.0);
        assert_abs_diff_eq!(table.sample(0, Vec2::splat(0.5)), 1.5);
    }
}
