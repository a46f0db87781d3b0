//! The influence grid.

use glam::UVec2;

use super::cell::InfluenceCell;

/// Row-major grid of influence cells; row 0 is the north pole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluenceMap {
    size: UVec2,
    cells: Vec<InfluenceCell>,
}

impl InfluenceMap {
    /// Wraps `cells` as a grid of `size`.
    ///
    /// # Panics
    /// If `cells.len()` is not `size.x * size.y`.
    pub fn new(size: UVec2, cells: Vec<InfluenceCell>) -> Self {
        assert_eq!(
            cells.len(),
            (size.x * size.y) as usize,
            "influence cell count must match grid size"
        );
        Self { size, cells }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[InfluenceCell] {
        &self.cells
    }

    pub fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.size.x && y < self.size.y);
        (y * self.size.x + x) as usize
    }

    pub fn get(&self, x: u32, y: u32) -> &InfluenceCell {
        &self.cells[self.index(x, y)]
    }

    /// Number of plates referenced by the grid.
    pub fn plate_count(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.tectonic_plate as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Copies one scalar attribute out of every cell.
    pub fn layer<F>(&self, attribute: F) -> Vec<f32>
    where
        F: Fn(&InfluenceCell) -> f32,
    {
        self.cells.iter().map(attribute).collect()
    }
}
