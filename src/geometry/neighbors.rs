//! Cylindrical grid neighbor mapping.
//!
//! Columns wrap across the longitude seam; rows clamp at the poles.

use glam::UVec2;

/// Wraps a column offset across the longitude seam.
pub fn wrap_x(x: i64, width: u32) -> u32 {
    x.rem_euclid(width as i64) as u32
}

/// Clamps a row offset to the grid.
pub fn clamp_y(y: i64, height: u32) -> u32 {
    y.clamp(0, height as i64 - 1) as u32
}

/// Returns the 3x3 neighborhood of `(x, y)` as row-major linear indices.
///
/// Index 4 is the cell itself; index 0 is `(x-1, y-1)` and index 8 is `(x+1, y+1)`.
pub fn neighbors_3x3(x: u32, y: u32, size: UVec2) -> [usize; 9] {
    debug_assert!(x < size.x && y < size.y);
    let mut out = [0usize; 9];
    let mut k = 0;
    for dy in -1i64..=1 {
        let ny = clamp_y(y as i64 + dy, size.y);
        for dx in -1i64..=1 {
            let nx = wrap_x(x as i64 + dx, size.x);
            out[k] = (ny * size.x + nx) as usize;
            k += 1;
        }
    }
    out
}

/// Returns the neighbor of `(x, y)` at offset `(dx, dy)`, or `None` past the poles.
pub fn offset_cell(x: u32, y: u32, dx: i32, dy: i32, size: UVec2) -> Option<(u32, u32)> {
    let ny = y as i64 + dy as i64;
    if ny < 0 || ny >= size.y as i64 {
        return None;
    }
    Some((wrap_x(x as i64 + dx as i64, size.x), ny as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_neighbors() {
        let size = UVec2::new(4, 4);
        let n = neighbors_3x3(1, 1, size);
        assert_eq!(n, [0, 1, 2, 4, 5, 6, 8, 9, 10]);
    }

    #[test]
    fn test_seam_wraps_columns() {
        let size = UVec2::new(4, 3);
        let n = neighbors_3x3(0, 1, size);
        assert_eq!(n[3], 7, "left neighbor of column 0 should be column 3");
        assert_eq!(n[5], 5);
    }

    #[test]
    fn test_poles_clamp_rows() {
        let size = UVec2::new(4, 3);
        let n = neighbors_3x3(2, 0, size);
        assert_eq!(&n[0..3], &n[3..6], "row above the north pole clamps to row 0");
        let n = neighbors_3x3(2, 2, size);
        assert_eq!(&n[6..9], &n[3..6]);
    }

    #[test]
    fn test_offset_cell() {
        let size = UVec2::new(4, 3);
        assert_eq!(offset_cell(3, 1, 1, 0, size), Some((0, 1)));
        assert_eq!(offset_cell(0, 0, 0, -1, size), None);
        assert_eq!(offset_cell(0, 2, 0, 1, size), None);
    }
}
