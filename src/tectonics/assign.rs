//! Assigns influence cells to plates and builds the plate table.

use glam::UVec2;
use rand::Rng;
use tracing::debug;

use super::collision::resolve_collisions;
use super::config::TectonicConfig;
use super::identity::PlateIdentitySet;
use super::plate::PlateInfo;

/// Raw per-cell plate fields, row-major over the influence grid.
#[derive(Debug, Clone, Copy)]
pub struct PlateFields<'a> {
    /// Nearest plate identity value.
    pub plate: &'a [f32],
    /// Second-nearest plate identity value.
    pub border: &'a [f32],
    /// Nearest/second-nearest distance ratio.
    pub distance: &'a [f32],
}

/// Plate membership of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlate {
    pub plate: usize,
    pub border: usize,
    /// Boundary distance normalized to `[0, 1]` against the plate's own range.
    pub distance: f32,
}

/// Result of plate assignment over a grid.
#[derive(Debug, Clone)]
pub struct PlateAssignment {
    pub size: UVec2,
    pub identities: PlateIdentitySet,
    pub cells: Vec<CellPlate>,
    pub plates: Vec<PlateInfo>,
}

impl PlateAssignment {
    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    /// Collision magnitude for a cell's `(plate, border)` pair; 0 for interior cells.
    pub fn collision(&self, plate: usize, border: usize) -> f32 {
        if plate == border {
            return 0.0;
        }
        self.plates[plate].collision_with(border).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct DistanceRange {
    min: f32,
    min_point: UVec2,
    max: f32,
}

impl DistanceRange {
    const EMPTY: DistanceRange = DistanceRange {
        min: f32::MAX,
        min_point: UVec2::ZERO,
        max: f32::MIN,
    };

    fn include(&mut self, distance: f32, point: UVec2) {
        if distance < self.min {
            self.min = distance;
            self.min_point = point;
        }
        self.max = self.max.max(distance);
    }

    fn normalize(&self, distance: f32) -> f32 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((distance - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Clusters grid cells into plates.
///
/// Distinct plate values become plates in ascending value order. A border
/// value that never owns a cell folds into the cell's own plate. Plates draw
/// their drift from `rng` in index order, so a seeded generator gives a
/// reproducible table.
///
/// # Arguments
/// * `size` - Influence grid size
/// * `fields` - Plate noise fields, each `size.x * size.y` long
/// * `config` - Plate model constants
/// * `rng` - Drift direction source
///
/// # Panics
/// If any field length differs from the cell count.
pub fn assign_plates<R: Rng + ?Sized>(
    size: UVec2,
    fields: PlateFields<'_>,
    config: &TectonicConfig,
    rng: &mut R,
) -> PlateAssignment {
    let cell_count = (size.x * size.y) as usize;
    assert_eq!(fields.plate.len(), cell_count, "plate field size");
    assert_eq!(fields.border.len(), cell_count, "border field size");
    assert_eq!(fields.distance.len(), cell_count, "distance field size");

    let identities = PlateIdentitySet::from_values(fields.plate);
    let plate_count = identities.len();

    let mut adjacency = vec![false; plate_count * plate_count];
    let mut ranges = vec![DistanceRange::EMPTY; plate_count];
    let mut members: Vec<Vec<UVec2>> = vec![Vec::new(); plate_count];
    let mut indices = Vec::with_capacity(cell_count);

    for i in 0..cell_count {
        let point = UVec2::new(i as u32 % size.x, i as u32 / size.x);
        let Some(plate) = identities.index_of(fields.plate[i]) else {
            unreachable!("plate value missing from the set built from it");
        };
        let border = identities.index_of(fields.border[i]).unwrap_or(plate);

        if plate != border {
            adjacency[plate * plate_count + border] = true;
            adjacency[border * plate_count + plate] = true;
        }

        ranges[plate].include(fields.distance[i], point);
        members[plate].push(point);
        indices.push((plate, border));
    }

    let mut plates: Vec<PlateInfo> = members
        .into_iter()
        .enumerate()
        .map(|(index, points)| {
            let value = identities.values()[index];
            let mut plate = PlateInfo::new(
                value,
                ranges[index].min_point,
                size,
                config.plate_height(value),
                &mut *rng,
            );
            plate.neighbors = (0..plate_count)
                .filter(|&other| adjacency[index * plate_count + other])
                .collect();
            plate.points = points;
            plate
        })
        .collect();

    let converging = resolve_collisions(&mut plates, config);
    debug!(plates = plate_count, converging, "assigned plates");

    let cells = indices
        .into_iter()
        .enumerate()
        .map(|(i, (plate, border))| CellPlate {
            plate,
            border,
            distance: ranges[plate].normalize(fields.distance[i]),
        })
        .collect();

    PlateAssignment { size, identities, cells, plates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 8x4 grid split into three vertical plates: columns 0-2, 3-5, 6-7.
    fn three_plate_fields() -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        let column_value = |x: u32| match x {
            0..=2 => -0.5,
            3..=5 => 0.25,
            _ => 0.75,
        };
        let mut plate = Vec::new();
        let mut border = Vec::new();
        let mut distance = Vec::new();
        for _y in 0..4u32 {
            for x in 0..8u32 {
                plate.push(column_value(x));
                border.push(match x {
                    2 => column_value(3),
                    3 => column_value(2),
                    5 => column_value(6),
                    6 => column_value(5),
                    // Unseen identity: folds into the own plate.
                    7 => 0.9,
                    _ => column_value(x),
                });
                distance.push(0.1 * x as f32);
            }
        }
        (plate, border, distance)
    }

    fn assign_three() -> PlateAssignment {
        let (plate, border, distance) = three_plate_fields();
        let fields = PlateFields { plate: &plate, border: &border, distance: &distance };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assign_plates(UVec2::new(8, 4), fields, &TectonicConfig::default(), &mut rng)
    }

    #[test]
    fn test_three_distinct_values_make_three_plates() {
        let result = assign_three();
        assert_eq!(result.plate_count(), 3);
        assert!(result.cells.iter().all(|c| c.plate < 3 && c.border < 3));
    }

    #[test]
    fn test_membership_covers_grid() {
        let result = assign_three();
        let total: usize = result.plates.iter().map(|p| p.area()).sum();
        assert_eq!(total, 32);
    }

    #[test]
    fn test_unseen_border_folds_into_own_plate() {
        let result = assign_three();
        let cell = result.cells[7];
        assert_eq!(cell.plate, cell.border);
        assert_eq!(result.collision(cell.plate, cell.border), 0.0);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let result = assign_three();
        assert_eq!(result.plates[0].neighbors, vec![1]);
        assert_eq!(result.plates[1].neighbors, vec![0, 2]);
        assert_eq!(result.plates[2].neighbors, vec![1]);
        assert_eq!(
            result.collision(0, 1),
            result.plates[1].collision_with(0).unwrap_or(f32::NAN)
        );
    }

    #[test]
    fn test_distance_normalized_per_plate() {
        let result = assign_three();
        for cell in &result.cells {
            assert!((0.0..=1.0).contains(&cell.distance));
        }
        // Plate 1 spans columns 3..=5: raw 0.3..0.5.
        assert_eq!(result.cells[3].distance, 0.0);
        assert_eq!(result.cells[5].distance, 1.0);
        assert_eq!(result.plates[1].point, UVec2::new(3, 0));
    }

    #[test]
    fn test_reproducible_with_same_rng_seed() {
        let a = assign_three();
        let b = assign_three();
        for (pa, pb) in a.plates.iter().zip(&b.plates) {
            assert_eq!(pa.drift, pb.drift);
            assert_eq!(pa.collisions, pb.collisions);
        }
    }
}
