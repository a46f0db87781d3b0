//! End-to-end generation on a small world.

use glam::{UVec2, UVec3, Vec2};
use tempfile::tempdir;

use equirect_worldgen::climate::WeatherModel;
use equirect_worldgen::geometry::grid_to_lat_lon;
use equirect_worldgen::world::{EquiRectWorldGenerator, Progress, WorldDescriptors};

const GRID: u32 = 32;

fn world() -> WorldDescriptors {
    // 32 x 16 influence cells
    WorldDescriptors::new(UVec3::new(32 * GRID, 16 * GRID, 512), UVec3::splat(256), UVec3::splat(64))
}

fn generate(seed: u32) -> EquiRectWorldGenerator {
    let mut generator = EquiRectWorldGenerator::new();
    generator.descriptors_mut().seed = seed;
    generator.descriptors_mut().influence_grid_size = UVec2::splat(GRID);
    generator.create(&world(), &Progress::new()).unwrap();
    generator
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate(7);
    let b = generate(7);
    assert_eq!(
        bytemuck::cast_slice::<_, u8>(a.influence_map().cells()),
        bytemuck::cast_slice::<_, u8>(b.influence_map().cells())
    );
    assert_eq!(a.neighbors(), b.neighbors());
}

#[test]
fn test_seed_changes_world() {
    let a = generate(7);
    let b = generate(8);
    assert_ne!(a.influence_map(), b.influence_map());
}

#[test]
fn test_cell_invariants() {
    let generator = generate(3);
    let map = generator.influence_map();
    assert_eq!(map.size(), UVec2::new(32, 16));

    let plate_count = generator.plates().len() as u32;
    for cell in map.cells() {
        assert!((0.0..=1.0).contains(&cell.plate_distance_value));
        assert!((0.0..=1.0).contains(&cell.height_base));
        assert!((0.0..=1.0).contains(&cell.moisture));
        assert!((0.0..=1.0).contains(&cell.temperature));
        assert!(cell.tectonic_plate < plate_count);
        assert!(cell.border_plate < plate_count);
        if cell.is_interior() {
            assert_eq!(cell.collision, 0.0);
            assert_eq!(cell.terrain_scale, 0.0);
        }
    }

    let members: usize = generator.plates().iter().map(|p| p.area()).sum();
    assert_eq!(members, map.len());
}

#[test]
fn test_weather_indices_monotonic_per_column() {
    let generator = generate(5);
    let weather = generator.weather().unwrap();
    let size = generator.influence_size();

    for x in 0..size.x {
        // Rows run north to south, so walk them bottom-up.
        let coords: Vec<_> = (0..size.y).rev().map(|y| grid_to_lat_lon(x, y, size)).collect();
        for pair in coords.windows(2) {
            assert!(weather.cell_index(pair[0]) <= weather.cell_index(pair[1]));
            assert!(weather.band_index(pair[0]) <= weather.band_index(pair[1]));
        }
    }
}

#[test]
fn test_progress_completes() {
    let progress = Progress::new();
    let mut generator = EquiRectWorldGenerator::new();
    generator.descriptors_mut().influence_grid_size = UVec2::splat(GRID);
    generator.create(&world(), &progress).unwrap();

    let snapshot = progress.get();
    assert!(snapshot.complete);
    assert_eq!(snapshot.percent, 90);
}

#[test]
fn test_save_load_round_trip() {
    let generator = generate(11);
    let dir = tempdir().unwrap();
    generator.save(dir.path()).unwrap();

    let mut reloaded = EquiRectWorldGenerator::new();
    reloaded.descriptors_mut().seed = 11;
    reloaded.descriptors_mut().influence_grid_size = UVec2::splat(GRID);
    assert!(reloaded.load(&world(), dir.path(), &Progress::new()).unwrap());

    assert_eq!(
        bytemuck::cast_slice::<_, u8>(reloaded.influence_map().cells()),
        bytemuck::cast_slice::<_, u8>(generator.influence_map().cells())
    );
    assert_eq!(reloaded.neighbors(), generator.neighbors());

    let position = Vec2::new(500.0, 200.0);
    assert_eq!(reloaded.base_height(position), generator.base_height(position));
}

#[test]
fn test_corrupt_overview_regenerates() {
    let generator = generate(11);
    let dir = tempdir().unwrap();
    generator.save(dir.path()).unwrap();
    std::fs::write(dir.path().join("overview.bin"), b"not an overview").unwrap();

    let mut reloaded = EquiRectWorldGenerator::new();
    reloaded.descriptors_mut().seed = 11;
    reloaded.descriptors_mut().influence_grid_size = UVec2::splat(GRID);
    assert!(!reloaded.load(&world(), dir.path(), &Progress::new()).unwrap());
    assert_eq!(reloaded.influence_map(), generator.influence_map());
}
