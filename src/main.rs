//! Equirect-worldgen CLI - influence-map generator.
//!
//! Generate, reload and inspect the plate/climate influence grid of a world.

use clap::{Parser, Subcommand};
use glam::{UVec2, UVec3};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use equirect_worldgen::export::{
    export_all_layers, read_normalize_header, read_overview_header, NORMALIZE_FILE_NAME,
    OVERVIEW_FILE_NAME,
};
use equirect_worldgen::world::{
    GeneratorKind, Progress, ProgressSnapshot, WorldDescriptors, WorldGenerator,
};
use equirect_worldgen::InfluenceMap;

/// Equirectangular influence-map generator.
#[derive(Parser)]
#[command(name = "equirect-worldgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// World and generator settings shared by `generate` and `load`.
#[derive(clap::Args, Clone)]
struct WorldArgs {
    /// World width in world units (wraps east/west).
    #[arg(long, default_value = "131072")]
    width: u32,

    /// World height in world units (pole to pole).
    #[arg(long, default_value = "65536")]
    height: u32,

    /// Vertical extent; base heights are scaled by this.
    #[arg(long, default_value = "4096")]
    depth: u32,

    /// World units covered by one influence cell.
    #[arg(long, default_value = "256")]
    grid: u32,

    /// Seed for reproducible generation.
    #[arg(short, long, default_value = "1")]
    seed: u32,

    /// Generator implementation.
    #[arg(long, default_value = "EquiRectWorldGenerator")]
    generator: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new world overview and save it.
    Generate {
        #[command(flatten)]
        world: WorldArgs,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Also export grayscale PNG layers.
        #[arg(long)]
        png: bool,

        /// Base name for PNG files.
        #[arg(short, long, default_value = "world")]
        name: String,
    },

    /// Load a saved world, regenerating whatever is missing.
    Load {
        #[command(flatten)]
        world: WorldArgs,

        /// Directory holding overview.bin and normalize.bin.
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Display the headers of a saved world.
    Info {
        /// Directory holding overview.bin and normalize.bin.
        #[arg(short, long)]
        dir: PathBuf,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { world, output, png, name } => run_generate(&world, &output, png, &name),
        Commands::Load { world, dir } => run_load(&world, &dir),
        Commands::Info { dir } => run_info(&dir),
    }
}

fn build_generator(args: &WorldArgs) -> (WorldGenerator, WorldDescriptors) {
    if args.width == 0 || args.height == 0 {
        eprintln!("Error: World width and height must be positive");
        std::process::exit(1);
    }
    if args.grid == 0 {
        eprintln!("Error: Grid size must be positive");
        std::process::exit(1);
    }

    let Some(kind) = GeneratorKind::from_name(&args.generator) else {
        eprintln!("Error: Unknown generator '{}'", args.generator);
        std::process::exit(1);
    };

    let mut generator = WorldGenerator::new(kind);
    match &mut generator {
        WorldGenerator::EquiRect(equirect) => {
            let descriptors = equirect.descriptors_mut();
            descriptors.seed = args.seed;
            descriptors.influence_grid_size = UVec2::splat(args.grid);
        }
    }

    let world = WorldDescriptors::new(
        UVec3::new(args.width, args.height, args.depth),
        UVec3::splat(args.grid),
        UVec3::splat(64),
    );
    (generator, world)
}

/// Runs `task` on a worker thread, printing progress until it finishes.
fn run_with_progress<T, F>(task: F) -> T
where
    F: FnOnce(&Progress) -> T + Send + 'static,
    T: Send + 'static,
{
    let progress = Arc::new(Progress::new());
    let worker_progress = Arc::clone(&progress);
    let handle = thread::spawn(move || task(&worker_progress));

    let mut last = ProgressSnapshot::default();
    loop {
        let finished = handle.is_finished();
        let snapshot = progress.get();
        if snapshot != last {
            println!("  [{:>3}%] {}", snapshot.percent, snapshot.status);
            last = snapshot;
        }
        if finished {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    match handle.join() {
        Ok(result) => result,
        Err(_) => {
            eprintln!("Error: Generation thread panicked");
            std::process::exit(1);
        }
    }
}

fn run_generate(args: &WorldArgs, output: &Path, png: bool, name: &str) {
    let (mut generator, world) = build_generator(args);

    println!("Equirect-worldgen - Influence Map Generator");
    println!("===========================================");
    println!("World: {}x{}x{}", args.width, args.height, args.depth);
    println!("Seed: {}", args.seed);
    println!("Output: {}", output.display());

    let start = Instant::now();
    let (generator, result) = run_with_progress(move |progress| {
        let result = generator.create(&world, progress);
        (generator, result)
    });
    if let Err(e) = result {
        eprintln!("Error during generation: {}", e);
        std::process::exit(1);
    }
    println!("Generation completed in {:.2?}", start.elapsed());

    let WorldGenerator::EquiRect(equirect) = &generator;
    print_summary(equirect.influence_map());

    if let Err(e) = generator.save(output) {
        eprintln!("Error saving world: {}", e);
        std::process::exit(1);
    }
    println!("Saved {} and {}", OVERVIEW_FILE_NAME, NORMALIZE_FILE_NAME);

    if png {
        let export_start = Instant::now();
        if let Err(e) = export_all_layers(equirect.influence_map(), output, name) {
            eprintln!("Error exporting PNG: {}", e);
            std::process::exit(1);
        }
        println!("Exported PNG layers: {}_*.png in {:.2?}", name, export_start.elapsed());
    }
}

fn run_load(args: &WorldArgs, dir: &Path) {
    let (mut generator, world) = build_generator(args);
    let dir_owned = dir.to_path_buf();

    let start = Instant::now();
    let (generator, result) = run_with_progress(move |progress| {
        let result = generator.load(&world, &dir_owned, progress);
        (generator, result)
    });

    match result {
        Ok(true) => println!("Loaded world from {} in {:.2?}", dir.display(), start.elapsed()),
        Ok(false) => println!("Regenerated missing data in {:.2?}", start.elapsed()),
        Err(e) => {
            eprintln!("Error loading world: {}", e);
            std::process::exit(1);
        }
    }

    let WorldGenerator::EquiRect(equirect) = &generator;
    print_summary(equirect.influence_map());
}

fn run_info(dir: &Path) {
    println!("World directory: {}", dir.display());

    match read_overview_header(&dir.join(OVERVIEW_FILE_NAME)) {
        Ok(header) => {
            println!("Overview:");
            println!("  Version: {}", header.version);
            println!("  Grid: {}x{}", header.width, header.height);
            println!("  Cell size: {} bytes", header.cell_size);
            println!("  Payload: {} bytes", header.total_size);
        }
        Err(e) => println!("Overview: unavailable ({})", e),
    }

    match read_normalize_header(&dir.join(NORMALIZE_FILE_NAME)) {
        Ok(header) => {
            println!("Normalize:");
            println!("  Version: {}", header.version);
            println!("  Floats: {}", header.float_count);
        }
        Err(e) => println!("Normalize: unavailable ({})", e),
    }
}

fn print_summary(map: &InfluenceMap) {
    let cells = map.cells();
    if cells.is_empty() {
        println!("Influence map is empty");
        return;
    }

    let (min_h, max_h) = cells
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), c| (lo.min(c.height_base), hi.max(c.height_base)));
    let land = cells.iter().filter(|c| c.height_base > 0.5).count();
    let boundary = cells.iter().filter(|c| !c.is_interior()).count();
    let moisture = cells.iter().map(|c| c.moisture).sum::<f32>() / cells.len() as f32;

    println!("Influence grid: {}x{}", map.size().x, map.size().y);
    println!("Plates: {}", map.plate_count());
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);
    println!("Land: {:.1}%", land as f32 / cells.len() as f32 * 100.0);
    println!("Boundary cells: {}", boundary);
    println!("Mean moisture: {:.3}", moisture);
}
