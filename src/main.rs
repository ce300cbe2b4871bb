//! Planetgen CLI - Procedural planet generator.
//!
//! Generates a planet surface from a seed, saves it in the binary planet
//! format and renders PNG previews of each layer.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use planetgen::biomes::Biome;
use planetgen::config::PlanetConfig;
use planetgen::export::{export_all, load_planet, save_planet, PngExportOptions};
use planetgen::random::RandomSource;
use planetgen::terrain::Planet;

/// Procedural Earth-like planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new planet.
    Generate {
        /// Map width and height in cells. Defaults to 512, or the config file's size.
        #[arg(long)]
        size: Option<u32>,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Planet name, also used as the output file stem.
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Fraction of the surface below sea level (0-1, exclusive).
        #[arg(long)]
        sea_level: Option<f32>,

        /// Number of tectonic plates. Randomised (7-12) when omitted.
        #[arg(long)]
        plates: Option<u32>,

        /// Continental noise octaves.
        #[arg(long)]
        octaves: Option<u32>,

        /// Height of boundary ridges.
        #[arg(long)]
        mountain_scale: Option<f32>,

        /// Number of erosion particles. Defaults to size x 100.
        #[arg(long)]
        erosion_iterations: Option<u32>,

        /// TOML config file. Command-line options override its values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip PNG export.
        #[arg(long)]
        no_images: bool,
    },

    /// Display information about a saved planet.
    Info {
        /// Path to a `.planet` file.
        file: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            size,
            seed,
            name,
            output,
            sea_level,
            plates,
            octaves,
            mountain_scale,
            erosion_iterations,
            config,
            no_images,
        } => run_generate(GenerateArgs {
            size,
            seed,
            name,
            output,
            sea_level,
            plates,
            octaves,
            mountain_scale,
            erosion_iterations,
            config,
            no_images,
        }),
        Commands::Info { file } => run_info(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

const DEFAULT_SIZE: u32 = 512;

struct GenerateArgs {
    size: Option<u32>,
    seed: Option<u64>,
    name: Option<String>,
    output: PathBuf,
    sea_level: Option<f32>,
    plates: Option<u32>,
    octaves: Option<u32>,
    mountain_scale: Option<f32>,
    erosion_iterations: Option<u32>,
    config: Option<PathBuf>,
    no_images: bool,
}

fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    // The plate-count draw for randomised configs comes from the same stream
    // as generation, so the source is created before the config.
    let (mut config, mut rng) = match &args.config {
        Some(path) => {
            let mut config = PlanetConfig::load(path)?;
            if let Some(seed) = args.seed {
                config.seed = seed;
            }
            if let Some(size) = args.size {
                config.set_size(size, size);
            }
            let rng = RandomSource::new(config.seed);
            (config, rng)
        }
        None => {
            let seed = args.seed.unwrap_or_else(time_seed);
            let name = args.name.as_deref().unwrap_or("Terra");
            let mut rng = RandomSource::new(seed);
            let size = args.size.unwrap_or(DEFAULT_SIZE);
            let config = PlanetConfig::randomized(name, seed, size, &mut rng);
            (config, rng)
        }
    };

    if let Some(name) = args.name {
        config.name = name;
    }
    if let Some(sea_level) = args.sea_level {
        config.set_sea_level(sea_level);
    }
    if let Some(plates) = args.plates {
        config.terrain.num_plates = plates;
    }
    if let Some(octaves) = args.octaves {
        config.terrain.fbm_octaves = octaves;
    }
    if let Some(scale) = args.mountain_scale {
        config.terrain.mountain_scale = scale;
    }
    if let Some(iterations) = args.erosion_iterations {
        config.terrain.erosion_iterations = iterations;
    }

    println!("Planetgen - Procedural Planet Generator");
    println!("=======================================");
    println!("Name: {}", config.name);
    println!("Size: {}x{}", config.terrain.width, config.terrain.height);
    println!("Seed: {}", rng.seed());
    println!("Plates: {}", config.terrain.num_plates);
    println!("Output: {}", args.output.display());

    let start = Instant::now();
    let planet = Planet::generate(&config, &mut rng)?;
    println!("Generation completed in {:.2?}", start.elapsed());

    std::fs::create_dir_all(&args.output)?;
    let planet_path = args.output.join(format!("{}.planet", config.name));
    save_planet(&planet, &planet_path)?;
    println!("  Saved {}", planet_path.display());

    if !args.no_images {
        let export_start = Instant::now();
        let written = export_all(&planet, &args.output, &config.name, &PngExportOptions::default())?;
        println!(
            "  Exported {} PNG files: {}_*.png in {:.2?}",
            written.len(),
            config.name,
            export_start.elapsed()
        );
    }

    println!();
    print_summary(&planet);
    println!("\nTotal time: {:.2?}", start.elapsed());
    Ok(())
}

fn run_info(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut planet = load_planet(path)?;
    planet.classify_biomes();

    println!("Planetgen - Planet Info");
    println!("=======================");
    println!("File: {}", path.display());
    print_summary(&planet);
    Ok(())
}

fn print_summary(planet: &Planet) {
    let cells = planet.biomes().len().max(1) as f64;

    println!("Name:            {}", planet.name());
    println!("Size:            {}x{}", planet.width(), planet.height());
    println!("Sea level:       {:.3}", planet.sea_level());
    println!("Land:            {:.1}%", planet.land_fraction() * 100.0);
    println!("Avg temperature: {:.1} C", planet.avg_temperature());
    println!("Avg moisture:    {:.3}", planet.avg_moisture());
    println!(
        "Elevation range: [{:.4}, {:.4}]",
        planet.elevation().min_value(),
        planet.elevation().max_value()
    );
    println!();
    println!("Biomes:");
    for (biome, count) in Biome::ALL.iter().zip(planet.biome_histogram()) {
        if count == 0 {
            continue;
        }
        println!(
            "  {:<22} {:>10} cells ({:5.1}%)",
            biome.name(),
            count,
            count as f64 / cells * 100.0
        );
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
