//! Headless terrain runner.
//!
//! # Usage
//!
//! ```bash
//! # Preview a map as an ASCII minimap
//! cargo run -p terrain_headless -- generate --seed 42 --shrink 6
//!
//! # Preview with a config file and dump stats as JSON
//! cargo run -p terrain_headless -- generate --config assets/config/compact.ron --json
//!
//! # Batch run over consecutive seeds
//! cargo run -p terrain_headless -- batch --count 1000 --seed 0 --output results/
//!
//! # Verify a seed reproduces
//! cargo run -p terrain_headless -- verify --seed 12345 --runs 5
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use terrain_core::prelude::*;
use terrain_headless::{
    ascii_visualizer::{render_minimap, AsciiConfig},
    batch::{run_batch, verify_determinism, BatchConfig},
    metrics::MapMetrics,
};

#[derive(Parser)]
#[command(name = "terrain_headless")]
#[command(about = "Headless terrain generator for previews and batch runs")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generation params file (RON); defaults to the standard preset
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use the compact preset instead of the standard one
    #[arg(long, global = true, conflicts_with = "config")]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one map and print its minimap
    Generate {
        /// Seed (defaults to the seed in the params)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Tiles per minimap character
        #[arg(long, default_value = "6")]
        shrink: u32,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Print map metrics as JSON instead of the minimap
        #[arg(long)]
        json: bool,
    },

    /// Generate many maps in parallel and write aggregate results
    Batch {
        /// Number of maps to generate
        #[arg(short = 'n', long, default_value = "100")]
        count: u32,

        /// Maximum parallel generations (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Seed of the first map
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Verify determinism by generating the same seed multiple times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries minimaps and JSON
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let params = match load_params(cli.config.as_deref(), cli.compact) {
        Ok(params) => params,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load generation params");
            eprintln!("FATAL: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Generate {
            seed,
            shrink,
            no_color,
            json,
        } => cmd_generate(params, seed, shrink, !no_color, json),
        Commands::Batch {
            count,
            parallel,
            output,
            seed,
        } => cmd_batch(params, count, parallel, &output, seed),
        Commands::Verify { seed, runs } => cmd_verify(&params, seed, runs),
    }
}

fn load_params(path: Option<&Path>, compact: bool) -> Result<GenerationParams> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading generation params");
            GenerationParams::load(path)
        }
        None if compact => Ok(GenerationParams::compact()),
        None => Ok(GenerationParams::standard()),
    }
}

/// Generate one map and print it
fn cmd_generate(
    params: GenerationParams,
    seed: Option<u64>,
    shrink: u32,
    use_color: bool,
    json: bool,
) -> ExitCode {
    let seed = seed.unwrap_or(params.seed);
    let generator = match TerrainGenerator::new(params) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Invalid params: {e}");
            return ExitCode::FAILURE;
        }
    };

    let start = std::time::Instant::now();
    let map = match generator.generate_seeded(seed) {
        Ok(map) => map,
        Err(e) => {
            tracing::error!(error = %e, seed, "Generation failed");
            eprintln!("Generation failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let metrics = MapMetrics::from_map(0, seed, &map, start.elapsed().as_secs_f64() * 1000.0);

    tracing::info!(
        seed,
        passable = format!("{:.1}%", metrics.stats.passable_fraction * 100.0),
        isolated_obstacles = metrics.stats.isolated_obstacles,
        spawn_passable = metrics.spawn_passable,
        duration_ms = format!("{:.1}", metrics.duration_ms),
        "Map statistics"
    );

    if json {
        match serde_json::to_string_pretty(&metrics) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to serialize metrics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let config = AsciiConfig {
            shrink,
            use_color,
            ..Default::default()
        };
        print!("{}", render_minimap(&map, &config));
    }
    ExitCode::SUCCESS
}

/// Run a batch of generations
fn cmd_batch(
    params: GenerationParams,
    count: u32,
    parallel: u32,
    output: &Path,
    seed: u64,
) -> ExitCode {
    let num_cpus = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);

    tracing::info!(
        count,
        parallel,
        seed,
        output = %output.display(),
        cpus_available = num_cpus,
        "Batch configuration"
    );

    if let Err(e) = std::fs::create_dir_all(output) {
        tracing::error!(error = %e, path = %output.display(), "Failed to create output directory");
        eprintln!(
            "FATAL: Cannot create output directory '{}': {}",
            output.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let config = BatchConfig {
        params,
        map_count: count,
        parallel_maps: parallel,
        output_dir: output.to_path_buf(),
        seed_start: seed,
    };
    let results = run_batch(config);

    let results_path = output.join("batch_results.json");
    if let Err(e) = results.save(&results_path) {
        tracing::error!(error = %e, path = %results_path.display(), "Failed to save results");
        eprintln!("FATAL: Failed to save results: {e}");
        return ExitCode::FAILURE;
    }

    let summary = &results.summary;
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BATCH COMPLETE");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Maps generated: {}", results.maps.len());
    if !results.errors.is_empty() {
        eprintln!("Maps FAILED: {}", results.errors.len());
    }
    eprintln!("Duration: {:.1}s", results.duration_seconds);
    eprintln!(
        "Average size: {:.0}x{:.0} tiles",
        summary.avg_width, summary.avg_height
    );
    eprintln!(
        "Passable: avg {:.1}% (min {:.1}%, max {:.1}%)",
        summary.avg_passable_fraction * 100.0,
        summary.min_passable_fraction * 100.0,
        summary.max_passable_fraction * 100.0
    );
    eprintln!("\nTerrain mix:");
    for code in TileCode::ALL {
        eprintln!(
            "  {:?}: {:.1}%",
            code,
            summary.code_fractions[code.index()] * 100.0
        );
    }
    eprintln!("Void spawns: {}", summary.void_spawns);
    eprintln!("Distinct maps: {}", summary.unique_maps);

    if !results.errors.is_empty() {
        eprintln!("\nFAILURES:");
        for error in results.errors.iter().take(10) {
            eprintln!(
                "  Map {} (seed {}): {}",
                error.map_index, error.seed, error.message
            );
        }
        if results.errors.len() > 10 {
            eprintln!("  ... and {} more failures", results.errors.len() - 10);
        }
    }

    eprintln!("\nResults saved to: {}", results_path.display());
    if results.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Verify a seed reproduces the same map
fn cmd_verify(params: &GenerationParams, seed: u64, runs: u32) -> ExitCode {
    tracing::info!(seed, runs, "Verifying determinism");

    if verify_determinism(params, seed, runs) {
        eprintln!("Determinism verified: {runs} runs of seed {seed} matched");
        ExitCode::SUCCESS
    } else {
        eprintln!("Determinism FAILED for seed {seed}");
        ExitCode::FAILURE
    }
}
