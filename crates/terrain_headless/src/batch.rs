//! Batch map generator for parameter tuning.
//!
//! Generates many maps in parallel using rayon to see how a parameter set
//! behaves across seeds.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use terrain_core::config::GenerationParams;
use terrain_core::generator::TerrainGenerator;
use tracing::{debug, info, warn};

use crate::metrics::{BatchSummary, MapMetrics};

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Parameters every map is generated with (the seed is overridden)
    pub params: GenerationParams,
    /// Number of maps to generate
    pub map_count: u32,
    /// Maximum parallel generations (0 = use rayon default)
    pub parallel_maps: u32,
    /// Output directory for results
    pub output_dir: PathBuf,
    /// Seed of the first map; map `i` uses `seed_start + i`
    pub seed_start: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            params: GenerationParams::default(),
            map_count: 100,
            parallel_maps: 0,
            output_dir: PathBuf::from("results"),
            seed_start: 0,
        }
    }
}

impl BatchConfig {
    /// Create config for a parameter set
    pub fn new(params: GenerationParams, map_count: u32) -> Self {
        Self {
            params,
            map_count,
            ..Default::default()
        }
    }

    /// Set output directory
    pub fn with_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set seed start
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Seed used for map `index`.
    #[must_use]
    pub fn seed_for(&self, index: u32) -> u64 {
        self.seed_start.wrapping_add(u64::from(index))
    }
}

/// Results from a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// Individual map metrics, in index order
    pub maps: Vec<MapMetrics>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Errors encountered
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Error during batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// Map index
    pub map_index: u32,
    /// Seed used
    pub seed: u64,
    /// Error message
    pub message: String,
}

/// Progress tracking for batch runs
#[derive(Debug)]
pub struct BatchProgress {
    /// Total maps
    pub total: u32,
    completed: AtomicU32,
    start_time: Instant,
}

impl BatchProgress {
    /// Create new progress tracker
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: AtomicU32::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a finished map and return the new completion count
    pub fn record_completion(&self) -> u32 {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get current completion count
    pub fn current(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        f64::from(self.current()) / f64::from(self.total.max(1)) * 100.0
    }

    /// Get estimated time remaining
    pub fn eta(&self) -> Duration {
        let completed = self.current();
        if completed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.start_time.elapsed();
        let per_map = elapsed.as_secs_f64() / f64::from(completed);
        let remaining = self.total.saturating_sub(completed);
        Duration::from_secs_f64(per_map * f64::from(remaining))
    }
}

/// Generate one map of the batch.
fn run_single_map(
    generator: &TerrainGenerator,
    index: u32,
    seed: u64,
) -> Result<MapMetrics, String> {
    let start = Instant::now();
    let map = generator.generate_seeded(seed).map_err(|e| e.to_string())?;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok(MapMetrics::from_map(index, seed, &map, duration_ms))
}

/// Run a batch of generations.
///
/// Invalid params fail every map; each failure is recorded in
/// [`BatchResults::errors`] rather than aborting the batch.
pub fn run_batch(config: BatchConfig) -> BatchResults {
    let start = Instant::now();

    info!(
        maps = config.map_count,
        seed_start = config.seed_start,
        "Starting batch run"
    );

    let generator = match TerrainGenerator::new(config.params.clone()) {
        Ok(generator) => generator,
        Err(e) => {
            warn!(error = %e, "Batch params rejected");
            let errors = (0..config.map_count)
                .map(|i| BatchError {
                    map_index: i,
                    seed: config.seed_for(i),
                    message: e.to_string(),
                })
                .collect();
            return BatchResults {
                config,
                maps: Vec::new(),
                summary: BatchSummary::default(),
                duration_seconds: start.elapsed().as_secs_f64(),
                errors,
            };
        }
    };

    let progress = BatchProgress::new(config.map_count);
    let generate_all = || -> Vec<Result<MapMetrics, BatchError>> {
        (0..config.map_count)
            .into_par_iter()
            .map(|i| {
                let seed = config.seed_for(i);
                let result = run_single_map(&generator, i, seed).map_err(|message| {
                    warn!(index = i, seed, %message, "Map failed");
                    BatchError {
                        map_index: i,
                        seed,
                        message,
                    }
                });
                let completed = progress.record_completion();
                if completed % 10 == 0 {
                    debug!(
                        completed,
                        total = config.map_count,
                        eta_secs = progress.eta().as_secs(),
                        "Progress"
                    );
                }
                result
            })
            .collect()
    };

    let results = if config.parallel_maps > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_maps as usize)
            .build()
        {
            Ok(pool) => pool.install(generate_all),
            Err(e) => {
                warn!(error = %e, "Failed to build thread pool, using the global pool");
                generate_all()
            }
        }
    } else {
        generate_all()
    };

    let (maps, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    let maps: Vec<MapMetrics> = maps.into_iter().filter_map(Result::ok).collect();
    let errors: Vec<BatchError> = errors.into_iter().filter_map(Result::err).collect();

    let summary = BatchSummary::from_maps(&maps);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        maps = maps.len(),
        errors = errors.len(),
        duration_secs = duration_seconds,
        "Batch complete"
    );

    BatchResults {
        config,
        maps,
        summary,
        duration_seconds,
        errors,
    }
}

/// Verify determinism by generating the same seed multiple times.
pub fn verify_determinism(params: &GenerationParams, seed: u64, runs: u32) -> bool {
    let Ok(generator) = TerrainGenerator::new(params.clone()) else {
        return false;
    };
    let hashes: Vec<Option<u64>> = (0..runs)
        .map(|_| generator.generate_seeded(seed).ok().map(|m| m.state_hash()))
        .collect();
    hashes.first().is_some_and(Option::is_some) && hashes.windows(2).all(|w| w[0] == w[1])
}
