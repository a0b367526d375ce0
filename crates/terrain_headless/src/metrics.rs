//! Map metrics collection for batch analysis.
//!
//! Per-map metrics are gathered by the batch runner and rolled up into a
//! [`BatchSummary`] describing how a parameter set behaves across seeds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use terrain_core::generator::{GenerationReport, SpawnPoint, TerrainMap, TileQuery};
use terrain_core::stats::{MapStats, TerrainHistogram};
use terrain_core::tile::TileCode;

/// Metrics for a single generated map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetrics {
    /// Position in the batch.
    pub index: u32,
    /// Seed the map was generated from.
    pub seed: u64,
    /// Terrain statistics.
    pub stats: MapStats,
    /// Per-stage counters.
    pub report: GenerationReport,
    /// Spawn point in tiles.
    pub spawn: SpawnPoint,
    /// Whether the spawn tile is passable.
    pub spawn_passable: bool,
    /// Map state hash (for determinism validation).
    pub state_hash: u64,
    /// Wall-clock generation time.
    pub duration_ms: f64,
}

impl MapMetrics {
    /// Collect metrics from a finished map.
    #[must_use]
    pub fn from_map(index: u32, seed: u64, map: &TerrainMap, duration_ms: f64) -> Self {
        let spawn = map.spawn_point();
        Self {
            index,
            seed,
            stats: map.stats(),
            report: *map.report(),
            spawn,
            spawn_passable: map.is_passable(spawn.x as i32, spawn.y as i32),
            state_hash: map.state_hash(),
            duration_ms,
        }
    }
}

/// Aggregate statistics across a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Maps generated.
    pub total_maps: u32,
    /// Average width in tiles.
    pub avg_width: f64,
    /// Average height in tiles.
    pub avg_height: f64,
    /// Tile counts summed over every map.
    pub histogram: TerrainHistogram,
    /// Share of each code over every tile, indexed by code.
    pub code_fractions: [f64; 4],
    /// Average passable share per map.
    pub avg_passable_fraction: f64,
    /// Lowest passable share.
    pub min_passable_fraction: f64,
    /// Highest passable share.
    pub max_passable_fraction: f64,
    /// Average isolated obstacle tiles per map.
    pub avg_isolated_obstacles: f64,
    /// Maps whose spawn tile is void.
    pub void_spawns: u32,
    /// Distinct map hashes. Below `total_maps` means seeds collided.
    pub unique_maps: u32,
    /// Average generation time.
    pub avg_duration_ms: f64,
}

impl BatchSummary {
    /// Calculate summary from a list of map metrics.
    #[must_use]
    pub fn from_maps(maps: &[MapMetrics]) -> Self {
        if maps.is_empty() {
            return Self::default();
        }
        let n = maps.len() as f64;

        let mut summary = Self {
            total_maps: maps.len() as u32,
            min_passable_fraction: f64::MAX,
            ..Default::default()
        };
        let mut hashes = BTreeSet::new();
        let mut passable_sum = 0.0;
        let mut isolated_sum = 0usize;
        let mut width_sum = 0u64;
        let mut height_sum = 0u64;
        let mut duration_sum = 0.0;

        for map in maps {
            width_sum += u64::from(map.stats.width);
            height_sum += u64::from(map.stats.height);
            summary.histogram.accumulate(&map.stats.histogram);

            let passable = map.stats.passable_fraction;
            passable_sum += passable;
            summary.min_passable_fraction = summary.min_passable_fraction.min(passable);
            summary.max_passable_fraction = summary.max_passable_fraction.max(passable);

            isolated_sum += map.stats.isolated_obstacles;
            if !map.spawn_passable {
                summary.void_spawns += 1;
            }
            hashes.insert(map.state_hash);
            duration_sum += map.duration_ms;
        }

        summary.avg_width = width_sum as f64 / n;
        summary.avg_height = height_sum as f64 / n;
        summary.avg_passable_fraction = passable_sum / n;
        summary.avg_isolated_obstacles = isolated_sum as f64 / n;
        summary.avg_duration_ms = duration_sum / n;
        summary.unique_maps = hashes.len() as u32;
        for code in TileCode::ALL {
            summary.code_fractions[code.index()] = summary.histogram.fraction(code);
        }
        summary
    }
}
