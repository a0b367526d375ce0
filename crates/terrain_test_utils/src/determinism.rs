//! Determinism testing utilities.
//!
//! Provides a harness for verifying that terrain generation produces
//! byte-identical maps given identical seeds and parameters.
//!
//! # Testing Strategy
//!
//! A seed has to reproduce the same map on every run, thread and
//! machine. Sources of non-determinism include:
//!
//! - **System randomness**: every pass draws from the stream it is handed.
//!   No pass may reach for `thread_rng()`.
//!
//! - **Draw order**: a pass that skips or reorders a draw shifts every
//!   later pass. Out-of-bounds carve rays must not consume randomness.
//!
//! - **HashMap iteration order**: grids are plain vectors scanned in a
//!   fixed order, never hashed containers.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual pass behaviour (erosion, smoothing, etc.)
//! 2. **Property tests**: Random seeds and params must still reproduce
//! 3. **Parallel tests**: Generating the same seed on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use terrain_core::config::GenerationParams;
use terrain_core::generator::{TerrainGenerator, TileQuery};
use terrain_core::upscale::TileGrid;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>) -> Self {
        Self {
            is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
            hashes,
        }
    }

    /// Get all unique hashes (should be 1 for deterministic generation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that generation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Generation is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Build a value `runs` times and compare the hashes.
///
/// # Example
///
/// ```ignore
/// use terrain_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(3, || build_map(42), |map| map.state_hash());
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, HashFn>(
    runs: usize,
    setup: Setup,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    HashFn: Fn(&S) -> u64,
{
    let hashes = (0..runs).map(|_| hash(&setup())).collect();
    DeterminismResult::from_hashes(hashes)
}

/// Generate the map for `params` `runs` times and compare state hashes.
///
/// # Panics
///
/// Panics if `params` are invalid or generation fails.
#[must_use]
pub fn verify_generation_determinism(params: &GenerationParams, runs: usize) -> DeterminismResult {
    let generator = TerrainGenerator::new(params.clone()).expect("valid params");
    verify_determinism(
        runs,
        || generator.generate().expect("generation succeeds"),
        terrain_core::generator::TerrainMap::state_hash,
    )
}

/// Generate the same map on `threads` scoped threads and collect hashes.
///
/// Catches state leaking between generations or depending on thread
/// scheduling.
///
/// # Panics
///
/// Panics if `params` are invalid, generation fails or a thread panics.
#[must_use]
pub fn run_parallel_generations_scoped(
    params: &GenerationParams,
    threads: usize,
) -> DeterminismResult {
    let generator = TerrainGenerator::new(params.clone()).expect("valid params");
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    generator
                        .generate()
                        .expect("generation succeeds")
                        .state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult::from_hashes(hashes)
}

/// First tile, in scan order, where two grids differ.
///
/// Returns `Some((-1, -1))` when the dimensions differ and `None` when
/// the grids are identical.
#[must_use]
pub fn find_first_difference(a: &TileGrid, b: &TileGrid) -> Option<(i32, i32)> {
    if (a.width(), a.height()) != (b.width(), b.height()) {
        return Some((-1, -1));
    }
    a.scan_order().find(|&(x, y)| a.get(x, y) != b.get(x, y))
}

/// Hash every tile of a finished map through its query surface.
#[must_use]
pub fn query_hash<Q: TileQuery>(map: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    map.width().hash(&mut hasher);
    map.height().hash(&mut hasher);
    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            map.tile_at(x, y).hash(&mut hasher);
        }
    }
    map.spawn_point().hash(&mut hasher);
    hasher.finish()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for generation testing.
///
/// These strategies produce random but reproducible inputs for
/// property-based tests of the passes and the full pipeline.
pub mod strategies {
    use proptest::prelude::*;
    use terrain_core::config::{GenerationParams, IntRange, UpdateMode};
    use terrain_core::region::RegionGrid;
    use terrain_core::tile::TileCode;
    use terrain_core::upscale::TileGrid;

    /// Any seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }

    /// Either update mode.
    pub fn arb_update_mode() -> impl Strategy<Value = UpdateMode> {
        prop_oneof![Just(UpdateMode::InPlace), Just(UpdateMode::Buffered)]
    }

    /// Any terrain code.
    pub fn arb_tile_code() -> impl Strategy<Value = TileCode> {
        (0u8..4).prop_map(TileCode::from_elevation)
    }

    /// Small valid params with random seed, region size, upscale and mode.
    pub fn arb_compact_params() -> impl Strategy<Value = GenerationParams> {
        (arb_seed(), 4i32..16, 4i32..12, 1u32..5, arb_update_mode()).prop_map(
            |(seed, w, h, factor, mode)| {
                let mut params = GenerationParams::compact()
                    .with_seed(seed)
                    .with_region_size(w, h)
                    .with_upscale_factor(factor)
                    .with_update_mode(mode);
                params.carve_radius = IntRange::new(2, w.max(h) / 2 + 2);
                params
            },
        )
    }

    /// Tile grid of uniform noise, 1-24 tiles per side.
    pub fn arb_tile_grid() -> impl Strategy<Value = TileGrid> {
        (1u32..24, 1u32..24).prop_flat_map(|(w, h)| {
            proptest::collection::vec(arb_tile_code(), (w * h) as usize).prop_map(move |tiles| {
                let mut grid = TileGrid::try_new(w, h, TileCode::Void).expect("non-empty grid");
                let mut it = tiles.into_iter();
                for y in 0..h as i32 {
                    for x in 0..w as i32 {
                        if let Some(t) = it.next() {
                            grid.set(x, y, t);
                        }
                    }
                }
                grid
            })
        })
    }

    /// Region grid of elevations `0..=3`, 1-24 cells per side.
    pub fn arb_region_grid() -> impl Strategy<Value = RegionGrid> {
        (1u32..24, 1u32..24).prop_flat_map(|(w, h)| {
            proptest::collection::vec(0u8..4, (w * h) as usize).prop_map(move |levels| {
                let mut grid = RegionGrid::try_new(w, h, 0).expect("non-empty grid");
                let mut it = levels.into_iter();
                for y in 0..h as i32 {
                    for x in 0..w as i32 {
                        if let Some(v) = it.next() {
                            grid.set(x, y, v);
                        }
                    }
                }
                grid
            })
        })
    }
}
