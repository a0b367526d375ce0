//! Terrain generation pipeline and the finished map's query surface.
//!
//! Stages, in order, all drawing from one random stream:
//! 1. allocate the region grid and pick the landmass centre
//! 2. carve a ray fan from the centre
//! 3. seed single-cell islands
//! 4. erode/grow the elevations
//! 5. upscale regions to tiles
//! 6. roughen tiles
//! 7. smooth tiles with the automaton
//!
//! Nothing outside this module sees the grids before stage 7 finishes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GenerationParams;
use crate::erosion::erode;
use crate::error::Result;
use crate::region::{
    allocate_region, carve_landmass, choose_center, plan_carve, seed_islands, CarveShape,
    RegionCell, RegionGrid,
};
use crate::rng::seeded;
use crate::roughen::{roughen, RoughenOdds};
use crate::smoothing::smooth;
use crate::stats::MapStats;
use crate::tile::TileCode;
use crate::upscale::{upscale, TileGrid};

/// Starting focus of the map in fine tile coordinates.
///
/// The camera is centred here and the first base/unit is placed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl SpawnPoint {
    /// Centre of the tile block that `cell` upscales to.
    #[must_use]
    pub fn from_region_cell(cell: RegionCell, factor: u32) -> Self {
        Self {
            x: cell.x.max(0) as u32 * factor + factor / 2,
            y: cell.y.max(0) as u32 * factor + factor / 2,
        }
    }
}

/// Read-only view consumers use to query a finished map.
pub trait TileQuery {
    /// Width in tiles.
    fn width(&self) -> u32;

    /// Height in tiles.
    fn height(&self) -> u32;

    /// Terrain at `(x, y)`, or `None` outside the map.
    fn tile_at(&self, x: i32, y: i32) -> Option<TileCode>;

    /// Starting focus for camera and first base.
    fn spawn_point(&self) -> SpawnPoint;

    /// Whether a ground unit may stand at `(x, y)`. False off the map.
    fn is_passable(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_some_and(TileCode::is_passable)
    }
}

/// What each stage did, for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Region grid width in cells.
    pub region_width: u32,
    /// Region grid height in cells.
    pub region_height: u32,
    /// Carve ray length.
    pub carve_radius: i32,
    /// First carve angle.
    pub carve_angle_start: f32,
    /// End of the carve wedge.
    pub carve_angle_end: f32,
    /// Region cells raised by the carve.
    pub carved_cells: usize,
    /// Islands stamped.
    pub islands: u32,
    /// Region cells filled by erosion.
    pub eroded_cells: usize,
    /// Tiles changed by roughening.
    pub roughened_tiles: usize,
}

/// Region grid after stages 1-4, before upscaling.
#[derive(Debug, Clone)]
pub struct RegionStage {
    /// Eroded elevations.
    pub grid: RegionGrid,
    /// Landmass centre.
    pub center: RegionCell,
    /// Carve that was cast.
    pub carve: CarveShape,
    /// Stage counters so far.
    pub report: GenerationReport,
}

/// A finished, immutable terrain map.
#[derive(Debug, Clone)]
pub struct TerrainMap {
    tiles: TileGrid,
    spawn: SpawnPoint,
    upscale_factor: u32,
    report: GenerationReport,
}

impl TerrainMap {
    /// The underlying tile grid.
    #[must_use]
    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    /// Fine tiles per region cell.
    #[must_use]
    pub const fn upscale_factor(&self) -> u32 {
        self.upscale_factor
    }

    /// Per-stage counters from generation.
    #[must_use]
    pub const fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Raw codes in row-major order, for renderers.
    #[must_use]
    pub fn codes(&self) -> Vec<u8> {
        self.tiles.cells().iter().map(|t| t.code()).collect()
    }

    /// Terrain statistics.
    #[must_use]
    pub fn stats(&self) -> MapStats {
        MapStats::from_grid(&self.tiles)
    }

    /// Hash of dimensions, tiles and spawn point.
    ///
    /// Equal for two maps exactly when they are byte-identical (modulo
    /// hash collisions).
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tiles.width().hash(&mut hasher);
        self.tiles.height().hash(&mut hasher);
        for tile in self.tiles.cells() {
            tile.code().hash(&mut hasher);
        }
        self.spawn.hash(&mut hasher);
        hasher.finish()
    }
}

impl TileQuery for TerrainMap {
    fn width(&self) -> u32 {
        self.tiles.width()
    }

    fn height(&self) -> u32 {
        self.tiles.height()
    }

    fn tile_at(&self, x: i32, y: i32) -> Option<TileCode> {
        self.tiles.get(x, y)
    }

    fn spawn_point(&self) -> SpawnPoint {
        self.spawn
    }
}

/// Owns validated params and runs the pipeline.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    params: GenerationParams,
}

impl TerrainGenerator {
    /// Validate `params` and build a generator.
    pub fn new(params: GenerationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Params this generator runs with.
    #[must_use]
    pub const fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate using the configured seed.
    pub fn generate(&self) -> Result<TerrainMap> {
        self.generate_seeded(self.params.seed)
    }

    /// Generate with the default stream for `seed`.
    pub fn generate_seeded(&self, seed: u64) -> Result<TerrainMap> {
        let mut rng = seeded(seed);
        let map = self.generate_with_rng(&mut rng)?;
        info!(
            seed,
            width = map.tiles.width(),
            height = map.tiles.height(),
            spawn_x = map.spawn.x,
            spawn_y = map.spawn.y,
            "Generated terrain"
        );
        Ok(map)
    }

    /// Generate drawing from an injected random stream.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TerrainMap> {
        let stage = self.build_region(rng)?;
        self.build_tiles(stage, rng)
    }

    /// Stages 1-4: region allocation, carve, islands, erosion.
    pub fn build_region<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RegionStage> {
        let params = &self.params;

        let mut grid = allocate_region(params, rng)?;
        let center = choose_center(&grid, params.center_jitter, rng);
        debug!(
            width = grid.width(),
            height = grid.height(),
            center_x = center.x,
            center_y = center.y,
            "Allocated region grid"
        );

        let carve = plan_carve(center, params, rng);
        let carved_cells = carve_landmass(
            &mut grid,
            &carve,
            params.carve_fill_odds,
            params.elevation,
            rng,
        );
        debug!(
            radius = carve.radius,
            angle_start = carve.angle_start,
            angle_end = carve.angle_end,
            carved_cells,
            "Carved landmass"
        );

        let islands = seed_islands(&mut grid, params.extra_islands, params.elevation, rng);
        debug!(islands, "Seeded islands");

        let eroded_cells = erode(&mut grid, params.erosion_iterations, params.erosion_mode);
        debug!(
            iterations = params.erosion_iterations,
            mode = ?params.erosion_mode,
            eroded_cells,
            "Eroded region grid"
        );

        let report = GenerationReport {
            region_width: grid.width(),
            region_height: grid.height(),
            carve_radius: carve.radius,
            carve_angle_start: carve.angle_start,
            carve_angle_end: carve.angle_end,
            carved_cells,
            islands,
            eroded_cells,
            roughened_tiles: 0,
        };

        Ok(RegionStage {
            grid,
            center,
            carve,
            report,
        })
    }

    /// Stages 5-7: upscale, roughen, smooth. Consumes the region stage.
    pub fn build_tiles<R: Rng + ?Sized>(
        &self,
        stage: RegionStage,
        rng: &mut R,
    ) -> Result<TerrainMap> {
        let params = &self.params;
        let RegionStage {
            grid,
            center,
            mut report,
            ..
        } = stage;

        let mut tiles = upscale(grid, params.upscale_factor)?;
        debug!(
            width = tiles.width(),
            height = tiles.height(),
            factor = params.upscale_factor,
            "Upscaled to tile grid"
        );

        if params.roughen_enabled {
            report.roughened_tiles = roughen(&mut tiles, RoughenOdds::from(params), rng);
            debug!(changed = report.roughened_tiles, "Roughened tiles");
        }

        smooth(
            &mut tiles,
            params.smoothing_iterations,
            &params.smoothing,
            params.smoothing_mode,
        );
        debug!(
            iterations = params.smoothing_iterations,
            mode = ?params.smoothing_mode,
            "Smoothed tiles"
        );

        Ok(TerrainMap {
            tiles,
            spawn: SpawnPoint::from_region_cell(center, params.upscale_factor),
            upscale_factor: params.upscale_factor,
            report,
        })
    }
}

/// Validate `params` and generate a map from `params.seed`.
pub fn generate_map(params: GenerationParams) -> Result<TerrainMap> {
    TerrainGenerator::new(params)?.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IntRange, UpdateMode};
    use crate::error::TerrainError;

    fn compact(seed: u64) -> TerrainMap {
        generate_map(GenerationParams::compact().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_invalid_params_rejected_up_front() {
        let params = GenerationParams::default().with_upscale_factor(0);
        assert!(matches!(
            TerrainGenerator::new(params),
            Err(TerrainError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_dimensions_are_region_times_factor() {
        let map = compact(1);
        let report = map.report();
        assert_eq!(map.width(), report.region_width * 4);
        assert_eq!(map.height(), report.region_height * 4);
        assert!((12..=16).contains(&report.region_width));
        assert!((10..=12).contains(&report.region_height));
    }

    #[test]
    fn test_tile_at_out_of_bounds_is_none() {
        let map = compact(2);
        let (w, h) = (map.width() as i32, map.height() as i32);
        for (x, y) in [(-1, 0), (0, -1), (w, 0), (0, h), (i32::MIN, i32::MAX)] {
            assert_eq!(map.tile_at(x, y), None);
            assert!(!map.is_passable(x, y));
        }
        assert!(map.tile_at(0, 0).is_some());
        assert!(map.tile_at(w - 1, h - 1).is_some());
    }

    #[test]
    fn test_codes_are_row_major() {
        let map = compact(3);
        let codes = map.codes();
        assert_eq!(codes.len(), (map.width() * map.height()) as usize);
        let (x, y) = (map.width() as i32 - 1, 1);
        let idx = (y as u32 * map.width() + x as u32) as usize;
        assert_eq!(Some(codes[idx]), map.tile_at(x, y).map(TileCode::code));
    }

    #[test]
    fn test_spawn_inside_map() {
        for seed in 0..20 {
            let map = compact(seed);
            let spawn = map.spawn_point();
            assert!(spawn.x < map.width() && spawn.y < map.height());
        }
    }

    #[test]
    fn test_spawn_from_region_cell() {
        let spawn = SpawnPoint::from_region_cell(RegionCell { x: 3, y: 0 }, 10);
        assert_eq!(spawn, SpawnPoint { x: 35, y: 5 });
        let spawn = SpawnPoint::from_region_cell(RegionCell { x: 0, y: 0 }, 1);
        assert_eq!(spawn, SpawnPoint { x: 0, y: 0 });
    }

    #[test]
    fn test_same_seed_byte_identical() {
        let a = compact(99);
        let b = compact(99);
        assert_eq!(a.codes(), b.codes());
        assert_eq!(a.spawn_point(), b.spawn_point());
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_seed_changes_map() {
        let hashes: std::collections::HashSet<u64> =
            (0..8).map(|seed| compact(seed).state_hash()).collect();
        assert!(hashes.len() > 1);
    }

    #[test]
    fn test_injected_rng_matches_seeded_path() {
        let generator = TerrainGenerator::new(GenerationParams::compact()).unwrap();
        let a = generator.generate_seeded(5).unwrap();
        let b = generator.generate_with_rng(&mut seeded(5)).unwrap();
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_split_stages_match_full_run() {
        let generator = TerrainGenerator::new(GenerationParams::compact()).unwrap();
        let mut rng = seeded(17);
        let stage = generator.build_region(&mut rng).unwrap();
        let center = stage.center;
        let split = generator.build_tiles(stage, &mut rng).unwrap();

        let full = generator.generate_seeded(17).unwrap();
        assert_eq!(split.state_hash(), full.state_hash());
        assert_eq!(
            full.spawn_point(),
            SpawnPoint::from_region_cell(center, generator.params().upscale_factor)
        );
    }

    #[test]
    fn test_without_roughen_or_smoothing_tiles_mirror_regions() {
        let mut params = GenerationParams::compact().with_seed(4);
        params.roughen_enabled = false;
        params.smoothing_iterations = 0;
        let generator = TerrainGenerator::new(params).unwrap();

        let mut rng = seeded(4);
        let stage = generator.build_region(&mut rng).unwrap();
        let region = stage.grid.clone();
        let map = generator.build_tiles(stage, &mut rng).unwrap();

        assert_eq!(map.report().roughened_tiles, 0);
        for (x, y) in map.tiles().scan_order() {
            let expected = TileCode::from_elevation(region.get(x / 4, y / 4).unwrap());
            assert_eq!(map.tile_at(x, y), Some(expected));
        }
    }

    #[test]
    fn test_buffered_mode_generates() {
        let params = GenerationParams::compact()
            .with_seed(8)
            .with_update_mode(UpdateMode::Buffered);
        let map = generate_map(params).unwrap();
        assert_eq!(map.codes().len(), (map.width() * map.height()) as usize);
    }

    #[test]
    fn test_fixed_region_size() {
        let mut params = GenerationParams::compact().with_region_size(9, 7);
        params.extra_islands = IntRange::fixed(0);
        let map = generate_map(params).unwrap();
        assert_eq!((map.width(), map.height()), (36, 28));
        assert_eq!(map.report().islands, 0);
    }

    #[test]
    fn test_map_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TerrainMap>();
    }
}
