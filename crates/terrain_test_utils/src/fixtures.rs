//! Test fixtures and helpers.
//!
//! Grids are written as rows of glyphs (`~` void, `.` open, `:` rough,
//! `#` obstacle) so expected terrain reads like the ASCII preview.

use rand::Rng;
use terrain_core::config::{GenerationParams, IntRange};
use terrain_core::region::RegionGrid;
use terrain_core::rng::seeded;
use terrain_core::tile::TileCode;
use terrain_core::upscale::TileGrid;

/// Build a tile grid from glyph rows.
///
/// # Panics
///
/// Panics on ragged rows or unknown glyphs.
#[must_use]
pub fn tile_grid(rows: &[&str]) -> TileGrid {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
    let mut grid = TileGrid::try_new(width, height, TileCode::Void).expect("fixture grid");
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count() as u32, width, "ragged fixture row {y}");
        for (x, glyph) in row.chars().enumerate() {
            let tile = TileCode::from_glyph(glyph)
                .unwrap_or_else(|| panic!("unknown glyph {glyph:?} at ({x},{y})"));
            grid.set(x as i32, y as i32, tile);
        }
    }
    grid
}

/// Render a tile grid back into glyph rows.
#[must_use]
pub fn render_rows(grid: &TileGrid) -> Vec<String> {
    (0..grid.height() as i32)
        .map(|y| {
            (0..grid.width() as i32)
                .map(|x| grid.get(x, y).map_or('?', TileCode::glyph))
                .collect()
        })
        .collect()
}

/// Build a region grid from digit rows (`0`-`9`).
///
/// # Panics
///
/// Panics on ragged rows or non-digit characters.
#[must_use]
pub fn region_grid(rows: &[&str]) -> RegionGrid {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    let mut grid = RegionGrid::try_new(width, height, 0).expect("fixture grid");
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len() as u32, width, "ragged fixture row {y}");
        for (x, c) in row.chars().enumerate() {
            let level = c.to_digit(10).unwrap_or_else(|| panic!("not a digit: {c:?}"));
            grid.set(x as i32, y as i32, level as u8);
        }
    }
    grid
}

/// Tile grid where every tile is drawn uniformly from the four codes.
#[must_use]
pub fn noise_tile_grid(seed: u64, width: u32, height: u32) -> TileGrid {
    let mut rng = seeded(seed);
    let mut grid = TileGrid::try_new(width, height, TileCode::Void).expect("fixture grid");
    grid.map_in_place(|_| TileCode::ALL[rng.gen_range(0..4)]);
    grid
}

/// Small, fast params for pipeline tests: fixed 10x8 regions, 3x upscale.
#[must_use]
pub fn tiny_params(seed: u64) -> GenerationParams {
    let mut params = GenerationParams::compact()
        .with_seed(seed)
        .with_region_size(10, 8)
        .with_upscale_factor(3);
    params.carve_radius = IntRange::new(3, 5);
    params.extra_islands = IntRange::new(0, 6);
    params
}
