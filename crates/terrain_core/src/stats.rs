//! Statistics over generated tile grids.
//!
//! Used by the statistical tests and by headless batch reports.

use serde::{Deserialize, Serialize};

use crate::tile::TileCode;
use crate::upscale::TileGrid;

/// Number of tiles per terrain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerrainHistogram {
    /// Counts indexed by [`TileCode::index`].
    pub counts: [usize; 4],
}

impl TerrainHistogram {
    /// Count every tile of `grid`.
    #[must_use]
    pub fn from_grid(grid: &TileGrid) -> Self {
        let mut counts = [0; 4];
        for tile in grid.cells() {
            counts[tile.index()] += 1;
        }
        Self { counts }
    }

    /// Tiles with `code`.
    #[must_use]
    pub const fn count(&self, code: TileCode) -> usize {
        self.counts[code.index()]
    }

    /// Total tiles counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of tiles with `code`, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self, code: TileCode) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(code) as f64 / total as f64
    }

    /// Share of tiles a ground unit can stand on.
    #[must_use]
    pub fn passable_fraction(&self) -> f64 {
        TileCode::ALL
            .iter()
            .filter(|c| c.is_passable())
            .map(|&c| self.fraction(c))
            .sum()
    }

    /// Add another histogram into this one.
    pub fn accumulate(&mut self, other: &Self) {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
    }
}

/// Tiles of `code` with no 8-connected neighbour of the same code.
#[must_use]
pub fn isolated_cells(grid: &TileGrid, code: TileCode) -> usize {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let mut isolated = 0;
    for x in 0..w {
        for y in 0..h {
            if grid.get(x, y) == Some(code) && grid.touching(x, y, code) == 0 {
                isolated += 1;
            }
        }
    }
    isolated
}

/// Summary of one generated map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    /// Fine grid width.
    pub width: u32,
    /// Fine grid height.
    pub height: u32,
    /// Tiles per code.
    pub histogram: TerrainHistogram,
    /// Share of passable tiles.
    pub passable_fraction: f64,
    /// Single-tile obstacle specks.
    pub isolated_obstacles: usize,
}

impl MapStats {
    /// Compute stats for a finished grid.
    #[must_use]
    pub fn from_grid(grid: &TileGrid) -> Self {
        let histogram = TerrainHistogram::from_grid(grid);
        Self {
            width: grid.width(),
            height: grid.height(),
            histogram,
            passable_fraction: histogram.passable_fraction(),
            isolated_obstacles: isolated_cells(grid, TileCode::Obstacle),
        }
    }
}
