//! Stochastic roughening of the tile grid.
//!
//! One scan in pipeline order. Each tile runs three checks against the
//! live grid, in order: rough may flatten to open, obstacle may flatten
//! to open, open may roughen. The third check re-reads the tile, so a
//! tile flattened by the first check can be roughened again in the same
//! visit.

use rand::Rng;

use crate::config::{GenerationParams, Odds};
use crate::tile::TileCode;
use crate::upscale::TileGrid;

/// Transition odds of the roughening pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoughenOdds {
    /// Rough -> open.
    pub rough_to_open: Odds,
    /// Obstacle -> open.
    pub obstacle_to_open: Odds,
    /// Open -> rough.
    pub open_to_rough: Odds,
}

impl From<&GenerationParams> for RoughenOdds {
    fn from(params: &GenerationParams) -> Self {
        Self {
            rough_to_open: params.rough_to_open,
            obstacle_to_open: params.obstacle_to_open,
            open_to_rough: params.open_to_rough,
        }
    }
}

/// Apply the roughening checks to every tile. Returns the number of
/// tiles whose code changed.
pub fn roughen<R: Rng + ?Sized>(grid: &mut TileGrid, odds: RoughenOdds, rng: &mut R) -> usize {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let mut changed = 0;

    for x in 0..w {
        for y in 0..h {
            let before = grid.get(x, y);
            if grid.get(x, y) == Some(TileCode::Rough) && odds.rough_to_open.roll(rng) {
                grid.set(x, y, TileCode::Open);
            }
            if grid.get(x, y) == Some(TileCode::Obstacle) && odds.obstacle_to_open.roll(rng) {
                grid.set(x, y, TileCode::Open);
            }
            if grid.get(x, y) == Some(TileCode::Open) && odds.open_to_rough.roll(rng) {
                grid.set(x, y, TileCode::Rough);
            }
            if grid.get(x, y) != before {
                changed += 1;
            }
        }
    }
    changed
}
