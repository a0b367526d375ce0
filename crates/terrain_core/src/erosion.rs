//! Erosion/growth pass on the region grid.
//!
//! Every elevated cell (value >= 2) copies `value - 1` into each of its
//! 4-connected neighbours that is still exactly 0. Elevation drops by one
//! per spreading step and non-zero cells are never touched, so the pass
//! only ever adds land.
//!
//! In [`UpdateMode::InPlace`] a neighbour raised earlier in the scan is
//! itself eligible to spread later in the same iteration. With the
//! x-outer / y-inner scan this biases growth towards +x and +y.

use crate::config::UpdateMode;
use crate::grid::ORTHOGONAL;
use crate::region::RegionGrid;

/// Lowest value that spreads.
pub const ELEVATED: u8 = 2;

/// Run `iterations` erosion passes. Returns the number of cells filled.
pub fn erode(grid: &mut RegionGrid, iterations: u32, mode: UpdateMode) -> usize {
    let mut filled = 0;
    for iteration in 0..iterations {
        let step = match mode {
            UpdateMode::InPlace => erode_step(grid, None),
            UpdateMode::Buffered => {
                let snapshot = grid.clone();
                erode_step(grid, Some(&snapshot))
            }
        };
        tracing::trace!(iteration, filled = step, "Erosion iteration");
        filled += step;
    }
    filled
}

/// One scan over the grid. Reads come from `snapshot` when given,
/// otherwise from the grid being written.
fn erode_step(grid: &mut RegionGrid, snapshot: Option<&RegionGrid>) -> usize {
    let mut filled = 0;
    let (w, h) = (grid.width() as i32, grid.height() as i32);

    for x in 0..w {
        for y in 0..h {
            let value = read(grid, snapshot, x, y);
            if value < ELEVATED {
                continue;
            }
            for (dx, dy) in ORTHOGONAL {
                let (nx, ny) = (x + dx, y + dy);
                // Out-of-bounds reads as None and is skipped.
                if grid.get(nx, ny) == Some(0) && read_opt(grid, snapshot, nx, ny) == Some(0) {
                    grid.set(nx, ny, value - 1);
                    filled += 1;
                }
            }
        }
    }
    filled
}

#[inline]
fn read_opt(grid: &RegionGrid, snapshot: Option<&RegionGrid>, x: i32, y: i32) -> Option<u8> {
    snapshot.unwrap_or(grid).get(x, y)
}

#[inline]
fn read(grid: &RegionGrid, snapshot: Option<&RegionGrid>, x: i32, y: i32) -> u8 {
    read_opt(grid, snapshot, x, y).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_peak() -> RegionGrid {
        let mut grid = RegionGrid::try_new(10, 10, 0).unwrap();
        grid.set(5, 5, 3);
        grid
    }

    #[test]
    fn test_buffered_single_step_spread() {
        let mut grid = single_peak();
        erode(&mut grid, 1, UpdateMode::Buffered);

        for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            assert_eq!(grid.get(x, y), Some(2), "({x},{y})");
        }
        assert_eq!(grid.get(5, 5), Some(3));
        assert_eq!(grid.count(0), 100 - 5);
        // No diagonal spread.
        assert_eq!(grid.get(4, 4), Some(0));
        assert_eq!(grid.get(6, 6), Some(0));
    }

    #[test]
    fn test_in_place_cascades_along_scan_order() {
        let mut grid = single_peak();
        erode(&mut grid, 1, UpdateMode::InPlace);

        for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            assert_eq!(grid.get(x, y), Some(2));
        }
        // (5,6) and (6,5) are visited after the peak and spread again.
        assert_eq!(grid.get(5, 7), Some(1));
        assert_eq!(grid.get(7, 5), Some(1));
        assert_eq!(grid.get(6, 6), Some(1));
        // (4,5) and (5,4) were visited before being raised.
        assert_eq!(grid.get(3, 5), Some(0));
        assert_eq!(grid.get(5, 3), Some(0));
    }

    #[test]
    fn test_value_one_does_not_spread() {
        let mut grid = RegionGrid::try_new(5, 5, 0).unwrap();
        grid.set(2, 2, 1);
        let filled = erode(&mut grid, 3, UpdateMode::InPlace);
        assert_eq!(filled, 0);
        assert_eq!(grid.count(0), 24);
    }

    #[test]
    fn test_never_overwrites_or_lowers() {
        let mut grid = RegionGrid::try_new(6, 6, 0).unwrap();
        grid.set(1, 1, 3);
        grid.set(2, 1, 2);
        grid.set(3, 3, 3);
        let before = grid.clone();

        erode(&mut grid, 3, UpdateMode::InPlace);
        for (x, y) in grid.scan_order() {
            let (b, a) = (before.get(x, y).unwrap(), grid.get(x, y).unwrap());
            if b != 0 {
                assert_eq!(a, b, "non-zero cell ({x},{y}) changed");
            }
        }
    }

    #[test]
    fn test_edges_are_safe() {
        let mut grid = RegionGrid::try_new(3, 3, 0).unwrap();
        grid.set(0, 0, 3);
        grid.set(2, 2, 3);
        erode(&mut grid, 5, UpdateMode::Buffered);
        assert_eq!(grid.get(1, 0), Some(2));
        assert_eq!(grid.get(2, 1), Some(2));
        assert_eq!(grid.get(1, 1), Some(1));
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut grid = single_peak();
        let before = grid.clone();
        assert_eq!(erode(&mut grid, 0, UpdateMode::InPlace), 0);
        assert_eq!(grid, before);
    }
}
