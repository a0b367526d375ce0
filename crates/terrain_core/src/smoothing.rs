//! Cellular automaton that turns roughened noise into coherent blobs.
//!
//! Each visit picks a rule branch from the tile's code as read at the
//! start of the visit. Inside a branch every check recounts neighbours
//! against the grid, so a write made by an earlier check is visible to
//! the later ones (neighbour counts exclude the tile itself).
//!
//! Rules with the default thresholds:
//!
//! | code | check | effect |
//! |------|-------|--------|
//! | open | > 3 rough neighbours | stays open |
//! | open | > 2 obstacle neighbours | becomes obstacle |
//! | open | > 3 void neighbours | tile and its plus become void |
//! | void | > 3 open neighbours | becomes open |
//! | rough | > 4 void neighbours | becomes void |
//! | rough | < 3 rough neighbours | tile and its plus become open |
//! | obstacle | < 5 obstacle neighbours | becomes open |

use crate::config::{SmoothingRules, UpdateMode};
use crate::tile::TileCode;
use crate::upscale::TileGrid;

/// Run `iterations` smoothing passes over the tile grid.
pub fn smooth(grid: &mut TileGrid, iterations: u32, rules: &SmoothingRules, mode: UpdateMode) {
    for iteration in 0..iterations {
        match mode {
            UpdateMode::InPlace => smooth_step(grid, None, rules),
            UpdateMode::Buffered => {
                let snapshot = grid.clone();
                smooth_step(grid, Some(&snapshot), rules);
            }
        }
        tracing::trace!(
            iteration,
            obstacles = grid.count(TileCode::Obstacle),
            "Smoothing iteration"
        );
    }
}

fn smooth_step(grid: &mut TileGrid, snapshot: Option<&TileGrid>, rules: &SmoothingRules) {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    for x in 0..w {
        for y in 0..h {
            apply_rules(grid, snapshot, rules, x, y);
        }
    }
}

fn apply_rules(
    grid: &mut TileGrid,
    snapshot: Option<&TileGrid>,
    rules: &SmoothingRules,
    x: i32,
    y: i32,
) {
    let touching = |grid: &TileGrid, code: TileCode| snapshot.unwrap_or(grid).touching(x, y, code);
    let Some(code) = snapshot.unwrap_or(grid).get(x, y) else {
        return;
    };

    match code {
        TileCode::Open => {
            if touching(grid, TileCode::Rough) > rules.open_keep_above_rough as usize {
                grid.set(x, y, TileCode::Open);
            }
            if touching(grid, TileCode::Obstacle) > rules.open_to_obstacle_above as usize {
                grid.set(x, y, TileCode::Obstacle);
            }
            if touching(grid, TileCode::Void) > rules.open_erase_above_void as usize {
                grid.surround(x, y, TileCode::Void);
            }
        }
        TileCode::Void => {
            if touching(grid, TileCode::Open) > rules.void_fill_above_open as usize {
                grid.set(x, y, TileCode::Open);
            }
        }
        TileCode::Rough => {
            if touching(grid, TileCode::Void) > rules.rough_to_void_above as usize {
                grid.set(x, y, TileCode::Void);
            }
            if touching(grid, TileCode::Rough) < rules.rough_dissolve_below as usize {
                grid.surround(x, y, TileCode::Open);
            }
        }
        TileCode::Obstacle => {
            if touching(grid, TileCode::Obstacle) < rules.obstacle_dissolve_below as usize {
                grid.set(x, y, TileCode::Open);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::stats::isolated_cells;
    use rand::Rng;

    fn filled(w: u32, h: u32, code: TileCode) -> TileGrid {
        TileGrid::try_new(w, h, code).unwrap()
    }

    fn run(grid: &mut TileGrid, iterations: u32) {
        smooth(grid, iterations, &SmoothingRules::default(), UpdateMode::InPlace);
    }

    fn noise(seed: u64, size: u32) -> TileGrid {
        let mut rng = seeded(seed);
        let mut grid = filled(size, size, TileCode::Void);
        grid.map_in_place(|_| TileCode::ALL[rng.gen_range(0..4)]);
        grid
    }

    #[test]
    fn test_isolated_open_tile_is_erased_with_its_plus() {
        let mut grid = filled(5, 5, TileCode::Void);
        grid.set(2, 2, TileCode::Open);
        run(&mut grid, 1);
        assert_eq!(grid.count(TileCode::Void), 25);
    }

    #[test]
    fn test_uniform_grids_are_stable() {
        for code in [TileCode::Void, TileCode::Open] {
            let mut grid = filled(12, 9, code);
            run(&mut grid, 5);
            assert_eq!(grid.count(code), 108, "{code:?}");
        }
    }

    #[test]
    fn test_lone_obstacle_dissolves() {
        let mut grid = filled(7, 7, TileCode::Open);
        grid.set(3, 3, TileCode::Obstacle);
        run(&mut grid, 1);
        assert_eq!(grid.count(TileCode::Open), 49);
    }

    #[test]
    fn test_lone_rough_dissolves_to_open() {
        let mut grid = filled(7, 7, TileCode::Open);
        grid.set(3, 3, TileCode::Rough);
        run(&mut grid, 1);
        assert_eq!(grid.count(TileCode::Open), 49);
    }

    #[test]
    fn test_void_hole_in_open_is_filled() {
        let mut grid = filled(3, 3, TileCode::Open);
        grid.set(1, 1, TileCode::Void);
        run(&mut grid, 1);
        assert_eq!(grid.count(TileCode::Open), 9);
    }

    #[test]
    fn test_drowned_rough_checks_run_in_sequence() {
        // The rough tile first turns void (8 void neighbours), then its
        // rough count is still below 3, so its plus is dissolved to open.
        let mut grid = filled(3, 3, TileCode::Void);
        grid.set(1, 1, TileCode::Rough);
        run(&mut grid, 1);

        assert_eq!(grid.count(TileCode::Open), 5);
        assert_eq!(grid.count(TileCode::Void), 4);
        assert_eq!(grid.get(1, 1), Some(TileCode::Open));
        assert_eq!(grid.get(0, 0), Some(TileCode::Void));
    }

    #[test]
    fn test_open_ringed_by_obstacles_joins_them() {
        let mut grid = filled(3, 3, TileCode::Obstacle);
        grid.set(1, 1, TileCode::Open);
        smooth(
            &mut grid,
            1,
            &SmoothingRules::default(),
            UpdateMode::Buffered,
        );
        // Buffered: the centre sees 8 obstacles and converts, while every
        // ring tile sees at most 4 obstacles in the snapshot and dissolves.
        assert_eq!(grid.get(1, 1), Some(TileCode::Obstacle));
        assert_eq!(grid.get(0, 0), Some(TileCode::Open));
        assert_eq!(grid.get(1, 0), Some(TileCode::Open));
        assert_eq!(grid.count(TileCode::Obstacle), 1);
    }

    #[test]
    fn test_only_codes_change_never_shape() {
        let mut grid = noise(8, 40);
        run(&mut grid, 5);
        assert_eq!((grid.width(), grid.height()), (40, 40));
        let total: usize = TileCode::ALL.iter().map(|&c| grid.count(c)).sum();
        assert_eq!(total, 1600);
    }

    #[test]
    fn test_smoothing_reduces_isolated_obstacles() {
        let mut before = 0;
        let mut after = 0;
        for seed in 0..20 {
            let mut grid = noise(seed, 64);
            before += isolated_cells(&grid, TileCode::Obstacle);
            run(&mut grid, 5);
            after += isolated_cells(&grid, TileCode::Obstacle);
        }
        assert!(before > 0);
        assert!(after <= before, "isolated obstacles grew {before} -> {after}");
    }

    #[test]
    fn test_buffered_differs_from_in_place() {
        let base = noise(3, 48);
        let mut in_place = base.clone();
        let mut buffered = base;
        smooth(&mut in_place, 5, &SmoothingRules::default(), UpdateMode::InPlace);
        smooth(&mut buffered, 5, &SmoothingRules::default(), UpdateMode::Buffered);
        assert_ne!(in_place, buffered);
    }
}
