//! Pass-level scenarios and properties on hand-built grids.

use terrain_core::config::{Odds, SmoothingRules, UpdateMode};
use terrain_core::erosion::erode;
use terrain_core::roughen::{roughen, RoughenOdds};
use terrain_core::rng::seeded;
use terrain_core::smoothing::smooth;
use terrain_core::stats::isolated_cells;
use terrain_core::tile::TileCode;
use terrain_core::upscale::upscale;
use terrain_test_utils::determinism::strategies::{arb_region_grid, arb_tile_grid, arb_update_mode};
use terrain_test_utils::fixtures::{noise_tile_grid, region_grid, render_rows, tile_grid};
use terrain_test_utils::proptest::prelude::*;

#[test]
fn test_single_peak_grows_a_plus_when_buffered() {
    let mut grid = region_grid(&[
        "0000000000",
        "0000000000",
        "0000000000",
        "0000000000",
        "0000000000",
        "0000030000",
        "0000000000",
        "0000000000",
        "0000000000",
        "0000000000",
    ]);
    erode(&mut grid, 1, UpdateMode::Buffered);

    assert_eq!(grid.get(5, 5), Some(3));
    for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        assert_eq!(grid.get(x, y), Some(2), "({x},{y})");
    }
    assert_eq!(grid.count(0), 95);
}

#[test]
fn test_upscaled_region_renders_as_blocks() {
    let region = region_grid(&["03", "21"]);
    let tiles = upscale(region, 2).unwrap();
    assert_eq!(render_rows(&tiles), ["~~##", "~~##", "::..", "::.."]);
}

#[test]
fn test_smoothing_erases_speck_in_void() {
    let mut grid = tile_grid(&["~~~~~", "~~~~~", "~~.~~", "~~~~~", "~~~~~"]);
    smooth(&mut grid, 1, &SmoothingRules::default(), UpdateMode::InPlace);
    assert_eq!(grid.count(TileCode::Void), 25);
}

#[test]
fn test_roughen_with_zero_odds_only_consumes_draws() {
    let odds = RoughenOdds {
        rough_to_open: Odds::never(),
        obstacle_to_open: Odds::never(),
        open_to_rough: Odds::never(),
    };
    let mut grid = tile_grid(&[".:#~", "#:.~"]);
    let before = grid.clone();
    assert_eq!(roughen(&mut grid, odds, &mut seeded(4)), 0);
    assert_eq!(grid, before);
}

#[test]
fn test_smoothing_never_adds_obstacle_specks_to_noise() {
    for seed in 0..10 {
        let mut grid = noise_tile_grid(seed, 50, 50);
        let before = isolated_cells(&grid, TileCode::Obstacle);
        smooth(&mut grid, 5, &SmoothingRules::default(), UpdateMode::InPlace);
        let after = isolated_cells(&grid, TileCode::Obstacle);
        assert!(after <= before, "seed {seed}: {before} -> {after}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_erosion_never_lowers_a_cell(
        grid in arb_region_grid(),
        iterations in 0u32..4,
        mode in arb_update_mode(),
    ) {
        let before = grid.clone();
        let mut after = grid;
        erode(&mut after, iterations, mode);
        for (x, y) in before.scan_order() {
            let (b, a) = (before.get(x, y).unwrap(), after.get(x, y).unwrap());
            if b != 0 {
                prop_assert_eq!(a, b);
            }
            prop_assert!(a >= b);
            prop_assert!(a <= 3);
        }
    }

    #[test]
    fn prop_upscale_blocks_match_source(grid in arb_region_grid(), factor in 1u32..5) {
        let tiles = upscale(grid.clone(), factor).unwrap();
        prop_assert_eq!(tiles.width(), grid.width() * factor);
        prop_assert_eq!(tiles.height(), grid.height() * factor);
        for (x, y) in tiles.scan_order() {
            let src = grid.get(x / factor as i32, y / factor as i32).unwrap();
            prop_assert_eq!(tiles.get(x, y), Some(TileCode::from_elevation(src)));
        }
    }

    #[test]
    fn prop_smoothing_keeps_shape_and_codes(
        grid in arb_tile_grid(),
        iterations in 0u32..6,
        mode in arb_update_mode(),
    ) {
        let (w, h) = (grid.width(), grid.height());
        let mut grid = grid;
        smooth(&mut grid, iterations, &SmoothingRules::default(), mode);
        prop_assert_eq!((grid.width(), grid.height()), (w, h));
        let total: usize = TileCode::ALL.iter().map(|&c| grid.count(c)).sum();
        prop_assert_eq!(total, (w * h) as usize);
    }

    #[test]
    fn prop_roughen_is_reproducible(grid in arb_tile_grid(), seed in any::<u64>()) {
        let odds = RoughenOdds {
            rough_to_open: Odds::new(2, 5),
            obstacle_to_open: Odds::new(1, 7),
            open_to_rough: Odds::new(1, 3),
        };
        let mut a = grid.clone();
        let mut b = grid;
        roughen(&mut a, odds, &mut seeded(seed));
        roughen(&mut b, odds, &mut seeded(seed));
        prop_assert_eq!(a, b);
    }
}
