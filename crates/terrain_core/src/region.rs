//! Region grid stages: allocation, landmass carve and island seeding.
//!
//! The region grid is the coarse working surface of the pipeline. Cells
//! start at 0 (open void) and are raised to an elevation in `2..=3`;
//! erosion later spreads decremented copies of those values.

use rand::Rng;

use crate::config::{GenerationParams, IntRange, Odds, MAX_CARVE_RAYS};
use crate::error::Result;
use crate::grid::Grid;

/// Coarse grid of elevations used only during generation.
pub type RegionGrid = Grid<u8>;

/// A cell of the region grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionCell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// Ray fan cast from the centre by [`carve_landmass`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarveShape {
    /// Origin of every ray.
    pub center: RegionCell,
    /// Ray length in cells.
    pub radius: i32,
    /// First ray angle in radians.
    pub angle_start: f32,
    /// Rays are cast while the angle stays below this.
    pub angle_end: f32,
    /// Angle increment between rays.
    pub angle_step: f32,
}

/// Draw region dimensions and allocate an all-zero region grid.
pub fn allocate_region<R: Rng + ?Sized>(
    params: &GenerationParams,
    rng: &mut R,
) -> Result<RegionGrid> {
    let width = params.region_width.sample(rng).max(1) as u32;
    let height = params.region_height.sample(rng).max(1) as u32;
    Grid::try_new(width, height, 0)
}

/// Pick the landmass centre: the grid middle shifted by `jitter` on each
/// axis, clamped into the grid.
pub fn choose_center<R: Rng + ?Sized>(
    grid: &RegionGrid,
    jitter: IntRange,
    rng: &mut R,
) -> RegionCell {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let x = w / 2 + jitter.sample(rng);
    let y = h / 2 + jitter.sample(rng);
    RegionCell {
        x: x.clamp(0, w - 1),
        y: y.clamp(0, h - 1),
    }
}

/// Draw the radius and wedge of the landmass carve.
pub fn plan_carve<R: Rng + ?Sized>(
    center: RegionCell,
    params: &GenerationParams,
    rng: &mut R,
) -> CarveShape {
    let radius = params.carve_radius.sample(rng);
    let angle_start = params.carve_angle_start.sample(rng);
    let span = params.carve_angle_span.sample(rng);
    CarveShape {
        center,
        radius,
        angle_start,
        angle_end: angle_start + span,
        angle_step: params.carve_angle_step,
    }
}

/// Cast one ray per angle step across the wedge and raise cells under it.
///
/// Each in-bounds cell on a ray is raised with `fill` odds to a value drawn
/// from `elevation`. Cells off the grid are skipped without consuming
/// randomness. The result is a noisy fan, not a filled sector. At most
/// twice [`MAX_CARVE_RAYS`] rays are cast, whatever the shape.
///
/// Returns the number of raise operations performed.
pub fn carve_landmass<R: Rng + ?Sized>(
    grid: &mut RegionGrid,
    shape: &CarveShape,
    fill: Odds,
    elevation: IntRange,
    rng: &mut R,
) -> usize {
    let (cx, cy) = (shape.center.x as f32, shape.center.y as f32);
    let mut raised = 0;
    let mut angle = shape.angle_start;
    let mut rays = 0;

    while angle < shape.angle_end && rays < 2 * MAX_CARVE_RAYS {
        let (sin, cos) = angle.sin_cos();
        for i in 0..shape.radius {
            let x = (cx + cos * i as f32) as i32;
            let y = (cy + sin * i as f32) as i32;
            if !grid.in_bounds(x, y) {
                continue;
            }
            if fill.roll(rng) {
                grid.set(x, y, elevation.sample(rng) as u8);
                raised += 1;
            }
        }
        angle += shape.angle_step;
        rays += 1;
    }

    raised
}

/// Stamp a random number of single-cell islands, overwriting whatever
/// was there. Returns how many were stamped.
pub fn seed_islands<R: Rng + ?Sized>(
    grid: &mut RegionGrid,
    count: IntRange,
    elevation: IntRange,
    rng: &mut R,
) -> u32 {
    let islands = count.sample(rng).max(0) as u32;
    for _ in 0..islands {
        let x = rng.gen_range(0..grid.width()) as i32;
        let y = rng.gen_range(0..grid.height()) as i32;
        grid.set(x, y, elevation.sample(rng) as u8);
    }
    islands
}
