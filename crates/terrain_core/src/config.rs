//! Generation parameters.
//!
//! Defaults are the hand-tuned constants the prototype shipped with:
//! a 68-100 x 51-75 region grid upscaled 10x, a 20-29 cell carve, up to
//! 249 islands, three erosion passes and five smoothing passes.

use std::f32::consts::TAU;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Upper bound on rays a valid carve plan may cast.
pub const MAX_CARVE_RAYS: u32 = 100_000;

/// Largest magnitude accepted for the carve start angle and wedge span.
pub const MAX_CARVE_ANGLE: f32 = 4.0 * TAU;

/// Smallest carve angle step. Always advances an f32 angle of magnitude
/// up to `2 * MAX_CARVE_ANGLE`.
pub const MIN_CARVE_ANGLE_STEP: f32 = 1e-4;

/// Inclusive integer range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    /// Smallest value that can be drawn.
    pub min: i32,
    /// Largest value that can be drawn.
    pub max: i32,
}

impl IntRange {
    /// Create a new inclusive range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: i32) -> Self {
        Self::new(value, value)
    }

    /// Draw a value in `min..=max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, name: &'static str, floor: i32) -> Result<()> {
        if self.min > self.max {
            return Err(TerrainError::InvertedRange {
                name,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        if self.min < floor {
            return Err(TerrainError::NonPositive {
                name,
                message: format!("min {} is below {floor}", self.min),
            });
        }
        Ok(())
    }
}

/// Inclusive floating-point range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Smallest value that can be drawn.
    pub min: f32,
    /// Largest value that can be drawn.
    pub max: f32,
}

impl FloatRange {
    /// Create a new inclusive range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a value in `min..=max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(TerrainError::InvalidConfig {
                name,
                message: format!("bounds must be finite, got {}..={}", self.min, self.max),
            });
        }
        if self.min > self.max {
            return Err(TerrainError::InvertedRange {
                name,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        if !(self.max - self.min).is_finite() {
            return Err(TerrainError::InvalidConfig {
                name,
                message: format!("width of {}..={} overflows f32", self.min, self.max),
            });
        }
        Ok(())
    }

    fn validate_magnitude(&self, name: &'static str, limit: f32) -> Result<()> {
        self.validate(name)?;
        if self.min < -limit || self.max > limit {
            return Err(TerrainError::InvalidConfig {
                name,
                message: format!("{}..={} exceeds +/-{limit}", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Probability expressed as `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Odds {
    /// Favourable outcomes.
    pub numerator: u32,
    /// Total outcomes; must be non-zero.
    pub denominator: u32,
}

impl Odds {
    /// Create new odds.
    #[must_use]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Odds that never fire.
    #[must_use]
    pub const fn never() -> Self {
        Self::new(0, 1)
    }

    /// Roll once. Always consumes exactly one draw from `rng`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_range(0..self.denominator) < self.numerator
    }

    /// Probability as a float (for reports).
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.numerator as f64 / self.denominator.max(1) as f64
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        if self.denominator == 0 || self.numerator > self.denominator {
            return Err(TerrainError::InvalidOdds {
                name,
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }
}

/// How a cellular pass reads the grid it is writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UpdateMode {
    /// One shared buffer: writes made earlier in an iteration are seen by
    /// cells visited later in the same iteration (x-outer, y-inner scan).
    #[default]
    InPlace,
    /// Reads come from a snapshot taken at the start of each iteration.
    /// Spreads exactly one step per iteration; changes the terrain's look.
    Buffered,
}

/// Neighbour-count thresholds for the smoothing automaton.
///
/// Names describe the transition; `_above` thresholds fire on a strictly
/// greater count, `_below` thresholds on a strictly smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingRules {
    /// Open tile with more rough neighbours than this stays open.
    pub open_keep_above_rough: u8,
    /// Open tile with more obstacle neighbours than this becomes obstacle.
    pub open_to_obstacle_above: u8,
    /// Open tile with more void neighbours than this is erased with its plus.
    pub open_erase_above_void: u8,
    /// Void tile with more open neighbours than this becomes open.
    pub void_fill_above_open: u8,
    /// Rough tile with more void neighbours than this becomes void.
    pub rough_to_void_above: u8,
    /// Rough tile with fewer rough neighbours than this dissolves with its plus.
    pub rough_dissolve_below: u8,
    /// Obstacle tile with fewer obstacle neighbours than this becomes open.
    pub obstacle_dissolve_below: u8,
}

impl Default for SmoothingRules {
    fn default() -> Self {
        Self {
            open_keep_above_rough: 3,
            open_to_obstacle_above: 2,
            open_erase_above_void: 3,
            void_fill_above_open: 3,
            rough_to_void_above: 4,
            rough_dissolve_below: 3,
            obstacle_dissolve_below: 5,
        }
    }
}

/// Complete configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Random seed for the default ChaCha stream.
    pub seed: u64,
    /// Region grid width in cells.
    pub region_width: IntRange,
    /// Region grid height in cells.
    pub region_height: IntRange,
    /// Offset added to the region centre on both axes.
    pub center_jitter: IntRange,
    /// Landmass carve ray length in region cells.
    pub carve_radius: IntRange,
    /// First carve angle in radians.
    pub carve_angle_start: FloatRange,
    /// Angular width of the carve wedge in radians.
    pub carve_angle_span: FloatRange,
    /// Angle increment between carve rays in radians.
    pub carve_angle_step: f32,
    /// Chance that a cell under a carve ray is raised.
    pub carve_fill_odds: Odds,
    /// Elevation assigned to carved cells and islands.
    pub elevation: IntRange,
    /// Number of single-cell islands stamped after the carve.
    pub extra_islands: IntRange,
    /// Erosion/growth iterations on the region grid.
    pub erosion_iterations: u32,
    /// Buffering of the erosion pass.
    pub erosion_mode: UpdateMode,
    /// Fine tiles per region cell along each axis.
    pub upscale_factor: u32,
    /// Run the roughening pass.
    pub roughen_enabled: bool,
    /// Rough tile downgraded to open.
    pub rough_to_open: Odds,
    /// Obstacle tile downgraded to open.
    pub obstacle_to_open: Odds,
    /// Open tile promoted to rough.
    pub open_to_rough: Odds,
    /// Smoothing automaton iterations on the tile grid.
    pub smoothing_iterations: u32,
    /// Buffering of the smoothing pass.
    pub smoothing_mode: UpdateMode,
    /// Smoothing thresholds.
    pub smoothing: SmoothingRules,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            region_width: IntRange::new(68, 100),
            region_height: IntRange::new(51, 75),
            center_jitter: IntRange::new(-4, -1),
            carve_radius: IntRange::new(20, 29),
            // The prototype drew both angles on a 0.01 rad grid; these
            // ranges are sampled continuously.
            carve_angle_start: FloatRange::new(0.03, 0.64),
            carve_angle_span: FloatRange::new(0.0, 2.18),
            carve_angle_step: 0.05,
            carve_fill_odds: Odds::new(1, 2),
            elevation: IntRange::new(2, 3),
            extra_islands: IntRange::new(0, 249),
            erosion_iterations: 3,
            erosion_mode: UpdateMode::InPlace,
            upscale_factor: 10,
            roughen_enabled: true,
            rough_to_open: Odds::new(2, 5),
            obstacle_to_open: Odds::new(1, 7),
            open_to_rough: Odds::new(1, 3),
            smoothing_iterations: 5,
            smoothing_mode: UpdateMode::InPlace,
            smoothing: SmoothingRules::default(),
        }
    }
}

impl GenerationParams {
    /// Full-size maps as played.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Small maps for previews and tests (roughly 50x40 tiles).
    #[must_use]
    pub fn compact() -> Self {
        Self {
            region_width: IntRange::new(12, 16),
            region_height: IntRange::new(10, 12),
            center_jitter: IntRange::new(-1, 0),
            carve_radius: IntRange::new(4, 6),
            extra_islands: IntRange::new(0, 12),
            upscale_factor: 4,
            ..Self::default()
        }
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the upscale factor.
    #[must_use]
    pub const fn with_upscale_factor(mut self, factor: u32) -> Self {
        self.upscale_factor = factor;
        self
    }

    /// Use the same update mode for erosion and smoothing.
    #[must_use]
    pub const fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.erosion_mode = mode;
        self.smoothing_mode = mode;
        self
    }

    /// Fix the region grid to exactly `width x height`.
    #[must_use]
    pub const fn with_region_size(mut self, width: i32, height: i32) -> Self {
        self.region_width = IntRange::fixed(width);
        self.region_height = IntRange::fixed(height);
        self
    }

    /// Largest fine grid these params can produce, as `(width, height)`.
    #[must_use]
    pub fn max_tile_dimensions(&self) -> Option<(u32, u32)> {
        let w = u32::try_from(self.region_width.max).ok()?;
        let h = u32::try_from(self.region_height.max).ok()?;
        Some((
            w.checked_mul(self.upscale_factor)?,
            h.checked_mul(self.upscale_factor)?,
        ))
    }

    /// Reject parameter sets that would produce degenerate grids or
    /// never-terminating passes.
    pub fn validate(&self) -> Result<()> {
        self.region_width.validate("region_width", 1)?;
        self.region_height.validate("region_height", 1)?;
        self.center_jitter.validate("center_jitter", i32::MIN)?;
        self.carve_radius.validate("carve_radius", 0)?;
        self.extra_islands.validate("extra_islands", 0)?;

        self.elevation.validate("elevation", 2)?;
        if self.elevation.max > 3 {
            return Err(TerrainError::InvalidConfig {
                name: "elevation",
                message: format!("max {} exceeds the obstacle code 3", self.elevation.max),
            });
        }

        self.carve_angle_start
            .validate_magnitude("carve_angle_start", MAX_CARVE_ANGLE)?;
        self.carve_angle_span
            .validate_magnitude("carve_angle_span", MAX_CARVE_ANGLE)?;
        if self.carve_angle_span.min < 0.0 {
            return Err(TerrainError::NonPositive {
                name: "carve_angle_span",
                message: format!("min {} is negative", self.carve_angle_span.min),
            });
        }
        if !(self.carve_angle_step.is_finite() && self.carve_angle_step >= MIN_CARVE_ANGLE_STEP) {
            return Err(TerrainError::NonPositive {
                name: "carve_angle_step",
                message: format!(
                    "step {} must be finite and at least {MIN_CARVE_ANGLE_STEP}",
                    self.carve_angle_step
                ),
            });
        }
        if self.carve_angle_span.max / self.carve_angle_step > MAX_CARVE_RAYS as f32 {
            return Err(TerrainError::InvalidConfig {
                name: "carve_angle_step",
                message: format!(
                    "step {} casts more than {MAX_CARVE_RAYS} rays over span {}",
                    self.carve_angle_step, self.carve_angle_span.max
                ),
            });
        }

        if self.upscale_factor == 0 {
            return Err(TerrainError::NonPositive {
                name: "upscale_factor",
                message: "factor must be at least 1".to_string(),
            });
        }
        if self.max_tile_dimensions().is_none() {
            return Err(TerrainError::DimensionOverflow {
                width: self.region_width.max as u64 * self.upscale_factor as u64,
                height: self.region_height.max as u64 * self.upscale_factor as u64,
            });
        }

        self.carve_fill_odds.validate("carve_fill_odds")?;
        self.rough_to_open.validate("rough_to_open")?;
        self.obstacle_to_open.validate("obstacle_to_open")?;
        self.open_to_rough.validate("open_to_rough")?;
        Ok(())
    }

    /// Load and validate params from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TerrainError::ConfigNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse and validate params from a RON string.
    ///
    /// Missing fields fall back to [`GenerationParams::default`].
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let params: Self = ron::from_str(ron)?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
