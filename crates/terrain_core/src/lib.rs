//! # Terrain Core
//!
//! Procedural terrain generation for the Simple RTS prototype.
//!
//! A seed (or any injected [`rand::Rng`]) is turned into a 2-D grid of
//! terrain codes through a multi-pass cellular process on two
//! resolutions: a coarse region grid that is carved, seeded and eroded,
//! then a fine tile grid that is upscaled, roughened and smoothed.
//!
//! This crate contains **only** generation logic:
//! - No rendering
//! - No window, camera or global state
//! - No hidden randomness (every pass takes the stream explicitly)
//!
//! ## Crate Structure
//!
//! - [`config`] - Generation parameters and validation
//! - [`tile`] - Terrain codes
//! - [`grid`] - Bounds-checked row-major grid
//! - [`rng`] - Default seeded stream
//! - [`region`] - Region allocation, landmass carve, islands
//! - [`erosion`] - Erosion/growth pass
//! - [`upscale`] - Region to tile upscale
//! - [`roughen`] - Stochastic roughening
//! - [`smoothing`] - Smoothing automaton
//! - [`generator`] - Pipeline and the read-only map query surface
//! - [`stats`] - Histograms and noise measures

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod erosion;
pub mod error;
pub mod generator;
pub mod grid;
pub mod region;
pub mod rng;
pub mod roughen;
pub mod smoothing;
pub mod stats;
pub mod tile;
pub mod upscale;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        FloatRange, GenerationParams, IntRange, Odds, SmoothingRules, UpdateMode,
    };
    pub use crate::error::{Result, TerrainError};
    pub use crate::generator::{generate_map, SpawnPoint, TerrainGenerator, TerrainMap, TileQuery};
    pub use crate::stats::{MapStats, TerrainHistogram};
    pub use crate::tile::TileCode;
    pub use crate::upscale::TileGrid;
}
