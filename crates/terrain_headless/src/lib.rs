//! Headless terrain runner for previews, parameter tuning and CI.
//!
//! This crate drives `terrain_core` without any rendering:
//!
//! - **Previews**: ASCII minimaps of a single seed in the terminal
//! - **Batches**: Many seeds generated in parallel, with aggregate stats
//! - **Determinism checks**: The same seed generated repeatedly must match
//!
//! # Output
//!
//! - **stdout**: Minimaps and JSON stats
//! - **stderr**: Logs (human-readable)
//!
//! # Example
//!
//! ```bash
//! # Preview one map
//! cargo run -p terrain_headless -- generate --seed 42
//!
//! # Generate 500 maps and write batch_results.json
//! cargo run -p terrain_headless -- batch --count 500 --output results/
//! ```

pub mod ascii_visualizer;
pub mod batch;
pub mod metrics;

pub use ascii_visualizer::{render_minimap, AsciiConfig};
pub use batch::{run_batch, verify_determinism, BatchConfig, BatchResults};
pub use metrics::{BatchSummary, MapMetrics};
