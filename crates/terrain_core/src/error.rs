//! Error types for terrain generation.

use thiserror::Error;

/// Result type alias using [`TerrainError`].
pub type Result<T> = std::result::Result<T, TerrainError>;

/// Top-level error type for terrain generation.
///
/// Generation passes themselves never fail; everything here is raised
/// either while validating configuration or while allocating grids.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// A bounded range has `min > max`.
    #[error("Invalid range for '{name}': min {min} is greater than max {max}")]
    InvertedRange {
        /// Parameter name.
        name: &'static str,
        /// Lower bound as configured.
        min: String,
        /// Upper bound as configured.
        max: String,
    },

    /// A range or scalar would produce a zero or negative extent.
    #[error("Parameter '{name}' must be positive: {message}")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with the value.
        message: String,
    },

    /// A probability is not expressible as `numerator / denominator`.
    #[error("Invalid odds for '{name}': {numerator}/{denominator}")]
    InvalidOdds {
        /// Parameter name.
        name: &'static str,
        /// Numerator as configured.
        numerator: u32,
        /// Denominator as configured.
        denominator: u32,
    },

    /// Any other configuration value outside its legal domain.
    #[error("Invalid configuration for '{name}': {message}")]
    InvalidConfig {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Grid dimensions overflow `usize` once multiplied out.
    #[error("Grid dimensions {width}x{height} overflow addressable memory")]
    DimensionOverflow {
        /// Requested width in cells.
        width: u64,
        /// Requested height in cells.
        height: u64,
    },

    /// The allocator refused the grid buffer.
    #[error("Failed to allocate {width}x{height} grid: {source}")]
    Allocation {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
        /// Underlying allocator error.
        #[source]
        source: std::collections::TryReserveError,
    },

    /// Config file not found.
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    /// Failed to read a config file.
    #[error("Failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Failed to parse RON config.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),
}
