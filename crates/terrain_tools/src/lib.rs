//! # Terrain Tools
//!
//! Development tools for generation configs:
//! - Config validators
//! - Default config export

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod validate;
