//! In-memory raster datasets
//!
//! This module contains the data the reordering core consumes:
//! - Row vectors and the raster that owns them
//! - Seeded row shuffling applied before the first build

/// Row vectors and rasters
pub mod raster;
/// Reproducible row shuffling
pub mod shuffle;

pub use raster::{Raster, RowVector};
