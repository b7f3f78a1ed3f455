//! Reorders the rows of a grayscale raster so that similar rows end up adjacent
//!
//! Rows are clustered bottom-up into a binary dendrogram, then the children
//! of internal nodes are flipped to shorten the summed distance between
//! consecutive leaves. Two flipping strategies are provided: a fast local
//! pass over merge junctions and an exact optimal leaf ordering.

#![forbid(unsafe_code)]

/// Distance computation, clustering, leaf ordering, scoring and validation
pub mod algorithm;
/// Raster rows and dataset preparation
pub mod dataset;
/// Input/output operations and error handling
pub mod io;
/// Arena-backed binary dendrogram
pub mod tree;

pub use io::error::{AlgorithmError, Result};
