//! Pipeline constants and runtime configuration defaults

// Raster format
/// Magic token of an ASCII portable graymap
pub const PGM_MAGIC: &str = "P2";
/// Largest accepted maximum gray value
pub const MAX_GRAY_LIMIT: u32 = 65_536;
/// File extension of accepted rasters
pub const PGM_EXTENSION: &str = "pgm";

// Ordering
/// Largest row count for which the optimal strategy runs before falling back
///
/// The optimal strategy is cubic in the row count, so larger rasters use the
/// local strategy unless the limit is lifted.
pub const DEFAULT_OPTIMAL_LEAF_LIMIT: usize = 2048;

// Default values for configurable parameters
/// Fixed seed for reproducible shuffling
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Suffix added to PNG preview filenames
pub const PREVIEW_SUFFIX: &str = "_preview";
/// Extension of PNG preview files
pub const PREVIEW_EXTENSION: &str = "png";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;
