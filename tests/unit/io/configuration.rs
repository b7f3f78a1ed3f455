//! Tests for configuration constants

#[cfg(test)]
mod tests {
    use leaforder::io::configuration::{
        DEFAULT_OPTIMAL_LEAF_LIMIT, MAX_GRAY_LIMIT, MAX_INDIVIDUAL_PROGRESS_BARS, PGM_EXTENSION,
        PGM_MAGIC, PREVIEW_EXTENSION, PREVIEW_SUFFIX,
    };

    // Tests the accepted raster format constants
    // Verified by lowering the maximum gray limit to 65535
    #[test]
    fn test_format_constants() {
        assert_eq!(PGM_MAGIC, "P2");
        assert_eq!(MAX_GRAY_LIMIT, 65_536);
        assert_eq!(PGM_EXTENSION, "pgm");
    }

    // Tests output naming and display thresholds stay usable
    // Verified by setting the progress bar threshold to zero
    #[test]
    fn test_output_constants() {
        let preview = format!("x{PREVIEW_SUFFIX}.{PREVIEW_EXTENSION}");
        assert_eq!(preview, "x_preview.png");
        assert!(MAX_INDIVIDUAL_PROGRESS_BARS > 0);
        assert!(DEFAULT_OPTIMAL_LEAF_LIMIT >= 2);
    }
}
