//! Tests for PNG preview export

#[cfg(test)]
mod tests {
    use leaforder::dataset::{Raster, RowVector};
    use leaforder::io::image::export_raster_as_png;
    use tempfile::TempDir;

    fn gradient() -> Raster {
        let rising = RowVector::new(vec![0, 2, 4]);
        let falling = RowVector::new(vec![4, 2, 0]);
        Raster::new(3, 4, vec![rising, falling]).expect("valid raster")
    }

    // Tests preview dimensions and gray scaling to 16 bits
    // Verified by writing raw samples without scaling
    #[test]
    fn test_export_scales_to_full_range() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let path = temp_dir.path().join("preview.png");

        export_raster_as_png(&gradient(), &path).expect("Failed to export preview");

        let image = image::open(&path)
            .expect("Failed to read preview")
            .into_luma16();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0]);
        assert_eq!(image.get_pixel(2, 0).0, [u16::MAX]);
        assert_eq!(image.get_pixel(1, 1).0, [u16::MAX / 2]);
    }

    // Tests missing parent directories are created
    // Verified by skipping directory creation
    #[test]
    fn test_export_creates_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let path = temp_dir.path().join("a").join("b").join("preview.png");

        export_raster_as_png(&gradient(), &path).expect("Failed to export preview");
        assert!(path.exists());
    }
}
