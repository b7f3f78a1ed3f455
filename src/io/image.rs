//! PNG preview export for rasters

use crate::dataset::Raster;
use crate::io::error::{AlgorithmError, Result, WithPath, invalid_parameter};
use image::{ImageBuffer, Luma};
use std::path::Path;

/// Scale a sample against the raster's maximum gray onto the full 16-bit range
fn to_luma16(sample: u32, max_gray: u32) -> u16 {
    let scaled = u64::from(sample.min(max_gray)) * u64::from(u16::MAX) / u64::from(max_gray.max(1));
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

/// Export a raster as a 16-bit grayscale PNG
///
/// # Errors
///
/// Returns an error if:
/// - The raster dimensions do not fit a PNG
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_raster_as_png(raster: &Raster, output_path: &Path) -> Result<()> {
    let (Ok(width), Ok(height)) = (
        u32::try_from(raster.width()),
        u32::try_from(raster.height()),
    ) else {
        return Err(invalid_parameter(
            "raster",
            &format!("{}x{}", raster.width(), raster.height()),
            &"dimensions exceed the PNG limit",
        ));
    };

    let max_gray = raster.max_gray();
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for (y, row) in raster.rows().iter().enumerate() {
        for (x, &sample) in row.samples().iter().enumerate() {
            img.put_pixel(x as u32, y as u32, Luma([to_luma16(sample, max_gray)]));
        }
    }

    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
