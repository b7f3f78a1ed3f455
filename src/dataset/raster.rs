//! Row vectors and the grayscale raster that owns them

use crate::io::configuration::MAX_GRAY_LIMIT;
use crate::io::error::{InputError, Result};
use ndarray::Array1;

/// One raster row: an immutable sequence of grayscale samples
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowVector {
    samples: Vec<u32>,
}

impl RowVector {
    /// Wrap a sample sequence
    pub const fn new(samples: Vec<u32>) -> Self {
        Self { samples }
    }

    /// Borrow the samples
    pub fn samples(&self) -> &[u32] {
        &self.samples
    }

    /// Number of samples (the raster width)
    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    /// Test whether the row holds no samples
    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples as a floating point vector, the starting representative of a leaf
    pub fn to_array(&self) -> Array1<f64> {
        self.samples.iter().map(|&s| f64::from(s)).collect()
    }
}

impl From<Vec<u32>> for RowVector {
    fn from(samples: Vec<u32>) -> Self {
        Self::new(samples)
    }
}

/// Width shared by every row, or `None` for an empty slice
///
/// # Errors
///
/// Returns [`InputError::MismatchedRowLength`] for the first row whose length
/// differs from the first row
pub fn common_width(rows: &[RowVector]) -> Result<Option<usize>> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let expected = first.len();
    for (row, vector) in rows.iter().enumerate() {
        if vector.len() != expected {
            return Err(InputError::MismatchedRowLength {
                row,
                expected,
                found: vector.len(),
            }
            .into());
        }
    }
    Ok(Some(expected))
}

/// Grayscale raster held as row vectors plus its header fields
///
/// The maximum gray value is carried through reordering unchanged so the
/// writer can re-emit the original header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    max_gray: u32,
    rows: Vec<RowVector>,
}

impl Raster {
    /// Assemble a raster from its rows
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `rows` is empty
    /// - Any row's length differs from `width`
    /// - `max_gray` is outside 1..=65536
    /// - Any sample exceeds `max_gray`
    pub fn new(width: usize, max_gray: u32, rows: Vec<RowVector>) -> Result<Self> {
        if rows.is_empty() {
            return Err(InputError::EmptyDataset.into());
        }
        if width == 0 {
            return Err(InputError::InvalidDimension {
                field: "width",
                value: 0,
            }
            .into());
        }
        if max_gray == 0 || max_gray > MAX_GRAY_LIMIT {
            return Err(InputError::MaxGrayOutOfRange {
                value: u64::from(max_gray),
            }
            .into());
        }
        for (row, vector) in rows.iter().enumerate() {
            if vector.len() != width {
                return Err(InputError::MismatchedRowLength {
                    row,
                    expected: width,
                    found: vector.len(),
                }
                .into());
            }
            if let Some((col, &value)) = vector
                .samples()
                .iter()
                .enumerate()
                .find(|&(_, &value)| value > max_gray)
            {
                return Err(InputError::SampleOutOfRange {
                    row,
                    col,
                    value: u64::from(value),
                    max_gray,
                }
                .into());
            }
        }

        Ok(Self {
            width,
            max_gray,
            rows,
        })
    }

    /// Samples per row
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.rows.len()
    }

    /// Maximum gray value from the header
    pub const fn max_gray(&self) -> u32 {
        self.max_gray
    }

    /// Borrow the rows in their current order
    pub fn rows(&self) -> &[RowVector] {
        &self.rows
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<RowVector> {
        self.rows
    }

    /// Same header fields with a new set of rows
    ///
    /// # Errors
    ///
    /// Returns an error if the new rows do not fit the header
    pub fn with_rows(&self, rows: Vec<RowVector>) -> Result<Self> {
        Self::new(self.width, self.max_gray, rows)
    }

    /// All samples in row-major order
    pub fn samples(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.samples().iter().copied())
    }
}
