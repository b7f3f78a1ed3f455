//! Error types and context helpers for raster reordering

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all reordering operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Input data is malformed or inconsistent
    ///
    /// Raised at the raster reader or distance matrix boundary. The input is
    /// presumed wrong, so the run is aborted without retry.
    InvalidInput(InputError),

    /// The tree violates its structural invariants
    ///
    /// Indicates a defect in tree construction or reordering. Fatal: the run
    /// must stop rather than emit an ordering that would be silently wrong.
    StructuralCorruption {
        /// Description of the violated invariant
        reason: String,
    },

    /// Algorithm parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save a preview image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Distinct input failures reported by the raster reader and dataset checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The magic token is not the ASCII graymap marker
    BadMagic {
        /// Token found in place of the magic
        found: String,
    },
    /// A header field is not a decimal integer
    InvalidHeaderField {
        /// Header field name
        field: &'static str,
        /// Offending token
        token: String,
    },
    /// Width or height is zero
    InvalidDimension {
        /// Header field name
        field: &'static str,
        /// Parsed value
        value: u64,
    },
    /// Maximum gray value outside 1..=65536
    MaxGrayOutOfRange {
        /// Parsed value
        value: u64,
    },
    /// A sample token is not a decimal integer
    InvalidSample {
        /// Row of the sample
        row: usize,
        /// Column of the sample
        col: usize,
        /// Offending token
        token: String,
    },
    /// A sample exceeds the declared maximum gray value
    SampleOutOfRange {
        /// Row of the sample
        row: usize,
        /// Column of the sample
        col: usize,
        /// Parsed value
        value: u64,
        /// Declared maximum gray value
        max_gray: u32,
    },
    /// Input ended before the header or all samples were read
    UnexpectedEof {
        /// What was being read when input ran out
        expected: &'static str,
    },
    /// Two row vectors differ in length
    MismatchedRowLength {
        /// Index of the offending row
        row: usize,
        /// Width established by the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },
    /// The dataset contains no rows
    EmptyDataset,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { found } => write!(
                f,
                "Only portable graymaps in ASCII format are supported (found magic '{found}')"
            ),
            Self::InvalidHeaderField { field, token } => {
                write!(f, "Invalid {field}: '{token}'")
            }
            Self::InvalidDimension { field, value } => {
                write!(f, "Invalid {field}: {value} (must be positive)")
            }
            Self::MaxGrayOutOfRange { value } => write!(
                f,
                "Invalid maximum gray value, must be from 1 to 65536, but is {value}"
            ),
            Self::InvalidSample { row, col, token } => {
                write!(f, "Invalid pixel at row {row}, column {col}: '{token}'")
            }
            Self::SampleOutOfRange {
                row,
                col,
                value,
                max_gray,
            } => write!(
                f,
                "Pixel at row {row}, column {col} is {value}, above maximum gray value {max_gray}"
            ),
            Self::UnexpectedEof { expected } => {
                write!(f, "End of input encountered while reading {expected}")
            }
            Self::MismatchedRowLength {
                row,
                expected,
                found,
            } => write!(f, "Row {row} has {found} samples, expected {expected}"),
            Self::EmptyDataset => write!(f, "Dataset contains no rows"),
        }
    }
}

impl std::error::Error for InputError {}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(input) => write!(f, "Invalid input: {input}"),
            Self::StructuralCorruption { reason } => {
                write!(f, "Structural corruption: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput(input) => Some(input),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::StructuralCorruption { .. } | Self::InvalidParameter { .. } => None,
        }
    }
}

/// Convenience type alias for reordering results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

impl From<InputError> for AlgorithmError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput(err)
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Attaches the path and operation to file system failures
pub trait WithPath<T> {
    /// Convert an I/O failure into [`AlgorithmError::FileSystem`] naming `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| AlgorithmError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a structural corruption error
pub fn structural_corruption(reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::StructuralCorruption {
        reason: reason.to_string(),
    }
}

