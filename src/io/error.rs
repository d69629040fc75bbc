//! Error types and context management for tile model and collapse operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all tile model operations
///
/// A contradiction reached while collapsing is not an error; it is reported
/// through [`crate::algorithm::executor::RunResult`].
#[derive(Debug)]
pub enum AlgorithmError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Source data doesn't meet algorithm requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Tile dimensions exceed the smallest dimension of the source bitmap
    TileDimensions {
        /// Requested tile width
        tile_width: usize,
        /// Requested tile height
        tile_height: usize,
        /// Width of the source bitmap
        bitmap_width: usize,
        /// Height of the source bitmap
        bitmap_height: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Internal contract broken by a caller
    ///
    /// Raised when collapsing an already collapsed cell, addressing a cell
    /// outside the grid, or querying a tile the catalog does not contain.
    InvariantViolation {
        /// Operation that detected the violation
        operation: &'static str,
        /// Description of the broken contract
        reason: String,
    },

    /// Failed to save generated image to disk
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

    /// A global logger was already installed
    Logger {
        /// Underlying logger error
        source: log::SetLoggerError,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::TileDimensions {
                tile_width,
                tile_height,
                bitmap_width,
                bitmap_height,
            } => {
                write!(
                    f,
                    "Tile size {tile_width}x{tile_height} exceeds the smallest dimension of the \
                     {bitmap_width}x{bitmap_height} bitmap"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvariantViolation { operation, reason } => {
                write!(f, "Invariant violated in {operation}: {reason}")
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
            Self::Logger { source } => write!(f, "Failed to install logger: {source}"),
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Logger { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for algorithm results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Attaches the real path to I/O errors converted with `?`
pub trait WithContext<T> {
    /// Replace the placeholder path of an I/O error with `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;

    /// Replace the placeholder operation of a file system error
    ///
    /// # Errors
    ///
    /// Propagates the original error with the operation applied
    fn with_operation(self, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AlgorithmError>,
{
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                AlgorithmError::ImageLoad { path: p, .. }
                | AlgorithmError::ImageExport { path: p, .. }
                | AlgorithmError::FileSystem { path: p, .. } => {
                    *p = path.to_path_buf();
                }
                _ => {}
            }
            error
        })
    }

    fn with_operation(self, operation: &'static str) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            if let AlgorithmError::FileSystem { operation: op, .. } = &mut error {
                *op = operation;
            }
            error
        })
    }
}

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
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

impl From<log::SetLoggerError> for AlgorithmError {
    fn from(err: log::SetLoggerError) -> Self {
        Self::Logger { source: err }
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

/// Create an invariant violation error
pub fn invariant_violation(operation: &'static str, reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::InvariantViolation {
        operation,
        reason: reason.to_string(),
    }
}
