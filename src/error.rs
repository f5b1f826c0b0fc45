//! Error types for scancheck library.

use std::io;
use thiserror::Error;

/// Result type alias for scancheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while validating documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the CSV report.
    #[error("Report I/O error: {0}")]
    Csv(#[from] csv::Error),

    /// Error decoding or encoding a raster image.
    #[error("Image error: {0}")]
    Image(String),

    /// The source document could not be opened at all.
    #[error("Cannot open document: {0}")]
    CannotOpen(String),

    /// A page could not be rasterized.
    #[error("Rasterization error on page {page}: {message}")]
    Rasterize {
        /// 1-based page index
        page: u32,
        /// Backend message
        message: String,
    },

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The report file exists but does not look like a scancheck report.
    #[error("Invalid report: {0}")]
    InvalidReport(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CannotOpen("broken.pdf".into());
        assert_eq!(err.to_string(), "Cannot open document: broken.pdf");

        let err = Error::Rasterize {
            page: 3,
            message: "bitmap allocation failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "Rasterization error on page 3: bitmap allocation failed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
