//! Error types for the cube_scan library
//!
//! Per-frame outcomes such as a malformed polygon, an off-palette color or an
//! incoherent set of nine stickers are not errors; those are reported as
//! `None`. The variants below cover integration and configuration defects.

use thiserror::Error;

/// Result type alias for cube_scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Error types for cube face scanning
#[derive(Error, Debug)]
pub enum ScanError {
    /// A sticker region contained no pixels
    #[error("Empty pixel region at ({x}, {y}) size {width}x{height}")]
    EmptyRegion {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Classifier built from a palette without entries
    #[error("Palette must contain at least one entry")]
    EmptyPalette,

    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Raw frame buffer does not match its declared dimensions
    #[error("Invalid frame: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration or polygon file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ScanError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error only spoils the current frame.
    ///
    /// A mismatched frame buffer can be dropped and the next frame processed;
    /// everything else points at a broken integration or configuration.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::InvalidFrame { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScanError::EmptyRegion {
            x: 10,
            y: 20,
            width: 0,
            height: 5,
        };
        assert_eq!(err.to_string(), "Empty pixel region at (10, 20) size 0x5");

        let err = ScanError::invalid_parameter("grid.gap_multiplier", -1.0);
        assert_eq!(err.to_string(), "Invalid parameter: grid.gap_multiplier = -1");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ScanError::InvalidFrame {
            expected: 12,
            actual: 9
        }
        .is_recoverable());
        assert!(!ScanError::EmptyPalette.is_recoverable());
    }

    #[test]
    fn test_config_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ScanError::config("Failed to read config.json", io);
        assert!(err.source().is_some());
    }
}
