//! Error types for the polish_match library

use thiserror::Error;

/// Result type alias for polish_match operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Comprehensive error types for sampling and matching operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Sampling region does not overlap the frame in a usable way
    #[error("Region {width}x{height}{x:+}{y:+} is out of bounds for a {frame_width}x{frame_height} frame")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        frame_width: u32,
        frame_height: u32,
    },

    /// Frame source (camera) could not be acquired
    #[error("Frame source unavailable: {message}")]
    DeviceUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Submitted image could not be decoded
    #[error("Failed to decode image: {message}")]
    DecodeFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Still-image pipeline exceeded its time budget
    #[error("Processing timed out: {operation} took {duration_ms}ms (limit: {limit_ms}ms)")]
    ProcessingTimeout {
        operation: String,
        duration_ms: u64,
        limit_ms: u64,
    },

    /// No catalog entry carries the requested id
    #[error("Catalog entry not found: {id}")]
    CatalogEntryMissing { id: u64 },

    /// Matching was requested against a catalog with no entries
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Catalog file could not be read or parsed
    #[error("Failed to load catalog: {message}")]
    CatalogLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Color notation could not be parsed
    #[error("Invalid color '{input}': {reason}")]
    InvalidColor { input: String, reason: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Session action not allowed in the current state
    #[error("Cannot {action} while session is {state}")]
    InvalidSessionState { action: String, state: String },
}

impl AnalysisError {
    /// Create a decode error with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a device error with context
    pub fn device<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DeviceUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a catalog loading error with context
    pub fn catalog_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::CatalogLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn invalid_parameter(parameter: &str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Recoverable errors leave engine state untouched; the caller may
    /// simply retry with the next frame or a new image.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::OutOfBounds { .. }
                | AnalysisError::DeviceUnavailable { .. }
                | AnalysisError::ProcessingTimeout { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::DeviceUnavailable { .. } => {
                "Could not access the camera. Please check permissions and try again.".to_string()
            }
            AnalysisError::DecodeFailure { .. } => {
                "Could not read the image. Please choose a valid image file.".to_string()
            }
            AnalysisError::ProcessingTimeout { .. } => {
                "Processing is taking too long. Please try again.".to_string()
            }
            AnalysisError::CatalogEntryMissing { id } => {
                format!("Polish {} is not in the catalog.", id)
            }
            AnalysisError::OutOfBounds { .. } => {
                "The image is too small to sample. Please use a larger image.".to_string()
            }
            _ => "Color analysis failed. Please try with a different image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let timeout = AnalysisError::ProcessingTimeout {
            operation: "dominant color".into(),
            duration_ms: 10_500,
            limit_ms: 10_000,
        };
        assert!(timeout.is_recoverable());
        assert!(!AnalysisError::CatalogEntryMissing { id: 7 }.is_recoverable());
        assert!(!AnalysisError::EmptyCatalog.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::OutOfBounds {
            x: 10,
            y: -2,
            width: 0,
            height: 5,
            frame_width: 4,
            frame_height: 4,
        };
        assert_eq!(
            err.to_string(),
            "Region 0x5+10-2 is out of bounds for a 4x4 frame"
        );

        let err = AnalysisError::ProcessingTimeout {
            operation: "canvas".into(),
            duration_ms: 12,
            limit_ms: 10,
        };
        assert_eq!(
            err.to_string(),
            "Processing timed out: canvas took 12ms (limit: 10ms)"
        );
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no camera");
        let err = AnalysisError::device("camera 0", io);
        assert!(err.source().is_some());
        assert!(err.user_message().contains("camera"));
    }
}
