//! # Error Types
//!
//! Structured error types for beam_core. Each variant carries enough context
//! for a caller (the CLI or a web handler) to translate the failure into a
//! user-visible message without string parsing.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{BeamError, BeamResult};
//!
//! fn validate_span(span_m: f64) -> BeamResult<()> {
//!     if span_m <= 0.0 {
//!         return Err(BeamError::DegenerateBeam { span_m });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beam_core operations
pub type BeamResult<T> = Result<T, BeamError>;

/// Structured error type for beam analysis operations.
///
/// Errors are synchronous and raised at the point of invocation; the engine
/// surfaces the first invalid condition it encounters and never retries or
/// suppresses.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BeamError {
    /// A load has invalid geometry or a non-finite magnitude
    #[error("Invalid load input for '{field}': {value} - {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// Beam span is non-positive (or not a finite number)
    #[error("Degenerate beam: span {span_m} m must be positive")]
    DegenerateBeam { span_m: f64 },

    /// A discretization or analysis parameter is out of range
    #[error("Invalid parameter '{parameter}': {value} - {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Case file I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Report compilation or PDF export error
    #[error("Report rendering failed: {reason}")]
    Render { reason: String },
}

impl BeamError {
    /// Create a Validation error
    pub fn validation(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BeamError::Validation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BeamError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BeamError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Render error
    pub fn render(reason: impl Into<String>) -> Self {
        BeamError::Render {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BeamError::Validation { .. } => "VALIDATION",
            BeamError::DegenerateBeam { .. } => "DEGENERATE_BEAM",
            BeamError::InvalidParameter { .. } => "INVALID_PARAMETER",
            BeamError::FileError { .. } => "FILE_ERROR",
            BeamError::Serialization { .. } => "SERIALIZATION_ERROR",
            BeamError::Render { .. } => "RENDER_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = BeamError::validation("position", "-2.0", "Position must lie within [0, span]");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: BeamError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BeamError::DegenerateBeam { span_m: -1.0 }.error_code(),
            "DEGENERATE_BEAM"
        );
        assert_eq!(
            BeamError::invalid_parameter("station_count", "1", "too few").error_code(),
            "INVALID_PARAMETER"
        );
    }

    #[test]
    fn test_display_message() {
        let error = BeamError::DegenerateBeam { span_m: 0.0 };
        assert_eq!(error.to_string(), "Degenerate beam: span 0 m must be positive");
    }
}
