//! Error types for power-stats
//!
//! Every failure the pipeline can surface is one of these variants. Form
//! validation problems are reported separately as [`FieldError`] lists since
//! they never reach the compute path.

use thiserror::Error;

/// Main error type for power-stats operations
#[derive(Error, Debug)]
pub enum PowerStatsError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported source file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Source bytes are not valid in the detected text encoding
    #[error("Could not decode source file as {0}")]
    Encoding(String),

    /// None of the accepted column names is present
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Source file has no usable rows
    #[error("Dataset is empty or has no rows")]
    EmptyDataset,

    /// Timestamp and value sequences disagree in length
    #[error("Series length mismatch: {timestamps} timestamps, {values} values")]
    SeriesLengthMismatch { timestamps: usize, values: usize },

    /// Month code outside "all" / "01".."12"
    #[error("Invalid month code: '{0}'")]
    InvalidMonth(String),

    /// Request parameters rejected by the compute backend
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The compute backend returned something other than a well-formed response
    #[error("Malformed compute response: {0}")]
    Decode(String),

    /// The compute backend reported a failure
    #[error("Computation failed: {0}")]
    Compute(String),

    /// The background worker is gone
    #[error("Background worker is not running")]
    WorkerUnavailable,

    /// System clipboard unavailable or rejected the text
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Result type alias for power-stats operations
pub type Result<T> = std::result::Result<T, PowerStatsError>;

/// UI-friendly error message formatting
impl PowerStatsError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            PowerStatsError::FileIo(e) => format!("File error: {}", e),
            PowerStatsError::Polars(e) => format!("Data error: {}", e),
            PowerStatsError::Json(e) => format!("JSON error: {}", e),
            PowerStatsError::Config(msg) => format!("Config error: {}", msg),
            PowerStatsError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            PowerStatsError::Encoding(name) => {
                format!("File is not readable as {} text", name)
            }
            PowerStatsError::ColumnNotFound { column } => {
                format!("Column '{}' not found", column)
            }
            PowerStatsError::EmptyDataset => "Dataset is empty".to_string(),
            PowerStatsError::SeriesLengthMismatch { timestamps, values } => {
                format!(
                    "Series has {} timestamps but {} values",
                    timestamps, values
                )
            }
            PowerStatsError::InvalidMonth(code) => format!("Unknown month '{}'", code),
            PowerStatsError::Validation(msg) => format!("Validation error: {}", msg),
            PowerStatsError::Decode(msg) => format!("Malformed response: {}", msg),
            PowerStatsError::Compute(msg) => msg.clone(),
            PowerStatsError::WorkerUnavailable => "Background worker stopped".to_string(),
            PowerStatsError::Clipboard(e) => format!("Could not copy: {}", e),
        }
    }

    /// Get a short title for the error (for toast notifications)
    pub fn title(&self) -> &'static str {
        match self {
            PowerStatsError::FileIo(_) => "File Error",
            PowerStatsError::Polars(_) => "Data Error",
            PowerStatsError::Json(_) => "JSON Error",
            PowerStatsError::Config(_) => "Configuration Error",
            PowerStatsError::UnsupportedFormat { .. } => "Unsupported Format",
            PowerStatsError::Encoding(_) => "Encoding Error",
            PowerStatsError::ColumnNotFound { .. } => "Column Not Found",
            PowerStatsError::EmptyDataset => "Empty Dataset",
            PowerStatsError::SeriesLengthMismatch { .. } => "Invalid Series",
            PowerStatsError::InvalidMonth(_) => "Invalid Month",
            PowerStatsError::Validation(_) => "Validation Error",
            PowerStatsError::Decode(_) => "Decode Error",
            PowerStatsError::Compute(_) => "Computation Error",
            PowerStatsError::WorkerUnavailable => "Worker Error",
            PowerStatsError::Clipboard(_) => "Clipboard Error",
        }
    }
}

/// Form fields that can carry an inline validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    RatedCapacity,
    IsPrimaryLoad,
    Factor,
    Filepath,
}

/// A single failed form rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: FormField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Why a submission did not start a computation
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The form failed validation; the errors are also shown inline
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),

    /// The request could not be handed to the worker
    #[error(transparent)]
    NotQueued(#[from] PowerStatsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PowerStatsError::ColumnNotFound {
            column: "active_power".to_string(),
        };
        assert_eq!(err.user_message(), "Column 'active_power' not found");
        assert_eq!(err.title(), "Column Not Found");

        let err = PowerStatsError::SeriesLengthMismatch {
            timestamps: 3,
            values: 2,
        };
        assert_eq!(err.user_message(), "Series has 3 timestamps but 2 values");
    }

    #[test]
    fn test_compute_message_is_passed_through() {
        let err = PowerStatsError::Compute("boom".to_string());
        assert_eq!(err.user_message(), "boom");
        assert_eq!(err.to_string(), "Computation failed: boom");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PowerStatsError = io_err.into();
        assert!(matches!(err, PowerStatsError::FileIo(_)));

        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: PowerStatsError = json_err.into();
        assert!(matches!(err, PowerStatsError::Json(_)));
    }
}
