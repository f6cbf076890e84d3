//! Error types for spc-oxide
//!
//! This module provides structured error handling using thiserror,
//! replacing ad-hoc String-based errors with proper typed errors.

use thiserror::Error;

/// Main error type for spc-oxide operations
#[derive(Error, Debug)]
pub enum SpcError {
    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Column not found in a frame
    #[error("Column '{column}' not found in frame '{ref_id}'")]
    ColumnNotFound { column: String, ref_id: String },

    /// Frame is missing a required column for its detected shape
    #[error("Frame '{ref_id}' is missing required column '{column}'")]
    MissingColumn { column: String, ref_id: String },

    /// Frame has no usable columns or rows
    #[error("Frame '{ref_id}' is empty")]
    EmptyFrame { ref_id: String },

    /// Options validation error
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Type conversion error
    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}

/// Result type alias for spc-oxide operations
pub type Result<T> = std::result::Result<T, SpcError>;

/// Host-friendly error message formatting
impl SpcError {
    /// Get a user-friendly error message suitable for displaying in the host UI
    pub fn user_message(&self) -> String {
        match self {
            SpcError::Polars(e) => format!("Data error: {}", e),
            SpcError::Json(e) => format!("Options error: {}", e),
            SpcError::ColumnNotFound { column, ref_id } => {
                format!("Column '{}' not found in query {}", column, ref_id)
            }
            SpcError::MissingColumn { column, ref_id } => {
                format!("Column '{}' is missing in query {}", column, ref_id)
            }
            SpcError::EmptyFrame { ref_id } => format!("Query {} returned no data", ref_id),
            SpcError::InvalidOptions(msg) => format!("Invalid options: {}", msg),
            SpcError::TypeConversion(msg) => format!("Type error: {}", msg),
        }
    }

    /// Get a short title for the error (for host notifications)
    pub fn title(&self) -> &'static str {
        match self {
            SpcError::Polars(_) => "Data Error",
            SpcError::Json(_) => "Options Error",
            SpcError::ColumnNotFound { .. } => "Column Not Found",
            SpcError::MissingColumn { .. } => "Missing Column",
            SpcError::EmptyFrame { .. } => "Empty Query",
            SpcError::InvalidOptions(_) => "Invalid Options",
            SpcError::TypeConversion(_) => "Type Error",
        }
    }
}
