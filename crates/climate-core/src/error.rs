//! Validation Error Types

use thiserror::Error;

/// Errors raised while turning raw input into an [`Observation`](crate::Observation)
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Reading could not be parsed as a number
    #[error("could not convert {field} to float: '{raw}'")]
    NonNumeric { field: &'static str, raw: String },

    /// Reading parsed but is NaN or infinite
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
