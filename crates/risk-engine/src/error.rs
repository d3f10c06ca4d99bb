//! Engine Error Types

use climate_core::ValidationError;
use risk_fusion::FusionError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the engine facade
#[derive(Debug, Error)]
pub enum EngineError {
    /// Non-numeric, non-finite or missing reading
    #[error("Invalid input: {0}")]
    Input(#[from] ValidationError),

    /// One batch item failed; the whole batch is abandoned
    #[error("Batch item {index} failed")]
    BatchItem {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Batch payload is not a JSON list of records
    #[error("Invalid batch payload")]
    BatchPayload(#[source] serde_json::Error),

    #[error("Configuration error")]
    Config(#[from] ::config::ConfigError),

    #[error("Model name '{0}' is configured more than once")]
    DuplicateModel(String),

    #[error("Invalid fusion settings")]
    Fusion(#[from] FusionError),

    #[error("Failed to read precautions file {path}")]
    PrecautionsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse precautions file {path}")]
    PrecautionsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown disease '{0}' in precautions file")]
    UnknownDisease(String),
}

/// Serializable error payload: top-level message plus the cause chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub trace: String,
}

impl ErrorReport {
    /// Render an error and every `source()` beneath it
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = vec![format!("Error: {}", err)];
        let mut cause = err.source();
        while let Some(inner) = cause {
            trace.push(format!("Caused by: {}", inner));
            cause = inner.source();
        }

        Self {
            error: err.to_string(),
            trace: trace.join("\n"),
        }
    }
}
