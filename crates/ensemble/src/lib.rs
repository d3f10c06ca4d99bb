//! Classifier Ensemble
//!
//! Loads trained classifiers from JSON model artifacts and averages their
//! class probabilities into one score per disease. A classifier that fails
//! to load or predict is left out; an empty ensemble is valid.

mod artifact;
mod classifier;
mod ensemble;
mod observer;

pub use artifact::{load_artifact, CentroidModel, ModelArtifact, PriorModel, SoftmaxModel};
pub use classifier::{Classifier, DistributionModel, LabelModel, NamedClassifier};
pub use ensemble::{Ensemble, EnsembleOutcome, ModelSpec, Vote, LABEL_ONLY_CONFIDENCE};
pub use observer::{EnsembleObserver, TracingObserver};

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a model artifact
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model artifact not found: {0}")]
    Missing(PathBuf),
    #[error("Failed to read model artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model artifact {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid output shape: expected {expected}, got {actual}")]
    InvalidOutputShape { expected: usize, actual: usize },
    #[error("Invalid probability {value} for class '{class}'")]
    InvalidProbability { class: String, value: f64 },
}
