//! Failure reporting for classifiers left out of the ensemble

use tracing::{debug, warn};

use crate::{InferenceError, LoadError};

/// Receives classifier failures the ensemble recovers from
pub trait EnsembleObserver: Send + Sync {
    fn load_failed(&self, name: &str, error: &LoadError);
    fn predict_failed(&self, name: &str, error: &InferenceError);
}

/// Default observer: logs through `tracing` and counts failures
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EnsembleObserver for TracingObserver {
    fn load_failed(&self, name: &str, error: &LoadError) {
        match error {
            LoadError::Missing(path) => {
                debug!("Classifier '{}' not available at {}", name, path.display());
            }
            _ => {
                warn!("Skipping classifier '{}': {}", name, error);
                metrics::counter!("climate_risk_classifier_failures_total", "stage" => "load")
                    .increment(1);
            }
        }
    }

    fn predict_failed(&self, name: &str, error: &InferenceError) {
        warn!("Classifier '{}' failed to predict: {}", name, error);
        metrics::counter!("climate_risk_classifier_failures_total", "stage" => "predict")
            .increment(1);
    }
}
