//! Climate Disease Risk Engine
//!
//! Facade over the scoring pipeline:
//! readings -> {rules, ensemble} -> fusion -> {severity, explanation} -> result.

mod config;
mod engine;
mod error;
mod precautions;
mod result;

pub use config::EngineConfig;
pub use engine::{BatchRecord, RiskEngine};
pub use error::{EngineError, ErrorReport};
pub use precautions::PrecautionBook;
pub use result::{BatchPrediction, EnsembleVotes, PredictionResult};

pub use climate_core::{Disease, Observation, RawReading, RiskContext};
pub use ensemble::{Ensemble, EnsembleObserver, TracingObserver};
pub use risk_fusion::Severity;
