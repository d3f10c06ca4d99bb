//! Engine Configuration
//!
//! Layered: built-in defaults, then an optional TOML/JSON file, then
//! `CLIMATE_RISK__*` environment variables (`__` separates nested keys).

use ensemble::ModelSpec;
use risk_fusion::FusionConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::EngineError;

const ENV_PREFIX: &str = "CLIMATE_RISK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding classifier artifacts
    pub model_dir: PathBuf,
    /// Ensemble members, in voting order
    pub models: Vec<ModelSpec>,
    /// Member whose native feature importance feeds the explanation
    pub importance_model: String,
    pub fusion: FusionConfig,
    /// Optional JSON file overriding precautions per disease
    pub precautions_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            models: vec![
                ModelSpec::new("Random Forest", "RandomForest_model.json"),
                ModelSpec::new("SVM", "SVM_model.json"),
                ModelSpec::new("Logistic Regression", "LogisticRegression_model.json"),
                ModelSpec::new("Primary Model", "model.json"),
            ],
            importance_model: "Random Forest".to_string(),
            fusion: FusionConfig::default(),
            precautions_file: None,
        }
    }
}

impl EngineConfig {
    /// Check fusion weights and that every model votes under a distinct name
    pub fn validate(&self) -> Result<(), EngineError> {
        self.fusion.validate()?;

        let mut seen = HashSet::new();
        for spec in &self.models {
            if !seen.insert(spec.name.as_str()) {
                return Err(EngineError::DuplicateModel(spec.name.clone()));
            }
        }
        Ok(())
    }

    /// Load configuration; `path`, when given, must exist
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        info!(
            "Configuration loaded: {} models from {}",
            config.models.len(),
            config.model_dir.display()
        );
        Ok(config)
    }
}
