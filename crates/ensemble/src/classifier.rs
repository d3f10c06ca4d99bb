//! Classifier Capabilities

use climate_core::FEATURE_DIMENSION;

use crate::InferenceError;

/// A classifier that emits a probability per known class
pub trait DistributionModel: Send + Sync {
    /// Class labels, aligned with [`predict_proba`](Self::predict_proba) output
    fn classes(&self) -> &[String];

    /// Probability per class for one feature vector
    fn predict_proba(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<Vec<f64>, InferenceError>;

    /// Native per-feature importance, if the model reports one
    fn feature_importances(&self) -> Option<[f64; FEATURE_DIMENSION]> {
        None
    }
}

/// A classifier that can only name a single class
pub trait LabelModel: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<String, InferenceError>;

    fn feature_importances(&self) -> Option<[f64; FEATURE_DIMENSION]> {
        None
    }
}

/// A loaded classifier, by capability
pub enum Classifier {
    Distribution(Box<dyn DistributionModel>),
    Label(Box<dyn LabelModel>),
}

impl Classifier {
    pub fn feature_importances(&self) -> Option<[f64; FEATURE_DIMENSION]> {
        match self {
            Classifier::Distribution(model) => model.feature_importances(),
            Classifier::Label(model) => model.feature_importances(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Distribution(_) => "distribution",
            Classifier::Label(_) => "label",
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Classifier").field(&self.kind()).finish()
    }
}

/// A classifier together with the name it votes under
#[derive(Debug)]
pub struct NamedClassifier {
    pub name: String,
    pub classifier: Classifier,
}

impl NamedClassifier {
    pub fn new(name: impl Into<String>, classifier: Classifier) -> Self {
        Self {
            name: name.into(),
            classifier,
        }
    }
}
