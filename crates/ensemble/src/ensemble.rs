//! Ensemble Voting and Probability Averaging

use climate_core::{round_to, Disease, FeatureWeights, ScoreVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::artifact::load_artifact;
use crate::classifier::{Classifier, DistributionModel, NamedClassifier};
use crate::observer::EnsembleObserver;
use crate::InferenceError;

/// Confidence (percent) recorded for classifiers that only name a label
pub const LABEL_ONLY_CONFIDENCE: f64 = 85.0;

/// Where to find one ensemble member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Name the classifier votes under
    pub name: String,
    /// Artifact file, relative to the model directory
    pub file: PathBuf,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

/// One classifier's vote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vote {
    #[serde(skip)]
    pub name: String,
    /// Predicted label, as the classifier names it
    pub prediction: String,
    /// Confidence in percent, one decimal
    pub confidence: f64,
}

/// Result of querying every member for one observation
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutcome {
    /// Votes in member order
    pub votes: Vec<Vote>,
    /// Mean probability per disease across distribution classifiers
    pub scores: ScoreVector,
    /// Number of classifiers that contributed a distribution
    pub contributing: usize,
}

impl EnsembleOutcome {
    /// Outcome with no votes and all-zero scores
    pub fn empty() -> Self {
        Self {
            votes: Vec::new(),
            scores: ScoreVector::zeros(),
            contributing: 0,
        }
    }
}

/// Set of loaded classifiers, read-only after construction
#[derive(Debug, Default)]
pub struct Ensemble {
    members: Vec<NamedClassifier>,
}

impl Ensemble {
    /// Ensemble with no members; predictions fall back to rules alone
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_classifiers(members: Vec<NamedClassifier>) -> Self {
        Self { members }
    }

    /// Load every listed model from `model_dir`, keeping the ones that succeed
    pub fn load(model_dir: &Path, specs: &[ModelSpec], observer: &dyn EnsembleObserver) -> Self {
        let members: Vec<NamedClassifier> = specs
            .iter()
            .filter_map(|spec| {
                let path = model_dir.join(&spec.file);
                match load_artifact(&spec.name, &path) {
                    Ok(classifier) => Some(classifier),
                    Err(e) => {
                        observer.load_failed(&spec.name, &e);
                        None
                    }
                }
            })
            .collect();

        info!(
            "Ensemble ready: {} of {} classifiers loaded from {}",
            members.len(),
            specs.len(),
            model_dir.display()
        );

        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    /// Native feature importance of the named member, if it reports one
    pub fn feature_importances(&self, name: &str) -> Option<FeatureWeights> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.classifier.feature_importances())
            .filter(|imp| imp.iter().all(|v| v.is_finite()))
            .map(FeatureWeights::from_array)
    }

    /// Query every member and average the distributions
    pub fn predict(
        &self,
        features: &[f64; FEATURE_DIMENSION],
        observer: &dyn EnsembleObserver,
    ) -> EnsembleOutcome {
        let mut outcome = EnsembleOutcome::empty();
        let mut totals = ScoreVector::zeros();

        for member in &self.members {
            match &member.classifier {
                Classifier::Distribution(model) => match query_distribution(model.as_ref(), features) {
                    Ok((probs, best)) => {
                        for (class, p) in model.classes().iter().zip(&probs) {
                            if let Some(disease) = Disease::from_label(class) {
                                totals.add(disease, *p);
                            }
                        }
                        outcome.votes.push(Vote {
                            name: member.name.clone(),
                            prediction: model.classes()[best].clone(),
                            confidence: round_to(probs[best] * 100.0, 1),
                        });
                        outcome.contributing += 1;
                    }
                    Err(e) => observer.predict_failed(&member.name, &e),
                },
                Classifier::Label(model) => match model.predict(features) {
                    Ok(label) => outcome.votes.push(Vote {
                        name: member.name.clone(),
                        prediction: label,
                        confidence: LABEL_ONLY_CONFIDENCE,
                    }),
                    Err(e) => observer.predict_failed(&member.name, &e),
                },
            }
        }

        outcome.scores = totals.scaled_down(outcome.contributing as f64);

        debug!(
            "Ensemble prediction: {} votes, {} distributions averaged",
            outcome.votes.len(),
            outcome.contributing
        );

        outcome
    }
}

/// Run one distribution model, returning its probabilities and argmax index
fn query_distribution(
    model: &dyn DistributionModel,
    features: &[f64; FEATURE_DIMENSION],
) -> Result<(Vec<f64>, usize), InferenceError> {
    let probs = model.predict_proba(features)?;
    let classes = model.classes();

    if probs.len() != classes.len() || probs.is_empty() {
        return Err(InferenceError::InvalidOutputShape {
            expected: classes.len(),
            actual: probs.len(),
        });
    }

    if let Some((class, value)) = classes
        .iter()
        .zip(&probs)
        .find(|(_, p)| !p.is_finite() || **p < 0.0)
    {
        return Err(InferenceError::InvalidProbability {
            class: class.clone(),
            value: *value,
        });
    }

    let mut best = 0;
    for (i, p) in probs.iter().enumerate() {
        if *p > probs[best] {
            best = i;
        }
    }

    Ok((probs, best))
}
