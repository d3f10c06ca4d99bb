//! Model Artifacts
//!
//! Trained classifiers are exported as JSON documents tagged by `kind`.

use climate_core::FEATURE_DIMENSION;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::classifier::{Classifier, DistributionModel, LabelModel, NamedClassifier};
use crate::{InferenceError, LoadError};

/// Multinomial logistic regression over optionally standardized features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxModel {
    pub classes: Vec<String>,
    /// One coefficient row per class
    pub coefficients: Vec<[f64; FEATURE_DIMENSION]>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub feature_means: Option<[f64; FEATURE_DIMENSION]>,
    #[serde(default)]
    pub feature_scales: Option<[f64; FEATURE_DIMENSION]>,
    #[serde(default)]
    pub feature_importances: Option<[f64; FEATURE_DIMENSION]>,
}

/// Fixed class distribution, independent of the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorModel {
    pub classes: Vec<String>,
    pub probabilities: Vec<f64>,
    #[serde(default)]
    pub feature_importances: Option<[f64; FEATURE_DIMENSION]>,
}

/// Nearest-centroid classifier; names a class without probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidModel {
    pub classes: Vec<String>,
    pub centroids: Vec<[f64; FEATURE_DIMENSION]>,
    #[serde(default)]
    pub feature_scales: Option<[f64; FEATURE_DIMENSION]>,
}

/// On-disk artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Softmax(SoftmaxModel),
    Prior(PriorModel),
    Centroid(CentroidModel),
}

impl ModelArtifact {
    /// Check shapes and turn the artifact into a classifier
    pub fn into_classifier(self) -> Result<Classifier, LoadError> {
        match self {
            ModelArtifact::Softmax(model) => {
                check_rows("coefficients", model.classes.len(), model.coefficients.len())?;
                check_rows("intercepts", model.classes.len(), model.intercepts.len())?;
                check_finite(model.coefficients.iter().flatten().chain(&model.intercepts))?;
                if let Some(scales) = model.feature_scales {
                    check_scales(&scales)?;
                }
                Ok(Classifier::Distribution(Box::new(model)))
            }
            ModelArtifact::Prior(model) => {
                check_rows("probabilities", model.classes.len(), model.probabilities.len())?;
                if model.probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
                    return Err(LoadError::Invalid(
                        "probabilities must be finite and non-negative".to_string(),
                    ));
                }
                Ok(Classifier::Distribution(Box::new(model)))
            }
            ModelArtifact::Centroid(model) => {
                check_rows("centroids", model.classes.len(), model.centroids.len())?;
                if model.classes.is_empty() {
                    return Err(LoadError::Invalid("centroid model has no classes".to_string()));
                }
                if let Some(scales) = model.feature_scales {
                    check_scales(&scales)?;
                }
                Ok(Classifier::Label(Box::new(model)))
            }
        }
    }
}

fn check_rows(field: &str, classes: usize, rows: usize) -> Result<(), LoadError> {
    if classes != rows {
        return Err(LoadError::Invalid(format!(
            "{} has {} rows for {} classes",
            field, rows, classes
        )));
    }
    Ok(())
}

fn check_finite<'a>(mut values: impl Iterator<Item = &'a f64>) -> Result<(), LoadError> {
    if values.any(|v| !v.is_finite()) {
        return Err(LoadError::Invalid("non-finite model parameter".to_string()));
    }
    Ok(())
}

fn check_scales(scales: &[f64; FEATURE_DIMENSION]) -> Result<(), LoadError> {
    if scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(LoadError::Invalid("feature scales must be positive".to_string()));
    }
    Ok(())
}

fn standardize(
    features: &[f64; FEATURE_DIMENSION],
    means: Option<&[f64; FEATURE_DIMENSION]>,
    scales: Option<&[f64; FEATURE_DIMENSION]>,
) -> [f64; FEATURE_DIMENSION] {
    let mut out = *features;
    for (i, x) in out.iter_mut().enumerate() {
        if let Some(means) = means {
            *x -= means[i];
        }
        if let Some(scales) = scales {
            *x /= scales[i];
        }
    }
    out
}

impl DistributionModel for SoftmaxModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<Vec<f64>, InferenceError> {
        let x = standardize(features, self.feature_means.as_ref(), self.feature_scales.as_ref());

        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| b + row.iter().zip(&x).map(|(w, v)| w * v).sum::<f64>())
            .collect();

        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(InferenceError::InferenceFailed(
                "non-finite logits".to_string(),
            ));
        }

        let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(exps.into_iter().map(|e| e / total).collect())
    }

    fn feature_importances(&self) -> Option<[f64; FEATURE_DIMENSION]> {
        self.feature_importances
    }
}

impl DistributionModel for PriorModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, _features: &[f64; FEATURE_DIMENSION]) -> Result<Vec<f64>, InferenceError> {
        Ok(self.probabilities.clone())
    }

    fn feature_importances(&self) -> Option<[f64; FEATURE_DIMENSION]> {
        self.feature_importances
    }
}

impl LabelModel for CentroidModel {
    fn predict(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<String, InferenceError> {
        let x = standardize(features, None, self.feature_scales.as_ref());

        let mut best: Option<(usize, f64)> = None;
        for (i, centroid) in self.centroids.iter().enumerate() {
            let c = standardize(centroid, None, self.feature_scales.as_ref());
            let dist: f64 = x.iter().zip(&c).map(|(a, b)| (a - b) * (a - b)).sum();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }

        best.map(|(i, _)| self.classes[i].clone())
            .ok_or_else(|| InferenceError::InferenceFailed("no centroids".to_string()))
    }
}

/// Load one artifact from disk under the given vote name
pub fn load_artifact(name: &str, path: &Path) -> Result<NamedClassifier, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact: ModelArtifact = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Parsed model artifact {} from {}", name, path.display());
    let classifier = artifact.into_classifier()?;
    info!("Loaded {} classifier '{}'", classifier.kind(), name);

    Ok(NamedClassifier::new(name, classifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let model = SoftmaxModel {
            classes: labels(&["Malaria", "No Disease"]),
            coefficients: vec![[0.1, 0.05, 0.0, 0.0], [-0.1, -0.05, 0.0, 0.0]],
            intercepts: vec![0.0, 0.0],
            feature_means: Some([25.0, 60.0, 100.0, 100.0]),
            feature_scales: Some([5.0, 10.0, 50.0, 50.0]),
            feature_importances: None,
        };
        let probs = model.predict_proba(&[35.0, 90.0, 100.0, 50.0]).unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_centroid_picks_nearest() {
        let model = CentroidModel {
            classes: labels(&["Heat Stroke", "Asthma"]),
            centroids: vec![[42.0, 20.0, 0.0, 50.0], [25.0, 50.0, 0.0, 300.0]],
            feature_scales: None,
        };
        assert_eq!(model.predict(&[40.0, 25.0, 0.0, 60.0]).unwrap(), "Heat Stroke");
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let artifact = ModelArtifact::Prior(PriorModel {
            classes: labels(&["Malaria", "Dengue"]),
            probabilities: vec![1.0],
            feature_importances: None,
        });
        assert!(matches!(artifact.into_classifier(), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"kind":"prior","classes":["Dengue","No Disease"],"probabilities":[0.7,0.3],
               "feature_importances":[0.4,0.3,0.2,0.1]}}"#
        )
        .unwrap();

        let named = load_artifact("Primary Model", file.path()).unwrap();
        assert_eq!(named.name, "Primary Model");
        assert_eq!(
            named.classifier.feature_importances(),
            Some([0.4, 0.3, 0.2, 0.1])
        );
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(load_artifact("x", &missing), Err(LoadError::Missing(_))));

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "not json").unwrap();
        assert!(matches!(load_artifact("x", &corrupt), Err(LoadError::Parse { .. })));
    }
}
