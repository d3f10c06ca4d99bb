//! Score Fusion and Winner Selection

use climate_core::{round_to, Disease, ScoreVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Fusion configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Fusion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Weight of the averaged ensemble probabilities
    pub ensemble_weight: f64,
    /// Weight of the rule scores
    pub rule_weight: f64,
    /// A "No Disease" win below this score is reconsidered
    pub guard_ceiling: f64,
    /// Runner-up must exceed this score to take over a weak "No Disease" win
    pub guard_runner_up_floor: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            ensemble_weight: 0.6,
            rule_weight: 0.4,
            guard_ceiling: 0.30,
            guard_runner_up_floor: 0.15,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), FusionError> {
        let fields = [
            ("ensemble_weight", self.ensemble_weight),
            ("rule_weight", self.rule_weight),
            ("guard_ceiling", self.guard_ceiling),
            ("guard_runner_up_floor", self.guard_runner_up_floor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FusionError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Normalized distribution over diseases
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedDistribution {
    /// Sums to 1, or all zero when nothing carried any mass
    pub scores: ScoreVector,
    /// Whether ensemble probabilities took part in the blend
    pub ensemble_used: bool,
}

impl FusedDistribution {
    /// Scores as percentages rounded to one decimal
    pub fn percentages(&self) -> ScoreVector {
        self.scores.map(|s| round_to(s * 100.0, 1))
    }
}

/// Blend ensemble and rule scores, then normalize.
///
/// With no contributing classifier the rule scores are used alone.
pub fn fuse(
    ensemble: &ScoreVector,
    contributing: usize,
    rules: &ScoreVector,
    config: &FusionConfig,
) -> FusedDistribution {
    let ensemble_used = contributing > 0;

    let mut blended = ScoreVector::zeros();
    for disease in Disease::ALL {
        let value = if ensemble_used {
            ensemble.get(disease) * config.ensemble_weight + rules.get(disease) * config.rule_weight
        } else {
            rules.get(disease)
        };
        blended.set(disease, value);
    }

    let scores = blended.normalized();
    debug!(
        "Fused scores (ensemble_used={}, raw_total={:.4})",
        ensemble_used,
        blended.sum()
    );

    FusedDistribution {
        scores,
        ensemble_used,
    }
}

/// Selected prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub disease: Disease,
    /// Normalized score of the selected disease
    pub score: f64,
    /// Score as a whole-number percentage
    pub risk_score: f64,
    /// Score as a percentage with two decimals
    pub confidence: f64,
    /// Whether a weak "No Disease" win was handed to the runner-up
    pub guard_applied: bool,
}

impl Selection {
    fn new(disease: Disease, score: f64, guard_applied: bool) -> Self {
        Self {
            disease,
            score,
            risk_score: round_to(score * 100.0, 0),
            confidence: round_to(score * 100.0, 2),
            guard_applied,
        }
    }
}

/// Pick the winning disease.
///
/// Exact ties go to the earliest disease in fixed order. A "No Disease" win
/// under `guard_ceiling` is handed to the runner-up when the runner-up
/// exceeds `guard_runner_up_floor`.
pub fn select(distribution: &FusedDistribution, config: &FusionConfig) -> Selection {
    let (winner, score) = distribution.scores.argmax();

    if winner == Disease::NoDisease && score < config.guard_ceiling {
        let runner_up = distribution
            .scores
            .ranked()
            .into_iter()
            .find(|(disease, _)| *disease != winner);

        if let Some((disease, runner_score)) = runner_up {
            if runner_score > config.guard_runner_up_floor {
                debug!(
                    "Weak No Disease win ({:.3}), selecting {} ({:.3})",
                    score, disease, runner_score
                );
                return Selection::new(disease, runner_score, true);
            }
        }
    }

    Selection::new(winner, score, false)
}
