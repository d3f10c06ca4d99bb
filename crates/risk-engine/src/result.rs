//! Prediction Result Types

use climate_core::{Disease, RiskContext, ScoreVector};
use ensemble::Vote;
use explainability::ExplainabilityReport;
use risk_fusion::Severity;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Votes keyed by classifier name, in member order
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleVotes(pub Vec<Vote>);

impl Serialize for EnsembleVotes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for vote in &self.0 {
            map.serialize_entry(&vote.name, vote)?;
        }
        map.end()
    }
}

/// Complete assessment of one observation
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PredictionResult {
    pub disease: Disease,
    /// Winning score as a percentage, two decimals
    pub confidence: f64,
    pub severity: Severity,
    /// Winning score as a whole-number percentage
    pub risk_score: f64,
    pub risk_context: RiskContext,
    pub precautions: Vec<String>,
    /// Fused distribution as percentages, one decimal
    pub disease_risks: ScoreVector,
    /// Present when at least one classifier voted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensemble_votes: Option<EnsembleVotes>,
    pub explainability: ExplainabilityReport,
}

/// Batch entry: the caller's date tag plus the full result
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BatchPrediction {
    pub date: String,
    #[serde(flatten)]
    pub result: PredictionResult,
}
