//! Explainability Report Assembly

use climate_core::{format_decimal, Disease, Feature, FeatureWeights, Observation};
use serde::Serialize;
use tracing::debug;

use crate::importance::{combine, model_importance, RuleTriggers};
use crate::reasoning::{Reason, ReasoningTemplates};
use crate::waterfall::{build_waterfall, WaterfallStep};

/// Feature-level explanation of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainabilityReport {
    pub model_importance: FeatureWeights,
    /// Sums to 1
    pub rule_importance: FeatureWeights,
    /// Percent, sums to 100
    pub combined_importance: FeatureWeights,
    /// Most important feature first
    pub reasoning: Vec<Reason>,
    pub waterfall: Vec<WaterfallStep>,
    pub dominant_feature: Feature,
    pub summary: String,
}

/// Builds explanations from fixed trigger and template tables
#[derive(Debug, Clone, Default)]
pub struct Explainer {
    triggers: RuleTriggers,
    templates: ReasoningTemplates,
}

impl Explainer {
    pub fn new(triggers: RuleTriggers, templates: ReasoningTemplates) -> Self {
        Self {
            triggers,
            templates,
        }
    }

    /// Explain a prediction of `disease` at `risk_score` for `observation`.
    ///
    /// `reported_importance` is the designated classifier's native feature
    /// importance, if one is loaded.
    pub fn explain(
        &self,
        observation: &Observation,
        disease: Disease,
        risk_score: f64,
        reported_importance: Option<FeatureWeights>,
    ) -> ExplainabilityReport {
        let model_importance = model_importance(reported_importance);
        let rule_importance = self.triggers.importance(observation);
        let combined_importance = combine(&model_importance, &rule_importance);

        let reasoning = self.templates.reasoning(observation, &combined_importance);
        let waterfall = build_waterfall(&reasoning, risk_score);

        // Four features always produce four reasons
        let top = &reasoning[0];
        let summary = format!(
            "The predicted disease '{}' is primarily driven by {} ({}{}), contributing {}% to the overall risk assessment.",
            disease,
            top.feature,
            format_decimal(top.value),
            top.unit,
            format_decimal(top.importance),
        );
        let dominant_feature = top.feature;

        debug!(
            "Explained {} at {}: dominant feature {}",
            disease, risk_score, dominant_feature
        );

        ExplainabilityReport {
            model_importance,
            rule_importance,
            combined_importance,
            reasoning,
            waterfall,
            dominant_feature,
            summary,
        }
    }
}
