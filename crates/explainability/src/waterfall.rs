//! Waterfall Attribution
//!
//! Linear apportionment of the move from the base rate to the final risk
//! score across features, in proportion to their combined importance.

use climate_core::{round_to, Disease};
use serde::Serialize;

use crate::reasoning::Reason;

/// Risk of any one disease with no information (percent)
pub const BASE_RATE: f64 = 100.0 / Disease::COUNT as f64;

/// Waterfall step kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Base,
    Increase,
    Decrease,
    Total,
}

/// One step of the waterfall
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    /// Change contributed by this step, one decimal
    pub delta: f64,
    /// Running total after this step, one decimal
    pub cumulative: f64,
    pub kind: StepKind,
}

/// Build the waterfall for reasons already sorted by importance
pub fn build_waterfall(reasons: &[Reason], risk_score: f64) -> Vec<WaterfallStep> {
    let mut steps = Vec::with_capacity(reasons.len() + 2);
    steps.push(WaterfallStep {
        label: "Base Rate".to_string(),
        delta: BASE_RATE,
        cumulative: BASE_RATE,
        kind: StepKind::Base,
    });

    let gap = risk_score - BASE_RATE;
    let mut cumulative = BASE_RATE;
    for reason in reasons {
        let delta = reason.importance / 100.0 * gap;
        cumulative += delta;
        steps.push(WaterfallStep {
            label: reason.feature.as_str().to_string(),
            delta: round_to(delta, 1),
            cumulative: round_to(cumulative, 1),
            kind: if delta > 0.0 {
                StepKind::Increase
            } else {
                StepKind::Decrease
            },
        });
    }

    steps.push(WaterfallStep {
        label: "Final Risk".to_string(),
        delta: round_to(risk_score, 1),
        cumulative: round_to(risk_score, 1),
        kind: StepKind::Total,
    });

    steps
}
