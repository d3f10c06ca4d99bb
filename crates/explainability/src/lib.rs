//! Explainability Generator
//!
//! Explains a risk prediction in terms of the four input features:
//! - model importance (from a designated classifier, or uniform)
//! - rule importance (how strongly each reading crossed its thresholds)
//! - combined importance, scaled to sum to 100
//! - natural-language reasoning per feature, most important first
//! - a waterfall apportioning the move from the base rate to the final score

mod importance;
mod reasoning;
mod report;
mod waterfall;

pub use importance::{combine, model_importance, FeatureTrigger, RuleTriggers};
pub use reasoning::{Band, Direction, Reason, ReasoningTemplates};
pub use report::{ExplainabilityReport, Explainer};
pub use waterfall::{build_waterfall, StepKind, WaterfallStep, BASE_RATE};
