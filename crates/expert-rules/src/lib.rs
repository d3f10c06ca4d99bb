//! Expert Rule Engine
//!
//! Scores every disease from additive threshold rules over the four
//! environmental readings, plus a regional boost for vector-borne diseases.

mod condition;
mod rulebook;

pub use condition::Condition;
pub use rulebook::{FiredRule, RegionalBoost, Rule, RuleEvaluation, Rulebook};
