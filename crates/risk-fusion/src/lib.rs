//! Risk Fusion
//!
//! Combines ensemble-derived and rule-derived disease scores into one
//! probability distribution, selects the winning disease with a guard
//! against weak "No Disease" wins, and maps the result to a severity tier.

mod fusion;
mod severity;

pub use fusion::{fuse, select, FusedDistribution, FusionConfig, FusionError, Selection};
pub use severity::Severity;
