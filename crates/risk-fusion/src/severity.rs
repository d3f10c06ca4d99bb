//! Severity Tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal severity of a risk assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Step function over a 0-100 risk score; each tier includes its lower bound
    pub fn from_risk_score(risk_score: f64) -> Self {
        if risk_score >= 80.0 {
            Severity::Critical
        } else if risk_score >= 60.0 {
            Severity::High
        } else if risk_score >= 35.0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
