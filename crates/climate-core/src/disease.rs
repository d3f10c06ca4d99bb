//! Disease Set

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Disease outcomes scored by the pipeline.
///
/// The set is closed and its declaration order is significant: it is the
/// iteration order of every [`ScoreVector`](crate::ScoreVector) and the
/// tie-break order when selecting a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Disease {
    Malaria,
    Dengue,
    Typhoid,
    Asthma,
    #[serde(rename = "Viral Fever")]
    ViralFever,
    Cholera,
    #[serde(rename = "Heat Stroke")]
    HeatStroke,
    #[serde(rename = "No Disease")]
    NoDisease,
}

impl Disease {
    /// Number of diseases in the set
    pub const COUNT: usize = 8;

    /// All diseases in fixed order
    pub const ALL: [Disease; Disease::COUNT] = [
        Disease::Malaria,
        Disease::Dengue,
        Disease::Typhoid,
        Disease::Asthma,
        Disease::ViralFever,
        Disease::Cholera,
        Disease::HeatStroke,
        Disease::NoDisease,
    ];

    /// Display label, as used by classifier artifacts and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Disease::Malaria => "Malaria",
            Disease::Dengue => "Dengue",
            Disease::Typhoid => "Typhoid",
            Disease::Asthma => "Asthma",
            Disease::ViralFever => "Viral Fever",
            Disease::Cholera => "Cholera",
            Disease::HeatStroke => "Heat Stroke",
            Disease::NoDisease => "No Disease",
        }
    }

    /// Position in [`Disease::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a disease by its exact display label
    pub fn from_label(label: &str) -> Option<Disease> {
        Disease::ALL.into_iter().find(|d| d.as_str() == label)
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disease {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Disease::from_label(s.trim())
            .ok_or_else(|| ValidationError::InvalidFormat(format!("unknown disease label '{}'", s)))
    }
}
