//! Model Features

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Number of features fed to every model
pub const FEATURE_DIMENSION: usize = 4;

/// Environmental feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Temperature,
    Humidity,
    Rainfall,
    #[serde(rename = "AQI")]
    Aqi,
}

impl Feature {
    /// All features in model input order
    pub const ALL: [Feature; FEATURE_DIMENSION] = [
        Feature::Temperature,
        Feature::Humidity,
        Feature::Rainfall,
        Feature::Aqi,
    ];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::Rainfall => "Rainfall",
            Feature::Aqi => "AQI",
        }
    }

    /// Display unit
    pub fn unit(&self) -> &'static str {
        match self {
            Feature::Temperature => "°C",
            Feature::Humidity => "%",
            Feature::Rainfall => "mm",
            Feature::Aqi => "Index",
        }
    }

    /// Column in the model input vector
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weight per feature, serialized as an ordered `name -> weight` map
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureWeights([f64; FEATURE_DIMENSION]);

impl FeatureWeights {
    /// Equal weight on every feature
    pub fn uniform() -> Self {
        Self([1.0 / FEATURE_DIMENSION as f64; FEATURE_DIMENSION])
    }

    pub fn from_array(values: [f64; FEATURE_DIMENSION]) -> Self {
        Self(values)
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }

    pub fn add(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] += value;
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Apply `f` to every weight
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |&feature| (feature, self.get(feature)))
    }

    pub fn as_array(&self) -> &[f64; FEATURE_DIMENSION] {
        &self.0
    }
}

impl Serialize for FeatureWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_DIMENSION))?;
        for (feature, weight) in self.iter() {
            map.serialize_entry(feature.as_str(), &weight)?;
        }
        map.end()
    }
}
