//! Observation Assembly and Validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;
use crate::feature::{Feature, FEATURE_DIMENSION};

/// Regional outbreak context supplied alongside the readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskContext {
    #[default]
    Low,
    Moderate,
    High,
}

impl RiskContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskContext::Low => "Low",
            RiskContext::Moderate => "Moderate",
            RiskContext::High => "High",
        }
    }
}

impl fmt::Display for RiskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskContext {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskContext::Low),
            "moderate" => Ok(RiskContext::Moderate),
            "high" => Ok(RiskContext::High),
            _ => Err(ValidationError::InvalidFormat(format!(
                "unknown risk context '{}', expected Low, Moderate or High",
                s
            ))),
        }
    }
}

/// A reading as it arrives from outside: JSON number or numeric text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReading {
    Number(f64),
    Text(String),
}

impl RawReading {
    /// Convert to a finite float, naming `field` in any error
    pub fn parse(&self, field: &'static str) -> Result<f64, ValidationError> {
        let value = match self {
            RawReading::Number(value) => *value,
            RawReading::Text(raw) => raw.trim().parse::<f64>().map_err(|_| {
                ValidationError::NonNumeric {
                    field,
                    raw: raw.clone(),
                }
            })?,
        };
        ensure_finite(field, value)
    }
}

impl From<f64> for RawReading {
    fn from(value: f64) -> Self {
        RawReading::Number(value)
    }
}

impl From<&str> for RawReading {
    fn from(raw: &str) -> Self {
        RawReading::Text(raw.to_string())
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

/// One validated set of environmental readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
    /// Air quality index
    pub aqi: f64,
    /// Regional outbreak context
    pub risk_context: RiskContext,
}

impl Observation {
    /// Create an observation from numeric readings, rejecting NaN and infinities
    pub fn new(
        temperature: f64,
        humidity: f64,
        rainfall: f64,
        aqi: f64,
        risk_context: RiskContext,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            temperature: ensure_finite("temperature", temperature)?,
            humidity: ensure_finite("humidity", humidity)?,
            rainfall: ensure_finite("rainfall", rainfall)?,
            aqi: ensure_finite("aqi", aqi)?,
            risk_context,
        })
    }

    /// Create an observation from raw, possibly textual readings
    pub fn from_raw(
        temperature: &RawReading,
        humidity: &RawReading,
        rainfall: &RawReading,
        aqi: &RawReading,
        risk_context: RiskContext,
    ) -> Result<Self, ValidationError> {
        let observation = Self {
            temperature: temperature.parse("temperature")?,
            humidity: humidity.parse("humidity")?,
            rainfall: rainfall.parse("rainfall")?,
            aqi: aqi.parse("aqi")?,
            risk_context,
        };
        debug!("Validated observation: {:?}", observation);
        Ok(observation)
    }

    /// Reading for a single feature
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::Rainfall => self.rainfall,
            Feature::Aqi => self.aqi,
        }
    }

    /// Model input vector in [`Feature::ALL`] order
    pub fn features(&self) -> [f64; FEATURE_DIMENSION] {
        [self.temperature, self.humidity, self.rainfall, self.aqi]
    }
}
