//! Natural-language Reasoning

use climate_core::{format_decimal, round_to, Feature, FeatureWeights, Observation};
use serde::Serialize;

/// Qualitative weight of a feature in the explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HighRisk,
    Moderate,
    LowRisk,
}

impl Direction {
    /// Grade a combined importance (percent)
    pub fn from_importance(importance: f64) -> Self {
        if importance > 25.0 {
            Direction::HighRisk
        } else if importance > 15.0 {
            Direction::Moderate
        } else {
            Direction::LowRisk
        }
    }
}

/// One explained feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reason {
    pub feature: Feature,
    /// Reading rounded to one decimal
    pub value: f64,
    pub unit: &'static str,
    /// Combined importance (percent)
    pub importance: f64,
    pub text: String,
    pub direction: Direction,
}

/// Reading band: applies to values at or above `at_least`.
///
/// `text` uses `{v}` for the rounded reading; `None` marks the normal range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub at_least: f64,
    pub text: Option<&'static str>,
}

fn band(at_least: f64, text: &'static str) -> Band {
    Band {
        at_least,
        text: Some(text),
    }
}

fn normal(at_least: f64) -> Band {
    Band {
        at_least,
        text: None,
    }
}

/// Descending reading bands per feature
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningTemplates {
    temperature: Vec<Band>,
    humidity: Vec<Band>,
    rainfall: Vec<Band>,
    aqi: Vec<Band>,
}

impl ReasoningTemplates {
    pub fn bands(&self, feature: Feature) -> &[Band] {
        match feature {
            Feature::Temperature => &self.temperature,
            Feature::Humidity => &self.humidity,
            Feature::Rainfall => &self.rainfall,
            Feature::Aqi => &self.aqi,
        }
    }

    /// Describe a reading using the first band it meets
    pub fn describe(&self, feature: Feature, value: f64) -> String {
        let shown = format_decimal(round_to(value, 1));
        let band = self.bands(feature).iter().find(|b| value >= b.at_least);

        match band.and_then(|b| b.text) {
            Some(template) => template.replace("{v}", &shown),
            None => format!("{}: {} — within normal range", feature, shown),
        }
    }

    /// Reasoning for every feature, most important first.
    ///
    /// Equal importances keep feature order.
    pub fn reasoning(&self, observation: &Observation, combined: &FeatureWeights) -> Vec<Reason> {
        let mut reasons: Vec<Reason> = Feature::ALL
            .iter()
            .map(|&feature| {
                let value = observation.value(feature);
                let importance = combined.get(feature);
                Reason {
                    feature,
                    value: round_to(value, 1),
                    unit: feature.unit(),
                    importance,
                    text: self.describe(feature, value),
                    direction: Direction::from_importance(importance),
                }
            })
            .collect();

        reasons.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        reasons
    }
}

impl Default for ReasoningTemplates {
    fn default() -> Self {
        Self {
            temperature: vec![
                band(42.0, "EXTREME heat (>{v}°C) — very strong trigger for heat stroke and disease"),
                band(38.0, "Very high temperature ({v}°C) — significant risk factor"),
                band(35.0, "High temperature ({v}°C) — triggers multiple disease pathways"),
                band(30.0, "Elevated temperature ({v}°C) — warm conditions favor vector-borne diseases"),
                band(25.0, "Moderate warmth ({v}°C) — above tropical disease activation threshold"),
                normal(18.0),
                band(0.0, "Low temperature ({v}°C) — cold stress may trigger viral infections"),
            ],
            humidity: vec![
                band(80.0, "Very high humidity ({v}%) — ideal for mosquito breeding and pathogen survival"),
                band(70.0, "High humidity ({v}%) — favorable for disease vector proliferation"),
                band(60.0, "Moderate-high humidity ({v}%) — approaching disease-conducive levels"),
                normal(30.0),
                band(0.0, "Low humidity ({v}%) — dry conditions may aggravate respiratory issues"),
            ],
            rainfall: vec![
                band(300.0, "Extreme rainfall ({v}mm) — high flood risk, water contamination likely"),
                band(200.0, "Heavy rainfall ({v}mm) — standing water creates vector breeding grounds"),
                band(150.0, "Significant rainfall ({v}mm) — water-borne disease risk elevated"),
                band(100.0, "Moderate rainfall ({v}mm) — conditions support mosquito life cycle"),
                band(50.0, "Light rainfall ({v}mm) — minor contribution to disease risk"),
                band(0.0, "Minimal or no rainfall ({v}mm) — dry conditions"),
            ],
            aqi: vec![
                band(300.0, "HAZARDOUS air quality (AQI {v}) — severe respiratory risk for all groups"),
                band(200.0, "Very unhealthy air quality (AQI {v}) — serious asthma and respiratory risk"),
                band(150.0, "Unhealthy air quality (AQI {v}) — significant respiratory disease trigger"),
                band(100.0, "Moderate air quality (AQI {v}) — sensitive groups may experience effects"),
                band(50.0, "Acceptable air quality (AQI {v}) — low respiratory risk"),
                band(0.0, "Good air quality (AQI {v}) — minimal respiratory risk"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_core::RiskContext;

    #[test]
    fn test_band_selection() {
        let t = ReasoningTemplates::default();
        assert_eq!(
            t.describe(Feature::Humidity, 85.0),
            "Very high humidity (85.0%) — ideal for mosquito breeding and pathogen survival"
        );
        assert!(t.describe(Feature::Temperature, 42.0).starts_with("EXTREME heat (>42.0°C)"));
        assert!(t.describe(Feature::Aqi, 99.99).starts_with("Acceptable air quality (AQI 100.0)"));
    }

    #[test]
    fn test_normal_and_low_bands() {
        let t = ReasoningTemplates::default();
        assert_eq!(
            t.describe(Feature::Temperature, 20.0),
            "Temperature: 20.0 — within normal range"
        );
        assert!(t.describe(Feature::Temperature, 5.5).starts_with("Low temperature (5.5°C)"));
        assert_eq!(
            t.describe(Feature::Humidity, 50.0),
            "Humidity: 50.0 — within normal range"
        );
    }

    #[test]
    fn test_below_every_band_falls_back() {
        let t = ReasoningTemplates::default();
        assert_eq!(
            t.describe(Feature::Rainfall, -1.0),
            "Rainfall: -1.0 — within normal range"
        );
        assert_eq!(
            t.describe(Feature::Temperature, -5.0),
            "Temperature: -5.0 — within normal range"
        );
        assert!(t.describe(Feature::Temperature, 0.0).starts_with("Low temperature (0.0°C)"));
        assert_eq!(
            t.describe(Feature::Humidity, -1.0),
            "Humidity: -1.0 — within normal range"
        );
    }

    #[test]
    fn test_direction_grades() {
        assert_eq!(Direction::from_importance(25.1), Direction::HighRisk);
        assert_eq!(Direction::from_importance(25.0), Direction::Moderate);
        assert_eq!(Direction::from_importance(15.0), Direction::LowRisk);
    }

    #[test]
    fn test_reasoning_sorted_stably() {
        let obs = Observation::new(20.0, 50.0, 10.0, 30.0, RiskContext::Low).unwrap();
        let combined = FeatureWeights::from_array([25.0, 25.0, 30.0, 20.0]);
        let reasons = ReasoningTemplates::default().reasoning(&obs, &combined);
        let order: Vec<_> = reasons.iter().map(|r| r.feature).collect();
        assert_eq!(
            order,
            vec![Feature::Rainfall, Feature::Temperature, Feature::Humidity, Feature::Aqi]
        );
        assert_eq!(reasons[0].direction, Direction::HighRisk);
        assert_eq!(reasons[0].unit, "mm");
    }
}
