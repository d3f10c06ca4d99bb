//! Threshold Predicates

use climate_core::{Feature, Observation};

/// A strict comparison of one reading against fixed cut points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// `value > limit`
    Above { feature: Feature, limit: f64 },
    /// `value < limit`
    Below { feature: Feature, limit: f64 },
    /// `low < value < high`
    Between { feature: Feature, low: f64, high: f64 },
    /// `|value - center| > limit`
    Deviates { feature: Feature, center: f64, limit: f64 },
}

impl Condition {
    pub fn above(feature: Feature, limit: f64) -> Self {
        Condition::Above { feature, limit }
    }

    pub fn below(feature: Feature, limit: f64) -> Self {
        Condition::Below { feature, limit }
    }

    pub fn between(feature: Feature, low: f64, high: f64) -> Self {
        Condition::Between { feature, low, high }
    }

    pub fn deviates(feature: Feature, center: f64, limit: f64) -> Self {
        Condition::Deviates { feature, center, limit }
    }

    /// Feature this predicate reads
    pub fn feature(&self) -> Feature {
        match *self {
            Condition::Above { feature, .. }
            | Condition::Below { feature, .. }
            | Condition::Between { feature, .. }
            | Condition::Deviates { feature, .. } => feature,
        }
    }

    /// Check the predicate against a raw value
    pub fn holds_for(&self, value: f64) -> bool {
        match *self {
            Condition::Above { limit, .. } => value > limit,
            Condition::Below { limit, .. } => value < limit,
            Condition::Between { low, high, .. } => value > low && value < high,
            Condition::Deviates { center, limit, .. } => (value - center).abs() > limit,
        }
    }

    /// Check the predicate against an observation
    pub fn holds(&self, observation: &Observation) -> bool {
        self.holds_for(observation.value(self.feature()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_strict() {
        let above = Condition::above(Feature::Temperature, 25.0);
        assert!(!above.holds_for(25.0));
        assert!(above.holds_for(25.01));

        let between = Condition::between(Feature::Rainfall, 50.0, 300.0);
        assert!(!between.holds_for(50.0));
        assert!(between.holds_for(120.0));
        assert!(!between.holds_for(300.0));
    }

    #[test]
    fn test_deviation_both_sides() {
        let dev = Condition::deviates(Feature::Temperature, 25.0, 10.0);
        assert!(dev.holds_for(14.0));
        assert!(dev.holds_for(36.0));
        assert!(!dev.holds_for(35.0));
    }
}
