//! Feature Importance

use climate_core::{round_to, Feature, FeatureWeights, Observation};
use expert_rules::Condition;

/// Increment credited to a feature when its reading crosses a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureTrigger {
    pub condition: Condition,
    pub increment: f64,
}

/// Per-feature threshold table measuring how hard each reading pushed the rules.
///
/// Each trigger reads a single feature and only credits that feature.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTriggers {
    pub triggers: Vec<FeatureTrigger>,
}

impl RuleTriggers {
    /// Normalized rule importance; uniform when nothing triggered
    pub fn importance(&self, observation: &Observation) -> FeatureWeights {
        let mut raw = FeatureWeights::default();
        for trigger in &self.triggers {
            if trigger.condition.holds(observation) {
                raw.add(trigger.condition.feature(), trigger.increment);
            }
        }

        let total = raw.sum();
        if total > 0.0 {
            raw.map(|v| round_to(v / total, 4))
        } else {
            FeatureWeights::uniform()
        }
    }
}

impl Default for RuleTriggers {
    fn default() -> Self {
        use Feature::*;

        let above = |feature, limit, increment| FeatureTrigger {
            condition: Condition::above(feature, limit),
            increment,
        };
        let below = |feature, limit, increment| FeatureTrigger {
            condition: Condition::below(feature, limit),
            increment,
        };

        Self {
            triggers: vec![
                above(Temperature, 25.0, 0.15),
                above(Temperature, 30.0, 0.20),
                above(Temperature, 35.0, 0.25),
                above(Temperature, 38.0, 0.30),
                above(Temperature, 42.0, 0.30),
                below(Temperature, 18.0, 0.25),
                above(Humidity, 60.0, 0.15),
                above(Humidity, 70.0, 0.20),
                above(Humidity, 75.0, 0.15),
                above(Humidity, 80.0, 0.20),
                below(Humidity, 30.0, 0.15),
                above(Rainfall, 50.0, 0.10),
                above(Rainfall, 100.0, 0.15),
                above(Rainfall, 150.0, 0.20),
                above(Rainfall, 200.0, 0.25),
                above(Rainfall, 250.0, 0.20),
                above(Rainfall, 300.0, 0.20),
                above(Aqi, 100.0, 0.15),
                above(Aqi, 150.0, 0.25),
                above(Aqi, 200.0, 0.25),
                above(Aqi, 300.0, 0.20),
            ],
        }
    }
}

/// Model importance as reported by a classifier, or uniform when unavailable
pub fn model_importance(reported: Option<FeatureWeights>) -> FeatureWeights {
    match reported {
        Some(weights) => weights.map(|v| round_to(v, 4)),
        None => FeatureWeights::uniform(),
    }
}

/// Equal blend of model and rule importance, in percent, rescaled to sum to 100
pub fn combine(model: &FeatureWeights, rule: &FeatureWeights) -> FeatureWeights {
    let mut combined = FeatureWeights::default();
    for feature in Feature::ALL {
        let blended = (model.get(feature) * 0.5 + rule.get(feature) * 0.5) * 100.0;
        combined.set(feature, round_to(blended, 1));
    }

    let total = combined.sum();
    if total > 0.0 {
        combined.map(|v| round_to(v / total * 100.0, 1))
    } else {
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_core::RiskContext;
    use proptest::prelude::*;

    fn obs(t: f64, h: f64, r: f64, a: f64) -> Observation {
        Observation::new(t, h, r, a, RiskContext::Low).unwrap()
    }

    #[test]
    fn test_uniform_when_nothing_triggers() {
        let imp = RuleTriggers::default().importance(&obs(20.0, 50.0, 10.0, 30.0));
        assert_eq!(imp, FeatureWeights::uniform());
    }

    #[test]
    fn test_heat_and_pollution_split() {
        let imp = RuleTriggers::default().importance(&obs(40.0, 20.0, 0.0, 450.0));
        // Temperature 0.90, Humidity 0.15, AQI 0.85 of 1.90
        assert_eq!(imp.get(Feature::Temperature), 0.4737);
        assert_eq!(imp.get(Feature::Humidity), 0.0789);
        assert_eq!(imp.get(Feature::Rainfall), 0.0);
        assert_eq!(imp.get(Feature::Aqi), 0.4474);
    }

    #[test]
    fn test_model_importance_default() {
        assert_eq!(model_importance(None), FeatureWeights::uniform());
        let reported = FeatureWeights::from_array([0.31234567, 0.2, 0.3, 0.18765433]);
        assert_eq!(model_importance(Some(reported)).get(Feature::Temperature), 0.3123);
    }

    #[test]
    fn test_combined_is_percent() {
        let combined = combine(&FeatureWeights::uniform(), &FeatureWeights::uniform());
        assert!(combined.iter().all(|(_, v)| v == 25.0));
    }

    #[test]
    fn test_combined_zero_left_unscaled() {
        let zero = FeatureWeights::default();
        assert_eq!(combine(&zero, &zero), zero);
    }

    proptest! {
        #[test]
        fn prop_combined_sums_to_hundred(
            t in -20.0f64..55.0,
            h in 0.0f64..100.0,
            r in 0.0f64..500.0,
            a in 0.0f64..500.0,
            m in proptest::array::uniform4(0.0f64..1.0),
        ) {
            let rule = RuleTriggers::default().importance(&obs(t, h, r, a));
            prop_assert!((rule.sum() - 1.0).abs() < 1e-3);

            let model = model_importance(Some(FeatureWeights::from_array(m)));
            let combined = combine(&model, &rule);
            prop_assert!((combined.sum() - 100.0).abs() <= 0.5);
        }
    }
}
