//! Rulebook and Scoring

use climate_core::{Disease, Feature, Observation, RiskContext, ScoreVector};
use tracing::debug;

use crate::condition::Condition;

/// One additive rule: when every condition holds, `increment` is added to `disease`
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub disease: Disease,
    pub conditions: Vec<Condition>,
    pub increment: f64,
}

impl Rule {
    pub fn new(disease: Disease, conditions: Vec<Condition>, increment: f64) -> Self {
        Self {
            disease,
            conditions,
            increment,
        }
    }

    pub fn fires(&self, observation: &Observation) -> bool {
        self.conditions.iter().all(|c| c.holds(observation))
    }
}

/// Extra score granted to some diseases under a regional context
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalBoost {
    pub context: RiskContext,
    pub boosts: Vec<(Disease, f64)>,
}

/// A rule that contributed to an evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct FiredRule {
    pub disease: Disease,
    pub increment: f64,
}

/// Output of evaluating the rulebook against one observation
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation {
    /// Unnormalized score per disease
    pub scores: ScoreVector,
    /// Threshold rules that fired, in rulebook order
    pub fired: Vec<FiredRule>,
}

/// Immutable table of expert rules.
///
/// Built once and shared by reference; scoring never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rulebook {
    /// Starting score per disease before any rule runs
    pub baseline: Vec<(Disease, f64)>,
    /// Threshold rules, evaluated independently
    pub rules: Vec<Rule>,
    /// Context boosts applied after the threshold rules
    pub regional: Vec<RegionalBoost>,
}

impl Rulebook {
    /// Score every disease for one observation
    pub fn score(&self, observation: &Observation) -> ScoreVector {
        self.evaluate(observation).scores
    }

    /// Score every disease and report which rules fired
    pub fn evaluate(&self, observation: &Observation) -> RuleEvaluation {
        let mut scores = ScoreVector::zeros();
        let mut fired = Vec::new();

        for &(disease, base) in &self.baseline {
            scores.add(disease, base);
        }

        for rule in &self.rules {
            if rule.fires(observation) {
                scores.add(rule.disease, rule.increment);
                fired.push(FiredRule {
                    disease: rule.disease,
                    increment: rule.increment,
                });
            }
        }

        for boost in self
            .regional
            .iter()
            .filter(|b| b.context == observation.risk_context)
        {
            for &(disease, amount) in &boost.boosts {
                scores.add(disease, amount);
            }
        }

        debug!(
            "Rule evaluation: {} of {} rules fired, context={}",
            fired.len(),
            self.rules.len(),
            observation.risk_context
        );

        RuleEvaluation { scores, fired }
    }
}

impl Default for Rulebook {
    fn default() -> Self {
        use Disease::*;
        use Feature::*;

        let above = Condition::above;
        let below = Condition::below;

        let rules = vec![
            // Malaria: warm, humid, wet
            Rule::new(Malaria, vec![above(Temperature, 25.0), above(Humidity, 60.0)], 0.20),
            Rule::new(Malaria, vec![above(Temperature, 30.0), above(Humidity, 80.0)], 0.35),
            Rule::new(Malaria, vec![above(Rainfall, 100.0), above(Temperature, 25.0)], 0.25),
            // Dengue: breeding conditions
            Rule::new(
                Dengue,
                vec![Condition::between(Temperature, 25.0, 35.0), above(Humidity, 60.0)],
                0.25,
            ),
            Rule::new(
                Dengue,
                vec![Condition::between(Rainfall, 50.0, 300.0), above(Humidity, 70.0)],
                0.30,
            ),
            Rule::new(Dengue, vec![above(Temperature, 28.0), above(Humidity, 75.0)], 0.20),
            // Typhoid: heavy rain, contamination
            Rule::new(Typhoid, vec![above(Rainfall, 150.0)], 0.30),
            Rule::new(Typhoid, vec![above(Rainfall, 250.0), above(Humidity, 70.0)], 0.35),
            Rule::new(Typhoid, vec![above(Temperature, 25.0), above(Rainfall, 100.0)], 0.15),
            // Cholera: very heavy rain
            Rule::new(Cholera, vec![above(Rainfall, 200.0), above(Temperature, 25.0)], 0.35),
            Rule::new(Cholera, vec![above(Rainfall, 300.0)], 0.30),
            Rule::new(Cholera, vec![above(Humidity, 80.0), above(Rainfall, 150.0)], 0.20),
            // Asthma: cumulative AQI bands
            Rule::new(Asthma, vec![above(Aqi, 100.0)], 0.20),
            Rule::new(Asthma, vec![above(Aqi, 150.0)], 0.35),
            Rule::new(Asthma, vec![above(Aqi, 200.0)], 0.30),
            Rule::new(Asthma, vec![above(Aqi, 300.0)], 0.20),
            // Viral fever: temperature extremes
            Rule::new(ViralFever, vec![above(Temperature, 35.0)], 0.25),
            Rule::new(ViralFever, vec![below(Temperature, 18.0)], 0.30),
            Rule::new(ViralFever, vec![Condition::deviates(Temperature, 25.0, 10.0)], 0.15),
            // Heat stroke
            Rule::new(HeatStroke, vec![above(Temperature, 38.0)], 0.40),
            Rule::new(HeatStroke, vec![above(Temperature, 42.0)], 0.40),
            Rule::new(HeatStroke, vec![above(Temperature, 35.0), below(Humidity, 30.0)], 0.25),
        ];

        let regional = vec![
            RegionalBoost {
                context: RiskContext::High,
                boosts: vec![(Malaria, 0.25), (Dengue, 0.25), (ViralFever, 0.15)],
            },
            RegionalBoost {
                context: RiskContext::Moderate,
                boosts: vec![(Malaria, 0.10), (Dengue, 0.10)],
            },
        ];

        Self {
            baseline: vec![(NoDisease, 0.15)],
            rules,
            regional,
        }
    }
}
