//! Risk Engine Facade

use climate_core::{Observation, RawReading, RiskContext, ValidationError};
use ensemble::{Ensemble, EnsembleObserver, TracingObserver};
use explainability::Explainer;
use expert_rules::Rulebook;
use risk_fusion::{fuse, select, FusionConfig, Severity};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::result::{BatchPrediction, EnsembleVotes, PredictionResult};
use crate::{EngineConfig, EngineError, PrecautionBook};

/// One batch input record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchRecord {
    pub temp: Option<RawReading>,
    pub humidity: Option<RawReading>,
    pub rainfall: Option<RawReading>,
    pub aqi: Option<RawReading>,
    #[serde(default)]
    pub date: Option<String>,
}

impl BatchRecord {
    fn observation(&self, risk_context: RiskContext) -> Result<Observation, ValidationError> {
        fn required<'a>(
            reading: &'a Option<RawReading>,
            field: &'static str,
        ) -> Result<&'a RawReading, ValidationError> {
            reading.as_ref().ok_or(ValidationError::MissingField(field))
        }

        Observation::from_raw(
            required(&self.temp, "temp")?,
            required(&self.humidity, "humidity")?,
            required(&self.rainfall, "rainfall")?,
            required(&self.aqi, "aqi")?,
            risk_context,
        )
    }
}

/// Scoring pipeline with its immutable knowledge and loaded classifiers.
///
/// Assessment takes `&self` only, so one engine can serve concurrent callers.
pub struct RiskEngine {
    rulebook: Rulebook,
    ensemble: Ensemble,
    explainer: Explainer,
    precautions: PrecautionBook,
    fusion: FusionConfig,
    importance_model: String,
    observer: Arc<dyn EnsembleObserver>,
}

impl RiskEngine {
    /// Engine with no classifiers; scores come from the rulebook alone
    pub fn rules_only() -> Self {
        let defaults = EngineConfig::default();
        Self {
            rulebook: Rulebook::default(),
            ensemble: Ensemble::empty(),
            explainer: Explainer::default(),
            precautions: PrecautionBook::default(),
            fusion: defaults.fusion,
            importance_model: defaults.importance_model,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Build from configuration, loading whichever classifiers are available
    pub fn from_config(
        config: &EngineConfig,
        observer: Arc<dyn EnsembleObserver>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let precautions = match &config.precautions_file {
            Some(path) => PrecautionBook::from_json_file(path)?,
            None => PrecautionBook::default(),
        };
        let ensemble = Ensemble::load(&config.model_dir, &config.models, observer.as_ref());

        info!(
            "Risk engine initialized with {} classifier(s)",
            ensemble.len()
        );

        Ok(Self {
            rulebook: Rulebook::default(),
            ensemble,
            explainer: Explainer::default(),
            precautions,
            fusion: config.fusion.clone(),
            importance_model: config.importance_model.clone(),
            observer,
        })
    }

    /// Replace the classifier set
    pub fn with_ensemble(mut self, ensemble: Ensemble) -> Self {
        self.ensemble = ensemble;
        self
    }

    /// Name the classifier whose feature importance feeds explanations
    pub fn with_importance_model(mut self, name: impl Into<String>) -> Self {
        self.importance_model = name.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn EnsembleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    /// Assess one validated observation
    pub fn assess(&self, observation: &Observation) -> PredictionResult {
        let rules = self.rulebook.evaluate(observation);
        let outcome = self
            .ensemble
            .predict(&observation.features(), self.observer.as_ref());

        let distribution = fuse(&outcome.scores, outcome.contributing, &rules.scores, &self.fusion);
        let selection = select(&distribution, &self.fusion);
        let severity = Severity::from_risk_score(selection.risk_score);

        let explainability = self.explainer.explain(
            observation,
            selection.disease,
            selection.risk_score,
            self.ensemble.feature_importances(&self.importance_model),
        );

        debug!(
            "{} rule(s) fired, {} vote(s), guard_applied={}",
            rules.fired.len(),
            outcome.votes.len(),
            selection.guard_applied
        );
        info!(
            "Assessed {} at risk {} ({})",
            selection.disease, selection.risk_score, severity
        );
        metrics::counter!("climate_risk_assessments_total", "severity" => severity.as_str())
            .increment(1);

        let ensemble_votes = if outcome.votes.is_empty() {
            None
        } else {
            Some(EnsembleVotes(outcome.votes))
        };

        PredictionResult {
            disease: selection.disease,
            confidence: selection.confidence,
            severity,
            risk_score: selection.risk_score,
            risk_context: observation.risk_context,
            precautions: self.precautions.for_disease(selection.disease).to_vec(),
            disease_risks: distribution.percentages(),
            ensemble_votes,
            explainability,
        }
    }

    /// Validate raw readings, then assess
    pub fn assess_raw(
        &self,
        temperature: &RawReading,
        humidity: &RawReading,
        rainfall: &RawReading,
        aqi: &RawReading,
        risk_context: RiskContext,
    ) -> Result<PredictionResult, EngineError> {
        let observation = Observation::from_raw(temperature, humidity, rainfall, aqi, risk_context)?;
        Ok(self.assess(&observation))
    }

    /// Assess every record under one risk context.
    ///
    /// The first invalid record fails the whole batch; no partial results.
    pub fn assess_batch(
        &self,
        records: &[BatchRecord],
        risk_context: RiskContext,
    ) -> Result<Vec<BatchPrediction>, EngineError> {
        let observations = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .observation(risk_context)
                    .map_err(|source| EngineError::BatchItem { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let predictions: Vec<BatchPrediction> = records
            .iter()
            .zip(&observations)
            .map(|(record, observation)| BatchPrediction {
                date: record.date.clone().unwrap_or_default(),
                result: self.assess(observation),
            })
            .collect();

        metrics::counter!("climate_risk_batch_items_total").increment(predictions.len() as u64);
        info!("Batch assessed: {} record(s)", predictions.len());
        Ok(predictions)
    }

    /// Parse a JSON list of records and assess it
    pub fn assess_batch_json(
        &self,
        payload: &str,
        risk_context: RiskContext,
    ) -> Result<Vec<BatchPrediction>, EngineError> {
        let records: Vec<BatchRecord> =
            serde_json::from_str(payload).map_err(EngineError::BatchPayload)?;
        self.assess_batch(&records, risk_context)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::rules_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_core::{Disease, Feature, FeatureWeights};
    use ensemble::{Classifier, ModelSpec, NamedClassifier, PriorModel};
    use explainability::BASE_RATE;
    use proptest::prelude::*;

    fn obs(t: f64, h: f64, r: f64, a: f64, ctx: RiskContext) -> Observation {
        Observation::new(t, h, r, a, ctx).unwrap()
    }

    fn prior_ensemble() -> Ensemble {
        let model = PriorModel {
            classes: vec!["Malaria".to_string(), "No Disease".to_string()],
            probabilities: vec![0.8, 0.2],
            feature_importances: Some([0.4, 0.3, 0.2, 0.1]),
        };
        Ensemble::from_classifiers(vec![NamedClassifier::new(
            "Random Forest",
            Classifier::Distribution(Box::new(model)),
        )])
    }

    #[test]
    fn test_wet_warm_moderate_context() {
        let result = RiskEngine::rules_only().assess(&obs(32.0, 85.0, 120.0, 40.0, RiskContext::Moderate));

        // Malaria 0.90 of a 2.05 total
        assert_eq!(result.disease, Disease::Malaria);
        assert_eq!(result.risk_score, 44.0);
        assert_eq!(result.confidence, 43.9);
        assert_eq!(result.severity, Severity::Moderate);
        assert_eq!(result.disease_risks.get(Disease::Dengue), 41.5);
        assert!(result.ensemble_votes.is_none());
    }

    #[test]
    fn test_mild_conditions_no_disease() {
        let result = RiskEngine::rules_only().assess(&obs(20.0, 50.0, 10.0, 30.0, RiskContext::Low));

        assert_eq!(result.disease, Disease::NoDisease);
        assert_eq!(result.risk_score, 100.0);
        // Severity grades the winning score whatever the winner is
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(
            result.precautions[0],
            "Continue maintaining good hygiene practices"
        );
    }

    #[test]
    fn test_heat_and_pollution() {
        let result = RiskEngine::rules_only().assess(&obs(40.0, 20.0, 0.0, 450.0, RiskContext::Low));

        assert_eq!(result.disease, Disease::Asthma);
        assert_eq!(result.risk_score, 47.0);
        let report = &result.explainability;
        assert_eq!(report.dominant_feature, report.reasoning[0].feature);
        assert_eq!(report.dominant_feature, Feature::Temperature);
        assert_eq!(report.waterfall.last().unwrap().cumulative, 47.0);
    }

    #[test]
    fn test_ensemble_blend_and_votes() {
        let engine = RiskEngine::rules_only().with_ensemble(prior_ensemble());
        let result = engine.assess(&obs(20.0, 50.0, 10.0, 30.0, RiskContext::Low));

        // 0.48 Malaria against 0.18 No Disease
        assert_eq!(result.disease, Disease::Malaria);
        assert_eq!(result.risk_score, 73.0);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(
            result.explainability.model_importance,
            FeatureWeights::from_array([0.4, 0.3, 0.2, 0.1])
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ensemble_votes"]["Random Forest"]["prediction"], "Malaria");
        assert_eq!(json["ensemble_votes"]["Random Forest"]["confidence"], 80.0);
    }

    #[test]
    fn test_unknown_importance_model_uses_uniform() {
        let engine = RiskEngine::rules_only()
            .with_ensemble(prior_ensemble())
            .with_importance_model("SVM");
        let result = engine.assess(&obs(20.0, 50.0, 10.0, 30.0, RiskContext::Low));
        assert_eq!(result.explainability.model_importance, FeatureWeights::uniform());
    }

    #[test]
    fn test_output_is_deterministic() {
        let engine = RiskEngine::rules_only().with_ensemble(prior_ensemble());
        let observation = obs(33.0, 75.0, 210.0, 160.0, RiskContext::High);
        let first = serde_json::to_string(&engine.assess(&observation)).unwrap();
        let second = serde_json::to_string(&engine.assess(&observation)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_json_shape() {
        let result = RiskEngine::rules_only().assess(&obs(20.0, 50.0, 10.0, 30.0, RiskContext::Low));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["disease"], "No Disease");
        assert_eq!(json["severity"], "Critical");
        assert_eq!(json["risk_context"], "Low");
        assert_eq!(json["disease_risks"]["No Disease"], 100.0);
        assert!(json.get("ensemble_votes").is_none());
        assert_eq!(json["explainability"]["waterfall"][0]["cumulative"], 12.5);
    }

    #[test]
    fn test_malformed_input_rejected() {
        let engine = RiskEngine::rules_only();
        let err = engine
            .assess_raw(
                &RawReading::from("abc"),
                &RawReading::from(50.0),
                &RawReading::from(10.0),
                &RawReading::from(30.0),
                RiskContext::Low,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Input(ValidationError::NonNumeric { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_textual_readings_accepted() {
        let engine = RiskEngine::rules_only();
        let result = engine
            .assess_raw(
                &RawReading::from("32"),
                &RawReading::from("85"),
                &RawReading::from("120"),
                &RawReading::from("40"),
                RiskContext::Moderate,
            )
            .unwrap();
        assert_eq!(result.disease, Disease::Malaria);
    }

    #[test]
    fn test_batch_assesses_in_order() {
        let payload = r#"[
            {"temp": 32, "humidity": 85, "rainfall": 120, "aqi": 40, "date": "2024-07-01"},
            {"temp": "40", "humidity": "20", "rainfall": "0", "aqi": "450"}
        ]"#;
        let results = RiskEngine::rules_only()
            .assess_batch_json(payload, RiskContext::Moderate)
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].date, "2024-07-01");
        assert_eq!(results[0].result.disease, Disease::Malaria);
        assert_eq!(results[1].date, "");

        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["date"], "2024-07-01");
        assert_eq!(json["disease"], "Malaria");
    }

    #[test]
    fn test_batch_item_error_aborts_batch() {
        let payload = r#"[
            {"temp": 32, "humidity": 85, "rainfall": 120, "aqi": 40},
            {"temp": 30, "rainfall": 10, "aqi": 40}
        ]"#;
        let err = RiskEngine::rules_only()
            .assess_batch_json(payload, RiskContext::Low)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::BatchItem {
                index: 1,
                source: ValidationError::MissingField("humidity")
            }
        ));
    }

    #[test]
    fn test_batch_payload_must_be_list() {
        let err = RiskEngine::rules_only()
            .assess_batch_json(r#"{"temp": 30}"#, RiskContext::Low)
            .unwrap_err();
        assert!(matches!(err, EngineError::BatchPayload(_)));
    }

    #[test]
    fn test_from_config_without_models() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            model_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };
        let engine = RiskEngine::from_config(&config, Arc::new(TracingObserver)).unwrap();
        assert!(engine.ensemble().is_empty());

        let result = engine.assess(&obs(20.0, 50.0, 10.0, 30.0, RiskContext::Low));
        assert!(result.ensemble_votes.is_none());
    }

    #[test]
    fn test_from_config_rejects_duplicate_votes() {
        let config = EngineConfig {
            models: vec![
                ModelSpec::new("Random Forest", "a.json"),
                ModelSpec::new("Random Forest", "b.json"),
            ],
            ..EngineConfig::default()
        };
        assert!(matches!(
            RiskEngine::from_config(&config, Arc::new(TracingObserver)),
            Err(EngineError::DuplicateModel(_))
        ));
    }

    #[test]
    fn test_from_config_loads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("RandomForest_model.json"),
            r#"{"kind": "prior", "classes": ["Dengue", "No Disease"], "probabilities": [0.7, 0.3]}"#,
        )
        .unwrap();
        let config = EngineConfig {
            model_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };

        let engine = RiskEngine::from_config(&config, Arc::new(TracingObserver)).unwrap();
        assert_eq!(engine.ensemble().len(), 1);
        let result = engine.assess(&obs(20.0, 50.0, 10.0, 30.0, RiskContext::Low));
        assert_eq!(result.disease, Disease::Dengue);
    }

    proptest! {
        #[test]
        fn prop_result_invariants(
            t in -20.0f64..55.0,
            h in 0.0f64..100.0,
            r in 0.0f64..500.0,
            a in 0.0f64..500.0,
            ctx in prop_oneof![
                Just(RiskContext::Low),
                Just(RiskContext::Moderate),
                Just(RiskContext::High),
            ],
        ) {
            let result = RiskEngine::rules_only().assess(&obs(t, h, r, a, ctx));

            prop_assert!((result.disease_risks.sum() - 100.0).abs() <= 0.5);
            prop_assert!((0.0..=100.0).contains(&result.risk_score));
            prop_assert_eq!(result.severity, Severity::from_risk_score(result.risk_score));

            let report = &result.explainability;
            prop_assert!((report.combined_importance.sum() - 100.0).abs() <= 0.5);
            prop_assert_eq!(report.waterfall[0].cumulative, BASE_RATE);
            prop_assert_eq!(report.waterfall.last().unwrap().cumulative, result.risk_score);
            prop_assert_eq!(report.dominant_feature, report.reasoning[0].feature);
        }
    }
}
