//! Per-disease Score Vector

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::disease::Disease;

/// Non-negative score per disease, indexed in [`Disease::ALL`] order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreVector([f64; Disease::COUNT]);

impl ScoreVector {
    /// All-zero vector
    pub fn zeros() -> Self {
        Self([0.0; Disease::COUNT])
    }

    pub fn get(&self, disease: Disease) -> f64 {
        self.0[disease.index()]
    }

    pub fn set(&mut self, disease: Disease, value: f64) {
        debug_assert!(value.is_finite() && value >= 0.0, "score must be finite and >= 0");
        self.0[disease.index()] = value;
    }

    pub fn add(&mut self, disease: Disease, value: f64) {
        debug_assert!(value.is_finite() && value >= 0.0, "increment must be finite and >= 0");
        self.0[disease.index()] += value;
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Divide every score by `divisor`; a zero divisor leaves the vector unchanged
    pub fn scaled_down(&self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return *self;
        }
        Self(self.0.map(|v| v / divisor))
    }

    /// Rescale so the scores sum to 1; an all-zero vector stays all-zero
    pub fn normalized(&self) -> Self {
        self.scaled_down(self.sum())
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, f64)> + '_ {
        Disease::ALL.iter().map(move |&d| (d, self.get(d)))
    }

    /// Highest score, ties resolved to the earliest disease
    pub fn argmax(&self) -> (Disease, f64) {
        let mut best = (Disease::ALL[0], self.0[0]);
        for (disease, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (disease, score);
            }
        }
        best
    }

    /// Diseases sorted by score descending; equal scores keep fixed order
    pub fn ranked(&self) -> Vec<(Disease, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

impl Serialize for ScoreVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Disease::COUNT))?;
        for (disease, score) in self.iter() {
            map.serialize_entry(disease.as_str(), &score)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize() {
        let mut scores = ScoreVector::zeros();
        scores.add(Disease::Malaria, 0.6);
        scores.add(Disease::NoDisease, 0.2);
        let norm = scores.normalized();
        assert!((norm.sum() - 1.0).abs() < 1e-12);
        assert!((norm.get(Disease::Malaria) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_normalize_is_safe() {
        let norm = ScoreVector::zeros().normalized();
        assert_eq!(norm, ScoreVector::zeros());
        assert_eq!(norm.argmax(), (Disease::Malaria, 0.0));
    }

    #[test]
    fn test_argmax_tie_breaks_by_order() {
        let mut scores = ScoreVector::zeros();
        scores.set(Disease::Cholera, 0.4);
        scores.set(Disease::Dengue, 0.4);
        assert_eq!(scores.argmax().0, Disease::Dengue);
    }

    #[test]
    fn test_ranked_is_stable() {
        let mut scores = ScoreVector::zeros();
        scores.set(Disease::Asthma, 0.3);
        scores.set(Disease::Typhoid, 0.3);
        scores.set(Disease::NoDisease, 0.4);
        let ranked = scores.ranked();
        assert_eq!(ranked[0].0, Disease::NoDisease);
        assert_eq!(ranked[1].0, Disease::Typhoid);
        assert_eq!(ranked[2].0, Disease::Asthma);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let json = serde_json::to_string(&ScoreVector::zeros()).unwrap();
        assert!(json.starts_with(r#"{"Malaria":0.0,"Dengue":0.0"#));
        assert!(json.ends_with(r#""No Disease":0.0}"#));
    }

    proptest! {
        #[test]
        fn prop_normalized_sums_to_one(values in proptest::array::uniform8(0.0f64..5.0)) {
            let scores = ScoreVector(values).normalized();
            if values.iter().sum::<f64>() > 0.0 {
                prop_assert!((scores.sum() - 1.0).abs() < 1e-9);
            }
            let (winner, best) = scores.argmax();
            prop_assert!(scores.iter().all(|(_, s)| s <= best));
            prop_assert_eq!(scores.ranked()[0].0, winner);
        }
    }
}
