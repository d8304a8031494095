//! Per-model verdicts and the aggregated ensemble result

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary outcome predicted by a single classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagnosis {
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    #[serde(rename = "No Heart Disease")]
    NoHeartDisease,
}

impl Diagnosis {
    /// Label for a predicted class index (1 = heart disease)
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Diagnosis::HeartDisease
        } else {
            Diagnosis::NoHeartDisease
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::HeartDisease => "Heart Disease",
            Diagnosis::NoHeartDisease => "No Heart Disease",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier's output for one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub label: Diagnosis,
    /// Probability of heart disease as a percentage, 2 decimals
    pub confidence: f64,
}

impl ClassifierVerdict {
    /// Build a verdict from a raw positive-class probability in [0, 1].
    pub fn from_probability(label: Diagnosis, probability: f64) -> Self {
        Self {
            label,
            confidence: round2(probability.clamp(0.0, 1.0) * 100.0),
        }
    }
}

/// Final ensemble outcome. `Conflicting` is a valid result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnsembleLabel {
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    #[serde(rename = "No Heart Disease")]
    NoHeartDisease,
    Conflicting,
}

impl From<Diagnosis> for EnsembleLabel {
    fn from(d: Diagnosis) -> Self {
        match d {
            Diagnosis::HeartDisease => EnsembleLabel::HeartDisease,
            Diagnosis::NoHeartDisease => EnsembleLabel::NoHeartDisease,
        }
    }
}

impl EnsembleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnsembleLabel::HeartDisease => "Heart Disease",
            EnsembleLabel::NoHeartDisease => "No Heart Disease",
            EnsembleLabel::Conflicting => "Conflicting",
        }
    }
}

impl fmt::Display for EnsembleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict tagged with the model that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub model: String,
    #[serde(flatten)]
    pub verdict: ClassifierVerdict,
}

/// Vote counts per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub heart_disease: usize,
    pub no_heart_disease: usize,
}

impl VoteTally {
    pub fn record(&mut self, label: Diagnosis) {
        match label {
            Diagnosis::HeartDisease => self.heart_disease += 1,
            Diagnosis::NoHeartDisease => self.no_heart_disease += 1,
        }
    }

    pub fn count(&self, label: Diagnosis) -> usize {
        match label {
            Diagnosis::HeartDisease => self.heart_disease,
            Diagnosis::NoHeartDisease => self.no_heart_disease,
        }
    }

    pub fn total(&self) -> usize {
        self.heart_disease + self.no_heart_disease
    }

    /// Label with strictly the most votes, or `None` when buckets tie.
    pub fn majority(&self) -> Option<Diagnosis> {
        use std::cmp::Ordering;
        match self.heart_disease.cmp(&self.no_heart_disease) {
            Ordering::Greater => Some(Diagnosis::HeartDisease),
            Ordering::Less => Some(Diagnosis::NoHeartDisease),
            Ordering::Equal => None,
        }
    }
}

/// Aggregated prediction with the full per-model breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub label: EnsembleLabel,
    /// Percentage, 2 decimals
    pub confidence: f64,
    /// Human-readable explanation of how the label was reached
    pub details: String,
    pub votes: VoteTally,
    /// One entry per registered model, in registry order
    pub per_model: Vec<ModelVerdict>,
}

impl EnsembleResult {
    /// Look up the verdict of a named model
    pub fn verdict(&self, model: &str) -> Option<&ClassifierVerdict> {
        self.per_model
            .iter()
            .find(|m| m.model == model)
            .map(|m| &m.verdict)
    }

    pub fn is_conflicting(&self) -> bool {
        self.label == EnsembleLabel::Conflicting
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
