//! Prediction report handed to the presentation layer

use super::verdict::{EnsembleLabel, EnsembleResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much weight the user should give the aggregated label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Models split evenly; no label can be trusted
    Inconclusive,
    /// Majority reached but the averaged confidence is below threshold
    LowConfidence,
    Confident,
}

impl Advisory {
    /// Classify a result against the low-confidence threshold (percent)
    pub fn from_result(result: &EnsembleResult, low_confidence_threshold: f64) -> Self {
        if result.label == EnsembleLabel::Conflicting {
            Advisory::Inconclusive
        } else if result.confidence < low_confidence_threshold {
            Advisory::LowConfidence
        } else {
            Advisory::Confident
        }
    }
}

/// A single rendered prediction. Transient, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Unique report identifier
    pub report_id: String,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,

    pub advisory: Advisory,

    /// Threshold the advisory was computed against
    pub low_confidence_threshold: f64,

    #[serde(flatten)]
    pub result: EnsembleResult,
}

impl PredictionReport {
    pub fn new(result: EnsembleResult, low_confidence_threshold: f64) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            advisory: Advisory::from_result(&result, low_confidence_threshold),
            low_confidence_threshold,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::verdict::{ClassifierVerdict, Diagnosis, ModelVerdict, VoteTally};

    fn result(label: EnsembleLabel, confidence: f64) -> EnsembleResult {
        EnsembleResult {
            label,
            confidence,
            details: String::new(),
            votes: VoteTally::default(),
            per_model: vec![ModelVerdict {
                model: "Logistic Regression".to_string(),
                verdict: ClassifierVerdict {
                    label: Diagnosis::HeartDisease,
                    confidence,
                },
            }],
        }
    }

    #[test]
    fn test_advisory_from_result() {
        assert_eq!(
            Advisory::from_result(&result(EnsembleLabel::Conflicting, 90.0), 60.0),
            Advisory::Inconclusive
        );
        assert_eq!(
            Advisory::from_result(&result(EnsembleLabel::HeartDisease, 59.99), 60.0),
            Advisory::LowConfidence
        );
        assert_eq!(
            Advisory::from_result(&result(EnsembleLabel::NoHeartDisease, 60.0), 60.0),
            Advisory::Confident
        );
    }

    #[test]
    fn test_report_json_flattens_result() {
        let report = PredictionReport::new(result(EnsembleLabel::HeartDisease, 72.5), 60.0);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["label"], "Heart Disease");
        assert_eq!(value["confidence"], 72.5);
        assert_eq!(value["advisory"], "confident");
        assert_eq!(value["per_model"].as_array().unwrap().len(), 1);
        assert!(uuid::Uuid::parse_str(value["report_id"].as_str().unwrap()).is_ok());
    }
}
