//! Majority-vote aggregation over the classifier ensemble

use crate::error::{PredictorError, Result};
use crate::models::registry::ModelRegistry;
use crate::types::verdict::round2;
use crate::types::{
    Diagnosis, EnsembleLabel, EnsembleResult, FeatureVector, ModelVerdict, VoteTally,
};
use std::sync::Arc;
use tracing::debug;

/// Combines every registered classifier's verdict into one decision.
///
/// Majority label wins with the mean confidence of its voters. An even split
/// yields `Conflicting`, reported with the single most confident model's
/// confidence.
pub struct EnsembleAggregator {
    registry: Arc<ModelRegistry>,
}

impl EnsembleAggregator {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run all classifiers on `features` and reduce their verdicts.
    ///
    /// Any failing model fails the whole request; the tally is always over
    /// the full registry.
    pub fn aggregate(&self, features: &FeatureVector) -> Result<EnsembleResult> {
        if self.registry.is_empty() {
            return Err(PredictorError::Configuration(
                "model registry is empty".to_string(),
            ));
        }

        let mut per_model = Vec::with_capacity(self.registry.len());
        for model in self.registry.iter() {
            let verdict = model.predict(features)?;
            debug!(
                model = %model.name(),
                label = %verdict.label,
                confidence = verdict.confidence,
                "Model verdict"
            );
            per_model.push(ModelVerdict {
                model: model.name().to_string(),
                verdict,
            });
        }

        let result = Self::reduce(per_model);

        debug!(
            label = %result.label,
            confidence = result.confidence,
            heart_disease_votes = result.votes.heart_disease,
            no_heart_disease_votes = result.votes.no_heart_disease,
            "Ensemble aggregation complete"
        );

        Ok(result)
    }

    /// Reduce a non-empty verdict set to an ensemble result.
    fn reduce(per_model: Vec<ModelVerdict>) -> EnsembleResult {
        let mut votes = VoteTally::default();
        for m in &per_model {
            votes.record(m.verdict.label);
        }

        match votes.majority() {
            Some(label) => {
                let confidences: Vec<f64> = per_model
                    .iter()
                    .filter(|m| m.verdict.label == label)
                    .map(|m| m.verdict.confidence)
                    .collect();
                let confidence =
                    round2(confidences.iter().sum::<f64>() / confidences.len() as f64);

                let details = format!(
                    "{} of {} models predict {} with an average confidence of {:.2}%.",
                    votes.count(label),
                    votes.total(),
                    label,
                    confidence
                );

                EnsembleResult {
                    label: label.into(),
                    confidence,
                    details,
                    votes,
                    per_model,
                }
            }
            None => {
                let leader = Self::most_confident(&per_model);
                let confidence = leader.verdict.confidence;
                let details = format!(
                    "Models disagree ({} vs {}). The most confident model, {} ({:.2}%), suggests {}.",
                    votes.count(Diagnosis::HeartDisease),
                    votes.count(Diagnosis::NoHeartDisease),
                    leader.model,
                    confidence,
                    leader.verdict.label
                );

                EnsembleResult {
                    label: EnsembleLabel::Conflicting,
                    confidence,
                    details,
                    votes,
                    per_model,
                }
            }
        }
    }

    /// Highest confidence wins; equal confidences keep the first seen.
    fn most_confident(per_model: &[ModelVerdict]) -> &ModelVerdict {
        let mut best = &per_model[0];
        for candidate in &per_model[1..] {
            if candidate.verdict.confidence > best.verdict.confidence {
                best = candidate;
            }
        }
        best
    }
}
