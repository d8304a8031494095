//! ONNX Runtime backed classifier

use crate::error::{PredictorError, Result};
use crate::models::classifier::Classifier;
use crate::types::{ClassifierVerdict, Diagnosis, FeatureVector};
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DynMapValueType, DynSequenceValueType, DowncastableTarget, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// A loaded ONNX classifier.
///
/// Running a session needs exclusive access, so the session sits behind a
/// mutex; callers see a shared, read-only handle.
pub struct OnnxClassifier {
    pub(crate) name: String,
    pub(crate) session: Mutex<Session>,
    pub(crate) input_name: String,
    /// Fixed input width declared by the model, if any
    pub(crate) input_width: Option<usize>,
    pub(crate) label_name: Option<String>,
    pub(crate) probability_name: String,
}

impl OnnxClassifier {
    fn inference_error(&self, reason: impl ToString) -> PredictorError {
        PredictorError::Inference {
            model: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    /// Predicted class from the `label` output, if the model exposes one
    fn extract_label(&self, outputs: &SessionOutputs) -> Option<i64> {
        let name = self.label_name.as_deref()?;
        let output = outputs.get(name)?;
        let (_, data) = output.try_extract_tensor::<i64>().ok()?;
        data.first().copied()
    }

    /// Extract heart disease probability from model output.
    /// Handles both tensor outputs and seq(map) outputs from zipmap exports
    fn extract_probability(&self, outputs: &SessionOutputs) -> Result<f64> {
        if let Some(output) = outputs.get(self.probability_name.as_str()) {
            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                return positive_class_probability(&dims, data)
                    .ok_or_else(|| self.inference_error("empty probability tensor"));
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                return self.extract_from_sequence_map(output);
            }
        }

        // Fallback: first non-label output that yields a probability
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                if let Some(prob) = positive_class_probability(&dims, data) {
                    debug!(model = %self.name, output = %name, prob = prob, "Extracted from tensor (fallback)");
                    return Ok(prob);
                }
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(&output) {
                    return Ok(prob);
                }
            }
        }

        Err(self.inference_error("no probability output found"))
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| self.inference_error(e))?;

        let maps = sequence
            .try_extract_sequence::<DynMapValueType>(&allocator)
            .map_err(|e| self.inference_error(e))?;

        // Batch size is always 1
        let map_value = maps
            .first()
            .ok_or_else(|| self.inference_error("empty probability sequence"))?;

        let kv_pairs = map_value
            .try_extract_key_values::<i64, f32>()
            .map_err(|e| self.inference_error(e))?;

        probability_from_class_map(&kv_pairs)
            .ok_or_else(|| self.inference_error("no class probability in map"))
    }
}

/// Positive class probability from `(class, probability)` pairs; falls back to
/// the complement of class 0
fn probability_from_class_map(pairs: &[(i64, f32)]) -> Option<f64> {
    if let Some((_, prob)) = pairs.iter().find(|(class, _)| *class == 1) {
        return Some(*prob as f64);
    }
    pairs
        .iter()
        .find(|(class, _)| *class == 0)
        .map(|(_, prob)| 1.0 - *prob as f64)
}

/// Label from the model's `label` output, or thresholded at 0.5 without one
fn diagnosis(label: Option<i64>, probability: f64) -> Diagnosis {
    match label {
        Some(class) => Diagnosis::from_class(class),
        None if probability >= 0.5 => Diagnosis::HeartDisease,
        None => Diagnosis::NoHeartDisease,
    }
}

/// Reject a row whose width differs from the model's declared input width
fn check_width(model: &str, expected: Option<usize>, actual: usize) -> Result<()> {
    match expected {
        Some(expected) if expected != actual => Err(PredictorError::SchemaMismatch {
            model: model.to_string(),
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}

/// Positive class probability from a `[batch, classes]`, `[classes]` or
/// single-probability tensor
fn positive_class_probability(dims: &[i64], data: &[f32]) -> Option<f64> {
    let classes = dims.last().copied().unwrap_or(0);
    if classes >= 2 {
        data.get(1).map(|&p| p as f64)
    } else {
        data.first().map(|&p| p as f64)
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassifierVerdict> {
        let row = features.to_model_input();

        check_width(&self.name, self.input_width, row.len())?;

        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, row.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, row)).map_err(|e| self.inference_error(e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| self.inference_error(format!("lock error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| self.inference_error(e))?;

        let probability = self.extract_probability(&outputs)?;
        let label = diagnosis(self.extract_label(&outputs), probability);

        let verdict = ClassifierVerdict::from_probability(label, probability);
        debug!(
            model = %self.name,
            label = %verdict.label,
            probability = probability,
            "ONNX inference complete"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_from_two_class_tensor() {
        assert_eq!(positive_class_probability(&[1, 2], &[0.25, 0.75]), Some(0.75));
        assert_eq!(positive_class_probability(&[2], &[0.6, 0.4]), Some(0.4_f32 as f64));
    }

    #[test]
    fn test_probability_from_single_output() {
        assert_eq!(positive_class_probability(&[1, 1], &[0.5]), Some(0.5));
        assert_eq!(positive_class_probability(&[1, 2], &[]), None);
    }

    #[test]
    fn test_probability_from_class_map() {
        assert_eq!(
            probability_from_class_map(&[(0, 0.3), (1, 0.7)]),
            Some(0.7_f32 as f64)
        );
        assert_eq!(
            probability_from_class_map(&[(0, 0.25)]),
            Some(1.0 - 0.25_f32 as f64)
        );
        assert_eq!(probability_from_class_map(&[(2, 0.9)]), None);
        assert_eq!(probability_from_class_map(&[]), None);
    }

    #[test]
    fn test_label_output_wins_over_probability() {
        assert_eq!(diagnosis(Some(1), 0.1), Diagnosis::HeartDisease);
        assert_eq!(diagnosis(Some(0), 0.9), Diagnosis::NoHeartDisease);
    }

    #[test]
    fn test_label_derived_from_probability() {
        assert_eq!(diagnosis(None, 0.5), Diagnosis::HeartDisease);
        assert_eq!(diagnosis(None, 0.4999), Diagnosis::NoHeartDisease);
        assert_eq!(diagnosis(None, 0.93), Diagnosis::HeartDisease);
    }

    #[test]
    fn test_check_width() {
        assert!(check_width("XGBoost", None, 19).is_ok());
        assert!(check_width("XGBoost", Some(19), 19).is_ok());

        match check_width("XGBoost", Some(21), 19) {
            Err(PredictorError::SchemaMismatch {
                model,
                expected,
                actual,
            }) => {
                assert_eq!(model, "XGBoost");
                assert_eq!(expected, 21);
                assert_eq!(actual, 19);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
