//! ONNX model loader

use crate::error::{PredictorError, Result};
use crate::models::onnx::OnnxClassifier;
use crate::types::FEATURE_COUNT;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::ValueType;
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// A named model and the artifact file it is loaded from
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelArtifact {
    /// Display name, e.g. "Random Forest"
    pub name: String,
    /// File name relative to the models directory
    pub file: String,
}

impl ModelArtifact {
    pub fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_string(),
        }
    }

    /// The four models shipped with the predictor
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Logistic Regression", "logistic_regression.onnx"),
            Self::new("Random Forest", "random_forest.onnx"),
            Self::new("Gradient Boosting", "gradient_boosting.onnx"),
            Self::new("XGBoost", "xgboost.onnx"),
        ]
    }
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init()
            .commit()
            .map_err(|e| PredictorError::Configuration(format!("ONNX Runtime init failed: {}", e)))?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<OnnxClassifier> {
        let path = path.as_ref();
        let load_error = |e: ort::Error| PredictorError::ModelLoad {
            model: name.to_string(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_error)?
            .with_intra_threads(self.onnx_threads)
            .map_err(load_error)?
            .commit_from_file(path)
            .map_err(load_error)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // Dynamic dimensions are reported as -1
        let input_width = session
            .inputs
            .first()
            .and_then(|i| match &i.input_type {
                ValueType::Tensor { shape, .. } => shape.last().copied(),
                _ => None,
            })
            .filter(|&d| d > 0)
            .map(|d| d as usize);

        let label_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        if let Some(width) = input_width {
            if width != FEATURE_COUNT {
                warn!(
                    model = %name,
                    expected = width,
                    provided = FEATURE_COUNT,
                    "Model input width differs from survey schema"
                );
            }
        }

        info!(
            model = %name,
            input = %input_name,
            label = ?label_name,
            probabilities = %probability_name,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            input_width,
            label_name,
            probability_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_artifacts() {
        let artifacts = ModelArtifact::defaults();
        assert_eq!(artifacts.len(), 4);
        assert_eq!(artifacts[0].name, "Logistic Regression");
        assert_eq!(artifacts[3].file, "xgboost.onnx");
    }
}
