//! Read-only registry of loaded classifiers

use crate::error::{PredictorError, Result};
use crate::models::classifier::Classifier;
use crate::models::loader::{ModelArtifact, ModelLoader};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loaded classifiers in registration order.
///
/// Built once at startup and never mutated; share it behind an `Arc`.
pub struct ModelRegistry {
    models: Vec<Arc<dyn Classifier>>,
}

impl ModelRegistry {
    /// Build a registry from already constructed classifiers.
    ///
    /// Model names must be unique.
    pub fn new(models: Vec<Arc<dyn Classifier>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.name().to_string()) {
                return Err(PredictorError::Configuration(format!(
                    "duplicate model name '{}'",
                    model.name()
                )));
            }
        }
        Ok(Self { models })
    }

    /// Load every configured artifact from `models_dir`.
    ///
    /// Fails on the first missing or unreadable artifact.
    pub fn load_all<P: AsRef<Path>>(
        models_dir: P,
        artifacts: &[ModelArtifact],
        onnx_threads: usize,
    ) -> Result<Self> {
        let models_dir = models_dir.as_ref();

        // Check paths before paying for runtime initialisation
        for artifact in artifacts {
            let path = models_dir.join(&artifact.file);
            if !path.is_file() {
                return Err(PredictorError::ModelLoad {
                    model: artifact.name.clone(),
                    path,
                    reason: "model file not found".to_string(),
                });
            }
        }

        let loader = ModelLoader::with_threads(onnx_threads)?;
        let mut models: Vec<Arc<dyn Classifier>> = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let model = loader.load_model(models_dir.join(&artifact.file), &artifact.name)?;
            models.push(Arc::new(model));
        }

        let registry = Self::new(models)?;
        info!(
            count = registry.len(),
            models = ?registry.names(),
            "Loaded {} models from {}",
            registry.len(),
            models_dir.display()
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Classifier>> {
        self.models.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classifier::testing::FixedClassifier;
    use crate::types::Diagnosis;

    #[test]
    fn test_registry_keeps_order() {
        let models: Vec<Arc<dyn Classifier>> = vec![
            Arc::new(FixedClassifier::new("b", Diagnosis::HeartDisease, 60.0)),
            Arc::new(FixedClassifier::new("a", Diagnosis::NoHeartDisease, 40.0)),
        ];
        let registry = ModelRegistry::new(models).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let models: Vec<Arc<dyn Classifier>> = vec![
            Arc::new(FixedClassifier::new("XGBoost", Diagnosis::HeartDisease, 60.0)),
            Arc::new(FixedClassifier::new("XGBoost", Diagnosis::HeartDisease, 70.0)),
        ];
        assert!(matches!(
            ModelRegistry::new(models),
            Err(PredictorError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_artifact_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logistic_regression.onnx"), b"").unwrap();

        let artifacts = vec![
            ModelArtifact::new("Logistic Regression", "logistic_regression.onnx"),
            ModelArtifact::new("Random Forest", "random_forest.onnx"),
        ];

        match ModelRegistry::load_all(dir.path(), &artifacts, 1) {
            Err(PredictorError::ModelLoad { model, path, .. }) => {
                assert_eq!(model, "Random Forest");
                assert!(path.ends_with("random_forest.onnx"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("load should fail"),
        }
    }
}
