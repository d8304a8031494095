//! Error types for the prediction pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by model loading, validation and aggregation.
///
/// A `Conflicting` ensemble outcome is not an error; it is carried in
/// [`crate::types::EnsembleLabel`].
#[derive(Error, Debug)]
pub enum PredictorError {
    /// Empty or misconfigured model registry or application config
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A model artifact could not be loaded at startup
    #[error("Failed to load model '{model}' from {}: {reason}", .path.display())]
    ModelLoad {
        model: String,
        path: PathBuf,
        reason: String,
    },

    /// Feature vector does not match the input shape a classifier expects
    #[error("Schema mismatch for model '{model}': expected {expected} features, got {actual}")]
    SchemaMismatch {
        model: String,
        expected: usize,
        actual: usize,
    },

    /// Inference backend rejected a run
    #[error("Inference failed for model '{model}': {reason}")]
    Inference { model: String, reason: String },

    /// A survey answer lies outside its value domain
    #[error("Invalid value {value} for '{field}': expected {expected}")]
    InvalidFeature {
        field: &'static str,
        value: f64,
        expected: String,
    },

    /// Survey answers could not be read or parsed
    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<serde_json::Error> for PredictorError {
    fn from(e: serde_json::Error) -> Self {
        PredictorError::Input(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
