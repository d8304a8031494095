//! Heart Disease Predictor Library
//!
//! Runs several pre-trained binary classifiers over one subject's health
//! survey answers and reduces their verdicts to a single risk label by
//! majority vote, with a confidence-based tie-break.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod presentation;
pub mod types;

pub use config::AppConfig;
pub use error::PredictorError;
pub use models::{Classifier, EnsembleAggregator, ModelRegistry};
pub use types::{ClassifierVerdict, EnsembleLabel, EnsembleResult, FeatureVector, PredictionReport};
