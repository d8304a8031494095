//! Type definitions for the prediction pipeline

pub mod features;
pub mod report;
pub mod verdict;

pub use features::{AgeEncoding, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use report::{Advisory, PredictionReport};
pub use verdict::{
    ClassifierVerdict, Diagnosis, EnsembleLabel, EnsembleResult, ModelVerdict, VoteTally,
};
