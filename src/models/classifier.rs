//! Capability interface shared by every classifier

use crate::error::Result;
use crate::types::{ClassifierVerdict, FeatureVector};

/// A pre-trained binary heart disease classifier.
///
/// Implementations must behave as a pure function of `features` per call.
pub trait Classifier: Send + Sync {
    /// Display name, unique within a registry
    fn name(&self) -> &str;

    /// Predict a label and the heart disease probability for one subject
    fn predict(&self, features: &FeatureVector) -> Result<ClassifierVerdict>;
}
