//! Classifier ensemble: capability interface, ONNX backend, registry and aggregation

pub mod aggregator;
pub mod classifier;
pub mod loader;
pub mod onnx;
pub mod registry;

pub use aggregator::EnsembleAggregator;
pub use classifier::Classifier;
pub use loader::{ModelArtifact, ModelLoader};
pub use onnx::OnnxClassifier;
pub use registry::ModelRegistry;
