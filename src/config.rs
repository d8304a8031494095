//! Configuration management for the heart disease predictor

use crate::error::PredictorError;
use crate::models::loader::ModelArtifact;
use crate::types::AgeEncoding;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ML models configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing ONNX model files
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Models making up the ensemble, in vote order
    #[serde(default = "ModelArtifact::defaults")]
    pub artifacts: Vec<ModelArtifact>,
    /// Number of threads for ONNX inference per model (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            artifacts: ModelArtifact::defaults(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

/// Survey schema configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturesConfig {
    /// Age encoding the deployed models were trained with
    #[serde(default)]
    pub age_encoding: AgeEncoding,
}

/// Report rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Confidence (percent) below which a majority result is flagged
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: default_low_confidence_threshold(),
        }
    }
}

fn default_low_confidence_threshold() -> f64 {
    60.0
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// Load configuration from the default path, falling back to built-in
    /// defaults when the file does not exist
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from_path(DEFAULT_CONFIG_PATH)
        } else {
            Self::load_from_env()
        }
    }

    /// Load configuration from a specific path.
    ///
    /// `HEART__SECTION__KEY` environment variables override file values.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(env_source())
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path.display()))?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(env_source())
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no ensemble can run with
    pub fn validate(&self) -> std::result::Result<(), PredictorError> {
        if self.models.artifacts.is_empty() {
            return Err(PredictorError::Configuration(
                "no model artifacts configured".to_string(),
            ));
        }
        if self.models.onnx_threads == 0 {
            return Err(PredictorError::Configuration(
                "onnx_threads must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.report.low_confidence_threshold) {
            return Err(PredictorError::Configuration(format!(
                "low_confidence_threshold {} is not a percentage",
                self.report.low_confidence_threshold
            )));
        }
        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("HEART").separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.models.models_dir, "models");
        assert_eq!(config.models.artifacts.len(), 4);
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(config.features.age_encoding, AgeEncoding::Years);
        assert_eq!(config.report.low_confidence_threshold, 60.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[models]
models_dir = "/opt/heart/models"
onnx_threads = 2
artifacts = [
    {{ name = "Logistic Regression", file = "lr.onnx" }},
    {{ name = "XGBoost", file = "xgb.onnx" }},
]

[features]
age_encoding = "coded"

[report]
low_confidence_threshold = 55.0
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.models.models_dir, "/opt/heart/models");
        assert_eq!(config.models.onnx_threads, 2);
        assert_eq!(
            config.models.artifacts,
            vec![
                ModelArtifact::new("Logistic Regression", "lr.onnx"),
                ModelArtifact::new("XGBoost", "xgb.onnx"),
            ]
        );
        assert_eq!(config.features.age_encoding, AgeEncoding::Coded);
        assert_eq!(config.report.low_confidence_threshold, 55.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_artifacts_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[models]\nartifacts = []").unwrap();

        assert!(AppConfig::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_threshold_must_be_percentage() {
        let mut config = AppConfig::default();
        config.report.low_confidence_threshold = 150.0;
        assert!(matches!(
            config.validate(),
            Err(PredictorError::Configuration(_))
        ));
    }
}
