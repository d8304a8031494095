//! Heart Disease Predictor - command-line front-end
//!
//! Reads survey answers as JSON, runs the classifier ensemble and prints
//! the aggregated risk label with a per-model breakdown.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use heart_disease_predictor::{
    config::AppConfig,
    logging::init_logging,
    models::{EnsembleAggregator, ModelRegistry},
    presentation::{collect_features, render, render_json},
    types::PredictionReport,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "heart-predict", version, about = "Ensemble heart disease risk prediction")]
struct Cli {
    /// Configuration file (defaults to config/config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Survey answers as JSON; reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override the models directory from the configuration
    #[arg(long)]
    models_dir: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(dir) = cli.models_dir.clone() {
        config.models.models_dir = dir;
    }

    init_logging(&config.logging, "heart_predict");
    info!(
        models_dir = %config.models.models_dir,
        age_encoding = ?config.features.age_encoding,
        "Starting Heart Disease Predictor"
    );

    // Models load once; any missing artifact aborts startup
    let registry = Arc::new(
        ModelRegistry::load_all(
            &config.models.models_dir,
            &config.models.artifacts,
            config.models.onnx_threads,
        )
        .context("Failed to load model registry")?,
    );
    let aggregator = EnsembleAggregator::new(registry);

    let features = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            collect_features(BufReader::new(file), config.features.age_encoding)?
        }
        None => collect_features(io::stdin().lock(), config.features.age_encoding)?,
    };

    let result = aggregator.aggregate(&features)?;
    let report = PredictionReport::new(result, config.report.low_confidence_threshold);

    if report.result.is_conflicting() {
        warn!(report_id = %report.report_id, "Models split evenly, result inconclusive");
    }
    info!(
        report_id = %report.report_id,
        label = %report.result.label,
        confidence = report.result.confidence,
        advisory = ?report.advisory,
        "Prediction complete"
    );

    match cli.format {
        OutputFormat::Text => print!("{}", render(&report)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    Ok(())
}
