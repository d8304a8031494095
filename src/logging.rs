//! Tracing subscriber setup shared by the binaries

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr so stdout carries only the report.
pub fn init_logging(config: &LoggingConfig, bin_target: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "heart_disease_predictor={level},{bin}={level}",
            level = config.level,
            bin = bin_target
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A subscriber already installed (e.g. by a test harness) is fine
    result.ok();
}
