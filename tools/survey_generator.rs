//! Survey Generator
//!
//! Emits random, valid survey answers as JSON lines for exercising
//! `heart-predict`.

use heart_disease_predictor::config::AppConfig;
use heart_disease_predictor::logging::init_logging;
use heart_disease_predictor::types::{AgeEncoding, FeatureVector};
use rand::Rng;
use std::io::{self, Write};
use tracing::info;

/// Survey answer generator
struct SurveyGenerator {
    rng: rand::rngs::ThreadRng,
    age_encoding: AgeEncoding,
}

impl SurveyGenerator {
    fn new(age_encoding: AgeEncoding) -> Self {
        Self {
            rng: rand::thread_rng(),
            age_encoding,
        }
    }

    fn flag(&mut self, p: f64) -> f64 {
        if self.rng.gen_bool(p) {
            1.0
        } else {
            0.0
        }
    }

    fn count(&mut self, min: u8, max: u8) -> f64 {
        self.rng.gen_range(min..=max) as f64
    }

    /// Age in years, written in the deployment's encoding
    fn age(&mut self, min_years: u8, max_years: u8) -> f64 {
        let years = self.rng.gen_range(min_years..=max_years);
        self.age_encoding.encode(years)
    }

    /// Answers drawn from the general population
    fn generate_typical(&mut self) -> FeatureVector {
        FeatureVector {
            high_bp: self.flag(0.3),
            high_chol: self.flag(0.3),
            chol_check: self.flag(0.9),
            bmi: (self.rng.gen_range(18.5..32.0_f64) * 10.0).round() / 10.0,
            smoker: self.flag(0.35),
            stroke: self.flag(0.02),
            diabetes: self.flag(0.1),
            phys_activity: self.flag(0.75),
            fruits: self.flag(0.6),
            veggies: self.flag(0.8),
            hvy_alcohol_consump: self.flag(0.05),
            any_healthcare: self.flag(0.95),
            no_doc_bc_cost: self.flag(0.08),
            gen_hlth: self.count(1, 3),
            ment_hlth: self.count(0, 5),
            phys_hlth: self.count(0, 5),
            diff_walk: self.flag(0.1),
            sex: self.flag(0.5),
            age: self.age(18, 65),
        }
    }

    /// Answers with several cardiovascular risk factors
    fn generate_high_risk(&mut self) -> FeatureVector {
        FeatureVector {
            high_bp: 1.0,
            high_chol: 1.0,
            chol_check: 1.0,
            bmi: (self.rng.gen_range(30.0..45.0_f64) * 10.0).round() / 10.0,
            smoker: self.flag(0.7),
            stroke: self.flag(0.2),
            diabetes: self.flag(0.5),
            phys_activity: self.flag(0.3),
            fruits: self.flag(0.3),
            veggies: self.flag(0.5),
            hvy_alcohol_consump: self.flag(0.15),
            any_healthcare: self.flag(0.9),
            no_doc_bc_cost: self.flag(0.2),
            gen_hlth: self.count(4, 5),
            ment_hlth: self.count(5, 30),
            phys_hlth: self.count(10, 30),
            diff_walk: self.flag(0.6),
            sex: self.flag(0.6),
            age: self.age(60, 90),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging, "survey_generator");
    let age_encoding = config.features.age_encoding;

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let high_risk_rate: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.2_f64)
        .clamp(0.0, 1.0);

    info!(
        count = count,
        high_risk_rate = high_risk_rate,
        age_encoding = ?age_encoding,
        "Generating survey answers"
    );

    let mut generator = SurveyGenerator::new(age_encoding);
    let mut rng = rand::thread_rng();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut typical_count = 0;
    let mut high_risk_count = 0;

    for _ in 0..count {
        let features = if rng.gen_bool(high_risk_rate) {
            high_risk_count += 1;
            generator.generate_high_risk()
        } else {
            typical_count += 1;
            generator.generate_typical()
        };

        features.validate(age_encoding)?;
        writeln!(out, "{}", serde_json::to_string(&features)?)?;
    }

    info!(
        "Completed! Generated {} surveys ({} typical, {} high risk)",
        count, typical_count, high_risk_count
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_answers_validate_for_coded_ages() {
        let mut generator = SurveyGenerator::new(AgeEncoding::Coded);
        for _ in 0..50 {
            let typical = generator.generate_typical();
            assert!(typical.validate(AgeEncoding::Coded).is_ok());
            assert!((1.0..=13.0).contains(&typical.age));

            let high_risk = generator.generate_high_risk();
            assert!(high_risk.validate(AgeEncoding::Coded).is_ok());
            assert!(high_risk.age >= 9.0);
        }
    }

    #[test]
    fn test_generated_answers_validate_for_years() {
        let mut generator = SurveyGenerator::new(AgeEncoding::Years);
        for _ in 0..50 {
            let high_risk = generator.generate_high_risk();
            assert!(high_risk.validate(AgeEncoding::Years).is_ok());
            assert!((60.0..=90.0).contains(&high_risk.age));
        }
    }
}
