//! Survey input collection and report rendering

use crate::error::{PredictorError, Result};
use crate::types::{Advisory, AgeEncoding, EnsembleLabel, FeatureVector, PredictionReport};
use std::fmt::{self, Write};
use std::io::Read;

const MODEL_NOTES: &str = "\
About the models:
  - Logistic Regression: good for simple, interpretable relationships.
  - Random Forest: strong with complex, non-linear patterns.
  - Gradient Boosting: excellent at fine-tuning predictions.
  - XGBoost: powerful, optimized for accuracy and speed.";

const DISCLAIMER: &str = "\
Disclaimer: this prediction tool is for informational purposes only and should NOT be
used as a final diagnosis. Always consult a qualified healthcare professional for
medical advice.";

/// Read survey answers as JSON and validate them against the schema.
pub fn collect_features<R: Read>(mut reader: R, age_encoding: AgeEncoding) -> Result<FeatureVector> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|e| PredictorError::Input(e.to_string()))?;

    let features = FeatureVector::from_json(&buf)?;
    features.validate(age_encoding)?;
    Ok(features)
}

/// Render a report as human-readable text.
pub fn render(report: &PredictionReport) -> String {
    let mut out = String::new();
    write_report(&mut out, report).expect("writing to a String cannot fail");
    out
}

fn write_report(out: &mut String, report: &PredictionReport) -> fmt::Result {
    let result = &report.result;

    writeln!(out, "Prediction Result")?;
    writeln!(out, "=================")?;
    writeln!(out, "{}", result.details)?;
    writeln!(out)?;

    match report.advisory {
        Advisory::Inconclusive => {
            writeln!(
                out,
                "WARNING: Conflicting predictions, results inconclusive. Please consult a real doctor."
            )?;
        }
        Advisory::LowConfidence | Advisory::Confident => {
            if report.advisory == Advisory::LowConfidence {
                writeln!(
                    out,
                    "WARNING: Low confidence prediction ({:.2}%). Please interpret cautiously.",
                    result.confidence
                )?;
            }
            if result.label == EnsembleLabel::HeartDisease {
                writeln!(out, "Likely to have heart disease.")?;
            } else {
                writeln!(out, "Unlikely to have heart disease.")?;
            }
        }
    }
    writeln!(out)?;

    let width = result
        .per_model
        .iter()
        .map(|m| m.model.len())
        .max()
        .unwrap_or(0)
        .max("Model".len());

    writeln!(out, "Model predictions and confidence levels:")?;
    writeln!(
        out,
        "  {:<width$}  {:<16}  {:>14}",
        "Model",
        "Prediction",
        "Confidence (%)",
        width = width
    )?;
    for m in &result.per_model {
        writeln!(
            out,
            "  {:<width$}  {:<16}  {:>14.2}",
            m.model,
            m.verdict.label.as_str(),
            m.verdict.confidence,
            width = width
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Note: confidence is each model's estimated probability of heart disease. If predictions \
         differ, trust the majority but always consult a medical professional."
    )?;
    writeln!(out)?;
    writeln!(out, "{}", MODEL_NOTES)?;
    writeln!(out)?;
    writeln!(out, "{}", DISCLAIMER)
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &PredictionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassifierVerdict, Diagnosis, EnsembleResult, ModelVerdict, VoteTally};

    fn report(label: EnsembleLabel, confidence: f64) -> PredictionReport {
        let per_model = vec![
            ModelVerdict {
                model: "Logistic Regression".to_string(),
                verdict: ClassifierVerdict {
                    label: Diagnosis::NoHeartDisease,
                    confidence: 70.12,
                },
            },
            ModelVerdict {
                model: "XGBoost".to_string(),
                verdict: ClassifierVerdict {
                    label: Diagnosis::HeartDisease,
                    confidence: 93.4,
                },
            },
        ];
        let result = EnsembleResult {
            label,
            confidence,
            details: "summary line".to_string(),
            votes: VoteTally {
                heart_disease: 1,
                no_heart_disease: 1,
            },
            per_model,
        };
        PredictionReport::new(result, 60.0)
    }

    #[test]
    fn test_collect_valid_features() {
        let json = serde_json::to_string(&FeatureVector::default()).unwrap();
        let features = collect_features(json.as_bytes(), AgeEncoding::Years).unwrap();
        assert_eq!(features, FeatureVector::default());
    }

    #[test]
    fn test_collect_rejects_out_of_domain() {
        let mut value = serde_json::to_value(FeatureVector::default()).unwrap();
        value["GenHlth"] = serde_json::json!(7);
        let json = value.to_string();

        assert!(matches!(
            collect_features(json.as_bytes(), AgeEncoding::Years),
            Err(PredictorError::InvalidFeature { field: "GenHlth", .. })
        ));
    }

    #[test]
    fn test_collect_rejects_malformed_json() {
        assert!(matches!(
            collect_features("not json".as_bytes(), AgeEncoding::Years),
            Err(PredictorError::Input(_))
        ));
    }

    #[test]
    fn test_render_conflicting() {
        let text = render(&report(EnsembleLabel::Conflicting, 93.4));
        assert!(text.contains("summary line"));
        assert!(text.contains("results inconclusive"));
        assert!(!text.contains("Likely to have heart disease."));
    }

    #[test]
    fn test_render_low_confidence_majority() {
        let text = render(&report(EnsembleLabel::HeartDisease, 55.5));
        assert!(text.contains("Low confidence prediction (55.50%)"));
        assert!(text.contains("Likely to have heart disease."));
    }

    #[test]
    fn test_render_confident_negative() {
        let text = render(&report(EnsembleLabel::NoHeartDisease, 81.0));
        assert!(!text.contains("Low confidence"));
        assert!(text.contains("Unlikely to have heart disease."));
    }

    #[test]
    fn test_render_breakdown_table() {
        let text = render(&report(EnsembleLabel::HeartDisease, 81.0));
        assert!(text.contains("Logistic Regression"));
        assert!(text.contains("70.12"));
        assert!(text.contains("93.40"));
        assert!(text.contains("Disclaimer"));
    }

    #[test]
    fn test_write_report_sections_in_order() {
        let mut out = String::from("header\n");
        write_report(&mut out, &report(EnsembleLabel::NoHeartDisease, 81.0)).unwrap();

        assert!(out.starts_with("header\nPrediction Result\n"));
        let table = out.find("Model predictions and confidence levels:").unwrap();
        let notes = out.find("About the models:").unwrap();
        let disclaimer = out.find("Disclaimer:").unwrap();
        assert!(table < notes && notes < disclaimer);
        assert!(out.ends_with("medical advice.\n"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&report(EnsembleLabel::Conflicting, 93.4)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["label"], "Conflicting");
        assert_eq!(value["advisory"], "inconclusive");
    }
}
