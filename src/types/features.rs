//! Survey answers as a fixed-schema feature vector

use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};

/// Number of features every classifier is trained on.
pub const FEATURE_COUNT: usize = 19;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "HighBP",
    "HighChol",
    "CholCheck",
    "BMI",
    "Smoker",
    "Stroke",
    "Diabetes",
    "PhysActivity",
    "Fruits",
    "Veggies",
    "HvyAlcoholConsump",
    "AnyHealthcare",
    "NoDocbcCost",
    "GenHlth",
    "MentHlth",
    "PhysHlth",
    "DiffWalk",
    "Sex",
    "Age",
];

/// How the `Age` answer is encoded for the deployed models.
///
/// The two variants are incompatible with a single trained model, so exactly
/// one is accepted per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeEncoding {
    /// Raw age in years, 0-120
    #[default]
    Years,
    /// Survey age-group bucket, 1-13
    Coded,
}

impl AgeEncoding {
    /// Inclusive range of accepted `Age` values
    pub fn range(&self) -> (f64, f64) {
        match self {
            AgeEncoding::Years => (0.0, 120.0),
            AgeEncoding::Coded => (1.0, 13.0),
        }
    }

    /// Encode an age in years. Coded buckets are 18-24, then 5-year groups
    /// up to 80 and older.
    pub fn encode(&self, years: u8) -> f64 {
        match self {
            AgeEncoding::Years => years.min(120) as f64,
            AgeEncoding::Coded => {
                if years < 25 {
                    1.0
                } else {
                    ((years - 25) / 5 + 2).min(13) as f64
                }
            }
        }
    }
}

/// One subject's survey answers.
///
/// Yes/no answers are 0 or 1. Every answer is carried as a number so that
/// out-of-domain values reach [`FeatureVector::validate`] instead of failing
/// to parse. Field names on the wire match the training dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureVector {
    #[serde(rename = "HighBP")]
    pub high_bp: f64,

    #[serde(rename = "HighChol")]
    pub high_chol: f64,

    /// Cholesterol check in the past 5 years
    #[serde(rename = "CholCheck")]
    pub chol_check: f64,

    /// Body mass index, 10.0-60.0
    #[serde(rename = "BMI")]
    pub bmi: f64,

    /// Smoked at least 100 cigarettes over lifetime
    #[serde(rename = "Smoker")]
    pub smoker: f64,

    #[serde(rename = "Stroke")]
    pub stroke: f64,

    #[serde(rename = "Diabetes")]
    pub diabetes: f64,

    /// Physical activity in the past 30 days, excluding job
    #[serde(rename = "PhysActivity")]
    pub phys_activity: f64,

    #[serde(rename = "Fruits")]
    pub fruits: f64,

    #[serde(rename = "Veggies")]
    pub veggies: f64,

    #[serde(rename = "HvyAlcoholConsump")]
    pub hvy_alcohol_consump: f64,

    /// Any form of healthcare coverage
    #[serde(rename = "AnyHealthcare")]
    pub any_healthcare: f64,

    /// Could not see a doctor because of cost
    #[serde(rename = "NoDocbcCost")]
    pub no_doc_bc_cost: f64,

    /// General health, 1 = excellent .. 5 = poor
    #[serde(rename = "GenHlth")]
    pub gen_hlth: f64,

    /// Days of poor mental health in the past 30 days
    #[serde(rename = "MentHlth")]
    pub ment_hlth: f64,

    /// Days of poor physical health in the past 30 days
    #[serde(rename = "PhysHlth")]
    pub phys_hlth: f64,

    /// Difficulty walking or climbing stairs
    #[serde(rename = "DiffWalk")]
    pub diff_walk: f64,

    /// 0 = female, 1 = male
    #[serde(rename = "Sex")]
    pub sex: f64,

    /// Years or coded bucket, see [`AgeEncoding`]
    #[serde(rename = "Age")]
    pub age: f64,
}

impl FeatureVector {
    /// Parse survey answers from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every answer against its value domain.
    pub fn validate(&self, age_encoding: AgeEncoding) -> Result<()> {
        let binary = [
            ("HighBP", self.high_bp),
            ("HighChol", self.high_chol),
            ("CholCheck", self.chol_check),
            ("Smoker", self.smoker),
            ("Stroke", self.stroke),
            ("Diabetes", self.diabetes),
            ("PhysActivity", self.phys_activity),
            ("Fruits", self.fruits),
            ("Veggies", self.veggies),
            ("HvyAlcoholConsump", self.hvy_alcohol_consump),
            ("AnyHealthcare", self.any_healthcare),
            ("NoDocbcCost", self.no_doc_bc_cost),
            ("DiffWalk", self.diff_walk),
            ("Sex", self.sex),
        ];
        for (field, value) in binary {
            check_range(field, value, 0.0, 1.0, true)?;
        }

        check_range("BMI", self.bmi, 10.0, 60.0, false)?;
        check_range("GenHlth", self.gen_hlth, 1.0, 5.0, true)?;
        check_range("MentHlth", self.ment_hlth, 0.0, 30.0, true)?;
        check_range("PhysHlth", self.phys_hlth, 0.0, 30.0, true)?;

        let (min_age, max_age) = age_encoding.range();
        check_range("Age", self.age, min_age, max_age, true)
    }

    /// Flatten into the `[1, 19]` row the classifiers consume.
    ///
    /// Order matches [`FEATURE_NAMES`].
    pub fn to_model_input(&self) -> Vec<f32> {
        vec![
            self.high_bp as f32,
            self.high_chol as f32,
            self.chol_check as f32,
            self.bmi as f32,
            self.smoker as f32,
            self.stroke as f32,
            self.diabetes as f32,
            self.phys_activity as f32,
            self.fruits as f32,
            self.veggies as f32,
            self.hvy_alcohol_consump as f32,
            self.any_healthcare as f32,
            self.no_doc_bc_cost as f32,
            self.gen_hlth as f32,
            self.ment_hlth as f32,
            self.phys_hlth as f32,
            self.diff_walk as f32,
            self.sex as f32,
            self.age as f32,
        ]
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64, integral: bool) -> Result<()> {
    let in_range = value >= min && value <= max;
    if in_range && (!integral || value.fract() == 0.0) {
        return Ok(());
    }

    let expected = if integral && min == 0.0 && max == 1.0 {
        "0 or 1".to_string()
    } else if integral {
        format!("an integer in [{}, {}]", min, max)
    } else {
        format!("a value in [{:.1}, {:.1}]", min, max)
    };
    Err(PredictorError::InvalidFeature {
        field,
        value,
        expected,
    })
}

impl Default for FeatureVector {
    /// Form defaults: every yes/no answer "No", a healthy BMI, average health.
    fn default() -> Self {
        Self {
            high_bp: 0.0,
            high_chol: 0.0,
            chol_check: 0.0,
            bmi: 20.0,
            smoker: 0.0,
            stroke: 0.0,
            diabetes: 0.0,
            phys_activity: 0.0,
            fruits: 0.0,
            veggies: 0.0,
            hvy_alcohol_consump: 0.0,
            any_healthcare: 0.0,
            no_doc_bc_cost: 0.0,
            gen_hlth: 3.0,
            ment_hlth: 0.0,
            phys_hlth: 0.0,
            diff_walk: 0.0,
            sex: 0.0,
            age: 30.0,
        }
    }
}
