//! Attrition risk classification
//!
//! Scores a record set with the loaded model and labels every employee as
//! Low, Medium or High risk. A missing model is a normal state: the records
//! pass through untouched. A scoring failure degrades the whole batch to
//! probability 0 and category `Error` instead of propagating.

use std::ops::Bound;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::bins::{Band, BinClassifier};
use super::columns::{
    ATTRITION_PROBABILITY, EMPLOYEE_ID, HIGH_RISK_DISPLAY_COLUMNS, RISK_CATEGORY,
};
use super::model::AttritionModel;

/// Probabilities below this are Low risk
pub const MEDIUM_RISK_FROM: f64 = 0.3;

/// Probabilities above this are High risk
pub const HIGH_RISK_ABOVE: f64 = 0.6;

/// Number of bins in the probability histogram
pub const HISTOGRAM_BINS: usize = 20;

/// Coarse attrition risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    /// Scoring failed for the batch
    Error,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Low,
        RiskCategory::Medium,
        RiskCategory::High,
        RiskCategory::Error,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Medium => "Medium Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::Error => "Error",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Category for a probability; `None` outside [0, 1] or for NaN
    pub fn from_probability(probability: f64) -> Option<Self> {
        risk_classifier()
            .classify(probability)
            .and_then(Self::from_label)
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Risk intervals: Low `[0, 0.3)`, Medium `[0.3, 0.6]`, High `(0.6, 1]`
pub fn risk_classifier() -> &'static BinClassifier {
    static RISK_BANDS: OnceLock<BinClassifier> = OnceLock::new();
    RISK_BANDS.get_or_init(|| {
        BinClassifier::from_bands(vec![
            Band::new(
                RiskCategory::Low.label(),
                Bound::Included(0.0),
                Bound::Excluded(MEDIUM_RISK_FROM),
            ),
            Band::new(
                RiskCategory::Medium.label(),
                Bound::Included(MEDIUM_RISK_FROM),
                Bound::Included(HIGH_RISK_ABOVE),
            ),
            Band::new(
                RiskCategory::High.label(),
                Bound::Excluded(HIGH_RISK_ABOVE),
                Bound::Included(1.0),
            ),
        ])
    })
}

/// Risk result for one employee
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub employee_id: String,
    pub attrition_probability: f64,
    pub risk_category: RiskCategory,
}

/// Outcome of scoring a record set
#[derive(Debug, Clone)]
pub struct RiskScoring {
    /// Input records, plus `AttritionProbability` and `RiskCategory` when a model was applied
    pub frame: DataFrame,
    /// Message describing why the batch was degraded, if it was
    pub failure: Option<String>,
}

impl RiskScoring {
    /// Whether risk columns were attached
    pub fn is_scored(&self) -> bool {
        self.frame.column(RISK_CATEGORY).is_ok()
    }
}

/// Score every record with `model`, preserving input order.
///
/// * `model == None` - returns a copy of `df` without risk columns
/// * model failure, wrong output length or a probability outside [0, 1] -
///   every row gets probability 0 and category `Error`, and `failure` carries
///   a single message
pub fn predict_attrition_risk(
    df: &DataFrame,
    model: Option<&dyn AttritionModel>,
) -> Result<RiskScoring> {
    let Some(model) = model else {
        return Ok(RiskScoring {
            frame: df.clone(),
            failure: None,
        });
    };

    let outcome = model
        .predict_proba(df)
        .map_err(|e| e.to_string())
        .and_then(|probabilities| categorize(&probabilities, df.height()).map(|c| (probabilities, c)));

    let (probabilities, categories, failure) = match outcome {
        Ok((probabilities, categories)) => (probabilities, categories, None),
        Err(reason) => (
            vec![0.0; df.height()],
            vec![RiskCategory::Error; df.height()],
            Some(format!("Error predicting attrition risk: {}", reason)),
        ),
    };

    let labels: Vec<&str> = categories.iter().map(RiskCategory::label).collect();

    let mut frame = df.clone();
    frame.with_column(Column::new(ATTRITION_PROBABILITY.into(), probabilities))?;
    frame.with_column(Column::new(RISK_CATEGORY.into(), labels))?;

    Ok(RiskScoring { frame, failure })
}

/// Map every probability to a category, rejecting the batch on any invalid value
fn categorize(probabilities: &[f64], expected: usize) -> Result<Vec<RiskCategory>, String> {
    if probabilities.len() != expected {
        return Err(format!(
            "model returned {} probabilities for {} records",
            probabilities.len(),
            expected
        ));
    }

    probabilities
        .iter()
        .map(|&p| {
            RiskCategory::from_probability(p)
                .ok_or_else(|| format!("model returned an invalid probability: {}", p))
        })
        .collect()
}

/// Typed view of a scored frame, one assessment per row in row order
pub fn risk_assessments(scored: &DataFrame) -> Result<Vec<RiskAssessment>> {
    let ids = scored
        .column(EMPLOYEE_ID)
        .with_context(|| format!("Column '{}' not found in scored records", EMPLOYEE_ID))?
        .cast(&DataType::String)?;
    let probabilities = scored
        .column(ATTRITION_PROBABILITY)
        .context("Records have not been scored")?
        .cast(&DataType::Float64)?;
    let categories = scored
        .column(RISK_CATEGORY)
        .context("Records have not been scored")?
        .cast(&DataType::String)?;

    let assessments = ids
        .str()?
        .into_iter()
        .zip(probabilities.f64()?.into_iter())
        .zip(categories.str()?.into_iter())
        .map(|((id, probability), category)| RiskAssessment {
            employee_id: id.unwrap_or_default().to_string(),
            attrition_probability: probability.unwrap_or(0.0),
            risk_category: category
                .and_then(RiskCategory::from_label)
                .unwrap_or(RiskCategory::Error),
        })
        .collect();

    Ok(assessments)
}

/// Employees per risk category in Low, Medium, High, Error order; empty categories omitted
pub fn risk_distribution(scored: &DataFrame) -> Result<Vec<(RiskCategory, usize)>> {
    let categories = scored
        .column(RISK_CATEGORY)
        .context("Records have not been scored")?
        .cast(&DataType::String)?;

    let mut counts = [0usize; RiskCategory::ALL.len()];
    for label in categories.str()?.into_iter().flatten() {
        if let Some(pos) = RiskCategory::ALL.iter().position(|c| c.label() == label) {
            counts[pos] += 1;
        }
    }

    Ok(RiskCategory::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .collect())
}

/// One equal-width bin of the probability histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of attrition probabilities over [0, 1] with `bins` equal-width bins.
///
/// Bins are left-closed except the last, which also includes 1.0.
pub fn probability_histogram(scored: &DataFrame, bins: usize) -> Result<Vec<HistogramBin>> {
    let bins = bins.max(1);
    let probabilities = scored
        .column(ATTRITION_PROBABILITY)
        .context("Records have not been scored")?
        .cast(&DataType::Float64)?;

    let width = 1.0 / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: i as f64 * width,
            upper: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for p in probabilities.f64()?.into_iter().flatten() {
        if !(0.0..=1.0).contains(&p) {
            continue;
        }
        let idx = ((p / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }

    Ok(histogram)
}

/// Rows labelled High risk, projected onto the display columns present in the frame
pub fn high_risk_employees(scored: &DataFrame) -> Result<DataFrame> {
    if scored.column(RISK_CATEGORY).is_err() {
        anyhow::bail!("Records have not been scored");
    }

    let present: Vec<&str> = HIGH_RISK_DISPLAY_COLUMNS
        .iter()
        .copied()
        .filter(|name| scored.column(name).is_ok())
        .collect();

    let high = scored
        .clone()
        .lazy()
        .filter(col(RISK_CATEGORY).eq(lit(RiskCategory::High.label())))
        .collect()
        .context("Failed to select high-risk employees")?;

    high.select(present)
        .context("Failed to project high-risk employee columns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::model::ModelError;

    /// Returns fixed probabilities regardless of input
    struct FixedModel(Vec<f64>);

    impl AttritionModel for FixedModel {
        fn predict_proba(&self, _df: &DataFrame) -> Result<Vec<f64>, ModelError> {
            Ok(self.0.clone())
        }
    }

    struct FailingModel;

    impl AttritionModel for FailingModel {
        fn predict_proba(&self, _df: &DataFrame) -> Result<Vec<f64>, ModelError> {
            Err(ModelError::MissingFeature("DistanceFromHome".to_string()))
        }
    }

    fn records() -> DataFrame {
        df! {
            "EmployeeId" => [1i64, 2, 3],
            "Department" => ["Sales", "R&D", "Sales"],
            "JobRole" => ["Rep", "Lab", "Manager"],
            "Age" => [25i64, 31, 45],
            "MonthlyIncome" => [2100.0f64, 4200.0, 15000.0],
        }
        .unwrap()
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(RiskCategory::from_probability(0.0), Some(RiskCategory::Low));
        assert_eq!(RiskCategory::from_probability(0.2999), Some(RiskCategory::Low));
        assert_eq!(RiskCategory::from_probability(0.3), Some(RiskCategory::Medium));
        assert_eq!(RiskCategory::from_probability(0.6), Some(RiskCategory::Medium));
        assert_eq!(RiskCategory::from_probability(0.6000001), Some(RiskCategory::High));
        assert_eq!(RiskCategory::from_probability(1.0), Some(RiskCategory::High));
        assert_eq!(RiskCategory::from_probability(1.5), None);
        assert_eq!(RiskCategory::from_probability(-0.1), None);
        assert_eq!(RiskCategory::from_probability(f64::NAN), None);
    }

    #[test]
    fn test_label_roundtrip() {
        for category in RiskCategory::ALL {
            assert_eq!(RiskCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(RiskCategory::from_label("Unknown"), None);
    }

    #[test]
    fn test_no_model_passes_records_through() {
        let df = records();
        let scoring = predict_attrition_risk(&df, None).unwrap();

        assert!(!scoring.is_scored());
        assert!(scoring.failure.is_none());
        assert!(scoring.frame.equals(&df));
    }

    #[test]
    fn test_scoring_appends_columns_in_order() {
        let df = records();
        let model = FixedModel(vec![0.1, 0.45, 0.9]);
        let scoring = predict_attrition_risk(&df, Some(&model)).unwrap();

        assert!(scoring.is_scored());
        assert!(scoring.failure.is_none());
        assert_eq!(df.width(), 5, "source frame must not gain columns");

        let assessments = risk_assessments(&scoring.frame).unwrap();
        let categories: Vec<RiskCategory> =
            assessments.iter().map(|a| a.risk_category).collect();
        assert_eq!(
            categories,
            vec![RiskCategory::Low, RiskCategory::Medium, RiskCategory::High]
        );
        assert_eq!(assessments[2].employee_id, "3");
        assert_eq!(assessments[1].attrition_probability, 0.45);
    }

    #[test]
    fn test_model_failure_degrades_batch() {
        let scoring = predict_attrition_risk(&records(), Some(&FailingModel)).unwrap();

        let message = scoring.failure.expect("failure should be reported");
        assert!(message.contains("DistanceFromHome"));

        let assessments = risk_assessments(&scoring.frame).unwrap();
        assert!(assessments
            .iter()
            .all(|a| a.attrition_probability == 0.0 && a.risk_category == RiskCategory::Error));
    }

    #[test]
    fn test_wrong_length_output_degrades_batch() {
        let model = FixedModel(vec![0.5]);
        let scoring = predict_attrition_risk(&records(), Some(&model)).unwrap();
        assert!(scoring.failure.unwrap().contains("1 probabilities for 3 records"));
    }

    #[test]
    fn test_out_of_range_probability_degrades_batch() {
        let model = FixedModel(vec![0.5, 1.2, 0.1]);
        let scoring = predict_attrition_risk(&records(), Some(&model)).unwrap();
        assert!(scoring.failure.is_some());
        assert_eq!(
            risk_distribution(&scoring.frame).unwrap(),
            vec![(RiskCategory::Error, 3)]
        );
    }

    #[test]
    fn test_risk_distribution_order() {
        let model = FixedModel(vec![0.95, 0.1, 0.7]);
        let scoring = predict_attrition_risk(&records(), Some(&model)).unwrap();
        assert_eq!(
            risk_distribution(&scoring.frame).unwrap(),
            vec![(RiskCategory::Low, 1), (RiskCategory::High, 2)]
        );
    }

    #[test]
    fn test_histogram_counts() {
        let model = FixedModel(vec![0.0, 0.5, 1.0]);
        let scoring = predict_attrition_risk(&records(), Some(&model)).unwrap();
        let histogram = probability_histogram(&scoring.frame, HISTOGRAM_BINS).unwrap();

        assert_eq!(histogram.len(), 20);
        assert_eq!(histogram[0].count, 1);
        assert_eq!(histogram[10].count, 1);
        assert_eq!(histogram[19].count, 1);
        assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_high_risk_projection() {
        let model = FixedModel(vec![0.95, 0.1, 0.7]);
        let scoring = predict_attrition_risk(&records(), Some(&model)).unwrap();
        let high = high_risk_employees(&scoring.frame).unwrap();

        assert_eq!(high.height(), 2);
        let names: Vec<String> = high
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["EmployeeId", "Department", "JobRole", "Age", "MonthlyIncome"]
        );
    }

    #[test]
    fn test_high_risk_requires_scoring() {
        assert!(high_risk_employees(&records()).is_err());
    }

    #[test]
    fn test_empty_records_with_model() {
        let df = records().head(Some(0));
        let model = FixedModel(Vec::new());
        let scoring = predict_attrition_risk(&df, Some(&model)).unwrap();

        assert!(scoring.failure.is_none());
        assert_eq!(scoring.frame.height(), 0);
        assert!(risk_distribution(&scoring.frame).unwrap().is_empty());
    }
}
