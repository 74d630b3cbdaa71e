//! Everything one filtered view of the dashboard shows
//!
//! Built from the cached, bucketed record set for a filter selection. Only
//! filtering, aggregation and scoring run here; nothing is reloaded.

use anyhow::Result;
use polars::prelude::*;

use crate::pipeline::columns::{AGE_GROUP, INCOME_GROUP, JOB_ROLE, OVERTIME};
use crate::pipeline::{
    apply_filters, compute_overview, high_risk_employees, predict_attrition_risk,
    probability_histogram, risk_distribution, summarize_attrition, AttritionModel,
    AttritionSummary, FilterSelection, HistogramBin, OverviewMetrics, RiskCategory,
    HISTOGRAM_BINS,
};

/// Grouping columns of the "Attrition Factors" tab, with chart titles
pub const FACTOR_COLUMNS: [(&str, &str); 4] = [
    (JOB_ROLE, "Attrition Rate by Job Role"),
    (OVERTIME, "Attrition Rate by Overtime Status"),
    (INCOME_GROUP, "Attrition Rate by Income Group"),
    (AGE_GROUP, "Attrition Rate by Age Group"),
];

/// One attrition summary, or the reason it could not be computed
#[derive(Debug, Clone)]
pub struct FactorBreakdown {
    pub column: &'static str,
    pub title: &'static str,
    pub summaries: Vec<AttritionSummary>,
    pub error: Option<String>,
}

/// Contents of the "ML Predictions" tab
#[derive(Debug, Clone)]
pub enum PredictionView {
    /// No model could be loaded
    Disabled,
    /// The filters matched no employees
    NoEmployees,
    Scored(ScoredView),
}

#[derive(Debug, Clone)]
pub struct ScoredView {
    pub model_name: String,
    pub accuracy: Option<f64>,
    pub distribution: Vec<(RiskCategory, usize)>,
    pub histogram: Vec<HistogramBin>,
    pub high_risk: DataFrame,
    /// Set when scoring failed and the batch was degraded
    pub failure: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filters: FilterSelection,
    pub overview: OverviewMetrics,
    pub factors: Vec<FactorBreakdown>,
    pub predictions: PredictionView,
}

impl DashboardView {
    /// Filter `records` and compute every section of the dashboard
    pub fn build(
        records: &DataFrame,
        model: Option<&dyn AttritionModel>,
        filters: &FilterSelection,
    ) -> Result<Self> {
        let filtered = apply_filters(records, &filters.constraints())?;
        let overview = compute_overview(&filtered)?;

        let factors = FACTOR_COLUMNS
            .iter()
            .map(|&(column, title)| match summarize_attrition(&filtered, column) {
                Ok(summaries) => FactorBreakdown {
                    column,
                    title,
                    summaries,
                    error: None,
                },
                Err(e) => FactorBreakdown {
                    column,
                    title,
                    summaries: Vec::new(),
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let predictions = match model {
            None => PredictionView::Disabled,
            Some(_) if filtered.height() == 0 => PredictionView::NoEmployees,
            Some(model) => PredictionView::Scored(score_view(&filtered, model)?),
        };

        Ok(Self {
            filters: filters.clone(),
            overview,
            factors,
            predictions,
        })
    }
}

fn score_view(filtered: &DataFrame, model: &dyn AttritionModel) -> Result<ScoredView> {
    let scoring = predict_attrition_risk(filtered, Some(model))?;

    Ok(ScoredView {
        model_name: model.name().to_string(),
        accuracy: model.reported_accuracy(),
        distribution: risk_distribution(&scoring.frame)?,
        histogram: probability_histogram(&scoring.frame, HISTOGRAM_BINS)?,
        high_risk: high_risk_employees(&scoring.frame)?,
        failure: scoring.failure,
    })
}

/// A frame flattened to strings for table rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let columns: Vec<Column> = df
            .get_columns()
            .iter()
            .map(|c| c.cast(&DataType::String))
            .collect::<PolarsResult<_>>()?;

        let mut rows = vec![Vec::with_capacity(headers.len()); df.height()];
        for column in &columns {
            for (row, value) in column.str()?.into_iter().enumerate() {
                rows[row].push(value.unwrap_or("").to_string());
            }
        }

        Ok(Self { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{add_derived_bands, ModelError};

    struct ConstantModel(f64);

    impl AttritionModel for ConstantModel {
        fn predict_proba(&self, df: &DataFrame) -> Result<Vec<f64>, ModelError> {
            Ok(vec![self.0; df.height()])
        }

        fn name(&self) -> &str {
            "Constant"
        }
    }

    fn records() -> DataFrame {
        let df = df! {
            "EmployeeId" => [1i64, 2, 3, 4],
            "Age" => [23i64, 37, 41, 58],
            "MonthlyIncome" => [1500.0f64, 4500.0, 8000.0, 15000.0],
            "Department" => ["R&D", "R&D", "HR", "R&D"],
            "JobRole" => ["Lab", "Scientist", "Recruiter", "Lab"],
            "OverTime" => ["Yes", "No", "No", "Yes"],
            "Attrition" => [1i32, 0, 0, 1],
        }
        .unwrap();
        add_derived_bands(&df).unwrap()
    }

    #[test]
    fn test_view_without_model() {
        let view = DashboardView::build(&records(), None, &FilterSelection::default()).unwrap();

        assert_eq!(view.overview.total_employees, 4);
        assert_eq!(view.factors.len(), 4);
        assert!(view.factors.iter().all(|f| f.error.is_none()));
        assert!(matches!(view.predictions, PredictionView::Disabled));
    }

    #[test]
    fn test_filter_without_matches() {
        let model = ConstantModel(0.9);
        let view = DashboardView::build(
            &records(),
            Some(&model),
            &FilterSelection::new("Sales", "All"),
        )
        .unwrap();

        assert_eq!(view.overview.total_employees, 0);
        assert_eq!(view.overview.attrition_rate, 0.0);
        assert!(matches!(view.predictions, PredictionView::NoEmployees));
        assert!(view.factors.iter().all(|f| f.summaries.is_empty()));
    }

    #[test]
    fn test_scored_view() {
        let model = ConstantModel(0.9);
        let view = DashboardView::build(
            &records(),
            Some(&model),
            &FilterSelection::new("R&D", "All"),
        )
        .unwrap();

        let PredictionView::Scored(scored) = view.predictions else {
            panic!("expected scored predictions");
        };
        assert_eq!(scored.model_name, "Constant");
        assert_eq!(scored.distribution, vec![(RiskCategory::High, 3)]);
        assert_eq!(scored.high_risk.height(), 3);
        assert!(scored.failure.is_none());
    }

    #[test]
    fn test_missing_factor_column_is_reported_inline() {
        let df = records().drop(INCOME_GROUP).unwrap();
        let view = DashboardView::build(&df, None, &FilterSelection::default()).unwrap();

        let income = view
            .factors
            .iter()
            .find(|f| f.column == INCOME_GROUP)
            .unwrap();
        assert!(income.error.as_ref().unwrap().contains("IncomeGroup"));
    }

    #[test]
    fn test_table_data_from_frame() {
        let df = df! {
            "EmployeeId" => [7i64, 9],
            "OverTime" => [Some("Yes"), None],
        }
        .unwrap();

        let table = TableData::from_frame(&df).unwrap();
        assert_eq!(table.headers, vec!["EmployeeId", "OverTime"]);
        assert_eq!(table.rows, vec![vec!["7", "Yes"], vec!["9", ""]]);
    }
}
