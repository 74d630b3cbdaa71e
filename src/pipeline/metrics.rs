//! Overview metrics for a (filtered) record set

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::columns::{ATTRITION, OVERTIME};

/// Attrition rate (%) above which the overview flags a delta
pub const ATTRITION_BENCHMARK: f64 = 10.0;

/// Value of `OverTime` that counts as working overtime
pub const OVERTIME_YES: &str = "Yes";

/// Headline numbers shown above the tabs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_employees: usize,
    /// Percentage of employees with `Attrition == 1`; 0 when there is no data
    pub attrition_rate: f64,
    /// Percentage of employees working overtime; 0 when there is no data
    pub overtime_pct: f64,
}

impl OverviewMetrics {
    pub fn is_empty(&self) -> bool {
        self.total_employees == 0
    }

    /// Difference from [`ATTRITION_BENCHMARK`], only when the rate exceeds it
    pub fn attrition_delta(&self) -> Option<f64> {
        (self.attrition_rate > ATTRITION_BENCHMARK).then(|| self.attrition_rate - ATTRITION_BENCHMARK)
    }
}

/// Compute total employees, attrition rate and overtime share.
///
/// Zero-row input yields zeros instead of dividing by zero. A missing
/// `Attrition` or `OverTime` column also yields 0 for that metric.
pub fn compute_overview(df: &DataFrame) -> Result<OverviewMetrics> {
    let total_employees = df.height();
    if total_employees == 0 {
        return Ok(OverviewMetrics {
            total_employees: 0,
            attrition_rate: 0.0,
            overtime_pct: 0.0,
        });
    }

    Ok(OverviewMetrics {
        total_employees,
        attrition_rate: overall_attrition_rate(df)?,
        overtime_pct: overtime_percentage(df)?,
    })
}

/// Mean of non-null `Attrition` values as a percentage
pub fn overall_attrition_rate(df: &DataFrame) -> Result<f64> {
    let Ok(column) = df.column(ATTRITION) else {
        return Ok(0.0);
    };

    let values = column.cast(&DataType::Float64)?;
    let (sum, observed) = values
        .f64()?
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    Ok(if observed > 0 {
        sum / observed as f64 * 100.0
    } else {
        0.0
    })
}

/// Share of all rows with `OverTime == "Yes"` as a percentage
pub fn overtime_percentage(df: &DataFrame) -> Result<f64> {
    let total = df.height();
    let Ok(column) = df.column(OVERTIME) else {
        return Ok(0.0);
    };
    if total == 0 {
        return Ok(0.0);
    }

    let values = column.cast(&DataType::String)?;
    let overtime = values
        .str()?
        .into_iter()
        .filter(|v| *v == Some(OVERTIME_YES))
        .count();

    Ok(overtime as f64 / total as f64 * 100.0)
}
