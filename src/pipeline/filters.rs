//! Equality filters over the record set

use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::columns::{DEPARTMENT, JOB_ROLE};

/// Filter value meaning "no constraint on this column"
pub const ALL_FILTER: &str = "All";

/// A single `column == value` constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterConstraint {
    pub column: String,
    pub value: String,
}

impl FilterConstraint {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.value == ALL_FILTER
    }
}

/// The dashboard's two filters: department and job role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub department: String,
    pub job_role: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            department: ALL_FILTER.to_string(),
            job_role: ALL_FILTER.to_string(),
        }
    }
}

impl FilterSelection {
    pub fn new(department: impl Into<String>, job_role: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            job_role: job_role.into(),
        }
    }

    pub fn constraints(&self) -> Vec<FilterConstraint> {
        vec![
            FilterConstraint::new(DEPARTMENT, self.department.clone()),
            FilterConstraint::new(JOB_ROLE, self.job_role.clone()),
        ]
    }

    pub fn is_unfiltered(&self) -> bool {
        self.constraints().iter().all(FilterConstraint::is_unconstrained)
    }
}

/// Choices offered for a filter: `"All"` first, then distinct values sorted ascending.
///
/// Nulls are not offered as a choice.
pub fn filter_options(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let values = df
        .column(column)
        .with_context(|| format!("Filter column '{}' not found in record set", column))?
        .cast(&DataType::String)?;

    let distinct: BTreeSet<String> = values
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();

    Ok(std::iter::once(ALL_FILTER.to_string())
        .chain(distinct)
        .collect())
}

/// Keep only the rows matching every constraint (AND). `"All"` constraints are skipped.
///
/// Values are compared as strings, so numeric columns can be filtered with
/// their textual form.
pub fn apply_filters(df: &DataFrame, constraints: &[FilterConstraint]) -> Result<DataFrame> {
    let active: Vec<&FilterConstraint> = constraints
        .iter()
        .filter(|c| !c.is_unconstrained())
        .collect();

    if active.is_empty() {
        return Ok(df.clone());
    }

    let mut lf = df.clone().lazy();
    for constraint in active {
        if df.column(&constraint.column).is_err() {
            bail!(
                "Filter column '{}' not found in record set",
                constraint.column
            );
        }
        lf = lf.filter(
            col(constraint.column.as_str())
                .cast(DataType::String)
                .eq(lit(constraint.value.clone())),
        );
    }

    lf.collect().context("Failed to apply filters")
}
