//! Age and income bracket derivation
//!
//! Each function returns a new frame with one categorical (string) column
//! appended; the input frame is never modified.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::bins::{BinClassifier, Closed};
use super::columns::{AGE, AGE_GROUP, INCOME_GROUP, MONTHLY_INCOME};

/// Age bracket edges, left-closed: `[18, 25)`, `[25, 35)`, ...
pub const AGE_BOUNDARIES: [f64; 6] = [18.0, 25.0, 35.0, 45.0, 55.0, 65.0];
pub const AGE_LABELS: [&str; 5] = ["18-24", "25-34", "35-44", "45-54", "55-64"];

/// Monthly income bracket edges, left-closed
pub const INCOME_BOUNDARIES: [f64; 5] = [0.0, 2000.0, 5000.0, 10000.0, 20000.0];
pub const INCOME_LABELS: [&str; 4] = ["0-2K", "2K-5K", "5K-10K", "10K-20K"];

pub fn age_classifier() -> Result<BinClassifier> {
    BinClassifier::from_edges(&AGE_BOUNDARIES, &AGE_LABELS, Closed::Left)
}

pub fn income_classifier() -> Result<BinClassifier> {
    BinClassifier::from_edges(&INCOME_BOUNDARIES, &INCOME_LABELS, Closed::Left)
}

/// Append a band column derived from a numeric column.
///
/// Values outside the classifier's range (and nulls) become null. If
/// `band_column` already exists it is replaced, so re-running is idempotent.
///
/// # Arguments
/// * `df` - Source frame (left untouched)
/// * `source_column` - Numeric column to band
/// * `band_column` - Name of the appended column
/// * `classifier` - Interval table to apply
pub fn add_band_column(
    df: &DataFrame,
    source_column: &str,
    band_column: &str,
    classifier: &BinClassifier,
) -> Result<DataFrame> {
    let source = df
        .column(source_column)
        .with_context(|| format!("Column '{}' not found in record set", source_column))?;

    let numeric = source.cast(&DataType::Float64).with_context(|| {
        format!(
            "Column '{}' must be numeric to derive '{}'",
            source_column, band_column
        )
    })?;

    let bands: Vec<Option<&str>> = numeric
        .f64()?
        .into_iter()
        .map(|value| classifier.classify_opt(value))
        .collect();

    let mut banded = df.clone();
    banded.with_column(Column::new(band_column.into(), bands))?;
    Ok(banded)
}

/// Append `AgeGroup` derived from `Age`
pub fn create_age_groups(df: &DataFrame) -> Result<DataFrame> {
    add_band_column(df, AGE, AGE_GROUP, &age_classifier()?)
}

/// Append `IncomeGroup` derived from `MonthlyIncome`
pub fn create_income_groups(df: &DataFrame) -> Result<DataFrame> {
    add_band_column(df, MONTHLY_INCOME, INCOME_GROUP, &income_classifier()?)
}

/// Append every band column that can be derived.
///
/// A band whose source column is missing or non-numeric is skipped and its
/// error returned alongside the frame.
pub fn derive_available_bands(df: &DataFrame) -> (DataFrame, Vec<anyhow::Error>) {
    let mut errors = Vec::new();
    let mut banded = df.clone();
    for derive in [create_age_groups, create_income_groups] {
        match derive(&banded) {
            Ok(next) => banded = next,
            Err(e) => errors.push(e),
        }
    }
    (banded, errors)
}

/// Append both derived band columns, failing on the first band that cannot be derived
pub fn add_derived_bands(df: &DataFrame) -> Result<DataFrame> {
    let (banded, errors) = derive_available_bands(df);
    match errors.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(banded),
    }
}
