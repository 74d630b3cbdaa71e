//! Attrition rate summaries grouped by a categorical column

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use polars::prelude::*;
use serde::Serialize;

use super::columns::ATTRITION;

/// Display label for records whose grouping value is null (e.g. out-of-range bands)
pub const MISSING_CATEGORY_LABEL: &str = "(missing)";

/// Attrition statistics for one value of a grouping column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttritionSummary {
    /// Grouping value; `None` collects rows where the value is null
    pub category: Option<String>,
    /// Mean attrition as a percentage in [0, 100]
    pub attrition_rate: f64,
    /// Number of records in the partition
    pub count: usize,
}

impl AttritionSummary {
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or(MISSING_CATEGORY_LABEL)
    }
}

/// Running totals for one partition
struct Partition {
    category: Option<String>,
    attrited: f64,
    observed: usize,
    count: usize,
}

/// Summarize attrition by distinct value of `grouping_column`.
///
/// Partitions appear in descending order of attrition rate; ties keep the
/// order in which their grouping value was first seen. Null grouping values
/// form their own partition so counts always add up to the row count. The
/// rate is computed over non-null `Attrition` values (0% if there are none).
///
/// # Errors
/// Fails when `grouping_column` or `Attrition` is absent from `df`.
pub fn summarize_attrition(df: &DataFrame, grouping_column: &str) -> Result<Vec<AttritionSummary>> {
    let grouping = df
        .column(grouping_column)
        .map_err(|_| anyhow!("Grouping column '{}' not found in record set", grouping_column))?;
    let attrition = df.column(ATTRITION).map_err(|_| {
        anyhow!(
            "Column '{}' not found - attrition rates need historical outcomes",
            ATTRITION
        )
    })?;

    let keys = grouping.cast(&DataType::String)?;
    let outcomes = attrition.cast(&DataType::Float64)?;

    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut partitions: Vec<Partition> = Vec::new();

    for (key, outcome) in keys.str()?.into_iter().zip(outcomes.f64()?.into_iter()) {
        let key = key.map(str::to_string);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                partitions.push(Partition {
                    category: key.clone(),
                    attrited: 0.0,
                    observed: 0,
                    count: 0,
                });
                index.insert(key, partitions.len() - 1);
                partitions.len() - 1
            }
        };

        let partition = &mut partitions[slot];
        partition.count += 1;
        if let Some(value) = outcome {
            partition.attrited += value;
            partition.observed += 1;
        }
    }

    let mut summaries: Vec<AttritionSummary> = partitions
        .into_iter()
        .map(|p| AttritionSummary {
            attrition_rate: if p.observed > 0 {
                p.attrited / p.observed as f64 * 100.0
            } else {
                0.0
            },
            category: p.category,
            count: p.count,
        })
        .collect();

    // sort_by is stable, so equal rates keep first-seen order
    summaries.sort_by(|a, b| {
        b.attrition_rate
            .partial_cmp(&a.attrition_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(summaries)
}
