//! Export a dashboard view as JSON, CSV and a zip bundle

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;

use super::recommendations::{Recommendation, RECOMMENDATIONS};
use super::view::{DashboardView, PredictionView, TableData};
use crate::pipeline::{AttritionSummary, FilterSelection, HistogramBin, OverviewMetrics, RiskCategory};

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub attrilens_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_file: Option<String>,
    pub filters: FilterSelection,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorEntry {
    pub column: String,
    pub title: String,
    pub summaries: Vec<AttritionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskCount {
    pub category: RiskCategory,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionSection {
    Disabled,
    NoEmployees,
    Scored {
        model_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        accuracy: Option<f64>,
        distribution: Vec<RiskCount>,
        histogram: Vec<HistogramBin>,
        high_risk_employees: Vec<serde_json::Map<String, serde_json::Value>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        failure: Option<String>,
    },
}

/// Serializable form of a dashboard view
#[derive(Debug, Clone, Serialize)]
pub struct AttritionReport {
    pub metadata: ReportMetadata,
    pub overview: OverviewMetrics,
    pub factors: Vec<FactorEntry>,
    pub predictions: PredictionSection,
    pub recommendations: Vec<Recommendation>,
}

impl AttritionReport {
    pub fn from_view(
        view: &DashboardView,
        data_file: Option<&Path>,
        model_file: Option<&Path>,
    ) -> Result<Self> {
        let factors = view
            .factors
            .iter()
            .map(|f| FactorEntry {
                column: f.column.to_string(),
                title: f.title.to_string(),
                summaries: f.summaries.clone(),
                error: f.error.clone(),
            })
            .collect();

        let predictions = match &view.predictions {
            PredictionView::Disabled => PredictionSection::Disabled,
            PredictionView::NoEmployees => PredictionSection::NoEmployees,
            PredictionView::Scored(scored) => PredictionSection::Scored {
                model_name: scored.model_name.clone(),
                accuracy: scored.accuracy,
                distribution: scored
                    .distribution
                    .iter()
                    .map(|(category, count)| RiskCount {
                        category: *category,
                        label: category.label().to_string(),
                        count: *count,
                    })
                    .collect(),
                histogram: scored.histogram.clone(),
                high_risk_employees: frame_records(&scored.high_risk)?,
                failure: scored.failure.clone(),
            },
        };

        Ok(Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                attrilens_version: env!("CARGO_PKG_VERSION").to_string(),
                data_file: data_file.map(|p| p.display().to_string()),
                model_file: model_file.map(|p| p.display().to_string()),
                filters: view.filters.clone(),
            },
            overview: view.overview,
            factors,
            predictions,
            recommendations: RECOMMENDATIONS.to_vec(),
        })
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}

/// Rows of a frame as JSON objects keyed by column name, values as text
fn frame_records(df: &DataFrame) -> Result<Vec<serde_json::Map<String, serde_json::Value>>> {
    let table = TableData::from_frame(df)?;
    Ok(table
        .rows
        .into_iter()
        .map(|row| {
            table
                .headers
                .iter()
                .cloned()
                .zip(row.into_iter().map(serde_json::Value::String))
                .collect()
        })
        .collect())
}

/// Zip entry names used by the bundle
pub const BUNDLE_REPORT_ENTRY: &str = "attrition_report.json";
pub const BUNDLE_CSV_ENTRY: &str = "high_risk_employees.csv";

fn high_risk_frame(view: &DashboardView) -> DataFrame {
    match &view.predictions {
        PredictionView::Scored(scored) => scored.high_risk.clone(),
        _ => DataFrame::empty(),
    }
}

/// High-risk employees of a scored view as CSV bytes
pub fn high_risk_csv_bytes(view: &DashboardView) -> Result<Vec<u8>> {
    let mut df = high_risk_frame(view);
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(&mut df)
        .context("Failed to encode high-risk employees as CSV")?;
    Ok(buffer)
}

/// Write the high-risk employees of a scored view as CSV.
///
/// Views without predictions produce a header-only file.
pub fn write_high_risk_csv(view: &DashboardView, path: &Path) -> Result<()> {
    let mut df = high_risk_frame(view);

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

/// Package named in-memory entries into a zip archive
pub fn package_report_entries(entries: &[(&str, Vec<u8>)], zip_path: &Path) -> Result<()> {
    use ::zip::write::SimpleFileOptions;
    use ::zip::{CompressionMethod, ZipWriter};

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (name, content) in entries {
        zip.start_file(*name, options)
            .with_context(|| format!("Failed to add {} to zip", name))?;
        zip.write_all(content)
            .with_context(|| format!("Failed to write {} into zip", name))?;
    }

    zip.finish().context("Failed to finalize zip file")?;
    Ok(())
}

/// Bundle the JSON report and the high-risk CSV into `zip_path`.
///
/// Entries are encoded in memory; nothing besides the archive is written.
pub fn write_bundle(
    report: &AttritionReport,
    view: &DashboardView,
    zip_path: &Path,
) -> Result<()> {
    let json = serde_json::to_vec_pretty(report).context("Failed to serialize report")?;
    let csv = high_risk_csv_bytes(view)?;
    package_report_entries(&[(BUNDLE_REPORT_ENTRY, json), (BUNDLE_CSV_ENTRY, csv)], zip_path)
}
