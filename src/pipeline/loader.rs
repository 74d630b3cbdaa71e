//! Dataset and model loaders with ordered fallback locations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use thiserror::Error;

use super::cache::ResourceCache;
use super::model::GradientBoostedModel;
use crate::utils::{create_spinner, finish_with_success, print_error};

/// Dataset locations, tried in order
pub const DEFAULT_DATA_PATHS: [&str; 2] = [
    "./data/employee_data_clean.csv",
    "data/employee_data_clean.csv",
];

/// Model artifact locations, tried in order
pub const DEFAULT_MODEL_PATHS: [&str; 2] = [
    "./models/gb_attrition_prediction_model.json",
    "models/gb_attrition_prediction_model.json",
];

/// Failure to obtain a resource from any of its candidate locations
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("no file found at any of: {}", join_paths(.attempted))]
    NotFound { attempted: Vec<PathBuf> },

    #[error("failed to load {}: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(no candidate paths)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Try each candidate in order and load the first one that exists.
///
/// A missing file falls through to the next candidate. A file that exists but
/// fails to load stops the search so a corrupt primary is never masked by a
/// fallback copy.
pub fn locate_and_load<T, F>(candidates: &[PathBuf], mut load: F) -> Result<(PathBuf, T), ResourceError>
where
    F: FnMut(&Path) -> Result<T>,
{
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        return match load(path) {
            Ok(value) => Ok((path.clone(), value)),
            Err(e) => Err(ResourceError::Unreadable {
                path: path.clone(),
                message: format!("{:#}", e),
            }),
        };
    }

    Err(ResourceError::NotFound {
        attempted: candidates.to_vec(),
    })
}

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` applies to CSV only; 0 scans the whole file.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_rows = (infer_schema_length > 0).then_some(infer_schema_length);

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_rows)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read records from {}", path.display()))
}

/// The employee record set and where it came from
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub df: DataFrame,
    /// `None` when no candidate could be loaded
    pub source: Option<PathBuf>,
}

impl LoadedRecords {
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

/// Load the record set from the first usable candidate.
///
/// Never fails: problems are reported on stderr and an empty record set is
/// returned instead.
pub fn load_records(candidates: &[PathBuf], infer_schema_length: usize) -> LoadedRecords {
    let spinner = create_spinner("Loading employee records...");

    match locate_and_load(candidates, |path| load_dataset(path, infer_schema_length)) {
        Ok((path, df)) => {
            finish_with_success(
                &spinner,
                &format!("Loaded {} records from {}", df.height(), path.display()),
            );
            LoadedRecords {
                df,
                source: Some(path),
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            print_error(&format!("Error loading data: {}", e));
            LoadedRecords {
                df: DataFrame::empty(),
                source: None,
            }
        }
    }
}

/// A validated model and where it came from
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: GradientBoostedModel,
    pub source: PathBuf,
}

/// Load the model from the first usable candidate; `None` disables predictions.
pub fn load_model(candidates: &[PathBuf]) -> Option<LoadedModel> {
    let spinner = create_spinner("Loading prediction model...");

    match locate_and_load(candidates, GradientBoostedModel::from_path) {
        Ok((source, model)) => {
            finish_with_success(
                &spinner,
                &format!("Loaded model '{}' from {}", model.name, source.display()),
            );
            Some(LoadedModel { model, source })
        }
        Err(e) => {
            spinner.finish_and_clear();
            print_error(&format!("Error loading model: {}", e));
            None
        }
    }
}

static RECORDS: ResourceCache<LoadedRecords> = ResourceCache::new();
static MODEL: ResourceCache<Option<LoadedModel>> = ResourceCache::new();

/// Process-wide record set; later calls return the first result regardless of arguments
pub fn cached_records(candidates: &[PathBuf], infer_schema_length: usize) -> &'static LoadedRecords {
    RECORDS.get_or_load(|| load_records(candidates, infer_schema_length))
}

/// Process-wide model; a failed load is remembered as `None`
pub fn cached_model(candidates: &[PathBuf]) -> Option<&'static LoadedModel> {
    MODEL.get_or_load(|| load_model(candidates)).as_ref()
}
