//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{FilterSelection, ALL_FILTER, DEFAULT_DATA_PATHS, DEFAULT_MODEL_PATHS};

/// AttriLens - Employee attrition analysis and risk prediction
#[derive(Parser, Debug)]
#[command(name = "attrilens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Employee dataset (CSV or Parquet). Repeat to give fallback locations,
    /// tried in order.
    #[arg(long = "data", value_name = "PATH", global = true, action = ArgAction::Append,
          default_values = DEFAULT_DATA_PATHS, value_parser = parse_candidate_path)]
    pub data: Vec<PathBuf>,

    /// Model artifact (JSON). Repeat to give fallback locations, tried in order.
    #[arg(long = "model", value_name = "PATH", global = true, action = ArgAction::Append,
          default_values = DEFAULT_MODEL_PATHS, value_parser = parse_candidate_path)]
    pub model: Vec<PathBuf>,

    /// Department filter ("All" for every department)
    #[arg(short, long, default_value = ALL_FILTER)]
    pub department: String,

    /// Job role filter ("All" for every role)
    #[arg(short = 'r', long, default_value = ALL_FILTER)]
    pub job_role: String,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000", global = true)]
    pub infer_schema_length: usize,

    /// Write the report as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Write the high-risk employees as CSV to this path
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    /// Write a zip bundle with the JSON report and high-risk CSV
    #[arg(long, value_name = "PATH")]
    pub bundle: Option<PathBuf>,

    /// Skip interactive filter prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive terminal dashboard
    Dashboard,
}

impl Cli {
    /// Filters given on the command line
    pub fn filter_selection(&self) -> FilterSelection {
        FilterSelection::new(self.department.clone(), self.job_role.clone())
    }

    /// Whether any export was requested
    pub fn wants_export(&self) -> bool {
        self.export.is_some() || self.export_csv.is_some() || self.bundle.is_some()
    }
}

/// Validator for candidate resource paths
fn parse_candidate_path(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        Err("path must not be empty".to_string())
    } else {
        Ok(PathBuf::from(s))
    }
}
