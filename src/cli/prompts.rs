//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};
use polars::prelude::DataFrame;

use crate::pipeline::columns::{DEPARTMENT, JOB_ROLE};
use crate::pipeline::{filter_options, FilterSelection};
use crate::utils::print_warning;

/// Prompt for one filter value, starting at `current` when it is a valid option
pub fn select_filter(prompt: &str, options: &[String], current: &str) -> Result<String> {
    let default = options.iter().position(|o| o == current).unwrap_or(0);
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[choice].clone())
}

/// Ask for department and job role; columns absent from the data keep their current value
pub fn prompt_filters(df: &DataFrame, current: &FilterSelection) -> Result<FilterSelection> {
    let department = match filter_options(df, DEPARTMENT) {
        Ok(options) => select_filter("Department", &options, &current.department)?,
        Err(e) => {
            print_warning(&e.to_string());
            current.department.clone()
        }
    };

    let job_role = match filter_options(df, JOB_ROLE) {
        Ok(options) => select_filter("Job Role", &options, &current.job_role)?,
        Err(e) => {
            print_warning(&e.to_string());
            current.job_role.clone()
        }
    };

    Ok(FilterSelection::new(department, job_role))
}
