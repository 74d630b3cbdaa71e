//! AttriLens: Employee Attrition CLI Tool
//!
//! Loads the employee records and the attrition model, then renders the
//! attrition dashboard as a terminal report or an interactive TUI.

use anyhow::Result;
use clap::Parser;

use attrilens::cli::{prompt_filters, run_dashboard, Cli, Commands};
use attrilens::pipeline::{cached_model, cached_records, derive_available_bands, AttritionModel};
use attrilens::report::{
    display_view, write_bundle, write_high_risk_csv, AttritionReport, DashboardView,
};
use attrilens::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_error, print_info, print_step_header, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.data, &cli.model, &cli.filter_selection());

    // Step 1: Load records
    print_step_header(1, "Load Employee Records");
    let records = cached_records(&cli.data, cli.infer_schema_length);
    if records.is_empty() {
        print_error("No data available. Please check the data source.");
        return Ok(());
    }
    let (banded, band_errors) = derive_available_bands(&records.df);
    for e in &band_errors {
        print_warning(&format!("{:#}", e));
    }
    if band_errors.is_empty() {
        print_success("Derived age and income groups");
    }

    // Step 2: Load model
    print_step_header(2, "Load Prediction Model");
    let loaded_model = cached_model(&cli.model);
    let model: Option<&dyn AttritionModel> = loaded_model.map(|m| &m.model as &dyn AttritionModel);
    if model.is_none() {
        print_warning("Prediction features are disabled");
    }

    if let Some(Commands::Dashboard) = &cli.command {
        return run_dashboard(&banded, model, &cli.filter_selection());
    }

    // Step 3: Filters
    print_step_header(3, "Select Filters");
    let filters = if cli.no_confirm {
        cli.filter_selection()
    } else {
        prompt_filters(&banded, &cli.filter_selection())?
    };
    print_info(&format!(
        "Department: {}  |  Job role: {}",
        filters.department, filters.job_role
    ));

    // Step 4: Analysis
    print_step_header(4, "Analyze Attrition");
    let spinner = create_spinner("Computing summaries and risk predictions...");
    let view = match DashboardView::build(&banded, model, &filters) {
        Ok(view) => view,
        Err(e) => {
            spinner.finish_and_clear();
            print_error(&format!("{:#}", e));
            return Ok(());
        }
    };
    finish_with_success(&spinner, "Analysis complete");

    display_view(&view);

    // Step 5: Exports
    if cli.wants_export() {
        print_step_header(5, "Export Report");
        let report = AttritionReport::from_view(
            &view,
            records.source.as_deref(),
            loaded_model.map(|m| m.source.as_path()),
        )?;

        if let Some(path) = &cli.export {
            report.write_json(path)?;
            print_success(&format!("Report saved to {}", path.display()));
        }
        if let Some(path) = &cli.export_csv {
            write_high_risk_csv(&view, path)?;
            print_success(&format!("High-risk employees saved to {}", path.display()));
        }
        if let Some(path) = &cli.bundle {
            write_bundle(&report, &view, path)?;
            print_success(&format!("Bundle saved to {}", path.display()));
        }
    }

    print_completion();

    Ok(())
}
