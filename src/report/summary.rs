//! Terminal rendering of a dashboard view

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use super::recommendations::{RECOMMENDATIONS, RECOMMENDATIONS_INTRO};
use super::view::{DashboardView, FactorBreakdown, PredictionView, ScoredView, TableData};
use crate::pipeline::{OverviewMetrics, RiskCategory, ATTRITION_BENCHMARK};
use crate::utils::{print_error, print_info, print_success, print_warning};

const BAR_WIDTH: usize = 30;

/// Print every section of the view in dashboard order
pub fn display_view(view: &DashboardView) {
    print_overview(&view.overview);
    print_section("📊", "ATTRITION BY KEY FACTORS");
    for factor in &view.factors {
        print_factor(factor);
    }
    print_section("🤖", "MACHINE LEARNING PREDICTIONS");
    print_predictions(&view.predictions);
    print_recommendations();
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

fn print_table(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// Headline metrics table
pub fn print_overview(overview: &OverviewMetrics) {
    print_section("📋", "OVERVIEW");

    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("👥 Total Employees"),
        Cell::new(overview.total_employees).add_attribute(Attribute::Bold),
    ]);

    let rate = match overview.attrition_delta() {
        Some(delta) => Cell::new(format!(
            "{:.1}% (+{:.1}% vs {:.0}% benchmark)",
            overview.attrition_rate, delta, ATTRITION_BENCHMARK
        ))
        .fg(Color::Red),
        None => Cell::new(format!("{:.1}%", overview.attrition_rate)).fg(Color::Green),
    };
    table.add_row(vec![Cell::new("📉 Attrition Rate"), rate]);
    table.add_row(vec![
        Cell::new("⏱️  Overtime Percentage"),
        Cell::new(format!("{:.1}%", overview.overtime_pct)),
    ]);

    print_table(&table);
}

/// One attrition summary as a table with a text bar per category
pub fn print_factor(factor: &FactorBreakdown) {
    println!();
    println!("    {}", style(factor.title).cyan().bold());

    if let Some(error) = &factor.error {
        print_warning(error);
        return;
    }
    if factor.summaries.is_empty() {
        print_info("No data for the selected filters");
        return;
    }

    let mut table = new_table(&[factor.column, "Attrition Rate (%)", "Employees", ""]);
    for summary in &factor.summaries {
        table.add_row(vec![
            Cell::new(summary.label()),
            Cell::new(format!("{:.1}", summary.attrition_rate)).set_alignment(CellAlignment::Right),
            Cell::new(summary.count).set_alignment(CellAlignment::Right),
            Cell::new(rate_bar(summary.attrition_rate)).fg(Color::Blue),
        ]);
    }
    print_table(&table);
}

/// Bar proportional to a percentage in [0, 100]
pub fn rate_bar(rate: f64) -> String {
    let filled = ((rate.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

pub fn print_predictions(predictions: &PredictionView) {
    match predictions {
        PredictionView::Disabled => print_error(
            "Machine learning model could not be loaded. Please check the model file path.",
        ),
        PredictionView::NoEmployees => {
            print_info("No employees match the selected filters; nothing to score.")
        }
        PredictionView::Scored(scored) => print_scored(scored),
    }
}

/// Description of the model shown above the predictions
pub fn model_description(scored: &ScoredView) -> String {
    match scored.accuracy {
        Some(accuracy) => format!(
            "Risk is predicted by the '{}' model, trained on historical employee data with an accuracy of {:.2}%.",
            scored.model_name, accuracy
        ),
        None => format!(
            "Risk is predicted by the '{}' model, trained on historical employee data.",
            scored.model_name
        ),
    }
}

fn risk_color(category: RiskCategory) -> Color {
    match category {
        RiskCategory::Low => Color::Green,
        RiskCategory::Medium => Color::Yellow,
        RiskCategory::High => Color::Red,
        RiskCategory::Error => Color::DarkGrey,
    }
}

fn print_scored(scored: &ScoredView) {
    print_info(&model_description(scored));

    if let Some(failure) = &scored.failure {
        print_error(failure);
    }

    println!();
    println!("    {}", style("Employee Attrition Risk Distribution").cyan().bold());
    let total: usize = scored.distribution.iter().map(|(_, n)| n).sum();
    let mut table = new_table(&["Risk Category", "Employees", "Share"]);
    for (category, count) in &scored.distribution {
        let share = if total > 0 {
            *count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(category.label()).fg(risk_color(*category)),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }
    print_table(&table);

    println!();
    println!("    {}", style("Distribution of Attrition Probabilities").cyan().bold());
    let peak = scored.histogram.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in &scored.histogram {
        let width = if peak > 0 {
            (bin.count as f64 / peak as f64 * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!(
            "    {:.2}-{:.2} │{:<w$}│ {}",
            bin.lower,
            bin.upper,
            style("█".repeat(width)).blue(),
            bin.count,
            w = BAR_WIDTH
        );
    }

    println!();
    if scored.high_risk.height() == 0 {
        print_success(
            "No employees are currently at high risk of attrition in the selected filters.",
        );
        return;
    }

    print_warning("These employees are at high risk of attrition based on multiple factors");
    match TableData::from_frame(&scored.high_risk) {
        Ok(data) => {
            let headers: Vec<&str> = data.headers.iter().map(String::as_str).collect();
            let mut table = new_table(&headers);
            for row in data.rows {
                table.add_row(row);
            }
            print_table(&table);
        }
        Err(e) => print_error(&format!("Failed to render high-risk employees: {}", e)),
    }
}

pub fn print_recommendations() {
    print_section("💡", "RECOMMENDATIONS");
    println!("    {}", RECOMMENDATIONS_INTRO);
    println!();
    for (i, rec) in RECOMMENDATIONS.iter().enumerate() {
        println!(
            "    {}. {}: {}",
            i + 1,
            style(rec.title).white().bold(),
            rec.detail
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataFrame;

    #[test]
    fn test_rate_bar_bounds() {
        assert_eq!(rate_bar(0.0), "");
        assert_eq!(rate_bar(100.0).chars().count(), BAR_WIDTH);
        assert_eq!(rate_bar(250.0).chars().count(), BAR_WIDTH);
        assert_eq!(rate_bar(50.0).chars().count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_model_description_includes_accuracy() {
        let scored = ScoredView {
            model_name: "Gradient Boosting".to_string(),
            accuracy: Some(85.85),
            distribution: Vec::new(),
            histogram: Vec::new(),
            high_risk: DataFrame::empty(),
            failure: None,
        };
        let text = model_description(&scored);
        assert!(text.contains("Gradient Boosting"));
        assert!(text.contains("85.85%"));
    }
}
