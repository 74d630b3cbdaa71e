//! Terminal styling utilities for the attrition report

use console::{style, Emoji};
use std::path::PathBuf;

use crate::pipeline::FilterSelection;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
pub static FILTER: Emoji<'_, '_> = Emoji("🔎 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[x] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     █████╗ ████████╗████████╗██████╗ ██╗██╗     ███████╗███╗   ██╗███████╗
    ██╔══██╗╚══██╔══╝╚══██╔══╝██╔══██╗██║██║     ██╔════╝████╗  ██║██╔════╝
    ███████║   ██║      ██║   ██████╔╝██║██║     █████╗  ██╔██╗ ██║███████╗
    ██╔══██║   ██║      ██║   ██╔══██╗██║██║     ██╔══╝  ██║╚██╗██║╚════██║
    ██║  ██║   ██║      ██║   ██║  ██║██║███████╗███████╗██║ ╚████║███████║
    ╚═╝  ╚═╝   ╚═╝      ╚═╝   ╚═╝  ╚═╝╚═╝╚══════╝╚══════╝╚═╝  ╚═══╝╚══════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Employee attrition analysis and risk prediction").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(data: &[PathBuf], model: &[PathBuf], filters: &FilterSelection) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Data:   {:<39}│",
        FOLDER,
        truncate_string(&first_path(data), 38)
    );
    println!(
        "    │  {} Model:  {:<39}│",
        BRAIN,
        truncate_string(&first_path(model), 38)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Department: {:<35}│",
        FILTER,
        style(truncate_string(&filters.department, 34)).yellow()
    );
    println!(
        "    │  {} Job role:   {:<35}│",
        FILTER,
        style(truncate_string(&filters.job_role, 34)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a section header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("    {} {}", WARN, style(message).yellow());
}

/// Print an error to stderr
pub fn print_error(message: &str) {
    eprintln!("    {} {}", CROSS, style(message).red().bold());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Attrition report complete!").green().bold()
    );
    println!();
}

// Helper functions

fn first_path(paths: &[PathBuf]) -> String {
    match paths {
        [] => "(none)".to_string(),
        [only] => only.display().to_string(),
        [first, rest @ ..] => format!("{} (+{} fallback)", first.display(), rest.len()),
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
