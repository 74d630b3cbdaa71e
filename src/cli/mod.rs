//! CLI module - argument parsing, filter prompts and the interactive dashboard

mod args;
pub mod dashboard;
mod prompts;

pub use args::{Cli, Commands};
pub use dashboard::{run_dashboard, DashboardState, DashboardTab};
pub use prompts::*;
