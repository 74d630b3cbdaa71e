//! AttriLens: Employee Attrition Analytics Library
//!
//! Loads a pre-cleaned employee dataset and a pretrained attrition model,
//! derives age and income bands, summarizes attrition rates by category and
//! classifies each employee's attrition risk.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
