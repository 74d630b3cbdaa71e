//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Ten employees with known attrition patterns
///
/// - `JobRole`: 6 Sales Executives (2 attrited), 4 Laboratory Technicians (1 attrited)
/// - `Department`: Sales (6), Research & Development (4); no HR
/// - `OverTime`: 3 "Yes", all attrited
/// - `Age`/`MonthlyIncome`: all inside the bucket ranges
pub fn create_employee_dataframe() -> DataFrame {
    df! {
        "EmployeeId" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "Age" => [22i64, 29, 34, 41, 38, 52, 19, 27, 45, 60],
        "MonthlyIncome" => [1800.0f64, 4200.0, 5200.0, 2600.0, 9800.0, 15000.0, 1500.0, 3100.0, 7000.0, 19000.0],
        "Department" => ["Sales", "Sales", "Sales", "Sales", "Sales", "Sales",
                         "Research & Development", "Research & Development",
                         "Research & Development", "Research & Development"],
        "JobRole" => ["Sales Executive", "Sales Executive", "Sales Executive",
                      "Sales Executive", "Sales Executive", "Sales Executive",
                      "Laboratory Technician", "Laboratory Technician",
                      "Laboratory Technician", "Laboratory Technician"],
        "OverTime" => ["Yes", "No", "No", "Yes", "No", "No", "Yes", "No", "No", "No"],
        "JobSatisfaction" => [1i64, 3, 4, 2, 3, 4, 1, 3, 4, 2],
        "WorkLifeBalance" => [2i64, 3, 3, 1, 3, 4, 1, 3, 3, 2],
        "Attrition" => [1i32, 0, 0, 1, 0, 0, 1, 0, 0, 0],
    }
    .unwrap()
}

/// Random employee records for performance tests
pub fn create_large_employee_dataframe(rows: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let departments = ["Sales", "Research & Development", "Human Resources"];
    let roles = [
        "Sales Executive",
        "Sales Representative",
        "Laboratory Technician",
        "Research Scientist",
        "Manager",
    ];

    let ids: Vec<i64> = (1..=rows as i64).collect();
    let ages: Vec<i64> = (0..rows).map(|_| rng.gen_range(18..65)).collect();
    let incomes: Vec<f64> = (0..rows).map(|_| rng.gen_range(1000.0..20000.0)).collect();
    let department: Vec<&str> = (0..rows)
        .map(|_| departments[rng.gen_range(0..departments.len())])
        .collect();
    let job_role: Vec<&str> = (0..rows).map(|_| roles[rng.gen_range(0..roles.len())]).collect();
    let overtime: Vec<&str> = (0..rows)
        .map(|_| if rng.gen_bool(0.3) { "Yes" } else { "No" })
        .collect();
    let satisfaction: Vec<i64> = (0..rows).map(|_| rng.gen_range(1..=4)).collect();
    let balance: Vec<i64> = (0..rows).map(|_| rng.gen_range(1..=4)).collect();
    let attrition: Vec<i32> = (0..rows).map(|_| i32::from(rng.gen_bool(0.16))).collect();

    DataFrame::new(vec![
        Column::new("EmployeeId".into(), ids),
        Column::new("Age".into(), ages),
        Column::new("MonthlyIncome".into(), incomes),
        Column::new("Department".into(), department),
        Column::new("JobRole".into(), job_role),
        Column::new("OverTime".into(), overtime),
        Column::new("JobSatisfaction".into(), satisfaction),
        Column::new("WorkLifeBalance".into(), balance),
        Column::new("Attrition".into(), attrition),
    ])
    .unwrap()
}

/// Model artifact scoring overtime and low income as risky
///
/// OverTime "Yes" adds +2 log-odds (else -2); MonthlyIncome <= 3000 adds +1 (else -1).
/// On the employee fixture, employees 1, 4 and 7 are High risk and the rest Low.
pub fn model_json() -> String {
    r#"{
  "name": "Gradient Boosting",
  "accuracy": 85.85,
  "features": [
    { "kind": "one_hot", "column": "OverTime", "value": "Yes" },
    { "kind": "numeric", "column": "MonthlyIncome" }
  ],
  "init_score": 0.0,
  "learning_rate": 1.0,
  "trees": [
    { "nodes": [
      { "type": "split", "feature": 0, "threshold": 0.5, "left": 1, "right": 2 },
      { "type": "leaf", "value": -2.0 },
      { "type": "leaf", "value": 2.0 }
    ] },
    { "nodes": [
      { "type": "split", "feature": 1, "threshold": 3000.0, "left": 1, "right": 2, "default_left": false },
      { "type": "leaf", "value": 1.0 },
      { "type": "leaf", "value": -1.0 }
    ] }
  ]
}"#
    .to_string()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("employee_data_clean.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("employee_data_clean.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Write the model fixture into `dir`
pub fn write_model(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("gb_attrition_prediction_model.json");
    std::fs::write(&path, model_json()).unwrap();
    path
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
