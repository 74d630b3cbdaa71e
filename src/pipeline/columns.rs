//! Column names of the employee dataset and of the derived fields

pub const EMPLOYEE_ID: &str = "EmployeeId";
pub const AGE: &str = "Age";
pub const MONTHLY_INCOME: &str = "MonthlyIncome";
pub const DEPARTMENT: &str = "Department";
pub const JOB_ROLE: &str = "JobRole";
pub const OVERTIME: &str = "OverTime";
pub const JOB_SATISFACTION: &str = "JobSatisfaction";
pub const WORK_LIFE_BALANCE: &str = "WorkLifeBalance";
pub const ATTRITION: &str = "Attrition";

// Derived by bucketing
pub const AGE_GROUP: &str = "AgeGroup";
pub const INCOME_GROUP: &str = "IncomeGroup";

// Derived by the risk classifier
pub const ATTRITION_PROBABILITY: &str = "AttritionProbability";
pub const RISK_CATEGORY: &str = "RiskCategory";

/// Columns shown for each high-risk employee, in display order
pub const HIGH_RISK_DISPLAY_COLUMNS: [&str; 8] = [
    EMPLOYEE_ID,
    DEPARTMENT,
    JOB_ROLE,
    AGE,
    JOB_SATISFACTION,
    WORK_LIFE_BALANCE,
    OVERTIME,
    MONTHLY_INCOME,
];
