//! Static retention recommendations shown below the dashboard

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub detail: &'static str,
}

pub const RECOMMENDATIONS_INTRO: &str =
    "Based on the analysis, here are some recommendations to reduce attrition:";

pub const RECOMMENDATIONS: [Recommendation; 5] = [
    Recommendation {
        title: "Address Overtime Issues",
        detail: "Employees working overtime have nearly 3x higher attrition rates.",
    },
    Recommendation {
        title: "Improve Entry-Level Retention",
        detail: "Level 1 employees have the highest attrition rates.",
    },
    Recommendation {
        title: "Review Compensation for Lower Income Groups",
        detail: "Lower income groups show dramatically higher attrition.",
    },
    Recommendation {
        title: "Focus on Work-Life Balance",
        detail: "Poor work-life balance correlates with higher attrition.",
    },
    Recommendation {
        title: "Target Support for High-Risk Roles",
        detail: "Sales Representatives and Laboratory Technicians have the highest attrition.",
    },
];
