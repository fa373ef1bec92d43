// 📋 Health Records - recent visits and test results
// Read-only sample data for the records tabs

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub date: NaiveDate,
    pub provider: String,
    pub visit_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultStatus {
    Normal,
    Abnormal,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Normal => "Normal",
            ResultStatus::Abnormal => "Abnormal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub date: NaiveDate,
    pub test: String,
    pub status: ResultStatus,
    pub details: String,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn visit(on: NaiveDate, provider: &str, visit_type: &str, notes: &str) -> VisitRecord {
    VisitRecord {
        date: on,
        provider: provider.to_string(),
        visit_type: visit_type.to_string(),
        notes: notes.to_string(),
    }
}

fn test_result(on: NaiveDate, test: &str, status: ResultStatus, details: &str) -> TestResult {
    TestResult {
        date: on,
        test: test.to_string(),
        status,
        details: details.to_string(),
    }
}

/// Most recent first
pub fn recent_visits() -> Vec<VisitRecord> {
    vec![
        visit(
            date(2024, 4, 10),
            "Dr. Sarah Johnson",
            "Annual Physical",
            "General health assessment. Recommended lifestyle changes to address elevated blood pressure.",
        ),
        visit(
            date(2024, 2, 15),
            "Dr. Michael Chen",
            "Cardiology Consultation",
            "Follow-up on heart health. Prescribed medication for blood pressure management.",
        ),
        visit(
            date(2024, 1, 8),
            "Dr. Emily Rodriguez",
            "Urgent Care Visit",
            "Treatment for acute bronchitis. Prescribed antibiotics and advised rest.",
        ),
    ]
}

pub fn test_results() -> Vec<TestResult> {
    vec![
        test_result(
            date(2024, 4, 10),
            "Complete Blood Count (CBC)",
            ResultStatus::Normal,
            "All values within normal ranges.",
        ),
        test_result(
            date(2024, 4, 10),
            "Lipid Panel",
            ResultStatus::Abnormal,
            "LDL cholesterol slightly elevated at 160 mg/dL (normal range: <130 mg/dL).",
        ),
        test_result(
            date(2024, 2, 15),
            "Electrocardiogram (ECG)",
            ResultStatus::Normal,
            "Normal sinus rhythm. No significant abnormalities detected.",
        ),
    ]
}

/// Display form used on both tabs, e.g. "Apr 10, 2024"
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
