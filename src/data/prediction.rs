use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::loader::{read_rows, DataError};

// ---------------------------------------------------------------------------
// Prediction tables: read-only output of the external scoring process
// ---------------------------------------------------------------------------

/// Churn-probability bucket assigned by the external model, consumed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

/// One row of the all-customer score table.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredCustomer {
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Churn_Probability")]
    pub churn_probability: f64,
    #[serde(rename = "Risk_Level")]
    pub risk_level: RiskLevel,
}

/// One row of the predicted-churner subset.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictedChurner {
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Married")]
    pub married: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    #[serde(rename = "Tenure_in_Months")]
    pub tenure_months: i32,
    #[serde(rename = "Number_of_Referrals")]
    pub referrals: i32,
    #[serde(rename = "Monthly_Charge")]
    pub monthly_charge: f64,
    #[serde(rename = "Total_Revenue")]
    pub total_revenue: f64,
    #[serde(rename = "Total_Refunds")]
    pub total_refunds: f64,
    #[serde(rename = "Churn_Probability")]
    pub churn_probability: f64,
    #[serde(rename = "Risk_Level")]
    pub risk_level: RiskLevel,
    #[serde(rename = "Top_Risk_Factors")]
    pub top_risk_factors: Option<String>,
}

impl PredictedChurner {
    /// The customer's distinct risk factors, trimmed, in listed order.
    /// A factor listed twice in one row still counts once.
    pub fn risk_factors(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        if let Some(raw) = &self.top_risk_factors {
            for factor in raw.split(',') {
                let factor = factor.trim();
                if !factor.is_empty() && !seen.contains(&factor) {
                    seen.push(factor);
                }
            }
        }
        seen
    }
}

/// Scalar summary row produced alongside the predictions.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictionSummary {
    pub predicted_churners: f64,
    pub avg_churn_probability: f64,
    pub total_revenue_at_risk: f64,
}

const SCORED_COLUMNS: [&str; 3] = ["Customer_ID", "Churn_Probability", "Risk_Level"];
const CHURNER_COLUMNS: [&str; 15] = [
    "Customer_ID",
    "Gender",
    "Age",
    "Married",
    "State",
    "Contract",
    "Payment_Method",
    "Tenure_in_Months",
    "Number_of_Referrals",
    "Monthly_Charge",
    "Total_Revenue",
    "Total_Refunds",
    "Churn_Probability",
    "Risk_Level",
    "Top_Risk_Factors",
];
const SUMMARY_COLUMNS: [&str; 3] = [
    "predicted_churners",
    "avg_churn_probability",
    "total_revenue_at_risk",
];

// ---------------------------------------------------------------------------
// PredictionReport
// ---------------------------------------------------------------------------

/// The three static prediction tables. Loaded once per report, never
/// filtered or mutated afterwards.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub all_customers: Vec<ScoredCustomer>,
    pub churners: Vec<PredictedChurner>,
    pub summary: PredictionSummary,
}

impl PredictionReport {
    /// Load all three tables; any missing or malformed source is fatal.
    pub fn load(
        all_customers_path: &Path,
        churners_path: &Path,
        summary_path: &Path,
    ) -> Result<Self, DataError> {
        let all_customers: Vec<ScoredCustomer> = read_rows(all_customers_path, &SCORED_COLUMNS)?;
        let churners: Vec<PredictedChurner> = read_rows(churners_path, &CHURNER_COLUMNS)?;
        let summaries: Vec<PredictionSummary> = read_rows(summary_path, &SUMMARY_COLUMNS)?;
        let summary = summaries.first().copied().ok_or_else(|| DataError::Empty {
            path: summary_path.to_path_buf(),
        })?;
        info!(
            "loaded prediction report: {} scored, {} predicted churners",
            all_customers.len(),
            churners.len()
        );
        Ok(PredictionReport {
            all_customers,
            churners,
            summary,
        })
    }
}
