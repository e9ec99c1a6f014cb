//! Data layer: core types, loading, and filtering.
//!
//! ```text
//!  churn.csv ──► loader ──► Dataset (Vec<CustomerRecord>, process cache)
//!                               │
//!                               ▼
//!                            filter ──► FilteredView (row-order subsequence)
//!
//!  prediction CSVs ──► prediction ──► PredictionReport (static tables)
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod prediction;

#[cfg(test)]
pub(crate) mod testutil {
    use super::model::{CustomerRecord, CustomerStatus};
    use super::prediction::{PredictedChurner, RiskLevel};

    /// A plausible customer row for tests; tweak fields as needed.
    pub fn record(id: &str, state: &str, age: i32, status: CustomerStatus) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.to_string(),
            gender: "Female".to_string(),
            age,
            married: "No".to_string(),
            state: state.to_string(),
            referrals: 0,
            tenure_months: 12,
            value_deal: None,
            phone_service: Some("Yes".to_string()),
            multiple_lines: Some("No".to_string()),
            internet_type: Some("Fiber Optic".to_string()),
            online_security: Some("No".to_string()),
            online_backup: Some("No".to_string()),
            device_protection_plan: Some("No".to_string()),
            premium_support: Some("No".to_string()),
            streaming_tv: Some("No".to_string()),
            streaming_movies: Some("No".to_string()),
            streaming_music: Some("No".to_string()),
            unlimited_data: Some("Yes".to_string()),
            contract: "Month-to-Month".to_string(),
            paperless_billing: "Yes".to_string(),
            payment_method: "Credit Card".to_string(),
            monthly_charge: 70.0,
            total_charges: 840.0,
            total_refunds: 0.0,
            total_extra_data_charges: 0.0,
            total_long_distance_charges: 0.0,
            total_revenue: 840.0,
            status,
            churn_category: match status {
                CustomerStatus::Churned => Some("Competitor".to_string()),
                _ => None,
            },
            churn_reason: match status {
                CustomerStatus::Churned => Some("Competitor made better offer".to_string()),
                _ => None,
            },
        }
    }

    /// A predicted-churner row for tests.
    pub fn churner(id: &str, state: &str, probability: f64) -> PredictedChurner {
        PredictedChurner {
            customer_id: id.to_string(),
            gender: "Male".to_string(),
            age: 45,
            married: "Yes".to_string(),
            state: state.to_string(),
            contract: "Month-to-Month".to_string(),
            payment_method: "Bank Withdrawal".to_string(),
            tenure_months: 8,
            referrals: 1,
            monthly_charge: 80.0,
            total_revenue: 640.0,
            total_refunds: 0.0,
            churn_probability: probability,
            risk_level: RiskLevel::High,
            top_risk_factors: Some("Price".to_string()),
        }
    }

    /// Header line matching [`super::loader::REQUIRED_COLUMNS`].
    pub fn churn_csv_header() -> String {
        super::loader::REQUIRED_COLUMNS.join(",")
    }

    /// One CSV row consistent with [`churn_csv_header`].
    pub fn churn_csv_row(id: &str, state: &str, age: i32, status: &str) -> String {
        let (category, reason) = if status == "Churned" {
            ("Price", "Price too high")
        } else {
            ("", "")
        };
        format!(
            "{id},Female,{age},No,{state},2,12,,Yes,No,DSL,No,No,No,No,No,No,No,Yes,\
             Month-to-Month,Yes,Credit Card,65.5,786.0,0.0,0.0,10.5,796.5,{status},{category},{reason}"
        )
    }
}
