use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CustomerStatus – customer lifecycle state
// ---------------------------------------------------------------------------

/// Lifecycle state of a customer row. Closed set; anything else in the
/// `Customer_Status` column is a parse error, not a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    Joined,
    Stayed,
    Churned,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Joined,
        CustomerStatus::Stayed,
        CustomerStatus::Churned,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CustomerStatus::Joined => "Joined",
            CustomerStatus::Stayed => "Stayed",
            CustomerStatus::Churned => "Churned",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CustomerRecord – one row of the churn table
// ---------------------------------------------------------------------------

/// A single customer row, immutable once loaded.
///
/// Nullable columns (`Internet_Type`, `Value_Deal`, churn fields, service
/// flags) are `Option`; an empty CSV cell deserializes to `None`. Numeric
/// fields are parsed but not domain-checked: a negative tenure passes
/// through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
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
    #[serde(rename = "Number_of_Referrals")]
    pub referrals: i32,
    #[serde(rename = "Tenure_in_Months")]
    pub tenure_months: i32,
    #[serde(rename = "Value_Deal")]
    pub value_deal: Option<String>,
    #[serde(rename = "Phone_Service")]
    pub phone_service: Option<String>,
    #[serde(rename = "Multiple_Lines")]
    pub multiple_lines: Option<String>,
    #[serde(rename = "Internet_Type")]
    pub internet_type: Option<String>,
    #[serde(rename = "Online_Security")]
    pub online_security: Option<String>,
    #[serde(rename = "Online_Backup")]
    pub online_backup: Option<String>,
    #[serde(rename = "Device_Protection_Plan")]
    pub device_protection_plan: Option<String>,
    #[serde(rename = "Premium_Support")]
    pub premium_support: Option<String>,
    #[serde(rename = "Streaming_TV")]
    pub streaming_tv: Option<String>,
    #[serde(rename = "Streaming_Movies")]
    pub streaming_movies: Option<String>,
    #[serde(rename = "Streaming_Music")]
    pub streaming_music: Option<String>,
    #[serde(rename = "Unlimited_Data")]
    pub unlimited_data: Option<String>,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "Paperless_Billing")]
    pub paperless_billing: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    #[serde(rename = "Monthly_Charge")]
    pub monthly_charge: f64,
    #[serde(rename = "Total_Charges")]
    pub total_charges: f64,
    #[serde(rename = "Total_Refunds")]
    pub total_refunds: f64,
    #[serde(rename = "Total_Extra_Data_Charges")]
    pub total_extra_data_charges: f64,
    #[serde(rename = "Total_Long_Distance_Charges")]
    pub total_long_distance_charges: f64,
    #[serde(rename = "Total_Revenue")]
    pub total_revenue: f64,
    #[serde(rename = "Customer_Status")]
    pub status: CustomerStatus,
    #[serde(rename = "Churn_Category")]
    pub churn_category: Option<String>,
    #[serde(rename = "Churn_Reason")]
    pub churn_reason: Option<String>,
}

/// The ten subscription service flags, in dashboard order.
pub const SERVICE_FLAGS: [(&str, fn(&CustomerRecord) -> Option<&str>); 10] = [
    ("Phone Service", |r| r.phone_service.as_deref()),
    ("Multiple Lines", |r| r.multiple_lines.as_deref()),
    ("Online Security", |r| r.online_security.as_deref()),
    ("Online Backup", |r| r.online_backup.as_deref()),
    ("Device Protection Plan", |r| {
        r.device_protection_plan.as_deref()
    }),
    ("Premium Support", |r| r.premium_support.as_deref()),
    ("Streaming TV", |r| r.streaming_tv.as_deref()),
    ("Streaming Movies", |r| r.streaming_movies.as_deref()),
    ("Streaming Music", |r| r.streaming_music.as_deref()),
    ("Unlimited Data", |r| r.unlimited_data.as_deref()),
];

impl CustomerRecord {
    /// Number of subscribed services ("Yes" flags).
    pub fn service_count(&self) -> usize {
        SERVICE_FLAGS
            .iter()
            .filter(|(_, get)| get(self) == Some("Yes"))
            .count()
    }
}

// ---------------------------------------------------------------------------
// CategoricalField – the columns the filter/distinct-value API understands
// ---------------------------------------------------------------------------

/// Categorical columns exposed for distinct-value lookups and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    State,
    Gender,
    Married,
    Contract,
    InternetType,
    PaymentMethod,
    ChurnCategory,
}

impl CategoricalField {
    /// The record's value for this field, `None` when missing.
    pub fn value<'a>(&self, record: &'a CustomerRecord) -> Option<&'a str> {
        match self {
            CategoricalField::State => Some(record.state.as_str()),
            CategoricalField::Gender => Some(record.gender.as_str()),
            CategoricalField::Married => Some(record.married.as_str()),
            CategoricalField::Contract => Some(record.contract.as_str()),
            CategoricalField::InternetType => record.internet_type.as_deref(),
            CategoricalField::PaymentMethod => Some(record.payment_method.as_str()),
            CategoricalField::ChurnCategory => record.churn_category.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full churn table. Row order and columns are fixed for the process
/// lifetime; never mutated after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<CustomerRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CustomerRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of a categorical column, missing values dropped.
    pub fn distinct_values(&self, field: CategoricalField) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| field.value(r))
            .collect();
        set.into_iter().map(str::to_owned).collect()
    }

    /// Inclusive (min, max) of the age column; `None` on an empty table.
    pub fn age_bounds(&self) -> Option<(i32, i32)> {
        let mut ages = self.records.iter().map(|r| r.age);
        let first = ages.next()?;
        Some(ages.fold((first, first), |(lo, hi), a| (lo.min(a), hi.max(a))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::record;

    #[test]
    fn distinct_values_sorted_and_deduplicated() {
        let ds = Dataset::new(vec![
            record("1", "TX", 30, CustomerStatus::Stayed),
            record("2", "CA", 40, CustomerStatus::Stayed),
            record("3", "CA", 50, CustomerStatus::Churned),
        ]);
        assert_eq!(ds.distinct_values(CategoricalField::State), ["CA", "TX"]);
    }

    #[test]
    fn distinct_values_drops_missing() {
        let mut a = record("1", "CA", 30, CustomerStatus::Stayed);
        a.internet_type = None;
        let mut b = record("2", "CA", 35, CustomerStatus::Stayed);
        b.internet_type = Some("Fiber Optic".into());
        let ds = Dataset::new(vec![a, b]);
        assert_eq!(
            ds.distinct_values(CategoricalField::InternetType),
            ["Fiber Optic"]
        );
    }

    #[test]
    fn age_bounds_cover_extremes() {
        let ds = Dataset::new(vec![
            record("1", "CA", 23, CustomerStatus::Stayed),
            record("2", "CA", 61, CustomerStatus::Joined),
            record("3", "CA", 45, CustomerStatus::Churned),
        ]);
        assert_eq!(ds.age_bounds(), Some((23, 61)));
        assert_eq!(Dataset::new(Vec::new()).age_bounds(), None);
    }

    #[test]
    fn service_count_counts_only_yes() {
        let mut r = record("1", "CA", 30, CustomerStatus::Stayed);
        r.phone_service = Some("Yes".into());
        r.streaming_tv = Some("Yes".into());
        r.online_backup = Some("No".into());
        r.multiple_lines = None;
        assert_eq!(r.service_count(), 2);
    }
}
