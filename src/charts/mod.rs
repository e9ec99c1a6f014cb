//! Chart catalog: named, pure report functions from a data view to a
//! declarative [`ChartDescription`]. Rendering (plotly, egui, ...) is the
//! caller's concern; this layer only fixes which aggregation produced the
//! series and under which grouping/sorting rule.

pub mod bins;
pub mod dataset;
pub mod prediction;
pub mod stats;

use serde::Serialize;

use crate::color::Rgb;
use crate::data::filter::FilteredView;
use crate::data::prediction::PredictionReport;

// ---------------------------------------------------------------------------
// ChartDescription model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Pie,
    Donut,
    Bar,
    HorizontalBar,
    GroupedBar,
    StackedBar,
    Line,
    Area,
    Scatter,
    Histogram,
    BoxPlot,
    Violin,
    Heatmap,
    Sunburst,
    Gauge,
    Indicator,
    Table,
    Composite,
}

/// One named bar/pie series over shared categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: Option<Rgb>,
    pub values: Vec<f64>,
}

/// Least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

/// A scatter/line series over numeric x.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSeries {
    pub name: String,
    pub color: Option<Rgb>,
    pub points: Vec<(f64, f64)>,
    /// Optional per-point marker sizes (same length as `points`).
    pub sizes: Option<Vec<f64>>,
    pub trend: Option<TrendLine>,
}

/// Raw samples for distribution charts; binning is left to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSeries {
    pub name: String,
    pub color: Option<Rgb>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstNode {
    pub label: String,
    pub value: f64,
    pub color: Option<Rgb>,
    pub children: Vec<SunburstNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartData {
    /// One value per label, with optional per-bar/per-slice colors.
    Categorical {
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Option<Vec<Rgb>>,
    },
    /// Shared categories, one or more named series (grouped/stacked bars).
    MultiSeries {
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    Points {
        series: Vec<PointSeries>,
    },
    Samples {
        series: Vec<SampleSeries>,
        suggested_bins: Option<usize>,
    },
    Matrix {
        x_labels: Vec<String>,
        y_labels: Vec<String>,
        rows: Vec<Vec<f64>>,
    },
    Hierarchy {
        roots: Vec<SunburstNode>,
    },
    Gauge {
        value: f64,
        min: f64,
        max: f64,
        bands: Vec<GaugeBand>,
        threshold: Option<f64>,
        suffix: Option<String>,
    },
    Indicator {
        value: f64,
        reference: Option<f64>,
        prefix: Option<String>,
        suffix: Option<String>,
    },
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Composite {
        columns: usize,
        panels: Vec<ChartDescription>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Annotation {
    /// Vertical marker at `x` (mean-tenure line and the like).
    VerticalLine { x: f64, label: String },
    /// Scalar reported alongside the series (revenue-lost grand total).
    GrandTotal { label: String, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub data: ChartData,
    pub annotations: Vec<Annotation>,
}

impl ChartDescription {
    pub fn new(title: impl Into<String>, kind: ChartKind, data: ChartData) -> Self {
        ChartDescription {
            title: title.into(),
            kind,
            x_label: None,
            y_label: None,
            data,
            annotations: Vec::new(),
        }
    }

    pub fn with_axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

// ---------------------------------------------------------------------------
// DatasetChart – catalog over the live filtered view
// ---------------------------------------------------------------------------

/// Every report over the live (filtered) churn table. Closed enumeration;
/// dispatch is resolved at compile time, not by string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatasetChart {
    StatusDistribution,
    ChurnCategoryBreakdown,
    TopChurnReasons,
    ChurnByTenure,
    ChurnByAgeGroup,
    ChurnByGender,
    ChurnByMaritalStatus,
    TopStatesByChurn,
    AgeVsTenure,
    ChurnByContractType,
    ChurnByInternetType,
    ServiceAdoptionHeatmap,
    PaymentMethodVsChurn,
    PaperlessBillingImpact,
    RevenueLostToChurn,
    MonthlyChargeDistribution,
    TotalRevenueDistribution,
    RevenueByContractType,
    ChargesBreakdown,
    MonthlyChargeVsTenure,
    ChurnRateByReferrals,
    ReferralDistribution,
    AvgReferralsByStatus,
    ValueDealImpact,
    CorrelationHeatmap,
    TenureVsChurnRate,
    ServiceCountVsChurn,
    RiskSegments,
}

impl DatasetChart {
    pub const ALL: [DatasetChart; 28] = [
        DatasetChart::StatusDistribution,
        DatasetChart::ChurnCategoryBreakdown,
        DatasetChart::TopChurnReasons,
        DatasetChart::ChurnByTenure,
        DatasetChart::ChurnByAgeGroup,
        DatasetChart::ChurnByGender,
        DatasetChart::ChurnByMaritalStatus,
        DatasetChart::TopStatesByChurn,
        DatasetChart::AgeVsTenure,
        DatasetChart::ChurnByContractType,
        DatasetChart::ChurnByInternetType,
        DatasetChart::ServiceAdoptionHeatmap,
        DatasetChart::PaymentMethodVsChurn,
        DatasetChart::PaperlessBillingImpact,
        DatasetChart::RevenueLostToChurn,
        DatasetChart::MonthlyChargeDistribution,
        DatasetChart::TotalRevenueDistribution,
        DatasetChart::RevenueByContractType,
        DatasetChart::ChargesBreakdown,
        DatasetChart::MonthlyChargeVsTenure,
        DatasetChart::ChurnRateByReferrals,
        DatasetChart::ReferralDistribution,
        DatasetChart::AvgReferralsByStatus,
        DatasetChart::ValueDealImpact,
        DatasetChart::CorrelationHeatmap,
        DatasetChart::TenureVsChurnRate,
        DatasetChart::ServiceCountVsChurn,
        DatasetChart::RiskSegments,
    ];

    /// Human label, as shown by the dashboard.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetChart::StatusDistribution => "Customer Status Distribution",
            DatasetChart::ChurnCategoryBreakdown => "Churn Category Breakdown",
            DatasetChart::TopChurnReasons => "Top 10 Churn Reasons",
            DatasetChart::ChurnByTenure => "Churn Trend by Tenure",
            DatasetChart::ChurnByAgeGroup => "Churn Rate by Age Group",
            DatasetChart::ChurnByGender => "Churn by Gender",
            DatasetChart::ChurnByMaritalStatus => "Churn by Marital Status",
            DatasetChart::TopStatesByChurn => "Top 10 States by Churn Count",
            DatasetChart::AgeVsTenure => "Age vs Tenure Analysis",
            DatasetChart::ChurnByContractType => "Churn Rate by Contract Type",
            DatasetChart::ChurnByInternetType => "Churn Rate by Internet Type",
            DatasetChart::ServiceAdoptionHeatmap => "Service Adoption Heatmap",
            DatasetChart::PaymentMethodVsChurn => "Payment Method vs Churn",
            DatasetChart::PaperlessBillingImpact => "Paperless Billing Impact on Churn",
            DatasetChart::RevenueLostToChurn => "Revenue Lost to Churn by Category",
            DatasetChart::MonthlyChargeDistribution => "Monthly Charge Distribution",
            DatasetChart::TotalRevenueDistribution => "Total Revenue Distribution by Customer Status",
            DatasetChart::RevenueByContractType => "Average Revenue by Contract Type",
            DatasetChart::ChargesBreakdown => "Charges Breakdown by Customer Status",
            DatasetChart::MonthlyChargeVsTenure => "Monthly Charge vs Tenure",
            DatasetChart::ChurnRateByReferrals => "Churn Rate by Number of Referrals",
            DatasetChart::ReferralDistribution => "Referral Distribution by Customer Status",
            DatasetChart::AvgReferralsByStatus => "Average Referrals by Customer Status",
            DatasetChart::ValueDealImpact => "Value Deal Impact on Customer Status",
            DatasetChart::CorrelationHeatmap => "Feature Correlation Heatmap",
            DatasetChart::TenureVsChurnRate => "Churn Rate by Tenure Buckets",
            DatasetChart::ServiceCountVsChurn => "Service Count Distribution by Customer Status",
            DatasetChart::RiskSegments => "Customer Segmentation: Contract → Internet Type → Status",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Build this chart from the given view. Pure; an empty view yields
    /// empty series, never a panic.
    pub fn build(&self, view: &FilteredView<'_>) -> ChartDescription {
        use self::dataset as d;
        match self {
            DatasetChart::StatusDistribution => d::status_distribution(view),
            DatasetChart::ChurnCategoryBreakdown => d::churn_category_breakdown(view),
            DatasetChart::TopChurnReasons => d::top_churn_reasons(view),
            DatasetChart::ChurnByTenure => d::churn_by_tenure(view),
            DatasetChart::ChurnByAgeGroup => d::churn_by_age_group(view),
            DatasetChart::ChurnByGender => d::churn_by_gender(view),
            DatasetChart::ChurnByMaritalStatus => d::churn_by_marital_status(view),
            DatasetChart::TopStatesByChurn => d::top_states_by_churn(view),
            DatasetChart::AgeVsTenure => d::age_vs_tenure(view),
            DatasetChart::ChurnByContractType => d::churn_by_contract_type(view),
            DatasetChart::ChurnByInternetType => d::churn_by_internet_type(view),
            DatasetChart::ServiceAdoptionHeatmap => d::service_adoption_heatmap(view),
            DatasetChart::PaymentMethodVsChurn => d::payment_method_vs_churn(view),
            DatasetChart::PaperlessBillingImpact => d::paperless_billing_impact(view),
            DatasetChart::RevenueLostToChurn => d::revenue_lost_to_churn(view),
            DatasetChart::MonthlyChargeDistribution => d::monthly_charge_distribution(view),
            DatasetChart::TotalRevenueDistribution => d::total_revenue_distribution(view),
            DatasetChart::RevenueByContractType => d::revenue_by_contract_type(view),
            DatasetChart::ChargesBreakdown => d::charges_breakdown(view),
            DatasetChart::MonthlyChargeVsTenure => d::monthly_charge_vs_tenure(view),
            DatasetChart::ChurnRateByReferrals => d::churn_rate_by_referrals(view),
            DatasetChart::ReferralDistribution => d::referral_distribution(view),
            DatasetChart::AvgReferralsByStatus => d::avg_referrals_by_status(view),
            DatasetChart::ValueDealImpact => d::value_deal_impact(view),
            DatasetChart::CorrelationHeatmap => d::correlation_heatmap(view),
            DatasetChart::TenureVsChurnRate => d::tenure_vs_churn_rate(view),
            DatasetChart::ServiceCountVsChurn => d::service_count_vs_churn(view),
            DatasetChart::RiskSegments => d::risk_segments(view),
        }
    }
}

// ---------------------------------------------------------------------------
// PredictionChart – catalog over the static prediction report
// ---------------------------------------------------------------------------

/// Every report over the precomputed prediction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PredictionChart {
    CombinedDashboard,
    TotalPredictedChurners,
    ChurnersByState,
    RiskLevelDistribution,
    ChurnersByAgeGroup,
    ChurnersByGender,
    ChurnersByMaritalStatus,
    ChurnersByContractType,
    ChurnersByTenureGroup,
    ChurnersByPaymentMethod,
    AverageChurnRiskGauge,
    TopRiskFactors,
    RevenueAtRisk,
    MonthlyChargeDistribution,
    HighRiskCustomersTable,
}

impl PredictionChart {
    pub const ALL: [PredictionChart; 15] = [
        PredictionChart::CombinedDashboard,
        PredictionChart::TotalPredictedChurners,
        PredictionChart::ChurnersByState,
        PredictionChart::RiskLevelDistribution,
        PredictionChart::ChurnersByAgeGroup,
        PredictionChart::ChurnersByGender,
        PredictionChart::ChurnersByMaritalStatus,
        PredictionChart::ChurnersByContractType,
        PredictionChart::ChurnersByTenureGroup,
        PredictionChart::ChurnersByPaymentMethod,
        PredictionChart::AverageChurnRiskGauge,
        PredictionChart::TopRiskFactors,
        PredictionChart::RevenueAtRisk,
        PredictionChart::MonthlyChargeDistribution,
        PredictionChart::HighRiskCustomersTable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PredictionChart::CombinedDashboard => "Combined Dashboard",
            PredictionChart::TotalPredictedChurners => "Chart Total Predicted Churners",
            PredictionChart::ChurnersByState => "Churners by State",
            PredictionChart::RiskLevelDistribution => "Risk Level Distribution",
            PredictionChart::ChurnersByAgeGroup => "Churners by Age Group",
            PredictionChart::ChurnersByGender => "Churners by Gender",
            PredictionChart::ChurnersByMaritalStatus => "Churners by Marital Status",
            PredictionChart::ChurnersByContractType => "Churners by Contract Type",
            PredictionChart::ChurnersByTenureGroup => "Churners by Tenure Group",
            PredictionChart::ChurnersByPaymentMethod => "Churners by Payment Method",
            PredictionChart::AverageChurnRiskGauge => "Average Churn Risk Gauge",
            PredictionChart::TopRiskFactors => "Top Risk Factors",
            PredictionChart::RevenueAtRisk => "Revenue at Risk",
            PredictionChart::MonthlyChargeDistribution => "Monthly Charge Distribution",
            PredictionChart::HighRiskCustomersTable => "High Risk Customers Table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn build(&self, report: &PredictionReport) -> ChartDescription {
        use self::prediction as p;
        match self {
            PredictionChart::CombinedDashboard => p::combined_dashboard(report),
            PredictionChart::TotalPredictedChurners => p::total_predicted_churners(report),
            PredictionChart::ChurnersByState => p::churners_by_state(report),
            PredictionChart::RiskLevelDistribution => p::risk_level_distribution(report),
            PredictionChart::ChurnersByAgeGroup => p::churners_by_age_group(report),
            PredictionChart::ChurnersByGender => p::churners_by_gender(report),
            PredictionChart::ChurnersByMaritalStatus => p::churners_by_marital_status(report),
            PredictionChart::ChurnersByContractType => p::churners_by_contract_type(report),
            PredictionChart::ChurnersByTenureGroup => p::churners_by_tenure_group(report),
            PredictionChart::ChurnersByPaymentMethod => p::churners_by_payment_method(report),
            PredictionChart::AverageChurnRiskGauge => p::average_churn_risk_gauge(report),
            PredictionChart::TopRiskFactors => p::top_risk_factors(report),
            PredictionChart::RevenueAtRisk => p::revenue_at_risk(report),
            PredictionChart::MonthlyChargeDistribution => p::monthly_charge_distribution(report),
            PredictionChart::HighRiskCustomersTable => p::high_risk_customers_table(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_catalog_names_round_trip() {
        for chart in DatasetChart::ALL {
            assert_eq!(DatasetChart::from_name(chart.name()), Some(chart));
        }
        assert_eq!(DatasetChart::from_name("No Such Chart"), None);
    }

    #[test]
    fn prediction_catalog_names_round_trip() {
        for chart in PredictionChart::ALL {
            assert_eq!(PredictionChart::from_name(chart.name()), Some(chart));
        }
    }
}
