//! Report functions over the static prediction tables.
//!
//! Same conventions as the live reports: key-ordered grouping, stable
//! count-descending sorts, top-N truncate then reverse where horizontal
//! bars are shown ascending. Empty tables yield empty series.

use std::collections::BTreeMap;

use crate::color::{self, risk_color, Rgb};
use crate::data::prediction::{PredictedChurner, PredictionReport, RiskLevel};

use super::bins::{BinTable, PRED_AGE_GROUPS, PRED_TENURE_GROUPS};
use super::{ChartData, ChartDescription, ChartKind, GaugeBand, SampleSeries};

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

fn count_by<'a>(
    churners: &'a [PredictedChurner],
    key_of: impl Fn(&'a PredictedChurner) -> &'a str,
) -> Vec<(String, f64)> {
    let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
    for c in churners {
        *counts.entry(key_of(c)).or_insert(0.0) += 1.0;
    }
    counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn sort_desc(entries: &mut [(String, f64)]) {
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

/// Count-descending bar over a categorical churner column, with colors
/// cycled over the given palette.
fn counted_bar(
    report: &PredictionReport,
    title: &str,
    x_label: &str,
    palette: &[Rgb],
    key_of: impl for<'a> Fn(&'a PredictedChurner) -> &'a str,
) -> ChartDescription {
    let mut counts = count_by(&report.churners, key_of);
    sort_desc(&mut counts);
    let colors = counts
        .iter()
        .enumerate()
        .map(|(i, _)| palette[i % palette.len()])
        .collect();
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        title,
        ChartKind::Bar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
    .with_axes(x_label, "Number of Churners")
}

/// Churner counts over a fixed bin table, in bin order.
fn binned_bar(
    report: &PredictionReport,
    title: &str,
    x_label: &str,
    table: &BinTable,
    value_of: impl Fn(&PredictedChurner) -> i32,
) -> ChartDescription {
    let counts = table.counts(report.churners.iter().map(value_of));
    ChartDescription::new(
        title,
        ChartKind::Bar,
        ChartData::Categorical {
            labels: table.labels.iter().map(|l| l.to_string()).collect(),
            values: counts.into_iter().map(|c| c as f64).collect(),
            colors: None,
        },
    )
    .with_axes(x_label, "Number of Churners")
}

// ---------------------------------------------------------------------------
// Headline indicators
// ---------------------------------------------------------------------------

/// Headline count of predicted churners; the reference delta marks growth
/// against 80% of the summary figure.
pub fn total_predicted_churners(report: &PredictionReport) -> ChartDescription {
    ChartDescription::new(
        "Total Predicted Churners",
        ChartKind::Indicator,
        ChartData::Indicator {
            value: report.churners.len() as f64,
            reference: Some(report.summary.predicted_churners * 0.8),
            prefix: None,
            suffix: None,
        },
    )
}

/// Headline revenue at risk from the summary table.
pub fn revenue_at_risk(report: &PredictionReport) -> ChartDescription {
    ChartDescription::new(
        "Revenue at Risk",
        ChartKind::Indicator,
        ChartData::Indicator {
            value: report.summary.total_revenue_at_risk,
            reference: None,
            prefix: Some("$".to_string()),
            suffix: None,
        },
    )
}

/// Average churn probability as a 0-100 gauge with fixed risk bands and a
/// threshold marker at 70.
pub fn average_churn_risk_gauge(report: &PredictionReport) -> ChartDescription {
    ChartDescription::new(
        "Average Churn Risk",
        ChartKind::Gauge,
        ChartData::Gauge {
            value: report.summary.avg_churn_probability * 100.0,
            min: 0.0,
            max: 100.0,
            bands: vec![
                GaugeBand {
                    from: 0.0,
                    to: 30.0,
                    color: color::RISK_LOW,
                },
                GaugeBand {
                    from: 30.0,
                    to: 50.0,
                    color: color::RISK_MEDIUM,
                },
                GaugeBand {
                    from: 50.0,
                    to: 70.0,
                    color: color::RISK_HIGH,
                },
                GaugeBand {
                    from: 70.0,
                    to: 100.0,
                    color: color::RISK_CRITICAL,
                },
            ],
            threshold: Some(70.0),
            suffix: Some("%".to_string()),
        },
    )
}

// ---------------------------------------------------------------------------
// Breakdown charts
// ---------------------------------------------------------------------------

/// Top 10 states by churner count, shown ascending.
pub fn churners_by_state(report: &PredictionReport) -> ChartDescription {
    let mut counts = count_by(&report.churners, |c| c.state.as_str());
    sort_desc(&mut counts);
    counts.truncate(10);
    counts.reverse();
    let colors = vec![color::PRIMARY; counts.len()];
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        "Churners by State (Top 10)",
        ChartKind::HorizontalBar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
    .with_axes("Number of Churners", "State")
}

/// Donut of churner counts per risk level, most common first.
pub fn risk_level_distribution(report: &PredictionReport) -> ChartDescription {
    let levels = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];
    let mut counts: Vec<(RiskLevel, f64)> = levels
        .iter()
        .map(|&level| {
            let n = report
                .churners
                .iter()
                .filter(|c| c.risk_level == level)
                .count();
            (level, n as f64)
        })
        .filter(|(_, n)| *n > 0.0)
        .collect();
    counts.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let colors = counts.iter().map(|(level, _)| risk_color(*level)).collect();
    let (labels, values) = counts
        .into_iter()
        .map(|(level, n)| (level.label().to_string(), n))
        .unzip();
    ChartDescription::new(
        "Risk Level Distribution",
        ChartKind::Donut,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
}

pub fn churners_by_age_group(report: &PredictionReport) -> ChartDescription {
    binned_bar(
        report,
        "Churners by Age Group",
        "Age Group",
        &PRED_AGE_GROUPS,
        |c| c.age,
    )
}

pub fn churners_by_tenure_group(report: &PredictionReport) -> ChartDescription {
    binned_bar(
        report,
        "Churners by Tenure Group",
        "Tenure (Months)",
        &PRED_TENURE_GROUPS,
        |c| c.tenure_months,
    )
}

pub fn churners_by_gender(report: &PredictionReport) -> ChartDescription {
    counted_bar(
        report,
        "Churners by Gender",
        "Gender",
        &[color::RISK_HIGH, color::PRIMARY],
        |c| c.gender.as_str(),
    )
}

pub fn churners_by_marital_status(report: &PredictionReport) -> ChartDescription {
    counted_bar(
        report,
        "Churners by Marital Status",
        "Married",
        &[color::PRIMARY, color::RISK_HIGH],
        |c| c.married.as_str(),
    )
}

pub fn churners_by_contract_type(report: &PredictionReport) -> ChartDescription {
    counted_bar(
        report,
        "Churners by Contract Type",
        "Contract",
        &[color::RISK_CRITICAL, color::RISK_HIGH, color::RISK_MEDIUM],
        |c| c.contract.as_str(),
    )
}

pub fn churners_by_payment_method(report: &PredictionReport) -> ChartDescription {
    counted_bar(
        report,
        "Churners by Payment Method",
        "Payment Method",
        &[color::RISK_CRITICAL, color::RISK_HIGH, color::RISK_MEDIUM],
        |c| c.payment_method.as_str(),
    )
}

/// Top 8 risk factors, shown ascending. A factor counts once per customer
/// even when a row lists it twice.
pub fn top_risk_factors(report: &PredictionReport) -> ChartDescription {
    let mut counts: BTreeMap<String, f64> = BTreeMap::new();
    for c in &report.churners {
        for factor in c.risk_factors() {
            *counts.entry(factor.to_string()).or_insert(0.0) += 1.0;
        }
    }
    let mut entries: Vec<(String, f64)> = counts.into_iter().collect();
    sort_desc(&mut entries);
    entries.truncate(8);
    entries.reverse();
    let colors = vec![color::RISK_CRITICAL; entries.len()];
    let (labels, values) = entries.into_iter().unzip();
    ChartDescription::new(
        "Top Churn Risk Factors",
        ChartKind::HorizontalBar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
    .with_axes("Number of Customers", "Risk Factor")
}

/// Histogram of churner monthly charges (20 suggested bins).
pub fn monthly_charge_distribution(report: &PredictionReport) -> ChartDescription {
    ChartDescription::new(
        "Monthly Charge Distribution of Churners",
        ChartKind::Histogram,
        ChartData::Samples {
            series: vec![SampleSeries {
                name: "Churners".to_string(),
                color: Some(color::CHURNED),
                values: report.churners.iter().map(|c| c.monthly_charge).collect(),
            }],
            suggested_bins: Some(20),
        },
    )
    .with_axes("Monthly Charge ($)", "Count")
}

/// Top 20 churners by probability, as a display-ready table. Money is
/// rounded to cents, the probability to one decimal percent.
pub fn high_risk_customers_table(report: &PredictionReport) -> ChartDescription {
    let mut ranked: Vec<&PredictedChurner> = report.churners.iter().collect();
    ranked.sort_by(|a, b| {
        b.churn_probability
            .partial_cmp(&a.churn_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(20);

    let rows = ranked
        .iter()
        .map(|c| {
            vec![
                c.customer_id.clone(),
                format!("{:.2}", c.monthly_charge),
                format!("{:.2}", c.total_revenue),
                format!("{:.2}", c.total_refunds),
                c.referrals.to_string(),
                c.tenure_months.to_string(),
                format!("{:.1}", c.churn_probability * 100.0),
                c.risk_level.label().to_string(),
                c.top_risk_factors.clone().unwrap_or_default(),
            ]
        })
        .collect();
    ChartDescription::new(
        "High Risk Customers (Top 20)",
        ChartKind::Table,
        ChartData::Table {
            columns: vec![
                "Customer ID".to_string(),
                "Monthly Charge".to_string(),
                "Total Revenue".to_string(),
                "Total Refunds".to_string(),
                "Referrals".to_string(),
                "Tenure (Months)".to_string(),
                "Churn Risk %".to_string(),
                "Risk Level".to_string(),
                "Top Risk Factors".to_string(),
            ],
            rows,
        },
    )
}

// ---------------------------------------------------------------------------
// Combined dashboard
// ---------------------------------------------------------------------------

/// The full prediction overview as a 3-column composite of twelve panels,
/// in reading order. The customer table is kept out; it has its own view.
pub fn combined_dashboard(report: &PredictionReport) -> ChartDescription {
    let panels = vec![
        total_predicted_churners(report),
        churners_by_state(report),
        risk_level_distribution(report),
        churners_by_age_group(report),
        churners_by_marital_status(report),
        churners_by_contract_type(report),
        churners_by_tenure_group(report),
        churners_by_payment_method(report),
        average_churn_risk_gauge(report),
        top_risk_factors(report),
        revenue_at_risk(report),
        monthly_charge_distribution(report),
    ];
    ChartDescription::new(
        "Churn Prediction Overview",
        ChartKind::Composite,
        ChartData::Composite { columns: 3, panels },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::prediction::PredictionSummary;
    use crate::data::testutil::churner;

    fn report(churners: Vec<PredictedChurner>) -> PredictionReport {
        let n = churners.len() as f64;
        PredictionReport {
            all_customers: Vec::new(),
            churners,
            summary: PredictionSummary {
                predicted_churners: n,
                avg_churn_probability: 0.55,
                total_revenue_at_risk: 12345.0,
            },
        }
    }

    #[test]
    fn top_risk_factors_count_once_per_customer() {
        let mut a = churner("C1", "CA", 0.9);
        a.top_risk_factors = Some("Price,Attitude".into());
        let mut b = churner("C2", "CA", 0.8);
        b.top_risk_factors = Some("Price".into());
        let mut c = churner("C3", "CA", 0.7);
        c.top_risk_factors = Some("Dissatisfaction".into());
        let rep = report(vec![a, b, c]);

        let chart = top_risk_factors(&rep);
        match chart.data {
            ChartData::Categorical { labels, values, .. } => {
                // Ascending display order: the winner comes last.
                let pairs: Vec<(&str, f64)> = labels
                    .iter()
                    .map(String::as_str)
                    .zip(values.iter().copied())
                    .collect();
                assert_eq!(pairs.last(), Some(&("Price", 2.0)));
                assert!(pairs.contains(&("Attitude", 1.0)));
                assert!(pairs.contains(&("Dissatisfaction", 1.0)));
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn indicator_reference_is_eighty_percent_of_summary() {
        let rep = report(vec![churner("C1", "CA", 0.9), churner("C2", "TX", 0.8)]);
        let chart = total_predicted_churners(&rep);
        match chart.data {
            ChartData::Indicator { value, reference, .. } => {
                assert_eq!(value, 2.0);
                assert_eq!(reference, Some(1.6));
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn gauge_scales_probability_to_percent() {
        let rep = report(vec![churner("C1", "CA", 0.9)]);
        let chart = average_churn_risk_gauge(&rep);
        match chart.data {
            ChartData::Gauge {
                value,
                bands,
                threshold,
                ..
            } => {
                assert_eq!(value, 55.0);
                assert_eq!(bands.len(), 4);
                assert_eq!(threshold, Some(70.0));
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn tenure_groups_drop_out_of_range() {
        let mut a = churner("C1", "CA", 0.9);
        a.tenure_months = 6; // right-closed: stays in <6
        let mut b = churner("C2", "CA", 0.8);
        b.tenure_months = 40; // outside the table
        let rep = report(vec![a, b]);

        let chart = churners_by_tenure_group(&rep);
        match chart.data {
            ChartData::Categorical { labels, values, .. } => {
                assert_eq!(labels, ["<6", "6-12", "12-24", "24-36"]);
                assert_eq!(values, [1.0, 0.0, 0.0, 0.0]);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn high_risk_table_ranks_by_probability() {
        let rep = report(vec![
            churner("LOW", "CA", 0.55),
            churner("TOP", "CA", 0.95),
            churner("MID", "CA", 0.75),
        ]);
        let chart = high_risk_customers_table(&rep);
        match chart.data {
            ChartData::Table { columns, rows } => {
                assert_eq!(columns.len(), 9);
                assert_eq!(rows[0][0], "TOP");
                assert_eq!(rows[0][6], "95.0");
                assert_eq!(rows[2][0], "LOW");
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn combined_dashboard_has_twelve_panels() {
        let rep = report(vec![churner("C1", "CA", 0.9)]);
        let chart = combined_dashboard(&rep);
        match chart.data {
            ChartData::Composite { columns, panels } => {
                assert_eq!(columns, 3);
                assert_eq!(panels.len(), 12);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn empty_report_builds_every_chart() {
        let rep = report(Vec::new());
        for chart in crate::charts::PredictionChart::ALL {
            let desc = chart.build(&rep);
            assert!(!desc.title.is_empty());
        }
    }
}
