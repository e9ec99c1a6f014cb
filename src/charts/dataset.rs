//! Report functions over the live filtered view.
//!
//! Shared conventions:
//! * grouping is key-ordered (BTreeMap), so count-sorted outputs break ties
//!   on the group key (stable sort);
//! * "top-N" means: stable sort by count descending, truncate to N, then
//!   reverse where the dashboard shows ascending horizontal bars;
//! * an empty view yields empty series, never a panic.

use std::collections::BTreeMap;

use crate::color::{self, category_color, status_color, Rgb};
use crate::data::filter::FilteredView;
use crate::data::model::{CustomerRecord, CustomerStatus, SERVICE_FLAGS};

use super::bins::{LIVE_AGE_GROUPS, LIVE_TENURE_BUCKETS};
use super::stats;
use super::{Annotation, BarSeries, ChartData, ChartDescription, ChartKind, PointSeries, SampleSeries, SunburstNode, TrendLine};

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Key-ordered counts of `key_of` over `records`, dropping missing keys.
fn count_by<'a>(
    records: impl Iterator<Item = &'a CustomerRecord>,
    key_of: impl Fn(&'a CustomerRecord) -> Option<&'a str>,
) -> Vec<(String, f64)> {
    let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        if let Some(key) = key_of(r) {
            *counts.entry(key).or_insert(0.0) += 1.0;
        }
    }
    counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Stable sort by value descending; ties keep key order.
fn sort_desc(entries: &mut [(String, f64)]) {
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

/// Stable sort by value ascending; ties keep key order.
fn sort_asc(entries: &mut [(String, f64)]) {
    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
}

fn churned<'a>(view: &'a FilteredView<'a>) -> impl Iterator<Item = &'a CustomerRecord> + 'a {
    view.records().filter(|r| r.status == CustomerStatus::Churned)
}

/// Per-status count series over a categorical key, for grouped/stacked bars.
/// Categories are the key-ordered union over the requested statuses.
fn status_count_series<'a>(
    view: &FilteredView<'a>,
    statuses: &[CustomerStatus],
    key_of: impl Fn(&'a CustomerRecord) -> Option<String>,
) -> (Vec<String>, Vec<BarSeries>) {
    let mut per_status: BTreeMap<CustomerStatus, BTreeMap<String, f64>> = BTreeMap::new();
    let mut categories: BTreeMap<String, ()> = BTreeMap::new();

    for r in view.records() {
        if !statuses.contains(&r.status) {
            continue;
        }
        if let Some(key) = key_of(r) {
            categories.insert(key.clone(), ());
            *per_status
                .entry(r.status)
                .or_default()
                .entry(key)
                .or_insert(0.0) += 1.0;
        }
    }

    let categories: Vec<String> = categories.into_keys().collect();
    let series = CustomerStatus::ALL
        .iter()
        .filter(|s| statuses.contains(s))
        .map(|&s| {
            let counts = per_status.get(&s);
            BarSeries {
                name: s.label().to_string(),
                color: Some(status_color(s)),
                values: categories
                    .iter()
                    .map(|c| counts.and_then(|m| m.get(c)).copied().unwrap_or(0.0))
                    .collect(),
            }
        })
        .collect();
    (categories, series)
}

const CHURNED_AND_STAYED: [CustomerStatus; 2] = [CustomerStatus::Churned, CustomerStatus::Stayed];

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Donut of customer counts per status, most common first.
pub fn status_distribution(view: &FilteredView<'_>) -> ChartDescription {
    let mut counts = count_by(view.records(), |r| Some(r.status.label()));
    sort_desc(&mut counts);
    let colors = counts
        .iter()
        .map(|(label, _)| match label.as_str() {
            "Stayed" => color::STAYED,
            "Churned" => color::CHURNED,
            _ => color::JOINED,
        })
        .collect();
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        "Customer Status Distribution",
        ChartKind::Donut,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
}

/// Horizontal bars of churned counts per churn category, ascending.
pub fn churn_category_breakdown(view: &FilteredView<'_>) -> ChartDescription {
    let mut counts = count_by(churned(view), |r| r.churn_category.as_deref());
    sort_asc(&mut counts);
    let shades = color::reds_scale(&counts.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        "Churn Category Breakdown",
        ChartKind::HorizontalBar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(shades),
        },
    )
    .with_axes("Count", "Category")
}

/// Top 10 churn reasons, shown ascending; each bar tinted by the reason's
/// churn category (first category observed for that reason).
pub fn top_churn_reasons(view: &FilteredView<'_>) -> ChartDescription {
    let mut reason_category: BTreeMap<&str, &str> = BTreeMap::new();
    for r in churned(view) {
        if let (Some(reason), Some(category)) = (r.churn_reason.as_deref(), r.churn_category.as_deref()) {
            reason_category.entry(reason).or_insert(category);
        }
    }

    let mut counts = count_by(churned(view), |r| r.churn_reason.as_deref());
    sort_desc(&mut counts);
    counts.truncate(10);
    counts.reverse();

    let colors = counts
        .iter()
        .map(|(reason, _)| {
            category_color(reason_category.get(reason.as_str()).copied().unwrap_or("Other"))
        })
        .collect();
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        "Top 10 Churn Reasons",
        ChartKind::HorizontalBar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
    .with_axes("Count", "Churn Reason")
}

/// Churned count per tenure month (area), with the view's mean tenure marked.
pub fn churn_by_tenure(view: &FilteredView<'_>) -> ChartDescription {
    let mut by_month: BTreeMap<i32, f64> = BTreeMap::new();
    for r in churned(view) {
        *by_month.entry(r.tenure_months).or_insert(0.0) += 1.0;
    }
    let points: Vec<(f64, f64)> = by_month.into_iter().map(|(m, c)| (m as f64, c)).collect();

    let tenures: Vec<f64> = view.records().map(|r| r.tenure_months as f64).collect();
    let mut chart = ChartDescription::new(
        "Churn Trend by Tenure (Months)",
        ChartKind::Area,
        ChartData::Points {
            series: vec![PointSeries {
                name: "Churned".to_string(),
                color: Some(color::PRIMARY),
                points,
                sizes: None,
                trend: None,
            }],
        },
    )
    .with_axes("Tenure in Months", "Number of Churned Customers");

    if let Some(avg) = stats::mean(&tenures) {
        chart = chart.with_annotation(Annotation::VerticalLine {
            x: avg,
            label: format!("Avg Tenure: {avg:.1}"),
        });
    }
    chart
}

// ---------------------------------------------------------------------------
// Demographics
// ---------------------------------------------------------------------------

/// Churned vs stayed counts per age group; empty groups are dropped.
pub fn churn_by_age_group(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) = status_count_series(view, &CHURNED_AND_STAYED, |r| {
        LIVE_AGE_GROUPS
            .bin_of(r.age)
            .map(|i| LIVE_AGE_GROUPS.labels[i].to_string())
    });
    // Key order is alphabetical; restore bin order.
    let order: Vec<usize> = LIVE_AGE_GROUPS
        .labels
        .iter()
        .filter_map(|l| categories.iter().position(|c| c == l))
        .collect();
    let categories: Vec<String> = order.iter().map(|&i| categories[i].clone()).collect();
    let series = series
        .into_iter()
        .map(|s| BarSeries {
            values: order.iter().map(|&i| s.values[i]).collect(),
            ..s
        })
        .collect();
    ChartDescription::new(
        "Churn Rate by Age Group",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Age Group", "Count")
}

pub fn churn_by_gender(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) =
        status_count_series(view, &CHURNED_AND_STAYED, |r| Some(r.gender.clone()));
    ChartDescription::new(
        "Churn by Gender",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Gender", "Count")
}

pub fn churn_by_marital_status(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) =
        status_count_series(view, &CHURNED_AND_STAYED, |r| Some(r.married.clone()));
    ChartDescription::new(
        "Churn by Marital Status",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Marital Status", "Count")
}

/// Top 10 states by churned count, shown ascending, red-shaded.
pub fn top_states_by_churn(view: &FilteredView<'_>) -> ChartDescription {
    let mut counts = count_by(churned(view), |r| Some(r.state.as_str()));
    sort_desc(&mut counts);
    counts.truncate(10);
    counts.reverse();
    let shades = color::reds_scale(&counts.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        "Top 10 States by Churn Count",
        ChartKind::HorizontalBar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(shades),
        },
    )
    .with_axes("Churned Customers", "State")
}

/// Age vs tenure scatter per status, marker size = total revenue.
pub fn age_vs_tenure(view: &FilteredView<'_>) -> ChartDescription {
    let series = CustomerStatus::ALL
        .iter()
        .map(|&status| {
            let rows: Vec<&CustomerRecord> =
                view.records().filter(|r| r.status == status).collect();
            PointSeries {
                name: status.label().to_string(),
                color: Some(status_color(status)),
                points: rows
                    .iter()
                    .map(|r| (r.age as f64, r.tenure_months as f64))
                    .collect(),
                sizes: Some(rows.iter().map(|r| r.total_revenue).collect()),
                trend: None,
            }
        })
        .collect();
    ChartDescription::new(
        "Age vs Tenure Analysis",
        ChartKind::Scatter,
        ChartData::Points { series },
    )
    .with_axes("Age", "Tenure (Months)")
}

// ---------------------------------------------------------------------------
// Service & contract
// ---------------------------------------------------------------------------

pub fn churn_by_contract_type(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) =
        status_count_series(view, &CHURNED_AND_STAYED, |r| Some(r.contract.clone()));
    ChartDescription::new(
        "Churn Rate by Contract Type",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Contract Type", "Count")
}

/// Stacked counts per internet type over all three statuses; rows without
/// an internet type are excluded.
pub fn churn_by_internet_type(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) =
        status_count_series(view, &CustomerStatus::ALL, |r| r.internet_type.clone());
    ChartDescription::new(
        "Churn Rate by Internet Type",
        ChartKind::StackedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Internet Type", "Count")
}

/// Percentage of customers with each service, per status (stayed/churned).
/// An empty status group reports 0 for every service.
pub fn service_adoption_heatmap(view: &FilteredView<'_>) -> ChartDescription {
    let statuses = [CustomerStatus::Stayed, CustomerStatus::Churned];
    let rows = statuses
        .iter()
        .map(|&status| {
            let rows: Vec<&CustomerRecord> =
                view.records().filter(|r| r.status == status).collect();
            SERVICE_FLAGS
                .iter()
                .map(|(_, get)| {
                    if rows.is_empty() {
                        0.0
                    } else {
                        let yes = rows.iter().filter(|r| get(r) == Some("Yes")).count();
                        yes as f64 / rows.len() as f64 * 100.0
                    }
                })
                .collect()
        })
        .collect();
    ChartDescription::new(
        "Service Adoption Heatmap (% of Customers)",
        ChartKind::Heatmap,
        ChartData::Matrix {
            x_labels: SERVICE_FLAGS.iter().map(|(name, _)| name.to_string()).collect(),
            y_labels: statuses.iter().map(|s| s.label().to_string()).collect(),
            rows,
        },
    )
    .with_axes("Services", "Customer Status")
}

pub fn payment_method_vs_churn(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) =
        status_count_series(view, &CHURNED_AND_STAYED, |r| Some(r.payment_method.clone()));
    ChartDescription::new(
        "Payment Method vs Churn",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Payment Method", "Count")
}

/// Donut of churned customers by paperless-billing flag.
pub fn paperless_billing_impact(view: &FilteredView<'_>) -> ChartDescription {
    let counts = count_by(churned(view), |r| Some(r.paperless_billing.as_str()));
    let palette = [color::CHURNED, Rgb::new(0xff, 0x99, 0x99)];
    let colors = counts
        .iter()
        .enumerate()
        .map(|(i, _)| palette[i % palette.len()])
        .collect();
    let (labels, values) = counts.into_iter().unzip();
    ChartDescription::new(
        "Paperless Billing Impact on Churn",
        ChartKind::Donut,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// Revenue summed over churned rows per churn category, descending, with the
/// grand total reported separately.
pub fn revenue_lost_to_churn(view: &FilteredView<'_>) -> ChartDescription {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total = 0.0;
    for r in churned(view) {
        total += r.total_revenue;
        if let Some(cat) = r.churn_category.as_deref() {
            *by_category.entry(cat).or_insert(0.0) += r.total_revenue;
        }
    }
    let mut entries: Vec<(String, f64)> = by_category
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    sort_desc(&mut entries);
    let shades = color::reds_scale(&entries.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    let (labels, values) = entries.into_iter().unzip();
    ChartDescription::new(
        "Revenue Lost to Churn by Category",
        ChartKind::Bar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(shades),
        },
    )
    .with_axes("Churn Category", "Total Revenue Lost ($)")
    .with_annotation(Annotation::GrandTotal {
        label: "Total Revenue Lost".to_string(),
        value: total,
    })
}

/// Overlaid monthly-charge histograms per status (30 suggested bins).
pub fn monthly_charge_distribution(view: &FilteredView<'_>) -> ChartDescription {
    ChartDescription::new(
        "Monthly Charge Distribution",
        ChartKind::Histogram,
        ChartData::Samples {
            series: status_samples(view, |r| r.monthly_charge),
            suggested_bins: Some(30),
        },
    )
    .with_axes("Monthly Charge ($)", "Count")
}

/// Box plot of total revenue per status.
pub fn total_revenue_distribution(view: &FilteredView<'_>) -> ChartDescription {
    ChartDescription::new(
        "Total Revenue Distribution by Customer Status",
        ChartKind::BoxPlot,
        ChartData::Samples {
            series: status_samples(view, |r| r.total_revenue),
            suggested_bins: None,
        },
    )
    .with_axes("Customer Status", "Total Revenue ($)")
}

fn status_samples(
    view: &FilteredView<'_>,
    value_of: impl Fn(&CustomerRecord) -> f64,
) -> Vec<SampleSeries> {
    CustomerStatus::ALL
        .iter()
        .map(|&status| SampleSeries {
            name: status.label().to_string(),
            color: Some(status_color(status)),
            values: view
                .records()
                .filter(|r| r.status == status)
                .map(&value_of)
                .collect(),
        })
        .collect()
}

/// Mean total revenue per contract type, churned vs stayed.
pub fn revenue_by_contract_type(view: &FilteredView<'_>) -> ChartDescription {
    let mut sums: BTreeMap<(CustomerStatus, String), (f64, usize)> = BTreeMap::new();
    let mut categories: BTreeMap<String, ()> = BTreeMap::new();
    for r in view.records() {
        if !CHURNED_AND_STAYED.contains(&r.status) {
            continue;
        }
        categories.insert(r.contract.clone(), ());
        let entry = sums.entry((r.status, r.contract.clone())).or_insert((0.0, 0));
        entry.0 += r.total_revenue;
        entry.1 += 1;
    }
    let categories: Vec<String> = categories.into_keys().collect();
    let series = [CustomerStatus::Stayed, CustomerStatus::Churned]
        .iter()
        .map(|&status| BarSeries {
            name: status.label().to_string(),
            color: Some(status_color(status)),
            values: categories
                .iter()
                .map(|c| {
                    sums.get(&(status, c.clone()))
                        .map(|(sum, n)| sum / *n as f64)
                        .unwrap_or(0.0)
                })
                .collect(),
        })
        .collect();
    ChartDescription::new(
        "Average Revenue by Contract Type",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Contract Type", "Average Total Revenue ($)")
}

/// Stacked totals of the four charge components per status.
pub fn charges_breakdown(view: &FilteredView<'_>) -> ChartDescription {
    type Component = (&'static str, fn(&CustomerRecord) -> f64, Rgb);
    let components: [Component; 4] = [
        ("Total Charges", |r| r.total_charges, color::PRIMARY),
        ("Refunds", |r| r.total_refunds, Rgb::new(0xe7, 0x4c, 0x3c)),
        (
            "Extra Data Charges",
            |r| r.total_extra_data_charges,
            Rgb::new(0xf3, 0x9c, 0x12),
        ),
        (
            "Long Distance Charges",
            |r| r.total_long_distance_charges,
            Rgb::new(0x9b, 0x59, 0xb6),
        ),
    ];

    let categories: Vec<String> = CustomerStatus::ALL.iter().map(|s| s.label().to_string()).collect();
    let series = components
        .iter()
        .map(|(name, value_of, color)| BarSeries {
            name: name.to_string(),
            color: Some(*color),
            values: CustomerStatus::ALL
                .iter()
                .map(|&status| {
                    view.records()
                        .filter(|r| r.status == status)
                        .map(value_of)
                        .sum()
                })
                .collect(),
        })
        .collect();
    ChartDescription::new(
        "Charges Breakdown by Customer Status",
        ChartKind::StackedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Customer Status", "Total Amount ($)")
}

/// Monthly charge vs tenure scatter per status, with a least-squares trend
/// line for each status that has enough spread.
pub fn monthly_charge_vs_tenure(view: &FilteredView<'_>) -> ChartDescription {
    let series = CustomerStatus::ALL
        .iter()
        .map(|&status| {
            let points: Vec<(f64, f64)> = view
                .records()
                .filter(|r| r.status == status)
                .map(|r| (r.tenure_months as f64, r.monthly_charge))
                .collect();
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let trend = stats::linear_fit(&xs, &ys).map(|(slope, intercept)| TrendLine {
                slope,
                intercept,
            });
            PointSeries {
                name: status.label().to_string(),
                color: Some(status_color(status)),
                points,
                sizes: None,
                trend,
            }
        })
        .collect();
    ChartDescription::new(
        "Monthly Charge vs Tenure (with Trend Lines)",
        ChartKind::Scatter,
        ChartData::Points { series },
    )
    .with_axes("Tenure (Months)", "Monthly Charge ($)")
}

// ---------------------------------------------------------------------------
// Referrals & engagement
// ---------------------------------------------------------------------------

/// Churn rate per referral count, as a line over numeric x.
pub fn churn_rate_by_referrals(view: &FilteredView<'_>) -> ChartDescription {
    let mut groups: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    for r in view.records() {
        let entry = groups.entry(r.referrals).or_insert((0, 0));
        entry.0 += 1;
        if r.status == CustomerStatus::Churned {
            entry.1 += 1;
        }
    }
    let points = groups
        .into_iter()
        .map(|(referrals, (total, churned))| {
            (referrals as f64, churned as f64 / total as f64 * 100.0)
        })
        .collect();
    ChartDescription::new(
        "Churn Rate by Number of Referrals",
        ChartKind::Line,
        ChartData::Points {
            series: vec![PointSeries {
                name: "Churn Rate".to_string(),
                color: Some(color::PRIMARY),
                points,
                sizes: None,
                trend: None,
            }],
        },
    )
    .with_axes("Number of Referrals", "Churn Rate (%)")
}

/// Overlaid referral-count histograms per status.
pub fn referral_distribution(view: &FilteredView<'_>) -> ChartDescription {
    ChartDescription::new(
        "Referral Distribution by Customer Status",
        ChartKind::Histogram,
        ChartData::Samples {
            series: status_samples(view, |r| r.referrals as f64),
            suggested_bins: None,
        },
    )
    .with_axes("Number of Referrals", "Count")
}

/// Mean referral count per status.
pub fn avg_referrals_by_status(view: &FilteredView<'_>) -> ChartDescription {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut colors = Vec::new();
    for &status in &CustomerStatus::ALL {
        let refs: Vec<f64> = view
            .records()
            .filter(|r| r.status == status)
            .map(|r| r.referrals as f64)
            .collect();
        if let Some(avg) = stats::mean(&refs) {
            labels.push(status.label().to_string());
            values.push(avg);
            colors.push(status_color(status));
        }
    }
    ChartDescription::new(
        "Average Referrals by Customer Status",
        ChartKind::Bar,
        ChartData::Categorical {
            labels,
            values,
            colors: Some(colors),
        },
    )
    .with_axes("Customer Status", "Average Number of Referrals")
}

/// Churned vs stayed counts per value deal; rows without a deal count as
/// "No Deal".
pub fn value_deal_impact(view: &FilteredView<'_>) -> ChartDescription {
    let (categories, series) = status_count_series(view, &CHURNED_AND_STAYED, |r| {
        Some(r.value_deal.clone().unwrap_or_else(|| "No Deal".to_string()))
    });
    ChartDescription::new(
        "Value Deal Impact on Customer Status",
        ChartKind::GroupedBar,
        ChartData::MultiSeries { categories, series },
    )
    .with_axes("Value Deal Type", "Count")
}

// ---------------------------------------------------------------------------
// Advanced insights
// ---------------------------------------------------------------------------

/// Pearson correlation matrix over the numeric features plus a 0/1 churn
/// indicator, restricted to settled customers (stayed or churned; joined
/// rows are excluded). Undefined cells (constant columns) report 0.
pub fn correlation_heatmap(view: &FilteredView<'_>) -> ChartDescription {
    type Feature = (&'static str, fn(&CustomerRecord) -> f64);
    let features: [Feature; 6] = [
        ("Age", |r| r.age as f64),
        ("Tenure in Months", |r| r.tenure_months as f64),
        ("Monthly Charge", |r| r.monthly_charge),
        ("Total Revenue", |r| r.total_revenue),
        ("Number of Referrals", |r| r.referrals as f64),
        ("Churned", |r| {
            if r.status == CustomerStatus::Churned {
                1.0
            } else {
                0.0
            }
        }),
    ];

    let settled: Vec<&CustomerRecord> = view
        .records()
        .filter(|r| CHURNED_AND_STAYED.contains(&r.status))
        .collect();
    let columns: Vec<Vec<f64>> = features
        .iter()
        .map(|(_, value_of)| settled.iter().map(|r| value_of(r)).collect())
        .collect();

    let labels: Vec<String> = features.iter().map(|(name, _)| name.to_string()).collect();
    let rows = columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| stats::pearson(a, b).unwrap_or(0.0))
                .collect()
        })
        .collect();
    ChartDescription::new(
        "Feature Correlation Heatmap",
        ChartKind::Heatmap,
        ChartData::Matrix {
            x_labels: labels.clone(),
            y_labels: labels,
            rows,
        },
    )
}

/// Churn rate per tenure bucket; empty buckets are dropped.
pub fn tenure_vs_churn_rate(view: &FilteredView<'_>) -> ChartDescription {
    let mut totals = vec![0usize; LIVE_TENURE_BUCKETS.labels.len()];
    let mut churned_counts = vec![0usize; LIVE_TENURE_BUCKETS.labels.len()];
    for r in view.records() {
        if let Some(i) = LIVE_TENURE_BUCKETS.bin_of(r.tenure_months) {
            totals[i] += 1;
            if r.status == CustomerStatus::Churned {
                churned_counts[i] += 1;
            }
        }
    }
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (i, label) in LIVE_TENURE_BUCKETS.labels.iter().enumerate() {
        if totals[i] > 0 {
            labels.push(label.to_string());
            values.push(churned_counts[i] as f64 / totals[i] as f64 * 100.0);
        }
    }
    ChartDescription::new(
        "Churn Rate by Tenure Buckets (Months)",
        ChartKind::Line,
        ChartData::Categorical {
            labels,
            values,
            colors: None,
        },
    )
    .with_axes("Tenure Bucket (Months)", "Churn Rate (%)")
}

/// Violin of subscribed-service counts, churned vs stayed.
pub fn service_count_vs_churn(view: &FilteredView<'_>) -> ChartDescription {
    let series = CHURNED_AND_STAYED
        .iter()
        .rev() // stayed first, matching the status legend order
        .map(|&status| SampleSeries {
            name: status.label().to_string(),
            color: Some(status_color(status)),
            values: view
                .records()
                .filter(|r| r.status == status)
                .map(|r| r.service_count() as f64)
                .collect(),
        })
        .collect();
    ChartDescription::new(
        "Service Count Distribution by Customer Status",
        ChartKind::Violin,
        ChartData::Samples {
            series,
            suggested_bins: None,
        },
    )
    .with_axes("Customer Status", "Number of Services")
}

/// Sunburst: contract → internet type → status, sized by customer count.
/// Rows without an internet type are excluded.
pub fn risk_segments(view: &FilteredView<'_>) -> ChartDescription {
    let mut tree: BTreeMap<String, BTreeMap<String, BTreeMap<CustomerStatus, f64>>> =
        BTreeMap::new();
    for r in view.records() {
        if let Some(net) = &r.internet_type {
            *tree
                .entry(r.contract.clone())
                .or_default()
                .entry(net.clone())
                .or_default()
                .entry(r.status)
                .or_insert(0.0) += 1.0;
        }
    }

    let contract_colors = color::ColorMap::new(tree.keys().cloned().collect::<Vec<_>>());
    let roots = tree
        .into_iter()
        .map(|(contract, nets)| {
            let children: Vec<SunburstNode> = nets
                .into_iter()
                .map(|(net, statuses)| {
                    let leaves: Vec<SunburstNode> = statuses
                        .into_iter()
                        .map(|(status, count)| SunburstNode {
                            label: status.label().to_string(),
                            value: count,
                            color: Some(status_color(status)),
                            children: Vec::new(),
                        })
                        .collect();
                    SunburstNode {
                        label: net,
                        value: leaves.iter().map(|l| l.value).sum(),
                        color: None,
                        children: leaves,
                    }
                })
                .collect();
            SunburstNode {
                value: children.iter().map(|c| c.value).sum(),
                color: Some(contract_colors.color_for(&contract)),
                label: contract,
                children,
            }
        })
        .collect();
    ChartDescription::new(
        "Customer Segmentation: Contract → Internet Type → Status",
        ChartKind::Sunburst,
        ChartData::Hierarchy { roots },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterSpec};
    use crate::data::model::Dataset;
    use crate::data::testutil::record;

    fn all_indices(dataset: &Dataset) -> Vec<usize> {
        filtered_indices(dataset, &FilterSpec::default())
    }

    #[test]
    fn status_distribution_sorts_by_count_desc() {
        let ds = Dataset::new(vec![
            record("1", "CA", 30, CustomerStatus::Stayed),
            record("2", "CA", 30, CustomerStatus::Stayed),
            record("3", "CA", 30, CustomerStatus::Churned),
        ]);
        let idx = all_indices(&ds);
        let chart = status_distribution(&FilteredView::new(&ds, &idx));
        match chart.data {
            ChartData::Categorical { labels, values, .. } => {
                assert_eq!(labels, ["Stayed", "Churned"]);
                assert_eq!(values, [2.0, 1.0]);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn top_n_truncates_and_breaks_ties_on_key() {
        // Four states, two tied at one churned row each: CA and TX tie,
        // key order puts CA before TX; top-3 keeps NY(3), AZ(2), CA(1).
        let mut records = Vec::new();
        for i in 0..3 {
            records.push(record(&format!("n{i}"), "NY", 40, CustomerStatus::Churned));
        }
        for i in 0..2 {
            records.push(record(&format!("a{i}"), "AZ", 40, CustomerStatus::Churned));
        }
        records.push(record("c", "CA", 40, CustomerStatus::Churned));
        records.push(record("t", "TX", 40, CustomerStatus::Churned));
        let ds = Dataset::new(records);
        let idx = all_indices(&ds);
        let view = FilteredView::new(&ds, &idx);

        let mut counts = count_by(churned(&view), |r| Some(r.state.as_str()));
        sort_desc(&mut counts);
        counts.truncate(3);
        let labels: Vec<&str> = counts.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(labels, ["NY", "AZ", "CA"]);
    }

    #[test]
    fn top_n_series_length_is_min_of_n_and_groups() {
        let ds = Dataset::new(vec![
            record("1", "CA", 30, CustomerStatus::Churned),
            record("2", "TX", 30, CustomerStatus::Churned),
        ]);
        let idx = all_indices(&ds);
        let chart = top_states_by_churn(&FilteredView::new(&ds, &idx));
        match chart.data {
            ChartData::Categorical { labels, .. } => assert_eq!(labels.len(), 2),
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn age_group_boundary_lands_in_higher_bin() {
        let ds = Dataset::new(vec![
            record("1", "CA", 25, CustomerStatus::Churned),
            record("2", "CA", 24, CustomerStatus::Stayed),
        ]);
        let idx = all_indices(&ds);
        let chart = churn_by_age_group(&FilteredView::new(&ds, &idx));
        match chart.data {
            ChartData::MultiSeries { categories, series } => {
                assert_eq!(categories, ["18-25", "26-35"]);
                let churned_series = series.iter().find(|s| s.name == "Churned").unwrap();
                // Age 25 is in 26-35 under the left-closed convention.
                assert_eq!(churned_series.values, [0.0, 1.0]);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn revenue_lost_reports_grand_total_separately() {
        let mut a = record("1", "CA", 30, CustomerStatus::Churned);
        a.total_revenue = 100.0;
        a.churn_category = Some("Price".into());
        let mut b = record("2", "CA", 30, CustomerStatus::Churned);
        b.total_revenue = 50.0;
        b.churn_category = Some("Competitor".into());
        let mut c = record("3", "CA", 30, CustomerStatus::Stayed);
        c.total_revenue = 999.0;
        let ds = Dataset::new(vec![a, b, c]);
        let idx = all_indices(&ds);

        let chart = revenue_lost_to_churn(&FilteredView::new(&ds, &idx));
        match &chart.data {
            ChartData::Categorical { labels, values, .. } => {
                assert_eq!(labels[0], "Price");
                assert_eq!(values[0], 100.0);
            }
            other => panic!("unexpected data: {other:?}"),
        }
        assert!(chart
            .annotations
            .iter()
            .any(|a| matches!(a, Annotation::GrandTotal { value, .. } if *value == 150.0)));
    }

    #[test]
    fn correlation_heatmap_excludes_joined_rows() {
        let mut rows = Vec::new();
        for i in 0..5 {
            let mut r = record(&format!("s{i}"), "CA", 30 + i, CustomerStatus::Stayed);
            r.tenure_months = 20 + i;
            rows.push(r);
        }
        for i in 0..5 {
            let mut r = record(&format!("c{i}"), "CA", 50 + i, CustomerStatus::Churned);
            r.tenure_months = 2 + i;
            rows.push(r);
        }
        rows.push(record("j", "CA", 99, CustomerStatus::Joined));
        let ds = Dataset::new(rows);
        let idx = all_indices(&ds);

        let chart = correlation_heatmap(&FilteredView::new(&ds, &idx));
        match chart.data {
            ChartData::Matrix { x_labels, rows, .. } => {
                assert_eq!(x_labels.len(), 6);
                let churn_idx = x_labels.iter().position(|l| l == "Churned").unwrap();
                let tenure_idx = x_labels.iter().position(|l| l == "Tenure in Months").unwrap();
                // Diagonal is exactly 1, churn correlates negatively with tenure.
                assert!((rows[churn_idx][churn_idx] - 1.0).abs() < 1e-12);
                assert!(rows[churn_idx][tenure_idx] < 0.0);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn empty_view_yields_empty_series_everywhere() {
        let ds = Dataset::new(Vec::new());
        let idx = all_indices(&ds);
        let view = FilteredView::new(&ds, &idx);
        for chart in crate::charts::DatasetChart::ALL {
            let desc = chart.build(&view); // must not panic
            assert!(!desc.title.is_empty());
        }
    }

    #[test]
    fn tenure_bucket_boundary_stays_in_lower_bucket() {
        let mut a = record("1", "CA", 30, CustomerStatus::Churned);
        a.tenure_months = 6;
        let mut b = record("2", "CA", 30, CustomerStatus::Stayed);
        b.tenure_months = 6;
        let ds = Dataset::new(vec![a, b]);
        let idx = all_indices(&ds);

        let chart = tenure_vs_churn_rate(&FilteredView::new(&ds, &idx));
        match chart.data {
            ChartData::Categorical { labels, values, .. } => {
                assert_eq!(labels, ["0-6"]);
                assert_eq!(values, [50.0]);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn value_deal_missing_becomes_no_deal() {
        let mut a = record("1", "CA", 30, CustomerStatus::Stayed);
        a.value_deal = None;
        let mut b = record("2", "CA", 30, CustomerStatus::Churned);
        b.value_deal = Some("Deal 1".into());
        let ds = Dataset::new(vec![a, b]);
        let idx = all_indices(&ds);

        let chart = value_deal_impact(&FilteredView::new(&ds, &idx));
        match chart.data {
            ChartData::MultiSeries { categories, .. } => {
                assert_eq!(categories, ["Deal 1", "No Deal"]);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }
}
