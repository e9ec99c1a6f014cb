//! End-to-end: CSV files on disk, through loading, filtering, KPIs and
//! chart building.

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use churnlens::charts::ChartData;
use churnlens::data::loader;
use churnlens::{
    DatasetChart, FilterEngine, FilterSpec, PredictionChart, PredictionReport, RangeFilter,
};

const CHURN_HEADER: &str = "Customer_ID,Gender,Age,Married,State,Number_of_Referrals,\
Tenure_in_Months,Value_Deal,Phone_Service,Multiple_Lines,Internet_Type,Online_Security,\
Online_Backup,Device_Protection_Plan,Premium_Support,Streaming_TV,Streaming_Movies,\
Streaming_Music,Unlimited_Data,Contract,Paperless_Billing,Payment_Method,Monthly_Charge,\
Total_Charges,Total_Refunds,Total_Extra_Data_Charges,Total_Long_Distance_Charges,\
Total_Revenue,Customer_Status,Churn_Category,Churn_Reason";

fn churn_row(id: &str, state: &str, age: i32, status: &str) -> String {
    let (category, reason) = if status == "Churned" {
        ("Price", "Price too high")
    } else {
        ("", "")
    };
    format!(
        "{id},Female,{age},No,{state},2,12,,Yes,No,Fiber Optic,No,No,No,No,Yes,Yes,No,Yes,\
         Month-to-Month,Yes,Credit Card,70.00,840.00,0.00,0.00,0.00,840.00,{status},\
         {category},{reason}"
    )
}

fn write_lines(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn sample_churn_file() -> NamedTempFile {
    let mut lines = vec![CHURN_HEADER.to_string()];
    lines.push(churn_row("C1", "CA", 25, "Stayed"));
    lines.push(churn_row("C2", "CA", 42, "Churned"));
    lines.push(churn_row("C3", "CA", 63, "Stayed"));
    lines.push(churn_row("C4", "TX", 30, "Churned"));
    lines.push(churn_row("C5", "TX", 55, "Stayed"));
    lines.push(churn_row("C6", "NY", 47, "Joined"));
    write_lines(&lines)
}

#[test]
fn load_filter_and_compute_kpis() {
    let file = sample_churn_file();
    let dataset = Arc::new(loader::load_dataset(file.path()).unwrap());

    let mut engine = FilterEngine::new(Arc::clone(&dataset));
    assert_eq!(engine.compute_kpis().total, 6);

    engine.set_filters(FilterSpec {
        states: Some(BTreeSet::from(["CA".to_string()])),
        ..Default::default()
    });
    let kpis = engine.compute_kpis();
    assert_eq!(kpis.total, 3);
    assert_eq!(kpis.churned, 1);
    assert!((kpis.churn_rate_pct - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(kpis.avg_tenure_months, Some(12.0));
}

#[test]
fn filters_combine_and_reset_wholesale() {
    let file = sample_churn_file();
    let dataset = Arc::new(loader::load_dataset(file.path()).unwrap());
    let mut engine = FilterEngine::new(dataset);

    engine.set_filters(FilterSpec {
        states: Some(BTreeSet::from(["CA".to_string(), "TX".to_string()])),
        age: Some(RangeFilter::new(40, 60)),
        ..Default::default()
    });
    assert_eq!(engine.current_view().len(), 2); // C2 and C5

    engine.set_filters(FilterSpec::default());
    assert_eq!(engine.current_view().len(), 6);
}

#[test]
fn every_live_chart_builds_from_a_filtered_view() {
    let file = sample_churn_file();
    let dataset = Arc::new(loader::load_dataset(file.path()).unwrap());
    let mut engine = FilterEngine::new(dataset);
    engine.set_filters(FilterSpec {
        states: Some(BTreeSet::from(["CA".to_string()])),
        ..Default::default()
    });

    let view = engine.current_view();
    for chart in DatasetChart::ALL {
        let description = chart.build(&view);
        assert!(!description.title.is_empty());
        // The description must round-trip through JSON for the front end.
        let json = serde_json::to_string(&description).unwrap();
        assert!(json.contains(&description.title));
    }
}

#[test]
fn status_distribution_reflects_the_active_filter() {
    let file = sample_churn_file();
    let dataset = Arc::new(loader::load_dataset(file.path()).unwrap());
    let mut engine = FilterEngine::new(dataset);
    engine.set_filters(FilterSpec {
        states: Some(BTreeSet::from(["CA".to_string()])),
        ..Default::default()
    });

    let chart = DatasetChart::StatusDistribution.build(&engine.current_view());
    match chart.data {
        ChartData::Categorical { labels, values, .. } => {
            assert_eq!(labels, ["Stayed", "Churned"]);
            assert_eq!(values, [2.0, 1.0]);
        }
        other => panic!("unexpected data: {other:?}"),
    }
}

#[test]
fn cached_dataset_is_shared_across_loads() {
    let file = sample_churn_file();
    let a = loader::load_dataset_cached(file.path()).unwrap();
    let b = loader::load_dataset_cached(file.path()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    loader::invalidate(file.path());
}

#[test]
fn prediction_report_feeds_the_prediction_catalog() {
    let scored = write_lines(&[
        "Customer_ID,Churn_Probability,Risk_Level".to_string(),
        "C1,0.92,Critical".to_string(),
        "C2,0.41,Low".to_string(),
    ]);
    let churners = write_lines(&[
        "Customer_ID,Gender,Age,Married,State,Contract,Payment_Method,Tenure_in_Months,\
         Number_of_Referrals,Monthly_Charge,Total_Revenue,Total_Refunds,Churn_Probability,\
         Risk_Level,Top_Risk_Factors"
            .to_string(),
        "C1,Male,45,No,CA,Month-to-Month,Credit Card,5,0,95.50,477.50,0.00,0.92,Critical,\
         \"Month-to-Month Contract,High Monthly Charge\""
            .to_string(),
    ]);
    let summary = write_lines(&[
        "predicted_churners,avg_churn_probability,total_revenue_at_risk".to_string(),
        "1,0.92,477.50".to_string(),
    ]);

    let report =
        PredictionReport::load(scored.path(), churners.path(), summary.path()).unwrap();
    assert_eq!(report.all_customers.len(), 2);
    assert_eq!(report.churners.len(), 1);

    for chart in PredictionChart::ALL {
        let description = chart.build(&report);
        assert!(!description.title.is_empty());
    }

    let dashboard = PredictionChart::CombinedDashboard.build(&report);
    match dashboard.data {
        ChartData::Composite { columns, panels } => {
            assert_eq!(columns, 3);
            assert_eq!(panels.len(), 12);
        }
        other => panic!("unexpected data: {other:?}"),
    }
}

#[test]
fn chart_names_resolve_in_both_catalogs() {
    assert_eq!(
        DatasetChart::from_name("Customer Status Distribution"),
        Some(DatasetChart::StatusDistribution)
    );
    assert_eq!(
        PredictionChart::from_name("Top Risk Factors"),
        Some(PredictionChart::TopRiskFactors)
    );
    assert_eq!(DatasetChart::from_name("Not a Chart"), None);
}
