//! Command-line front end: load the tables, apply no filters, and print
//! KPIs or a chart description as JSON. Mostly a smoke-test harness for
//! the library; interactive filtering belongs to an embedding dashboard.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;

use churnlens::data::loader;
use churnlens::{DatasetChart, FilterEngine, PredictionChart, PredictionReport};

struct Args {
    churn_csv: PathBuf,
    predictions: Option<(PathBuf, PathBuf, PathBuf)>,
    chart: Option<String>,
}

const USAGE: &str = "usage: churnlens <churn.csv> \
    [<scored.csv> <churners.csv> <summary.csv>] [chart name]";

/// All arguments are positional: the churn table, optionally the three
/// prediction tables, optionally a chart name from either catalog.
fn parse_args() -> Result<Args> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("{USAGE}");
    }
    let churn_csv = PathBuf::from(args.remove(0));

    let (predictions, chart) = match args.len() {
        0 => (None, None),
        1 => (None, Some(args.remove(0))),
        3 | 4 => {
            let scored = PathBuf::from(args.remove(0));
            let churners = PathBuf::from(args.remove(0));
            let summary = PathBuf::from(args.remove(0));
            (Some((scored, churners, summary)), args.pop())
        }
        _ => bail!("{USAGE}"),
    };
    Ok(Args {
        churn_csv,
        predictions,
        chart,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let dataset = loader::load_dataset_cached(&args.churn_csv)
        .with_context(|| format!("loading {}", args.churn_csv.display()))?;
    info!("loaded {} customers", dataset.len());

    let report = match &args.predictions {
        Some((scored, churners, summary)) => Some(
            PredictionReport::load(scored, churners, summary)
                .context("loading prediction tables")?,
        ),
        None => None,
    };

    let engine = FilterEngine::new(Arc::clone(&dataset));
    let kpis = engine.compute_kpis();
    println!("{}", serde_json::to_string_pretty(&kpis)?);

    match &args.chart {
        Some(name) => {
            let view = engine.current_view();
            let description = if let Some(chart) = DatasetChart::from_name(name) {
                chart.build(&view)
            } else if let Some(chart) = PredictionChart::from_name(name) {
                match &report {
                    Some(report) => chart.build(report),
                    None => bail!("chart {name:?} needs the prediction tables"),
                }
            } else {
                bail!("unknown chart: {name:?}");
            };
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        None => {
            // No chart requested: list the catalogs.
            for chart in DatasetChart::ALL {
                println!("{}", chart.name());
            }
            if report.is_some() {
                for chart in PredictionChart::ALL {
                    println!("{}", chart.name());
                }
            }
        }
    }
    Ok(())
}
