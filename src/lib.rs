//! Core of a customer-churn analytics dashboard: load the churn table and
//! the precomputed prediction tables, filter them, and describe every
//! dashboard chart as plain data for whatever renderer sits on top.
//!
//! The three layers, bottom to top:
//! * [`data`] – CSV loading, the row models, filtering, the dataset cache;
//! * [`state`] – per-session filter state and KPI aggregation;
//! * [`charts`] – the closed catalogs of live and prediction reports.

pub mod charts;
pub mod color;
pub mod data;
pub mod state;

pub use charts::{ChartDescription, DatasetChart, PredictionChart};
pub use data::filter::{FilterSpec, RangeFilter};
pub use data::loader::{load_dataset, load_dataset_cached, DataError};
pub use data::model::{CategoricalField, CustomerStatus, Dataset};
pub use data::prediction::PredictionReport;
pub use state::{FilterEngine, KpiSummary};
