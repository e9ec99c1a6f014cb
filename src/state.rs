use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::data::filter::{filtered_indices, FilterSpec, FilteredView};
use crate::data::model::{CustomerStatus, Dataset};

// ---------------------------------------------------------------------------
// KpiSummary
// ---------------------------------------------------------------------------

/// Scalar aggregates over the current filtered view.
///
/// Defined for the empty view: all counts 0, churn rate 0.0, means `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total: usize,
    pub joined: usize,
    pub stayed: usize,
    pub churned: usize,
    /// Churned share of the view, in percent; 0.0 when the view is empty.
    pub churn_rate_pct: f64,
    pub avg_revenue: Option<f64>,
    pub avg_monthly_charge: Option<f64>,
    pub avg_tenure_months: Option<f64>,
}

// ---------------------------------------------------------------------------
// FilterEngine – per-session filter state over a shared dataset
// ---------------------------------------------------------------------------

/// Holds the active [`FilterSpec`] and the cached filtered row indices.
///
/// The dataset is read-only and may be shared across sessions via `Arc`;
/// each session owns its own engine. All operations are synchronous,
/// in-memory recomputations.
pub struct FilterEngine {
    dataset: Arc<Dataset>,
    spec: FilterSpec,
    visible: Vec<usize>,
}

impl FilterEngine {
    /// Start with no restrictions: every row visible.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let visible = (0..dataset.len()).collect();
        FilterEngine {
            dataset,
            spec: FilterSpec::default(),
            visible,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Replace the active spec wholesale and recompute the view.
    ///
    /// Each call supplies the complete desired spec; fields left `None`
    /// mean "no restriction", not "keep the previous predicate".
    pub fn set_filters(&mut self, spec: FilterSpec) {
        self.spec = spec;
        self.visible = filtered_indices(&self.dataset, &self.spec);
        debug!(
            "filters applied: {}/{} rows visible",
            self.visible.len(),
            self.dataset.len()
        );
    }

    /// The current filtered view; pure projection of dataset + spec.
    pub fn current_view(&self) -> FilteredView<'_> {
        FilteredView::new(&self.dataset, &self.visible)
    }

    /// Derive the KPI scalars from the current view.
    pub fn compute_kpis(&self) -> KpiSummary {
        let view = self.current_view();
        let total = view.len();

        let mut joined = 0usize;
        let mut stayed = 0usize;
        let mut churned = 0usize;
        let mut revenue = 0.0f64;
        let mut monthly = 0.0f64;
        let mut tenure = 0.0f64;

        for r in view.records() {
            match r.status {
                CustomerStatus::Joined => joined += 1,
                CustomerStatus::Stayed => stayed += 1,
                CustomerStatus::Churned => churned += 1,
            }
            revenue += r.total_revenue;
            monthly += r.monthly_charge;
            tenure += r.tenure_months as f64;
        }

        let churn_rate_pct = if total == 0 {
            0.0
        } else {
            churned as f64 / total as f64 * 100.0
        };
        let mean = |sum: f64| {
            if total == 0 {
                None
            } else {
                Some(sum / total as f64)
            }
        };

        KpiSummary {
            total,
            joined,
            stayed,
            churned,
            churn_rate_pct,
            avg_revenue: mean(revenue),
            avg_monthly_charge: mean(monthly),
            avg_tenure_months: mean(tenure),
        }
    }
}
