use std::collections::BTreeSet;

use super::model::{CustomerRecord, Dataset};

// ---------------------------------------------------------------------------
// FilterSpec: per-field inclusion predicates over the churn table
// ---------------------------------------------------------------------------

/// Inclusive numeric range predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: i32,
    pub max: i32,
}

impl RangeFilter {
    pub fn new(min: i32, max: i32) -> Self {
        RangeFilter { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The active set of per-field predicates. A row is visible when every
/// predicate accepts it (logical AND).
///
/// Per-field rule, fixed here so "empty selection" can never silently hide
/// everything: `None` *and* `Some(empty set)* both mean "no restriction".
/// A record missing a value for a *restricted* field fails that predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub states: Option<BTreeSet<String>>,
    pub age: Option<RangeFilter>,
    pub contracts: Option<BTreeSet<String>>,
    pub genders: Option<BTreeSet<String>>,
    pub internet_types: Option<BTreeSet<String>>,
}

fn member(allowed: &Option<BTreeSet<String>>, value: Option<&str>) -> bool {
    match allowed {
        None => true,
        Some(set) if set.is_empty() => true,
        Some(set) => match value {
            Some(v) => set.contains(v),
            None => false,
        },
    }
}

impl FilterSpec {
    /// Whether a single record passes every active predicate. Predicates are
    /// pure, so evaluation order does not affect the result.
    pub fn matches(&self, record: &CustomerRecord) -> bool {
        member(&self.states, Some(&record.state))
            && self.age.map_or(true, |r| r.contains(record.age))
            && member(&self.contracts, Some(&record.contract))
            && member(&self.genders, Some(&record.gender))
            && member(&self.internet_types, record.internet_type.as_deref())
    }

    /// True when no field carries an effective restriction.
    pub fn is_unrestricted(&self) -> bool {
        fn unset(s: &Option<BTreeSet<String>>) -> bool {
            s.as_ref().map_or(true, |set| set.is_empty())
        }
        unset(&self.states)
            && self.age.is_none()
            && unset(&self.contracts)
            && unset(&self.genders)
            && unset(&self.internet_types)
    }
}

/// Indices of dataset rows passing all active filters, in row order.
pub fn filtered_indices(dataset: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView: a borrowed, ordered subsequence of the dataset
// ---------------------------------------------------------------------------

/// The subsequence of dataset rows satisfying the active [`FilterSpec`].
/// Pure projection; fully recomputed on every spec change.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, indices: &'a [usize]) -> Self {
        FilteredView { dataset, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    /// Visible records in row order.
    pub fn records(&self) -> impl Iterator<Item = &'a CustomerRecord> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records()[i])
    }
}
