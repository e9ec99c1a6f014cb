//! Named bin tables for the grouped age/tenure charts.
//!
//! Each chart keeps its own edge convention on purpose: unifying them would
//! silently move boundary values between bins and change reported
//! populations. Values outside a table's range are dropped from that chart.

/// How a bin treats its boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `[lo, hi)` – a value on the upper edge falls into the next bin.
    LeftClosed,
    /// `(lo, hi]` – a value on the lower edge falls into the previous bin.
    RightClosed,
}

/// A fixed binning of an integer measure into labelled groups.
#[derive(Debug, Clone, Copy)]
pub struct BinTable {
    pub edges: &'static [i32],
    pub labels: &'static [&'static str],
    pub edge: Edge,
    /// For [`Edge::RightClosed`]: whether the first bin also includes its
    /// lower edge (`(0,6]` vs `[0,6]`).
    pub include_lowest: bool,
}

/// Live dashboard age groups: `[18,25) [25,35) ... [65,100)`.
pub const LIVE_AGE_GROUPS: BinTable = BinTable {
    edges: &[18, 25, 35, 45, 55, 65, 100],
    labels: &["18-25", "26-35", "36-45", "46-55", "56-65", "66+"],
    edge: Edge::LeftClosed,
    include_lowest: false,
};

/// Live dashboard tenure buckets: `[0,6] (6,12] ... (30,36]`.
pub const LIVE_TENURE_BUCKETS: BinTable = BinTable {
    edges: &[0, 6, 12, 18, 24, 30, 36],
    labels: &["0-6", "7-12", "13-18", "19-24", "25-30", "31-36"],
    edge: Edge::RightClosed,
    include_lowest: true,
};

/// Prediction report age groups: `(0,30] (30,40] ... (60,100]`.
pub const PRED_AGE_GROUPS: BinTable = BinTable {
    edges: &[0, 30, 40, 50, 60, 100],
    labels: &["<30", "30-40", "40-50", "50-60", ">60"],
    edge: Edge::RightClosed,
    include_lowest: false,
};

/// Prediction report tenure groups: `(0,6] (6,12] (12,24] (24,36]`.
pub const PRED_TENURE_GROUPS: BinTable = BinTable {
    edges: &[0, 6, 12, 24, 36],
    labels: &["<6", "6-12", "12-24", "24-36"],
    edge: Edge::RightClosed,
    include_lowest: false,
};

impl BinTable {
    /// Index of the bin holding `value`, or `None` if it falls outside the
    /// table's range.
    pub fn bin_of(&self, value: i32) -> Option<usize> {
        let n = self.labels.len();
        match self.edge {
            Edge::LeftClosed => {
                (0..n).find(|&i| value >= self.edges[i] && value < self.edges[i + 1])
            }
            Edge::RightClosed => {
                if self.include_lowest && value == self.edges[0] {
                    return Some(0);
                }
                (0..n).find(|&i| value > self.edges[i] && value <= self.edges[i + 1])
            }
        }
    }

    /// Per-bin counts over `values`, in bin order; out-of-range dropped.
    pub fn counts(&self, values: impl Iterator<Item = i32>) -> Vec<usize> {
        let mut counts = vec![0usize; self.labels.len()];
        for v in values {
            if let Some(i) = self.bin_of(v) {
                counts[i] += 1;
            }
        }
        counts
    }
}
