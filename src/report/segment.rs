use super::classify::{ClassifiedTransaction, RoStatus};
use std::collections::BTreeMap;
use std::fmt;

/// One segment × status cell: the row count and its share of the segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShareCell {
    pub count: u64,
    /// Rounded to two decimals; `None` when the combination never occurs.
    pub percent: Option<f64>,
}

impl fmt::Display for ShareCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent {
            Some(p) => write!(f, "{} ({}%)", self.count, format_percent(p)),
            None => f.write_str("0 (0%)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBreakdown {
    pub segment: String,
    pub ro: ShareCell,
    pub non_ro: ShareCell,
}

// Halves go to the even neighbour: 3.125 -> 3.12, 96.875 -> 96.88.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

// Whole numbers keep one decimal ("75.0"), otherwise the shortest form ("33.33").
fn format_percent(p: f64) -> String {
    if p.fract() == 0.0 {
        format!("{:.1}", p)
    } else {
        format!("{}", p)
    }
}

/// Per-segment RO / Non-RO split, one row per segment in ascending order.
pub fn segment_breakdown(records: &[ClassifiedTransaction]) -> Vec<SegmentBreakdown> {
    let mut counts: BTreeMap<(&str, RoStatus), u64> = BTreeMap::new();
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for r in records {
        let segment = r.txn.segment.as_str();
        *counts.entry((segment, r.ro_status())).or_insert(0) += 1;
        *totals.entry(segment).or_insert(0) += 1;
    }

    let mut pivot: BTreeMap<&str, SegmentBreakdown> = BTreeMap::new();
    for ((segment, status), count) in counts {
        let total = totals.get(segment).copied().unwrap_or(count).max(1);
        let cell = ShareCell {
            count,
            percent: Some(round2(count as f64 / total as f64 * 100.0)),
        };
        let row = pivot.entry(segment).or_insert_with(|| SegmentBreakdown {
            segment: segment.to_string(),
            ro: ShareCell::default(),
            non_ro: ShareCell::default(),
        });
        match status {
            RoStatus::Ro => row.ro = cell,
            RoStatus::NonRo => row.non_ro = cell,
        }
    }
    pivot.into_values().collect()
}
