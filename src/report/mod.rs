//! Repeat-order reporting pipeline: filter, classify, then reduce.
//!
//! Every call recomputes from the immutable dataset, so classification always
//! reflects the rows inside the current selection.

pub mod classify;
pub mod filter;
pub mod metrics;
pub mod multi_unit;
pub mod ranking;
pub mod segment;
pub mod trend;

pub use classify::{ClassifiedTransaction, RoStatus};
pub use filter::Selection;
pub use metrics::KeyMetrics;
pub use multi_unit::MultiUnitRow;
pub use ranking::AccountRanking;
pub use segment::SegmentBreakdown;
pub use trend::TrendPoint;

use crate::dataset::Dataset;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub selection: Selection,
    pub metrics: KeyMetrics,
    pub trend: Vec<TrendPoint>,
    pub segments: Vec<SegmentBreakdown>,
    pub top_accounts: Vec<AccountRanking>,
    pub multi_unit_daily: Vec<MultiUnitRow<NaiveDate>>,
    pub multi_unit_monthly: Vec<MultiUnitRow<String>>,
    /// The filtered rows with their classification, ordered by customer, year and date.
    pub records: Vec<ClassifiedTransaction>,
}

pub fn run_pipeline(dataset: &Dataset, selection: &Selection) -> Report {
    let records = classify::classify(filter::apply(dataset, selection));
    Report {
        selection: selection.clone(),
        metrics: metrics::key_metrics(&records),
        trend: trend::monthly_trend(&records),
        segments: segment::segment_breakdown(&records),
        top_accounts: ranking::top_ro_accounts(&records),
        multi_unit_daily: multi_unit::multi_unit_by_date(&records),
        multi_unit_monthly: multi_unit::multi_unit_by_month(&records),
        records,
    }
}
