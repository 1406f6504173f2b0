use super::classify::{ClassifiedTransaction, RoStatus};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub period: String,
    pub ro: u64,
    pub non_ro: u64,
}

/// RO / Non-RO row counts per period, ascending by period.
pub fn monthly_trend(records: &[ClassifiedTransaction]) -> Vec<TrendPoint> {
    let mut counts: BTreeMap<(&str, RoStatus), u64> = BTreeMap::new();
    for r in records {
        *counts
            .entry((r.txn.period.as_str(), r.ro_status()))
            .or_insert(0) += 1;
    }

    let mut pivot: BTreeMap<&str, TrendPoint> = BTreeMap::new();
    for ((period, status), n) in counts {
        let point = pivot.entry(period).or_insert_with(|| TrendPoint {
            period: period.to_string(),
            ro: 0,
            non_ro: 0,
        });
        match status {
            RoStatus::Ro => point.ro = n,
            RoStatus::NonRo => point.non_ro = n,
        }
    }
    pivot.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::txn;
    use crate::report::classify::classify;

    #[test]
    fn test_pivot_fills_missing_with_zero() {
        let rows = vec![
            txn(0, "A", Some("PT A"), "Truck", "2024-03-01"),
            txn(1, "A", Some("PT A"), "Truck", "2024-03-20"),
            txn(2, "B", Some("PT B"), "Truck", "2024-01-11"),
            txn(3, "A", Some("PT A"), "Bus", "2024-04-02"),
        ];
        let trend = monthly_trend(&classify(rows.iter().collect()));
        assert_eq!(
            trend,
            vec![
                TrendPoint { period: "2024-01".into(), ro: 0, non_ro: 1 },
                TrendPoint { period: "2024-03".into(), ro: 1, non_ro: 1 },
                TrendPoint { period: "2024-04".into(), ro: 1, non_ro: 0 },
            ]
        );
    }

    #[test]
    fn test_periods_sort_across_years() {
        let rows = vec![
            txn(0, "A", Some("PT A"), "Truck", "2024-01-01"),
            txn(1, "B", Some("PT B"), "Truck", "2023-12-01"),
        ];
        let periods: Vec<String> = monthly_trend(&classify(rows.iter().collect()))
            .into_iter()
            .map(|p| p.period)
            .collect();
        assert_eq!(periods, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn test_empty() {
        assert!(monthly_trend(&[]).is_empty());
    }
}
