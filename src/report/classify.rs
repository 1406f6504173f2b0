use crate::dataset::{CustomerId, Transaction};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoStatus {
    Ro,
    NonRo,
}

impl RoStatus {
    pub fn from_order_index(order_index: u32) -> Self {
        if order_index > 1 {
            RoStatus::Ro
        } else {
            RoStatus::NonRo
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoStatus::Ro => "RO",
            RoStatus::NonRo => "Non-RO",
        }
    }
}

impl fmt::Display for RoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTransaction {
    pub txn: Transaction,
    /// 1-based position within the customer's transactions of that year.
    pub order_index: u32,
}

impl ClassifiedTransaction {
    pub fn ro_status(&self) -> RoStatus {
        RoStatus::from_order_index(self.order_index)
    }

    pub fn is_ro(&self) -> bool {
        self.ro_status() == RoStatus::Ro
    }
}

/// Numbers each customer's transactions per year by date; equal dates keep ingestion order.
pub fn classify(mut rows: Vec<&Transaction>) -> Vec<ClassifiedTransaction> {
    rows.sort_by(|a, b| {
        a.customer_id
            .cmp(&b.customer_id)
            .then(a.year.cmp(&b.year))
            .then(a.realisasi_date.cmp(&b.realisasi_date))
            .then(a.index.cmp(&b.index))
    });

    let mut out = Vec::with_capacity(rows.len());
    let mut group: Option<(&CustomerId, i32)> = None;
    let mut order_index = 0u32;
    for txn in rows {
        let key = (&txn.customer_id, txn.year);
        if group == Some(key) {
            order_index += 1;
        } else {
            group = Some(key);
            order_index = 1;
        }
        out.push(ClassifiedTransaction {
            txn: txn.clone(),
            order_index,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::txn;
    use std::collections::BTreeMap;

    #[test]
    fn test_three_orders_in_a_year() {
        let rows = vec![
            txn(0, "A", Some("PT A"), "Truck", "2024-05-01"),
            txn(1, "A", Some("PT A"), "Truck", "2024-01-10"),
            txn(2, "A", Some("PT A"), "Bus", "2024-03-03"),
        ];
        let out = classify(rows.iter().collect());
        let seen: Vec<(usize, u32, RoStatus)> = out
            .iter()
            .map(|c| (c.txn.index, c.order_index, c.ro_status()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (1, 1, RoStatus::NonRo),
                (2, 2, RoStatus::Ro),
                (0, 3, RoStatus::Ro),
            ]
        );
    }

    #[test]
    fn test_index_resets_per_customer_year() {
        let rows = vec![
            txn(0, "A", Some("PT A"), "Truck", "2023-12-30"),
            txn(1, "A", Some("PT A"), "Truck", "2024-01-02"),
            txn(2, "B", Some("PT B"), "Truck", "2024-01-01"),
            txn(3, "A", Some("PT A"), "Truck", "2023-06-01"),
        ];
        let out = classify(rows.iter().collect());
        let by_index: BTreeMap<usize, u32> =
            out.iter().map(|c| (c.txn.index, c.order_index)).collect();
        assert_eq!(by_index[&3], 1);
        assert_eq!(by_index[&0], 2);
        assert_eq!(by_index[&1], 1);
        assert_eq!(by_index[&2], 1);
    }

    #[test]
    fn test_equal_dates_keep_ingestion_order() {
        let rows = vec![
            txn(7, "A", Some("PT A"), "Bus", "2024-02-02"),
            txn(3, "A", Some("PT A"), "Truck", "2024-02-02"),
        ];
        let out = classify(rows.iter().collect());
        assert_eq!(out[0].txn.index, 3);
        assert_eq!(out[0].ro_status(), RoStatus::NonRo);
        assert_eq!(out[1].txn.index, 7);
        assert_eq!(out[1].ro_status(), RoStatus::Ro);
    }

    #[test]
    fn test_order_indexes_are_dense_per_group() {
        let rows: Vec<Transaction> = (0..20)
            .map(|i| {
                let customer = ["A", "B", "C"][i % 3];
                let date = format!("{}-{:02}-{:02}", 2023 + (i % 2), 1 + i % 12, 1 + i % 27);
                txn(i, customer, Some(customer), "Truck", &date)
            })
            .collect();
        let out = classify(rows.iter().collect());
        let mut groups: BTreeMap<(String, i32), Vec<u32>> = BTreeMap::new();
        for c in &out {
            groups
                .entry((c.txn.customer_id.to_string(), c.txn.year))
                .or_default()
                .push(c.order_index);
            assert_eq!(c.is_ro(), c.order_index > 1);
        }
        for (_, mut idx) in groups {
            idx.sort_unstable();
            let expected: Vec<u32> = (1..=idx.len() as u32).collect();
            assert_eq!(idx, expected);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(classify(Vec::new()).is_empty());
    }
}
