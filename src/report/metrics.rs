use super::classify::{ClassifiedTransaction, RoStatus};
use crate::dataset::CustomerId;
use std::collections::HashSet;

/// Headline numbers. `ro_customers` and `non_ro_customers` need not add up to
/// `total_customers`: a customer with both kinds of rows counts only as RO.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMetrics {
    pub total_customers: usize,
    pub total_products: usize,
    pub ro_products: usize,
    pub non_ro_products: usize,
    /// Percentage in `[0, 100]`; zero for an empty set.
    pub ro_rate: f64,
    pub ro_customers: usize,
    pub non_ro_customers: usize,
}

pub fn key_metrics(records: &[ClassifiedTransaction]) -> KeyMetrics {
    let mut customers: HashSet<&CustomerId> = HashSet::new();
    let mut ro_customers: HashSet<&CustomerId> = HashSet::new();
    let mut non_ro_customers: HashSet<&CustomerId> = HashSet::new();
    let mut ro_products = 0usize;

    for r in records {
        customers.insert(&r.txn.customer_id);
        match r.ro_status() {
            RoStatus::Ro => {
                ro_products += 1;
                ro_customers.insert(&r.txn.customer_id);
            }
            RoStatus::NonRo => {
                non_ro_customers.insert(&r.txn.customer_id);
            }
        }
    }

    let total_products = records.len();
    let ro_rate = if total_products > 0 {
        ro_products as f64 / total_products as f64 * 100.0
    } else {
        0.0
    };

    KeyMetrics {
        total_customers: customers.len(),
        total_products,
        ro_products,
        non_ro_products: total_products - ro_products,
        ro_rate,
        ro_customers: ro_customers.len(),
        non_ro_customers: non_ro_customers.difference(&ro_customers).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::txn;
    use crate::report::classify::classify;

    #[test]
    fn test_single_customer_three_orders() {
        let rows = vec![
            txn(0, "A", Some("PT A"), "Truck", "2024-01-01"),
            txn(1, "A", Some("PT A"), "Truck", "2024-02-01"),
            txn(2, "A", Some("PT A"), "Truck", "2024-03-01"),
        ];
        let m = key_metrics(&classify(rows.iter().collect()));
        assert_eq!(m.total_customers, 1);
        assert_eq!(m.ro_customers, 1);
        assert_eq!(m.non_ro_customers, 0);
        assert_eq!(m.total_products, 3);
        assert_eq!(m.ro_products, 2);
        assert_eq!(m.non_ro_products, 1);
        assert_eq!(format!("{:.1}", m.ro_rate), "66.7");
    }

    #[test]
    fn test_pure_non_ro_customers() {
        let rows = vec![
            txn(0, "A", Some("PT A"), "Truck", "2024-01-01"),
            txn(1, "A", Some("PT A"), "Truck", "2024-02-01"),
            txn(2, "B", Some("PT B"), "Bus", "2024-01-01"),
            txn(3, "C", Some("PT C"), "Bus", "2023-01-01"),
            txn(4, "C", Some("PT C"), "Bus", "2024-01-01"),
        ];
        let m = key_metrics(&classify(rows.iter().collect()));
        assert_eq!(m.total_customers, 3);
        assert_eq!(m.ro_customers, 1);
        // B and C only ever have a first order in each year.
        assert_eq!(m.non_ro_customers, 2);
        assert_eq!(m.ro_products, 1);
        assert!(m.ro_rate >= 0.0 && m.ro_rate <= 100.0);
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(key_metrics(&[]), KeyMetrics::default());
    }
}
