use super::classify::ClassifiedTransaction;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// One account's realizations within a date or a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiUnitRow<K> {
    pub key: K,
    pub account_name: String,
    /// Distinct segments.
    pub product_count: usize,
    pub realization_count: u64,
    /// Sorted, de-duplicated segment names joined with `", "`.
    pub products: String,
}

/// Account activity on dates where more than one account realized.
pub fn multi_unit_by_date(records: &[ClassifiedTransaction]) -> Vec<MultiUnitRow<NaiveDate>> {
    let mut accounts_per_date: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for r in records {
        let entry = accounts_per_date.entry(r.txn.realisasi_date).or_default();
        if let Some(account) = r.txn.account_name.as_deref() {
            entry.insert(account);
        }
    }
    let busy_dates: BTreeSet<NaiveDate> = accounts_per_date
        .into_iter()
        .filter(|(_, accounts)| accounts.len() > 1)
        .map(|(date, _)| date)
        .collect();

    group_by_account(
        records
            .iter()
            .filter(|r| busy_dates.contains(&r.txn.realisasi_date))
            .map(|r| (r.txn.realisasi_date, r)),
    )
}

/// Account activity per `YYYY-MM` period, every account-month present.
pub fn multi_unit_by_month(records: &[ClassifiedTransaction]) -> Vec<MultiUnitRow<String>> {
    group_by_account(records.iter().map(|r| (r.txn.period.clone(), r)))
}

fn group_by_account<'a, K: Ord + Clone>(
    rows: impl Iterator<Item = (K, &'a ClassifiedTransaction)>,
) -> Vec<MultiUnitRow<K>> {
    let mut groups: BTreeMap<(K, &'a str), (u64, BTreeSet<&'a str>)> = BTreeMap::new();
    for (key, r) in rows {
        let Some(account) = r.txn.account_name.as_deref() else {
            continue;
        };
        let (count, segments) = groups.entry((key, account)).or_default();
        *count += 1;
        segments.insert(r.txn.segment.as_str());
    }

    let mut out: Vec<MultiUnitRow<K>> = groups
        .into_iter()
        .map(|((key, account), (count, segments))| MultiUnitRow {
            key,
            account_name: account.to_string(),
            product_count: segments.len(),
            realization_count: count,
            products: segments.into_iter().collect::<Vec<_>>().join(", "),
        })
        .collect();
    out.sort_by(|a, b| {
        a.key
            .cmp(&b.key)
            .then(b.realization_count.cmp(&a.realization_count))
    });
    out
}
