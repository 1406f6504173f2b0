use super::classify::ClassifiedTransaction;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRanking {
    pub account_name: String,
    /// Distinct segments with at least one RO row.
    pub product_count: usize,
    pub total_ro_transactions: u64,
    /// `"<segment> = <count>"` per segment, joined with `" | "`.
    pub detail: String,
}

/// Accounts ranked by how many segments they re-ordered in.
///
/// Segments inside `detail` are listed alphabetically. Accounts with the same
/// `product_count` stay in account-name order.
pub fn top_ro_accounts(records: &[ClassifiedTransaction]) -> Vec<AccountRanking> {
    let mut per_segment: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for r in records.iter().filter(|r| r.is_ro()) {
        let Some(account) = r.txn.account_name.as_deref() else {
            continue;
        };
        *per_segment
            .entry((account, r.txn.segment.as_str()))
            .or_insert(0) += 1;
    }

    let mut per_account: BTreeMap<&str, Vec<(&str, u64)>> = BTreeMap::new();
    for ((account, segment), count) in per_segment {
        per_account
            .entry(account)
            .or_default()
            .push((segment, count));
    }

    let mut ranking: Vec<AccountRanking> = per_account
        .into_iter()
        .map(|(account, segments)| AccountRanking {
            account_name: account.to_string(),
            product_count: segments.len(),
            total_ro_transactions: segments.iter().map(|(_, n)| n).sum(),
            detail: segments
                .iter()
                .map(|(segment, n)| format!("{} = {}", segment, n))
                .collect::<Vec<_>>()
                .join(" | "),
        })
        .collect();
    ranking.sort_by(|a, b| b.product_count.cmp(&a.product_count));
    ranking
}
