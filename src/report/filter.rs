use crate::dataset::{Dataset, Transaction};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeSet;

/// The user's current filter choice. An empty set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<u32>,
    pub segments: BTreeSet<String>,
    pub account_search: String,
}

impl Selection {
    /// Every year and segment present in the dataset, all twelve months, no search.
    pub fn all_of(dataset: &Dataset) -> Self {
        Self {
            years: dataset.years(),
            months: (1..=12).collect(),
            segments: dataset.segments(),
            account_search: String::new(),
        }
    }
}

enum AccountMatcher {
    Any,
    Pattern(Regex),
    Lowercase(String),
}

impl AccountMatcher {
    fn new(search: &str) -> Self {
        if search.is_empty() {
            return AccountMatcher::Any;
        }
        match RegexBuilder::new(&regex::escape(search))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => AccountMatcher::Pattern(re),
            // An escaped literal only fails past the compiled size limit.
            Err(e) => {
                log::warn!("search pattern rejected ({}), using plain match", e);
                AccountMatcher::Lowercase(search.to_lowercase())
            }
        }
    }

    fn matches(&self, account: Option<&str>) -> bool {
        match (self, account) {
            (AccountMatcher::Any, _) => true,
            (_, None) => false,
            (AccountMatcher::Pattern(re), Some(name)) => re.is_match(name),
            (AccountMatcher::Lowercase(needle), Some(name)) => {
                name.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Rows of `dataset` inside `selection`, in ingestion order.
pub fn apply<'a>(dataset: &'a Dataset, selection: &Selection) -> Vec<&'a Transaction> {
    let matcher = AccountMatcher::new(&selection.account_search);
    dataset
        .records()
        .iter()
        .filter(|t| {
            selection.years.contains(&t.year)
                && selection.months.contains(&t.month)
                && selection.segments.contains(&t.segment)
                && matcher.matches(t.account_name.as_deref())
        })
        .collect()
}
