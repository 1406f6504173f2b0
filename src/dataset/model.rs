use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Customer identifier as written in the sheet.
///
/// Ids that parse as integers order numerically, so `"9"` sorts before `"10"`;
/// anything else falls back to plain string order after the numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }
}

impl Ord for CustomerId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for CustomerId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Date cell exactly as the workbook handed it over, before parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    DateTime(NaiveDateTime),
    /// Excel serial day number (1900 date system).
    Serial(f64),
    Text(String),
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::DateTime(dt) => write!(f, "{}", dt),
            RawDate::Serial(v) => write!(f, "{}", v),
            RawDate::Text(s) => f.write_str(s),
        }
    }
}

/// One worksheet row with the required fields pulled out, dates still unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based worksheet row, for error messages.
    pub row: usize,
    /// 0-based ingestion order among data rows.
    pub index: usize,
    pub customer_id: CustomerId,
    pub account_name: Option<String>,
    pub segment: String,
    pub no_contract: String,
    pub realisasi: RawDate,
}

/// A realization event with its temporal fields derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub index: usize,
    pub customer_id: CustomerId,
    pub account_name: Option<String>,
    pub segment: String,
    pub no_contract: String,
    pub realisasi_date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    /// `YYYY-MM`
    pub period: String,
}

/// Immutable snapshot of the loaded worksheet.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Transaction>,
}

impl Dataset {
    pub fn new(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|t| t.year).collect()
    }

    pub fn segments(&self) -> BTreeSet<String> {
        self.records.iter().map(|t| t.segment.clone()).collect()
    }
}
