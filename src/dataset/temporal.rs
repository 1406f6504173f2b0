use super::model::{RawDate, SourceRow, Transaction};
use crate::error::{DashboardError, Result};
use chrono::{Datelike, Days, Month, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

// Month-first wins for ambiguous slash dates; day-first only when the first field can't be a month.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

// Day 0 of the 1900 system from serial 60 on; earlier serials sit before the phantom
// 1900-02-29 and shift by a day, matching calamine's own DateTime conversion.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const LEAP_BUG_SERIAL: f64 = 60.0;
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

pub fn parse_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::DateTime(dt) => Some(dt.date()),
        RawDate::Serial(v) => from_excel_serial(*v),
        RawDate::Text(s) => parse_text(s.trim()),
    }
}

fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial >= MAX_EXCEL_SERIAL {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    let mut days = serial.floor() as u64;
    if serial < LEAP_BUG_SERIAL {
        days += 1;
    }
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(days))
}

fn parse_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// English long month name for 1..=12, empty otherwise.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

pub fn period_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Derives year, month, month name and period for every row; the first unparsable date aborts the load.
pub fn enrich(rows: Vec<SourceRow>) -> Result<Vec<Transaction>> {
    rows.into_iter()
        .map(|row| {
            let date = parse_date(&row.realisasi).ok_or_else(|| DashboardError::InvalidDate {
                row: row.row,
                value: row.realisasi.to_string(),
            })?;
            Ok(Transaction {
                index: row.index,
                customer_id: row.customer_id,
                account_name: row.account_name,
                segment: row.segment,
                no_contract: row.no_contract,
                realisasi_date: date,
                year: date.year(),
                month: date.month(),
                month_name: month_name(date.month()),
                period: period_key(date),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::model::CustomerId;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source(row: usize, raw: RawDate) -> SourceRow {
        SourceRow {
            row,
            index: row - 2,
            customer_id: CustomerId::new("100"),
            account_name: Some("PT Maju".to_string()),
            segment: "Truck".to_string(),
            no_contract: format!("K-{}", row),
            realisasi: raw,
        }
    }

    #[test]
    fn test_parse_text_formats() {
        let cases = [
            ("2024-03-15", ymd(2024, 3, 15)),
            ("2024/03/15", ymd(2024, 3, 15)),
            ("2024-03-15 13:45:00", ymd(2024, 3, 15)),
            ("2024-03-15T08:00:00.000", ymd(2024, 3, 15)),
            ("03/04/2024", ymd(2024, 3, 4)),
            ("25/03/2024", ymd(2024, 3, 25)),
        ];
        for (text, expected) in cases {
            assert_eq!(
                parse_date(&RawDate::Text(text.to_string())),
                Some(expected),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_parse_excel_serial() {
        assert_eq!(parse_date(&RawDate::Serial(45366.0)), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&RawDate::Serial(45366.75)), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&RawDate::Serial(-3.0)), None);
        assert_eq!(parse_date(&RawDate::Serial(0.5)), None);
        assert_eq!(parse_date(&RawDate::Serial(f64::NAN)), None);
    }

    #[test]
    fn test_early_serials_before_leap_bug() {
        assert_eq!(parse_date(&RawDate::Serial(1.0)), Some(ymd(1900, 1, 1)));
        assert_eq!(parse_date(&RawDate::Serial(59.0)), Some(ymd(1900, 2, 28)));
        assert_eq!(parse_date(&RawDate::Serial(60.0)), Some(ymd(1900, 2, 28)));
        assert_eq!(parse_date(&RawDate::Serial(61.0)), Some(ymd(1900, 3, 1)));
        assert_eq!(parse_date(&RawDate::Serial(367.0)), Some(ymd(1901, 1, 1)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_date(&RawDate::Text("next tuesday".to_string())), None);
        assert_eq!(parse_date(&RawDate::Text("2024-13-01".to_string())), None);
        assert_eq!(parse_date(&RawDate::Text(String::new())), None);
    }

    #[test]
    fn test_month_names_are_english() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_enrich_derives_fields() {
        let dt = ymd(2024, 3, 5).and_hms_opt(10, 30, 0).unwrap();
        let out = enrich(vec![source(2, RawDate::DateTime(dt))]).unwrap();
        let t = &out[0];
        assert_eq!(t.realisasi_date, ymd(2024, 3, 5));
        assert_eq!(t.year, 2024);
        assert_eq!(t.month, 3);
        assert_eq!(t.month_name, "March");
        assert_eq!(t.period, "2024-03");
        assert_eq!(t.index, 0);
    }

    #[test]
    fn test_enrich_fails_on_first_bad_date() {
        let rows = vec![
            source(2, RawDate::Text("2024-01-01".to_string())),
            source(3, RawDate::Text("not a date".to_string())),
        ];
        match enrich(rows) {
            Err(DashboardError::InvalidDate { row, value }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }
}
