use super::model::{CustomerId, Dataset, RawDate, SourceRow};
use super::temporal;
use crate::error::{DashboardError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::info;
use std::path::Path;

pub const COL_CUSTOMER_ID: &str = "Customerid";
pub const COL_ACCOUNT_NAME: &str = "accountname";
pub const COL_SEGMENT: &str = "Segmen";
pub const COL_NO_CONTRACT: &str = "NoContract";
pub const COL_REALISASI_DATE: &str = "realisasidate";

struct ColumnMap {
    customer_id: usize,
    account_name: usize,
    segment: usize,
    no_contract: usize,
    realisasi_date: usize,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(DashboardError::MissingColumn { column })
        };
        Ok(Self {
            customer_id: find(COL_CUSTOMER_ID)?,
            account_name: find(COL_ACCOUNT_NAME)?,
            segment: find(COL_SEGMENT)?,
            no_contract: find(COL_NO_CONTRACT)?,
            realisasi_date: find(COL_REALISASI_DATE)?,
        })
    }
}

/// Reads one worksheet into an enriched, immutable [`Dataset`]. Blocking.
pub fn load_dataset(path: &Path, sheet: Option<&str>) -> Result<Dataset> {
    if !path.exists() {
        return Err(DashboardError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = select_sheet(path, &workbook.sheet_names(), sheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let rows = read_rows(&range)?;
    let records = temporal::enrich(rows)?;

    info!(
        "loaded {} rows from {} [{}]",
        records.len(),
        path.display(),
        sheet_name
    );
    Ok(Dataset::new(records))
}

/// The requested sheet if the workbook has it, else the first sheet when none was asked for.
fn select_sheet(path: &Path, names: &[String], sheet: Option<&str>) -> Result<String> {
    match sheet {
        Some(name) if names.iter().any(|n| n == name) => Ok(name.to_string()),
        Some(name) => Err(DashboardError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: name.to_string(),
        }),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| DashboardError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: "<first>".to_string(),
            }),
    }
}

/// Maps the header row and pulls the required fields out of every data row.
pub fn read_rows(range: &Range<Data>) -> Result<Vec<SourceRow>> {
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or(DashboardError::EmptySheet)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    let cols = ColumnMap::from_headers(&headers)?;

    let mut out = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        // +1 for the header, +1 for 1-based numbering.
        let row_num = first_row + i + 2;
        let required = |idx: usize, column: &'static str| {
            row.get(idx)
                .and_then(cell_text)
                .ok_or(DashboardError::MissingField {
                    row: row_num,
                    column,
                })
        };

        let customer_id = required(cols.customer_id, COL_CUSTOMER_ID)?;
        let segment = required(cols.segment, COL_SEGMENT)?;
        let no_contract = required(cols.no_contract, COL_NO_CONTRACT)?;
        let realisasi = row
            .get(cols.realisasi_date)
            .and_then(raw_date)
            .ok_or(DashboardError::MissingField {
                row: row_num,
                column: COL_REALISASI_DATE,
            })?;

        out.push(SourceRow {
            row: row_num,
            index: out.len(),
            customer_id: CustomerId::new(customer_id),
            account_name: row.get(cols.account_name).and_then(cell_text),
            segment,
            no_contract,
            realisasi,
        });
    }
    Ok(out)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        other => {
            let s = other.to_string();
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
    }
}

fn raw_date(cell: &Data) -> Option<RawDate> {
    match cell {
        Data::Empty => None,
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(RawDate::DateTime)
                .unwrap_or_else(|| RawDate::Serial(dt.as_f64())),
        ),
        Data::Float(f) => Some(RawDate::Serial(*f)),
        Data::Int(i) => Some(RawDate::Serial(*i as f64)),
        other => cell_text(other).map(RawDate::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    fn sheet(rows: Vec<Vec<Data>>) -> Range<Data> {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1);
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width as u32 - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn header() -> Vec<Data> {
        vec![
            s("NoContract"),
            s(" Customerid "),
            s("accountname"),
            s("Segmen"),
            s("realisasidate"),
            s("Branch"),
        ]
    }

    #[test]
    fn test_reads_rows_by_header_name() {
        let range = sheet(vec![
            header(),
            vec![
                Data::Float(9001.0),
                Data::Float(1234.0),
                s(" PT Sinar Jaya "),
                s("Truck"),
                Data::Float(45366.0),
                s("Jakarta"),
            ],
            vec![
                s("K-2"),
                Data::Int(77),
                Data::Empty,
                s("Bus"),
                s("2024-02-01"),
                Data::Empty,
            ],
        ]);
        let rows = read_rows(&range).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].customer_id.as_str(), "1234");
        assert_eq!(rows[0].no_contract, "9001");
        assert_eq!(rows[0].account_name.as_deref(), Some("PT Sinar Jaya"));
        assert_eq!(rows[0].realisasi, RawDate::Serial(45366.0));

        assert_eq!(rows[1].customer_id.as_str(), "77");
        assert_eq!(rows[1].account_name, None);
        assert_eq!(rows[1].realisasi, RawDate::Text("2024-02-01".to_string()));
    }

    #[test]
    fn test_skips_blank_rows() {
        let blank = vec![Data::Empty; 6];
        let range = sheet(vec![
            header(),
            blank.clone(),
            vec![s("K-1"), s("1"), s("PT A"), s("Truck"), s("2024-01-01"), Data::Empty],
            blank,
        ]);
        let rows = read_rows(&range).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 3);
        assert_eq!(rows[0].index, 0);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let range = sheet(vec![
            vec![s("Customerid"), s("accountname"), s("Segmen"), s("realisasidate")],
            vec![s("1"), s("PT A"), s("Truck"), s("2024-01-01")],
        ]);
        match read_rows(&range) {
            Err(DashboardError::MissingColumn { column }) => assert_eq!(column, "NoContract"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_required_cell_is_rejected() {
        let range = sheet(vec![
            header(),
            vec![s("K-1"), s("1"), s("PT A"), Data::Empty, s("2024-01-01"), Data::Empty],
        ]);
        match read_rows(&range) {
            Err(DashboardError::MissingField { row, column }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Segmen");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DataCorpo.xlsx");
        match load_dataset(&path, None) {
            Err(DashboardError::SourceNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected SourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_native_date_cells_reach_transactions() {
        let range = sheet(vec![
            header(),
            vec![
                s("K-1"),
                s("1"),
                s("PT A"),
                s("Truck"),
                Data::DateTime(ExcelDateTime::new(45366.0, ExcelDateTimeType::DateTime, false)),
                Data::Empty,
            ],
            vec![
                s("K-2"),
                s("2"),
                s("PT B"),
                s("Bus"),
                Data::DateTimeIso("2024-03-15T00:00:00".to_string()),
                Data::Empty,
            ],
            vec![
                s("K-3"),
                s("3"),
                s("PT C"),
                s("Bus"),
                Data::DateTime(ExcelDateTime::new(45366.5, ExcelDateTimeType::DateTime, false)),
                Data::Empty,
            ],
        ]);
        let rows = read_rows(&range).unwrap();
        assert!(matches!(rows[0].realisasi, RawDate::DateTime(_)));
        assert_eq!(
            rows[1].realisasi,
            RawDate::Text("2024-03-15T00:00:00".to_string())
        );

        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let txns = temporal::enrich(rows).unwrap();
        assert_eq!(txns.len(), 3);
        for t in &txns {
            assert_eq!(t.realisasi_date, expected);
            assert_eq!(t.period, "2024-03");
        }
    }

    #[test]
    fn test_select_sheet() {
        let path = Path::new("DataCorpo.xlsx");
        let names = vec!["Summary".to_string(), "Data".to_string()];
        assert_eq!(select_sheet(path, &names, Some("Data")).unwrap(), "Data");
        assert_eq!(select_sheet(path, &names, None).unwrap(), "Summary");
        match select_sheet(path, &names, Some("Sheet9")) {
            Err(DashboardError::SheetNotFound { path: p, sheet }) => {
                assert_eq!(p, path);
                assert_eq!(sheet, "Sheet9");
            }
            other => panic!("expected SheetNotFound, got {:?}", other),
        }
        assert!(matches!(
            select_sheet(path, &[], None),
            Err(DashboardError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn test_unreadable_workbook_is_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DataCorpo.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        match load_dataset(&path, Some("Data")) {
            Err(DashboardError::Workbook(_)) => {}
            other => panic!("expected Workbook error, got {:?}", other),
        }
    }
}
