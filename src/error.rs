use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("data file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[error("sheet '{sheet}' not found in {}", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },
    #[error("worksheet has no header row")]
    EmptySheet,
    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },
    #[error("row {row}: column '{column}' is empty")]
    MissingField { row: usize, column: &'static str },
    #[error("row {row}: cannot parse date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
