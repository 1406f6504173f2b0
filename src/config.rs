use std::path::PathBuf;

const DEFAULT_DATA_FILE: &str = "DataCorpo.xlsx";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_file: PathBuf,
    /// `None` means the first sheet of the workbook.
    pub sheet: Option<String>,
    pub log_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            sheet: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl DashboardConfig {
    /// Loads `.env` if present, then reads `RO_DATA_FILE`, `RO_SHEET` and `RO_LOG_DIR`.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            data_file: non_empty("RO_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            sheet: non_empty("RO_SHEET"),
            log_dir: non_empty("RO_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }
}
