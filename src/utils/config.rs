// src/utils/config.rs
use std::path::PathBuf;

pub const DEFAULT_BASE_DIR: &str = "data/landing";
pub const DEFAULT_OUTPUT_PATH: &str = "data/cleaned/all_companies.csv";
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 15;
pub const WORKBOOK_EXTENSION: &str = ".xlsx";

/// Environment override for how many leading rows are searched for the header.
pub const HEADER_SCAN_ROWS_VAR: &str = "HEADER_SCAN_ROWS";

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_dir: PathBuf,
    pub output_path: PathBuf,
    pub header_scan_rows: usize,
    pub file_extension: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            file_extension: WORKBOOK_EXTENSION.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(base_dir: P, output_path: Q) -> Self {
        Self {
            base_dir: base_dir.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Applies `HEADER_SCAN_ROWS` from the process environment, if set.
    pub fn with_env_overrides(mut self) -> Self {
        self.header_scan_rows = header_scan_rows_from(std::env::var(HEADER_SCAN_ROWS_VAR).ok());
        self
    }
}

/// Parses a header-scan override. Missing, zero, or malformed values fall back to the default.
pub fn header_scan_rows_from(raw: Option<String>) -> usize {
    match raw {
        None => DEFAULT_HEADER_SCAN_ROWS,
        Some(value) => match value.trim().parse::<usize>() {
            Ok(rows) if rows > 0 => {
                tracing::debug!("Using {}={}", HEADER_SCAN_ROWS_VAR, rows);
                rows
            }
            _ => {
                tracing::warn!(
                    "Ignoring invalid {} value '{}', using {}",
                    HEADER_SCAN_ROWS_VAR,
                    value,
                    DEFAULT_HEADER_SCAN_ROWS
                );
                DEFAULT_HEADER_SCAN_ROWS
            }
        },
    }
}
