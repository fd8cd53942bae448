// src/extractors/years.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::header::StatementTable;

static YEAR_COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)năm/").expect("Failed to compile YEAR_COLUMN_RE")
});

/// Fiscal years named by "Năm/<year>" column labels, in column order.
/// Labels whose trailing token is not an integer are skipped.
pub fn extract_years(columns: &[String]) -> Vec<i32> {
    columns
        .iter()
        .filter(|label| YEAR_COLUMN_RE.is_match(label))
        .filter_map(|label| {
            let token = label.rsplit('/').next().unwrap_or_default().trim();
            match token.parse::<i32>() {
                Ok(year) => Some(year),
                Err(_) => {
                    tracing::debug!("Skipping column '{}': no year after '/'", label);
                    None
                }
            }
        })
        .collect()
}

/// Column of each statement holding one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearColumns {
    pub year: i32,
    pub balance_sheet: usize,
    pub income_statement: usize,
    pub cash_flow: usize,
}

/// Finds the year's column in all three statements independently.
/// `None` unless every statement has a column whose label contains the year.
pub fn resolve_year(
    year: i32,
    balance_sheet: &StatementTable,
    income_statement: &StatementTable,
    cash_flow: &StatementTable,
) -> Option<YearColumns> {
    let needle = year.to_string();
    Some(YearColumns {
        year,
        balance_sheet: balance_sheet.find_column(&needle)?,
        income_statement: income_statement.find_column(&needle)?,
        cash_flow: cash_flow.find_column(&needle)?,
    })
}
