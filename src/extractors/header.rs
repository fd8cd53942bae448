// src/extractors/header.rs
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::ExtractError;
use crate::workbook::{Cell, SheetGrid};

// A header row carries at least one "Năm/20xx" label.
static HEADER_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)năm/20").expect("Failed to compile HEADER_MARKER_RE")
});

/// A statement sheet with its header row promoted to column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTable {
    pub sheet: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl StatementTable {
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Index of the first column whose label contains `needle`.
    pub fn find_column(&self, needle: &str) -> Option<usize> {
        self.columns.iter().position(|label| label.contains(needle))
    }
}

/// Returns the index of the first of the leading `max_rows` rows that holds a year marker.
pub fn locate_header(grid: &SheetGrid, max_rows: usize) -> Result<usize, ExtractError> {
    grid.rows
        .iter()
        .take(max_rows)
        .position(|row| {
            row.iter()
                .filter_map(Cell::as_text)
                .any(|text| HEADER_MARKER_RE.is_match(&text))
        })
        .ok_or_else(|| ExtractError::HeaderNotFound {
            sheet: grid.name.clone(),
            scanned: max_rows.min(grid.height()),
        })
}

/// Turns `header_row` into column labels and keeps only the rows below it.
pub fn promote_header(grid: &SheetGrid, header_row: usize) -> StatementTable {
    let width = grid.rows.iter().map(Vec::len).max().unwrap_or(0);
    let header = grid.rows.get(header_row).map(Vec::as_slice).unwrap_or(&[]);

    let raw_labels = (0..width).map(|i| {
        header
            .get(i)
            .and_then(Cell::as_text)
            .map(|label| label.trim().to_string())
            .unwrap_or_else(|| format!("Unnamed: {}", i))
    });

    StatementTable {
        sheet: grid.name.clone(),
        columns: dedupe_labels(raw_labels),
        rows: grid.rows.iter().skip(header_row + 1).cloned().collect(),
    }
}

/// Locates and promotes the header in one step.
pub fn read_with_header(grid: &SheetGrid, max_rows: usize) -> Result<StatementTable, ExtractError> {
    let header_row = locate_header(grid, max_rows)?;
    tracing::debug!("Sheet '{}' header found at row {}", grid.name, header_row);
    Ok(promote_header(grid, header_row))
}

// Repeated labels become "label.1", "label.2", ...
fn dedupe_labels<I: Iterator<Item = String>>(labels: I) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    labels
        .map(|label| {
            let count = seen.entry(label.clone()).or_insert(0);
            let out = if *count == 0 { label } else { format!("{}.{}", label, count) };
            *count += 1;
            out
        })
        .collect()
}
