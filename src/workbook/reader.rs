// src/workbook/reader.rs
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use super::{nfc, Cell, SheetGrid, WorkbookSource};
use crate::utils::error::ExtractError;

/// Reads `.xlsx` workbooks from disk with calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSource;

impl XlsxSource {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookSource for XlsxSource {
    fn read_sheets(&self, path: &Path, sheet_names: &[&str]) -> Result<Vec<SheetGrid>, ExtractError> {
        let mut workbook = open_workbook::<Xlsx<_>, _>(path).map_err(|e| ExtractError::UnreadableFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let available = workbook.sheet_names();
        tracing::trace!("Workbook {} has sheets {:?}", path.display(), available);

        let mut grids = Vec::with_capacity(sheet_names.len());
        for wanted in sheet_names {
            let wanted_nfc = nfc(wanted);
            // Match on the normalized name but open the sheet by its stored name.
            let actual = available
                .iter()
                .find(|name| nfc(name) == wanted_nfc)
                .ok_or_else(|| ExtractError::SheetNotFound { sheet: wanted.to_string() })?
                .clone();

            let range = workbook.worksheet_range(&actual).map_err(|e| ExtractError::UnreadableFile {
                path: path.to_path_buf(),
                reason: format!("sheet {}: {}", actual, e),
            })?;

            tracing::debug!("Read sheet '{}' ({} rows) from {}", actual, range.height(), path.display());
            grids.push(grid_from_range(wanted, &range));
        }

        Ok(grids)
    }
}

/// Converts a calamine range into a raw grid. Row 0 is the first used row of the sheet.
fn grid_from_range(name: &str, range: &Range<Data>) -> SheetGrid {
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    SheetGrid::new(name, rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(_) => Cell::Error,
        // Dates and durations only ever appear as text to the extractors.
        other => Cell::text(other.to_string()),
    }
}
