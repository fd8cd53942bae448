// src/extractors/lookup.rs
use super::header::StatementTable;
use crate::workbook::{nfc, Cell};

/// Index of the first row whose label (first column) contains `keyword`,
/// compared case-insensitively as a plain substring.
pub fn find_row(table: &StatementTable, keyword: &str) -> Option<usize> {
    let needle = nfc(keyword).to_lowercase();
    table.rows.iter().position(|row| {
        row.first()
            .and_then(Cell::as_text)
            .map(|label| label.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

/// Looks up a value by trying `keywords` in order.
///
/// The first keyword that matches any row decides the result, even when that
/// row's cell turns out not to be numeric; later keywords are not consulted.
pub fn get_value(table: &StatementTable, keywords: &[&str], column: usize) -> Option<f64> {
    for keyword in keywords {
        if let Some(row) = find_row(table, keyword) {
            let value = table.cell(row, column).and_then(parse_amount);
            tracing::trace!(
                "'{}' matched row {} in '{}' -> {:?}",
                keyword,
                row,
                table.sheet,
                value
            );
            return value;
        }
    }
    None
}

/// Reads a cell as an amount. Thousands separators and whitespace are stripped
/// from text before parsing; anything left that is not a finite number is missing.
pub fn parse_amount(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Text(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}
