// src/workbook/mod.rs
pub mod reader;

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::utils::error::ExtractError;

pub use reader::XlsxSource;

/// One spreadsheet cell, reduced to the shapes the extractors care about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Error,
}

impl Cell {
    /// Builds a text cell, NFC-normalizing so composed and decomposed labels compare equal.
    pub fn text<S: AsRef<str>>(value: S) -> Self {
        Cell::Text(nfc(value.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::Error => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::text(value)
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Integral numbers render without a fractional part so a `2023` header stays `2023`.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn nfc(value: &str) -> String {
    value.nfc().collect()
}

/// A sheet's raw cell grid, without any header applied.
///
/// Row 0 is the first row of the sheet's used range.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    pub fn new<S: Into<String>>(name: S, rows: Vec<Vec<Cell>>) -> Self {
        Self { name: name.into(), rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Where workbooks come from. The pipeline only ever asks for whole sheets by name.
pub trait WorkbookSource {
    /// Reads the named sheets of one workbook, returned in the order requested.
    ///
    /// Fails with `SheetNotFound` if any sheet is absent and `UnreadableFile` if
    /// the workbook cannot be opened or decoded.
    fn read_sheets(&self, path: &Path, sheet_names: &[&str]) -> Result<Vec<SheetGrid>, ExtractError>;
}
