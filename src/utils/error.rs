// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application

/// File-level extraction failures. Any of these abandons the whole workbook.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unreadable workbook {path}: {reason}")]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("No header row with a year marker in the first {scanned} rows of sheet {sheet}")]
    HeaderNotFound { sheet: String, scanned: usize },
}

impl ExtractError {
    /// Short stable name of the failure kind, used in skip logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::UnreadableFile { .. } => "UnreadableFile",
            ExtractError::SheetNotFound { .. } => "SheetNotFound",
            ExtractError::HeaderNotFound { .. } => "HeaderNotFound",
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
