// src/storage/mod.rs
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::extractors::CompanyYearRecord;
use crate::utils::error::StorageError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct StorageManager {
    output_path: PathBuf,
}

impl StorageManager {
    /// Creates a StorageManager writing to `output_path`, creating its parent directory if needed.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Result<Self, StorageError> {
        let output_path = output_path.as_ref().to_path_buf();

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self { output_path })
    }

    /// Writes the whole corpus as BOM-prefixed UTF-8 CSV, replacing any existing file.
    pub fn save_corpus(&self, records: &[CompanyYearRecord]) -> Result<PathBuf, StorageError> {
        let file = fs::File::create(&self.output_path).map_err(StorageError::IoError)?;
        let mut out = BufWriter::new(file);
        out.write_all(UTF8_BOM)?;

        let mut writer = csv::Writer::from_writer(out);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} records to {}", records.len(), self.output_path.display());

        Ok(self.output_path.clone())
    }
}
