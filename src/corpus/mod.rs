// src/corpus/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::{CompanyYearRecord, RecordBuilder};
use crate::storage::StorageManager;
use crate::utils::error::AppError;
use crate::utils::PipelineConfig;
use crate::workbook::WorkbookSource;

const PREVIEW_ROWS: usize = 5;

/// A workbook queued for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFile {
    pub company_id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written(PathBuf),
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub companies: usize,
    pub files_seen: usize,
    pub files_failed: usize,
    pub records: usize,
    pub outcome: RunOutcome,
}

/// Lists `<base_dir>/<company_id>/*<extension>`, companies and files sorted by name.
///
/// Non-directory entries directly under `base_dir` are ignored. A base or company
/// directory that cannot be listed is an error for the whole run.
pub fn discover_files(base_dir: &Path, extension: &str) -> Result<(usize, Vec<CompanyFile>), AppError> {
    let mut companies = sorted_entries(base_dir)?;
    companies.retain(|path| path.is_dir());

    let mut files = Vec::new();
    for company_dir in &companies {
        let company_id = file_name(company_dir);
        for path in sorted_entries(company_dir)? {
            if file_name(&path).ends_with(extension) {
                files.push(CompanyFile { company_id: company_id.clone(), path });
            }
        }
    }

    Ok((companies.len(), files))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runs the record builder over every company workbook and collects the results.
pub struct CorpusDriver<'a> {
    source: &'a dyn WorkbookSource,
    builder: RecordBuilder,
}

/// Records gathered from one pass over the input tree.
#[derive(Debug, Default)]
pub struct Collected {
    pub companies: usize,
    pub files_seen: usize,
    pub files_failed: usize,
    pub records: Vec<CompanyYearRecord>,
}

impl<'a> CorpusDriver<'a> {
    pub fn new(source: &'a dyn WorkbookSource, builder: RecordBuilder) -> Self {
        Self { source, builder }
    }

    /// Processes every workbook under `base_dir`. A failing file is logged and
    /// contributes nothing; the remaining files are still processed.
    pub fn collect(&self, base_dir: &Path, extension: &str) -> Result<Collected, AppError> {
        let (companies, files) = discover_files(base_dir, extension)?;
        tracing::info!("Found {} workbooks across {} companies in {}", files.len(), companies, base_dir.display());

        let mut collected = Collected { companies, files_seen: files.len(), ..Collected::default() };

        for file in &files {
            tracing::info!("Processing {}: {}", file.company_id, file.path.display());
            match self.builder.process_file(self.source, &file.company_id, &file.path) {
                Ok(records) => {
                    tracing::debug!("{} records from {}", records.len(), file.path.display());
                    collected.records.extend(records);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping {} file {} [{}]: {}",
                        file.company_id,
                        file.path.display(),
                        e.kind(),
                        e
                    );
                    collected.files_failed += 1;
                }
            }
        }

        Ok(collected)
    }
}

/// Full run: collect the corpus and write it, unless nothing was extracted.
pub fn run_pipeline(config: &PipelineConfig, source: &dyn WorkbookSource) -> Result<RunSummary, AppError> {
    let driver = CorpusDriver::new(source, RecordBuilder::new(config.header_scan_rows));
    let collected = driver.collect(&config.base_dir, &config.file_extension)?;

    let outcome = if collected.records.is_empty() {
        tracing::warn!(
            "No data extracted: {} of {} workbooks failed, nothing written to {}",
            collected.files_failed,
            collected.files_seen,
            config.output_path.display()
        );
        RunOutcome::NoData
    } else {
        let storage = StorageManager::new(&config.output_path)?;
        let path = storage.save_corpus(&collected.records)?;
        for record in collected.records.iter().take(PREVIEW_ROWS) {
            tracing::info!("{:?}", record);
        }
        RunOutcome::Written(path)
    };

    tracing::info!(
        "Processing finished. Companies: {}, Workbooks: {}, Failures: {}, Records: {}",
        collected.companies,
        collected.files_seen,
        collected.files_failed,
        collected.records.len()
    );

    Ok(RunSummary {
        companies: collected.companies,
        files_seen: collected.files_seen,
        files_failed: collected.files_failed,
        records: collected.records.len(),
        outcome,
    })
}
