// src/lib.rs
pub mod corpus;
pub mod extractors;
pub mod storage;
pub mod utils;
pub mod workbook;

pub use corpus::{run_pipeline, RunOutcome, RunSummary};
pub use utils::{AppError, PipelineConfig};
