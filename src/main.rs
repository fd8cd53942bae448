// src/main.rs
use clap::Parser;
use statement_extractor::utils::{self, config, AppError, PipelineConfig};
use statement_extractor::workbook::XlsxSource;
use statement_extractor::{run_pipeline, RunOutcome};

/// Extracts balance sheet, income statement and cash flow figures from
/// per-company Excel filings into one CSV.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory holding one subdirectory of workbooks per company
    #[arg(short, long, default_value = config::DEFAULT_BASE_DIR)]
    input_dir: String,

    /// Destination CSV file (overwritten)
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_PATH)]
    output: String,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let config = PipelineConfig::new(&args.input_dir, &args.output).with_env_overrides();
    tracing::debug!("Pipeline config: {:?}", config);

    // 3. Run over all companies
    let summary = run_pipeline(&config, &XlsxSource::new())?;

    match summary.outcome {
        RunOutcome::Written(path) => tracing::info!("Done! Data saved to {}", path.display()),
        RunOutcome::NoData => tracing::warn!("No data was processed."),
    }

    Ok(())
}
