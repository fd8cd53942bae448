// tests/pipeline.rs
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rust_xlsxwriter::Workbook;
use statement_extractor::extractors::record::{BALANCE_SHEET, CASH_FLOW, INCOME_STATEMENT};
use statement_extractor::utils::error::ExtractError;
use statement_extractor::utils::logging::build_subscriber;
use statement_extractor::workbook::{nfc, Cell, SheetGrid, WorkbookSource, XlsxSource};
use statement_extractor::{run_pipeline, PipelineConfig, RunOutcome};
use tracing_subscriber::EnvFilter;

/// Serves prepared grids keyed by workbook path.
#[derive(Default)]
struct MemorySource {
    workbooks: HashMap<PathBuf, Vec<SheetGrid>>,
}

impl WorkbookSource for MemorySource {
    fn read_sheets(&self, path: &Path, sheet_names: &[&str]) -> Result<Vec<SheetGrid>, ExtractError> {
        let sheets = self.workbooks.get(path).ok_or_else(|| ExtractError::UnreadableFile {
            path: path.to_path_buf(),
            reason: "not a workbook".to_string(),
        })?;
        sheet_names
            .iter()
            .map(|name| {
                sheets
                    .iter()
                    .find(|grid| grid.name == nfc(name))
                    .cloned()
                    .ok_or_else(|| ExtractError::SheetNotFound { sheet: name.to_string() })
            })
            .collect()
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn statement(name: &str, lines: &[(&str, f64, f64)]) -> SheetGrid {
    let mut rows = vec![
        vec![Cell::from("BÁO CÁO TÀI CHÍNH")],
        vec![Cell::from("Đơn vị: VND")],
        vec![Cell::from("Chỉ tiêu"), Cell::from("Năm/2022"), Cell::from("Năm/2023")],
    ];
    for (label, a, b) in lines {
        rows.push(vec![Cell::from(*label), Cell::Number(*a), Cell::Number(*b)]);
    }
    SheetGrid::new(name, rows)
}

fn full_workbook() -> Vec<SheetGrid> {
    vec![
        statement(BALANCE_SHEET, &[("TỔNG CỘNG TÀI SẢN", 1000.0, 1100.0), ("D. VỐN CHỦ SỞ HỮU", 400.0, 450.0)]),
        statement(INCOME_STATEMENT, &[("Doanh thu thuần", 800.0, 900.0)]),
        statement(CASH_FLOW, &[("Lưu chuyển tiền thuần từ hoạt động kinh doanh", 50.0, 70.0)]),
    ]
}

/// Creates `<base>/<company>/<file>` on disk and returns its path.
fn touch(base: &Path, company: &str, file: &str) -> PathBuf {
    let dir = base.join(company);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file);
    fs::write(&path, b"").unwrap();
    path
}

fn read_csv_body(path: &Path) -> Vec<String> {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "output must carry a UTF-8 BOM");
    String::from_utf8(bytes[3..].to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_failed_company_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("landing");
    let output = dir.path().join("cleaned").join("all_companies.csv");

    let mut source = MemorySource::default();
    source.workbooks.insert(touch(&base, "AAA", "bctc.xlsx"), full_workbook());
    let mut missing_cash_flow = full_workbook();
    missing_cash_flow.pop();
    source.workbooks.insert(touch(&base, "BBB", "bctc.xlsx"), missing_cash_flow);

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = build_subscriber(EnvFilter::new("info"), move || writer.clone());
    let summary = tracing::subscriber::with_default(subscriber, || {
        run_pipeline(&PipelineConfig::new(&base, &output), &source).unwrap()
    });

    let output_log = logs.contents();
    let skips: Vec<&str> = output_log.lines().filter(|l| l.contains("Skipping")).collect();
    assert_eq!(skips.len(), 1, "log was:\n{}", output_log);
    assert!(skips[0].contains("WARN"));
    assert!(skips[0].contains("BBB"));
    assert!(skips[0].contains("bctc.xlsx"));
    assert!(skips[0].contains("[SheetNotFound]"));
    assert!(skips[0].contains(CASH_FLOW));

    assert_eq!(summary.companies, 2);
    assert_eq!(summary.files_seen, 2);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.outcome, RunOutcome::Written(output.clone()));

    let lines = read_csv_body(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("company_id,year,total_assets,equity,"));
    assert!(lines[1].starts_with("AAA,2022,1000.0,400.0,"));
    assert!(lines[2].starts_with("AAA,2023,1100.0,450.0,"));
    assert!(lines.iter().all(|l| !l.starts_with("BBB")));
}

#[test]
fn test_all_files_failing_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("landing");
    let output = dir.path().join("out.csv");

    let mut source = MemorySource::default();
    let mut no_header = full_workbook();
    no_header[1] = SheetGrid::new(INCOME_STATEMENT, vec![vec![Cell::from("Chỉ tiêu")]]);
    source.workbooks.insert(touch(&base, "AAA", "a.xlsx"), no_header);
    // Listed on disk but not a readable workbook.
    touch(&base, "BBB", "b.xlsx");

    let summary = run_pipeline(&PipelineConfig::new(&base, &output), &source).unwrap();

    assert_eq!(summary.files_failed, 2);
    assert_eq!(summary.outcome, RunOutcome::NoData);
    assert!(!output.exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("landing");
    let output = dir.path().join("out.csv");

    let mut source = MemorySource::default();
    for company in ["ZZZ", "AAA", "MMM"] {
        source.workbooks.insert(touch(&base, company, "2023.xlsx"), full_workbook());
        source.workbooks.insert(touch(&base, company, "2022.xlsx"), full_workbook());
    }
    let config = PipelineConfig::new(&base, &output);

    run_pipeline(&config, &source).unwrap();
    let first = fs::read(&output).unwrap();
    run_pipeline(&config, &source).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
    // Companies are emitted in name order, duplicates across files kept.
    let lines = read_csv_body(&output);
    assert_eq!(lines.len(), 1 + 3 * 2 * 2);
    assert!(lines[1].starts_with("AAA,"));
    assert!(lines[12].starts_with("ZZZ,"));
}

fn write_xlsx(path: &Path, preamble_rows: u32) {
    let mut workbook = Workbook::new();
    let sheets: [(&str, &[(&str, &str, &str)]); 3] = [
        (BALANCE_SHEET, &[("Tổng cộng tài sản", "1,500", "1,650.5"), ("Nợ ngắn hạn", "-", "300")]),
        (INCOME_STATEMENT, &[("1. Doanh thu bán hàng và cung cấp dịch vụ", "900", "990")]),
        (CASH_FLOW, &[("II. Lưu chuyển tiền từ hoạt động đầu tư", "-40", "-45")]),
    ];

    for (name, lines) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).unwrap();
        sheet.write_string(0, 0, "CÔNG TY CỔ PHẦN XYZ").unwrap();
        let header = preamble_rows;
        sheet.write_string(header, 0, "Chỉ tiêu").unwrap();
        sheet.write_string(header, 1, "Năm/2021").unwrap();
        sheet.write_string(header, 2, "Năm/2022").unwrap();
        for (i, (label, a, b)) in lines.iter().enumerate() {
            let row = header + 1 + i as u32;
            sheet.write_string(row, 0, *label).unwrap();
            sheet.write_string(row, 1, *a).unwrap();
            sheet.write_string(row, 2, *b).unwrap();
        }
    }

    workbook.save(path).unwrap();
}

#[test]
fn test_reads_real_xlsx_workbooks() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("landing");
    let output = dir.path().join("out.csv");

    fs::create_dir_all(base.join("XYZ")).unwrap();
    write_xlsx(&base.join("XYZ").join("bctc.xlsx"), 5);
    fs::write(base.join("XYZ").join("broken.xlsx"), b"not a zip archive").unwrap();

    let summary = run_pipeline(&PipelineConfig::new(&base, &output), &XlsxSource::new()).unwrap();

    assert_eq!(summary.files_seen, 2);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.records, 2);

    let lines = read_csv_body(&output);
    // total_assets, equity, total_liabilities, current_assets, current_liabilities
    assert!(lines[1].starts_with("XYZ,2021,1500.0,,,,,"));
    assert!(lines[2].starts_with("XYZ,2022,1650.5,,,,300.0,"));

    let body = lines.join("\n");
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let revenue = headers.iter().position(|h| h == "revenue").unwrap();
    let investing = headers.iter().position(|h| h == "cashflow_investing").unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(&rows[0][revenue], "900.0");
    assert_eq!(&rows[1][investing], "-45.0");
}

#[test]
fn test_header_found_anywhere_in_scan_window() {
    let dir = tempfile::tempdir().unwrap();
    let near = dir.path().join("near.xlsx");
    let far = dir.path().join("far.xlsx");
    write_xlsx(&near, 2);
    write_xlsx(&far, 12);

    let source = XlsxSource::new();
    for path in [&near, &far] {
        let grids = source.read_sheets(path, &[BALANCE_SHEET]).unwrap();
        let header = statement_extractor::extractors::locate_header(&grids[0], 15).unwrap();
        let expected = if path == &near { 2 } else { 12 };
        assert_eq!(header, expected);
    }
}
