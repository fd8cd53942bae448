// src/extractors/record.rs

// --- Imports ---
use std::path::Path;

use serde::Serialize;

use super::header::{read_with_header, StatementTable};
use super::lookup::get_value;
use super::years::{extract_years, resolve_year, YearColumns};
use crate::utils::config::DEFAULT_HEADER_SCAN_ROWS;
use crate::utils::error::ExtractError;
use crate::workbook::{SheetGrid, WorkbookSource};

// --- Statements ---
pub const BALANCE_SHEET: &str = "CÂN ĐỐI KẾ TOÁN";
pub const INCOME_STATEMENT: &str = "KẾT QUẢ KINH DOANH";
pub const CASH_FLOW: &str = "LƯU CHUYỂN TIỀN TỆ";

/// Sheet names in the order `RecordBuilder` expects them.
pub const STATEMENT_SHEETS: [&str; 3] = [BALANCE_SHEET, INCOME_STATEMENT, CASH_FLOW];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TotalAssets,
    Equity,
    TotalLiabilities,
    CurrentAssets,
    CurrentLiabilities,
    CashAndEquivalents,
    ShortTermDebt,
    LongTermDebt,
    Revenue,
    GrossProfit,
    NetIncome,
    SellingExpenses,
    AdminExpenses,
    InterestExpenses,
    CashflowOps,
    CashflowInvesting,
    CashflowFinancing,
}

/// How one output field is found: which statement to read, and the row-label
/// keywords to try. Keywords are tried in order; the first one matching any row
/// label (case-insensitive substring) decides the value, taken from the first
/// such row.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub statement: Statement,
    pub keywords: &'static [&'static str],
}

pub const FIELD_RULES: &[FieldRule] = &[
    // Balance sheet
    FieldRule { field: Field::TotalAssets, statement: Statement::BalanceSheet, keywords: &["Tổng cộng tài sản"] },
    FieldRule { field: Field::Equity, statement: Statement::BalanceSheet, keywords: &["Vốn chủ sở hữu"] },
    FieldRule { field: Field::TotalLiabilities, statement: Statement::BalanceSheet, keywords: &["Nợ phải trả"] },
    FieldRule { field: Field::CurrentAssets, statement: Statement::BalanceSheet, keywords: &["Tài sản ngắn hạn"] },
    FieldRule { field: Field::CurrentLiabilities, statement: Statement::BalanceSheet, keywords: &["Nợ ngắn hạn"] },
    FieldRule {
        field: Field::CashAndEquivalents,
        statement: Statement::BalanceSheet,
        keywords: &["Tiền và các khoản tương đương tiền"],
    },
    FieldRule {
        field: Field::ShortTermDebt,
        statement: Statement::BalanceSheet,
        keywords: &["Vay và nợ thuê tài chính ngắn hạn"],
    },
    FieldRule {
        field: Field::LongTermDebt,
        statement: Statement::BalanceSheet,
        keywords: &["Vay và nợ thuê tài chính dài hạn"],
    },
    // Income statement
    FieldRule {
        field: Field::Revenue,
        statement: Statement::IncomeStatement,
        keywords: &["Doanh thu bán hàng", "Doanh thu thuần"],
    },
    FieldRule { field: Field::GrossProfit, statement: Statement::IncomeStatement, keywords: &["Lợi nhuận gộp"] },
    FieldRule {
        field: Field::NetIncome,
        statement: Statement::IncomeStatement,
        keywords: &["Lợi nhuận sau thuế", "Lợi nhuận sau thuế thu nhập DN"],
    },
    FieldRule { field: Field::SellingExpenses, statement: Statement::IncomeStatement, keywords: &["Chi phí bán hàng"] },
    FieldRule {
        field: Field::AdminExpenses,
        statement: Statement::IncomeStatement,
        keywords: &["Chi phí quản lý doanh nghiệp"],
    },
    FieldRule { field: Field::InterestExpenses, statement: Statement::IncomeStatement, keywords: &["Chi phí tài chính"] },
    // Cash flow
    FieldRule {
        field: Field::CashflowOps,
        statement: Statement::CashFlow,
        keywords: &[
            "Lưu chuyển tiền thuần từ hoạt động kinh doanh",
            "I. Lưu chuyển tiền từ hoạt động kinh doanh",
        ],
    },
    FieldRule {
        field: Field::CashflowInvesting,
        statement: Statement::CashFlow,
        keywords: &[
            "Lưu chuyển tiền thuần từ hoạt động đầu tư",
            "II. Lưu chuyển tiền từ hoạt động đầu tư",
        ],
    },
    FieldRule {
        field: Field::CashflowFinancing,
        statement: Statement::CashFlow,
        keywords: &[
            "Lưu chuyển tiền thuần từ hoạt động tài chính",
            "III. Lưu chuyển tiền từ hoạt động tài chính",
        ],
    },
];

// --- Data Structures ---

/// One company's figures for one fiscal year. Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyYearRecord {
    pub company_id: String,
    pub year: i32,
    pub total_assets: Option<f64>,
    pub equity: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
    pub short_term_debt: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub net_income: Option<f64>,
    pub selling_expenses: Option<f64>,
    pub admin_expenses: Option<f64>,
    pub interest_expenses: Option<f64>,
    pub cashflow_ops: Option<f64>,
    pub cashflow_investing: Option<f64>,
    pub cashflow_financing: Option<f64>,
}

impl CompanyYearRecord {
    pub fn new<S: Into<String>>(company_id: S, year: i32) -> Self {
        Self { company_id: company_id.into(), year, ..Self::default() }
    }

    pub fn set(&mut self, field: Field, value: Option<f64>) {
        let slot = match field {
            Field::TotalAssets => &mut self.total_assets,
            Field::Equity => &mut self.equity,
            Field::TotalLiabilities => &mut self.total_liabilities,
            Field::CurrentAssets => &mut self.current_assets,
            Field::CurrentLiabilities => &mut self.current_liabilities,
            Field::CashAndEquivalents => &mut self.cash_and_equivalents,
            Field::ShortTermDebt => &mut self.short_term_debt,
            Field::LongTermDebt => &mut self.long_term_debt,
            Field::Revenue => &mut self.revenue,
            Field::GrossProfit => &mut self.gross_profit,
            Field::NetIncome => &mut self.net_income,
            Field::SellingExpenses => &mut self.selling_expenses,
            Field::AdminExpenses => &mut self.admin_expenses,
            Field::InterestExpenses => &mut self.interest_expenses,
            Field::CashflowOps => &mut self.cashflow_ops,
            Field::CashflowInvesting => &mut self.cashflow_investing,
            Field::CashflowFinancing => &mut self.cashflow_financing,
        };
        *slot = value;
    }
}

/// The three statements of one workbook, headers applied.
#[derive(Debug, Clone)]
pub struct StatementSet {
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
}

impl StatementSet {
    fn table(&self, statement: Statement) -> &StatementTable {
        match statement {
            Statement::BalanceSheet => &self.balance_sheet,
            Statement::IncomeStatement => &self.income_statement,
            Statement::CashFlow => &self.cash_flow,
        }
    }
}

impl YearColumns {
    fn column(&self, statement: Statement) -> usize {
        match statement {
            Statement::BalanceSheet => self.balance_sheet,
            Statement::IncomeStatement => self.income_statement,
            Statement::CashFlow => self.cash_flow,
        }
    }
}

// --- Main Builder Structure ---
pub struct RecordBuilder {
    header_scan_rows: usize,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_SCAN_ROWS)
    }
}

impl RecordBuilder {
    pub fn new(header_scan_rows: usize) -> Self {
        Self { header_scan_rows }
    }

    /// Reads one workbook and builds a record per fiscal year it covers.
    pub fn process_file(
        &self,
        source: &dyn WorkbookSource,
        company_id: &str,
        path: &Path,
    ) -> Result<Vec<CompanyYearRecord>, ExtractError> {
        let grids = source.read_sheets(path, &STATEMENT_SHEETS)?;
        self.build_from_grids(company_id, &grids)
    }

    /// Builds records from raw grids given in `STATEMENT_SHEETS` order.
    pub fn build_from_grids(
        &self,
        company_id: &str,
        grids: &[SheetGrid],
    ) -> Result<Vec<CompanyYearRecord>, ExtractError> {
        let [bs, is, cf] = grids else {
            let sheet = STATEMENT_SHEETS.get(grids.len()).copied().unwrap_or(CASH_FLOW);
            return Err(ExtractError::SheetNotFound { sheet: sheet.to_string() });
        };

        let statements = StatementSet {
            balance_sheet: read_with_header(bs, self.header_scan_rows)?,
            income_statement: read_with_header(is, self.header_scan_rows)?,
            cash_flow: read_with_header(cf, self.header_scan_rows)?,
        };
        Ok(self.build_records(company_id, &statements))
    }

    /// One record per year discovered in the balance sheet that resolves in all three statements.
    pub fn build_records(&self, company_id: &str, statements: &StatementSet) -> Vec<CompanyYearRecord> {
        let years = extract_years(&statements.balance_sheet.columns);
        tracing::debug!("Company {} balance sheet years: {:?}", company_id, years);

        years
            .into_iter()
            .filter_map(|year| {
                let resolved = resolve_year(
                    year,
                    &statements.balance_sheet,
                    &statements.income_statement,
                    &statements.cash_flow,
                );
                if resolved.is_none() {
                    tracing::debug!("Company {}: year {} missing from a statement, skipped", company_id, year);
                }
                resolved
            })
            .map(|columns| build_record(company_id, statements, &columns))
            .collect()
    }
}

fn build_record(company_id: &str, statements: &StatementSet, columns: &YearColumns) -> CompanyYearRecord {
    let mut record = CompanyYearRecord::new(company_id, columns.year);
    for rule in FIELD_RULES {
        let value = get_value(statements.table(rule.statement), rule.keywords, columns.column(rule.statement));
        record.set(rule.field, value);
    }
    record
}
