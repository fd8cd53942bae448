// src/extractors/mod.rs
pub mod header;
pub mod lookup;
pub mod record;
pub mod years;

// Re-export key extraction types for convenience
pub use header::{locate_header, promote_header, read_with_header, StatementTable};
pub use lookup::{get_value, parse_amount};
pub use record::{CompanyYearRecord, Field, FieldRule, RecordBuilder, Statement, FIELD_RULES, STATEMENT_SHEETS};
pub use years::{extract_years, resolve_year, YearColumns};
