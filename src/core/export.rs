//! Spreadsheet export of the list

use crate::core::csv::{self, BOM};
use crate::core::table::RowSource;
use crate::model::{Row, HEADER};
use chrono::{DateTime, FixedOffset};

/// A serialised list ready to be saved or downloaded
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Suggested file name, `list_<YYYYMMDD_HHMM>.csv`
    pub file_name: String,
    /// UTF-8 text with a leading BOM
    pub contents: String,
    pub rows: usize,
    pub source: RowSource,
}

pub fn file_name(at: &DateTime<FixedOffset>) -> String {
    format!("list_{}.csv", at.format("%Y%m%d_%H%M"))
}

/// BOM, header line, then one line per row
pub fn serialize_rows(rows: &[Row]) -> String {
    let mut records: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    records.push(HEADER.iter().map(|s| s.to_string()).collect());
    records.extend(rows.iter().map(Row::to_record));

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&csv::encode(records.as_slice()));
    out
}

/// Read back an exported document (header line skipped)
pub fn parse_rows(text: &str) -> Result<Vec<Row>, String> {
    Ok(csv::decode(text)?
        .iter()
        .skip(1)
        .filter_map(|record| Row::from_record(record))
        .collect())
}
