use std::collections::BTreeMap;

use serde::Serialize;

/// One CSV data line, keyed by header name.
pub type CsvRecord = BTreeMap<String, String>;

/// Output of `parse_csv_text`: records in source order plus parse metadata.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    pub headers: Vec<String>,
    pub records: Vec<CsvRecord>,
    /// Lines whose value count differs from the header count.
    pub warnings: Vec<ParseWarning>,
    /// Whitespace-only lines after the header. Empty lines never reach the parser.
    pub skipped_blank_lines: usize,
    pub parse_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    /// 1-based; 0 for warnings about the whole file.
    pub line: u64,
    pub message: String,
}
