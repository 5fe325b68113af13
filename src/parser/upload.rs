use serde::Serialize;

use crate::error::AppError;
use crate::parser::pipeline::parse_csv_text;
use std::borrow::Cow;

use crate::parser::types::{CsvRecord, ParseOutput, ParseWarning};

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// One file handed over by the view layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, content: impl Into<Vec<u8>>) -> Self {
        UploadedFile {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    Csv,
    Xlsx,
    Unsupported,
}

impl FileKind {
    /// Extensions match case-insensitively (`JUL.CSV` is CSV).
    /// CSV wins over XLSX when both the MIME type and the extension match.
    pub fn detect(name: &str, mime_type: Option<&str>) -> Self {
        let lower = name.to_ascii_lowercase();
        if mime_type == Some(CSV_MIME) || lower.ends_with(".csv") {
            FileKind::Csv
        } else if mime_type == Some(XLSX_MIME) || lower.ends_with(".xlsx") {
            FileKind::Xlsx
        } else {
            FileKind::Unsupported
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Per-file outcome of an upload batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResult {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub kind: FileKind,
    pub status: UploadStatus,
    pub headers: Vec<String>,
    pub records: Option<Vec<CsvRecord>>,
    pub record_count: usize,
    pub warnings: Vec<ParseWarning>,
    pub error: Option<String>,
}

/// Process a batch of uploaded files, one at a time.
///
/// A rejected file gets an error status and does not stop the batch.
/// `on_success` is called once with the successful files, and only when
/// there is at least one.
pub fn process_upload_batch<F>(
    files: &[UploadedFile],
    max_upload_bytes: u64,
    on_success: F,
) -> Vec<UploadedFileResult>
where
    F: FnOnce(&[UploadedFileResult]),
{
    let results: Vec<UploadedFileResult> = files
        .iter()
        .map(|file| process_file(file, max_upload_bytes))
        .collect();

    let successful: Vec<UploadedFileResult> = results
        .iter()
        .filter(|r| r.status == UploadStatus::Success)
        .cloned()
        .collect();
    if !successful.is_empty() {
        on_success(&successful);
    }

    results
}

fn process_file(file: &UploadedFile, max_upload_bytes: u64) -> UploadedFileResult {
    let kind = FileKind::detect(&file.name, file.mime_type.as_deref());
    let mut result = UploadedFileResult {
        name: file.name.clone(),
        size: file.size(),
        mime_type: file.mime_type.clone(),
        kind,
        status: UploadStatus::Error,
        headers: Vec::new(),
        records: None,
        record_count: 0,
        warnings: Vec::new(),
        error: None,
    };

    match parse_upload(file, kind, max_upload_bytes) {
        Ok(output) => {
            result.status = UploadStatus::Success;
            result.record_count = output.records.len();
            result.headers = output.headers;
            result.warnings = output.warnings;
            result.records = Some(output.records);
        }
        Err(err) => {
            log::warn!("Upload '{}' rejected: {}", file.name, err);
            result.error = Some(err.to_string());
        }
    }
    result
}

fn parse_upload(
    file: &UploadedFile,
    kind: FileKind,
    max_upload_bytes: u64,
) -> Result<ParseOutput, AppError> {
    match kind {
        FileKind::Xlsx => return Err(AppError::UnsupportedSpreadsheet),
        FileKind::Unsupported => return Err(AppError::UnsupportedFileType),
        FileKind::Csv => {}
    }
    if file.size() > max_upload_bytes {
        return Err(AppError::FileTooLarge {
            size: file.size(),
            max: max_upload_bytes,
        });
    }
    // Invalid bytes are replaced rather than rejecting the file.
    let text = String::from_utf8_lossy(&file.content);
    let mut output = parse_csv_text(text.strip_prefix('\u{feff}').unwrap_or(&*text))?;
    if matches!(text, Cow::Owned(_)) {
        output.warnings.insert(
            0,
            ParseWarning {
                line: 0,
                message: AppError::InvalidUtf8(file.name.clone()).to_string(),
            },
        );
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{UNSUPPORTED_TYPE_MSG, XLSX_UNSUPPORTED_MSG};

    const MAX: u64 = 10 * 1024 * 1024;

    fn csv_file(name: &str, body: &str) -> UploadedFile {
        UploadedFile::new(name, None, body)
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(FileKind::detect("JUL_LIGACOES.csv", None), FileKind::Csv);
        assert_eq!(FileKind::detect("export", Some(CSV_MIME)), FileKind::Csv);
        assert_eq!(FileKind::detect("JUL.XLSX", None), FileKind::Xlsx);
        assert_eq!(FileKind::detect("planilha", Some(XLSX_MIME)), FileKind::Xlsx);
        assert_eq!(FileKind::detect("notes.txt", Some("text/plain")), FileKind::Unsupported);
    }

    #[test]
    fn test_detect_kind_ignores_extension_case() {
        assert_eq!(FileKind::detect("JUL_LIGACOES.CSV", None), FileKind::Csv);
        assert_eq!(FileKind::detect("Jul.Csv", Some("application/octet-stream")), FileKind::Csv);
        assert_eq!(FileKind::detect("JUL.Xlsx", None), FileKind::Xlsx);
        assert_eq!(FileKind::detect("jul.csv.bak", None), FileKind::Unsupported);
    }

    /// GIVEN a batch with a CSV, an XLSX and a PDF
    /// WHEN processed
    /// THEN the CSV succeeds and the two others carry their own fixed message
    #[test]
    fn test_batch_continues_past_rejections() {
        let files = vec![
            UploadedFile::new("JUL.xlsx", Some(XLSX_MIME), vec![0x50u8, 0x4b]),
            csv_file("JUL_LIGACOES.csv", "nome,ligacoes\nAna,10\nBruno,12\n"),
            UploadedFile::new("relatorio.pdf", Some("application/pdf"), b"%PDF".to_vec()),
        ];
        let results = process_upload_batch(&files, MAX, |_| {});

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, UploadStatus::Error);
        assert_eq!(results[0].error.as_deref(), Some(XLSX_UNSUPPORTED_MSG));
        assert_eq!(results[1].status, UploadStatus::Success);
        assert_eq!(results[1].record_count, 2);
        assert_eq!(results[1].records.as_ref().unwrap()[0]["nome"], "Ana");
        assert_eq!(results[2].status, UploadStatus::Error);
        assert_eq!(results[2].error.as_deref(), Some(UNSUPPORTED_TYPE_MSG));
    }

    #[test]
    fn test_callback_gets_only_successes() {
        let files = vec![
            csv_file("a.csv", "x\n1\n"),
            csv_file("b.txt", "x\n1\n"),
            csv_file("c.csv", "x\n"),
        ];
        let mut seen: Vec<String> = Vec::new();
        process_upload_batch(&files, MAX, |ok| {
            seen = ok.iter().map(|r| r.name.clone()).collect();
        });
        assert_eq!(seen, vec!["a.csv", "c.csv"]);
    }

    #[test]
    fn test_callback_not_called_without_success() {
        let files = vec![csv_file("b.txt", "x\n1\n")];
        let mut called = false;
        process_upload_batch(&files, MAX, |_| called = true);
        assert!(!called);
    }

    #[test]
    fn test_oversized_file_rejected() {
        let files = vec![csv_file("big.csv", "a,b\n1,2\n")];
        let results = process_upload_batch(&files, 4, |_| {});
        assert_eq!(results[0].status, UploadStatus::Error);
        assert!(results[0].error.as_ref().unwrap().contains("muito grande"));
    }

    /// GIVEN a CSV file with a byte that is not valid UTF-8
    /// WHEN processed
    /// THEN it is parsed anyway, the byte replaced and a warning attached
    #[test]
    fn test_invalid_utf8_parsed_with_warning() {
        let files = vec![UploadedFile::new(
            "latin1.csv",
            None,
            vec![b'n', b'o', b'm', b'e', b'\n', b'J', b'o', 0xe3, b'o', b'\n'],
        )];
        let results = process_upload_batch(&files, MAX, |_| {});
        assert_eq!(results[0].status, UploadStatus::Success);
        assert_eq!(results[0].record_count, 1);
        assert_eq!(results[0].records.as_ref().unwrap()[0]["nome"], "Jo\u{fffd}o");
        assert_eq!(results[0].warnings.len(), 1);
        assert_eq!(results[0].warnings[0].line, 0);
        assert!(results[0].warnings[0].message.contains("UTF-8"));
    }

    #[test]
    fn test_valid_utf8_has_no_warning() {
        let files = vec![csv_file("ok.csv", "nome\nJoão\n")];
        let results = process_upload_batch(&files, MAX, |_| {});
        assert!(results[0].warnings.is_empty());
        assert_eq!(results[0].records.as_ref().unwrap()[0]["nome"], "João");
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let files = vec![csv_file("bom.csv", "\u{feff}nome,chats\nAna,3\n")];
        let results = process_upload_batch(&files, MAX, |_| {});
        assert_eq!(results[0].headers, vec!["nome", "chats"]);
    }
}
