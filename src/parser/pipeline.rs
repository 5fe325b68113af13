use std::io::Read;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::columns::HeaderMap;
use crate::parser::types::{ParseOutput, ParseWarning};

/// Parse the text of one uploaded CSV file.
///
/// Plain comma splitting: quoting is disabled, so a value can never contain a
/// comma and `"` is kept as an ordinary character.
pub fn parse_csv_text(text: &str) -> Result<ParseOutput, AppError> {
    parse_csv_reader(text.as_bytes())
}

/// Parse CSV from any `Read` source.
///
/// The first physical line is the header, even when it is blank (a blank
/// header line gives the single header `""`). Records end at `\n` only; the
/// `\r` of CRLF files is trimmed away with the rest of the whitespace.
pub fn parse_csv_reader<R: Read>(mut reader: R) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(bytes.as_slice());

    // The reader drops empty lines, so a blank header line never comes back
    // as a record.
    let mut header_map: Option<HeaderMap> = if first_line_is_blank(&bytes) {
        Some(HeaderMap::from_headers(&csv::StringRecord::from(vec![""])))
    } else {
        None
    };
    let mut out = ParseOutput::default();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let Some(headers) = header_map.as_ref() else {
            header_map = Some(HeaderMap::from_headers(&record));
            continue;
        };

        if is_blank(&record) {
            out.skipped_blank_lines += 1;
            continue;
        }

        if record.len() != headers.len() {
            out.warnings.push(ParseWarning {
                line,
                message: format!(
                    "{} valores para {} colunas",
                    record.len(),
                    headers.len()
                ),
            });
        }
        out.records.push(headers.build_record(&record));
    }

    if let Some(headers) = header_map {
        out.headers = headers.all_headers().to_vec();
    }
    out.parse_duration_ms = start.elapsed().as_millis() as u64;

    log::info!(
        "CSV parsed: {} records, {} columns, {} warnings",
        out.records.len(),
        out.headers.len(),
        out.warnings.len()
    );

    Ok(out)
}

fn first_line_is_blank(bytes: &[u8]) -> bool {
    let first = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    String::from_utf8_lossy(first).trim().is_empty()
}

/// A line that is empty once trimmed (whitespace-only lines come back as a
/// single empty field).
fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, |f| f.trim().is_empty())
}
