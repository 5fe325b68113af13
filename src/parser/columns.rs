use std::collections::HashMap;

use crate::parser::types::CsvRecord;

/// Positional header list of an uploaded CSV.
///
/// Values are matched to headers by index. When a header name repeats, the
/// later column wins in the built record.
pub struct HeaderMap {
    headers: Vec<String>,
    indices: HashMap<String, usize>,
}

impl HeaderMap {
    /// Build a HeaderMap from the first CSV line. Names are trimmed.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::with_capacity(headers.len());
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim().to_string();
            // last occurrence wins
            indices.insert(name.clone(), i);
            header_list.push(name);
        }
        HeaderMap {
            headers: header_list,
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Index of the column that feeds `name` in built records.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// All header names in source order, duplicates included.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }

    /// Zip a data line against the headers. Missing trailing values become
    /// empty strings; values beyond the header count are dropped.
    pub fn build_record(&self, record: &csv::StringRecord) -> CsvRecord {
        let mut row = CsvRecord::new();
        for (i, header) in self.headers.iter().enumerate() {
            let value = record.get(i).map(str::trim).unwrap_or("");
            row.insert(header.clone(), value.to_string());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(cols: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cols.to_vec())
    }

    #[test]
    fn test_header_map_trims_names() {
        let hm = HeaderMap::from_headers(&make_record(&[" Nome ", "Ligacoes "]));
        assert_eq!(hm.all_headers(), &["Nome".to_string(), "Ligacoes".to_string()]);
        assert_eq!(hm.index_of("Nome"), Some(0));
        assert_eq!(hm.index_of("Missing"), None);
    }

    #[test]
    fn test_build_record_pads_missing_values() {
        let hm = HeaderMap::from_headers(&make_record(&["a", "b", "c"]));
        let row = hm.build_record(&make_record(&["1"]));
        assert_eq!(row["a"], "1");
        assert_eq!(row["b"], "");
        assert_eq!(row["c"], "");
    }

    #[test]
    fn test_build_record_drops_extra_values() {
        let hm = HeaderMap::from_headers(&make_record(&["a", "b"]));
        let row = hm.build_record(&make_record(&["1", "2", "3", "4"]));
        assert_eq!(row.len(), 2);
        assert_eq!(row["b"], "2");
    }

    #[test]
    fn test_duplicate_header_later_wins() {
        let hm = HeaderMap::from_headers(&make_record(&["x", "y", "x"]));
        assert_eq!(hm.len(), 3);
        assert_eq!(hm.index_of("x"), Some(2));
        let row = hm.build_record(&make_record(&["first", "mid", "last"]));
        assert_eq!(row.len(), 2);
        assert_eq!(row["x"], "last");
    }

    #[test]
    fn test_duplicate_header_later_wins_even_when_empty() {
        let hm = HeaderMap::from_headers(&make_record(&["x", "x"]));
        let row = hm.build_record(&make_record(&["only"]));
        assert_eq!(row["x"], "");
    }
}
