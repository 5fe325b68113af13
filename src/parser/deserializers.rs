use chrono::NaiveDate;

const ISO_DATE_FMT: &str = "%Y-%m-%d";

/// Parse an ISO date ("2025-07-01"). Returns None for empty or unparseable strings.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FMT).ok()
}

/// Parse the longest leading decimal number of a string, the way form inputs
/// are read: "4.5" → 4.5, "3abc" → 3.0, "  -2" → -2.0, "abc" → None.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || has_digits {
            has_digits = has_digits || frac_end > frac_start;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }
    trimmed[..end].parse::<f64>().ok()
}

/// Serde-compatible deserializers for use with `#[serde(deserialize_with = "de::...")]`.
pub mod de {
    use serde::{self, Deserialize, Deserializer};
    use serde_json::Value;

    use super::parse_float_prefix;

    /// 42 → 42.0, "42" → 42.0, null / "" → 0.0
    pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0.0),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| serde::de::Error::custom("número fora do intervalo")),
            Value::String(s) if s.trim().is_empty() => Ok(0.0),
            Value::String(s) => parse_float_prefix(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("número inválido: {s:?}"))),
            other => Err(serde::de::Error::custom(format!(
                "número esperado, recebido {other}"
            ))),
        }
    }

    /// Same as `lenient_f64`, truncated toward zero and clamped at 0.
    pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = lenient_f64(deserializer)?;
        Ok(if v.is_finite() && v > 0.0 { v as u64 } else { 0 })
    }

    /// Like `lenient_u64`, keeping null / absent as None.
    pub fn lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            other => lenient_u64(other).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
