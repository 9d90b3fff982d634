//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::StoreError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `StoreError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a required TEXT column as an ISO 8601 calendar date.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string is not `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| StoreError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all proctor-core enums regardless of their rename policy.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| StoreError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `StoreError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, StoreError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Parse a JSON-array TEXT column into a `Vec<String>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if the column is not a valid JSON string array.
pub fn parse_string_list(s: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(s)
        .map_err(|e| StoreError::Query(format!("Invalid JSON list in column: {e}")))
}

/// Parse a JSON-array TEXT column of ISO dates into a `Vec<NaiveDate>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if the column is not a valid JSON date array.
pub fn parse_date_list(s: &str) -> Result<Vec<NaiveDate>, StoreError> {
    let raw: Vec<String> = parse_string_list(s)?;
    raw.iter().map(|d| parse_date(d)).collect()
}

/// Serialize a string list to its JSON-array TEXT representation.
///
/// # Errors
///
/// Returns `StoreError::Query` on serialization failure (practically never).
pub fn to_json_list<T: serde::Serialize>(items: &[T]) -> Result<String, StoreError> {
    serde_json::to_string(items)
        .map_err(|e| StoreError::Query(format!("Failed to serialize list: {e}")))
}

/// Read a nullable INTEGER column as `Option<bool>`.
///
/// # Errors
///
/// Returns `StoreError` if the column read fails.
pub fn get_opt_bool(row: &libsql::Row, idx: i32) -> Result<Option<bool>, StoreError> {
    Ok(row.get::<Option<i64>>(idx)?.map(|v| v != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_accepts_both_formats() {
        assert!(parse_datetime("2026-02-09T14:30:00+00:00").is_ok());
        assert!(parse_datetime("2026-02-09 14:30:00").is_ok());
        assert!(parse_datetime("not a datetime").is_err());
    }

    #[test]
    fn parse_date_roundtrip() {
        let date = parse_date("2025-03-15").unwrap();
        assert_eq!(date.to_string(), "2025-03-15");
        assert!(parse_date("15/03/2025").is_err());
    }

    #[test]
    fn date_list_roundtrip() {
        let json = to_json_list(&["2025-03-15", "2025-03-16"]).unwrap();
        let dates = parse_date_list(&json).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].to_string(), "2025-03-15");
    }

    #[test]
    fn parse_enum_uses_serde_names() {
        use proctor_core::enums::{ExamType, VerificationMethod};
        let exam: ExamType = parse_enum("SEM").unwrap();
        assert_eq!(exam, ExamType::Sem);
        let method: VerificationMethod = parse_enum("qr-scan").unwrap();
        assert_eq!(method, VerificationMethod::QrScan);
        assert!(parse_enum::<ExamType>("Final").is_err());
    }
}
