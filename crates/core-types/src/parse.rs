//! Lenient field parsers for the flat files the pipeline reads.
//!
//! Price histories arrive from heterogeneous exports, so timestamps come in a
//! handful of layouts and numeric fields may hold `inf`/`nan` spellings.

use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses a week-ended timestamp. Returns `None` when no known layout matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parses a numeric field.
///
/// * empty and `nan` spellings are missing (`Ok(None)`)
/// * infinite spellings are normalized to zero
/// * plain and scientific decimal notation are accepted
pub fn parse_figure(raw: &str) -> Result<Option<Decimal>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.trim_start_matches(['+', '-']).to_ascii_lowercase().as_str() {
        "nan" => return Ok(None),
        "inf" | "infinity" => return Ok(Some(Decimal::ZERO)),
        _ => {}
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|_| CoreError::InvalidInput("numeric field".to_string(), trimmed.to_string()))
}

/// `serde` adapter for [`parse_figure`], used on derived-record columns.
pub fn deserialize_figure<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_figure(&raw).map_err(serde::de::Error::custom)
}

/// `serde` adapter for [`parse_timestamp`]. Unparseable text becomes `None`
/// rather than an error so that one bad row never rejects the whole file.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_timestamp(&raw))
}
