//! Conversion of contract-native encodings into local types.
//!
//! Contract integers reach us in whatever shape the JS bridge produced:
//! plain JSON numbers, decimal strings, `0x` hex strings, or serialized
//! ethers `BigNumber` objects (`{"_hex": "0x..", "_isBigNumber": true}` or
//! `{"type": "BigNumber", "hex": "0x.."}`).

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("value {0} does not fit in 64 bits")]
    Overflow(String),
    #[error("expected an unsigned integer, got {0}")]
    NotAnInteger(String),
}

pub fn parse_uint(value: &Value) -> Result<u64, ConversionError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ConversionError::NotAnInteger(n.to_string())),
        Value::String(s) => parse_uint_str(s),
        Value::Object(map) => {
            let hex = map
                .get("_hex")
                .or_else(|| map.get("hex"))
                .and_then(Value::as_str)
                .ok_or_else(|| ConversionError::NotAnInteger(value.to_string()))?;
            parse_uint_str(hex)
        }
        other => Err(ConversionError::NotAnInteger(other.to_string())),
    }
}

fn parse_uint_str(raw: &str) -> Result<u64, ConversionError> {
    let s = raw.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        let digits = hex.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(0);
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConversionError::NotAnInteger(raw.to_owned()));
        }
        if digits.len() > 16 {
            return Err(ConversionError::Overflow(raw.to_owned()));
        }
        return u64::from_str_radix(digits, 16)
            .map_err(|_| ConversionError::NotAnInteger(raw.to_owned()));
    }

    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConversionError::NotAnInteger(raw.to_owned()));
    }
    s.parse::<u64>()
        .map_err(|_| ConversionError::Overflow(raw.to_owned()))
}

const DATE_FORMAT: &str = "%-d %b, %Y";

/// Formats a unix timestamp (seconds) as `"16 Oct, 2026"` in UTC.
pub fn format_date(timestamp_secs: u64) -> String {
    format_date_in(timestamp_secs, &Utc)
}

/// Same as [`format_date`], on the calendar of `tz`. The page passes
/// `chrono::Local` so dates follow the visitor's time zone.
pub fn format_date_in<Tz>(timestamp_secs: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match i64::try_from(timestamp_secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
    {
        Some(utc) => utc.with_timezone(tz).format(DATE_FORMAT).to_string(),
        None => timestamp_secs.to_string(),
    }
}
