//! Well-formedness layer for coverage dates.
//!
//! Only calendar and offset validity is checked here. Whether a date is in
//! the past or how it relates to the other end of the coverage window is
//! decided by `validation::rules`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateFormatError {
    #[error("date value is empty")]
    Empty,
    #[error("'{raw}' is not written as YYYY-MM-DD")]
    NotIsoDate { raw: String },
    #[error("'{raw}' is not a valid calendar date ({source})")]
    Malformed {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parses `YYYY-MM-DD`, an RFC 3339 timestamp, or an offset-less local
/// timestamp into the calendar date it names.
///
/// Timestamps keep the date as written in their own offset, so
/// `2025-05-01T23:30:00-03:00` is still the first of May.
pub fn parse_coverage_date(raw: &str) -> Result<NaiveDate, DateFormatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateFormatError::Empty);
    }

    let malformed = |source| DateFormatError::Malformed {
        raw: raw.to_string(),
        source,
    };

    if !has_iso_date_shape(date_part(trimmed)) {
        return Err(DateFormatError::NotIsoDate {
            raw: raw.to_string(),
        });
    }

    if !trimmed.contains(['T', 't', ' ']) {
        return NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(malformed);
    }

    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(timestamp) => Ok(timestamp.date_naive()),
        Err(offset_error) => {
            if has_offset_suffix(trimmed) {
                return Err(malformed(offset_error));
            }
            NaiveDateTime::parse_from_str(trimmed, LOCAL_DATE_TIME_FORMAT)
                .map(|timestamp| timestamp.date())
                .map_err(malformed)
        }
    }
}

fn date_part(value: &str) -> &str {
    match value.find(['T', 't', ' ']) {
        Some(time_start) => &value[..time_start],
        None => value,
    }
}

// Four-digit year, two-digit month and day; chrono alone accepts `2025-5-1`.
fn has_iso_date_shape(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

// Anything after the time portion that starts with Z, + or - is an offset.
fn has_offset_suffix(value: &str) -> bool {
    let Some(time_start) = value.find(['T', 't', ' ']) else {
        return false;
    };
    value[time_start + 1..].contains(['Z', 'z', '+', '-'])
}
