//! `${DATETIME...}` pseudo-variable resolution.
//!
//! The reserved token comes in three shapes: `${DATETIME}` (UTC),
//! `${DATETIME_EST}` (named three-letter timezone), and `${DATETIME+5}` /
//! `${DATETIME-8}` (fixed hour shift from UTC, no DST awareness). Only the
//! first token in a line is resolved.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Timestamp layout: zero-padded 12-hour clock with AM/PM, no zone suffix.
pub const STAMP_FORMAT: &str = "%Y-%m-%dT%I:%M:%S%p";

static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{DATETIME(_[A-Za-z]{3}|[+-][0-9]{1,2}|)\}").unwrap());

/// Why a date token could not be resolved.
///
/// The caller leaves the token literal in both renderings and records the
/// error; resolution failures are never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("unable to load timezone {0}")]
    UnknownZone(String),

    #[error("unable to parse timezone offset {0}")]
    BadOffset(String),
}

/// A resolved date token: where it sits in the line and what it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Byte offset of the token's start.
    pub start: usize,

    /// Byte offset just past the token's end.
    pub end: usize,

    /// Formatted timestamp to splice in.
    pub value: String,
}

/// Find the first date token in `line` and render it at instant `now`.
///
/// Returns `Ok(None)` when the line has no date token.
pub fn resolve_first(line: &str, now: DateTime<Utc>) -> Result<Option<DateMatch>, DateError> {
    let caps = match DATE_TOKEN.captures(line) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let span = caps.get(0).unwrap();
    let suffix = &caps[1];

    let value = if suffix.is_empty() {
        now.format(STAMP_FORMAT).to_string()
    } else if let Some(zone) = suffix.strip_prefix('_') {
        let zone = zone.to_uppercase();
        let tz: Tz = zone.parse().map_err(|_| DateError::UnknownZone(zone.clone()))?;
        now.with_timezone(&tz).format(STAMP_FORMAT).to_string()
    } else {
        let hours: i64 =
            suffix.parse().map_err(|_| DateError::BadOffset(suffix.to_string()))?;
        (now + Duration::hours(hours)).format(STAMP_FORMAT).to_string()
    };

    Ok(Some(DateMatch { start: span.start(), end: span.end(), value }))
}
