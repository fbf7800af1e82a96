//! Due-date parsing and classification.
//!
//! Classification works at day granularity: both the due date and "now" are
//! cut down to their UTC calendar day before they are compared.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Width of the due-soon window when none is configured.
pub const DEFAULT_DUE_SOON_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueStatus {
    pub overdue: bool,
    pub due_soon: bool,
}

/// Classify `due` against `now` with the default three-day window.
pub fn classify_due(due: DateTime<Utc>, now: DateTime<Utc>) -> DueStatus {
    classify_due_within(due, now, DEFAULT_DUE_SOON_DAYS)
}

/// Overdue: due day strictly before today.
/// Due soon: due day strictly after today and strictly before today + `window_days`.
pub fn classify_due_within(due: DateTime<Utc>, now: DateTime<Utc>, window_days: u32) -> DueStatus {
    let today = now.date_naive();
    let due_day = due.date_naive();
    let horizon = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);

    DueStatus {
        overdue: due_day < today,
        due_soon: due_day > today && due_day < horizon,
    }
}

/// Parse a due date from RFC 3339 (`2024-01-10T09:30:00Z`), a bare local
/// timestamp (`2024-01-10T09:30:00`, read as UTC), or a calendar day
/// (`2024-01-10`, midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::InvalidDate("empty date".to_string()));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(parsed.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(Error::InvalidDate(text.to_string()))
}

/// Serde adapter accepting every format [`parse_due_date`] understands.
pub fn deserialize_due_date<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw).map_err(serde::de::Error::custom)
}

/// Optional variant of [`deserialize_due_date`] for patches.
pub fn deserialize_opt_due_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|text| parse_due_date(&text).map_err(serde::de::Error::custom))
        .transpose()
}
