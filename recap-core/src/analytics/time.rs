//! UTC calendar helpers.
//!
//! All calendar math in recap is UTC-only; no local timezone is ever applied.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use crate::error::{Error, Result};
use crate::types::PlayHistoryRecord;

/// Convert Unix seconds to a UTC datetime.
///
/// Timestamps outside chrono's representable range are a `Configuration` error.
pub fn to_utc(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| Error::configuration(format!("timestamp {} is out of range", ts)))
}

/// First second of `year` (Jan 1 00:00:00 UTC), inclusive.
pub fn year_start(year: i32) -> Result<i64> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| Error::configuration(format!("year {} is out of range", year)))
}

/// Last second of `year` (Dec 31 23:59:59 UTC), inclusive.
pub fn year_end(year: i32) -> Result<i64> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| Error::configuration(format!("year {} is out of range", year)))
}

/// Inclusive `(start, end)` bounds for `year`.
pub fn year_bounds(year: i32) -> Result<(i64, i64)> {
    Ok((year_start(year)?, year_end(year)?))
}

/// Whether `ts` falls within `year` (UTC).
pub fn in_year(ts: i64, year: i32) -> Result<bool> {
    let (start, end) = year_bounds(year)?;
    Ok(ts >= start && ts <= end)
}

/// Month index 0-11.
pub fn month_index(ts: i64) -> Result<usize> {
    Ok(to_utc(ts)?.month0() as usize)
}

/// Hour index 0-23.
pub fn hour_index(ts: i64) -> Result<usize> {
    Ok(to_utc(ts)?.hour() as usize)
}

/// Weekday index 0-6, 0 = Sunday.
pub fn weekday_index(ts: i64) -> Result<usize> {
    Ok(to_utc(ts)?.weekday().num_days_from_sunday() as usize)
}

/// UTC calendar date of a timestamp.
pub fn calendar_date(ts: i64) -> Result<NaiveDate> {
    Ok(to_utc(ts)?.date_naive())
}

/// UTC calendar date as `YYYY-MM-DD`.
pub fn date_string(ts: i64) -> Result<String> {
    Ok(calendar_date(ts)?.format("%Y-%m-%d").to_string())
}

/// Apply a calendar conversion to a record's start time.
///
/// Records whose timestamp cannot be converted are logged and yield `None`.
pub(crate) fn or_skip<T>(
    record: &PlayHistoryRecord,
    convert: impl Fn(i64) -> Result<T>,
) -> Option<T> {
    match convert(record.viewed_at) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(
                history_key = record.history_key,
                viewed_at = record.viewed_at,
                error = %e,
                "Skipping record with out-of-range timestamp"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECS_PER_DAY: i64 = 86_400;
    // 2024-01-01T00:00:00Z, a Monday
    const JAN_1_2024: i64 = 1_704_067_200;

    #[test]
    fn test_year_bounds() {
        let (start, end) = year_bounds(2024).unwrap();
        assert_eq!(start, JAN_1_2024);
        // 2024 is a leap year: 366 days
        assert_eq!(end, JAN_1_2024 + 366 * SECS_PER_DAY - 1);
        assert_eq!(year_start(2025).unwrap(), end + 1);
    }

    #[test]
    fn test_in_year_edges() {
        let (start, end) = year_bounds(2024).unwrap();
        assert!(in_year(start, 2024).unwrap());
        assert!(in_year(end, 2024).unwrap());
        assert!(!in_year(start - 1, 2024).unwrap());
        assert!(!in_year(end + 1, 2024).unwrap());
    }

    #[test]
    fn test_year_out_of_range_is_configuration_error() {
        let err = year_start(i32::MAX).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_calendar_indices() {
        assert_eq!(month_index(JAN_1_2024).unwrap(), 0);
        assert_eq!(hour_index(JAN_1_2024).unwrap(), 0);
        assert_eq!(weekday_index(JAN_1_2024).unwrap(), 1); // Monday

        // 2024-12-29T23:30:00Z, a Sunday
        let ts = 1_735_515_000;
        assert_eq!(month_index(ts).unwrap(), 11);
        assert_eq!(hour_index(ts).unwrap(), 23);
        assert_eq!(weekday_index(ts).unwrap(), 0);
        assert_eq!(date_string(ts).unwrap(), "2024-12-29");
    }

    #[test]
    fn test_pre_epoch_date() {
        assert_eq!(date_string(-1).unwrap(), "1969-12-31");
    }

    #[test]
    fn test_out_of_range_timestamp_is_configuration_error() {
        assert!(to_utc(i64::MAX).unwrap_err().is_configuration());
        assert!(month_index(i64::MIN).unwrap_err().is_configuration());
        assert!(calendar_date(i64::MAX).is_err());
    }

    #[test]
    fn test_or_skip() {
        let mut record = crate::types::fixtures::record(1, JAN_1_2024, None);
        assert_eq!(or_skip(&record, month_index), Some(0));
        record.viewed_at = i64::MAX;
        assert_eq!(or_skip(&record, month_index), None);
    }
}
