//! Time utilities: resolving an instant to a local calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};

/// Resolve a UTC instant to the calendar date in an IANA tz like "Asia/Dubai".
///
/// This is the only place time-of-day is discarded; downstream classification
/// works purely on calendar dates, so a record's bucket cannot drift within a
/// day as the hour changes.
pub fn today_in_tz(tz: &str, now_utc: DateTime<Utc>) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| CoreError::InvalidTimezone(tz.to_string()))?;

    Ok(now_utc.with_timezone(&tz).date_naive())
}
