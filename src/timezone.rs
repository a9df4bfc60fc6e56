//! Resolves the configured timezone to a UTC offset for displaying dates.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Like [get_local_offset], but reports an unknown timezone as an [Error::InvalidTimezoneError].
pub fn require_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Could not resolve the timezone \"{canonical_timezone}\"");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The current UTC time truncated to whole milliseconds, the precision stored for timestamps.
pub fn now_utc_millis() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now.replace_nanosecond(now.nanosecond() - now.nanosecond() % 1_000_000)
        .unwrap_or(now)
}
