use std::fmt::{Display, Write as _};

use chrono::{DateTime, TimeZone, Utc};

/// Human default used when no pattern is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%c";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Largest first; seconds are the terminal unit and not listed.
const UNITS: [(i64, &str); 5] = [
    (YEAR, "year"),
    (MONTH, "month"),
    (DAY, "day"),
    (HOUR, "hour"),
    (MINUTE, "minute"),
];

/// Format `instant` with a strftime `pattern`, appending a relative phrase
/// such as `(3 days ago)` unless `relative` is off.
///
/// An invalid pattern falls back to [`DEFAULT_DATE_FORMAT`].
pub fn format_date<Tz>(
    instant: &DateTime<Tz>,
    now: DateTime<Utc>,
    pattern: Option<&str>,
    relative: bool,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let pattern = pattern.unwrap_or(DEFAULT_DATE_FORMAT);

    if write!(out, "{}", instant.format(pattern)).is_err() {
        out.clear();
        // The default pattern is known to be valid.
        let _ = write!(out, "{}", instant.format(DEFAULT_DATE_FORMAT));
    }

    if relative {
        let delta = now.timestamp() - instant.timestamp();
        let _ = write!(out, " ({})", relative_phrase(delta));
    }

    out
}

/// Relative phrase for an instant `delta_secs` in the past (negative means
/// the future). Zero is "now".
pub fn relative_phrase(delta_secs: i64) -> String {
    if delta_secs == 0 {
        return "now".to_owned();
    }

    let magnitude = delta_secs.unsigned_abs();
    let (count, unit) = UNITS
        .iter()
        .find(|(size, _)| magnitude >= *size as u64)
        .map(|(size, name)| (magnitude / *size as u64, *name))
        .unwrap_or((magnitude, "second"));

    let plural = if count == 1 { "" } else { "s" };

    if delta_secs > 0 {
        format!("{count} {unit}{plural} ago")
    } else {
        format!("in {count} {unit}{plural}")
    }
}

#[cfg(test)]
#[path = "date_tests.rs"]
mod tests;
