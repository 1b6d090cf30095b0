//! Parsing of the `--time` argument.

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Resolve a time argument against `now`.
///
/// Accepts `now`/`latest`, relative offsets (`-3h`, `-90m`), full or
/// minute-precision timestamps, and bare dates (taken at 12:00 UTC). All
/// timestamps are UTC.
pub fn parse_time(spec: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let spec = spec.trim();

    if spec.eq_ignore_ascii_case("now") || spec.eq_ignore_ascii_case("latest") {
        return Ok(now);
    }

    if let Some(offset) = spec.strip_prefix('-') {
        let Some(target) = now.checked_sub_signed(parse_offset(offset, spec)?) else {
            bail!("Relative time '{}' is out of range", spec);
        };
        return Ok(target);
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(spec, format) {
            return Ok(dt.and_utc());
        }
    }

    let noon = NaiveDate::parse_from_str(spec, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(12, 0, 0));
    if let Some(dt) = noon {
        return Ok(dt.and_utc());
    }

    bail!(
        "Invalid time '{}'. Use 'now', '-3h', '-30m', 'YYYY-MM-DD', \
         'YYYY-MM-DD HH:MM' or 'YYYY-MM-DDTHH:MM:SS'",
        spec
    )
}

fn parse_offset(offset: &str, spec: &str) -> Result<Duration> {
    let Some((split, unit)) = offset.char_indices().last() else {
        bail!("Invalid relative time '{}'", spec);
    };
    let Ok(amount) = offset[..split].parse::<i64>() else {
        bail!("Invalid relative time '{}'", spec);
    };
    let duration = match unit {
        'h' | 'H' => Duration::try_hours(amount),
        'm' | 'M' => Duration::try_minutes(amount),
        _ => bail!("Invalid relative time '{}' (expected hours 'h' or minutes 'm')", spec),
    };
    match duration {
        Some(duration) => Ok(duration),
        None => bail!("Relative time '{}' is out of range", spec),
    }
}
