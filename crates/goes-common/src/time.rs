//! Time handling for the hourly GOES archive layout.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};

/// One hourly directory of the archive, identified by year, day-of-year
/// and hour (all UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourBucket {
    pub year: i32,
    pub day_of_year: u32,
    pub hour: u32,
}

impl HourBucket {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            day_of_year: dt.ordinal(),
            hour: dt.hour(),
        }
    }

    /// Archive prefix for this bucket.
    /// Format: {product}/{year}/{day_of_year:03}/{hour:02}/
    pub fn prefix(&self, product: &str) -> String {
        format!(
            "{}/{}/{:03}/{:02}/",
            product, self.year, self.day_of_year, self.hour
        )
    }
}

/// Candidate buckets from `target` backwards in 1-hour steps, newest first.
///
/// `count` buckets are produced: `target`, `target - 1h`, ...,
/// `target - (count - 1)h`.
pub fn hourly_buckets(target: DateTime<Utc>, count: u32) -> Vec<HourBucket> {
    (0..count)
        .map(|hours_back| HourBucket::from_datetime(target - Duration::hours(hours_back as i64)))
        .collect()
}

/// Parse a GOES date-time group: `YYYYDDDHHMMSS` followed by optional
/// fractional-second digits (one digit, tenths, in operational files).
///
/// Example: `20241380556172` is 2024 day 138, 05:56:17.2 UTC.
pub fn parse_goes_dtg(s: &str) -> Option<DateTime<Utc>> {
    if s.len() < 13 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = s[0..4].parse().ok()?;
    let day_of_year: u32 = s[4..7].parse().ok()?;
    let hour: u32 = s[7..9].parse().ok()?;
    let minute: u32 = s[9..11].parse().ok()?;
    let second: u32 = s[11..13].parse().ok()?;

    let fraction = &s[13..];
    let nanos = if fraction.is_empty() {
        0
    } else {
        let digits: String = fraction.chars().take(9).collect();
        let scale = 10u32.pow(9 - digits.len() as u32);
        digits.parse::<u32>().ok()? * scale
    };

    let date = NaiveDate::from_yo_opt(year, day_of_year)?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    Some(date.and_time(time).and_utc())
}
