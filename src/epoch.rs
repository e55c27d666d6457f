//! UTC epoch arithmetic shared by frames, propagation and screening.

use chrono::{DateTime, Duration, Utc};

use crate::constants::{JD_J2000, JD_UNIX_EPOCH, SECONDS_PER_DAY};

/// Julian date of a UTC timestamp (UTC used as a UT1 proxy).
pub fn julian_date(epoch: DateTime<Utc>) -> f64 {
    let secs = epoch.timestamp() as f64 + f64::from(epoch.timestamp_subsec_nanos()) * 1e-9;
    JD_UNIX_EPOCH + secs / SECONDS_PER_DAY
}

/// Julian centuries elapsed since J2000.0.
pub fn julian_centuries_j2000(epoch: DateTime<Utc>) -> f64 {
    (julian_date(epoch) - JD_J2000) / 36_525.0
}

/// `epoch + seconds`, rounded to the nearest nanosecond.
///
/// Whole seconds and the fraction are applied separately so spans of
/// centuries keep their length. Offsets beyond the representable calendar
/// saturate at its ends.
pub fn add_seconds(epoch: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    let whole = seconds.trunc();
    let nanos = Duration::nanoseconds(((seconds - whole) * 1e9).round() as i64);
    let offset = if whole.abs() < i64::MAX as f64 { Duration::try_seconds(whole as i64) } else { None };
    offset
        .and_then(|d| epoch.checked_add_signed(d))
        .and_then(|t| t.checked_add_signed(nanos))
        .unwrap_or(if seconds < 0.0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
}

/// Signed seconds from `from` to `to`.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let d = to - from;
    d.num_seconds() as f64 + f64::from(d.subsec_nanos()) * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn j2000_julian_date() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_date(j2000) - 2_451_545.0).abs() < 1e-9);
        assert!(julian_centuries_j2000(j2000).abs() < 1e-12);
    }

    #[test]
    fn add_and_measure_seconds() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        let t1 = add_seconds(t0, 5400.25);
        assert!((seconds_between(t0, t1) - 5400.25).abs() < 1e-9);
        assert!((seconds_between(t1, t0) + 5400.25).abs() < 1e-9);
    }

    #[test]
    fn offsets_of_centuries_keep_their_length() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let span = 1000.0 * 365.25 * 86_400.0 + 0.5;
        let t1 = add_seconds(t0, span);
        assert_eq!(t1.format("%Y").to_string(), "3026");
        assert!((seconds_between(t0, t1) - span).abs() < 1e-6, "got {}", seconds_between(t0, t1));
        assert!((seconds_between(t1, t0) + span).abs() < 1e-6);
        assert!((seconds_between(t0, add_seconds(t0, -span)) + span).abs() < 1e-6);
    }

    #[test]
    fn unrepresentable_offsets_saturate() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(add_seconds(t0, 1e20), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_seconds(t0, -1e20), DateTime::<Utc>::MIN_UTC);
    }
}
