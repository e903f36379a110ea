//! Day-level date arithmetic shared by the timeline and burndown pipelines.
//! Everything "today"-relative takes the current instant as a parameter so
//! callers (and tests) control the clock.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};

const MS_PER_DAY: i64 = 86_400_000;

pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub fn end_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(dt) + Duration::days(1) - Duration::milliseconds(1)
}

/// Difference in days, rounding partial days up.
pub fn days_diff(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    (ms as f64 / MS_PER_DAY as f64).ceil() as i64
}

/// Add a possibly fractional number of days.
pub fn add_days(dt: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    dt + Duration::milliseconds((days * MS_PER_DAY as f64) as i64)
}

/// One day-aligned instant per calendar day from `start`'s day through
/// `end`'s day inclusive. Empty when `start` is after `end`.
pub fn date_grid(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut days = Vec::new();
    if start > end {
        return days;
    }
    let mut current = start_of_day(start);
    let last = start_of_day(end);
    while current <= last {
        days.push(current);
        current += Duration::days(1);
    }
    days
}

/// Earliest of the given dates, ignoring `None`s. Falls back to the start
/// of today when nothing remains.
pub fn min_date(dates: &[Option<DateTime<Utc>>], now: DateTime<Utc>) -> DateTime<Utc> {
    dates
        .iter()
        .flatten()
        .copied()
        .min()
        .unwrap_or_else(|| start_of_day(now))
}

/// Latest of the given dates, ignoring `None`s, with the same fallback.
pub fn max_date(dates: &[Option<DateTime<Utc>>], now: DateTime<Utc>) -> DateTime<Utc> {
    dates
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or_else(|| start_of_day(now))
}

pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn is_today(dt: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_same_day(dt, now)
}

pub fn is_weekend(dt: DateTime<Utc>) -> bool {
    matches!(dt.weekday(), Weekday::Sat | Weekday::Sun)
}

/// "M/D" labels for chart headers and axes.
pub fn format_short(dt: DateTime<Utc>) -> String {
    format!("{}/{}", dt.month(), dt.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn grid_same_instant_yields_single_day() {
        let t = at(2026, 3, 10, 14, 30);
        let grid = date_grid(t, t);
        assert_eq!(grid, vec![start_of_day(t)]);
    }

    #[test]
    fn grid_reversed_range_is_empty() {
        let grid = date_grid(at(2026, 3, 11, 0, 0), at(2026, 3, 10, 0, 0));
        assert!(grid.is_empty());
    }

    #[test]
    fn grid_is_inclusive_of_end_day() {
        let grid = date_grid(at(2026, 3, 10, 9, 0), at(2026, 3, 14, 1, 0));
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], at(2026, 3, 10, 0, 0));
        assert_eq!(grid[4], at(2026, 3, 14, 0, 0));
    }

    #[test]
    fn days_diff_rounds_partial_days_up() {
        assert_eq!(days_diff(at(2026, 3, 10, 0, 0), at(2026, 3, 10, 1, 0)), 1);
        assert_eq!(days_diff(at(2026, 3, 10, 0, 0), at(2026, 3, 12, 0, 0)), 2);
        assert_eq!(days_diff(at(2026, 3, 10, 12, 0), at(2026, 3, 12, 18, 0)), 3);
    }

    #[test]
    fn days_diff_negative_when_reversed() {
        assert_eq!(days_diff(at(2026, 3, 12, 0, 0), at(2026, 3, 10, 0, 0)), -2);
    }

    #[test]
    fn min_max_ignore_nones_and_fall_back_to_today() {
        let now = at(2026, 3, 10, 15, 0);
        let a = at(2026, 3, 1, 0, 0);
        let b = at(2026, 3, 5, 0, 0);
        let dates = [None, Some(b), Some(a), None];
        assert_eq!(min_date(&dates, now), a);
        assert_eq!(max_date(&dates, now), b);
        assert_eq!(min_date(&[None, None], now), start_of_day(now));
        assert_eq!(max_date(&[], now), start_of_day(now));
    }

    #[test]
    fn weekend_detection() {
        // 2026-03-14 is a Saturday, 2026-03-15 a Sunday.
        assert!(is_weekend(at(2026, 3, 14, 12, 0)));
        assert!(is_weekend(at(2026, 3, 15, 0, 0)));
        assert!(!is_weekend(at(2026, 3, 16, 0, 0)));
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let t = at(2026, 3, 10, 9, 0);
        let eod = end_of_day(t);
        assert!(is_same_day(t, eod));
        assert!(!is_same_day(eod + Duration::milliseconds(1), t));
    }

    #[test]
    fn add_days_supports_fractions() {
        let t = at(2026, 3, 10, 0, 0);
        assert_eq!(add_days(t, 2.0), at(2026, 3, 12, 0, 0));
        assert_eq!(add_days(t, 0.5), at(2026, 3, 10, 12, 0));
    }
}
