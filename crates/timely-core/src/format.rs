//! `HH:MM` rendering of durations and times of day.

use chrono::{Duration, Timelike};

/// Formats a duration as `HH:MM`.
///
/// Negative durations are prefixed with `-`. Hours are not wrapped at 24.
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::zero() {
        return format!("-{}", format_duration(-duration));
    }
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    format!("{hours:02}:{minutes:02}")
}

/// Formats a time of day as 24-hour `HH:MM`.
pub fn format_time<T: Timelike>(time: &T) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveTime;

    #[test]
    fn zero_duration_formats_as_zero() {
        assert_eq!(format_duration(Duration::zero()), "00:00");
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        assert_eq!(format_duration(Duration::minutes(462)), "07:42");
        assert_eq!(format_duration(Duration::hours(8)), "08:00");
    }

    #[test]
    fn duration_hours_do_not_wrap() {
        assert_eq!(format_duration(Duration::hours(27) + Duration::minutes(5)), "27:05");
    }

    #[test]
    fn negative_duration_is_prefixed() {
        assert_eq!(format_duration(Duration::minutes(-90)), "-01:30");
        assert_eq!(
            format_duration(-Duration::minutes(462)),
            format!("-{}", format_duration(Duration::minutes(462)))
        );
    }

    #[test]
    fn seconds_are_truncated() {
        assert_eq!(format_duration(Duration::seconds(119)), "00:01");
    }

    #[test]
    fn time_formats_zero_padded() {
        let time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(format_time(&time), "07:05");
    }
}
