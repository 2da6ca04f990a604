//! Wall-clock helpers shared by the calendar units.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike};

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks turned back) resolve to the earlier instant. Times that
/// fall in a gap (clocks turned forward) move forward by the length of the gap.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(date) => date,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => skip_gap(tz, naive),
    }
}

/// Resolve a wall-clock time produced by truncating `date`.
///
/// Unlike [`resolve_local`], an ambiguous result picks the later instant when it
/// does not pass `date`, so truncation inside a repeated hour stays in that hour.
pub fn resolve_floor<Tz: TimeZone>(date: &DateTime<Tz>, naive: &NaiveDateTime) -> DateTime<Tz> {
    let tz = date.timezone();
    match tz.from_local_datetime(naive) {
        LocalResult::Single(floored) => floored,
        LocalResult::Ambiguous(earliest, latest) => {
            if latest <= *date {
                latest
            } else {
                earliest
            }
        }
        LocalResult::None => skip_gap(&tz, naive),
    }
}

/// Also reached for wall-clock times at the edge of the representable range,
/// which have no UTC counterpart; those clamp to the range.
fn skip_gap<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    // Offset in effect a day earlier is the one before the transition
    let day_before = naive
        .checked_sub_signed(Duration::days(1))
        .unwrap_or(*naive);
    let before = tz.offset_from_utc_datetime(&day_before).fix();
    let shift = Duration::seconds(i64::from(before.local_minus_utc()));
    let utc = naive.checked_sub_signed(shift).unwrap_or(if shift < Duration::zero() {
        NaiveDateTime::MAX
    } else {
        NaiveDateTime::MIN
    });
    tz.from_utc_datetime(&utc)
}

pub(crate) fn start_of_second(naive: NaiveDateTime) -> NaiveDateTime {
    naive - Duration::nanoseconds(i64::from(naive.nanosecond()))
}

pub(crate) fn start_of_minute(naive: NaiveDateTime) -> NaiveDateTime {
    start_of_second(naive) - Duration::seconds(i64::from(naive.second()))
}

pub(crate) fn start_of_hour(naive: NaiveDateTime) -> NaiveDateTime {
    start_of_minute(naive) - Duration::minutes(i64::from(naive.minute()))
}

pub(crate) fn start_of_day(naive: NaiveDateTime) -> NaiveDateTime {
    start_of_second(naive) - Duration::seconds(i64::from(naive.num_seconds_from_midnight()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::New_York;
    use chrono_tz::Australia::Sydney;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_resolve_single() {
        let resolved = resolve_local(&New_York, &naive(2023, 1, 10, 9, 15));
        assert_eq!(resolved.naive_local(), naive(2023, 1, 10, 9, 15));
    }

    #[test]
    fn test_resolve_gap_moves_forward() {
        // 2023-03-12 02:30 does not exist in New York
        let resolved = resolve_local(&New_York, &naive(2023, 3, 12, 2, 30));
        assert_eq!(resolved.naive_local(), naive(2023, 3, 12, 3, 30));

        // 2023-10-01 02:30 does not exist in Sydney
        let resolved = resolve_local(&Sydney, &naive(2023, 10, 1, 2, 30));
        assert_eq!(resolved.naive_local(), naive(2023, 10, 1, 3, 30));
    }

    #[test]
    fn test_resolve_ambiguous_prefers_earliest() {
        // 2023-11-05 01:30 happens twice in New York
        let resolved = resolve_local(&New_York, &naive(2023, 11, 5, 1, 30));
        assert_eq!(resolved.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_resolve_floor_stays_in_repeated_hour() {
        let second_pass = New_York
            .from_local_datetime(&naive(2023, 11, 5, 1, 45))
            .latest()
            .unwrap();
        let floored = resolve_floor(&second_pass, &naive(2023, 11, 5, 1, 0));
        assert_eq!(floored.offset().fix().local_minus_utc(), -5 * 3600);
        assert!(floored <= second_pass);
    }

    #[test]
    fn test_truncation_helpers() {
        let value = naive(2024, 2, 29, 13, 47)
            + Duration::seconds(31)
            + Duration::milliseconds(250);
        assert_eq!(start_of_minute(value), naive(2024, 2, 29, 13, 47));
        assert_eq!(start_of_hour(value), naive(2024, 2, 29, 13, 0));
        assert_eq!(start_of_day(value), naive(2024, 2, 29, 0, 0));
    }
}
