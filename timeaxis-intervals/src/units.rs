//! Concrete calendar intervals.
//!
//! Sub-hour units step by absolute durations. Day and coarser units step along
//! the wall clock of the instant's timezone, so "one day later" stays at the same
//! local time across daylight saving transitions.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDateTime, TimeZone, Timelike, Weekday};

use crate::interval::TimeInterval;
use crate::local::{resolve_floor, resolve_local, start_of_day, start_of_hour, start_of_minute};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillisecondInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInterval;

/// Weeks starting at local midnight of a fixed weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayInterval {
    weekday: Weekday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearInterval;

impl WeekdayInterval {
    pub fn new(weekday: Weekday) -> Self {
        Self { weekday }
    }

    /// Build from a day index where 0 is Sunday and 6 is Saturday. Larger indices
    /// wrap around the week.
    pub fn from_index(index: u32) -> Self {
        let weekday = (0..index % 7).fold(Weekday::Sun, |day, _| day.succ());
        Self { weekday }
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

fn with_local<Tz: TimeZone>(
    date: &DateTime<Tz>,
    f: impl FnOnce(NaiveDateTime) -> NaiveDateTime,
) -> DateTime<Tz> {
    resolve_local(&date.timezone(), &f(date.naive_local()))
}

fn floor_local<Tz: TimeZone>(
    date: &DateTime<Tz>,
    f: impl FnOnce(NaiveDateTime) -> NaiveDateTime,
) -> DateTime<Tz> {
    resolve_floor(date, &f(date.naive_local()))
}

/// Truncate a sub-day unit by removing the elapsed local time as an absolute
/// duration. After clocks are turned back by half an hour, the floor is the
/// half-hour instant the wall clock restarted from.
fn floor_clock<Tz: TimeZone>(
    date: &DateTime<Tz>,
    truncate: impl Fn(NaiveDateTime) -> NaiveDateTime,
) -> DateTime<Tz> {
    let naive = date.naive_local();
    let truncated = truncate(naive);
    match date.clone().checked_sub_signed(naive - truncated) {
        Some(candidate) if truncate(candidate.naive_local()) == candidate.naive_local() => {
            candidate
        }
        // Elapsed time spans a skipped stretch of wall clock
        _ => resolve_floor(date, &truncated),
    }
}

fn naive_limit(step: i64) -> NaiveDateTime {
    if step >= 0 {
        NaiveDateTime::MAX
    } else {
        NaiveDateTime::MIN
    }
}

/// Absolute shift, clamped to the representable range.
fn shift_elapsed<Tz: TimeZone>(
    date: &DateTime<Tz>,
    step: i64,
    delta: Option<Duration>,
) -> DateTime<Tz> {
    delta
        .and_then(|delta| date.clone().checked_add_signed(delta))
        .unwrap_or_else(|| resolve_local(&date.timezone(), &naive_limit(step)))
}

/// Wall-clock shift, clamped to the representable range.
fn shift_wall<Tz: TimeZone>(
    date: &DateTime<Tz>,
    step: i64,
    delta: Option<Duration>,
) -> DateTime<Tz> {
    with_local(date, |naive| {
        delta
            .and_then(|delta| naive.checked_add_signed(delta))
            .unwrap_or_else(|| naive_limit(step))
    })
}

fn shift_months(naive: NaiveDateTime, months: i64) -> NaiveDateTime {
    let magnitude = u32::try_from(months.unsigned_abs()).unwrap_or(u32::MAX);
    let shifted = if months >= 0 {
        naive.checked_add_months(Months::new(magnitude))
    } else {
        naive.checked_sub_months(Months::new(magnitude))
    };
    shifted.unwrap_or_else(|| naive_limit(months))
}

fn month_index<Tz: TimeZone>(date: &DateTime<Tz>) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

impl<Tz: TimeZone> TimeInterval<Tz> for MillisecondInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        let sub_millis = date.timestamp_subsec_nanos() % 1_000_000;
        date.clone() - Duration::nanoseconds(i64::from(sub_millis))
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        shift_elapsed(date, step, Duration::try_milliseconds(step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some((self.floor(end) - self.floor(start)).num_milliseconds())
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for SecondInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        date.clone() - Duration::nanoseconds(i64::from(date.timestamp_subsec_nanos()))
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        shift_elapsed(date, step, Duration::try_seconds(step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some((self.floor(end) - self.floor(start)).num_seconds())
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(date.second()))
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for MinuteInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        floor_clock(date, start_of_minute)
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        shift_elapsed(date, step, Duration::try_minutes(step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some((self.floor(end) - self.floor(start)).num_minutes())
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(date.minute()))
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for HourInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        floor_clock(date, start_of_hour)
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        shift_elapsed(date, step, Duration::try_hours(step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some((self.floor(end) - self.floor(start)).num_hours())
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(date.hour()))
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for DayInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        floor_local(date, start_of_day)
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        shift_wall(date, step, Duration::try_days(step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some((end.date_naive() - start.date_naive()).num_days())
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(date.day0()))
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for WeekdayInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        let current = date.weekday().num_days_from_sunday();
        let target = self.weekday.num_days_from_sunday();
        let days_back = i64::from((current + 7 - target) % 7);
        floor_local(date, |naive| {
            start_of_day(naive)
                .checked_sub_signed(Duration::days(days_back))
                .unwrap_or(NaiveDateTime::MIN)
        })
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        shift_wall(date, step, Duration::try_weeks(step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        let days = (self.floor(end).date_naive() - self.floor(start).date_naive()).num_days();
        Some(days.div_euclid(7))
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for MonthInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        let day0 = i64::from(date.day0());
        floor_local(date, |naive| start_of_day(naive) - Duration::days(day0))
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        with_local(date, |naive| shift_months(naive, step))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some(month_index(end) - month_index(start))
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(date.month0()))
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for YearInterval {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        let ordinal0 = i64::from(date.ordinal0());
        floor_local(date, |naive| start_of_day(naive) - Duration::days(ordinal0))
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        with_local(date, |naive| shift_months(naive, step.saturating_mul(12)))
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(end.year()) - i64::from(start.year()))
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        Some(i64::from(date.year()))
    }
}

/// Every calendar unit as a single copyable value, for tables of intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week(Weekday),
    Month,
    Year,
}

impl<Tz: TimeZone> TimeInterval<Tz> for CalendarUnit {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            CalendarUnit::Millisecond => MillisecondInterval.floor(date),
            CalendarUnit::Second => SecondInterval.floor(date),
            CalendarUnit::Minute => MinuteInterval.floor(date),
            CalendarUnit::Hour => HourInterval.floor(date),
            CalendarUnit::Day => DayInterval.floor(date),
            CalendarUnit::Week(weekday) => WeekdayInterval::new(*weekday).floor(date),
            CalendarUnit::Month => MonthInterval.floor(date),
            CalendarUnit::Year => YearInterval.floor(date),
        }
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        match self {
            CalendarUnit::Millisecond => MillisecondInterval.offset(date, step),
            CalendarUnit::Second => SecondInterval.offset(date, step),
            CalendarUnit::Minute => MinuteInterval.offset(date, step),
            CalendarUnit::Hour => HourInterval.offset(date, step),
            CalendarUnit::Day => DayInterval.offset(date, step),
            CalendarUnit::Week(weekday) => WeekdayInterval::new(*weekday).offset(date, step),
            CalendarUnit::Month => MonthInterval.offset(date, step),
            CalendarUnit::Year => YearInterval.offset(date, step),
        }
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        match self {
            CalendarUnit::Millisecond => MillisecondInterval.count(start, end),
            CalendarUnit::Second => SecondInterval.count(start, end),
            CalendarUnit::Minute => MinuteInterval.count(start, end),
            CalendarUnit::Hour => HourInterval.count(start, end),
            CalendarUnit::Day => DayInterval.count(start, end),
            CalendarUnit::Week(weekday) => WeekdayInterval::new(*weekday).count(start, end),
            CalendarUnit::Month => MonthInterval.count(start, end),
            CalendarUnit::Year => YearInterval.count(start, end),
        }
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        match self {
            CalendarUnit::Millisecond => TimeInterval::<Tz>::field(&MillisecondInterval, date),
            CalendarUnit::Second => SecondInterval.field(date),
            CalendarUnit::Minute => MinuteInterval.field(date),
            CalendarUnit::Hour => HourInterval.field(date),
            CalendarUnit::Day => DayInterval.field(date),
            CalendarUnit::Week(weekday) => {
                TimeInterval::<Tz>::field(&WeekdayInterval::new(*weekday), date)
            }
            CalendarUnit::Month => MonthInterval.field(date),
            CalendarUnit::Year => YearInterval.field(date),
        }
    }
}

pub fn millisecond() -> MillisecondInterval {
    MillisecondInterval
}

pub fn second() -> SecondInterval {
    SecondInterval
}

pub fn minute() -> MinuteInterval {
    MinuteInterval
}

pub fn hour() -> HourInterval {
    HourInterval
}

pub fn day() -> DayInterval {
    DayInterval
}

pub fn week(weekday: Weekday) -> WeekdayInterval {
    WeekdayInterval::new(weekday)
}

/// Weeks starting on the weekday with the given index, 0 being Sunday.
pub fn weekday(index: u32) -> WeekdayInterval {
    WeekdayInterval::from_index(index)
}

pub fn week_sunday() -> WeekdayInterval {
    week(Weekday::Sun)
}

pub fn week_monday() -> WeekdayInterval {
    week(Weekday::Mon)
}

pub fn month() -> MonthInterval {
    MonthInterval
}

pub fn year() -> YearInterval {
    YearInterval
}
