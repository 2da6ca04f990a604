use chrono::{DateTime, TimeZone, Weekday};
use timeaxis_intervals::{CalendarUnit, TimeInterval};

use crate::config::parse_timezone;
use crate::error::TickError;
use crate::step::{tick_step, whole_step};

const DURATION_SECOND: i64 = 1000;
const DURATION_MINUTE: i64 = DURATION_SECOND * 60;
const DURATION_HOUR: i64 = DURATION_MINUTE * 60;
const DURATION_DAY: i64 = DURATION_HOUR * 24;
const DURATION_WEEK: i64 = DURATION_DAY * 7;
const DURATION_MONTH: i64 = DURATION_DAY * 30;
const DURATION_YEAR: i64 = DURATION_DAY * 365;

/// One candidate granularity for time axis ticks.
///
/// `duration_ms` is the nominal length of `step` units and is only used to rank
/// candidates; tick placement always goes through the calendar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCandidate {
    pub unit: CalendarUnit,
    pub step: i64,
    pub duration_ms: i64,
}

const fn candidate(unit: CalendarUnit, step: i64, duration_ms: i64) -> TickCandidate {
    TickCandidate {
        unit,
        step,
        duration_ms,
    }
}

/// Candidate granularities in ascending order of nominal duration.
pub const TICK_INTERVALS: [TickCandidate; 18] = [
    candidate(CalendarUnit::Second, 1, DURATION_SECOND),
    candidate(CalendarUnit::Second, 5, 5 * DURATION_SECOND),
    candidate(CalendarUnit::Second, 15, 15 * DURATION_SECOND),
    candidate(CalendarUnit::Second, 30, 30 * DURATION_SECOND),
    candidate(CalendarUnit::Minute, 1, DURATION_MINUTE),
    candidate(CalendarUnit::Minute, 5, 5 * DURATION_MINUTE),
    candidate(CalendarUnit::Minute, 15, 15 * DURATION_MINUTE),
    candidate(CalendarUnit::Minute, 30, 30 * DURATION_MINUTE),
    candidate(CalendarUnit::Hour, 1, DURATION_HOUR),
    candidate(CalendarUnit::Hour, 3, 3 * DURATION_HOUR),
    candidate(CalendarUnit::Hour, 6, 6 * DURATION_HOUR),
    candidate(CalendarUnit::Hour, 12, 12 * DURATION_HOUR),
    candidate(CalendarUnit::Day, 1, DURATION_DAY),
    candidate(CalendarUnit::Day, 2, 2 * DURATION_DAY),
    candidate(CalendarUnit::Week(Weekday::Sun), 1, DURATION_WEEK),
    candidate(CalendarUnit::Month, 1, DURATION_MONTH),
    candidate(CalendarUnit::Month, 3, 3 * DURATION_MONTH),
    candidate(CalendarUnit::Year, 1, DURATION_YEAR),
];

/// The interval and step chosen for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval {
    pub unit: CalendarUnit,
    pub step: i64,
}

impl TickInterval {
    pub fn new(unit: CalendarUnit, step: i64) -> Self {
        Self { unit, step }
    }

    /// The calendar interval producing these ticks.
    pub fn interval<Tz: TimeZone + 'static>(&self) -> Box<dyn TimeInterval<Tz>> {
        TimeInterval::<Tz>::every(self.unit, self.step)
    }
}

impl From<TickCandidate> for TickInterval {
    fn from(candidate: TickCandidate) -> Self {
        Self::new(candidate.unit, candidate.step)
    }
}

/// Pick the tick granularity for `count` ticks between two epoch millisecond
/// timestamps given in ascending order.
pub fn select_tick_interval(start_ms: i64, stop_ms: i64, count: usize) -> TickInterval {
    let count = count.max(1) as f64;
    let target = (stop_ms as f64 - start_ms as f64).abs() / count;
    let index = TICK_INTERVALS.partition_point(|c| c.duration_ms as f64 <= target);

    if index == TICK_INTERVALS.len() {
        let years = tick_step(
            start_ms as f64 / DURATION_YEAR as f64,
            stop_ms as f64 / DURATION_YEAR as f64,
            count,
        );
        return TickInterval::new(CalendarUnit::Year, whole_step(years));
    }

    if index == 0 {
        let millis = tick_step(start_ms as f64, stop_ms as f64, count);
        return TickInterval::new(CalendarUnit::Millisecond, whole_step(millis));
    }

    let finer = TICK_INTERVALS[index - 1];
    let coarser = TICK_INTERVALS[index];
    if target / (finer.duration_ms as f64) < (coarser.duration_ms as f64) / target {
        finer.into()
    } else {
        coarser.into()
    }
}

/// Tick instants between `start` and `stop` in the timezone of the inputs.
///
/// The inputs may be given in either order; the ticks follow the same direction.
/// The stop instant itself is never a tick.
pub fn ticks<Tz: TimeZone + 'static>(
    start: &DateTime<Tz>,
    stop: &DateTime<Tz>,
    count: usize,
) -> Vec<DateTime<Tz>> {
    if count == 0 {
        return Vec::new();
    }

    let reverse = stop < start;
    let (start, stop) = if reverse { (stop, start) } else { (start, stop) };

    let selected = select_tick_interval(start.timestamp_millis(), stop.timestamp_millis(), count);
    tracing::debug!(
        unit = ?selected.unit,
        step = selected.step,
        count,
        "selected tick interval"
    );

    let mut ticks = selected.interval::<Tz>().range(start, stop, 1);
    tracing::trace!(ticks = ticks.len(), reverse, "generated ticks");
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Like [`ticks`], with calendar boundaries computed in `tz`.
pub fn ticks_in_timezone<Src, Tz>(
    start: &DateTime<Src>,
    stop: &DateTime<Src>,
    count: usize,
    tz: &Tz,
) -> Vec<DateTime<Tz>>
where
    Src: TimeZone,
    Tz: TimeZone + 'static,
{
    ticks(&start.with_timezone(tz), &stop.with_timezone(tz), count)
}

/// Tick timestamps, in epoch milliseconds, for a span given in epoch
/// milliseconds. Calendar boundaries are computed in `timezone` (an IANA name),
/// or UTC when none is given.
#[tracing::instrument(skip_all)]
pub fn generate_ticks_for_range(
    start_ms: i64,
    stop_ms: i64,
    count: usize,
    timezone: Option<&str>,
) -> Result<Vec<i64>, TickError> {
    let tz = parse_timezone(timezone.unwrap_or("UTC"))?;
    let start = tz
        .timestamp_millis_opt(start_ms)
        .single()
        .ok_or(TickError::TimestampOutOfRange(start_ms))?;
    let stop = tz
        .timestamp_millis_opt(stop_ms)
        .single()
        .ok_or(TickError::TimestampOutOfRange(stop_ms))?;

    Ok(ticks(&start, &stop, count)
        .iter()
        .map(|tick| tick.timestamp_millis())
        .collect())
}
