use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone};

use crate::filter::FilteredInterval;

/// A calendar grid (every second, every day, every month, ...) evaluated in the
/// timezone of the instants passed to it.
///
/// Implementors supply `floor` and `offset`. `count` and `field` are optional and
/// only consulted by [`TimeInterval::every`]; everything else is derived.
///
/// `floor` must be idempotent and never move an instant forward. `offset` must be
/// calendar correct for the unit. Neither property is checked.
pub trait TimeInterval<Tz: TimeZone>: Send + Sync + Debug {
    /// Latest grid boundary at or before `date`.
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz>;

    /// Move `date` by `step` natural periods of the interval. Sub-unit components
    /// of `date` are preserved.
    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz>;

    /// Number of grid boundaries between `start` and `end`.
    fn count(&self, _start: &DateTime<Tz>, _end: &DateTime<Tz>) -> Option<i64> {
        None
    }

    /// Cyclical identity of the boundary containing `date`, e.g. the month number.
    fn field(&self, _date: &DateTime<Tz>) -> Option<i64> {
        None
    }

    /// Smallest grid boundary at or after `date`.
    fn ceil(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        let before = date.clone()
            .checked_sub_signed(Duration::nanoseconds(1))
            .unwrap_or_else(|| date.clone());
        let previous = self.floor(&before);
        let mut boundary = self.floor(&self.offset(&previous, 1));
        // After a half-hour clock change the next boundary can still precede `date`
        while boundary < *date {
            let next = self.floor(&self.offset(&boundary, 1));
            if next <= boundary {
                break;
            }
            boundary = next;
        }
        boundary
    }

    /// Ascending grid boundaries in `[ceil(start), stop)`, taking every `step`th
    /// boundary. Empty when `step <= 0` or no boundary precedes `stop`.
    fn range(&self, start: &DateTime<Tz>, stop: &DateTime<Tz>, step: i64) -> Vec<DateTime<Tz>> {
        let mut boundaries = Vec::new();
        if step <= 0 {
            return boundaries;
        }

        let mut cursor = self.ceil(start);
        while cursor < *stop {
            let next = self.floor(&self.offset(&cursor, step));
            let advanced = next > cursor;
            boundaries.push(std::mem::replace(&mut cursor, next));
            if !advanced {
                break;
            }
        }
        boundaries
    }

    /// Restrict the grid to the boundaries for which `predicate` holds.
    ///
    /// The predicate must hold for some boundary within a bounded walk from any
    /// instant, otherwise `floor` and `offset` of the result never return.
    fn filter<P>(self, predicate: P) -> FilteredInterval<Self, P>
    where
        Self: Sized,
        P: Fn(&DateTime<Tz>) -> bool + Send + Sync,
    {
        FilteredInterval::new(self, predicate)
    }

    /// Every `step`th boundary of the grid, aligned on `field` when available and
    /// on the boundary count since the Unix epoch otherwise.
    fn every(self, step: i64) -> Box<dyn TimeInterval<Tz>>
    where
        Self: Sized + 'static,
        Tz: 'static,
    {
        if step <= 1 {
            return Box::new(self);
        }

        let inner = Arc::new(self);
        let probe = Arc::clone(&inner);
        Box::new(FilteredInterval::new(inner, move |date: &DateTime<Tz>| {
            is_step_boundary(&*probe, date, step)
        }))
    }
}

fn is_step_boundary<Tz, I>(interval: &I, date: &DateTime<Tz>, step: i64) -> bool
where
    Tz: TimeZone,
    I: TimeInterval<Tz> + ?Sized,
{
    if let Some(field) = interval.field(date) {
        return field.rem_euclid(step) == 0;
    }

    match interval.count(&unix_epoch(date), date) {
        Some(count) => count.rem_euclid(step) == 0,
        // Nothing to align on, every boundary qualifies
        None => true,
    }
}

/// The Unix epoch expressed in the timezone of `date`.
pub fn unix_epoch<Tz: TimeZone>(date: &DateTime<Tz>) -> DateTime<Tz> {
    let sub_millis = i64::from(date.timestamp_subsec_nanos() % 1_000_000);
    date.clone()
        - Duration::milliseconds(date.timestamp_millis())
        - Duration::nanoseconds(sub_millis)
}

impl<Tz, I> TimeInterval<Tz> for Box<I>
where
    Tz: TimeZone,
    I: TimeInterval<Tz> + ?Sized,
{
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        (**self).floor(date)
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        (**self).offset(date, step)
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        (**self).count(start, end)
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        (**self).field(date)
    }

    fn ceil(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        (**self).ceil(date)
    }

    fn range(&self, start: &DateTime<Tz>, stop: &DateTime<Tz>, step: i64) -> Vec<DateTime<Tz>> {
        (**self).range(start, stop, step)
    }
}

impl<Tz, I> TimeInterval<Tz> for Arc<I>
where
    Tz: TimeZone,
    I: TimeInterval<Tz> + ?Sized,
{
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        (**self).floor(date)
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        (**self).offset(date, step)
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        (**self).count(start, end)
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        (**self).field(date)
    }

    fn ceil(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        (**self).ceil(date)
    }

    fn range(&self, start: &DateTime<Tz>, stop: &DateTime<Tz>, step: i64) -> Vec<DateTime<Tz>> {
        (**self).range(start, stop, step)
    }
}
