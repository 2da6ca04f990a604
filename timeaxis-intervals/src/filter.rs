use std::fmt::{self, Debug};

use chrono::{DateTime, Duration, TimeZone};

use crate::interval::TimeInterval;

/// The subsequence of another interval's grid accepted by a predicate.
///
/// Built with [`TimeInterval::filter`] or [`TimeInterval::every`].
pub struct FilteredInterval<I, P> {
    inner: I,
    predicate: P,
}

impl<I, P> FilteredInterval<I, P> {
    pub fn new(inner: I, predicate: P) -> Self {
        Self { inner, predicate }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: Debug, P> Debug for FilteredInterval<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredInterval")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<Tz, I, P> TimeInterval<Tz> for FilteredInterval<I, P>
where
    Tz: TimeZone,
    I: TimeInterval<Tz>,
    P: Fn(&DateTime<Tz>) -> bool + Send + Sync,
{
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        let mut cursor = self.inner.floor(date);
        while !(self.predicate)(&cursor) {
            let Some(before) = cursor.clone().checked_sub_signed(Duration::nanoseconds(1)) else {
                break;
            };
            cursor = self.inner.floor(&before);
        }
        cursor
    }

    /// Stops early at the edge of the representable range, where the inner
    /// offset no longer moves.
    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        let direction = step.signum();
        let mut cursor = date.clone();
        for _ in 0..step.unsigned_abs() {
            let mut probe = cursor.clone();
            loop {
                let next = self.inner.offset(&probe, direction);
                let moved = if direction > 0 {
                    next > probe
                } else {
                    next < probe
                };
                if !moved {
                    return cursor;
                }
                probe = next;
                if (self.predicate)(&probe) {
                    break;
                }
            }
            cursor = probe;
        }
        cursor
    }
}
